use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Customer {
    /// Server-generated; absent on new rows so inserts omit the column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Customer {
    pub fn email_display(&self) -> &str {
        self.email.as_deref().unwrap_or("-")
    }

    pub fn address_display(&self) -> &str {
        self.address.as_deref().unwrap_or("-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_payload_omits_server_columns() {
        let customer = Customer {
            name: "Acme Corp".to_string(),
            email: Some("billing@acme.test".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&customer).expect("serialize");
        assert!(json.get("id").is_none());
        assert!(json.get("created_at").is_none());
        assert_eq!(json["name"], "Acme Corp");
        // Optional columns without values still post as explicit nulls
        assert!(json["phone"].is_null());
    }
}
