use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub description: String,
    pub amount: f64,
    pub category: Option<String>,
    pub expense_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Expense {
    pub fn category_display(&self) -> &str {
        self.category.as_deref().unwrap_or("Uncategorized")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expense_row() {
        let json = r#"{"id":"e1","description":"Office rent","amount":1200.0,"category":"Rent","expense_date":"2024-02-01"}"#;
        let expense: Expense = serde_json::from_str(json).expect("valid expense row");
        assert_eq!(expense.amount, 1200.0);
        assert_eq!(expense.category_display(), "Rent");
        assert_eq!(
            expense.expense_date,
            NaiveDate::from_ymd_opt(2024, 2, 1).expect("valid date")
        );
    }

    #[test]
    fn test_insert_payload_omits_id() {
        let expense = Expense {
            id: None,
            description: "Stamps".to_string(),
            amount: 12.5,
            category: None,
            expense_date: NaiveDate::from_ymd_opt(2024, 6, 3).expect("valid date"),
            created_at: None,
        };
        let json = serde_json::to_value(&expense).expect("serialize");
        assert!(json.get("id").is_none());
        assert_eq!(json["expense_date"], "2024-06-03");
    }
}
