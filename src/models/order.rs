use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
    /// Any status value the store returns that we don't recognize.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Customer columns embedded in an order query (`customers(name, email)`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderCustomer {
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Product columns embedded in an order item (`products(name, price)`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderProduct {
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    #[serde(default)]
    pub product_id: Option<String>,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_price: f64,
    #[serde(default, rename = "products")]
    pub product: Option<OrderProduct>,
}

impl OrderItem {
    pub fn product_name(&self) -> &str {
        self.product
            .as_ref()
            .and_then(|p| p.name.as_deref())
            .unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    pub total_amount: f64,
    #[serde(default, rename = "customers")]
    pub customer: Option<OrderCustomer>,
    #[serde(default, rename = "order_items")]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// First eight characters of the order id, matching the dashboard's
    /// abbreviated display.
    pub fn short_id(&self) -> &str {
        let end = self
            .id
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.id.len());
        &self.id[..end]
    }

    pub fn customer_name(&self) -> &str {
        self.customer
            .as_ref()
            .and_then(|c| c.name.as_deref())
            .unwrap_or("Unknown Customer")
    }

    pub fn customer_email(&self) -> &str {
        self.customer
            .as_ref()
            .and_then(|c| c.email.as_deref())
            .unwrap_or("-")
    }

    pub fn date_display(&self) -> String {
        self.order_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order_with_embedded_rows() {
        let json = r#"{
            "id": "f47ac10b-58cc-4372-a567-0e02b2c3d479",
            "customer_id": "c1",
            "order_date": "2024-05-14T09:30:00Z",
            "status": "completed",
            "total_amount": 149.5,
            "customers": {"name": "Acme Corp", "email": "billing@acme.test"},
            "order_items": [
                {"id": "i1", "product_id": "p1", "quantity": 2, "unit_price": 50.0,
                 "total_price": 100.0, "products": {"name": "Widget", "price": 50.0}},
                {"id": "i2", "product_id": null, "quantity": 1, "unit_price": 49.5,
                 "total_price": 49.5, "products": null}
            ]
        }"#;
        let order: Order = serde_json::from_str(json).expect("valid order row");
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.short_id(), "f47ac10b");
        assert_eq!(order.customer_name(), "Acme Corp");
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].product_name(), "Widget");
        assert_eq!(order.items[1].product_name(), "Unknown");
    }

    #[test]
    fn test_unrecognized_status_parses_as_unknown() {
        let json = r#"{"id":"x","status":"refunded","total_amount":1.0}"#;
        let order: Order = serde_json::from_str(json).expect("valid order row");
        assert_eq!(order.status, OrderStatus::Unknown);
        assert!(order.items.is_empty());
    }

    #[test]
    fn test_short_id_of_short_value() {
        let order: Order =
            serde_json::from_str(r#"{"id":"abc","status":"pending","total_amount":0.0}"#)
                .expect("valid order row");
        assert_eq!(order.short_id(), "abc");
    }
}
