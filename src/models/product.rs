use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stock level below which a product shows up in the low-stock alert.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock_quantity: i64,
    pub category: Option<String>,
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn category_display(&self) -> &str {
        self.category.as_deref().unwrap_or("Uncategorized")
    }

    pub fn sku_display(&self) -> &str {
        self.sku.as_deref().unwrap_or("-")
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity < LOW_STOCK_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_stock_boundary() {
        let mut p = Product {
            name: "Widget".to_string(),
            stock_quantity: 9,
            ..Default::default()
        };
        assert!(p.is_low_stock());
        p.stock_quantity = 10;
        assert!(!p.is_low_stock());
    }

    #[test]
    fn test_parse_product_row() {
        let json = r#"{"id":"a1","name":"Widget","description":null,"price":19.99,"stock_quantity":3,"category":"Hardware","sku":"WID-001","created_at":"2024-03-01T12:00:00Z"}"#;
        let p: Product = serde_json::from_str(json).expect("valid product row");
        assert_eq!(p.price, 19.99);
        assert_eq!(p.category_display(), "Hardware");
        assert!(p.is_low_stock());
    }
}
