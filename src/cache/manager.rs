use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{Customer, Expense, Order, Product};

/// Consider cache stale after 1 hour.
/// Balances freshness with reducing unnecessary API calls for slowly-changing data.
const CACHE_STALE_MINUTES: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Negative ages from clock skew also land here
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            let remaining_mins = minutes % 60;
            if remaining_mins >= 30 {
                // Round up: 1h 30m+ becomes 2h
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            let remaining_hours = (minutes % 1440) / 60;
            if remaining_hours >= 12 {
                // Round up: 1d 12h+ becomes 2d
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let path = self.cache_path(name);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&path, contents)?;
        Ok(())
    }

    // ===== Customers =====

    pub fn load_customers(&self) -> Result<Option<CachedData<Vec<Customer>>>> {
        self.load("customers")
    }

    pub fn save_customers(&self, customers: &[Customer]) -> Result<()> {
        self.save("customers", &customers)
    }

    // ===== Products =====

    pub fn load_products(&self) -> Result<Option<CachedData<Vec<Product>>>> {
        self.load("products")
    }

    pub fn save_products(&self, products: &[Product]) -> Result<()> {
        self.save("products", &products)
    }

    // ===== Orders =====

    pub fn load_orders(&self) -> Result<Option<CachedData<Vec<Order>>>> {
        self.load("orders")
    }

    pub fn save_orders(&self, orders: &[Order]) -> Result<()> {
        self.save("orders", &orders)
    }

    // ===== Expenses =====

    pub fn load_expenses(&self) -> Result<Option<CachedData<Vec<Expense>>>> {
        self.load("expenses")
    }

    pub fn save_expenses(&self, expenses: &[Expense]) -> Result<()> {
        self.save("expenses", &expenses)
    }

    // ===== Cache Age Information =====

    /// Helper to load cache and log errors without failing
    fn load_age<T>(
        &self,
        name: &str,
        loader: impl FnOnce() -> Result<Option<CachedData<T>>>,
    ) -> Option<String> {
        match loader() {
            Ok(Some(cached)) => Some(cached.age_display()),
            Ok(None) => None,
            Err(e) => {
                debug!(cache = name, error = %e, "Failed to load cache for age display");
                None
            }
        }
    }

    pub fn get_cache_ages(&self) -> CacheAges {
        CacheAges {
            customers: self.load_age("customers", || self.load_customers()),
            products: self.load_age("products", || self.load_products()),
            orders: self.load_age("orders", || self.load_orders()),
            expenses: self.load_age("expenses", || self.load_expenses()),
        }
    }

    /// Helper to check staleness and log errors without failing
    fn is_cache_stale<T>(
        &self,
        name: &str,
        loader: impl FnOnce() -> Result<Option<CachedData<T>>>,
    ) -> bool {
        match loader() {
            Ok(Some(cached)) => cached.is_stale(),
            Ok(None) => true, // No cache = stale
            Err(e) => {
                debug!(cache = name, error = %e, "Failed to load cache for staleness check");
                true // Error reading = treat as stale
            }
        }
    }

    /// Check if any of the cached datasets is stale
    pub fn any_stale(&self) -> bool {
        let stale_checks = [
            self.is_cache_stale("customers", || self.load_customers()),
            self.is_cache_stale("products", || self.load_products()),
            self.is_cache_stale("orders", || self.load_orders()),
            self.is_cache_stale("expenses", || self.load_expenses()),
        ];
        stale_checks.iter().any(|&stale| stale)
    }
}

#[derive(Debug, Default)]
pub struct CacheAges {
    pub customers: Option<String>,
    pub products: Option<String>,
    pub orders: Option<String>,
    pub expenses: Option<String>,
}

impl CacheAges {
    /// Returns the most recent update time across all cache types
    pub fn last_updated(&self) -> String {
        let ages = [&self.orders, &self.customers, &self.products, &self.expenses];

        for a in ages.iter().copied().flatten() {
            return a.clone();
        }

        "never".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_cached_data_age_display_just_now() {
        let cached = CachedData::new(vec![1, 2, 3]);
        assert_eq!(cached.age_display(), "just now");
    }

    #[test]
    fn test_cached_data_is_stale() {
        let fresh = CachedData::new(vec![1]);
        assert!(!fresh.is_stale());

        let mut old = CachedData::new(vec![1]);
        old.cached_at = Utc::now() - Duration::minutes(61);
        assert!(old.is_stale());
    }

    #[test]
    fn test_cached_data_age_display_hours() {
        let mut cached = CachedData::new(vec![1]);
        cached.cached_at = Utc::now() - Duration::minutes(125);
        assert_eq!(cached.age_display(), "2h ago");
    }

    #[test]
    fn test_cache_ages_last_updated_with_values() {
        let ages = CacheAges {
            customers: Some("5m ago".to_string()),
            products: None,
            orders: None,
            expenses: None,
        };
        assert_eq!(ages.last_updated(), "5m ago");
    }

    #[test]
    fn test_cache_ages_last_updated_empty() {
        let ages = CacheAges::default();
        assert_eq!(ages.last_updated(), "never");
    }

    #[test]
    fn test_cache_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = CacheManager::new(dir.path().to_path_buf()).expect("manager");

        assert!(manager.load_customers().expect("load").is_none());

        let customers = vec![Customer {
            id: Some("c1".to_string()),
            name: "Acme".to_string(),
            email: None,
            phone: None,
            address: None,
            created_at: None,
        }];
        manager.save_customers(&customers).expect("save");

        let cached = manager.load_customers().expect("load").expect("present");
        assert_eq!(cached.data.len(), 1);
        assert_eq!(cached.data[0].name, "Acme");
        assert!(!cached.is_stale());
    }
}
