//! Tab-specific rendering, one module per tab.

pub mod analytics;
pub mod customers;
pub mod dashboard;
pub mod expenses;
pub mod inventory;
pub mod sales;
