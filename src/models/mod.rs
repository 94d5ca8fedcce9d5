//! Data models for the business entities.
//!
//! Each struct maps one remote table with fixed, named, typed fields:
//!
//! - `UserRecord`: the `users` table row used for login
//! - `Customer`, `Product`, `Expense`: editable entities
//! - `Order`, `OrderItem`: sales data with embedded customer/product info

pub mod customer;
pub mod expense;
pub mod order;
pub mod product;
pub mod user;

pub use customer::Customer;
pub use expense::Expense;
pub use order::{Order, OrderStatus};
pub use product::Product;
pub use user::UserRecord;
