//! HTTP client for the hosted table API.
//!
//! Thin wrapper over reqwest that translates the dashboard's queries into
//! PostgREST-style requests: `select` with equality/order filters, `insert`
//! via POST, `update` via PATCH on `id=eq.{id}`, `delete` likewise.

use std::time::Duration;

use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::api::ApiError;
use crate::models::{Customer, Expense, Order, Product, UserRecord};

/// HTTP request timeout in seconds.
/// The store either answers quickly or not at all; fail fast for the UI.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Table endpoints live under this path on the project host.
const REST_PATH: &str = "rest/v1";

/// Column list for order queries, embedding the related customer and the
/// line items with their product info.
const ORDER_SELECT: &str = "*,customers(name,email),order_items(*,products(name,price))";

/// API client for the hosted store.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}/{}", self.base_url, REST_PATH, table)
    }

    fn request(&self, method: Method, table: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Check if a response is successful, returning an error with body if not.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, ApiError> {
        debug!(table, "Selecting rows");
        let response = self.request(Method::GET, table).query(query).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn insert<T: Serialize>(&self, table: &str, row: &T) -> Result<(), ApiError> {
        debug!(table, "Inserting row");
        // The endpoint expects an array of rows
        let response = self
            .request(Method::POST, table)
            .header("Prefer", "return=minimal")
            .json(&[row])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn update<T: Serialize>(&self, table: &str, id: &str, patch: &T) -> Result<(), ApiError> {
        debug!(table, id, "Updating row");
        let id_filter = format!("eq.{}", id);
        let response = self
            .request(Method::PATCH, table)
            .query(&[("id", id_filter.as_str())])
            .json(patch)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), ApiError> {
        debug!(table, id, "Deleting row");
        let id_filter = format!("eq.{}", id);
        let response = self
            .request(Method::DELETE, table)
            .query(&[("id", id_filter.as_str())])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    // ===== Users =====

    /// Select user rows matching both username and password by equality.
    ///
    /// The store compares the password column as stored; no hashing happens
    /// on either side. Returns all matching rows so the caller can require
    /// exactly one.
    pub async fn find_users(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Vec<UserRecord>, ApiError> {
        let username_filter = format!("eq.{}", username);
        let password_filter = format!("eq.{}", password);
        self.select(
            "users",
            &[
                ("select", "*"),
                ("username", username_filter.as_str()),
                ("password", password_filter.as_str()),
            ],
        )
        .await
    }

    // ===== Customers =====

    pub async fn fetch_customers(&self) -> Result<Vec<Customer>, ApiError> {
        self.select("customers", &[("select", "*"), ("order", "name.asc")])
            .await
    }

    pub async fn create_customer(&self, customer: &Customer) -> Result<(), ApiError> {
        self.insert("customers", customer).await
    }

    pub async fn update_customer(&self, id: &str, customer: &Customer) -> Result<(), ApiError> {
        self.update("customers", id, customer).await
    }

    pub async fn delete_customer(&self, id: &str) -> Result<(), ApiError> {
        self.delete("customers", id).await
    }

    // ===== Products =====

    pub async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        self.select("products", &[("select", "*"), ("order", "name.asc")])
            .await
    }

    pub async fn create_product(&self, product: &Product) -> Result<(), ApiError> {
        self.insert("products", product).await
    }

    pub async fn update_product(&self, id: &str, product: &Product) -> Result<(), ApiError> {
        self.update("products", id, product).await
    }

    pub async fn delete_product(&self, id: &str) -> Result<(), ApiError> {
        self.delete("products", id).await
    }

    // ===== Orders =====

    /// Fetch all orders, newest first, with embedded customer and line items.
    pub async fn fetch_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.select(
            "orders",
            &[("select", ORDER_SELECT), ("order", "order_date.desc")],
        )
        .await
    }

    // ===== Expenses =====

    pub async fn fetch_expenses(&self) -> Result<Vec<Expense>, ApiError> {
        self.select(
            "expenses",
            &[("select", "*"), ("order", "expense_date.desc")],
        )
        .await
    }

    pub async fn create_expense(&self, expense: &Expense) -> Result<(), ApiError> {
        self.insert("expenses", expense).await
    }

    pub async fn update_expense(&self, id: &str, expense: &Expense) -> Result<(), ApiError> {
        self.update("expenses", id, expense).await
    }

    pub async fn delete_expense(&self, id: &str) -> Result<(), ApiError> {
        self.delete("expenses", id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url_strips_trailing_slash() {
        let api = ApiClient::new("https://project.example.com/", "key").expect("client");
        assert_eq!(
            api.table_url("customers"),
            "https://project.example.com/rest/v1/customers"
        );
    }

    #[test]
    fn test_order_select_embeds_relations() {
        assert!(ORDER_SELECT.contains("customers(name,email)"));
        assert!(ORDER_SELECT.contains("order_items(*,products(name,price))"));
    }
}
