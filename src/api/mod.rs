//! REST client module for the hosted table API.
//!
//! The backend exposes each table through a PostgREST-style endpoint
//! (`/rest/v1/{table}`) with query-string filters. `ApiClient` wraps the
//! handful of selects and mutations the dashboard needs; every call is
//! authenticated with the project API key.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
