//! Authentication module for the session lifecycle and credential storage.
//!
//! This module provides:
//! - `SessionManager`: login, logout, and session restoration on startup
//! - `FileSessionStore`: durable storage of the active session blob
//! - `CredentialMemory`: OS keychain storage of the last-used password
//!
//! Sessions have no expiry; they persist until an explicit logout.

pub mod credentials;
pub mod session;

pub use credentials::CredentialMemory;
pub use session::{FileSessionStore, LoginError, SessionManager};
