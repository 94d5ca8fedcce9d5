//! Local memory of the last-used login, kept in the OS keychain.
//!
//! This only prefills the login form on the next start; the actual
//! credential check always goes to the remote `users` table.

use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "shopkeep";

pub struct CredentialMemory;

impl CredentialMemory {
    /// Remember the password for a username in the OS keychain
    pub fn store(username: &str, password: &str) -> Result<()> {
        let entry =
            Entry::new(SERVICE_NAME, username).context("Failed to create keyring entry")?;
        entry
            .set_password(password)
            .context("Failed to store password in keychain")?;
        Ok(())
    }

    /// Retrieve the remembered password for a username
    pub fn get_password(username: &str) -> Result<String> {
        let entry =
            Entry::new(SERVICE_NAME, username).context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("Failed to retrieve password from keychain")
    }

    /// Forget the remembered password for a username
    pub fn forget(username: &str) -> Result<()> {
        let entry =
            Entry::new(SERVICE_NAME, username).context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete credential from keychain")?;
        Ok(())
    }

    /// Check if a password is remembered for a username
    pub fn has_password(username: &str) -> bool {
        if let Ok(entry) = Entry::new(SERVICE_NAME, username) {
            entry.get_password().is_ok()
        } else {
            false
        }
    }
}
