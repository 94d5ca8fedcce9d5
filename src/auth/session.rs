//! Session lifecycle: login, logout, and restoration on startup.
//!
//! `SessionManager` owns the single active session for the process. It is
//! constructed once with its three collaborators injected: a
//! `CredentialSource` that checks username/password against the remote
//! `users` table, a `SessionStore` that persists the session blob across
//! restarts, and a `Notifier` for the user-facing outcome toasts.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::models::UserRecord;
use crate::notify::{Notifier, Severity};

/// File name of the persisted session blob in the config directory.
const SESSION_FILE: &str = "session.json";

/// Why a credential lookup did not produce a usable record.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("no user matched the given credentials")]
    NotFound,

    #[error("{0} users matched the given credentials")]
    Ambiguous(usize),

    #[error("credential store fault: {0}")]
    Store(#[from] crate::api::ApiError),
}

/// Looks up the single user record matching both username and password.
///
/// Matching is plain column equality on the remote table, password
/// included; that is the observed contract of the store, not a scheme this
/// client gets to change.
pub trait CredentialSource {
    fn find_user(
        &self,
        username: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<UserRecord, LookupError>> + Send;
}

impl CredentialSource for crate::api::ApiClient {
    async fn find_user(&self, username: &str, password: &str) -> Result<UserRecord, LookupError> {
        let mut rows = self.find_users(username, password).await?;
        match rows.len() {
            1 => Ok(rows.remove(0)),
            0 => Err(LookupError::NotFound),
            n => Err(LookupError::Ambiguous(n)),
        }
    }
}

/// Durable key-value persistence for the session blob. The key is fixed;
/// each method operates on the one stored value.
pub trait SessionStore {
    fn get(&self) -> Result<Option<String>>;
    fn set(&self, value: &str) -> Result<()>;
    fn remove(&self) -> Result<()>;
}

/// Stores the session blob as a JSON file in the config directory,
/// surviving restarts the way browser local storage would.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            path: dir.join(SESSION_FILE),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents =
            std::fs::read_to_string(&self.path).context("Failed to read session file")?;
        Ok(Some(contents))
    }

    fn set(&self, value: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, value).context("Failed to write session file")?;
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).context("Failed to remove session file")?;
        }
        Ok(())
    }
}

/// Login failure as seen by the caller. Both variants surface to the user
/// as the same generic notification; the distinction exists for logs.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("credential store fault: {0}")]
    Store(crate::api::ApiError),
}

/// Two states: anonymous (`current() == None`) and authenticated. Login is
/// the only way in, logout the only way out; `restore` picks whichever
/// state the previous run left behind.
pub struct SessionManager<C, S, N> {
    credentials: C,
    store: S,
    notifier: N,
    current: Option<UserRecord>,
}

impl<C, S, N> SessionManager<C, S, N>
where
    C: CredentialSource,
    S: SessionStore,
    N: Notifier,
{
    pub fn new(credentials: C, store: S, notifier: N) -> Self {
        Self {
            credentials,
            store,
            notifier,
            current: None,
        }
    }

    /// Restore a persisted session, if one exists. Called once at startup.
    ///
    /// Absent or malformed data leaves the manager anonymous; nothing is
    /// reported to the caller and no notification is raised.
    pub fn restore(&mut self) {
        match self.store.get() {
            Ok(Some(raw)) => match serde_json::from_str::<UserRecord>(&raw) {
                Ok(user) => {
                    info!(username = %user.username, "Restored session");
                    self.current = Some(user);
                }
                Err(e) => {
                    debug!(error = %e, "Discarding malformed stored session");
                }
            },
            Ok(None) => {
                debug!("No stored session");
            }
            Err(e) => {
                debug!(error = %e, "Failed to read stored session");
            }
        }
    }

    /// Verify credentials against the store and activate the session.
    ///
    /// Zero matches, multiple matches, and store faults all produce the
    /// same user-visible failure; only the log tells them apart. On
    /// success the record is persisted so the next start can restore it.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), LoginError> {
        match self.credentials.find_user(username, password).await {
            Ok(user) => {
                match serde_json::to_string(&user) {
                    Ok(blob) => {
                        if let Err(e) = self.store.set(&blob) {
                            warn!(error = %e, "Failed to persist session");
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to serialize session");
                    }
                }
                info!(username = %user.username, "Login successful");
                self.current = Some(user);
                self.notifier.notify(
                    "Login Successful",
                    Some("Welcome to your business dashboard!"),
                    Severity::Normal,
                );
                Ok(())
            }
            Err(LookupError::Store(e)) => {
                warn!(error = %e, username, "Credential store fault during login");
                self.notify_login_failed();
                Err(LoginError::Store(e))
            }
            Err(e) => {
                // NotFound and Ambiguous; detail stays in the log so the
                // notification can't be used to enumerate accounts.
                debug!(error = %e, username, "Login rejected");
                self.notify_login_failed();
                Err(LoginError::InvalidCredentials)
            }
        }
    }

    fn notify_login_failed(&self) {
        self.notifier.notify(
            "Login Failed",
            Some("Invalid username or password"),
            Severity::Destructive,
        );
    }

    /// Clear the active session from memory and persistence.
    ///
    /// No preconditions; calling this while anonymous is a no-op that
    /// still clears persistence and still raises the notification.
    pub fn logout(&mut self) {
        self.current = None;
        if let Err(e) = self.store.remove() {
            warn!(error = %e, "Failed to clear persisted session");
        }
        info!("Logged out");
        self.notifier.notify(
            "Logged Out",
            Some("You have been successfully logged out"),
            Severity::Normal,
        );
    }

    /// The active session, if any. Pure in-memory read.
    pub fn current(&self) -> Option<&UserRecord> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::notify::Notification;
    use std::cell::RefCell;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn user(id: &str, username: &str, password: &str) -> UserRecord {
        UserRecord {
            id: id.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            created_at: None,
        }
    }

    /// In-memory credential table with call counting.
    struct FakeCredentials {
        users: Vec<UserRecord>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeCredentials {
        fn with_users(users: Vec<UserRecord>) -> Self {
            Self {
                users,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn faulty() -> Self {
            Self {
                users: Vec::new(),
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl CredentialSource for &FakeCredentials {
        async fn find_user(
            &self,
            username: &str,
            password: &str,
        ) -> Result<UserRecord, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(LookupError::Store(ApiError::InvalidResponse(
                    "connection reset".to_string(),
                )));
            }
            let matches: Vec<_> = self
                .users
                .iter()
                .filter(|u| u.username == username && u.password == password)
                .cloned()
                .collect();
            match matches.len() {
                1 => Ok(matches.into_iter().next().expect("one match")),
                0 => Err(LookupError::NotFound),
                n => Err(LookupError::Ambiguous(n)),
            }
        }
    }

    /// In-memory stand-in for the persisted session blob.
    #[derive(Default)]
    struct MemoryStore {
        value: RefCell<Option<String>>,
    }

    impl SessionStore for &MemoryStore {
        fn get(&self) -> Result<Option<String>> {
            Ok(self.value.borrow().clone())
        }

        fn set(&self, value: &str) -> Result<()> {
            *self.value.borrow_mut() = Some(value.to_string());
            Ok(())
        }

        fn remove(&self) -> Result<()> {
            *self.value.borrow_mut() = None;
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        raised: RefCell<Vec<Notification>>,
    }

    impl Notifier for &RecordingNotifier {
        fn notify(&self, title: &str, description: Option<&str>, severity: Severity) {
            self.raised.borrow_mut().push(Notification {
                title: title.to_string(),
                description: description.map(str::to_string),
                severity,
            });
        }
    }

    fn manager<'a>(
        credentials: &'a FakeCredentials,
        store: &'a MemoryStore,
        notifier: &'a RecordingNotifier,
    ) -> SessionManager<&'a FakeCredentials, &'a MemoryStore, &'a RecordingNotifier> {
        SessionManager::new(credentials, store, notifier)
    }

    #[tokio::test]
    async fn test_login_success_sets_and_persists_session() {
        let credentials = FakeCredentials::with_users(vec![user("1", "admin", "secret")]);
        let store = MemoryStore::default();
        let notifier = RecordingNotifier::default();
        let mut sessions = manager(&credentials, &store, &notifier);

        sessions.login("admin", "secret").await.expect("login");

        let active = sessions.current().expect("active session");
        assert_eq!(active.username, "admin");
        let blob = store.value.borrow().clone().expect("persisted");
        let persisted: UserRecord = serde_json::from_str(&blob).expect("valid blob");
        assert_eq!(&persisted, active);

        let raised = notifier.raised.borrow();
        assert_eq!(raised.len(), 1);
        assert_eq!(raised[0].title, "Login Successful");
        assert_eq!(raised[0].severity, Severity::Normal);
    }

    #[tokio::test]
    async fn test_login_wrong_password_fails_and_session_stays_unset() {
        let credentials = FakeCredentials::with_users(vec![user("1", "admin", "secret")]);
        let store = MemoryStore::default();
        let notifier = RecordingNotifier::default();
        let mut sessions = manager(&credentials, &store, &notifier);

        let err = sessions.login("admin", "wrong").await.unwrap_err();
        assert!(matches!(err, LoginError::InvalidCredentials));
        assert!(sessions.current().is_none());
        assert!(store.value.borrow().is_none());
    }

    #[tokio::test]
    async fn test_login_unknown_user_fails() {
        let credentials = FakeCredentials::with_users(vec![user("1", "admin", "secret")]);
        let store = MemoryStore::default();
        let notifier = RecordingNotifier::default();
        let mut sessions = manager(&credentials, &store, &notifier);

        let err = sessions.login("nope", "anything").await.unwrap_err();
        assert!(matches!(err, LoginError::InvalidCredentials));
        assert!(sessions.current().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_matches_collapse_to_invalid_credentials() {
        let credentials = FakeCredentials::with_users(vec![
            user("1", "admin", "secret"),
            user("2", "admin", "secret"),
        ]);
        let store = MemoryStore::default();
        let notifier = RecordingNotifier::default();
        let mut sessions = manager(&credentials, &store, &notifier);

        let err = sessions.login("admin", "secret").await.unwrap_err();
        assert!(matches!(err, LoginError::InvalidCredentials));
        assert!(sessions.current().is_none());
    }

    #[tokio::test]
    async fn test_store_fault_raises_same_notification_as_bad_credentials() {
        let credentials = FakeCredentials::faulty();
        let store = MemoryStore::default();
        let notifier = RecordingNotifier::default();
        let mut sessions = manager(&credentials, &store, &notifier);

        let err = sessions.login("admin", "secret").await.unwrap_err();
        assert!(matches!(err, LoginError::Store(_)));
        assert!(sessions.current().is_none());

        let raised = notifier.raised.borrow();
        assert_eq!(raised[0].title, "Login Failed");
        assert_eq!(raised[0].severity, Severity::Destructive);
    }

    #[tokio::test]
    async fn test_logout_clears_memory_and_persistence() {
        let credentials = FakeCredentials::with_users(vec![user("1", "admin", "secret")]);
        let store = MemoryStore::default();
        let notifier = RecordingNotifier::default();
        let mut sessions = manager(&credentials, &store, &notifier);

        sessions.login("admin", "secret").await.expect("login");
        sessions.logout();

        assert!(sessions.current().is_none());
        assert!(store.value.borrow().is_none());

        // A fresh manager restoring from the same store stays anonymous
        let mut restored = manager(&credentials, &store, &notifier);
        restored.restore();
        assert!(restored.current().is_none());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent_and_always_notifies() {
        let credentials = FakeCredentials::with_users(vec![]);
        let store = MemoryStore::default();
        let notifier = RecordingNotifier::default();
        let mut sessions = manager(&credentials, &store, &notifier);

        sessions.logout();
        sessions.logout();

        assert!(sessions.current().is_none());
        assert!(store.value.borrow().is_none());
        let raised = notifier.raised.borrow();
        assert_eq!(raised.len(), 2);
        assert!(raised.iter().all(|n| n.title == "Logged Out"));
    }

    #[tokio::test]
    async fn test_restore_reproduces_session_without_credential_lookup() {
        let original = user("1", "admin", "secret");
        let credentials = FakeCredentials::with_users(vec![original.clone()]);
        let store = MemoryStore::default();
        let notifier = RecordingNotifier::default();

        *store.value.borrow_mut() =
            Some(serde_json::to_string(&original).expect("serialize"));

        let mut sessions = manager(&credentials, &store, &notifier);
        sessions.restore();

        assert_eq!(sessions.current(), Some(&original));
        assert_eq!(credentials.calls.load(Ordering::SeqCst), 0);
        assert!(notifier.raised.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_restore_discards_corrupt_blob() {
        let credentials = FakeCredentials::with_users(vec![]);
        let store = MemoryStore::default();
        let notifier = RecordingNotifier::default();

        *store.value.borrow_mut() = Some("{not json".to_string());

        let mut sessions = manager(&credentials, &store, &notifier);
        sessions.restore();

        assert!(sessions.current().is_none());
        assert!(notifier.raised.borrow().is_empty());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path().to_path_buf());

        assert!(store.get().expect("get").is_none());
        store.set("{\"k\":1}").expect("set");
        assert_eq!(store.get().expect("get").as_deref(), Some("{\"k\":1}"));
        store.remove().expect("remove");
        assert!(store.get().expect("get").is_none());
        // Removing again is fine
        store.remove().expect("remove twice");
    }
}
