//! Application state management for Shopkeep.
//!
//! This module contains the core `App` struct that manages all application state,
//! including UI state, cached data, session lifecycle, and background task
//! coordination.

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::ApiClient;
use crate::auth::{CredentialMemory, FileSessionStore, LoginError, SessionManager};
use crate::cache::{CacheAges, CacheManager};
use crate::config::Config;
use crate::models::{Customer, Expense, Order, Product};
use crate::notify::{Notifier, Severity, ToastQueue};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// 16 covers a full refresh (4 fetches) plus queued mutation results.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Maximum length for username input
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for a form field value
const MAX_FIELD_LENGTH: usize = 120;

/// Number of items to scroll on page up/down
pub const PAGE_SCROLL_SIZE: usize = 10;

/// How many orders the dashboard shows in its recent activity panel
pub const RECENT_ORDERS_LIMIT: usize = 5;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Sales,
    Inventory,
    Customers,
    Analytics,
    Expenses,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Sales => "Sales",
            Tab::Inventory => "Inventory",
            Tab::Customers => "Customers",
            Tab::Analytics => "Analytics",
            Tab::Expenses => "Expenses",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Sales,
            Tab::Sales => Tab::Inventory,
            Tab::Inventory => Tab::Customers,
            Tab::Customers => Tab::Analytics,
            Tab::Analytics => Tab::Expenses,
            Tab::Expenses => Tab::Dashboard,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Expenses,
            Tab::Sales => Tab::Dashboard,
            Tab::Inventory => Tab::Sales,
            Tab::Customers => Tab::Inventory,
            Tab::Analytics => Tab::Customers,
            Tab::Expenses => Tab::Analytics,
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    LoggingIn,
    EditingForm,
    ConfirmingDelete,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
}

// ============================================================================
// Entity Forms
// ============================================================================

/// Which entity an open form edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Customer,
    Product,
    Expense,
}

/// A single labeled text field inside an entity form
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
}

impl FormField {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// A validated record produced by submitting a form
#[derive(Debug, Clone)]
pub enum FormOutput {
    Customer(Customer),
    Product(Product),
    Expense(Expense),
}

/// An in-progress add/edit form for one of the CRUD entities.
///
/// Fields are plain text until submit; `build` parses and validates them
/// into a typed record, returning a user-facing message on failure.
#[derive(Debug, Clone)]
pub struct EntityForm {
    pub kind: FormKind,
    pub title: String,
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub editing: Option<String>,
    pub error: Option<String>,
}

impl EntityForm {
    pub fn customer(existing: Option<&Customer>) -> Self {
        let title = if existing.is_some() {
            "Edit Customer"
        } else {
            "Add Customer"
        };
        let get = |f: fn(&Customer) -> Option<&str>| {
            existing.and_then(f).unwrap_or_default().to_string()
        };
        Self {
            kind: FormKind::Customer,
            title: title.to_string(),
            fields: vec![
                FormField::new("Name", existing.map(|c| c.name.as_str()).unwrap_or_default()),
                FormField::new("Email", get(|c| c.email.as_deref())),
                FormField::new("Phone", get(|c| c.phone.as_deref())),
                FormField::new("Address", get(|c| c.address.as_deref())),
            ],
            focus: 0,
            editing: existing.and_then(|c| c.id.clone()),
            error: None,
        }
    }

    pub fn product(existing: Option<&Product>) -> Self {
        let title = if existing.is_some() {
            "Edit Product"
        } else {
            "Add Product"
        };
        Self {
            kind: FormKind::Product,
            title: title.to_string(),
            fields: vec![
                FormField::new("Name", existing.map(|p| p.name.as_str()).unwrap_or_default()),
                FormField::new(
                    "Price",
                    existing.map(|p| format!("{:.2}", p.price)).unwrap_or_default(),
                ),
                FormField::new(
                    "Stock",
                    existing
                        .map(|p| p.stock_quantity.to_string())
                        .unwrap_or_default(),
                ),
                FormField::new(
                    "Category",
                    existing
                        .and_then(|p| p.category.as_deref())
                        .unwrap_or_default(),
                ),
                FormField::new(
                    "SKU",
                    existing.and_then(|p| p.sku.as_deref()).unwrap_or_default(),
                ),
                FormField::new(
                    "Description",
                    existing
                        .and_then(|p| p.description.as_deref())
                        .unwrap_or_default(),
                ),
            ],
            focus: 0,
            editing: existing.and_then(|p| p.id.clone()),
            error: None,
        }
    }

    pub fn expense(existing: Option<&Expense>) -> Self {
        let title = if existing.is_some() {
            "Edit Expense"
        } else {
            "Add Expense"
        };
        let date = existing
            .map(|e| e.expense_date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| chrono::Local::now().date_naive().format("%Y-%m-%d").to_string());
        Self {
            kind: FormKind::Expense,
            title: title.to_string(),
            fields: vec![
                FormField::new(
                    "Description",
                    existing.map(|e| e.description.as_str()).unwrap_or_default(),
                ),
                FormField::new(
                    "Amount",
                    existing.map(|e| format!("{:.2}", e.amount)).unwrap_or_default(),
                ),
                FormField::new(
                    "Category",
                    existing
                        .and_then(|e| e.category.as_deref())
                        .unwrap_or_default(),
                ),
                FormField::new("Date", date),
            ],
            focus: 0,
            editing: existing.and_then(|e| e.id.clone()),
            error: None,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = if self.focus == 0 {
            self.fields.len() - 1
        } else {
            self.focus - 1
        };
    }

    fn field(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(|f| f.value.trim())
            .unwrap_or_default()
    }

    fn optional_field(&self, index: usize) -> Option<String> {
        let value = self.field(index);
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    /// Parse the form into a typed record, or return a user-facing message
    pub fn build(&self) -> Result<FormOutput, String> {
        match self.kind {
            FormKind::Customer => {
                let name = self.field(0);
                if name.is_empty() {
                    return Err("Name is required".to_string());
                }
                Ok(FormOutput::Customer(Customer {
                    id: None,
                    name: name.to_string(),
                    email: self.optional_field(1),
                    phone: self.optional_field(2),
                    address: self.optional_field(3),
                    created_at: None,
                }))
            }
            FormKind::Product => {
                let name = self.field(0);
                if name.is_empty() {
                    return Err("Name is required".to_string());
                }
                let price: f64 = self
                    .field(1)
                    .parse()
                    .map_err(|_| "Price must be a number".to_string())?;
                if price < 0.0 {
                    return Err("Price cannot be negative".to_string());
                }
                let stock: i64 = self
                    .field(2)
                    .parse()
                    .map_err(|_| "Stock must be a whole number".to_string())?;
                if stock < 0 {
                    return Err("Stock cannot be negative".to_string());
                }
                Ok(FormOutput::Product(Product {
                    id: None,
                    name: name.to_string(),
                    description: self.optional_field(5),
                    price,
                    stock_quantity: stock,
                    category: self.optional_field(3),
                    sku: self.optional_field(4),
                    created_at: None,
                }))
            }
            FormKind::Expense => {
                let description = self.field(0);
                if description.is_empty() {
                    return Err("Description is required".to_string());
                }
                let amount: f64 = self
                    .field(1)
                    .parse()
                    .map_err(|_| "Amount must be a number".to_string())?;
                if amount < 0.0 {
                    return Err("Amount cannot be negative".to_string());
                }
                let expense_date = NaiveDate::parse_from_str(self.field(3), "%Y-%m-%d")
                    .map_err(|_| "Date must be YYYY-MM-DD".to_string())?;
                Ok(FormOutput::Expense(Expense {
                    id: None,
                    description: description.to_string(),
                    amount,
                    category: self.optional_field(2),
                    expense_date,
                    created_at: None,
                }))
            }
        }
    }
}

/// A delete awaiting confirmation
#[derive(Debug, Clone)]
pub struct PendingDelete {
    pub collection: Collection,
    pub id: String,
    pub label: String,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// One of the four remote datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Customers,
    Products,
    Orders,
    Expenses,
}

impl Collection {
    pub fn title(&self) -> &'static str {
        match self {
            Collection::Customers => "Customers",
            Collection::Products => "Products",
            Collection::Orders => "Orders",
            Collection::Expenses => "Expenses",
        }
    }
}

/// Result types from background tasks.
///
/// These variants are sent through an MPSC channel from spawned fetch and
/// mutation tasks back to the main event loop.
enum RefreshResult {
    Customers(Vec<Customer>),
    Products(Vec<Product>),
    Orders(Vec<Order>),
    Expenses(Vec<Expense>),
    /// A create/update/delete completed; refetch the affected collection
    MutationDone {
        message: String,
        affected: Collection,
    },
    /// A create/update/delete failed
    MutationFailed(String),
    /// Signal that a full refresh pass has finished
    RefreshComplete,
    /// An error occurred during refresh
    Error(String),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub sessions: SessionManager<ApiClient, FileSessionStore, ToastQueue>,
    pub api: ApiClient,
    pub cache: CacheManager,
    pub toasts: ToastQueue,

    // UI state
    pub state: AppState,
    pub current_tab: Tab,

    // Login form state
    pub login_username: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Selection indices
    pub sales_selection: usize,
    pub inventory_selection: usize,
    pub customer_selection: usize,
    pub expense_selection: usize,

    // Overlay state
    pub form: Option<EntityForm>,
    pub pending_delete: Option<PendingDelete>,

    // Cached data
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub expenses: Vec<Expense>,

    // Background task channel
    refresh_rx: mpsc::Receiver<RefreshResult>,
    refresh_tx: mpsc::Sender<RefreshResult>,

    // Status message
    pub status_message: Option<String>,

    // Cache ages for status bar
    pub cache_ages: CacheAges,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        debug!("App::new() starting");
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let api_url = config
            .api_url
            .clone()
            .ok_or_else(|| anyhow::anyhow!("API URL not configured; set SHOPKEEP_API_URL"))?;
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("API key not configured; set SHOPKEEP_API_KEY"))?;

        let api = ApiClient::new(&api_url, &api_key)?;

        let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
        debug!(?cache_dir, "Cache directory configured");
        let cache = CacheManager::new(cache_dir)?;

        // The session blob is durable state; it lives next to the config
        // file, not in the purgeable cache directory.
        let session_dir = Config::config_dir().unwrap_or_else(|_| PathBuf::from("."));
        let toasts = ToastQueue::default();
        let sessions = SessionManager::new(
            api.clone(),
            FileSessionStore::new(session_dir),
            toasts.clone(),
        );

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let login_username = config.last_username.clone().unwrap_or_default();

        Ok(Self {
            config,
            sessions,
            api,
            cache,
            toasts,

            state: AppState::Normal,
            current_tab: Tab::Dashboard,

            login_username,
            login_password: String::new(),
            login_focus: LoginFocus::Username,
            login_error: None,

            sales_selection: 0,
            inventory_selection: 0,
            customer_selection: 0,
            expense_selection: 0,

            form: None,
            pending_delete: None,

            customers: Vec::new(),
            products: Vec::new(),
            orders: Vec::new(),
            expenses: Vec::new(),

            refresh_rx: rx,
            refresh_tx: tx,

            status_message: None,
            cache_ages: Default::default(),
        })
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Restore any persisted session, then settle into the login screen or
    /// the dashboard accordingly.
    pub fn restore_session(&mut self) {
        self.sessions.restore();
        if self.sessions.is_authenticated() {
            self.state = AppState::Normal;
        } else {
            self.start_login();
        }
    }

    /// Start the login process (show login overlay)
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        if !self.login_username.is_empty()
            && self.login_password.is_empty()
            && CredentialMemory::has_password(&self.login_username)
        {
            match CredentialMemory::get_password(&self.login_username) {
                Ok(password) => self.login_password = password,
                Err(e) => debug!(error = %e, "No stored password available"),
            }
        }
        self.login_focus = if self.login_username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
    }

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) {
        let username = self.login_username.clone();
        let password = self.login_password.clone();

        if username.is_empty() || password.is_empty() {
            self.login_error = Some("Username and password required".to_string());
            return;
        }

        self.login_error = None;

        match self.sessions.login(&username, &password).await {
            Ok(()) => {
                if let Err(e) = CredentialMemory::store(&username, &password) {
                    warn!(error = %e, "Failed to store credentials");
                }

                self.config.last_username = Some(username);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.login_password.clear();
                self.state = AppState::Normal;
                self.refresh_all_background();
            }
            Err(e) => {
                debug!(error = %e, "Login attempt rejected");
                // A stored password the server rejected is stale; drop it so
                // the next login does not prefill it again.
                if matches!(e, LoginError::InvalidCredentials)
                    && CredentialMemory::has_password(&username)
                {
                    if let Err(e) = CredentialMemory::forget(&username) {
                        debug!(error = %e, "Failed to clear stored credentials");
                    }
                }
                // Deliberately the same message for every failure mode
                self.login_error = Some("Invalid username or password".to_string());
                self.login_password.clear();
            }
        }
    }

    /// Log out and return to the login screen
    pub fn logout(&mut self) {
        self.sessions.logout();
        self.start_login();
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Load all data from cache
    pub fn load_from_cache(&mut self) {
        if let Ok(Some(cached)) = self.cache.load_customers() {
            self.customers = cached.data;
        }

        if let Ok(Some(cached)) = self.cache.load_products() {
            self.products = cached.data;
        }

        if let Ok(Some(cached)) = self.cache.load_orders() {
            self.orders = cached.data;
        }

        if let Ok(Some(cached)) = self.cache.load_expenses() {
            self.expenses = cached.data;
        }

        self.cache_ages = self.cache.get_cache_ages();
    }

    /// Check if any cache data is stale
    pub fn is_cache_stale(&self) -> bool {
        self.cache.any_stale()
    }

    // =========================================================================
    // Background Data Refresh
    // =========================================================================

    /// Spawn a background task to refresh all data
    pub fn refresh_all_background(&mut self) {
        if !self.sessions.is_authenticated() {
            debug!("Skipping refresh, not authenticated");
            return;
        }

        info!("Starting background refresh of all data");

        let api = self.api.clone();
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            Self::execute_background_refresh(tx, api).await;
        });

        self.status_message = Some("Refreshing data...".to_string());
    }

    /// Helper to send refresh results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<RefreshResult>, result: RefreshResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send refresh result - channel closed");
        }
    }

    /// Execute the background refresh task.
    ///
    /// Runs in a spawned Tokio task and fetches all four collections in
    /// parallel. Results are sent back through the MPSC channel as
    /// `RefreshResult` variants. Cloning the client is cheap; it shares the
    /// underlying connection pool.
    async fn execute_background_refresh(tx: mpsc::Sender<RefreshResult>, api: ApiClient) {
        info!("Background refresh task started");

        let api2 = api.clone();
        let api3 = api.clone();
        let api4 = api.clone();

        let (customers_res, products_res, orders_res, expenses_res) = tokio::join!(
            api.fetch_customers(),
            api2.fetch_products(),
            api3.fetch_orders(),
            api4.fetch_expenses(),
        );

        let mut first_error: Option<String> = None;
        let mut note_error = |name: &str, e: &crate::api::ApiError| {
            debug!(error = %e, "{} fetch failed", name);
            if first_error.is_none() {
                first_error = Some(e.to_string());
            }
        };

        match customers_res {
            Ok(data) => Self::send_result(&tx, RefreshResult::Customers(data)).await,
            Err(e) => note_error("Customers", &e),
        }
        match products_res {
            Ok(data) => Self::send_result(&tx, RefreshResult::Products(data)).await,
            Err(e) => note_error("Products", &e),
        }
        match orders_res {
            Ok(data) => Self::send_result(&tx, RefreshResult::Orders(data)).await,
            Err(e) => note_error("Orders", &e),
        }
        match expenses_res {
            Ok(data) => Self::send_result(&tx, RefreshResult::Expenses(data)).await,
            Err(e) => note_error("Expenses", &e),
        }

        if let Some(msg) = first_error {
            Self::send_result(&tx, RefreshResult::Error(msg)).await;
        }

        info!("Background refresh complete");
        Self::send_result(&tx, RefreshResult::RefreshComplete).await;
    }

    /// Spawn a refetch of a single collection, used after mutations
    fn spawn_collection_refresh(&self, collection: Collection) {
        let api = self.api.clone();
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            let result = match collection {
                Collection::Customers => api.fetch_customers().await.map(RefreshResult::Customers),
                Collection::Products => api.fetch_products().await.map(RefreshResult::Products),
                Collection::Orders => api.fetch_orders().await.map(RefreshResult::Orders),
                Collection::Expenses => api.fetch_expenses().await.map(RefreshResult::Expenses),
            };

            match result {
                Ok(refresh) => Self::send_result(&tx, refresh).await,
                Err(e) => {
                    debug!(error = %e, "{} refetch failed", collection.title());
                    Self::send_result(&tx, RefreshResult::Error(e.to_string())).await;
                }
            }
        });
    }

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.refresh_rx.try_recv() {
            results.push(result);
        }

        for result in results {
            self.process_refresh_result(result);
        }
    }

    /// Process a single result from a background task.
    ///
    /// Updates the corresponding app state and caches the data. This is called
    /// by `check_background_tasks` for each result received from the channel.
    fn process_refresh_result(&mut self, result: RefreshResult) {
        match result {
            RefreshResult::Customers(data) => {
                if let Err(e) = self.cache.save_customers(&data) {
                    warn!(error = %e, "Failed to cache customers");
                }
                self.customers = data;
                self.cache_ages = self.cache.get_cache_ages();
                self.clamp_selections();
            }
            RefreshResult::Products(data) => {
                if let Err(e) = self.cache.save_products(&data) {
                    warn!(error = %e, "Failed to cache products");
                }
                self.products = data;
                self.cache_ages = self.cache.get_cache_ages();
                self.clamp_selections();
            }
            RefreshResult::Orders(data) => {
                if let Err(e) = self.cache.save_orders(&data) {
                    warn!(error = %e, "Failed to cache orders");
                }
                self.orders = data;
                self.cache_ages = self.cache.get_cache_ages();
                self.clamp_selections();
            }
            RefreshResult::Expenses(data) => {
                if let Err(e) = self.cache.save_expenses(&data) {
                    warn!(error = %e, "Failed to cache expenses");
                }
                self.expenses = data;
                self.cache_ages = self.cache.get_cache_ages();
                self.clamp_selections();
            }
            RefreshResult::MutationDone { message, affected } => {
                info!(collection = affected.title(), "{}", message);
                self.toasts.notify(&message, None, Severity::Normal);
                self.spawn_collection_refresh(affected);
            }
            RefreshResult::MutationFailed(msg) => {
                error!(error = %msg, "Mutation failed");
                self.toasts
                    .notify("Operation Failed", Some(&msg), Severity::Destructive);
            }
            RefreshResult::RefreshComplete => {
                // Only clear status if it's a progress message, preserve errors
                if let Some(ref msg) = self.status_message {
                    if !msg.starts_with("Error:") {
                        self.status_message = None;
                    }
                }
            }
            RefreshResult::Error(msg) => {
                error!(error = %msg, "Background task error");
                let user_message = if msg.to_lowercase().contains("network")
                    || msg.to_lowercase().contains("connect")
                {
                    "Error: Network error. Check your connection.".to_string()
                } else if msg.to_lowercase().contains("unauthorized") {
                    "Error: Access denied. Check the API key.".to_string()
                } else {
                    format!("Error: {}", msg)
                };
                self.status_message = Some(user_message);
            }
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Open the add form for the current tab, if it supports editing
    pub fn open_add_form(&mut self) {
        let form = match self.current_tab {
            Tab::Inventory => Some(EntityForm::product(None)),
            Tab::Customers => Some(EntityForm::customer(None)),
            Tab::Expenses => Some(EntityForm::expense(None)),
            _ => None,
        };
        if let Some(form) = form {
            self.form = Some(form);
            self.state = AppState::EditingForm;
        }
    }

    /// Open the edit form for the selected row on the current tab
    pub fn open_edit_form(&mut self) {
        let form = match self.current_tab {
            Tab::Inventory => self
                .products
                .get(self.inventory_selection)
                .map(|p| EntityForm::product(Some(p))),
            Tab::Customers => self
                .customers
                .get(self.customer_selection)
                .map(|c| EntityForm::customer(Some(c))),
            Tab::Expenses => self
                .expenses
                .get(self.expense_selection)
                .map(|e| EntityForm::expense(Some(e))),
            _ => None,
        };
        if let Some(form) = form {
            self.form = Some(form);
            self.state = AppState::EditingForm;
        }
    }

    /// Validate and submit the open form. On validation failure the form
    /// stays open with an inline error.
    pub fn submit_form(&mut self) {
        let Some(form) = self.form.take() else {
            return;
        };

        match form.build() {
            Ok(output) => {
                self.spawn_save(output, form.editing.clone());
                self.state = AppState::Normal;
            }
            Err(msg) => {
                let mut form = form;
                form.error = Some(msg);
                self.form = Some(form);
            }
        }
    }

    /// Close the open form without saving
    pub fn cancel_form(&mut self) {
        self.form = None;
        self.state = AppState::Normal;
    }

    fn spawn_save(&self, output: FormOutput, editing: Option<String>) {
        let api = self.api.clone();
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            let (result, message, affected) = match (&output, &editing) {
                (FormOutput::Customer(c), Some(id)) => (
                    api.update_customer(id, c).await,
                    "Customer updated",
                    Collection::Customers,
                ),
                (FormOutput::Customer(c), None) => (
                    api.create_customer(c).await,
                    "Customer added",
                    Collection::Customers,
                ),
                (FormOutput::Product(p), Some(id)) => (
                    api.update_product(id, p).await,
                    "Product updated",
                    Collection::Products,
                ),
                (FormOutput::Product(p), None) => (
                    api.create_product(p).await,
                    "Product added",
                    Collection::Products,
                ),
                (FormOutput::Expense(e), Some(id)) => (
                    api.update_expense(id, e).await,
                    "Expense updated",
                    Collection::Expenses,
                ),
                (FormOutput::Expense(e), None) => (
                    api.create_expense(e).await,
                    "Expense added",
                    Collection::Expenses,
                ),
            };

            match result {
                Ok(()) => {
                    Self::send_result(
                        &tx,
                        RefreshResult::MutationDone {
                            message: message.to_string(),
                            affected,
                        },
                    )
                    .await;
                }
                Err(e) => {
                    Self::send_result(&tx, RefreshResult::MutationFailed(e.to_string())).await;
                }
            }
        });
    }

    /// Ask for confirmation before deleting the selected row
    pub fn request_delete(&mut self) {
        let pending = match self.current_tab {
            Tab::Inventory => self.products.get(self.inventory_selection).and_then(|p| {
                p.id.clone().map(|id| PendingDelete {
                    collection: Collection::Products,
                    id,
                    label: p.name.clone(),
                })
            }),
            Tab::Customers => self.customers.get(self.customer_selection).and_then(|c| {
                c.id.clone().map(|id| PendingDelete {
                    collection: Collection::Customers,
                    id,
                    label: c.name.clone(),
                })
            }),
            Tab::Expenses => self.expenses.get(self.expense_selection).and_then(|e| {
                e.id.clone().map(|id| PendingDelete {
                    collection: Collection::Expenses,
                    id,
                    label: e.description.clone(),
                })
            }),
            _ => None,
        };

        if let Some(pending) = pending {
            self.pending_delete = Some(pending);
            self.state = AppState::ConfirmingDelete;
        }
    }

    /// Execute the confirmed delete
    pub fn confirm_delete(&mut self) {
        let Some(pending) = self.pending_delete.take() else {
            self.state = AppState::Normal;
            return;
        };
        self.state = AppState::Normal;

        let api = self.api.clone();
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            let (result, message) = match pending.collection {
                Collection::Customers => {
                    (api.delete_customer(&pending.id).await, "Customer deleted")
                }
                Collection::Products => (api.delete_product(&pending.id).await, "Product deleted"),
                Collection::Expenses => (api.delete_expense(&pending.id).await, "Expense deleted"),
                Collection::Orders => return,
            };

            match result {
                Ok(()) => {
                    Self::send_result(
                        &tx,
                        RefreshResult::MutationDone {
                            message: message.to_string(),
                            affected: pending.collection,
                        },
                    )
                    .await;
                }
                Err(e) => {
                    Self::send_result(&tx, RefreshResult::MutationFailed(e.to_string())).await;
                }
            }
        });
    }

    /// Dismiss the delete confirmation without deleting
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.state = AppState::Normal;
    }

    // =========================================================================
    // Selection Handling
    // =========================================================================

    /// Number of selectable rows on the current tab
    pub fn selection_len(&self) -> usize {
        match self.current_tab {
            Tab::Sales => self.orders.len(),
            Tab::Inventory => self.products.len(),
            Tab::Customers => self.customers.len(),
            Tab::Expenses => self.expenses.len(),
            Tab::Dashboard | Tab::Analytics => 0,
        }
    }

    fn selection_mut(&mut self) -> Option<&mut usize> {
        match self.current_tab {
            Tab::Sales => Some(&mut self.sales_selection),
            Tab::Inventory => Some(&mut self.inventory_selection),
            Tab::Customers => Some(&mut self.customer_selection),
            Tab::Expenses => Some(&mut self.expense_selection),
            Tab::Dashboard | Tab::Analytics => None,
        }
    }

    /// Current selection index for the active tab
    pub fn selection(&self) -> usize {
        match self.current_tab {
            Tab::Sales => self.sales_selection,
            Tab::Inventory => self.inventory_selection,
            Tab::Customers => self.customer_selection,
            Tab::Expenses => self.expense_selection,
            Tab::Dashboard | Tab::Analytics => 0,
        }
    }

    /// Move the selection on the active tab by a signed offset, clamping
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.selection_len();
        if len == 0 {
            return;
        }
        if let Some(selection) = self.selection_mut() {
            let current = *selection as isize;
            let next = (current + delta).clamp(0, len as isize - 1);
            *selection = next as usize;
        }
    }

    /// Keep all selections within bounds after data changes
    fn clamp_selections(&mut self) {
        let clamp = |sel: &mut usize, len: usize| {
            if len == 0 {
                *sel = 0;
            } else if *sel >= len {
                *sel = len - 1;
            }
        };
        clamp(&mut self.sales_selection, self.orders.len());
        clamp(&mut self.inventory_selection, self.products.len());
        clamp(&mut self.customer_selection, self.customers.len());
        clamp(&mut self.expense_selection, self.expenses.len());
    }

    /// The order highlighted on the Sales tab
    pub fn selected_order(&self) -> Option<&Order> {
        self.orders.get(self.sales_selection)
    }
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a username character should be accepted
pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

/// Check if a form field character should be accepted
pub fn can_add_field_char(current_len: usize, c: char) -> bool {
    current_len < MAX_FIELD_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Tab Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_tab_next() {
        assert_eq!(Tab::Dashboard.next(), Tab::Sales);
        assert_eq!(Tab::Sales.next(), Tab::Inventory);
        assert_eq!(Tab::Inventory.next(), Tab::Customers);
        assert_eq!(Tab::Customers.next(), Tab::Analytics);
        assert_eq!(Tab::Analytics.next(), Tab::Expenses);
        assert_eq!(Tab::Expenses.next(), Tab::Dashboard); // Wraps around
    }

    #[test]
    fn test_tab_prev() {
        assert_eq!(Tab::Dashboard.prev(), Tab::Expenses); // Wraps around
        assert_eq!(Tab::Expenses.prev(), Tab::Analytics);
        assert_eq!(Tab::Analytics.prev(), Tab::Customers);
        assert_eq!(Tab::Customers.prev(), Tab::Inventory);
        assert_eq!(Tab::Inventory.prev(), Tab::Sales);
        assert_eq!(Tab::Sales.prev(), Tab::Dashboard);
    }

    // -------------------------------------------------------------------------
    // Form Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_customer_form_requires_name() {
        let form = EntityForm::customer(None);
        assert!(matches!(form.build(), Err(msg) if msg == "Name is required"));
    }

    #[test]
    fn test_customer_form_builds_with_optionals_blank() {
        let mut form = EntityForm::customer(None);
        form.fields[0].value = "Acme Corp".to_string();
        match form.build() {
            Ok(FormOutput::Customer(c)) => {
                assert_eq!(c.name, "Acme Corp");
                assert_eq!(c.email, None);
                assert_eq!(c.id, None);
            }
            other => panic!("unexpected build result: {:?}", other),
        }
    }

    #[test]
    fn test_product_form_rejects_bad_price() {
        let mut form = EntityForm::product(None);
        form.fields[0].value = "Widget".to_string();
        form.fields[1].value = "abc".to_string();
        form.fields[2].value = "5".to_string();
        assert!(matches!(form.build(), Err(msg) if msg == "Price must be a number"));
    }

    #[test]
    fn test_product_form_rejects_negative_stock() {
        let mut form = EntityForm::product(None);
        form.fields[0].value = "Widget".to_string();
        form.fields[1].value = "9.99".to_string();
        form.fields[2].value = "-1".to_string();
        assert!(matches!(form.build(), Err(msg) if msg == "Stock cannot be negative"));
    }

    #[test]
    fn test_expense_form_rejects_bad_date() {
        let mut form = EntityForm::expense(None);
        form.fields[0].value = "Rent".to_string();
        form.fields[1].value = "1200".to_string();
        form.fields[3].value = "March 1".to_string();
        assert!(matches!(form.build(), Err(msg) if msg == "Date must be YYYY-MM-DD"));
    }

    #[test]
    fn test_expense_form_defaults_to_today() {
        let form = EntityForm::expense(None);
        let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(form.fields[3].value, today);
    }

    #[test]
    fn test_edit_form_prefills_and_tracks_id() {
        let product = Product {
            id: Some("p1".to_string()),
            name: "Widget".to_string(),
            description: None,
            price: 9.99,
            stock_quantity: 3,
            category: Some("Tools".to_string()),
            sku: None,
            created_at: None,
        };
        let form = EntityForm::product(Some(&product));
        assert_eq!(form.title, "Edit Product");
        assert_eq!(form.editing.as_deref(), Some("p1"));
        assert_eq!(form.fields[0].value, "Widget");
        assert_eq!(form.fields[1].value, "9.99");
        assert_eq!(form.fields[3].value, "Tools");
    }

    #[test]
    fn test_form_focus_wraps() {
        let mut form = EntityForm::customer(None);
        assert_eq!(form.focus, 0);
        form.focus_prev();
        assert_eq!(form.focus, form.fields.len() - 1);
        form.focus_next();
        assert_eq!(form.focus, 0);
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_username_char() {
        assert!(can_add_username_char(0, 'a'));
        assert!(can_add_username_char(49, 'z'));
        assert!(!can_add_username_char(50, 'a'));
        assert!(!can_add_username_char(0, '\n'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\r'));
    }
}
