//! egui Native Desktop App Module
//!
//! Desktop client for the catalog and AssureLog back office.
//!
//! # Architecture
//!
//! - **`config`** - Server URL and data directory resolution
//! - **`storage`** - Key/value persistence (`SqliteStorage`, `MemoryStorage`)
//! - **`api`** - REST client; reads the bearer token from storage per call
//! - **`auth`** - Session store, sign-in and token validation
//! - **`cart`** - Persisted cart and its count observers
//! - **`router`** - AssureLog view selection and the panel mapping
//! - **`search`** - Debounced quick search with keyboard navigation
//! - **`forms`** - Per-panel editing state
//! - **`notifications`** - Toast queue
//! - **`tasks`** - Worker threads whose results are polled each frame
//! - **`state`** - `AppState`, tying the above together for the views
//! - **`views`** / **`theme`** - egui rendering
//! - **`main`** - Binary entry point
//!
//! # Example
//!
//! ```rust,no_run
//! // Run the desktop app:
//! // cargo run --bin bizdesk
//! ```

pub mod api;
pub mod auth;
pub mod cart;
pub mod config;
pub mod forms;
pub mod notifications;
pub mod router;
pub mod search;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod theme;
pub mod types;
pub mod views;

// Re-export commonly used types
pub use api::{ApiClient, ApiError, RequestOptions};
pub use auth::{restore_session, sign_in, AuthError, AuthStore, Session};
pub use cart::{CartObserver, CartStore, CountBadge};
pub use config::Config;
pub use notifications::{Notification, NotificationLevel, NotificationSink, ToastQueue};
pub use router::{panel, MainView, Panel, ReportRef, ReportSubView, ViewRouter, ViewSelection};
pub use search::{QuickSearch, SearchDispatch, SearchKey};
pub use state::AppState;
pub use storage::{MemoryStorage, SqliteStorage, SharedStorage, Storage, StorageError};
pub use types::AppView;
