//! Shared Module
//!
//! Types and data structures shared by every part of the client. These are
//! the shapes exchanged with the REST API and persisted in local storage.

/// Catalog products and cart lines
pub mod catalog;

/// AssureLog reports, test cases, search and import payloads
pub mod assurelog;

/// Signed-in user profile
pub mod user;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use catalog::{CartItem, Product, ProductId};
pub use user::{LoginResponse, UserInfo};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError, FileConfig};
