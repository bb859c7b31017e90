//! bizdesk - Main Library
//!
//! bizdesk is a native desktop client for a small business back office. It
//! offers a product catalog with a locally persisted cart and the AssureLog
//! test-report authoring shell, both talking to an external REST API.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared by every part of the client
//!   - Catalog and AssureLog entities, search hits, user profile
//!   - Form drafts with client-side validation
//!   - Error and configuration types
//!
//! - **`desk_app`** - Native desktop app (egui/eframe)
//!   - Key/value storage standing in for browser storage
//!   - REST client with per-call credential lookup
//!   - Session store, view router, cart store, quick search
//!   - egui views
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bizdesk::desk_app::{CartStore, MemoryStorage};
//!
//! let storage = Arc::new(MemoryStorage::new());
//! let cart = CartStore::new(storage);
//! cart.add_to_cart(1, "Pastilha de freio", 10.0).unwrap();
//! assert_eq!(cart.update_cart_count(), 1);
//! ```
//!
//! # Thread Safety
//!
//! The egui app is single-threaded. Network calls run on short-lived worker
//! threads and hand their results back over `std::sync::mpsc` channels that
//! the UI polls every frame. Storage implementations are `Send + Sync`.
//!
//! # Error Handling
//!
//! - `shared::error::SharedError` for serialization and validation failures
//! - `desk_app::api::ApiError` for transport, HTTP status and body parse failures
//! - `desk_app::storage::StorageError` for persistence failures

/// Shared types and data structures
pub mod shared;

/// egui native desktop app
#[cfg(not(target_arch = "wasm32"))]
pub mod desk_app;
