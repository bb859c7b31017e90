//! Common test utilities and helpers
//!
//! - Mock API server wiring
//! - JSON fixtures shaped like the API's answers
//! - Custom assertion macros

#[macro_use]
pub mod assertions;
pub mod fixtures;
pub mod mock_server;

pub use fixtures::*;
pub use mock_server::*;
