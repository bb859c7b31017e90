//! Integration tests against a mock REST API

mod api_test;
mod auth_test;
mod files_test;
mod reports_test;
