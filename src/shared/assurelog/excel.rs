//! Spreadsheet import and evidence upload payloads

use serde::{Deserialize, Serialize};

use crate::shared::assurelog::report::ReportId;
use crate::shared::error::SharedError;

/// Answer of the evidence upload endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl UploadedFile {
    /// Evidence entry appended to a test case draft
    pub fn as_evidence(&self) -> serde_json::Value {
        serde_json::json!({ "filename": self.filename, "url": self.url })
    }
}

/// Preview returned by the spreadsheet validation endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExcelValidation {
    pub valid: bool,
    pub total_rows: u64,
    pub valid_rows: u64,
    pub invalid_rows: Vec<u64>,
    pub missing_columns: Vec<String>,
    pub found_columns: Vec<String>,
    pub preview_data: Vec<serde_json::Value>,
}

/// Outcome of a spreadsheet import
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExcelImportResult {
    #[serde(default)]
    pub message: Option<String>,
    pub report_id: ReportId,
    #[serde(default)]
    pub imported_count: u64,
    #[serde(default)]
    pub total_rows: u64,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Report metadata sent along with an import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcelImportMetadata {
    pub report_title: String,
    pub test_environment: String,
    pub feature_scenario: String,
}

impl ExcelImportMetadata {
    /// Multipart text fields, skipping empty values
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        [
            ("report_title", &self.report_title),
            ("test_environment", &self.test_environment),
            ("feature_scenario", &self.feature_scenario),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key, value.clone()))
        .collect()
    }

    pub fn validate(&self) -> Result<(), SharedError> {
        if self.report_title.trim().is_empty() {
            return Err(SharedError::validation("report_title", "Report title is required."));
        }
        Ok(())
    }
}

/// Only `.xlsx` and `.xls` files are accepted
pub fn check_spreadsheet_name(file_name: &str) -> Result<(), SharedError> {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
        Ok(())
    } else {
        Err(SharedError::validation(
            "file",
            "Please select an Excel file (.xlsx or .xls)",
        ))
    }
}
