//! Report Data Structure
//!
//! Test reports, the draft edited by the report form, and the list filters.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::shared::assurelog::test_case::TestCase;
use crate::shared::error::SharedError;

/// Report identifier as issued by the API
pub type ReportId = i64;

/// A test report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub id: ReportId,
    pub title: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub made_by: Option<String>,
    #[serde(default)]
    pub test_environment: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub feature_scenario: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

/// Page returned by the report list endpoint. A body without `reports`
/// reads as an empty page.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ReportPage {
    #[serde(default)]
    pub reports: Vec<Report>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Response of a report create/update call.
///
/// Some endpoints wrap the saved entity under a `report` key, others return
/// it bare. Both shapes normalize to the same `Report`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SavedReportResponse {
    Wrapped { report: Report },
    Bare(Report),
}

impl SavedReportResponse {
    /// Parse either response shape from raw JSON
    pub fn from_value(value: serde_json::Value) -> Result<Self, SharedError> {
        Ok(serde_json::from_value(value)?)
    }

    /// The saved entity, whichever shape it arrived in
    pub fn into_report(self) -> Report {
        match self {
            Self::Wrapped { report } | Self::Bare(report) => report,
        }
    }
}

impl From<Report> for SavedReportResponse {
    fn from(report: Report) -> Self {
        Self::Bare(report)
    }
}

/// Fields edited by the report form
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportDraft {
    pub title: String,
    pub date: NaiveDate,
    pub made_by: String,
    pub test_environment: String,
    pub link: String,
    pub feature_scenario: String,
}

impl Default for ReportDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            date: Local::now().date_naive(),
            made_by: String::new(),
            test_environment: String::new(),
            link: String::new(),
            feature_scenario: String::new(),
        }
    }
}

impl ReportDraft {
    /// Draft pre-filled from an existing report; missing fields become empty
    pub fn from_report(report: &Report) -> Self {
        let defaults = Self::default();
        Self {
            title: report.title.clone(),
            date: report.date.unwrap_or(defaults.date),
            made_by: report.made_by.clone().unwrap_or_default(),
            test_environment: report.test_environment.clone().unwrap_or_default(),
            link: report.link.clone().unwrap_or_default(),
            feature_scenario: report.feature_scenario.clone().unwrap_or_default(),
        }
    }

    /// Title and responsible are required
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.title.trim().is_empty() {
            return Err(SharedError::validation(
                "title",
                "Title and responsible are required.",
            ));
        }
        if self.made_by.trim().is_empty() {
            return Err(SharedError::validation(
                "made_by",
                "Title and responsible are required.",
            ));
        }
        Ok(())
    }
}

/// Filters accepted by the report list endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilters {
    pub search: String,
    pub responsible: String,
    pub status: String,
    pub date_from: String,
    pub date_to: String,
    pub feature: String,
    pub environment: String,
    pub sort_by: String,
    pub sort_order: String,
}

impl ReportFilters {
    /// Query pairs, skipping empty values
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("search", &self.search),
            ("responsible", &self.responsible),
            ("status", &self.status),
            ("date_from", &self.date_from),
            ("date_to", &self.date_to),
            ("feature", &self.feature),
            ("environment", &self.environment),
            ("sort_by", &self.sort_by),
            ("sort_order", &self.sort_order),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key, value.clone()))
        .collect()
    }

    pub fn is_active(&self) -> bool {
        !self.query_pairs().is_empty()
    }

    /// Flip between ascending and descending order
    pub fn toggle_sort_order(&mut self) {
        self.sort_order = if self.sort_order == "asc" { "desc" } else { "asc" }.to_string();
    }
}
