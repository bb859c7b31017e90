//! Test Case Data Structure

use serde::{Deserialize, Serialize};

use crate::shared::assurelog::report::ReportId;
use crate::shared::error::SharedError;

/// Test case identifier as issued by the API
pub type TestCaseId = i64;

/// Outcome of a test case
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestCaseStatus {
    #[default]
    Pass,
    Fail,
    Blocked,
    /// Only produced by spreadsheet imports
    Pending,
}

impl TestCaseStatus {
    /// Statuses offered by the test case form
    pub const FORM_CHOICES: [TestCaseStatus; 3] =
        [TestCaseStatus::Pass, TestCaseStatus::Fail, TestCaseStatus::Blocked];

    pub fn as_code(&self) -> &'static str {
        match self {
            TestCaseStatus::Pass => "PASS",
            TestCaseStatus::Fail => "FAIL",
            TestCaseStatus::Blocked => "BLOCKED",
            TestCaseStatus::Pending => "PENDING",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "PASS" => Some(TestCaseStatus::Pass),
            "FAIL" => Some(TestCaseStatus::Fail),
            "BLOCKED" => Some(TestCaseStatus::Blocked),
            "PENDING" => Some(TestCaseStatus::Pending),
            _ => None,
        }
    }

    /// Label shown on the form's status buttons
    pub fn label(&self) -> &'static str {
        match self {
            TestCaseStatus::Pass => "Passou",
            TestCaseStatus::Fail => "Falhou",
            TestCaseStatus::Blocked => "Bloqueado",
            TestCaseStatus::Pending => "Pendente",
        }
    }

    /// Form label back to a status; unknown labels submit as PASS
    pub fn from_label(label: &str) -> Self {
        match label {
            "Falhou" => TestCaseStatus::Fail,
            "Bloqueado" => TestCaseStatus::Blocked,
            _ => TestCaseStatus::Pass,
        }
    }

    /// Status the form starts from when editing: anything that is not
    /// PASS or FAIL is shown as blocked
    pub fn for_form(code: Option<&str>) -> Self {
        match code.and_then(Self::from_code) {
            Some(TestCaseStatus::Pass) => TestCaseStatus::Pass,
            Some(TestCaseStatus::Fail) => TestCaseStatus::Fail,
            _ => TestCaseStatus::Blocked,
        }
    }
}

/// A test case belonging to a report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestCase {
    pub id: TestCaseId,
    pub report_id: ReportId,
    pub tc_number: String,
    pub title: String,
    #[serde(default)]
    pub scenario_description: Option<String>,
    #[serde(default)]
    pub expected_result: String,
    #[serde(default)]
    pub actual_result: String,
    #[serde(default)]
    pub status: Option<String>,
    /// Evidence entries are either plain paths or upload descriptors
    #[serde(default)]
    pub evidence_files: Vec<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl TestCase {
    pub fn status(&self) -> Option<TestCaseStatus> {
        self.status.as_deref().and_then(TestCaseStatus::from_code)
    }
}

/// Display name for an evidence entry
pub fn evidence_label(entry: &serde_json::Value) -> String {
    match entry {
        serde_json::Value::String(path) => path.clone(),
        serde_json::Value::Object(map) => ["original_name", "filename", "url"]
            .iter()
            .find_map(|key| map.get(*key).and_then(|v| v.as_str()))
            .unwrap_or("evidence")
            .to_string(),
        other => other.to_string(),
    }
}

/// Fields edited by the test case form
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TestCaseDraft {
    pub tc_number: String,
    pub title: String,
    pub status: TestCaseStatus,
    pub scenario_description: String,
    pub expected_result: String,
    pub actual_result: String,
    pub evidence_files: Vec<serde_json::Value>,
}

impl TestCaseDraft {
    pub fn from_test_case(test_case: &TestCase) -> Self {
        Self {
            tc_number: test_case.tc_number.clone(),
            title: test_case.title.clone(),
            status: TestCaseStatus::for_form(test_case.status.as_deref()),
            scenario_description: test_case.scenario_description.clone().unwrap_or_default(),
            expected_result: test_case.expected_result.clone(),
            actual_result: test_case.actual_result.clone(),
            evidence_files: test_case.evidence_files.clone(),
        }
    }

    /// Append freshly uploaded evidence
    pub fn attach_evidence(&mut self, files: impl IntoIterator<Item = serde_json::Value>) {
        self.evidence_files.extend(files);
    }

    /// TC number, title, expected and actual results are required
    pub fn validate(&self) -> Result<(), SharedError> {
        let required = [
            ("tc_number", &self.tc_number, "TC number is required."),
            ("title", &self.title, "Title is required."),
            ("expected_result", &self.expected_result, "Expected result is required."),
            ("actual_result", &self.actual_result, "Actual result is required."),
        ];
        for (field, value, message) in required {
            if value.trim().is_empty() {
                return Err(SharedError::validation(field, message));
            }
        }
        Ok(())
    }
}
