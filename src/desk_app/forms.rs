//! Per-panel state of the AssureLog shell.
//!
//! A fresh state is built whenever the router lands on its panel; results of
//! the panel's requests are folded in by `AppState::poll`.

use std::path::Path;

use crate::desk_app::router::ReportRef;
use crate::shared::assurelog::{
    check_spreadsheet_name, ExcelImportMetadata, ExcelImportResult, ExcelValidation, Report,
    ReportDraft, ReportFilters, ReportId, SearchSuggestions, TestCase, TestCaseDraft, TestCaseId,
    UploadedFile,
};
use crate::shared::error::SharedError;

/// A local file picked through a path field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub name: String,
    pub data: Vec<u8>,
}

/// Read a file the user pointed at
pub fn read_local_file(path: &str) -> Result<LocalFile, SharedError> {
    let path = Path::new(path.trim());
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| SharedError::validation("file", "Choose a file first."))?
        .to_string();
    let data = std::fs::read(path).map_err(|e| {
        SharedError::validation("file", format!("Could not read {}: {}", path.display(), e))
    })?;
    Ok(LocalFile { name, data })
}

// ---- report list ----

#[derive(Debug, Default)]
pub struct ReportListState {
    pub filters: ReportFilters,
    pub reports: Vec<Report>,
    pub total: Option<u64>,
    pub suggestions: SearchSuggestions,
    pub loading: bool,
    pub error: Option<String>,
    stale: bool,
    suggestions_loaded: bool,
}

impl ReportListState {
    pub fn new() -> Self {
        Self {
            stale: true,
            ..Self::default()
        }
    }

    /// Ask for a refetch next time the list is shown
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Consume the stale flag; true when a fetch should start now
    pub fn begin_load(&mut self) -> bool {
        if !self.stale || self.loading {
            return false;
        }
        self.stale = false;
        self.loading = true;
        self.error = None;
        true
    }

    /// True the first time only
    pub fn begin_suggestions(&mut self) -> bool {
        !std::mem::replace(&mut self.suggestions_loaded, true)
    }

    pub fn finish(&mut self, result: Result<(Vec<Report>, Option<u64>), String>) {
        self.loading = false;
        match result {
            Ok((reports, total)) => {
                self.reports = reports;
                self.total = total;
            }
            Err(message) => self.error = Some(message),
        }
    }

    pub fn clear_filters(&mut self) {
        self.filters = ReportFilters::default();
        self.mark_stale();
    }
}

// ---- report form ----

#[derive(Debug)]
pub struct ReportFormState {
    pub draft: ReportDraft,
    /// Date as typed, parsed on submit
    pub date_input: String,
    editing: Option<ReportId>,
    pending_load: Option<ReportId>,
    pub saving: bool,
    pub error: Option<String>,
}

impl ReportFormState {
    /// Blank for `None`, pre-filled for a full record, and waiting on a
    /// fetch for a bare id
    pub fn for_selection(report: Option<&ReportRef>) -> Self {
        let mut state = Self {
            draft: ReportDraft::default(),
            date_input: String::new(),
            editing: report.map(ReportRef::id),
            pending_load: None,
            saving: false,
            error: None,
        };
        match report {
            Some(ReportRef::Loaded(report)) => state.load(report),
            Some(ReportRef::Placeholder(id)) => state.pending_load = Some(*id),
            None => state.date_input = state.draft.date.to_string(),
        }
        state
    }

    pub fn editing(&self) -> Option<ReportId> {
        self.editing
    }

    /// Id to fetch before the form can be edited
    pub fn needs_load(&self) -> Option<ReportId> {
        self.pending_load
    }

    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    pub fn load(&mut self, report: &Report) {
        self.draft = ReportDraft::from_report(report);
        self.date_input = self.draft.date.to_string();
        self.pending_load = None;
    }

    pub fn load_failed(&mut self, message: String) {
        self.pending_load = None;
        self.error = Some(message);
    }

    /// Validate and hand out what to send; flags the form as saving
    pub fn submission(&mut self) -> Result<(Option<ReportId>, ReportDraft), SharedError> {
        let outcome = self.check();
        match &outcome {
            Ok(_) => {
                self.saving = true;
                self.error = None;
            }
            Err(e) => self.error = Some(e.user_message().to_string()),
        }
        outcome
    }

    fn check(&mut self) -> Result<(Option<ReportId>, ReportDraft), SharedError> {
        let typed = self.date_input.trim();
        if !typed.is_empty() {
            self.draft.date = typed
                .parse()
                .map_err(|_| SharedError::validation("date", "Date must be YYYY-MM-DD."))?;
        }
        self.draft.validate()?;
        Ok((self.editing, self.draft.clone()))
    }

    pub fn save_failed(&mut self, message: String) {
        self.saving = false;
        self.error = Some(message);
    }
}

// ---- report view ----

#[derive(Debug)]
pub struct ReportViewState {
    report_id: ReportId,
    pub report: Option<Report>,
    pub loading: bool,
    pub exporting: bool,
    pub error: Option<String>,
}

impl ReportViewState {
    pub fn new(report_id: ReportId) -> Self {
        Self {
            report_id,
            report: None,
            loading: true,
            exporting: false,
            error: None,
        }
    }

    pub fn report_id(&self) -> ReportId {
        self.report_id
    }

    pub fn reload(&mut self) {
        self.loading = true;
    }

    /// Fold in a fetch; answers for another report are ignored
    pub fn finish(&mut self, result: Result<Report, String>) {
        match result {
            Ok(report) if report.id != self.report_id => {
                tracing::debug!(expected = self.report_id, got = report.id, "ignoring report for another view");
                return;
            }
            Ok(report) => self.report = Some(report),
            Err(message) => self.error = Some(message),
        }
        self.loading = false;
    }

    pub fn title(&self) -> Option<&str> {
        self.report.as_ref().map(|r| r.title.as_str())
    }
}

// ---- test case form ----

/// What saving the test case form sends
#[derive(Debug, Clone, PartialEq)]
pub enum TestCaseSubmission {
    Create { report_id: ReportId, draft: TestCaseDraft },
    Update { id: TestCaseId, draft: TestCaseDraft },
}

#[derive(Debug)]
pub struct TestCaseFormState {
    report_id: Option<ReportId>,
    editing: Option<TestCaseId>,
    pub draft: TestCaseDraft,
    pub evidence_path: String,
    pub saving: bool,
    pub uploading: bool,
    pub error: Option<String>,
}

impl TestCaseFormState {
    pub fn for_selection(report_id: Option<ReportId>, test_case: Option<&TestCase>) -> Self {
        Self {
            report_id: report_id.or(test_case.map(|tc| tc.report_id)),
            editing: test_case.map(|tc| tc.id),
            draft: test_case.map(TestCaseDraft::from_test_case).unwrap_or_default(),
            evidence_path: String::new(),
            saving: false,
            uploading: false,
            error: None,
        }
    }

    pub fn report_id(&self) -> Option<ReportId> {
        self.report_id
    }

    pub fn editing(&self) -> Option<TestCaseId> {
        self.editing
    }

    pub fn submission(&mut self) -> Result<TestCaseSubmission, SharedError> {
        let outcome = self.check();
        match &outcome {
            Ok(_) => {
                self.saving = true;
                self.error = None;
            }
            Err(e) => self.error = Some(e.user_message().to_string()),
        }
        outcome
    }

    fn check(&self) -> Result<TestCaseSubmission, SharedError> {
        self.draft.validate()?;
        let draft = self.draft.clone();
        match (self.editing, self.report_id) {
            (Some(id), _) => Ok(TestCaseSubmission::Update { id, draft }),
            (None, Some(report_id)) => Ok(TestCaseSubmission::Create { report_id, draft }),
            (None, None) => Err(SharedError::validation("report_id", "Open a report before adding test cases.")),
        }
    }

    pub fn save_failed(&mut self, message: String) {
        self.saving = false;
        self.error = Some(message);
    }

    pub fn attach(&mut self, file: &UploadedFile) {
        self.uploading = false;
        self.evidence_path.clear();
        self.draft.attach_evidence([file.as_evidence()]);
    }

    /// Drop an evidence entry, returning the stored file name to delete
    pub fn detach(&mut self, index: usize) -> Option<String> {
        if index >= self.draft.evidence_files.len() {
            return None;
        }
        let entry = self.draft.evidence_files.remove(index);
        entry
            .get("filename")
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }
}

// ---- excel import ----

#[derive(Debug, Default)]
pub struct ExcelImportState {
    pub path: String,
    pub metadata: ExcelImportMetadata,
    pub validation: Option<ExcelValidation>,
    pub result: Option<ExcelImportResult>,
    pub template: Option<serde_json::Value>,
    pub busy: bool,
    pub error: Option<String>,
}

impl ExcelImportState {
    /// Spreadsheet at `path`, checked by extension
    pub fn spreadsheet(&mut self) -> Result<LocalFile, SharedError> {
        let outcome = check_spreadsheet_name(self.path.trim()).and_then(|_| read_local_file(&self.path));
        self.record(outcome)
    }

    /// Spreadsheet plus metadata, title required
    pub fn import_request(&mut self) -> Result<(LocalFile, ExcelImportMetadata), SharedError> {
        let outcome = self
            .metadata
            .validate()
            .and_then(|_| check_spreadsheet_name(self.path.trim()))
            .and_then(|_| read_local_file(&self.path))
            .map(|file| (file, self.metadata.clone()));
        self.record(outcome)
    }

    fn record<T>(&mut self, outcome: Result<T, SharedError>) -> Result<T, SharedError> {
        match &outcome {
            Ok(_) => {
                self.busy = true;
                self.error = None;
            }
            Err(e) => self.error = Some(e.user_message().to_string()),
        }
        outcome
    }

    pub fn validated(&mut self, result: Result<ExcelValidation, String>) {
        self.busy = false;
        match result {
            Ok(validation) => self.validation = Some(validation),
            Err(message) => self.error = Some(message),
        }
    }

    /// Fold in an import; returns the created report on success
    pub fn imported(&mut self, result: Result<ExcelImportResult, String>) -> Option<ReportId> {
        self.busy = false;
        match result {
            Ok(outcome) => {
                let report_id = outcome.report_id;
                self.result = Some(outcome);
                self.validation = None;
                self.path.clear();
                self.metadata = ExcelImportMetadata::default();
                Some(report_id)
            }
            Err(message) => {
                self.error = Some(message);
                None
            }
        }
    }
}
