//! AssureLog Module
//!
//! Data structures for the QA reporting tool:
//!
//! - `Report` - A test report and its test cases
//! - `TestCase` - One test case inside a report
//! - `SearchHit` - A quick-search result
//! - `ExcelValidation` / `ExcelImportResult` - Spreadsheet import round trips
//!
//! The API owns these entities. The client only keeps transient copies for
//! display and edit-in-progress drafts.
//!
//! # Usage
//!
//! ```rust
//! use bizdesk::shared::assurelog::{Report, ReportDraft, TestCase, TestCaseDraft};
//! ```

pub mod report;
pub mod test_case;
pub mod search;
pub mod excel;

pub use report::{Report, ReportDraft, ReportFilters, ReportId, ReportPage, SavedReportResponse};
pub use test_case::{evidence_label, TestCase, TestCaseDraft, TestCaseId, TestCaseStatus};
pub use search::{QuickSearchResponse, SearchHit, SearchHitKind, SearchSuggestions};
pub use excel::{check_spreadsheet_name, ExcelImportMetadata, ExcelImportResult, ExcelValidation, UploadedFile};
