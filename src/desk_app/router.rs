//! # AssureLog View Router
//!
//! Chooses which panel of the AssureLog shell is shown. The selection is a
//! primary tab plus, under the reports tab, a sub-view and the selected
//! report / test case. It only changes through the named transitions below,
//! each of which returns a whole new `ViewSelection`.
//!
//! ```text
//! profile ──changeMainView──▶ any tab (sub-view = list, selections cleared)
//! reports.list ─createNew──▶ reports.form ─reportSaved──▶ reports.view
//! reports.view ─newTestCase/editTestCase──▶ reports.test_case_form
//! reports.test_case_form ─testCaseSavedOrCanceled──▶ reports.view | reports.list
//! ```
//!
//! `panel` is the render function: a pure mapping from the selection and the
//! signed-in user to the panel to draw. Fetches and mutations belong to the
//! panels themselves.

use crate::shared::assurelog::{Report, ReportId, SavedReportResponse, TestCase};
use crate::shared::UserInfo;

/// Top-level tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MainView {
    #[default]
    Profile,
    Reports,
    Search,
    Settings,
}

impl MainView {
    pub const ALL: [MainView; 4] = [
        MainView::Profile,
        MainView::Reports,
        MainView::Search,
        MainView::Settings,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MainView::Profile => "Início",
            MainView::Reports => "Relatórios",
            MainView::Search => "Busca",
            MainView::Settings => "Configurações",
        }
    }
}

/// Panel inside the reports tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportSubView {
    #[default]
    List,
    Form,
    View,
    TestCaseForm,
}

/// The selected report: either just its id (the panel fetches the record)
/// or a full copy handed over by the previous panel
#[derive(Debug, Clone, PartialEq)]
pub enum ReportRef {
    Placeholder(ReportId),
    Loaded(Report),
}

impl ReportRef {
    pub fn id(&self) -> ReportId {
        match self {
            ReportRef::Placeholder(id) => *id,
            ReportRef::Loaded(report) => report.id,
        }
    }

    pub fn report(&self) -> Option<&Report> {
        match self {
            ReportRef::Loaded(report) => Some(report),
            ReportRef::Placeholder(_) => None,
        }
    }
}

/// Current selection of the shell
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewSelection {
    primary: MainView,
    report_sub_view: ReportSubView,
    selected_report: Option<ReportRef>,
    selected_test_case: Option<TestCase>,
}

impl ViewSelection {
    fn reports(sub_view: ReportSubView, report: Option<ReportRef>, test_case: Option<TestCase>) -> Self {
        Self {
            primary: MainView::Reports,
            report_sub_view: sub_view,
            selected_report: report,
            selected_test_case: test_case,
        }
    }

    pub fn primary(&self) -> MainView {
        self.primary
    }

    pub fn report_sub_view(&self) -> ReportSubView {
        self.report_sub_view
    }

    pub fn selected_report(&self) -> Option<&ReportRef> {
        self.selected_report.as_ref()
    }

    pub fn selected_test_case(&self) -> Option<&TestCase> {
        self.selected_test_case.as_ref()
    }

    /// Blank report form
    pub fn create_new(&self) -> Self {
        Self::reports(ReportSubView::Form, None, None)
    }

    /// Report form pre-filled with `report`
    pub fn edit_report(&self, report: Report) -> Self {
        Self::reports(ReportSubView::Form, Some(ReportRef::Loaded(report)), None)
    }

    /// Detail panel for a report known only by id
    pub fn view_report(&self, report_id: ReportId) -> Self {
        Self::reports(ReportSubView::View, Some(ReportRef::Placeholder(report_id)), None)
    }

    pub fn back_to_list(&self) -> Self {
        Self::reports(ReportSubView::List, None, None)
    }

    /// Detail panel for a report just saved; accepts both response shapes
    pub fn report_saved(&self, response: SavedReportResponse) -> Self {
        Self::reports(
            ReportSubView::View,
            Some(ReportRef::Loaded(response.into_report())),
            None,
        )
    }

    pub fn new_test_case(&self, report_id: ReportId) -> Self {
        Self::reports(
            ReportSubView::TestCaseForm,
            Some(ReportRef::Placeholder(report_id)),
            None,
        )
    }

    pub fn edit_test_case(&self, test_case: TestCase) -> Self {
        Self::reports(
            ReportSubView::TestCaseForm,
            Some(ReportRef::Placeholder(test_case.report_id)),
            Some(test_case),
        )
    }

    /// Back to the owning report, or to the list when there is none
    pub fn test_case_saved_or_canceled(&self) -> Self {
        match &self.selected_report {
            Some(report) => Self::reports(ReportSubView::View, Some(report.clone()), None),
            None => Self::reports(ReportSubView::List, None, None),
        }
    }

    /// Switch tab. Any in-progress report or test case context is dropped.
    pub fn change_main_view(&self, view: MainView) -> Self {
        Self {
            primary: view,
            report_sub_view: ReportSubView::List,
            selected_report: None,
            selected_test_case: None,
        }
    }

    /// Header shortcut to a blank report form
    pub fn go_to_report_form(&self) -> Self {
        Self::reports(ReportSubView::Form, None, None)
    }
}

/// Panel to draw for a selection
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<'a> {
    Welcome { username: Option<&'a str> },
    ReportList { search_mode: bool },
    ReportForm { report: Option<&'a ReportRef> },
    ReportView { report_id: ReportId },
    TestCaseForm {
        report_id: Option<ReportId>,
        test_case: Option<&'a TestCase>,
    },
    Settings,
    /// Nothing to draw
    Empty,
}

/// Pure render mapping
pub fn panel<'a>(selection: &'a ViewSelection, user: Option<&'a UserInfo>) -> Panel<'a> {
    match selection.primary {
        MainView::Profile => Panel::Welcome {
            username: user.map(|u| u.username.as_str()),
        },
        MainView::Search => Panel::ReportList { search_mode: true },
        MainView::Settings => Panel::Settings,
        MainView::Reports => match selection.report_sub_view {
            ReportSubView::List => Panel::ReportList { search_mode: false },
            ReportSubView::Form => Panel::ReportForm {
                report: selection.selected_report.as_ref(),
            },
            ReportSubView::View => match &selection.selected_report {
                Some(report) => Panel::ReportView {
                    report_id: report.id(),
                },
                None => Panel::Empty,
            },
            ReportSubView::TestCaseForm => Panel::TestCaseForm {
                report_id: selection.selected_report.as_ref().map(ReportRef::id),
                test_case: selection.selected_test_case.as_ref(),
            },
        },
    }
}

/// Holds the live selection and applies transitions to it
#[derive(Debug, Default)]
pub struct ViewRouter {
    selection: ViewSelection,
}

macro_rules! transition {
    ($(#[$doc:meta])* $name:ident($($arg:ident: $ty:ty),*)) => {
        $(#[$doc])*
        pub fn $name(&mut self $(, $arg: $ty)*) {
            self.selection = self.selection.$name($($arg),*);
            tracing::debug!(
                transition = stringify!($name),
                primary = ?self.selection.primary,
                sub_view = ?self.selection.report_sub_view,
                "view changed"
            );
        }
    };
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &ViewSelection {
        &self.selection
    }

    pub fn panel<'a>(&'a self, user: Option<&'a UserInfo>) -> Panel<'a> {
        panel(&self.selection, user)
    }

    transition!(create_new());
    transition!(edit_report(report: Report));
    transition!(view_report(report_id: ReportId));
    transition!(back_to_list());
    transition!(report_saved(response: SavedReportResponse));
    transition!(new_test_case(report_id: ReportId));
    transition!(edit_test_case(test_case: TestCase));
    transition!(test_case_saved_or_canceled());
    transition!(change_main_view(view: MainView));
    transition!(go_to_report_form());
}
