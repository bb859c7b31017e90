//! Property-based tests for the AssureLog view transitions

use bizdesk::desk_app::{panel, MainView, Panel, ReportSubView, ViewSelection};
use bizdesk::shared::assurelog::{Report, SavedReportResponse, TestCase};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    CreateNew,
    EditReport(i64),
    ViewReport(i64),
    BackToList,
    ReportSaved(i64),
    NewTestCase(i64),
    EditTestCase(i64, i64),
    TestCaseDone,
    ChangeMainView(usize),
    GoToReportForm,
}

fn report(id: i64) -> Report {
    serde_json::from_value(serde_json::json!({"id": id, "title": format!("R{}", id)})).unwrap()
}

fn test_case(id: i64, report_id: i64) -> TestCase {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "report_id": report_id,
        "tc_number": "TC-01",
        "title": "Case",
        "expected_result": "ok",
        "actual_result": "ok"
    }))
    .unwrap()
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::CreateNew),
        (1i64..50).prop_map(Step::EditReport),
        (1i64..50).prop_map(Step::ViewReport),
        Just(Step::BackToList),
        (1i64..50).prop_map(Step::ReportSaved),
        (1i64..50).prop_map(Step::NewTestCase),
        (1i64..50, 1i64..50).prop_map(|(id, report_id)| Step::EditTestCase(id, report_id)),
        Just(Step::TestCaseDone),
        (0usize..MainView::ALL.len()).prop_map(Step::ChangeMainView),
        Just(Step::GoToReportForm),
    ]
}

fn apply(selection: &ViewSelection, step: &Step) -> ViewSelection {
    match step {
        Step::CreateNew => selection.create_new(),
        Step::EditReport(id) => selection.edit_report(report(*id)),
        Step::ViewReport(id) => selection.view_report(*id),
        Step::BackToList => selection.back_to_list(),
        Step::ReportSaved(id) => selection.report_saved(SavedReportResponse::from(report(*id))),
        Step::NewTestCase(id) => selection.new_test_case(*id),
        Step::EditTestCase(id, report_id) => selection.edit_test_case(test_case(*id, *report_id)),
        Step::TestCaseDone => selection.test_case_saved_or_canceled(),
        Step::ChangeMainView(i) => selection.change_main_view(MainView::ALL[*i]),
        Step::GoToReportForm => selection.go_to_report_form(),
    }
}

proptest! {
    #[test]
    fn test_changing_tab_always_resets(steps in prop::collection::vec(step(), 0..30), tab in 0usize..4) {
        let selection = steps.iter().fold(ViewSelection::default(), |s, step| apply(&s, step));
        let switched = selection.change_main_view(MainView::ALL[tab]);

        prop_assert_eq!(switched.primary(), MainView::ALL[tab]);
        prop_assert_eq!(switched.report_sub_view(), ReportSubView::List);
        prop_assert!(switched.selected_report().is_none());
        prop_assert!(switched.selected_test_case().is_none());
    }

    #[test]
    fn test_view_panel_always_has_a_report(steps in prop::collection::vec(step(), 1..30)) {
        let mut selection = ViewSelection::default();
        for step in &steps {
            selection = apply(&selection, step);
            if selection.primary() == MainView::Reports
                && selection.report_sub_view() == ReportSubView::View
            {
                let shown = panel(&selection, None);
                prop_assert!(matches!(shown, Panel::ReportView { .. }), "got {:?}", shown);
            }
        }
    }

    #[test]
    fn test_edit_test_case_points_at_owning_report(id in 1i64..50, report_id in 1i64..50) {
        let selection = ViewSelection::default().edit_test_case(test_case(id, report_id));
        prop_assert_eq!(selection.selected_report().map(|r| r.id()), Some(report_id));
        prop_assert_eq!(
            panel(&selection, None),
            Panel::TestCaseForm {
                report_id: Some(report_id),
                test_case: selection.selected_test_case(),
            }
        );
    }
}
