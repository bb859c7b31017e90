//! Report, test case and search endpoints

use bizdesk::desk_app::{ReportSubView, ViewRouter};
use bizdesk::shared::assurelog::{
    ReportDraft, ReportFilters, SearchHitKind, TestCaseDraft, TestCaseStatus,
};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common::*;

fn draft(title: &str) -> ReportDraft {
    ReportDraft {
        title: title.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        made_by: "Ana".to_string(),
        test_environment: "staging".to_string(),
        link: String::new(),
        feature_scenario: "Login".to_string(),
    }
}

fn test_case_draft(status: TestCaseStatus) -> TestCaseDraft {
    TestCaseDraft {
        tc_number: "TC-01".to_string(),
        title: "Valid login".to_string(),
        status,
        scenario_description: String::new(),
        expected_result: "Dashboard shown".to_string(),
        actual_result: "Error page".to_string(),
        evidence_files: vec![json!({"filename": "shot.png", "url": "/uploads/shot.png"})],
    }
}

#[tokio::test]
async fn test_list_reports_sends_only_set_filters() {
    let api = TestApi::signed_in("t").await;
    Mock::given(method("GET"))
        .and(path("/api/secure-reports/reports"))
        .and(query_param("responsible", "Ana"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reports": [report_json(1, "Login"), report_json(2, "Checkout")],
            "total": 2
        })))
        .mount(&api.server)
        .await;

    let filters = ReportFilters {
        responsible: "Ana".to_string(),
        sort_order: "desc".to_string(),
        ..Default::default()
    };
    let page = assert_ok!(api.client.list_reports(&filters).await);
    assert_eq!(page.reports.len(), 2);
    assert_eq!(page.total, Some(2));

    let requests = api.requests().await;
    assert_eq!(requests[0].url.query(), Some("responsible=Ana&sort_order=desc"));
}

#[tokio::test]
async fn test_list_reports_without_reports_key_is_empty() {
    let api = TestApi::signed_in("t").await;
    Mock::given(path("/api/secure-reports/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "no data"})))
        .mount(&api.server)
        .await;

    let page = assert_ok!(api.client.list_reports(&ReportFilters::default()).await);
    assert!(page.reports.is_empty());
    assert_eq!(page.total, None);
    assert_eq!(api.requests().await[0].url.query(), None);
}

#[tokio::test]
async fn test_save_report_creates_then_updates() {
    let api = TestApi::signed_in("t").await;
    Mock::given(method("POST"))
        .and(path("/api/reports"))
        .and(body_partial_json(json!({"title": "Login", "date": "2024-03-01", "made_by": "Ana"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "created",
            "report": report_json(10, "Login")
        })))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/secure-reports/reports/10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(report_json(10, "Login v2")))
        .expect(1)
        .mount(&api.server)
        .await;

    let created = assert_ok!(api.client.save_report(None, &draft("Login")).await).into_report();
    assert_eq!(created.id, 10);

    let updated = assert_ok!(api.client.save_report(Some(created.id), &draft("Login v2")).await).into_report();
    assert_eq!(updated.id, 10);
    assert_eq!(updated.title, "Login v2");
}

#[tokio::test]
async fn test_saved_report_lands_on_its_detail_view() {
    let api = TestApi::signed_in("t").await;
    Mock::given(method("POST"))
        .and(path("/api/reports"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"report": report_json(12, "Login")})))
        .mount(&api.server)
        .await;

    let response = assert_ok!(api.client.save_report(None, &draft("Login")).await);
    let mut router = ViewRouter::new();
    router.create_new();
    router.report_saved(response);

    let selection = router.selection();
    assert_eq!(selection.report_sub_view(), ReportSubView::View);
    assert_eq!(selection.selected_report().map(|r| r.id()), Some(12));
    assert!(selection.selected_report().and_then(|r| r.report()).is_some());
}

#[tokio::test]
async fn test_delete_report() {
    let api = TestApi::signed_in("t").await;
    Mock::given(method("DELETE"))
        .and(path("/api/secure-reports/reports/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
        .expect(1)
        .mount(&api.server)
        .await;

    let answer = assert_ok!(api.client.delete_report(3).await);
    assert_eq!(answer["message"], "deleted");
}

#[tokio::test]
async fn test_test_case_create_update_delete_paths() {
    let api = TestApi::signed_in("t").await;
    Mock::given(method("POST"))
        .and(path("/api/reports/4/test-cases"))
        .and(body_partial_json(json!({"tc_number": "TC-01", "status": "FAIL"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(test_case_json(20, 4, "FAIL")))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/test-cases/20"))
        .and(body_partial_json(json!({"status": "BLOCKED"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_case_json(20, 4, "BLOCKED")))
        .expect(1)
        .mount(&api.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/test-cases/20"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&api.server)
        .await;

    let created = assert_ok!(api.client.create_test_case(4, &test_case_draft(TestCaseStatus::Fail)).await);
    assert_eq!(created.id, 20);
    assert_eq!(created.status(), Some(TestCaseStatus::Fail));

    let updated = assert_ok!(
        api.client
            .update_test_case(created.id, &test_case_draft(TestCaseStatus::Blocked))
            .await
    );
    assert_eq!(updated.status(), Some(TestCaseStatus::Blocked));

    assert_eq!(assert_ok!(api.client.delete_test_case(20).await), Value::Null);

    let requests = api.requests().await;
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["evidence_files"][0]["filename"], "shot.png");
}

#[tokio::test]
async fn test_quick_search_accepts_both_shapes() {
    let api = TestApi::signed_in("t").await;
    Mock::given(path("/api/search/quick"))
        .and(query_param("q", "login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"type": "report", "id": 1, "title": "Login"}
        ])))
        .mount(&api.server)
        .await;
    Mock::given(path("/api/search/quick"))
        .and(query_param("q", "checkout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [
            {"type": "test_case", "id": 2, "title": "Pay", "subtitle": "TC-03"}
        ]})))
        .mount(&api.server)
        .await;

    let hits = assert_ok!(api.client.quick_search("login", 8).await);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].kind, SearchHitKind::Report);

    let hits = assert_ok!(api.client.quick_search("checkout", 8).await);
    assert_eq!(hits[0].kind, SearchHitKind::TestCase);
    assert_eq!(hits[0].id, 2);
    assert_eq!(hits[0].subtitle.as_deref(), Some("TC-03"));

    let requests = api.requests().await;
    assert_eq!(requests[0].url.query(), Some("q=login&limit=8"));
}

#[tokio::test]
async fn test_malformed_suggestions_read_as_empty_lists() {
    let api = TestApi::signed_in("t").await;
    Mock::given(path("/api/search/suggestions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responsible": ["Ana", 3, "Bruno"],
            "status": "PASS",
            "environment": null
        })))
        .mount(&api.server)
        .await;

    let suggestions = assert_ok!(api.client.search_suggestions().await);
    assert_eq!(suggestions.responsible, vec!["Ana", "Bruno"]);
    assert!(suggestions.status.is_empty());
    assert!(suggestions.feature.is_empty());
    assert!(suggestions.environment.is_empty());
}
