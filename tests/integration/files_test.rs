//! Uploads, PDF export and spreadsheet import

use bizdesk::desk_app::api::pdf_file_name;
use bizdesk::shared::assurelog::ExcelImportMetadata;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::common::*;

#[tokio::test]
async fn test_upload_sends_multipart_file_field() {
    let api = TestApi::signed_in("t").await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "filename": "a1b2_shot.png",
            "url": "/uploads/a1b2_shot.png",
            "message": "uploaded"
        })))
        .expect(1)
        .mount(&api.server)
        .await;

    let uploaded = assert_ok!(api.client.upload_file("shot.png", b"PNGDATA".to_vec()).await);
    assert_eq!(uploaded.filename, "a1b2_shot.png");
    assert_eq!(uploaded.as_evidence()["url"], "/uploads/a1b2_shot.png");

    let request = &api.requests().await[0];
    let content_type = request
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));
    assert_eq!(authorization(request).as_deref(), Some("Bearer t"));

    let body = body_text(request);
    assert_contains!(body, "name=\"file\"");
    assert_contains!(body, "filename=\"shot.png\"");
    assert_contains!(body, "PNGDATA");
}

#[tokio::test]
async fn test_delete_upload_path() {
    let api = TestApi::signed_in("t").await;
    Mock::given(method("DELETE"))
        .and(path("/api/uploads/a1b2_shot.png"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
        .expect(1)
        .mount(&api.server)
        .await;

    assert_ok!(api.client.delete_upload("a1b2_shot.png").await);
}

#[tokio::test]
async fn test_pdf_export_returns_raw_bytes() {
    let api = TestApi::signed_in("t").await;
    Mock::given(path("/api/reports/5/export-pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(b"%PDF-1.4 report".to_vec()),
        )
        .mount(&api.server)
        .await;
    Mock::given(path("/api/reports/export-all-pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4 all".to_vec()))
        .mount(&api.server)
        .await;

    let single = assert_ok!(api.client.export_report_pdf(5).await);
    assert_eq!(&single[..], b"%PDF-1.4 report");
    let all = assert_ok!(api.client.export_all_reports_pdf().await);
    assert!(all.starts_with(b"%PDF"));

    assert_eq!(pdf_file_name(Some("Login / v2")), "Login___v2_evidencias.pdf");
}

#[tokio::test]
async fn test_pdf_export_failure_keeps_status() {
    let api = TestApi::signed_in("t").await;
    Mock::given(path("/api/reports/6/export-pdf"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Report not found"})))
        .mount(&api.server)
        .await;

    let message = assert_http_error!(api.client.export_report_pdf(6).await, 404);
    assert_eq!(message, "Report not found");
}

#[tokio::test]
async fn test_validate_excel_fills_missing_fields() {
    let api = TestApi::signed_in("t").await;
    Mock::given(method("POST"))
        .and(path("/api/excel/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": false,
            "missing_columns": ["Resultado Esperado"]
        })))
        .mount(&api.server)
        .await;

    let validation = assert_ok!(api.client.validate_excel("casos.xlsx", b"xlsx".to_vec()).await);
    assert!(!validation.valid);
    assert_eq!(validation.total_rows, 0);
    assert_eq!(validation.missing_columns, vec!["Resultado Esperado"]);
    assert!(validation.preview_data.is_empty());
}

#[tokio::test]
async fn test_import_excel_sends_only_filled_metadata() {
    let api = TestApi::signed_in("t").await;
    Mock::given(method("POST"))
        .and(path("/api/excel/import"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "imported",
            "report_id": 42,
            "imported_count": 3,
            "total_rows": 4,
            "errors": ["Linha 4: título vazio"]
        })))
        .mount(&api.server)
        .await;

    let metadata = ExcelImportMetadata {
        report_title: "Regressão".to_string(),
        test_environment: String::new(),
        feature_scenario: "Checkout".to_string(),
    };
    let result = assert_ok!(
        api.client
            .import_excel("casos.xlsx", b"xlsx".to_vec(), &metadata)
            .await
    );
    assert_eq!(result.report_id, 42);
    assert_eq!(result.imported_count, 3);
    assert_eq!(result.errors.len(), 1);

    let body = body_text(&api.requests().await[0]);
    assert_contains!(body, "name=\"report_title\"");
    assert_contains!(body, "name=\"feature_scenario\"");
    assert!(!body.contains("name=\"test_environment\""));
}

#[tokio::test]
async fn test_excel_template_is_passed_through() {
    let api = TestApi::signed_in("t").await;
    Mock::given(path("/api/excel/template"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "columns": ["TC", "Título"],
            "example": {"TC": "TC-01"}
        })))
        .mount(&api.server)
        .await;

    let template = assert_ok!(api.client.excel_template().await);
    assert_eq!(template["columns"][1], "Título");
}
