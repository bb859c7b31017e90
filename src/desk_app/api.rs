//! REST API Client
//!
//! One request path for every endpoint: the bearer token is looked up in
//! storage on every call (never cached on the client), non-2xx answers
//! become `ApiError::Http` carrying the decoded error body, and binary
//! endpoints hand back raw bytes.

use bytes::Bytes;
use reqwest::header::AUTHORIZATION;
use reqwest::{multipart, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::desk_app::config::Config;
use crate::desk_app::storage::{keys, SharedStorage};
use crate::shared::assurelog::{
    ExcelImportMetadata, ExcelImportResult, ExcelValidation, QuickSearchResponse, Report,
    ReportDraft, ReportFilters, ReportId, ReportPage, SavedReportResponse, SearchHit,
    SearchSuggestions, TestCase, TestCaseDraft, TestCaseId, UploadedFile,
};
use crate::shared::{LoginResponse, Product, UserInfo};

/// Request failures
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),
    /// The server answered with a non-success status
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        body: Option<Value>,
    },
    /// A success response whose body could not be decoded
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Expired or invalid credentials
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Build the error for a non-success response. The message comes from
    /// the body's `error` or `detail` field when they hold text.
    async fn from_response(response: Response) -> Self {
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .ok()
            .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok());
        let message = body
            .as_ref()
            .and_then(|b| {
                ["error", "detail"]
                    .iter()
                    .find_map(|key| b.get(*key).and_then(Value::as_str))
            })
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP error! status: {}", status));
        ApiError::Http {
            status,
            message,
            body,
        }
    }
}

/// Request payload
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    /// `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
}

/// Method, query and body of a request
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            ..Self::default()
        }
    }

    pub fn json<B: Serialize + ?Sized>(method: Method, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok(Self {
            method,
            query: Vec::new(),
            body: RequestBody::Json(value),
        })
    }

    pub fn form(pairs: Vec<(String, String)>) -> Self {
        Self {
            method: Method::POST,
            query: Vec::new(),
            body: RequestBody::Form(pairs),
        }
    }

    /// Append query pairs; empty values are skipped
    pub fn with_query<K: Into<String>>(mut self, pairs: impl IntoIterator<Item = (K, String)>) -> Self {
        self.query.extend(
            pairs
                .into_iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(key, value)| (key.into(), value)),
        );
        self
    }
}

/// PDF file name for an exported report: non-alphanumerics become `_`
pub fn pdf_file_name(report_title: Option<&str>) -> String {
    let safe = match report_title {
        Some(title) if !title.is_empty() => title
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect(),
        _ => "relatorio".to_string(),
    };
    format!("{}_evidencias.pdf", safe)
}

/// REST client
#[derive(Clone)]
pub struct ApiClient {
    config: Config,
    storage: SharedStorage,
    client: Client,
}

impl ApiClient {
    pub fn new(config: Config, storage: SharedStorage) -> Self {
        Self {
            config,
            storage,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn authorization(&self) -> Option<String> {
        self.storage
            .get_item(keys::TOKEN)
            .filter(|token| !token.is_empty())
            .map(|token| format!("Bearer {}", token))
    }

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.config.api_url(path));
        match self.authorization() {
            Some(value) => builder.header(AUTHORIZATION, value),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, path: &str) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!(path, error = %e, "API request failed");
            ApiError::Network(e.to_string())
        })?;

        if !response.status().is_success() {
            let error = ApiError::from_response(response).await;
            tracing::warn!(path, status = ?error.status(), error = %error, "API request rejected");
            return Err(error);
        }
        Ok(response)
    }

    async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        // 204 and other empty bodies decode as JSON null
        let raw: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };
        serde_json::from_slice(raw).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Execute a request and decode its JSON body
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let mut builder = self.builder(options.method, path);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        builder = match options.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Form(pairs) => builder.form(&pairs),
        };
        let response = self.send(builder, path).await?;
        Self::parse_json(response).await
    }

    /// Execute a GET whose body is binary
    pub async fn request_bytes(&self, path: &str) -> Result<Bytes, ApiError> {
        let response = self.send(self.builder(Method::GET, path), path).await?;
        response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    async fn request_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> Result<T, ApiError> {
        let builder = self.builder(Method::POST, path).multipart(form);
        let response = self.send(builder, path).await?;
        Self::parse_json(response).await
    }

    fn file_form(file_name: &str, data: Vec<u8>) -> multipart::Form {
        let part = multipart::Part::bytes(data).file_name(file_name.to_string());
        multipart::Form::new().part("file", part)
    }

    // ---- auth ----

    /// Exchange credentials for a token (form-encoded)
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let options = RequestOptions::form(vec![
            ("username".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
        ]);
        self.request("/auth/login", options).await
    }

    pub async fn me(&self) -> Result<UserInfo, ApiError> {
        self.request("/auth/me", RequestOptions::get()).await
    }

    // ---- catalog ----

    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.request("/produtos", RequestOptions::get()).await
    }

    // ---- reports ----

    pub async fn list_reports(&self, filters: &ReportFilters) -> Result<ReportPage, ApiError> {
        let options = RequestOptions::get().with_query(filters.query_pairs());
        self.request("/secure-reports/reports", options).await
    }

    pub async fn get_report(&self, id: ReportId) -> Result<Report, ApiError> {
        self.request(&format!("/secure-reports/reports/{}", id), RequestOptions::get())
            .await
    }

    pub async fn create_report(&self, draft: &ReportDraft) -> Result<SavedReportResponse, ApiError> {
        self.request("/reports", RequestOptions::json(Method::POST, draft)?)
            .await
    }

    pub async fn update_report(
        &self,
        id: ReportId,
        draft: &ReportDraft,
    ) -> Result<SavedReportResponse, ApiError> {
        self.request(
            &format!("/secure-reports/reports/{}", id),
            RequestOptions::json(Method::PUT, draft)?,
        )
        .await
    }

    /// Update when `id` is known, create otherwise
    pub async fn save_report(
        &self,
        id: Option<ReportId>,
        draft: &ReportDraft,
    ) -> Result<SavedReportResponse, ApiError> {
        match id {
            Some(id) => self.update_report(id, draft).await,
            None => self.create_report(draft).await,
        }
    }

    pub async fn delete_report(&self, id: ReportId) -> Result<Value, ApiError> {
        self.request(&format!("/secure-reports/reports/{}", id), RequestOptions::delete())
            .await
    }

    // ---- test cases ----

    pub async fn create_test_case(
        &self,
        report_id: ReportId,
        draft: &TestCaseDraft,
    ) -> Result<TestCase, ApiError> {
        self.request(
            &format!("/reports/{}/test-cases", report_id),
            RequestOptions::json(Method::POST, draft)?,
        )
        .await
    }

    pub async fn update_test_case(
        &self,
        id: TestCaseId,
        draft: &TestCaseDraft,
    ) -> Result<TestCase, ApiError> {
        self.request(
            &format!("/test-cases/{}", id),
            RequestOptions::json(Method::PUT, draft)?,
        )
        .await
    }

    pub async fn delete_test_case(&self, id: TestCaseId) -> Result<Value, ApiError> {
        self.request(&format!("/test-cases/{}", id), RequestOptions::delete())
            .await
    }

    // ---- search ----

    pub async fn quick_search(&self, query: &str, limit: u32) -> Result<Vec<SearchHit>, ApiError> {
        let options = RequestOptions::get()
            .with_query([("q", query.to_string()), ("limit", limit.to_string())]);
        let response: QuickSearchResponse = self.request("/search/quick", options).await?;
        Ok(response.into_hits())
    }

    pub async fn search_suggestions(&self) -> Result<SearchSuggestions, ApiError> {
        let value: Value = self
            .request("/search/suggestions", RequestOptions::get())
            .await?;
        Ok(SearchSuggestions::from_value(&value))
    }

    pub async fn search_stats(&self) -> Result<Value, ApiError> {
        self.request("/search/stats", RequestOptions::get()).await
    }

    // ---- uploads ----

    pub async fn upload_file(&self, file_name: &str, data: Vec<u8>) -> Result<UploadedFile, ApiError> {
        self.request_multipart("/upload", Self::file_form(file_name, data))
            .await
    }

    pub async fn delete_upload(&self, filename: &str) -> Result<Value, ApiError> {
        self.request(&format!("/uploads/{}", filename), RequestOptions::delete())
            .await
    }

    // ---- pdf ----

    pub async fn export_report_pdf(&self, id: ReportId) -> Result<Bytes, ApiError> {
        self.request_bytes(&format!("/reports/{}/export-pdf", id)).await
    }

    pub async fn export_all_reports_pdf(&self) -> Result<Bytes, ApiError> {
        self.request_bytes("/reports/export-all-pdf").await
    }

    // ---- excel ----

    pub async fn validate_excel(&self, file_name: &str, data: Vec<u8>) -> Result<ExcelValidation, ApiError> {
        self.request_multipart("/excel/validate", Self::file_form(file_name, data))
            .await
    }

    pub async fn import_excel(
        &self,
        file_name: &str,
        data: Vec<u8>,
        metadata: &ExcelImportMetadata,
    ) -> Result<ExcelImportResult, ApiError> {
        let form = metadata
            .fields()
            .into_iter()
            .fold(Self::file_form(file_name, data), |form, (key, value)| {
                form.text(key, value)
            });
        self.request_multipart("/excel/import", form).await
    }

    pub async fn excel_template(&self) -> Result<Value, ApiError> {
        self.request("/excel/template", RequestOptions::get()).await
    }
}
