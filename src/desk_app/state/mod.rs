use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use serde_json::Value;

use crate::desk_app::api::{pdf_file_name, ApiClient, ApiError};
use crate::desk_app::auth::{restore_session, sign_in, AuthError, AuthStore, Session};
use crate::desk_app::cart::{CartStore, CountBadge};
use crate::desk_app::config::Config;
use crate::desk_app::forms::{
    read_local_file, ExcelImportState, ReportFormState, ReportListState, ReportViewState,
    TestCaseFormState, TestCaseSubmission,
};
use crate::desk_app::notifications::{Notification, NotificationSink, ToastQueue};
use crate::desk_app::router::{self, Panel, ViewRouter};
use crate::desk_app::search::QuickSearch;
use crate::desk_app::storage::{MemoryStorage, SharedStorage, SqliteStorage, StorageError};
use crate::desk_app::tasks::{self, Pending};
use crate::desk_app::types::AppView;
use crate::shared::assurelog::{
    ExcelImportResult, ExcelValidation, Report, ReportId, ReportPage, SavedReportResponse,
    SearchHit, SearchSuggestions, TestCase, TestCaseId, UploadedFile,
};
use crate::shared::{Product, ProductId};

type ApiPending<T> = Option<Pending<Result<T, ApiError>>>;

/// In-flight requests, one slot per kind
#[derive(Default)]
struct PendingRequests {
    sign_in: Option<Pending<Result<Session, AuthError>>>,
    restore: Option<Pending<Result<Option<Session>, StorageError>>>,
    products: ApiPending<Vec<Product>>,
    reports: ApiPending<ReportPage>,
    suggestions: ApiPending<SearchSuggestions>,
    stats: ApiPending<Value>,
    report_form_load: ApiPending<Report>,
    report_view_load: ApiPending<Report>,
    report_save: ApiPending<SavedReportResponse>,
    report_delete: ApiPending<ReportId>,
    test_case_save: ApiPending<TestCase>,
    test_case_delete: ApiPending<TestCaseId>,
    evidence_upload: ApiPending<UploadedFile>,
    evidence_delete: ApiPending<Value>,
    pdf: ApiPending<(PathBuf, Bytes)>,
    excel_validate: ApiPending<ExcelValidation>,
    excel_import: ApiPending<ExcelImportResult>,
    excel_template: ApiPending<Value>,
    /// Every dispatched quick search stays here until it answers
    quick_search: Vec<(u64, Pending<Result<Vec<SearchHit>, ApiError>>)>,
}

/// Central application state shared across egui views.
pub struct AppState {
    pub config: Config,
    storage: SharedStorage,
    pub api: ApiClient,
    pub auth: AuthStore,
    pub current_view: AppView,
    pub username_input: String,
    pub password_input: String,

    pub cart: CartStore,
    pub cart_badge: Arc<CountBadge>,
    pub toasts: Arc<ToastQueue>,
    pub products: Vec<Product>,
    pub products_loading: bool,
    pub products_error: Option<String>,

    pub router: ViewRouter,
    pub report_list: ReportListState,
    pub report_form: Option<ReportFormState>,
    pub report_view: Option<ReportViewState>,
    pub test_case_form: Option<TestCaseFormState>,
    pub excel: ExcelImportState,
    pub quick_search: QuickSearch,
    pub search_stats: Option<Value>,

    pending: PendingRequests,
}

impl AppState {
    /// State backed by the SQLite store in the configured data dir, or by
    /// memory when it cannot be opened
    pub fn new(config: Config) -> Self {
        let storage: SharedStorage = match SqliteStorage::open(config.data_dir().join("local.db")) {
            Ok(db) => {
                tracing::info!(path = %db.path().display(), "using local database");
                Arc::new(db)
            }
            Err(e) => {
                tracing::warn!(error = %e, "data dir unavailable, session and cart will not persist");
                Arc::new(MemoryStorage::new())
            }
        };
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: Config, storage: SharedStorage) -> Self {
        let api = ApiClient::new(config.clone(), storage.clone());
        let cart_badge = Arc::new(CountBadge::default());
        let toasts = Arc::new(ToastQueue::default());
        let mut cart = CartStore::new(storage.clone());
        cart.subscribe(cart_badge.clone());
        cart.set_notifier(toasts.clone());
        // the badge is visible on every screen, so seed it from a carried-over cart
        cart.update_cart_count();
        let quick_search = QuickSearch::new(config.app().search_debounce);

        let mut state = Self {
            auth: AuthStore::new(storage.clone()),
            config,
            storage,
            api,
            current_view: AppView::Auth,
            username_input: String::new(),
            password_input: String::new(),
            cart,
            cart_badge,
            toasts,
            products: Vec::new(),
            products_loading: false,
            products_error: None,
            router: ViewRouter::new(),
            report_list: ReportListState::new(),
            report_form: None,
            report_view: None,
            test_case_form: None,
            excel: ExcelImportState::default(),
            quick_search,
            search_stats: None,
            pending: PendingRequests::default(),
        };
        state.bootstrap();
        state
    }

    /// Validate a persisted token in the background. A cached profile lets
    /// the landing page show right away.
    fn bootstrap(&mut self) {
        if !self.auth.has_persisted_token() {
            return;
        }
        if self.auth.is_signed_in() {
            self.current_view = AppView::Landing;
        }
        self.auth.loading = true;
        let api = self.api.clone();
        let storage = self.storage.clone();
        self.pending.restore = Some(tasks::spawn(move || async move {
            restore_session(&api, storage.as_ref()).await
        }));
    }

    /// Fold in every finished request. Called once per frame.
    pub fn poll(&mut self) {
        self.poll_auth();
        self.poll_catalog();
        self.poll_reports();
        self.poll_test_cases();
        self.poll_files();
        self.poll_search(Instant::now());

        if self.current_view != AppView::Auth && !self.auth.is_signed_in() && !self.auth.loading {
            tracing::info!("session ended, back to login");
            self.logout();
        }
    }

    /// Whether any request is still outstanding
    pub fn is_busy(&self) -> bool {
        let p = &self.pending;
        p.sign_in.is_some()
            || p.restore.is_some()
            || p.products.is_some()
            || p.reports.is_some()
            || p.suggestions.is_some()
            || p.stats.is_some()
            || p.report_form_load.is_some()
            || p.report_view_load.is_some()
            || p.report_save.is_some()
            || p.report_delete.is_some()
            || p.test_case_save.is_some()
            || p.test_case_delete.is_some()
            || p.evidence_upload.is_some()
            || p.evidence_delete.is_some()
            || p.pdf.is_some()
            || p.excel_validate.is_some()
            || p.excel_import.is_some()
            || p.excel_template.is_some()
            || !p.quick_search.is_empty()
            || self.quick_search.is_loading()
            || self.quick_search.has_pending_edit()
    }

    /// Run an API result through the session guard; failures are logged,
    /// toasted and returned as their display message
    fn settle<T>(&mut self, action: &'static str, result: Result<T, ApiError>) -> Result<T, String> {
        self.auth.guard(result).map_err(|e| {
            tracing::error!(action, error = %e, "request failed");
            let message = if e.is_unauthorized() {
                "Sessão expirada. Entre novamente.".to_string()
            } else {
                e.to_string()
            };
            self.toasts.notify(Notification::error(message.clone()));
            message
        })
    }

    // ---- auth ----

    pub fn handle_login(&mut self) {
        if self.username_input.trim().is_empty() || self.password_input.is_empty() {
            self.auth
                .set_error("Username and password are required".to_string());
            return;
        }

        self.auth.loading = true;
        self.auth.clear_error();

        let username = self.username_input.clone();
        let password = self.password_input.clone();
        let api = self.api.clone();
        let storage = self.storage.clone();
        self.pending.sign_in = Some(tasks::spawn(move || async move {
            sign_in(&api, storage.as_ref(), &username, &password).await
        }));
    }

    fn poll_auth(&mut self) {
        if let Some(outcome) = tasks::take_ready(&mut self.pending.sign_in) {
            self.auth.loading = false;
            match outcome {
                Ok(Ok(session)) => match self.auth.install(session) {
                    Ok(()) => {
                        self.password_input.clear();
                        self.current_view = AppView::Landing;
                    }
                    Err(e) => self.auth.set_error(format!("Could not save session: {}", e)),
                },
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "login failed");
                    self.auth.set_error(e.user_message());
                }
                Err(lost) => self.auth.set_error(lost.to_string()),
            }
        }

        if let Some(outcome) = tasks::take_ready(&mut self.pending.restore) {
            self.auth.loading = false;
            match outcome {
                Ok(Ok(Some(session))) => {
                    if let Err(e) = self.auth.install(session) {
                        tracing::warn!(error = %e, "could not refresh cached profile");
                    }
                    if self.current_view == AppView::Auth {
                        self.current_view = AppView::Landing;
                    }
                }
                Ok(Ok(None)) => self.logout(),
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "session restore failed");
                    self.logout();
                }
                Err(lost) => {
                    tracing::error!(error = %lost, "session restore lost");
                    self.logout();
                }
            }
        }
    }

    /// Drop the session and everything fetched under it
    pub fn logout(&mut self) {
        self.auth.sign_out();
        self.current_view = AppView::Auth;
        self.password_input.clear();
        self.products.clear();
        self.products_loading = false;
        self.products_error = None;
        self.router = ViewRouter::new();
        self.report_list = ReportListState::new();
        self.report_form = None;
        self.report_view = None;
        self.test_case_form = None;
        self.excel = ExcelImportState::default();
        self.quick_search = QuickSearch::new(self.config.app().search_debounce);
        self.search_stats = None;
        self.pending = PendingRequests::default();
    }

    // ---- catalog ----

    pub fn open_catalog(&mut self) {
        self.current_view = AppView::Catalog;
        // reflect a cart carried over from an earlier session
        self.cart.update_cart_count();
        if self.products.is_empty() && self.pending.products.is_none() {
            self.load_products();
        }
    }

    pub fn load_products(&mut self) {
        self.products_loading = true;
        self.products_error = None;
        let api = self.api.clone();
        self.pending.products = Some(tasks::spawn(move || async move { api.list_products().await }));
    }

    pub fn add_product_to_cart(&mut self, id: ProductId) {
        let Some(product) = self.products.iter().find(|p| p.id == id) else {
            tracing::warn!(product_id = id, "product not in listing");
            return;
        };
        if let Err(e) = self.cart.add_to_cart(product.id, &product.nome, product.cart_price()) {
            tracing::error!(product_id = id, error = %e, "failed to update cart");
            self.toasts
                .notify(Notification::error("Não foi possível atualizar o carrinho."));
        }
    }

    pub fn clear_cart(&mut self) {
        if let Err(e) = self.cart.clear() {
            tracing::error!(error = %e, "failed to clear cart");
        }
    }

    fn poll_catalog(&mut self) {
        if let Some(result) = tasks::take_api_result(&mut self.pending.products) {
            self.products_loading = false;
            match self.settle("list products", result) {
                Ok(products) => {
                    tracing::debug!(count = products.len(), "catalog loaded");
                    self.products = products;
                }
                Err(message) => self.products_error = Some(message),
            }
        }
    }

    // ---- assurelog navigation ----

    pub fn open_assurelog(&mut self) {
        self.current_view = AppView::AssureLog;
        self.sync_panels();
    }

    /// Apply a router transition and set up the panel it lands on
    pub fn navigate(&mut self, transition: impl FnOnce(&mut ViewRouter)) {
        transition(&mut self.router);
        self.sync_panels();
    }

    fn sync_panels(&mut self) {
        let selection = self.router.selection().clone();
        self.report_form = None;
        self.report_view = None;
        self.test_case_form = None;
        self.pending.report_form_load = None;
        self.pending.report_view_load = None;

        match router::panel(&selection, None) {
            Panel::ReportList { .. } => {
                self.report_list.mark_stale();
                self.load_report_list();
            }
            Panel::ReportForm { report } => {
                let form = ReportFormState::for_selection(report);
                if let Some(id) = form.needs_load() {
                    let api = self.api.clone();
                    self.pending.report_form_load =
                        Some(tasks::spawn(move || async move { api.get_report(id).await }));
                }
                self.report_form = Some(form);
            }
            Panel::ReportView { report_id } => {
                self.report_view = Some(ReportViewState::new(report_id));
                self.load_report_view(report_id);
            }
            Panel::TestCaseForm { report_id, test_case } => {
                self.test_case_form = Some(TestCaseFormState::for_selection(report_id, test_case));
            }
            Panel::Welcome { .. } | Panel::Settings | Panel::Empty => {}
        }
    }

    // ---- reports ----

    pub fn load_report_list(&mut self) {
        if self.report_list.begin_load() {
            let api = self.api.clone();
            let filters = self.report_list.filters.clone();
            self.pending.reports =
                Some(tasks::spawn(move || async move { api.list_reports(&filters).await }));
        }
        if self.report_list.begin_suggestions() {
            let api = self.api.clone();
            self.pending.suggestions =
                Some(tasks::spawn(move || async move { api.search_suggestions().await }));
        }
    }

    /// Refetch the list with the current filters
    pub fn apply_filters(&mut self) {
        self.report_list.mark_stale();
        self.load_report_list();
    }

    pub fn clear_filters(&mut self) {
        self.report_list.clear_filters();
        self.load_report_list();
    }

    fn load_report_view(&mut self, report_id: ReportId) {
        let api = self.api.clone();
        self.pending.report_view_load =
            Some(tasks::spawn(move || async move { api.get_report(report_id).await }));
    }

    pub fn save_report(&mut self) {
        let Some(form) = self.report_form.as_mut() else {
            return;
        };
        let Ok((id, draft)) = form.submission() else {
            return;
        };
        let api = self.api.clone();
        self.pending.report_save =
            Some(tasks::spawn(move || async move { api.save_report(id, &draft).await }));
    }

    pub fn delete_report(&mut self, id: ReportId) {
        let api = self.api.clone();
        self.pending.report_delete = Some(tasks::spawn(move || async move {
            api.delete_report(id).await.map(|_| id)
        }));
    }

    pub fn load_search_stats(&mut self) {
        let api = self.api.clone();
        self.pending.stats = Some(tasks::spawn(move || async move { api.search_stats().await }));
    }

    fn poll_reports(&mut self) {
        if let Some(result) = tasks::take_api_result(&mut self.pending.reports) {
            let result = self
                .settle("list reports", result)
                .map(|page| (page.reports, page.total));
            self.report_list.finish(result);
            // filters changed while the previous fetch was running
            self.load_report_list();
        }

        if let Some(result) = tasks::take_api_result(&mut self.pending.suggestions) {
            match self.auth.guard(result) {
                Ok(suggestions) => self.report_list.suggestions = suggestions,
                Err(e) => tracing::warn!(error = %e, "filter suggestions unavailable"),
            }
        }

        if let Some(result) = tasks::take_api_result(&mut self.pending.stats) {
            if let Ok(stats) = self.settle("search stats", result) {
                self.search_stats = Some(stats);
            }
        }

        if let Some(result) = tasks::take_api_result(&mut self.pending.report_form_load) {
            let result = self.settle("load report", result);
            if let Some(form) = self.report_form.as_mut() {
                match result {
                    Ok(report) if form.needs_load() == Some(report.id) => form.load(&report),
                    Ok(_) => {}
                    Err(message) => form.load_failed(message),
                }
            }
        }

        if let Some(result) = tasks::take_api_result(&mut self.pending.report_view_load) {
            let result = self.settle("load report", result);
            if let Some(view) = self.report_view.as_mut() {
                view.finish(result);
            }
        }

        if let Some(result) = tasks::take_api_result(&mut self.pending.report_save) {
            match self.settle("save report", result) {
                Ok(saved) => {
                    self.toasts.notify(Notification::success("Relatório salvo."));
                    self.report_list.mark_stale();
                    self.navigate(|r| r.report_saved(saved));
                }
                Err(message) => {
                    if let Some(form) = self.report_form.as_mut() {
                        form.save_failed(message);
                    }
                }
            }
        }

        if let Some(result) = tasks::take_api_result(&mut self.pending.report_delete) {
            if let Ok(id) = self.settle("delete report", result) {
                self.toasts.notify(Notification::success("Relatório excluído."));
                self.report_list.mark_stale();
                let viewing_deleted = self.report_view.as_ref().map(ReportViewState::report_id) == Some(id);
                if viewing_deleted {
                    self.navigate(|r| r.back_to_list());
                } else {
                    self.load_report_list();
                }
            }
        }
    }

    // ---- test cases ----

    pub fn save_test_case(&mut self) {
        let Some(form) = self.test_case_form.as_mut() else {
            return;
        };
        let Ok(submission) = form.submission() else {
            return;
        };
        let api = self.api.clone();
        self.pending.test_case_save = Some(tasks::spawn(move || async move {
            match submission {
                TestCaseSubmission::Create { report_id, draft } => {
                    api.create_test_case(report_id, &draft).await
                }
                TestCaseSubmission::Update { id, draft } => api.update_test_case(id, &draft).await,
            }
        }));
    }

    pub fn cancel_test_case(&mut self) {
        self.pending.test_case_save = None;
        self.navigate(|r| r.test_case_saved_or_canceled());
    }

    pub fn delete_test_case(&mut self, id: TestCaseId) {
        let api = self.api.clone();
        self.pending.test_case_delete = Some(tasks::spawn(move || async move {
            api.delete_test_case(id).await.map(|_| id)
        }));
    }

    fn poll_test_cases(&mut self) {
        if let Some(result) = tasks::take_api_result(&mut self.pending.test_case_save) {
            match self.settle("save test case", result) {
                Ok(saved) => {
                    tracing::debug!(test_case_id = saved.id, report_id = saved.report_id, "test case saved");
                    self.toasts.notify(Notification::success("Caso de teste salvo."));
                    self.navigate(|r| r.test_case_saved_or_canceled());
                }
                Err(message) => {
                    if let Some(form) = self.test_case_form.as_mut() {
                        form.save_failed(message);
                    }
                }
            }
        }

        if let Some(result) = tasks::take_api_result(&mut self.pending.test_case_delete) {
            if let Ok(id) = self.settle("delete test case", result) {
                tracing::debug!(test_case_id = id, "test case deleted");
                self.toasts.notify(Notification::success("Caso de teste excluído."));
                if let Some(report_id) = self.report_view.as_mut().map(|view| {
                    view.reload();
                    view.report_id()
                }) {
                    self.load_report_view(report_id);
                }
            }
        }
    }

    // ---- files ----

    /// Upload the file named in the evidence field
    pub fn upload_evidence(&mut self) {
        let Some(form) = self.test_case_form.as_mut() else {
            return;
        };
        match read_local_file(&form.evidence_path) {
            Ok(file) => {
                form.uploading = true;
                form.error = None;
                let api = self.api.clone();
                self.pending.evidence_upload = Some(tasks::spawn(move || async move {
                    api.upload_file(&file.name, file.data).await
                }));
            }
            Err(e) => form.error = Some(e.user_message().to_string()),
        }
    }

    /// Remove an evidence entry from the form and its upload from the server
    pub fn remove_evidence(&mut self, index: usize) {
        let Some(filename) = self.test_case_form.as_mut().and_then(|form| form.detach(index)) else {
            return;
        };
        let api = self.api.clone();
        self.pending.evidence_delete =
            Some(tasks::spawn(move || async move { api.delete_upload(&filename).await }));
    }

    /// Where exported PDFs are written
    pub fn export_dir(&self) -> PathBuf {
        dirs::download_dir().unwrap_or_else(|| self.config.data_dir())
    }

    pub fn export_report_pdf(&mut self) {
        let target_dir = self.export_dir();
        let Some(view) = self.report_view.as_mut() else {
            return;
        };
        view.exporting = true;
        let id = view.report_id();
        let target = target_dir.join(pdf_file_name(view.title()));
        let api = self.api.clone();
        self.pending.pdf = Some(tasks::spawn(move || async move {
            let bytes = api.export_report_pdf(id).await?;
            Ok::<_, ApiError>((target, bytes))
        }));
    }

    pub fn export_all_reports_pdf(&mut self) {
        let target = self.export_dir().join(pdf_file_name(Some("todos_relatorios")));
        let api = self.api.clone();
        self.pending.pdf = Some(tasks::spawn(move || async move {
            let bytes = api.export_all_reports_pdf().await?;
            Ok::<_, ApiError>((target, bytes))
        }));
    }

    pub fn validate_excel(&mut self) {
        let Ok(file) = self.excel.spreadsheet() else {
            return;
        };
        let api = self.api.clone();
        self.pending.excel_validate = Some(tasks::spawn(move || async move {
            api.validate_excel(&file.name, file.data).await
        }));
    }

    pub fn import_excel(&mut self) {
        let Ok((file, metadata)) = self.excel.import_request() else {
            return;
        };
        let api = self.api.clone();
        self.pending.excel_import = Some(tasks::spawn(move || async move {
            api.import_excel(&file.name, file.data, &metadata).await
        }));
    }

    pub fn load_excel_template(&mut self) {
        let api = self.api.clone();
        self.pending.excel_template =
            Some(tasks::spawn(move || async move { api.excel_template().await }));
    }

    fn poll_files(&mut self) {
        if let Some(result) = tasks::take_api_result(&mut self.pending.evidence_upload) {
            let result = self.settle("upload evidence", result);
            if let Some(form) = self.test_case_form.as_mut() {
                match result {
                    Ok(file) => form.attach(&file),
                    Err(message) => {
                        form.uploading = false;
                        form.error = Some(message);
                    }
                }
            }
        }

        if let Some(result) = tasks::take_api_result(&mut self.pending.evidence_delete) {
            // the entry is already gone from the form
            let _ = self.settle("delete evidence", result);
        }

        if let Some(result) = tasks::take_api_result(&mut self.pending.pdf) {
            if let Some(view) = self.report_view.as_mut() {
                view.exporting = false;
            }
            if let Ok((target, bytes)) = self.settle("export pdf", result) {
                match std::fs::write(&target, &bytes) {
                    Ok(()) => {
                        tracing::info!(path = %target.display(), size = bytes.len(), "pdf exported");
                        self.toasts
                            .notify(Notification::success(format!("PDF salvo em {}", target.display())));
                    }
                    Err(e) => {
                        tracing::error!(path = %target.display(), error = %e, "failed to write pdf");
                        self.toasts
                            .notify(Notification::error(format!("Não foi possível salvar o PDF: {}", e)));
                    }
                }
            }
        }

        if let Some(result) = tasks::take_api_result(&mut self.pending.excel_validate) {
            let result = self.settle("validate spreadsheet", result);
            self.excel.validated(result);
        }

        if let Some(result) = tasks::take_api_result(&mut self.pending.excel_import) {
            let result = self.settle("import spreadsheet", result);
            let message = result
                .as_ref()
                .ok()
                .and_then(|outcome| outcome.message.clone())
                .unwrap_or_else(|| "Planilha importada.".to_string());
            if let Some(report_id) = self.excel.imported(result) {
                self.toasts.notify(Notification::success(message));
                self.report_list.mark_stale();
                self.navigate(|r| r.view_report(report_id));
            }
        }

        if let Some(result) = tasks::take_api_result(&mut self.pending.excel_template) {
            if let Ok(template) = self.settle("spreadsheet template", result) {
                self.excel.template = Some(template);
            }
        }
    }

    // ---- quick search ----

    /// The search box text changed
    pub fn quick_search_edited(&mut self) {
        self.quick_search.touch(Instant::now());
    }

    /// Open the report behind a quick-search hit
    pub fn open_search_hit(&mut self, hit: SearchHit) {
        tracing::debug!(kind = hit.kind.label(), id = hit.id, "opening search hit");
        self.current_view = AppView::AssureLog;
        self.navigate(|r| r.view_report(hit.id));
    }

    fn poll_search(&mut self, now: Instant) {
        if let Some(dispatch) = self.quick_search.poll(now) {
            let api = self.api.clone();
            let limit = self.config.app().quick_search_limit;
            let generation = dispatch.generation;
            let rx = tasks::spawn(move || async move { api.quick_search(&dispatch.query, limit).await });
            self.pending.quick_search.push((generation, rx));
        }

        let mut waiting = Vec::with_capacity(self.pending.quick_search.len());
        for (generation, rx) in std::mem::take(&mut self.pending.quick_search) {
            let mut slot = Some(rx);
            match tasks::take_api_result(&mut slot) {
                Some(result) => {
                    let result = self.auth.guard(result);
                    self.quick_search.apply_results(generation, result);
                }
                None => waiting.extend(slot.map(|rx| (generation, rx))),
            }
        }
        self.pending.quick_search = waiting;
    }
}
