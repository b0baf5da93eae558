use std::cell::RefCell;

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::domain::entities::cell_mapping::DataMappingPayload;
use crate::domain::entities::column_spec::{HeaderGroup, NodePath, TableHeadersPayload};
use crate::domain::entities::dataset::{
    PageQuery, PageResult, Row, SourceColumn, TableName, UserSummary,
};
use crate::domain::entities::import::{FileType, ImportForm, ImportRequest, SelectedFile, UploadReceipt};
use crate::domain::entities::session::{AuthContext, AuthSession, Credentials, LoginResponse};
use crate::ui::feedback::submit_failure;
use crate::ui::route::Route;
use crate::usecase::ports::api::{AdminApi, ApiError};
use crate::usecase::services::account_service::AccountService;
use crate::usecase::services::cell_mapping::CellMappingEditor;
use crate::usecase::services::data_view::{load_page, DataView};
use crate::usecase::services::generation::ResponseOutcome;
use crate::usecase::services::header_renderer::{load_columns, HeaderLayout, HeaderLoadError};
use crate::usecase::services::import_service::ImportService;
use crate::usecase::services::mapping_editor::MappingEditor;
use crate::usecase::services::source_keys::load_source_keys;
use crate::usecase::services::submit::SubmitError;

/// In-memory backend. Every call is recorded; `failure` makes every call fail.
#[derive(Default)]
struct FakeApi {
    failure: Option<ApiError>,
    header_groups: Vec<HeaderGroup>,
    source_columns: Vec<SourceColumn>,
    rows: Vec<Row>,
    total_rows: u64,
    login_response: Option<LoginResponse>,
    calls: RefCell<Vec<&'static str>>,
    saved_headers: RefCell<Vec<TableHeadersPayload>>,
    saved_mappings: RefCell<Vec<DataMappingPayload>>,
    uploads: RefCell<Vec<ImportRequest>>,
    queries: RefCell<Vec<PageQuery>>,
}

impl FakeApi {
    fn failing(err: ApiError) -> Self {
        Self {
            failure: Some(err),
            ..Self::default()
        }
    }

    fn record(&self, call: &'static str) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(call);
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }
}

impl AdminApi for FakeApi {
    async fn list_tables(&self) -> Result<Vec<TableName>, ApiError> {
        self.record("list_tables")?;
        Ok(vec![TableName {
            id: 1,
            table_name: "orders".to_string(),
        }])
    }

    async fn table_headers(&self, _table_name: &str) -> Result<Vec<HeaderGroup>, ApiError> {
        self.record("table_headers")?;
        Ok(self.header_groups.clone())
    }

    async fn save_table_headers(&self, payload: &TableHeadersPayload) -> Result<(), ApiError> {
        self.record("save_table_headers")?;
        self.saved_headers.borrow_mut().push(payload.clone());
        Ok(())
    }

    async fn source_columns(&self, _table_name: &str) -> Result<Vec<SourceColumn>, ApiError> {
        self.record("source_columns")?;
        Ok(self.source_columns.clone())
    }

    async fn save_data_mapping(&self, payload: &DataMappingPayload) -> Result<(), ApiError> {
        self.record("save_data_mapping")?;
        self.saved_mappings.borrow_mut().push(payload.clone());
        Ok(())
    }

    async fn master_data(&self, query: &PageQuery) -> Result<PageResult, ApiError> {
        self.record("master_data")?;
        self.queries.borrow_mut().push(query.clone());
        Ok(PageResult {
            data: self.rows.clone(),
            total_rows: self.total_rows,
        })
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, ApiError> {
        self.record("list_users")?;
        Ok(Vec::new())
    }

    async fn upload(&self, request: &ImportRequest) -> Result<UploadReceipt, ApiError> {
        self.record("upload")?;
        self.uploads.borrow_mut().push(request.clone());
        Ok(UploadReceipt {
            message: Some("Data imported: 12 rows".to_string()),
        })
    }

    async fn login(&self, _credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.record("login")?;
        self.login_response
            .clone()
            .ok_or_else(|| ApiError::Decode("no login response configured".to_string()))
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.record("logout")
    }

    async fn update_user(&self, _user_id: i64, _credentials: &Credentials) -> Result<(), ApiError> {
        self.record("update_user")
    }

    async fn register_user(&self, _credentials: &Credentials) -> Result<(), ApiError> {
        self.record("register_user")
    }
}

fn session(is_super_admin: bool) -> AuthSession {
    AuthSession {
        user_id: 3,
        username: "alice".to_string(),
        is_super_admin,
    }
}

fn credentials(username: &str, password: &str) -> Credentials {
    Credentials {
        username: username.to_string(),
        password: password.to_string(),
    }
}

fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => panic!("row fixture should be an object"),
    }
}

fn customer_tree(editor: &mut MappingEditor) {
    let root = NodePath::root(0);
    assert!(editor.add_top_level(), "should add the top-level column");
    editor.set_title(&root, "Customer").expect("should set root title");
    let child = editor.add_child(&root).expect("should add child");
    editor.set_title(&child, "Id").expect("should set child title");
    editor
        .set_source_key(&child, Some("customer_id".to_string()))
        .expect("should set source key");
    editor.set_width_input(&child, "90").expect("should set width");
    editor.set_sortable_input(&child, "true").expect("should set sorter");
}

#[tokio::test]
async fn cell_mapping_posts_header_cell_and_column_pairs() {
    let api = FakeApi::default();
    let mut editor = CellMappingEditor::new();
    let key = editor.rows()[0].key;
    editor.set_header_cell(key, Some("B".to_string()));
    editor.set_column_name(key, Some("customer_id".to_string()));

    editor
        .submit(&api, Some("orders"))
        .await
        .expect("submit should succeed");

    let sent = api.saved_mappings.borrow();
    assert_eq!(
        serde_json::to_value(&sent[0]).expect("should serialize payload"),
        json!({
            "table_name": "orders",
            "detail": [{ "header_cell": "B", "column_name": "customer_id" }]
        })
    );
    assert_eq!(editor.rows().len(), 1, "form should reset to one empty row");
    assert_eq!(editor.rows()[0].header_cell, None);
}

#[tokio::test]
async fn incomplete_cell_mapping_sends_nothing() {
    let api = FakeApi::default();
    let mut editor = CellMappingEditor::new();

    let err = editor
        .submit(&api, Some("orders"))
        .await
        .expect_err("empty row should be rejected");

    assert_eq!(err.issues().len(), 2);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn header_submit_clears_editor_and_sends_tree() {
    let api = FakeApi::default();
    let mut editor = MappingEditor::default();
    customer_tree(&mut editor);

    editor
        .submit(&api, Some("orders"))
        .await
        .expect("submit should succeed");

    let sent = api.saved_headers.borrow();
    assert_eq!(
        serde_json::to_value(&sent[0]).expect("should serialize payload"),
        json!({
            "table_name": "orders",
            "headers": [{
                "title": "Customer",
                "sorter": "false",
                "children": [{
                    "title": "Id",
                    "data_index": "customer_id",
                    "width": 90,
                    "sorter": "true"
                }]
            }]
        })
    );
    assert!(editor.columns().is_empty());
}

#[tokio::test]
async fn failed_header_submit_keeps_the_draft() {
    let api = FakeApi::failing(ApiError::Rejected {
        status: 500,
        message: Some("database unavailable".to_string()),
    });
    let mut editor = MappingEditor::default();
    customer_tree(&mut editor);
    let draft = editor.clone();

    let err = editor
        .submit(&api, Some("orders"))
        .await
        .expect_err("submit should fail");

    assert_eq!(editor, draft);
    assert!(matches!(err, SubmitError::Api(ApiError::Rejected { status: 500, .. })));
}

#[tokio::test]
async fn expired_session_during_submit_returns_to_login() {
    let api = FakeApi::failing(ApiError::AuthExpired);
    let mut editor = MappingEditor::default();
    customer_tree(&mut editor);
    let mut auth = AuthContext::default();
    auth.begin(session(false));
    let mut route = Route::HeaderMapping;

    let err = editor
        .submit(&api, Some("orders"))
        .await
        .expect_err("submit should fail");
    submit_failure(&err, &mut auth, &mut route, "Failed to save table headers");

    assert!(!auth.is_authenticated());
    assert_eq!(route, Route::Login);
    assert_eq!(editor.node_count(), 2, "draft should survive the redirect");
}

#[tokio::test]
async fn nested_headers_render_with_child_accessors() {
    let group: HeaderGroup = serde_json::from_value(json!({
        "id": 4,
        "table_name": "people",
        "headers": [{
            "title": "Name",
            "children": [{ "title": "First", "data_index": "first_name" }]
        }]
    }))
    .expect("should decode header group");
    let api = FakeApi {
        header_groups: vec![group],
        ..FakeApi::default()
    };

    let columns = load_columns(&api, "people").await.expect("should load columns");
    let layout = HeaderLayout::build(&columns);

    assert_eq!(columns[0].title, "Name");
    assert_eq!(columns[0].children[0].accessor.as_deref(), Some("first_name"));
    assert_eq!(columns[0].children[0].width, 150);
    assert_eq!(layout.leaves.len(), 1);
    assert_eq!(
        layout.leaves[0].cell(&row(json!({ "first_name": "Ada" }))),
        Some(&json!("Ada"))
    );
}

#[tokio::test]
async fn data_view_loads_headers_then_first_page() {
    let group: HeaderGroup = serde_json::from_value(json!({
        "headers": [
            { "title": "Date", "data_index": "date" },
            { "title": "Qty", "data_index": "qty", "sorter": "true" }
        ]
    }))
    .expect("should decode header group");
    let api = FakeApi {
        header_groups: vec![group],
        rows: vec![row(json!({ "date": "2024-05-03", "qty": 4 }))],
        total_rows: 21,
        ..FakeApi::default()
    };
    let today = NaiveDate::from_ymd_opt(2024, 5, 20).expect("valid date");
    let mut view = DataView::default();

    let ticket = view.select_table("orders");
    let columns = load_columns(&api, "orders").await;
    assert_eq!(view.apply_columns(ticket, columns), ResponseOutcome::Applied);

    let (ticket, query) = view
        .page_request(1, "alice", today)
        .expect("table should be selected");
    let page = load_page(&api, &query).await;
    assert_eq!(view.apply_page(ticket, page), ResponseOutcome::Applied);

    let sent = api.queries.borrow();
    assert_eq!(
        serde_json::to_value(&sent[0]).expect("should serialize query"),
        json!({
            "table_name": "orders",
            "page": 1,
            "limit": 10,
            "inserted_by": "alice",
            "start_date": "2024-05-01",
            "end_date": "2024-05-31"
        })
    );
    assert_eq!(view.rows[0].get("date"), Some(&json!("Fri May 03 2024")));
    assert_eq!(view.pagination.page_count(), 3);
}

#[tokio::test]
async fn header_failure_leaves_data_view_columns() {
    let api = FakeApi::failing(ApiError::Transport("connection refused".to_string()));
    let mut view = DataView::default();

    let ticket = view.select_table("orders");
    let outcome = view.apply_columns(ticket, load_columns(&api, "orders").await);

    assert!(matches!(
        outcome,
        ResponseOutcome::Failed(HeaderLoadError::Api(ApiError::Transport(_)))
    ));
    assert!(view.columns.is_empty());
}

#[tokio::test]
async fn source_keys_are_column_names() {
    let api = FakeApi {
        source_columns: vec![
            SourceColumn {
                id: 1,
                column_name: "customer_id".to_string(),
            },
            SourceColumn {
                id: 2,
                column_name: "total".to_string(),
            },
        ],
        ..FakeApi::default()
    };

    let keys = load_source_keys(&api, "orders").await.expect("should load keys");

    assert_eq!(keys, vec!["customer_id", "total"]);
}

#[tokio::test]
async fn csv_import_uploads_ranges() {
    let api = FakeApi::default();
    let form = ImportForm {
        table_name: Some("orders".to_string()),
        file_type: Some(FileType::FormattedCsv),
        range_start: "2".to_string(),
        range_end: "40".to_string(),
        file: Some(SelectedFile {
            name: "orders.csv".to_string(),
            bytes: b"id,total\n1,10\n".to_vec(),
        }),
        ..ImportForm::default()
    };

    let message = ImportService::new(&api)
        .submit(&form)
        .await
        .expect("import should succeed");

    assert_eq!(message, "Data imported: 12 rows");
    let uploads = api.uploads.borrow();
    assert_eq!(uploads[0].file_type.endpoint(), "/upload/csv-formated");
    assert_eq!(
        uploads[0].text_fields(),
        vec![
            ("table_name", "orders".to_string()),
            ("range_start", "2".to_string()),
            ("range_end", "40".to_string()),
        ]
    );
}

#[tokio::test]
async fn import_without_file_sends_nothing() {
    let api = FakeApi::default();
    let form = ImportForm {
        table_name: Some("orders".to_string()),
        file_type: Some(FileType::Xlsx),
        total_row: "10".to_string(),
        start_row: "2".to_string(),
        ..ImportForm::default()
    };

    let err = ImportService::new(&api)
        .submit(&form)
        .await
        .expect_err("missing file should be rejected");

    assert_eq!(err.issues()[0].field, "file");
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn login_builds_session_without_password() {
    let api = FakeApi {
        login_response: Some(LoginResponse {
            user_id: 9,
            username: None,
            is_super_admin: true,
        }),
        ..FakeApi::default()
    };

    let session = AccountService::new(&api)
        .login(&credentials("root", "secret"))
        .await
        .expect("login should succeed");

    assert_eq!(
        session,
        AuthSession {
            user_id: 9,
            username: "root".to_string(),
            is_super_admin: true,
        }
    );
}

#[tokio::test]
async fn blank_login_is_rejected_locally() {
    let api = FakeApi::default();

    let err = AccountService::new(&api)
        .login(&credentials(" ", ""))
        .await
        .expect_err("blank credentials should be rejected");

    assert_eq!(err.issues().len(), 2);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn only_super_admins_register_users() {
    let api = FakeApi::default();
    let service = AccountService::new(&api);

    let err = service
        .register_user(&session(false), &credentials("bob", "pw"))
        .await
        .expect_err("regular users should not register others");
    assert_eq!(err.issues()[0].field, "account");
    assert!(api.calls().is_empty());

    service
        .register_user(&session(true), &credentials("bob", "pw"))
        .await
        .expect("super admin should register");
    assert_eq!(api.calls(), vec!["register_user"]);
}

#[tokio::test]
async fn account_update_targets_session_user() {
    let api = FakeApi::default();

    AccountService::new(&api)
        .update_account(&session(false), &credentials("alice2", "new-secret"))
        .await
        .expect("update should succeed");

    assert_eq!(api.calls(), vec!["update_user"]);
}

#[tokio::test]
async fn logout_failure_is_swallowed() {
    let api = FakeApi::failing(ApiError::Transport("offline".to_string()));

    AccountService::new(&api).logout().await;

    assert_eq!(api.calls(), vec!["logout"]);
}
