use thiserror::Error;

use crate::domain::entities::cell_mapping::DataMappingPayload;
use crate::domain::entities::column_spec::{HeaderGroup, TableHeadersPayload};
use crate::domain::entities::dataset::{PageQuery, PageResult, SourceColumn, TableName, UserSummary};
use crate::domain::entities::import::{ImportRequest, UploadReceipt};
use crate::domain::entities::session::{Credentials, LoginResponse};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was received.
    #[error("network error: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    #[error(
        "request rejected ({}): {}",
        .status,
        .message.as_deref().unwrap_or("no message")
    )]
    Rejected { status: u16, message: Option<String> },

    /// 401 from any endpoint.
    #[error("session expired")]
    AuthExpired,

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text for a transient notification. `fallback` names the action that
    /// failed, e.g. "Failed to load table names".
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Transport(_) => {
                "Could not reach the server. Please check your connection and try again."
                    .to_string()
            }
            ApiError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Rejected { message: None, .. } | ApiError::Decode(_) => fallback.to_string(),
            ApiError::AuthExpired => "Your session has expired. Please log in again.".to_string(),
        }
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ApiError::AuthExpired)
    }
}

/// The backend REST surface. One method per endpoint.
#[allow(async_fn_in_trait)]
pub trait AdminApi {
    async fn list_tables(&self) -> Result<Vec<TableName>, ApiError>;
    async fn table_headers(&self, table_name: &str) -> Result<Vec<HeaderGroup>, ApiError>;
    async fn save_table_headers(&self, payload: &TableHeadersPayload) -> Result<(), ApiError>;
    async fn source_columns(&self, table_name: &str) -> Result<Vec<SourceColumn>, ApiError>;
    async fn save_data_mapping(&self, payload: &DataMappingPayload) -> Result<(), ApiError>;
    async fn master_data(&self, query: &PageQuery) -> Result<PageResult, ApiError>;
    async fn list_users(&self) -> Result<Vec<UserSummary>, ApiError>;
    async fn upload(&self, request: &ImportRequest) -> Result<UploadReceipt, ApiError>;
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
    async fn update_user(&self, user_id: i64, credentials: &Credentials) -> Result<(), ApiError>;
    async fn register_user(&self, credentials: &Credentials) -> Result<(), ApiError>;
}
