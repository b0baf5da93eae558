use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::entities::cell_mapping::DataMappingPayload;
use crate::domain::entities::column_spec::{HeaderGroup, TableHeadersPayload};
use crate::domain::entities::dataset::{PageQuery, PageResult, SourceColumn, TableName, UserSummary};
use crate::domain::entities::import::{ImportRequest, UploadReceipt};
use crate::domain::entities::session::{Credentials, LoginResponse};
use crate::infra::http::interceptor::{decode, intercept, transport};
use crate::usecase::ports::api::{AdminApi, ApiError};

/// `AdminApi` over HTTP. The session cookie set by `/login` rides along on
/// every later request.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

impl HttpApi {
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.cookie_store(true);
        let client = builder
            .build()
            .map_err(|err| ApiError::Transport(format!("failed to create HTTP client: {err}")))?;
        Ok(Self { client, base_url })
    }

    /// Appends percent-encoded path segments to the base URL.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Transport(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn with_credentials(request: RequestBuilder) -> RequestBuilder {
        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();
        request
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = Self::with_credentials(request)
            .send()
            .await
            .map_err(transport)?;
        intercept(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        debug!(%url, "GET");
        let response = self.send(self.client.get(url)).await?;
        decode(response).await
    }

    async fn post_json<B: serde::Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint(segments)?;
        debug!(%url, "POST");
        self.send(self.client.post(url).json(body)).await
    }
}

impl AdminApi for HttpApi {
    async fn list_tables(&self) -> Result<Vec<TableName>, ApiError> {
        self.get_json(&["table_name"]).await
    }

    async fn table_headers(&self, table_name: &str) -> Result<Vec<HeaderGroup>, ApiError> {
        self.get_json(&["table_headers", table_name]).await
    }

    async fn save_table_headers(&self, payload: &TableHeadersPayload) -> Result<(), ApiError> {
        self.post_json(&["table_headers"], payload).await?;
        Ok(())
    }

    async fn source_columns(&self, table_name: &str) -> Result<Vec<SourceColumn>, ApiError> {
        self.get_json(&["master_column_name", table_name]).await
    }

    async fn save_data_mapping(&self, payload: &DataMappingPayload) -> Result<(), ApiError> {
        self.post_json(&["data_maping"], payload).await?;
        Ok(())
    }

    async fn master_data(&self, query: &PageQuery) -> Result<PageResult, ApiError> {
        let url = self.endpoint(&["master_data"])?;
        debug!(%url, table = %query.table_name, page = query.page, "GET");
        let response = self.send(self.client.get(url).query(query)).await?;
        decode(response).await
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, ApiError> {
        self.get_json(&["get_users"]).await
    }

    async fn upload(&self, request: &ImportRequest) -> Result<UploadReceipt, ApiError> {
        let segments = request
            .file_type
            .endpoint()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>();
        let url = self.endpoint(&segments)?;

        let part = Part::bytes(request.file.bytes.clone()).file_name(request.file.name.clone());
        let form = request
            .text_fields()
            .into_iter()
            .fold(Form::new().part("file", part), |form, (name, value)| {
                form.text(name, value)
            });

        debug!(%url, file = %request.file.name, bytes = request.file.bytes.len(), "POST multipart");
        let response = self.send(self.client.post(url).multipart(form)).await?;
        decode(response).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let response = self.post_json(&["login"], credentials).await?;
        decode(response).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.post_json(&["logout"], &serde_json::json!({})).await?;
        Ok(())
    }

    async fn update_user(&self, user_id: i64, credentials: &Credentials) -> Result<(), ApiError> {
        let id = user_id.to_string();
        let url = self.endpoint(&["users", &id])?;
        debug!(%url, "PUT");
        self.send(self.client.put(url).json(credentials)).await?;
        Ok(())
    }

    async fn register_user(&self, credentials: &Credentials) -> Result<(), ApiError> {
        self.post_json(&["users", "register"], credentials).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpApi {
        HttpApi::new(Url::parse(base).expect("url")).expect("client")
    }

    #[test]
    fn endpoint_appends_to_base_path() {
        let api = api("http://localhost:3000/api/");
        let url = api.endpoint(&["table_headers", "orders"]).expect("url");
        assert_eq!(url.as_str(), "http://localhost:3000/api/table_headers/orders");
    }

    #[test]
    fn table_names_are_percent_encoded() {
        let api = api("http://localhost:3000");
        let url = api.endpoint(&["table_headers", "sales/2024 q1"]).expect("url");
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/table_headers/sales%2F2024%20q1"
        );
    }
}
