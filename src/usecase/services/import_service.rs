use tracing::{info, warn};

use crate::domain::entities::import::ImportForm;
use crate::usecase::ports::api::AdminApi;
use crate::usecase::services::submit::SubmitError;

pub const UPLOAD_FAILED: &str = "Upload failed. Please try again.";

pub struct ImportService<'a, A> {
    api: &'a A,
}

impl<'a, A: AdminApi> ImportService<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Validates the form and posts the file to the endpoint for its type.
    /// Returns the backend's confirmation message.
    pub async fn submit(&self, form: &ImportForm) -> Result<String, SubmitError> {
        let request = form.validate().map_err(SubmitError::Invalid)?;
        let endpoint = request.file_type.endpoint();

        match self.api.upload(&request).await {
            Ok(receipt) => {
                info!(
                    table = %request.table_name,
                    endpoint,
                    file = %request.file.name,
                    "import submitted"
                );
                Ok(receipt
                    .message
                    .unwrap_or_else(|| "File uploaded successfully".to_string()))
            }
            Err(err) => {
                warn!(endpoint, error = %err, "upload error");
                Err(err.into())
            }
        }
    }
}
