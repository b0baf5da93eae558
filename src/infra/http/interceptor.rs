use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

use crate::usecase::ports::api::ApiError;

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Every response from the backend passes through here. 401 from any endpoint
/// becomes `AuthExpired`; other non-2xx statuses carry the body's `message`.
pub async fn intercept(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let err = classify(status, &body);
    warn!(status = status.as_u16(), error = %err, "backend rejected request");
    Err(err)
}

pub fn classify(status: StatusCode, body: &str) -> ApiError {
    if status == StatusCode::UNAUTHORIZED {
        return ApiError::AuthExpired;
    }
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty());
    ApiError::Rejected {
        status: status.as_u16(),
        message,
    }
}

pub fn transport(err: reqwest::Error) -> ApiError {
    warn!(error = %err, "request did not complete");
    ApiError::Transport(err.to_string())
}

pub async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.text().await.map_err(transport)?;
    serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_is_auth_expired_regardless_of_body() {
        let err = classify(StatusCode::UNAUTHORIZED, r#"{"message":"jwt expired"}"#);
        assert!(err.is_auth_expired());
    }

    #[test]
    fn rejection_carries_backend_message() {
        let err = classify(StatusCode::CONFLICT, r#"{"message":"Username already exists"}"#);
        assert_eq!(
            err,
            ApiError::Rejected {
                status: 409,
                message: Some("Username already exists".to_string())
            }
        );
        assert_eq!(err.user_message("Create User failed"), "Username already exists");
    }

    #[test]
    fn non_json_body_falls_back() {
        let err = classify(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(
            err,
            ApiError::Rejected {
                status: 500,
                message: None
            }
        );
        assert_eq!(err.user_message("Upload failed"), "Upload failed");
    }

    #[test]
    fn blank_message_is_ignored() {
        let err = classify(StatusCode::BAD_REQUEST, r#"{"message":"  "}"#);
        assert_eq!(err.user_message("Failed"), "Failed");
    }
}
