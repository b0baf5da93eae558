use thiserror::Error;

use crate::domain::entities::validation::{summarize, ValidationIssue};
use crate::usecase::ports::api::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Required fields were missing; nothing was sent.
    #[error("{}", summarize(.0))]
    Invalid(Vec<ValidationIssue>),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SubmitError {
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            SubmitError::Invalid(issues) => issues,
            SubmitError::Api(_) => &[],
        }
    }
}

pub fn ensure_valid(issues: Vec<ValidationIssue>) -> Result<(), SubmitError> {
    if issues.is_empty() {
        Ok(())
    } else {
        Err(SubmitError::Invalid(issues))
    }
}
