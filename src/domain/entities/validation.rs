use std::fmt;

/// A required-field omission found before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

pub fn summarize(issues: &[ValidationIssue]) -> String {
    match issues {
        [] => "invalid input".to_string(),
        [only] => only.message.clone(),
        [first, rest @ ..] => format!("{} (and {} more)", first.message, rest.len()),
    }
}

/// First message recorded for `field`, for inline display under an input.
pub fn message_for<'a>(issues: &'a [ValidationIssue], field: &str) -> Option<&'a str> {
    issues
        .iter()
        .find(|issue| issue.field == field)
        .map(|issue| issue.message.as_str())
}
