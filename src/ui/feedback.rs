use crate::domain::entities::session::AuthContext;
use crate::domain::entities::validation::summarize;
use crate::ui::route::Route;
use crate::usecase::ports::api::ApiError;
use crate::usecase::services::submit::SubmitError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient message shown above the current view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    pub fn color(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "#1f7a1f",
            NoticeKind::Error => "#b42318",
        }
    }
}

/// Single place where backend failures reach the UI. An expired session is
/// dropped and the user sent back to the login view.
pub fn apply_failure(
    err: &ApiError,
    auth: &mut AuthContext,
    route: &mut Route,
    fallback: &str,
) -> Notice {
    if err.is_auth_expired() {
        auth.clear();
        *route = Route::Login;
    }
    Notice::error(err.user_message(fallback))
}

pub fn submit_failure(
    err: &SubmitError,
    auth: &mut AuthContext,
    route: &mut Route,
    fallback: &str,
) -> Notice {
    match err {
        SubmitError::Invalid(issues) => Notice::error(summarize(issues)),
        SubmitError::Api(err) => apply_failure(err, auth, route, fallback),
    }
}
