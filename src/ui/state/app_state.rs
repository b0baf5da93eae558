use dioxus::prelude::*;

use crate::domain::entities::session::AuthContext;
use crate::ui::feedback::{apply_failure, submit_failure, Notice};
use crate::ui::route::Route;
use crate::usecase::ports::api::ApiError;
use crate::usecase::services::submit::SubmitError;

/// Shared signals provided once by `App` and read by every page.
#[derive(Clone, Copy, PartialEq)]
pub struct AppState {
    pub route: Signal<Route>,
    pub auth: Signal<AuthContext>,
    pub notice: Signal<Option<Notice>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            route: use_signal(Route::default),
            auth: use_signal(AuthContext::default),
            notice: use_signal(|| None::<Notice>),
        }
    }

    pub fn navigate(mut self, route: Route) {
        let authenticated = self.auth.read().is_authenticated();
        self.notice.set(None);
        self.route.set(route.guarded(authenticated));
    }

    pub fn success(mut self, text: impl Into<String>) {
        self.notice.set(Some(Notice::success(text)));
    }

    pub fn fail(mut self, text: impl Into<String>) {
        self.notice.set(Some(Notice::error(text)));
    }

    pub fn report(mut self, err: &ApiError, fallback: &str) {
        let notice = {
            let mut auth = self.auth.write();
            let mut route = self.route.write();
            apply_failure(err, &mut *auth, &mut *route, fallback)
        };
        self.notice.set(Some(notice));
    }

    pub fn report_submit(mut self, err: &SubmitError, fallback: &str) {
        let notice = {
            let mut auth = self.auth.write();
            let mut route = self.route.write();
            submit_failure(err, &mut *auth, &mut *route, fallback)
        };
        self.notice.set(Some(notice));
    }

    pub fn username(&self) -> String {
        self.auth.read().username().to_string()
    }
}
