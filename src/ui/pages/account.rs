use dioxus::prelude::*;

use crate::domain::entities::session::Credentials;
use crate::domain::entities::validation::ValidationIssue;
use crate::infra::http::client::HttpApi;
use crate::ui::route::Route;
use crate::ui::state::app_state::AppState;
use crate::ui::widgets::{FieldError, FIELD_STYLE, INPUT_STYLE, PRIMARY_BUTTON_STYLE};
use crate::usecase::services::account_service::AccountService;

#[derive(Clone, Copy, PartialEq, Eq)]
enum AccountAction {
    Update,
    Register,
}

impl AccountAction {
    fn heading(self) -> &'static str {
        match self {
            AccountAction::Update => "Update Account",
            AccountAction::Register => "Create User",
        }
    }

    fn success(self) -> &'static str {
        match self {
            AccountAction::Update => "Account updated successfully",
            AccountAction::Register => "User created successfully",
        }
    }

    fn fallback(self) -> &'static str {
        match self {
            AccountAction::Update => "Update failed. Try again.",
            AccountAction::Register => "Create User failed. Try again.",
        }
    }
}

#[component]
fn CredentialsForm(action: AccountAction, initial_username: String) -> Element {
    let mut state = use_context::<AppState>();
    let api = use_context::<HttpApi>();
    let mut username = use_signal(move || initial_username);
    let mut password = use_signal(String::new);
    let mut issues = use_signal(Vec::<ValidationIssue>::new);
    let mut busy = use_signal(|| false);
    let heading = action.heading();

    rsx! {
        div { style: "border: 1px solid #ddd; border-radius: 8px; padding: 16px; margin-bottom: 16px;",
            h3 { style: "margin-top: 0;", "{heading}" }
            div { style: FIELD_STYLE,
                label { "Username" }
                input {
                    style: INPUT_STYLE,
                    value: "{username}",
                    oninput: move |event| username.set(event.value()),
                }
                FieldError { issues: issues(), field: "username".to_string() }
            }
            div { style: FIELD_STYLE,
                label { "Password" }
                input {
                    style: INPUT_STYLE,
                    r#type: "password",
                    value: "{password}",
                    oninput: move |event| password.set(event.value()),
                }
                FieldError { issues: issues(), field: "password".to_string() }
            }
            button {
                style: PRIMARY_BUTTON_STYLE,
                disabled: busy(),
                onclick: move |_| {
                    let Some(session) = state.auth.read().session().cloned() else {
                        state.navigate(Route::Login);
                        return;
                    };
                    let credentials = Credentials {
                        username: username().trim().to_string(),
                        password: password(),
                    };
                    let api = api.clone();
                    busy.set(true);
                    spawn(async move {
                        let service = AccountService::new(&api);
                        let result = match action {
                            AccountAction::Update => service.update_account(&session, &credentials).await,
                            AccountAction::Register => service.register_user(&session, &credentials).await,
                        };
                        match result {
                            Ok(()) => {
                                if action == AccountAction::Update {
                                    state.auth.write().rename(&credentials.username);
                                } else {
                                    username.set(String::new());
                                }
                                password.set(String::new());
                                issues.set(Vec::new());
                                state.success(action.success());
                            }
                            Err(err) => {
                                issues.set(err.issues().to_vec());
                                state.report_submit(&err, action.fallback());
                            }
                        }
                        busy.set(false);
                    });
                },
                if busy() { "Saving..." } else { "{heading}" }
            }
        }
    }
}

#[component]
pub fn AccountPage() -> Element {
    let state = use_context::<AppState>();
    let username = state.username();
    let is_super_admin = state.auth.read().is_super_admin();

    rsx! {
        div { style: "max-width: 420px;",
            CredentialsForm { action: AccountAction::Update, initial_username: username }
            if is_super_admin {
                CredentialsForm { action: AccountAction::Register, initial_username: String::new() }
            }
        }
    }
}
