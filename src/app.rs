use dioxus::prelude::*;
use tracing::info;

use crate::domain::entities::session::Credentials;
use crate::domain::entities::validation::ValidationIssue;
use crate::infra::http::client::HttpApi;
use crate::ui::pages::account::AccountPage;
use crate::ui::pages::cell_mapping::CellMappingPage;
use crate::ui::pages::data_view::DataViewPage;
use crate::ui::pages::header_mapping::HeaderMappingPage;
use crate::ui::pages::import::ImportPage;
use crate::ui::route::Route;
use crate::ui::state::app_state::AppState;
use crate::ui::widgets::{FieldError, BUTTON_STYLE, FIELD_STYLE, INPUT_STYLE, PRIMARY_BUTTON_STYLE};
use crate::usecase::ports::api::ApiError;
use crate::usecase::services::account_service::AccountService;
use crate::usecase::services::submit::SubmitError;

#[component]
pub fn App() -> Element {
    let state = AppState::new();
    use_context_provider(|| state);

    let authenticated = state.auth.read().is_authenticated();
    let route = (state.route)().guarded(authenticated);

    rsx! {
        div {
            style: "font-family: sans-serif; padding: 12px; background: #fff; min-height: 100vh;",
            NoticeBar {}
            if route == Route::Login {
                LoginPage {}
            } else {
                Shell { route }
            }
        }
    }
}

#[component]
fn NoticeBar() -> Element {
    let state = use_context::<AppState>();
    let mut notice = state.notice;
    let Some(current) = notice() else {
        return rsx! {};
    };
    let color = current.color();

    rsx! {
        div {
            style: "display: flex; justify-content: space-between; align-items: center; border: 1px solid {color}; color: {color}; border-radius: 6px; padding: 8px 12px; margin-bottom: 12px;",
            span { "{current.text}" }
            button {
                style: BUTTON_STYLE,
                onclick: move |_| notice.set(None),
                "Dismiss"
            }
        }
    }
}

#[component]
fn Shell(route: Route) -> Element {
    let mut state = use_context::<AppState>();
    let api = use_context::<HttpApi>();
    let username = state.username();

    rsx! {
        div {
            nav {
                style: "display: flex; gap: 8px; align-items: center; margin-bottom: 12px; position: sticky; top: 0; background: #fff; z-index: 900; padding: 8px 0; border-bottom: 1px solid #eee;",
                for item in Route::MENU {
                    {
                        let label = item.label();
                        let weight = if item == route { "600" } else { "400" };
                        rsx! {
                            button {
                                key: "{label}",
                                style: "{BUTTON_STYLE} font-weight: {weight};",
                                onclick: move |_| state.navigate(item),
                                "{label}"
                            }
                        }
                    }
                }
                span { style: "margin-left: auto;", "{username}" }
                button {
                    style: BUTTON_STYLE,
                    onclick: move |_| {
                        let api = api.clone();
                        spawn(async move {
                            AccountService::new(&api).logout().await;
                            state.auth.write().clear();
                            state.navigate(Route::Login);
                        });
                    },
                    "Logout"
                }
            }

            {match route {
                Route::DataView => rsx! { DataViewPage {} },
                Route::HeaderMapping => rsx! { HeaderMappingPage {} },
                Route::CellMapping => rsx! { CellMappingPage {} },
                Route::Import => rsx! { ImportPage {} },
                Route::Account => rsx! { AccountPage {} },
                Route::Login => rsx! {},
            }}
        }
    }
}

#[component]
fn LoginPage() -> Element {
    let mut state = use_context::<AppState>();
    let api = use_context::<HttpApi>();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut issues = use_signal(Vec::<ValidationIssue>::new);
    let mut busy = use_signal(|| false);

    rsx! {
        div { style: "max-width: 360px; margin: 80px auto; border: 1px solid #ddd; border-radius: 8px; padding: 24px;",
            h2 { style: "margin-top: 0;", "Login" }
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
                    let credentials = Credentials {
                        username: username().trim().to_string(),
                        password: password(),
                    };
                    let api = api.clone();
                    busy.set(true);
                    spawn(async move {
                        match AccountService::new(&api).login(&credentials).await {
                            Ok(session) => {
                                info!(username = %session.username, "session started");
                                state.auth.write().begin(session);
                                password.set(String::new());
                                issues.set(Vec::new());
                                state.navigate(Route::DataView);
                                state.success("Login successful");
                            }
                            Err(SubmitError::Api(ApiError::AuthExpired)) => {
                                state.fail("Invalid username or password");
                            }
                            Err(err) => {
                                issues.set(err.issues().to_vec());
                                state.report_submit(&err, "Login failed. Try again.");
                            }
                        }
                        busy.set(false);
                    });
                },
                if busy() { "Signing in..." } else { "Login" }
            }
        }
    }
}
