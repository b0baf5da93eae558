use dioxus::prelude::*;
use tracing::error;

use crate::domain::entities::dataset::TableName;
use crate::domain::entities::validation::{message_for, ValidationIssue};
use crate::infra::http::client::HttpApi;
use crate::ui::state::app_state::AppState;
use crate::usecase::ports::api::AdminApi;

pub const FIELD_STYLE: &str = "display: flex; flex-direction: column; gap: 4px; margin-bottom: 12px;";
pub const INPUT_STYLE: &str = "border: 1px solid #bbb; padding: 4px 8px; border-radius: 6px;";
pub const BUTTON_STYLE: &str =
    "border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;";
pub const PRIMARY_BUTTON_STYLE: &str =
    "border: 1px solid #1d4ed8; background: #2563eb; color: #fff; padding: 4px 12px; border-radius: 6px; cursor: pointer;";

/// Table names for every table picker; fetched once per mounted page.
pub fn use_table_names(state: AppState, api: HttpApi) -> Signal<Vec<TableName>> {
    let mut tables = use_signal(Vec::<TableName>::new);
    use_future(move || {
        let api = api.clone();
        async move {
            match api.list_tables().await {
                Ok(list) => tables.set(list),
                Err(err) => {
                    error!(error = %err, "error fetching table names");
                    state.report(&err, "Failed to load table names");
                }
            }
        }
    });
    tables
}

#[component]
pub fn TableSelect(
    tables: Vec<TableName>,
    selected: Option<String>,
    disabled: bool,
    on_select: EventHandler<String>,
) -> Element {
    let current = selected.clone().unwrap_or_default();
    rsx! {
        select {
            style: INPUT_STYLE,
            disabled,
            value: "{current}",
            onchange: move |event| {
                let value = event.value();
                if !value.is_empty() {
                    on_select.call(value);
                }
            },
            option { value: "", disabled: true, selected: selected.is_none(), "Select a table" }
            for table in tables.iter() {
                option {
                    key: "{table.id}",
                    value: "{table.table_name}",
                    selected: selected.as_deref() == Some(table.table_name.as_str()),
                    "{table.table_name}"
                }
            }
        }
    }
}

#[component]
pub fn FieldError(issues: Vec<ValidationIssue>, field: String) -> Element {
    match message_for(&issues, &field) {
        Some(message) => rsx! {
            span { style: "color: #b42318; font-size: 12px;", "{message}" }
        },
        None => rsx! {},
    }
}
