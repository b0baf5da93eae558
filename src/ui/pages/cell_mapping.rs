use dioxus::prelude::*;

use crate::domain::entities::cell_mapping::header_cell_labels;
use crate::domain::entities::validation::ValidationIssue;
use crate::infra::http::client::HttpApi;
use crate::ui::state::app_state::AppState;
use crate::ui::widgets::{
    use_table_names, FieldError, TableSelect, BUTTON_STYLE, FIELD_STYLE, INPUT_STYLE,
    PRIMARY_BUTTON_STYLE,
};
use crate::usecase::services::cell_mapping::{column_name_field, header_cell_field, CellMappingEditor};
use crate::usecase::services::generation::RequestGeneration;
use crate::usecase::services::source_keys::{load_source_keys, SourceKeyChoices};

#[component]
pub fn CellMappingPage() -> Element {
    let state = use_context::<AppState>();
    let api = use_context::<HttpApi>();
    let tables = use_table_names(state, api.clone());
    let header_cells = use_hook(header_cell_labels);
    let mut selected = use_signal(|| None::<String>);
    let mut choices = use_signal(SourceKeyChoices::default);
    let mut column_requests = use_signal(RequestGeneration::default);
    let mut editor = use_signal(CellMappingEditor::new);
    let mut issues = use_signal(Vec::<ValidationIssue>::new);
    let mut busy = use_signal(|| false);

    let api_for_columns = api.clone();
    let api_for_submit = api.clone();
    let rows = editor.read().rows().to_vec();
    let selectable = choices.read().is_selectable();
    let column_names = choices.read().options().to_vec();

    rsx! {
        div { style: "max-width: 720px;",
            div { style: FIELD_STYLE,
                label { "Table Name" }
                TableSelect {
                    tables: tables(),
                    selected: selected(),
                    disabled: busy(),
                    on_select: move |table_name: String| {
                        selected.set(Some(table_name.clone()));
                        choices.set(SourceKeyChoices::Loading);
                        let ticket = column_requests.write().begin();
                        let api = api_for_columns.clone();
                        spawn(async move {
                            let result = load_source_keys(&api, &table_name).await;
                            if !column_requests.read().is_current(ticket) {
                                return;
                            }
                            match result {
                                Ok(names) => choices.set(SourceKeyChoices::Ready(names)),
                                Err(err) => {
                                    choices.set(SourceKeyChoices::Failed);
                                    state.report(&err, "Failed to load column names");
                                }
                            }
                        });
                    },
                }
                FieldError { issues: issues(), field: "table_name".to_string() }
            }

            for row in rows.iter() {
                {
                    let key = row.key;
                    let header_cell = row.header_cell.clone().unwrap_or_default();
                    let column_name = row.column_name.clone().unwrap_or_default();
                    let header_cells = header_cells.clone();
                    let column_names = column_names.clone();
                    rsx! {
                        div {
                            key: "{key.0}",
                            style: "display: flex; gap: 8px; align-items: flex-start; margin-bottom: 8px;",
                            div { style: FIELD_STYLE,
                                select {
                                    style: INPUT_STYLE,
                                    value: "{header_cell}",
                                    onchange: move |event| {
                                        editor.write().set_header_cell(key, Some(event.value()));
                                    },
                                    option { value: "", "Header cell" }
                                    for label in header_cells.iter() {
                                        option { key: "{label}", value: "{label}", "{label}" }
                                    }
                                }
                                FieldError { issues: issues(), field: header_cell_field(key) }
                            }
                            div { style: FIELD_STYLE,
                                select {
                                    style: INPUT_STYLE,
                                    disabled: !selectable,
                                    value: "{column_name}",
                                    onchange: move |event| {
                                        editor.write().set_column_name(key, Some(event.value()));
                                    },
                                    option { value: "", "Column name" }
                                    for name in column_names.iter() {
                                        option { key: "{name}", value: "{name}", "{name}" }
                                    }
                                }
                                FieldError { issues: issues(), field: column_name_field(key) }
                            }
                            button {
                                style: BUTTON_STYLE,
                                onclick: move |_| {
                                    editor.write().remove_row(key);
                                },
                                "Remove"
                            }
                        }
                    }
                }
            }
            FieldError { issues: issues(), field: "mappings".to_string() }

            div { style: "display: flex; gap: 8px; margin-top: 12px;",
                button {
                    style: BUTTON_STYLE,
                    disabled: busy(),
                    onclick: move |_| {
                        editor.write().add_row();
                    },
                    "Add Mapping"
                }
                button {
                    style: PRIMARY_BUTTON_STYLE,
                    disabled: busy(),
                    onclick: move |_| {
                        let api = api_for_submit.clone();
                        let table_name = selected();
                        busy.set(true);
                        spawn(async move {
                            let mut draft = editor.read().clone();
                            match draft.submit(&api, table_name.as_deref()).await {
                                Ok(()) => {
                                    editor.set(draft);
                                    selected.set(None);
                                    choices.set(SourceKeyChoices::Unselected);
                                    issues.set(Vec::new());
                                    state.success("Mapping saved successfully");
                                }
                                Err(err) => {
                                    issues.set(err.issues().to_vec());
                                    state.report_submit(&err, "Failed to save mapping");
                                }
                            }
                            busy.set(false);
                        });
                    },
                    if busy() { "Saving..." } else { "Submit" }
                }
            }
        }
    }
}
