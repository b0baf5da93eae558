use dioxus::prelude::*;
use rfd::AsyncFileDialog;
use tracing::debug;

use crate::domain::entities::import::{FileType, ImportForm, SelectedFile};
use crate::domain::entities::validation::ValidationIssue;
use crate::infra::http::client::HttpApi;
use crate::ui::state::app_state::AppState;
use crate::ui::widgets::{
    use_table_names, FieldError, TableSelect, BUTTON_STYLE, FIELD_STYLE, INPUT_STYLE,
    PRIMARY_BUTTON_STYLE,
};
use crate::usecase::services::import_service::{ImportService, UPLOAD_FAILED};

async fn pick_file(file_type: Option<FileType>) -> Option<SelectedFile> {
    let extensions: &[&str] = match file_type {
        Some(kind) if kind.is_csv() => &["csv"],
        Some(_) => &["xlsx"],
        None => &["xlsx", "csv"],
    };
    let handle = AsyncFileDialog::new()
        .add_filter("Spreadsheet", extensions)
        .pick_file()
        .await?;
    let name = handle.file_name();
    let bytes = handle.read().await;
    debug!(file = %name, bytes = bytes.len(), "file selected");
    Some(SelectedFile { name, bytes })
}

#[component]
fn NumberField(
    label: &'static str,
    field: &'static str,
    value: String,
    issues: Vec<ValidationIssue>,
    on_input: EventHandler<String>,
) -> Element {
    rsx! {
        div { style: FIELD_STYLE,
            label { "{label}" }
            input {
                style: INPUT_STYLE,
                r#type: "number",
                min: "0",
                value: "{value}",
                oninput: move |event| on_input.call(event.value()),
            }
            FieldError { issues, field: field.to_string() }
        }
    }
}

#[component]
pub fn ImportPage() -> Element {
    let state = use_context::<AppState>();
    let api = use_context::<HttpApi>();
    let tables = use_table_names(state, api.clone());
    let mut form = use_signal(ImportForm::default);
    let mut issues = use_signal(Vec::<ValidationIssue>::new);
    let mut busy = use_signal(|| false);

    let snapshot = form.read().clone();
    let file_type_value = snapshot.file_type.map(FileType::value).unwrap_or_default();
    let file_label = snapshot
        .file
        .as_ref()
        .map(|file| file.name.clone())
        .unwrap_or_else(|| "No file selected".to_string());

    rsx! {
        div { style: "max-width: 480px;",
            div { style: FIELD_STYLE,
                label { "Upload File" }
                div { style: "display: flex; gap: 8px; align-items: center;",
                    button {
                        style: BUTTON_STYLE,
                        disabled: busy(),
                        onclick: move |_| {
                            let file_type = form.read().file_type;
                            spawn(async move {
                                if let Some(file) = pick_file(file_type).await {
                                    form.write().file = Some(file);
                                }
                            });
                        },
                        "Click to Upload"
                    }
                    span { "{file_label}" }
                }
                FieldError { issues: issues(), field: "file".to_string() }
            }

            div { style: FIELD_STYLE,
                label { "Table Name" }
                TableSelect {
                    tables: tables(),
                    selected: snapshot.table_name.clone(),
                    disabled: busy(),
                    on_select: move |table_name: String| form.write().table_name = Some(table_name),
                }
                FieldError { issues: issues(), field: "table_name".to_string() }
            }

            div { style: FIELD_STYLE,
                label { "File Type" }
                select {
                    style: INPUT_STYLE,
                    value: "{file_type_value}",
                    onchange: move |event| form.write().file_type = FileType::from_value(&event.value()),
                    option { value: "", disabled: true, selected: snapshot.file_type.is_none(), "Select a file type" }
                    for kind in FileType::ALL {
                        {
                            let value = kind.value();
                            let label = kind.label();
                            rsx! {
                                option { key: "{value}", value, "{label}" }
                            }
                        }
                    }
                }
                FieldError { issues: issues(), field: "file_type".to_string() }
            }

            {match snapshot.file_type {
                Some(kind) if kind.is_csv() => rsx! {
                    NumberField {
                        label: "Range Start",
                        field: "range_start",
                        value: snapshot.range_start.clone(),
                        issues: issues(),
                        on_input: move |value| form.write().range_start = value,
                    }
                    NumberField {
                        label: "Range End",
                        field: "range_end",
                        value: snapshot.range_end.clone(),
                        issues: issues(),
                        on_input: move |value| form.write().range_end = value,
                    }
                },
                Some(_) => rsx! {
                    NumberField {
                        label: "Total Row",
                        field: "total_row",
                        value: snapshot.total_row.clone(),
                        issues: issues(),
                        on_input: move |value| form.write().total_row = value,
                    }
                    NumberField {
                        label: "Start Row",
                        field: "range",
                        value: snapshot.start_row.clone(),
                        issues: issues(),
                        on_input: move |value| form.write().start_row = value,
                    }
                },
                None => rsx! {},
            }}

            button {
                style: PRIMARY_BUTTON_STYLE,
                disabled: busy(),
                onclick: move |_| {
                    let api = api.clone();
                    let submitted = form.read().clone();
                    busy.set(true);
                    spawn(async move {
                        match ImportService::new(&api).submit(&submitted).await {
                            Ok(message) => {
                                form.set(ImportForm::default());
                                issues.set(Vec::new());
                                state.success(message);
                            }
                            Err(err) => {
                                issues.set(err.issues().to_vec());
                                state.report_submit(&err, UPLOAD_FAILED);
                            }
                        }
                        busy.set(false);
                    });
                },
                if busy() { "Uploading..." } else { "Submit" }
            }
        }
    }
}
