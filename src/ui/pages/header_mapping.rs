use dioxus::prelude::*;
use tracing::warn;

use crate::domain::entities::column_spec::{NodePath, Sortable, MAX_HEADER_DEPTH};
use crate::domain::entities::validation::ValidationIssue;
use crate::infra::http::client::HttpApi;
use crate::ui::state::app_state::AppState;
use crate::ui::widgets::{
    use_table_names, FieldError, TableSelect, BUTTON_STYLE, FIELD_STYLE, INPUT_STYLE,
    PRIMARY_BUTTON_STYLE,
};
use crate::usecase::services::generation::RequestGeneration;
use crate::usecase::services::mapping_editor::{title_field, EditorError, MappingEditor};
use crate::usecase::services::source_keys::{load_source_keys, SourceKeyChoices};

fn edit(
    mut editor: Signal<MappingEditor>,
    path: &NodePath,
    apply: impl FnOnce(&mut MappingEditor, &NodePath) -> Result<(), EditorError>,
) {
    if let Err(err) = apply(&mut *editor.write(), path) {
        warn!(%path, error = %err, "column edit rejected");
    }
}

#[component]
pub fn HeaderMappingPage() -> Element {
    let state = use_context::<AppState>();
    let api = use_context::<HttpApi>();
    let tables = use_table_names(state, api.clone());
    let mut selected = use_signal(|| None::<String>);
    let mut choices = use_signal(SourceKeyChoices::default);
    let mut key_requests = use_signal(RequestGeneration::default);
    let mut editor = use_signal(MappingEditor::default);
    let mut issues = use_signal(Vec::<ValidationIssue>::new);
    let mut busy = use_signal(|| false);

    let api_for_keys = api.clone();
    let api_for_submit = api.clone();
    let root_count = editor.read().columns().len();
    let can_add = editor.read().can_add_top_level();

    rsx! {
        div { style: "max-width: 960px;",
            div { style: FIELD_STYLE,
                label { "Table Name" }
                TableSelect {
                    tables: tables(),
                    selected: selected(),
                    disabled: busy(),
                    on_select: move |table_name: String| {
                        selected.set(Some(table_name.clone()));
                        choices.set(SourceKeyChoices::Loading);
                        let ticket = key_requests.write().begin();
                        let api = api_for_keys.clone();
                        spawn(async move {
                            let result = load_source_keys(&api, &table_name).await;
                            if !key_requests.read().is_current(ticket) {
                                return;
                            }
                            match result {
                                Ok(keys) => choices.set(SourceKeyChoices::Ready(keys)),
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

            for index in 0..root_count {
                ColumnCard {
                    key: "{index}",
                    path: NodePath::root(index),
                    editor,
                    choices,
                    issues,
                    busy: busy(),
                }
            }
            FieldError { issues: issues(), field: "headers".to_string() }

            div { style: "display: flex; gap: 8px; margin-top: 12px;",
                button {
                    style: BUTTON_STYLE,
                    disabled: !can_add || busy(),
                    onclick: move |_| {
                        editor.write().add_top_level();
                    },
                    "Add Column"
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
                            let submitted = draft.columns().to_vec();
                            match draft.submit(&api, table_name.as_deref()).await {
                                Ok(()) => {
                                    editor.write().clear_if_unchanged(&submitted);
                                    issues.set(Vec::new());
                                    state.success("Table headers saved successfully");
                                }
                                Err(err) => {
                                    issues.set(err.issues().to_vec());
                                    state.report_submit(&err, "Failed to save table headers");
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

#[component]
fn ColumnCard(
    path: NodePath,
    mut editor: Signal<MappingEditor>,
    choices: Signal<SourceKeyChoices>,
    issues: Signal<Vec<ValidationIssue>>,
    busy: bool,
) -> Element {
    let Some(node) = editor.read().node(&path).cloned() else {
        return rsx! {};
    };
    let depth = path.depth();
    let indent = (depth - 1) * 24;
    let width = node.width.map(|width| width.to_string()).unwrap_or_default();
    let source_key = node.source_key.clone().unwrap_or_default();
    let sorter = node.sortable.as_str();
    let selectable = choices.read().is_selectable();
    let options = choices.read().options().to_vec();
    let heading = match depth {
        1 => format!("Column {path}"),
        2 => format!("Child {path}"),
        _ => format!("Sub child {path}"),
    };

    let title_path = path.clone();
    let key_path = path.clone();
    let width_path = path.clone();
    let sorter_path = path.clone();
    let child_path = path.clone();
    let remove_path = path.clone();

    rsx! {
        div { style: "margin-left: {indent}px; border: 1px solid #ddd; border-radius: 8px; padding: 12px; margin-bottom: 8px;",
            div { style: "display: flex; justify-content: space-between; margin-bottom: 8px; font-weight: 600;",
                span { "{heading}" }
                button {
                    style: BUTTON_STYLE,
                    disabled: busy,
                    onclick: move |_| {
                        if let Err(err) = editor.write().remove(&remove_path) {
                            warn!(error = %err, "remove column rejected");
                        }
                    },
                    "Remove"
                }
            }
            div { style: "display: grid; grid-template-columns: repeat(4, minmax(0, 1fr)); gap: 8px;",
                div { style: FIELD_STYLE,
                    label { "Title" }
                    input {
                        style: INPUT_STYLE,
                        disabled: busy,
                        value: "{node.title}",
                        oninput: move |event| {
                            let value = event.value();
                            edit(editor, &title_path, |editor, path| editor.set_title(path, &value));
                        },
                    }
                    FieldError { issues: issues(), field: title_field(&path) }
                }
                div { style: FIELD_STYLE,
                    label { "Data Index" }
                    select {
                        style: INPUT_STYLE,
                        disabled: busy || !selectable,
                        value: "{source_key}",
                        onchange: move |event| {
                            let value = event.value();
                            edit(editor, &key_path, |editor, path| {
                                editor.set_source_key(path, Some(value))
                            });
                        },
                        option { value: "", "None" }
                        for key in options.iter() {
                            option { key: "{key}", value: "{key}", "{key}" }
                        }
                    }
                }
                div { style: FIELD_STYLE,
                    label { "Width" }
                    input {
                        style: INPUT_STYLE,
                        r#type: "number",
                        min: "1",
                        placeholder: "150",
                        disabled: busy,
                        value: "{width}",
                        oninput: move |event| {
                            let value = event.value();
                            edit(editor, &width_path, |editor, path| editor.set_width_input(path, &value));
                        },
                    }
                }
                div { style: FIELD_STYLE,
                    label { "Sorter" }
                    select {
                        style: INPUT_STYLE,
                        disabled: busy,
                        value: "{sorter}",
                        onchange: move |event| {
                            let value = event.value();
                            edit(editor, &sorter_path, |editor, path| {
                                editor.set_sortable_input(path, &value)
                            });
                        },
                        option { value: Sortable::Disabled.as_str(), "False" }
                        option { value: Sortable::Enabled.as_str(), "True" }
                    }
                }
            }

            for index in 0..node.children.len() {
                ColumnCard {
                    key: "{index}",
                    path: path.child(index),
                    editor,
                    choices,
                    issues,
                    busy,
                }
            }

            if depth < MAX_HEADER_DEPTH {
                button {
                    style: BUTTON_STYLE,
                    disabled: busy,
                    onclick: move |_| {
                        let added = if child_path.depth() == 2 {
                            editor.write().add_sub_child(&child_path)
                        } else {
                            editor.write().add_child(&child_path)
                        };
                        if let Err(err) = added {
                            warn!(error = %err, "add column rejected");
                        }
                    },
                    if depth == 1 { "Add Child" } else { "Add Sub Child" }
                }
            }
        }
    }
}
