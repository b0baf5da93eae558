use chrono::Local;
use dioxus::prelude::*;
use tracing::error;

use crate::domain::entities::dataset::{
    default_date_inputs, display_cell, parse_date_input, UserSummary,
};
use crate::infra::http::client::HttpApi;
use crate::ui::state::app_state::AppState;
use crate::ui::widgets::{use_table_names, TableSelect, BUTTON_STYLE, INPUT_STYLE};
use crate::usecase::ports::api::AdminApi;
use crate::usecase::services::data_view::{load_page, DataView};
use crate::usecase::services::generation::ResponseOutcome;
use crate::usecase::services::header_renderer::{load_columns, HeaderLayout, HeaderLoadError};

const HEADER_CELL_STYLE: &str =
    "border: 1px solid #bbb; padding: 6px; background: #f5f5f5; text-align: center;";

fn fetch_page(api: HttpApi, mut view: Signal<DataView>, state: AppState, page: u32) {
    let username = state.username();
    let today = Local::now().date_naive();
    let Some((ticket, query)) = view.write().page_request(page, &username, today) else {
        return;
    };
    spawn(async move {
        let result = load_page(&api, &query).await;
        let outcome = view.write().apply_page(ticket, result);
        if let ResponseOutcome::Failed(err) = outcome {
            state.report(&err, "Failed to load table data");
        }
    });
}

fn select_table(api: HttpApi, mut view: Signal<DataView>, state: AppState, table_name: String) {
    let ticket = view.write().select_table(&table_name);
    spawn(async move {
        let result = load_columns(&api, &table_name).await;
        let outcome = view.write().apply_columns(ticket, result);
        match outcome {
            ResponseOutcome::Applied => fetch_page(api, view, state, 1),
            ResponseOutcome::Failed(HeaderLoadError::Api(err)) => {
                state.report(&err, "Failed to load table headers");
            }
            ResponseOutcome::Failed(HeaderLoadError::Render(err)) => state.fail(err.to_string()),
            ResponseOutcome::Stale => {}
        }
    });
}

#[component]
pub fn DataViewPage() -> Element {
    let state = use_context::<AppState>();
    let api = use_context::<HttpApi>();
    let tables = use_table_names(state, api.clone());
    let mut view = use_signal(DataView::default);
    let mut users = use_signal(Vec::<UserSummary>::new);
    let (default_start, default_end) = use_hook(|| default_date_inputs(Local::now().date_naive()));
    let mut start_input = use_signal(move || default_start);
    let mut end_input = use_signal(move || default_end);

    let users_api = api.clone();
    use_future(move || {
        let api = users_api.clone();
        async move {
            match api.list_users().await {
                Ok(list) => users.set(list),
                Err(err) => {
                    error!(error = %err, "error fetching users");
                    state.report(&err, "Failed to load users");
                }
            }
        }
    });

    let snapshot = view.read().clone();
    let layout = HeaderLayout::build(&snapshot.columns);
    let rows = snapshot.sorted_rows(&layout);
    let pagination = snapshot.pagination;
    let page_count = pagination.page_count();
    let inserted_by = snapshot.filters.inserted_by.clone().unwrap_or_default();

    let api_for_table = api.clone();
    let api_for_user = api.clone();
    let api_for_dates = api.clone();
    let api_for_prev = api.clone();
    let api_for_next = api.clone();

    rsx! {
        div {
            div { style: "display: flex; gap: 12px; align-items: center; flex-wrap: wrap; margin-bottom: 12px;",
                TableSelect {
                    tables: tables(),
                    selected: snapshot.table_name.clone(),
                    disabled: false,
                    on_select: move |table_name: String| {
                        select_table(api_for_table.clone(), view, state, table_name);
                    },
                }
                select {
                    style: INPUT_STYLE,
                    value: "{inserted_by}",
                    onchange: move |event| {
                        view.write().set_inserted_by(Some(event.value()));
                        fetch_page(api_for_user.clone(), view, state, 1);
                    },
                    option { value: "", "Inserted by (me)" }
                    for user in users().iter() {
                        option { key: "{user.id}", value: "{user.username}", "{user.username}" }
                    }
                }
                input {
                    style: INPUT_STYLE,
                    r#type: "date",
                    value: "{start_input}",
                    oninput: move |event| start_input.set(event.value()),
                }
                span { "to" }
                input {
                    style: INPUT_STYLE,
                    r#type: "date",
                    value: "{end_input}",
                    oninput: move |event| end_input.set(event.value()),
                }
                button {
                    style: BUTTON_STYLE,
                    onclick: move |_| {
                        let range = parse_date_input(&start_input()).zip(parse_date_input(&end_input()));
                        view.write().set_date_range(range);
                        fetch_page(api_for_dates.clone(), view, state, 1);
                    },
                    "Apply dates"
                }
            }

            div { style: "overflow: auto; border: 1px solid #ddd;",
                table { style: "border-collapse: collapse; background: #fff;",
                    thead {
                        for (level, header_row) in layout.rows.iter().enumerate() {
                            tr { key: "{level}",
                                for (position, cell) in header_row.iter().enumerate() {
                                    {
                                        let leaf_index = cell.leaf_index;
                                        let sortable = leaf_index
                                            .and_then(|index| layout.leaves.get(index))
                                            .is_some_and(|leaf| leaf.sorter.is_some());
                                        let marker = match (snapshot.sort, leaf_index) {
                                            (Some(sort), Some(index)) if sort.leaf_index == index => {
                                                if sort.descending { " ▼" } else { " ▲" }
                                            }
                                            _ => "",
                                        };
                                        let cursor = if sortable { "pointer" } else { "default" };
                                        rsx! {
                                            th {
                                                key: "{position}",
                                                style: "{HEADER_CELL_STYLE} min-width: {cell.width}px; cursor: {cursor};",
                                                colspan: "{cell.colspan}",
                                                rowspan: "{cell.rowspan}",
                                                onclick: move |_| {
                                                    if let (true, Some(index)) = (sortable, leaf_index) {
                                                        view.write().toggle_sort(index);
                                                    }
                                                },
                                                "{cell.title}{marker}"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                    tbody {
                        for (row_index, row) in rows.iter().enumerate() {
                            tr { key: "{row_index}",
                                for (column_index, leaf) in layout.leaves.iter().enumerate() {
                                    td {
                                        key: "{column_index}",
                                        style: "border: 1px solid #ddd; padding: 4px; width: {leaf.width}px;",
                                        {display_cell(leaf.cell(row))}
                                    }
                                }
                            }
                        }
                    }
                }
                if rows.is_empty() {
                    p { style: "padding: 12px; color: #666;", "No data" }
                }
            }

            div { style: "display: flex; gap: 8px; align-items: center; margin-top: 12px;",
                button {
                    style: BUTTON_STYLE,
                    disabled: !pagination.has_previous(),
                    onclick: move |_| {
                        fetch_page(api_for_prev.clone(), view, state, pagination.current - 1);
                    },
                    "Previous"
                }
                span { "Page {pagination.current} of {page_count} ({pagination.total} rows)" }
                button {
                    style: BUTTON_STYLE,
                    disabled: !pagination.has_next(),
                    onclick: move |_| {
                        fetch_page(api_for_next.clone(), view, state, pagination.current + 1);
                    },
                    "Next"
                }
            }
        }
    }
}
