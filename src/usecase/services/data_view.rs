use chrono::NaiveDate;
use tracing::{debug, error};

use crate::domain::entities::dataset::{format_row_dates, DataFilters, PageQuery, Pagination, Row};
use crate::usecase::ports::api::{AdminApi, ApiError};
use crate::usecase::services::generation::{RequestGeneration, ResponseOutcome, Ticket};
use crate::usecase::services::header_renderer::{ColumnDescriptor, HeaderLayout, HeaderLoadError};

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPage {
    pub rows: Vec<Row>,
    pub total: u64,
    pub page: u32,
}

pub async fn load_page<A: AdminApi>(api: &A, query: &PageQuery) -> Result<LoadedPage, ApiError> {
    debug!(table = %query.table_name, page = query.page, "loading table data");
    let result = api.master_data(query).await?;
    Ok(LoadedPage {
        rows: result.data.into_iter().map(format_row_dates).collect(),
        total: result.total_rows,
        page: query.page,
    })
}

/// Client-side sort of the current page by one leaf column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub leaf_index: usize,
    pub descending: bool,
}

/// State behind the data view page: selected table, its columns, the current
/// page of rows and the active filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataView {
    pub table_name: Option<String>,
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<Row>,
    pub pagination: Pagination,
    pub filters: DataFilters,
    pub sort: Option<SortState>,
    header_requests: RequestGeneration,
    page_requests: RequestGeneration,
}

impl DataView {
    /// Starts a header fetch for `table_name`; any page fetch still in flight
    /// for the previous table becomes stale.
    pub fn select_table(&mut self, table_name: &str) -> Ticket {
        self.table_name = Some(table_name.to_string());
        self.sort = None;
        self.page_requests.invalidate();
        self.header_requests.begin()
    }

    /// Failures keep the previous columns in place.
    pub fn apply_columns(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<ColumnDescriptor>, HeaderLoadError>,
    ) -> ResponseOutcome<HeaderLoadError> {
        if !self.header_requests.is_current(ticket) {
            debug!("discarding superseded header response");
            return ResponseOutcome::Stale;
        }
        match result {
            Ok(columns) => {
                self.columns = columns;
                ResponseOutcome::Applied
            }
            Err(err) => {
                error!(error = %err, "error fetching headers");
                ResponseOutcome::Failed(err)
            }
        }
    }

    pub fn page_request(
        &mut self,
        page: u32,
        session_username: &str,
        today: NaiveDate,
    ) -> Option<(Ticket, PageQuery)> {
        let table_name = self.table_name.as_deref()?;
        let query = PageQuery::build(
            table_name,
            page.max(1),
            self.pagination.page_size,
            &self.filters,
            session_username,
            today,
        );
        Some((self.page_requests.begin(), query))
    }

    pub fn apply_page(
        &mut self,
        ticket: Ticket,
        result: Result<LoadedPage, ApiError>,
    ) -> ResponseOutcome<ApiError> {
        if !self.page_requests.is_current(ticket) {
            debug!("discarding superseded page response");
            return ResponseOutcome::Stale;
        }
        match result {
            Ok(page) => {
                self.rows = page.rows;
                self.pagination.total = page.total;
                self.pagination.current = page.page;
                ResponseOutcome::Applied
            }
            Err(err) => {
                error!(error = %err, "error fetching data");
                ResponseOutcome::Failed(err)
            }
        }
    }

    /// Filters apply to the next page request; callers reload from page 1.
    pub fn set_inserted_by(&mut self, username: Option<String>) {
        self.filters.inserted_by = username.filter(|name| !name.is_empty());
    }

    pub fn set_date_range(&mut self, range: Option<(NaiveDate, NaiveDate)>) {
        self.filters.date_range = range;
    }

    pub fn toggle_sort(&mut self, leaf_index: usize) {
        self.sort = match self.sort {
            Some(SortState {
                leaf_index: current,
                descending: false,
            }) if current == leaf_index => Some(SortState {
                leaf_index,
                descending: true,
            }),
            Some(SortState {
                leaf_index: current,
                descending: true,
            }) if current == leaf_index => None,
            _ => Some(SortState {
                leaf_index,
                descending: false,
            }),
        };
    }

    pub fn sorted_rows(&self, layout: &HeaderLayout) -> Vec<Row> {
        let mut rows = self.rows.clone();
        let sorter = self.sort.and_then(|sort| {
            layout
                .leaves
                .get(sort.leaf_index)
                .and_then(|leaf| leaf.sorter.as_ref())
                .map(|sorter| (sorter, sort.descending))
        });
        if let Some((sorter, descending)) = sorter {
            rows.sort_by(|a, b| {
                let ordering = sorter.compare(a, b);
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }
        rows
    }
}
