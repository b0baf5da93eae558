use tracing::{info, warn};

use crate::domain::entities::cell_mapping::{DataMappingPayload, MappingDetail, MappingRow, RowKey};
use crate::domain::entities::validation::ValidationIssue;
use crate::usecase::ports::api::AdminApi;
use crate::usecase::services::submit::{ensure_valid, SubmitError};

pub fn header_cell_field(key: RowKey) -> String {
    format!("mappings.{}.header_cell", key.0)
}

pub fn column_name_field(key: RowKey) -> String {
    format!("mappings.{}.column_name", key.0)
}

/// Rows pairing a spreadsheet column letter with a destination field.
/// Duplicate pairs are allowed and sent as entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMappingEditor {
    rows: Vec<MappingRow>,
    next_key: u64,
}

impl Default for CellMappingEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl CellMappingEditor {
    pub fn new() -> Self {
        let mut editor = Self {
            rows: Vec::new(),
            next_key: 0,
        };
        editor.add_row();
        editor
    }

    pub fn rows(&self) -> &[MappingRow] {
        &self.rows
    }

    pub fn add_row(&mut self) -> RowKey {
        let key = RowKey(self.next_key);
        self.next_key += 1;
        self.rows.push(MappingRow::empty(key));
        key
    }

    pub fn remove_row(&mut self, key: RowKey) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.key != key);
        self.rows.len() != before
    }

    pub fn set_header_cell(&mut self, key: RowKey, value: Option<String>) -> bool {
        self.update(key, |row| row.header_cell = value.filter(|cell| !cell.is_empty()))
    }

    pub fn set_column_name(&mut self, key: RowKey, value: Option<String>) -> bool {
        self.update(key, |row| row.column_name = value.filter(|name| !name.is_empty()))
    }

    /// Back to a single empty row. Keys keep increasing so stale UI handles
    /// never address a new row.
    pub fn reset(&mut self) {
        self.rows.clear();
        self.add_row();
    }

    pub fn validate(&self, table_name: Option<&str>) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if table_name.map_or(true, str::is_empty) {
            issues.push(ValidationIssue::new("table_name", "Please select a table"));
        }
        if self.rows.is_empty() {
            issues.push(ValidationIssue::new("mappings", "Add at least one mapping row"));
        }
        for row in &self.rows {
            if row.header_cell.is_none() {
                issues.push(ValidationIssue::new(
                    header_cell_field(row.key),
                    "Please select a header cell",
                ));
            }
            if row.column_name.is_none() {
                issues.push(ValidationIssue::new(
                    column_name_field(row.key),
                    "Please select a column name",
                ));
            }
        }
        issues
    }

    pub fn payload(&self, table_name: &str) -> DataMappingPayload {
        DataMappingPayload {
            table_name: table_name.to_string(),
            detail: self
                .rows
                .iter()
                .map(|row| MappingDetail {
                    header_cell: row.header_cell.clone().unwrap_or_default(),
                    column_name: row.column_name.clone().unwrap_or_default(),
                })
                .collect(),
        }
    }

    /// Sends every row as one batch. Resets on success, keeps the rows on
    /// failure.
    pub async fn submit<A: AdminApi>(
        &mut self,
        api: &A,
        table_name: Option<&str>,
    ) -> Result<(), SubmitError> {
        ensure_valid(self.validate(table_name))?;
        let payload = self.payload(table_name.unwrap_or_default());

        if let Err(err) = api.save_data_mapping(&payload).await {
            warn!(table = %payload.table_name, error = %err, "saving cell mapping failed");
            return Err(err.into());
        }

        info!(table = %payload.table_name, rows = payload.detail.len(), "cell mapping saved");
        self.reset();
        Ok(())
    }

    fn update(&mut self, key: RowKey, apply: impl FnOnce(&mut MappingRow)) -> bool {
        match self.rows.iter_mut().find(|row| row.key == key) {
            Some(row) => {
                apply(row);
                true
            }
            None => false,
        }
    }
}
