use tracing::debug;

use crate::usecase::ports::api::{AdminApi, ApiError};

/// Field keys offered by the source-key selects. Selection stays disabled
/// until the fetch for the chosen table has resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SourceKeyChoices {
    #[default]
    Unselected,
    Loading,
    Ready(Vec<String>),
    Failed,
}

impl SourceKeyChoices {
    pub fn is_selectable(&self) -> bool {
        matches!(self, SourceKeyChoices::Ready(_))
    }

    pub fn options(&self) -> &[String] {
        match self {
            SourceKeyChoices::Ready(keys) => keys,
            _ => &[],
        }
    }
}

pub async fn load_source_keys<A: AdminApi>(
    api: &A,
    table_name: &str,
) -> Result<Vec<String>, ApiError> {
    debug!(table = table_name, "loading source columns");
    let columns = api.source_columns(table_name).await?;
    Ok(columns
        .into_iter()
        .map(|column| column.column_name)
        .collect())
}
