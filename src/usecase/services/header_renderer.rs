use std::cmp::Ordering;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::domain::entities::column_spec::{ColumnSpec, HeaderGroup, MAX_HEADER_DEPTH};
use crate::domain::entities::dataset::Row;
use crate::usecase::ports::api::{AdminApi, ApiError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("header tree is {depth} levels deep; at most {max} are supported")]
    TooDeep { depth: usize, max: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderLoadError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Compares two rows by subtracting the numeric value of one field. Assumes
/// numeric data; text fields order arbitrarily.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericSorter {
    accessor: Option<String>,
}

impl NumericSorter {
    pub fn new(accessor: Option<String>) -> Self {
        Self { accessor }
    }

    fn value(&self, row: &Row) -> f64 {
        number_like(self.accessor.as_deref().and_then(|key| row.get(key)))
    }

    /// `a[field] - b[field]`; NaN when either side is not numeric.
    pub fn difference(&self, a: &Row, b: &Row) -> f64 {
        self.value(a) - self.value(b)
    }

    /// Total order used for actual sorting: agrees with the sign of
    /// `difference` on numeric data and puts NaN last.
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        self.value(a).total_cmp(&self.value(b))
    }
}

/// Numeric coercion of a JSON field: numbers as-is, numeric strings parsed,
/// blank and null as zero, booleans as 0/1, anything else NaN.
pub fn number_like(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(flag)) => f64::from(u8::from(*flag)),
        Some(Value::Number(number)) => number.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        Some(_) => f64::NAN,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub title: String,
    pub accessor: Option<String>,
    pub width: u32,
    pub sorter: Option<NumericSorter>,
    pub children: Vec<ColumnDescriptor>,
}

pub fn describe(spec: &ColumnSpec) -> ColumnDescriptor {
    spec.fold(&mut |node: &ColumnSpec, children| ColumnDescriptor {
        title: node.title.clone(),
        accessor: node.source_key.clone(),
        width: node.effective_width(),
        sorter: node
            .sortable
            .is_enabled()
            .then(|| NumericSorter::new(node.source_key.clone())),
        children,
    })
}

/// Flattens every group's header list into render-ready descriptors.
pub fn render_headers(groups: &[HeaderGroup]) -> Result<Vec<ColumnDescriptor>, RenderError> {
    let specs = groups
        .iter()
        .flat_map(|group| group.headers.iter())
        .collect::<Vec<_>>();

    for spec in &specs {
        let depth = spec.depth();
        if depth > MAX_HEADER_DEPTH {
            return Err(RenderError::TooDeep {
                depth,
                max: MAX_HEADER_DEPTH,
            });
        }
    }

    Ok(specs.into_iter().map(describe).collect())
}

pub async fn load_columns<A: AdminApi>(
    api: &A,
    table_name: &str,
) -> Result<Vec<ColumnDescriptor>, HeaderLoadError> {
    debug!(table = table_name, "loading table headers");
    let groups = api.table_headers(table_name).await?;
    Ok(render_headers(&groups)?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub title: String,
    pub colspan: usize,
    pub rowspan: usize,
    pub width: u32,
    pub leaf_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafColumn {
    pub title: String,
    pub accessor: Option<String>,
    pub width: u32,
    pub sorter: Option<NumericSorter>,
}

impl LeafColumn {
    pub fn cell<'a>(&self, row: &'a Row) -> Option<&'a Value> {
        self.accessor.as_deref().and_then(|key| row.get(key))
    }
}

/// Grouped header rows (with spans) plus the leaf columns that carry data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderLayout {
    pub rows: Vec<Vec<HeaderCell>>,
    pub leaves: Vec<LeafColumn>,
}

impl HeaderLayout {
    pub fn build(columns: &[ColumnDescriptor]) -> Self {
        let depth = columns.iter().map(descriptor_depth).max().unwrap_or(0);
        let mut layout = HeaderLayout {
            rows: vec![Vec::new(); depth],
            leaves: Vec::new(),
        };
        for column in columns {
            layout.place(column, 0, depth);
        }
        layout
    }

    fn place(&mut self, column: &ColumnDescriptor, level: usize, depth: usize) {
        if column.children.is_empty() {
            let leaf_index = self.leaves.len();
            self.leaves.push(LeafColumn {
                title: column.title.clone(),
                accessor: column.accessor.clone(),
                width: column.width,
                sorter: column.sorter.clone(),
            });
            self.rows[level].push(HeaderCell {
                title: column.title.clone(),
                colspan: 1,
                rowspan: depth - level,
                width: column.width,
                leaf_index: Some(leaf_index),
            });
            return;
        }

        self.rows[level].push(HeaderCell {
            title: column.title.clone(),
            colspan: leaf_count(column),
            rowspan: 1,
            width: column.width,
            leaf_index: None,
        });
        for child in &column.children {
            self.place(child, level + 1, depth);
        }
    }
}

fn descriptor_depth(column: &ColumnDescriptor) -> usize {
    1 + column
        .children
        .iter()
        .map(descriptor_depth)
        .max()
        .unwrap_or(0)
}

fn leaf_count(column: &ColumnDescriptor) -> usize {
    if column.children.is_empty() {
        1
    } else {
        column.children.iter().map(leaf_count).sum()
    }
}
