use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

pub const DEFAULT_COLUMN_WIDTH: u32 = 150;
pub const MAX_HEADER_DEPTH: usize = 8;

/// Two-state sort flag. Form selects and the backend both carry it as the
/// strings `"true"` / `"false"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sortable {
    Enabled,
    #[default]
    Disabled,
}

impl Sortable {
    pub fn as_str(self) -> &'static str {
        match self {
            Sortable::Enabled => "true",
            Sortable::Disabled => "false",
        }
    }

    pub fn from_form_value(value: &str) -> Self {
        if value == "true" {
            Sortable::Enabled
        } else {
            Sortable::Disabled
        }
    }

    pub fn is_enabled(self) -> bool {
        matches!(self, Sortable::Enabled)
    }
}

impl Serialize for Sortable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Sortable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(text)) => Sortable::from_form_value(&text),
            _ => Sortable::Disabled,
        })
    }
}

/// One table column, or a grouping header when `children` is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    #[serde(default)]
    pub title: String,
    #[serde(
        rename = "data_index",
        default,
        deserialize_with = "deserialize_source_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_key: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_width",
        skip_serializing_if = "Option::is_none"
    )]
    pub width: Option<u32>,
    #[serde(rename = "sorter", default)]
    pub sortable: Sortable,
    #[serde(
        default,
        deserialize_with = "deserialize_children",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<ColumnSpec>,
}

impl ColumnSpec {
    pub fn effective_width(&self) -> u32 {
        self.width.unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    /// Bottom-up fold over the subtree rooted at `self`.
    pub fn fold<T, F>(&self, f: &mut F) -> T
    where
        F: FnMut(&ColumnSpec, Vec<T>) -> T,
    {
        let mut folded_children = Vec::with_capacity(self.children.len());
        for child in &self.children {
            folded_children.push(child.fold(&mut *f));
        }
        f(self, folded_children)
    }

    pub fn depth(&self) -> usize {
        self.fold(&mut |_: &ColumnSpec, child_depths: Vec<usize>| {
            1 + child_depths.into_iter().max().unwrap_or(0)
        })
    }

    pub fn node_count(&self) -> usize {
        self.fold(&mut |_: &ColumnSpec, child_counts: Vec<usize>| {
            1 + child_counts.into_iter().sum::<usize>()
        })
    }
}

/// Width typed into a number input. Blank, zero and non-numeric input all
/// mean "use the default".
pub fn parse_width(raw: &str) -> Option<u32> {
    raw.trim().parse::<f64>().ok().and_then(width_from_f64)
}

/// Fractional pixel widths round to the nearest whole pixel.
fn width_from_f64(value: f64) -> Option<u32> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded < 1.0 || rounded > u32::MAX as f64 {
        return None;
    }
    Some(rounded as u32)
}

fn deserialize_width<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_f64().and_then(width_from_f64),
        Some(Value::String(text)) => parse_width(&text),
        _ => None,
    })
}

fn deserialize_source_key<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|key| !key.is_empty()))
}

fn deserialize_children<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<ColumnSpec>, D::Error> {
    Ok(Option::<Vec<ColumnSpec>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Address of a node: index among the top-level columns, then one index per
/// nesting level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root(index: usize) -> Self {
        NodePath(vec![index])
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        NodePath(indices)
    }

    pub fn parent(&self) -> Option<NodePath> {
        if self.0.len() < 2 {
            return None;
        }
        Some(NodePath(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn last_index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(value: Vec<usize>) -> Self {
        NodePath(value)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = self
            .0
            .iter()
            .map(|idx| (idx + 1).to_string())
            .collect::<Vec<_>>();
        write!(f, "{}", labels.join("."))
    }
}

pub fn node_at<'a>(roots: &'a [ColumnSpec], path: &NodePath) -> Option<&'a ColumnSpec> {
    let (first, rest) = path.indices().split_first()?;
    let mut node = roots.get(*first)?;
    for idx in rest {
        node = node.children.get(*idx)?;
    }
    Some(node)
}

pub fn node_at_mut<'a>(roots: &'a mut [ColumnSpec], path: &NodePath) -> Option<&'a mut ColumnSpec> {
    let (first, rest) = path.indices().split_first()?;
    let mut node = roots.get_mut(*first)?;
    for idx in rest {
        node = node.children.get_mut(*idx)?;
    }
    Some(node)
}

/// Preorder visit of every node together with its path.
pub fn walk_tree<F>(roots: &[ColumnSpec], visit: &mut F)
where
    F: FnMut(&NodePath, &ColumnSpec),
{
    for (idx, node) in roots.iter().enumerate() {
        walk_node(node, NodePath::root(idx), visit);
    }
}

fn walk_node<F>(node: &ColumnSpec, path: NodePath, visit: &mut F)
where
    F: FnMut(&NodePath, &ColumnSpec),
{
    visit(&path, node);
    for (idx, child) in node.children.iter().enumerate() {
        walk_node(child, path.child(idx), visit);
    }
}

pub fn tree_node_count(roots: &[ColumnSpec]) -> usize {
    roots.iter().map(ColumnSpec::node_count).sum()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableHeadersPayload {
    pub table_name: String,
    pub headers: Vec<ColumnSpec>,
}

/// One persisted header configuration as returned by `/table_headers/:table`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HeaderGroup {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_children")]
    pub headers: Vec<ColumnSpec>,
}
