use thiserror::Error;
use tracing::{info, warn};

use crate::domain::entities::column_spec::{
    node_at, node_at_mut, parse_width, tree_node_count, walk_tree, ColumnSpec, NodePath, Sortable,
    TableHeadersPayload, MAX_HEADER_DEPTH,
};
use crate::domain::entities::validation::ValidationIssue;
use crate::usecase::ports::api::AdminApi;
use crate::usecase::services::submit::{ensure_valid, SubmitError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("no column at {0}")]
    MissingNode(NodePath),

    #[error("column {0} is not a child column")]
    NotAChild(NodePath),

    #[error("columns cannot nest deeper than {} levels", MAX_HEADER_DEPTH)]
    TooDeep,
}

pub fn title_field(path: &NodePath) -> String {
    format!("headers.{path}.title")
}

/// In-progress header configuration for one table. Only one top-level column
/// tree may be authored at a time; children are unrestricted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingEditor {
    columns: Vec<ColumnSpec>,
}

impl MappingEditor {
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn node(&self, path: &NodePath) -> Option<&ColumnSpec> {
        node_at(&self.columns, path)
    }

    pub fn node_count(&self) -> usize {
        tree_node_count(&self.columns)
    }

    pub fn can_add_top_level(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns `false` without changing anything when a top-level column
    /// already exists.
    pub fn add_top_level(&mut self) -> bool {
        if !self.can_add_top_level() {
            return false;
        }
        self.columns.push(ColumnSpec::default());
        true
    }

    pub fn add_child(&mut self, path: &NodePath) -> Result<NodePath, EditorError> {
        if path.depth() >= MAX_HEADER_DEPTH {
            return Err(EditorError::TooDeep);
        }
        let node = self.node_mut(path)?;
        node.children.push(ColumnSpec::default());
        Ok(path.child(node.children.len() - 1))
    }

    /// Adds a third-level column under the child column at `path`.
    pub fn add_sub_child(&mut self, path: &NodePath) -> Result<NodePath, EditorError> {
        if path.depth() != 2 {
            return Err(EditorError::NotAChild(path.clone()));
        }
        self.add_child(path)
    }

    /// Removes the node and its whole subtree.
    pub fn remove(&mut self, path: &NodePath) -> Result<ColumnSpec, EditorError> {
        let missing = || EditorError::MissingNode(path.clone());
        let index = path.last_index().ok_or_else(missing)?;
        let siblings = match path.parent() {
            Some(parent) => {
                &mut node_at_mut(&mut self.columns, &parent)
                    .ok_or_else(missing)?
                    .children
            }
            None => &mut self.columns,
        };
        if index >= siblings.len() {
            return Err(missing());
        }
        Ok(siblings.remove(index))
    }

    pub fn set_title(&mut self, path: &NodePath, title: &str) -> Result<(), EditorError> {
        self.node_mut(path)?.title = title.to_string();
        Ok(())
    }

    pub fn set_source_key(
        &mut self,
        path: &NodePath,
        source_key: Option<String>,
    ) -> Result<(), EditorError> {
        self.node_mut(path)?.source_key = source_key.filter(|key| !key.is_empty());
        Ok(())
    }

    pub fn set_width_input(&mut self, path: &NodePath, raw: &str) -> Result<(), EditorError> {
        self.node_mut(path)?.width = parse_width(raw);
        Ok(())
    }

    pub fn set_sortable_input(&mut self, path: &NodePath, raw: &str) -> Result<(), EditorError> {
        self.node_mut(path)?.sortable = Sortable::from_form_value(raw);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.columns.clear();
    }

    /// Clears only when the tree still matches what was sent, so edits made
    /// while a save was in flight survive its success.
    pub fn clear_if_unchanged(&mut self, submitted: &[ColumnSpec]) -> bool {
        if self.columns != submitted {
            return false;
        }
        self.clear();
        true
    }

    pub fn validate(&self, table_name: Option<&str>) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if table_name.map_or(true, str::is_empty) {
            issues.push(ValidationIssue::new("table_name", "Please select a table"));
        }
        if self.columns.is_empty() {
            issues.push(ValidationIssue::new(
                "headers",
                "Add a column before submitting",
            ));
        }
        walk_tree(&self.columns, &mut |path, node| {
            if node.title.trim().is_empty() {
                issues.push(ValidationIssue::new(
                    title_field(path),
                    format!("Column {path} needs a title"),
                ));
            }
        });
        issues
    }

    /// Sends the tree for `table_name`. Clears the editor on success and
    /// leaves it untouched on any failure.
    pub async fn submit<A: AdminApi>(
        &mut self,
        api: &A,
        table_name: Option<&str>,
    ) -> Result<(), SubmitError> {
        ensure_valid(self.validate(table_name))?;
        let payload = TableHeadersPayload {
            table_name: table_name.unwrap_or_default().to_string(),
            headers: self.columns.clone(),
        };

        if let Err(err) = api.save_table_headers(&payload).await {
            warn!(table = %payload.table_name, error = %err, "saving table headers failed");
            return Err(err.into());
        }

        info!(
            table = %payload.table_name,
            nodes = tree_node_count(&payload.headers),
            "table headers saved"
        );
        self.clear();
        Ok(())
    }

    fn node_mut(&mut self, path: &NodePath) -> Result<&mut ColumnSpec, EditorError> {
        node_at_mut(&mut self.columns, path).ok_or_else(|| EditorError::MissingNode(path.clone()))
    }
}
