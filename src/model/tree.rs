use serde::Serialize;

use super::folder::{FolderId, FolderRecord, ItemId};

/// A folder with its children attached, as rendered by the sidebar.
///
/// Derived from the flat records on every query; never persisted and
/// never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NestedFolder {
    pub id: FolderId,
    pub name: String,
    pub parent_id: Option<FolderId>,
    pub order: f64,
    pub is_default: bool,
    pub item_ids: Vec<ItemId>,
    /// Distance from a root (root = 0)
    pub depth: usize,
    /// Child folders sorted ascending by `order`
    pub children: Vec<NestedFolder>,
}

impl NestedFolder {
    /// Lift a flat record into a node at the given depth, with no children yet
    pub fn from_record(record: &FolderRecord, depth: usize) -> Self {
        NestedFolder {
            id: record.id.clone(),
            name: record.name.clone(),
            parent_id: record.parent_id.clone(),
            order: record.order,
            is_default: record.is_default,
            item_ids: record.item_ids.clone(),
            depth,
            children: Vec::new(),
        }
    }

    /// True if `id` appears anywhere in this subtree, including this node
    pub fn contains(&self, id: &str) -> bool {
        self.id == id || self.children.iter().any(|c| c.contains(id))
    }

    /// Number of nodes in this subtree, including this node
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(NestedFolder::subtree_len).sum::<usize>()
    }
}
