use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque folder identifier
pub type FolderId = String;

/// Identifier of a content item (proposal) held by a folder
pub type ItemId = String;

/// A flat folder record as the store keeps it.
///
/// The nested view is always derived from these; `parent_id` and `order`
/// are the only structural fields the reorder subsystem mutates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderRecord {
    pub id: FolderId,
    /// Display name
    pub name: String,
    /// `None` means root level
    pub parent_id: Option<FolderId>,
    /// Sort key among siblings sharing the same `parent_id`.
    /// Only relative comparison matters; keys are not kept contiguous.
    pub order: f64,
    /// Default folders ("Unfiled") can receive drops but cannot be
    /// dragged or deleted.
    #[serde(default)]
    pub is_default: bool,
    /// Items held directly in this folder, in display order
    #[serde(default)]
    pub item_ids: Vec<ItemId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FolderRecord {
    /// Create a new record with fresh timestamps
    pub fn new(
        id: impl Into<FolderId>,
        name: impl Into<String>,
        parent_id: Option<FolderId>,
        order: f64,
    ) -> Self {
        let now = Utc::now();
        FolderRecord {
            id: id.into(),
            name: name.into(),
            parent_id,
            order,
            is_default: false,
            item_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark this record as a non-movable, non-deletable default folder
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}
