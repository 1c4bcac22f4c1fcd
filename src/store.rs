use chrono::Utc;
use indexmap::IndexMap;

use crate::drag::DropIntent;
use crate::model::folder::{FolderId, FolderRecord, ItemId};
use crate::ops::reorder::{self, ReorderError};

/// Error type for store CRUD operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("folder not found: {0}")]
    NotFound(FolderId),
    #[error("the default folder cannot be deleted")]
    DefaultFolder,
}

/// The flat folder collection and its mutation API.
///
/// Owns every `FolderRecord`; the nested view is derived from `list()`
/// snapshots and never stored. `reorder` is the only entry point that
/// changes tree structure; CRUD handles the rest of the record lifecycle.
#[derive(Debug, Default)]
pub struct FolderStore {
    records: IndexMap<FolderId, FolderRecord>,
    next_id: u64,
}

impl FolderStore {
    pub fn new() -> Self {
        FolderStore::default()
    }

    /// A store seeded with the non-deletable "Unfiled" default folder
    pub fn with_default() -> Self {
        let mut store = FolderStore::new();
        let id = store.allocate_id();
        let record = FolderRecord::new(id.clone(), "Unfiled", None, 0.0).as_default();
        store.records.insert(id, record);
        store
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Snapshot of the flat collection in insertion order
    pub fn list(&self) -> Vec<FolderRecord> {
        self.records.values().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<&FolderRecord> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The default "Unfiled" folder, if the store carries one
    pub fn default_folder(&self) -> Option<&FolderRecord> {
        self.records.values().find(|r| r.is_default)
    }

    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Create a folder appended to the end of its sibling group.
    /// Errors when `parent_id` names a folder the store doesn't hold.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        parent_id: Option<FolderId>,
    ) -> Result<FolderId, StoreError> {
        if let Some(parent) = &parent_id {
            if !self.records.contains_key(parent.as_str()) {
                return Err(StoreError::NotFound(parent.clone()));
            }
        }
        let id = self.allocate_id();
        let order = reorder::append_order(&self.records, parent_id.as_deref(), &id);
        let record = FolderRecord::new(id.clone(), name, parent_id, order);
        self.records.insert(id.clone(), record);
        Ok(id)
    }

    pub fn rename(&mut self, id: &str, name: impl Into<String>) -> Result<(), StoreError> {
        let record = self
            .records
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.name = name.into();
        record.updated_at = Utc::now();
        Ok(())
    }

    /// Delete a folder and its whole subtree. Items held anywhere in the
    /// deleted subtree are reassigned to the default folder when the store
    /// has one; deleting is refused if the default folder is in the subtree.
    pub fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        if !self.records.contains_key(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let subtree = self.subtree_ids(id);
        if subtree
            .iter()
            .any(|sid| self.records[sid.as_str()].is_default)
        {
            return Err(StoreError::DefaultFolder);
        }

        let mut displaced: Vec<ItemId> = Vec::new();
        for sid in &subtree {
            if let Some(removed) = self.records.shift_remove(sid.as_str()) {
                displaced.extend(removed.item_ids);
            }
        }
        if let Some(default_id) = self.default_folder().map(|r| r.id.clone()) {
            if let Some(default) = self.records.get_mut(default_id.as_str()) {
                default.item_ids.extend(displaced);
                default.updated_at = Utc::now();
            }
        }
        Ok(())
    }

    /// Move a content item into `folder`, removing it from wherever it
    /// currently lives
    pub fn move_item(&mut self, item: &str, folder: &str) -> Result<(), StoreError> {
        if !self.records.contains_key(folder) {
            return Err(StoreError::NotFound(folder.to_string()));
        }
        for record in self.records.values_mut() {
            let before = record.item_ids.len();
            record.item_ids.retain(|i| i != item);
            if record.item_ids.len() != before {
                record.updated_at = Utc::now();
            }
        }
        if let Some(record) = self.records.get_mut(folder) {
            record.item_ids.push(item.to_string());
            record.updated_at = Utc::now();
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reorder
    // -----------------------------------------------------------------------

    /// The sole structural mutation: apply a screened move.
    /// See `ops::reorder` for the placement semantics.
    pub fn reorder(
        &mut self,
        moved: &str,
        target: &str,
        intent: DropIntent,
    ) -> Result<(), ReorderError> {
        reorder::reorder(&mut self.records, moved, target, intent)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Insert a fully-formed record, e.g. when loading a saved collection.
    /// Keeps the id allocator ahead of any numeric suffix already in use.
    pub fn insert(&mut self, record: FolderRecord) {
        if let Some(n) = record
            .id
            .strip_prefix("f-")
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.next_id = self.next_id.max(n);
        }
        self.records.insert(record.id.clone(), record);
    }

    fn allocate_id(&mut self) -> FolderId {
        loop {
            self.next_id += 1;
            let id = format!("f-{}", self.next_id);
            if !self.records.contains_key(id.as_str()) {
                return id;
            }
        }
    }

    /// Ids of `root` and every folder below it, parents before children
    fn subtree_ids(&self, root: &str) -> Vec<FolderId> {
        let mut out = vec![root.to_string()];
        let mut i = 0;
        while i < out.len() {
            let parent = out[i].clone();
            for record in self.records.values() {
                if record.parent_id.as_deref() == Some(parent.as_str()) {
                    out.push(record.id.clone());
                }
            }
            i += 1;
        }
        out
    }
}
