use std::collections::HashSet;
use std::mem;

use crate::drag::{DragState, DropIntent, classify_drop_intent};
use crate::model::folder::FolderId;
use crate::model::tree::NestedFolder;
use crate::ops::tree_ops::{build_tree, is_descendant};
use crate::store::FolderStore;

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A transient message for the shell to surface as a toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn error(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// The project-list pane: owns the folder store, the expand/collapse set,
/// and the drag gesture state, and runs the full drop pipeline
/// (classify → guard → commit) on behalf of the UI.
///
/// All methods are synchronous; one pointer event is fully resolved before
/// the next is processed, and only `finish_drag` ever touches the store.
#[derive(Debug, Default)]
pub struct FolderPane {
    store: FolderStore,
    drag: DragState,
    expanded: HashSet<FolderId>,
    notices: Vec<Notice>,
}

impl FolderPane {
    pub fn new(store: FolderStore) -> Self {
        FolderPane {
            store,
            drag: DragState::Idle,
            expanded: HashSet::new(),
            notices: Vec::new(),
        }
    }

    pub fn store(&self) -> &FolderStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut FolderStore {
        &mut self.store
    }

    /// The nested forest, rebuilt from the current flat collection
    pub fn tree(&self) -> Vec<NestedFolder> {
        build_tree(&self.store.list())
    }

    // -----------------------------------------------------------------------
    // Expand / collapse
    // -----------------------------------------------------------------------

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn toggle_expanded(&mut self, id: &str) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
        }
    }

    // -----------------------------------------------------------------------
    // Drag lifecycle
    // -----------------------------------------------------------------------

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// The `(target, intent)` pair for drop-indicator rendering
    pub fn drop_indicator(&self) -> Option<(&FolderId, DropIntent)> {
        self.drag.indicator()
    }

    /// Start a drag gesture. Returns false (leaving the pane idle) for
    /// unknown ids and for default folders, which never get a drag handle.
    pub fn begin_drag(&mut self, id: &str) -> bool {
        let Some(record) = self.store.get(id) else {
            return false;
        };
        if record.is_default {
            self.notices
                .push(Notice::error(format!("\"{}\" cannot be moved", record.name)));
            return false;
        }
        self.drag = DragState::Dragging {
            moved: id.to_string(),
        };
        true
    }

    /// Re-classify the hover target on a pointer-move tick. Hovering the
    /// dragged row itself is suppressed; a self-drop never reaches the
    /// committer.
    pub fn pointer_move(&mut self, target: &str, pointer_y: f64, row_top: f64, row_height: f64) {
        let Some(moved) = self.drag.moved_id().cloned() else {
            return;
        };
        if moved == target || self.store.get(target).is_none() {
            self.drag = DragState::Dragging { moved };
            return;
        }
        self.drag = DragState::Hovering {
            moved,
            target: target.to_string(),
            intent: classify_drop_intent(pointer_y, row_top, row_height),
        };
    }

    /// Drop: validate the tracked `(target, intent)` pair and commit it.
    /// A rejected move emits a notice and leaves the store untouched; a
    /// drop with no hover target is a plain cancel.
    pub fn finish_drag(&mut self) {
        let DragState::Hovering {
            moved,
            target,
            intent,
        } = mem::take(&mut self.drag)
        else {
            return;
        };

        if self.move_creates_cycle(&moved, &target, intent) {
            self.notices.push(Notice::error(
                "Cannot move a folder into its own subtree",
            ));
            return;
        }
        match self.store.reorder(&moved, &target, intent) {
            Ok(()) => {
                // Reparenting into a collapsed folder would hide the moved
                // node, so the target is expanded on drop.
                if intent == DropIntent::Inside {
                    self.expanded.insert(target);
                }
            }
            Err(e) => self.notices.push(Notice::error(e.to_string())),
        }
    }

    /// Abandon the gesture without touching the store
    pub fn cancel_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Drain pending notices for the shell to display
    pub fn take_notices(&mut self) -> Vec<Notice> {
        mem::take(&mut self.notices)
    }

    /// Would moving `moved` with this intent make it an ancestor of itself?
    /// For `Inside` the new parent is the target; for `Before`/`After` it
    /// is the target's current parent.
    fn move_creates_cycle(&self, moved: &str, target: &str, intent: DropIntent) -> bool {
        let forest = self.tree();
        match intent {
            DropIntent::Inside => moved == target || is_descendant(moved, target, &forest),
            DropIntent::Before | DropIntent::After => {
                match self.store.get(target).and_then(|r| r.parent_id.as_deref()) {
                    Some(parent) => parent == moved || is_descendant(moved, parent, &forest),
                    None => false,
                }
            }
        }
    }
}
