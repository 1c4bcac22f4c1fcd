use chrono::Utc;
use indexmap::IndexMap;

use crate::drag::DropIntent;
use crate::model::folder::{FolderId, FolderRecord};

/// Error type for reorder commits
#[derive(Debug, thiserror::Error)]
pub enum ReorderError {
    #[error("folder not found: {0}")]
    NotFound(FolderId),
    #[error("cannot drop a folder onto itself")]
    SelfTarget,
    #[error("the default folder cannot be moved")]
    DefaultFolder,
}

/// When the midpoint between two sibling order keys collapses below this,
/// the whole sibling group is renumbered to integral keys first.
const MIN_ORDER_GAP: f64 = 1e-9;

/// Apply a validated move to the flat collection.
///
/// `Inside` appends the moved record to the target's children. `Before` and
/// `After` adopt the target's parent and interpolate an order key between
/// the target and its adjacent sibling. The moved record is the only one
/// whose parent changes, so its own subtree travels with it untouched.
///
/// Cycle screening is the caller's job; this only re-checks the local
/// preconditions (distinct existing ids, moved is not a default folder) and
/// leaves the collection untouched when one fails.
pub fn reorder(
    records: &mut IndexMap<FolderId, FolderRecord>,
    moved: &str,
    target: &str,
    intent: DropIntent,
) -> Result<(), ReorderError> {
    if moved == target {
        return Err(ReorderError::SelfTarget);
    }
    let moved_rec = records
        .get(moved)
        .ok_or_else(|| ReorderError::NotFound(moved.to_string()))?;
    if moved_rec.is_default {
        return Err(ReorderError::DefaultFolder);
    }
    let target_rec = records
        .get(target)
        .ok_or_else(|| ReorderError::NotFound(target.to_string()))?;

    let (new_parent, new_order) = match intent {
        DropIntent::Inside => {
            let order = append_order(records, Some(target), moved);
            (Some(target.to_string()), order)
        }
        DropIntent::Before | DropIntent::After => {
            let parent = target_rec.parent_id.clone();
            let order = slot_order(records, moved, target, parent.as_deref(), intent);
            (parent, order)
        }
    };

    let rec = records
        .get_mut(moved)
        .ok_or_else(|| ReorderError::NotFound(moved.to_string()))?;
    rec.parent_id = new_parent;
    rec.order = new_order;
    rec.updated_at = Utc::now();
    Ok(())
}

/// Order key placing a record after all current children of `parent`,
/// ignoring `skip` (the record being moved)
pub fn append_order(
    records: &IndexMap<FolderId, FolderRecord>,
    parent: Option<&str>,
    skip: &str,
) -> f64 {
    siblings_of(records, parent, skip)
        .last()
        .map(|(_, order)| order + 1.0)
        .unwrap_or(0.0)
}

/// Order key placing `moved` immediately before or after `target` within
/// the sibling group under `parent`. Renumbers the group first if the
/// midpoint between the target and its neighbor has no room left.
fn slot_order(
    records: &mut IndexMap<FolderId, FolderRecord>,
    moved: &str,
    target: &str,
    parent: Option<&str>,
    intent: DropIntent,
) -> f64 {
    if let Some(order) = try_slot_order(records, moved, target, parent, intent) {
        return order;
    }
    renumber_siblings(records, parent, moved);
    // After renumbering, adjacent keys differ by 1.0 and the midpoint fits.
    try_slot_order(records, moved, target, parent, intent).unwrap_or(0.0)
}

fn try_slot_order(
    records: &IndexMap<FolderId, FolderRecord>,
    moved: &str,
    target: &str,
    parent: Option<&str>,
    intent: DropIntent,
) -> Option<f64> {
    let group = siblings_of(records, parent, moved);
    let idx = group.iter().position(|(id, _)| id == target)?;
    let target_order = group[idx].1;

    let neighbor = match intent {
        DropIntent::Before => idx.checked_sub(1).map(|i| group[i].1),
        _ => group.get(idx + 1).map(|(_, order)| *order),
    };
    match neighbor {
        Some(adjacent) => {
            if (adjacent - target_order).abs() <= MIN_ORDER_GAP {
                return None; // interpolation space exhausted
            }
            Some((adjacent + target_order) / 2.0)
        }
        None => match intent {
            DropIntent::Before => Some(target_order - 1.0),
            _ => Some(target_order + 1.0),
        },
    }
}

/// The sibling group under `parent` (excluding `skip`), sorted by order
fn siblings_of(
    records: &IndexMap<FolderId, FolderRecord>,
    parent: Option<&str>,
    skip: &str,
) -> Vec<(FolderId, f64)> {
    let mut group: Vec<(FolderId, f64)> = records
        .values()
        .filter(|r| r.id != skip && r.parent_id.as_deref() == parent)
        .map(|r| (r.id.clone(), r.order))
        .collect();
    group.sort_by(|a, b| a.1.total_cmp(&b.1));
    group
}

/// Reassign integral order keys 0, 1, 2, .. across a sibling group
fn renumber_siblings(
    records: &mut IndexMap<FolderId, FolderRecord>,
    parent: Option<&str>,
    skip: &str,
) {
    let group = siblings_of(records, parent, skip);
    for (i, (id, _)) in group.iter().enumerate() {
        if let Some(rec) = records.get_mut(id.as_str()) {
            rec.order = i as f64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::tree_ops::{build_tree, find_node};

    fn collection(records: Vec<FolderRecord>) -> IndexMap<FolderId, FolderRecord> {
        records.into_iter().map(|r| (r.id.clone(), r)).collect()
    }

    fn rec(id: &str, parent: Option<&str>, order: f64) -> FolderRecord {
        FolderRecord::new(id, format!("Folder {id}"), parent.map(String::from), order)
    }

    fn three_roots() -> IndexMap<FolderId, FolderRecord> {
        collection(vec![
            rec("a", None, 0.0),
            rec("b", None, 1.0),
            rec("c", None, 2.0),
        ])
    }

    fn sorted_roots(records: &IndexMap<FolderId, FolderRecord>) -> Vec<FolderId> {
        let flat: Vec<FolderRecord> = records.values().cloned().collect();
        build_tree(&flat).iter().map(|n| n.id.clone()).collect()
    }

    #[test]
    fn inside_reparents_and_appends() {
        let mut records = collection(vec![
            rec("a", None, 0.0),
            rec("a1", Some("a"), 0.0),
            rec("b", None, 1.0),
        ]);
        reorder(&mut records, "b", "a", DropIntent::Inside).unwrap();
        let b = &records["b"];
        assert_eq!(b.parent_id.as_deref(), Some("a"));
        assert!(b.order > records["a1"].order);
    }

    #[test]
    fn inside_empty_folder_starts_at_zero() {
        let mut records = collection(vec![rec("a", None, 0.0), rec("b", None, 1.0)]);
        reorder(&mut records, "b", "a", DropIntent::Inside).unwrap();
        assert_eq!(records["b"].order, 0.0);
    }

    #[test]
    fn before_places_moved_ahead_of_target() {
        let mut records = three_roots();
        reorder(&mut records, "c", "a", DropIntent::Before).unwrap();
        assert_eq!(sorted_roots(&records), vec!["c", "a", "b"]);
        assert_eq!(records["c"].parent_id, None);
    }

    #[test]
    fn after_places_moved_behind_target() {
        let mut records = three_roots();
        reorder(&mut records, "a", "b", DropIntent::After).unwrap();
        assert_eq!(sorted_roots(&records), vec!["b", "a", "c"]);
    }

    #[test]
    fn after_last_sibling_appends() {
        let mut records = three_roots();
        reorder(&mut records, "a", "c", DropIntent::After).unwrap();
        assert_eq!(sorted_roots(&records), vec!["b", "c", "a"]);
    }

    #[test]
    fn before_adopts_targets_parent() {
        let mut records = collection(vec![
            rec("a", None, 0.0),
            rec("a1", Some("a"), 0.0),
            rec("b", None, 1.0),
        ]);
        reorder(&mut records, "b", "a1", DropIntent::Before).unwrap();
        assert_eq!(records["b"].parent_id.as_deref(), Some("a"));
        assert!(records["b"].order < records["a1"].order);
    }

    #[test]
    fn subtree_travels_with_moved_node() {
        let mut records = collection(vec![
            rec("a", None, 0.0),
            rec("a1", Some("a"), 0.0),
            rec("a1x", Some("a1"), 0.0),
            rec("b", None, 1.0),
        ]);
        reorder(&mut records, "a", "b", DropIntent::Inside).unwrap();
        let flat: Vec<FolderRecord> = records.values().cloned().collect();
        let forest = build_tree(&flat);
        let a = find_node(&forest, "a").unwrap();
        assert!(a.contains("a1"));
        assert!(a.contains("a1x"));
        assert_eq!(find_node(&forest, "a1x").unwrap().depth, 3);
    }

    #[test]
    fn exhausted_gap_triggers_renumber() {
        let mut records = collection(vec![
            rec("a", None, 0.0),
            rec("b", None, 0.0 + 1e-12),
            rec("c", None, 1.0),
        ]);
        reorder(&mut records, "c", "b", DropIntent::Before).unwrap();
        assert_eq!(sorted_roots(&records), vec!["a", "c", "b"]);
        // The group was renumbered to integral keys before interpolation.
        assert_eq!(records["a"].order, 0.0);
        assert_eq!(records["b"].order, 1.0);
    }

    #[test]
    fn self_target_is_rejected_untouched() {
        let mut records = three_roots();
        let before: Vec<FolderRecord> = records.values().cloned().collect();
        assert!(matches!(
            reorder(&mut records, "a", "a", DropIntent::Inside),
            Err(ReorderError::SelfTarget)
        ));
        let after: Vec<FolderRecord> = records.values().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn default_folder_cannot_move() {
        let mut records = collection(vec![
            rec("unfiled", None, 0.0).as_default(),
            rec("a", None, 1.0),
        ]);
        assert!(matches!(
            reorder(&mut records, "unfiled", "a", DropIntent::After),
            Err(ReorderError::DefaultFolder)
        ));
        assert_eq!(records["unfiled"].order, 0.0);
    }

    #[test]
    fn default_folder_can_receive_drops() {
        let mut records = collection(vec![
            rec("unfiled", None, 0.0).as_default(),
            rec("a", None, 1.0),
        ]);
        reorder(&mut records, "a", "unfiled", DropIntent::Inside).unwrap();
        assert_eq!(records["a"].parent_id.as_deref(), Some("unfiled"));
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let mut records = three_roots();
        assert!(matches!(
            reorder(&mut records, "ghost", "a", DropIntent::Inside),
            Err(ReorderError::NotFound(_))
        ));
        assert!(matches!(
            reorder(&mut records, "a", "ghost", DropIntent::Inside),
            Err(ReorderError::NotFound(_))
        ));
    }
}
