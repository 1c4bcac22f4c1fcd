use std::collections::{HashMap, HashSet};

use crate::model::folder::{FolderId, FolderRecord};
use crate::model::tree::NestedFolder;

// ---------------------------------------------------------------------------
// Tree building
// ---------------------------------------------------------------------------

/// Build the nested forest from the flat collection.
///
/// Roots are records with no `parent_id`. Records whose declared parent is
/// missing from the input are treated as additional roots rather than
/// dropped, so a stale reference never hides a folder from the sidebar.
/// Each level is sorted ascending by `order` (stable, so input order breaks
/// ties). Pure and total: empty input yields an empty forest.
pub fn build_tree(records: &[FolderRecord]) -> Vec<NestedFolder> {
    let known: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();

    // Group by effective parent: orphans land in the root group.
    let mut by_parent: HashMap<Option<&str>, Vec<&FolderRecord>> = HashMap::new();
    for record in records {
        let parent = record
            .parent_id
            .as_deref()
            .filter(|p| known.contains(p));
        by_parent.entry(parent).or_default().push(record);
    }

    build_level(None, 0, &by_parent)
}

fn build_level(
    parent: Option<&str>,
    depth: usize,
    by_parent: &HashMap<Option<&str>, Vec<&FolderRecord>>,
) -> Vec<NestedFolder> {
    let Some(group) = by_parent.get(&parent) else {
        return Vec::new();
    };
    let mut level: Vec<NestedFolder> = group
        .iter()
        .map(|r| NestedFolder::from_record(r, depth))
        .collect();
    level.sort_by(|a, b| a.order.total_cmp(&b.order));
    for node in &mut level {
        node.children = build_level(Some(node.id.as_str()), depth + 1, by_parent);
    }
    level
}

/// Flatten a forest back to `(id, parent_id)` pairs in depth-first order.
///
/// For a collection with a valid acyclic parent graph this reproduces the
/// `(id, parent_id)` pairs of the input to `build_tree`, with siblings in
/// their sorted relative order.
pub fn flatten_tree(forest: &[NestedFolder]) -> Vec<(FolderId, Option<FolderId>)> {
    let mut out = Vec::new();
    for node in forest {
        flatten_into(node, &mut out);
    }
    out
}

fn flatten_into(node: &NestedFolder, out: &mut Vec<(FolderId, Option<FolderId>)>) {
    out.push((node.id.clone(), node.parent_id.clone()));
    for child in &node.children {
        flatten_into(child, out);
    }
}

/// Find a node anywhere in the forest by id
pub fn find_node<'a>(forest: &'a [NestedFolder], id: &str) -> Option<&'a NestedFolder> {
    for node in forest {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, id) {
            return Some(found);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Cycle guard
// ---------------------------------------------------------------------------

/// True iff `candidate` lies strictly inside the subtree rooted at
/// `ancestor` — reached through the children chain, so a node is never
/// reported as its own descendant.
///
/// Screens reparent moves: dropping `moved` inside `target` is illegal when
/// `is_descendant(moved, target, ..)` holds, because the move would make
/// `moved` an ancestor of itself.
pub fn is_descendant(ancestor: &str, candidate: &str, forest: &[NestedFolder]) -> bool {
    match find_node(forest, ancestor) {
        Some(node) => node.children.iter().any(|c| c.contains(candidate)),
        None => false,
    }
}
