//! Folder-tree core of the Binder proposal dashboard.
//!
//! The sidebar's project folders live as a flat collection of records
//! ([`model::FolderRecord`]) in a [`store::FolderStore`]. Everything the UI
//! renders is derived: [`ops::tree_ops::build_tree`] turns the flat records
//! into a nested forest, [`drag::classify_drop_intent`] maps pointer
//! position over a row to a placement, [`ops::tree_ops::is_descendant`]
//! screens moves that would create a cycle, and [`ops::reorder::reorder`]
//! commits a validated move back to the flat collection.
//! [`pane::FolderPane`] wires the pipeline together for one drag gesture at
//! a time.

pub mod drag;
pub mod model;
pub mod ops;
pub mod pane;
pub mod store;
