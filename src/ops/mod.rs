pub mod reorder;
pub mod tree_ops;
