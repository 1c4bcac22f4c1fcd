pub mod folder;
pub mod tree;

pub use folder::*;
pub use tree::*;
