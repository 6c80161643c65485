pub mod flatten;

pub use flatten::{flatten_tree, FlattenedTree};
