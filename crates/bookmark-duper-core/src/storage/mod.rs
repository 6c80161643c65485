pub mod chromium;
pub mod models;

pub use chromium::ChromiumBookmarks;

use crate::error::Error;
use models::{BookmarkNode, NodeId};

/// The host bookmark store. Reads hand back a snapshot; removals mutate the
/// store one item at a time.
pub trait BookmarkStore {
    /// Snapshot of the full forest. Failure is a `Error::Retrieval`.
    fn get_full_tree(&self) -> Result<Vec<BookmarkNode>, Error>;

    /// Remove exactly one leaf. Fails if `id` is unknown.
    fn remove_single(&mut self, id: &NodeId) -> Result<(), Error>;

    /// Remove a folder and everything below it. Fails if `id` is unknown.
    fn remove_subtree(&mut self, id: &NodeId) -> Result<(), Error>;
}
