use crate::storage::models::{BookmarkNode, ItemKind, ScannedItem};
use tracing::debug;

/// Bookmarks and folders pulled out of a tree, in depth-first pre-order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FlattenedTree {
    pub bookmarks: Vec<ScannedItem>,
    pub folders: Vec<ScannedItem>,
    /// Nodes that are neither (untitled roots, malformed entries).
    pub excluded: usize,
}

impl FlattenedTree {
    pub fn total_nodes(&self) -> usize {
        self.bookmarks.len() + self.folders.len() + self.excluded
    }
}

/// Walk the forest with an explicit stack so deep trees cannot overflow the
/// call stack. Children of excluded nodes are still visited.
pub fn flatten_tree(roots: &[BookmarkNode]) -> FlattenedTree {
    let mut flattened = FlattenedTree::default();
    let mut stack: Vec<&BookmarkNode> = roots.iter().rev().collect();

    while let Some(node) = stack.pop() {
        match node.kind() {
            Some(kind) => {
                let item = ScannedItem {
                    id: node.id.clone(),
                    kind,
                    title: node.title.clone(),
                    url: node.url().map(str::to_string),
                    date_added: node.date_added,
                    child_count: node.child_count(),
                };
                match kind {
                    ItemKind::Bookmark => flattened.bookmarks.push(item),
                    ItemKind::Folder => flattened.folders.push(item),
                }
            }
            None => flattened.excluded += 1,
        }

        if let Some(children) = &node.children {
            stack.extend(children.iter().rev());
        }
    }

    debug!(
        "Flattened {} nodes: {} bookmarks, {} folders, {} excluded",
        flattened.total_nodes(),
        flattened.bookmarks.len(),
        flattened.folders.len(),
        flattened.excluded,
    );

    flattened
}
