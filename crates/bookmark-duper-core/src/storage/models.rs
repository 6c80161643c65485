use chrono::{DateTime, Utc};
use std::fmt;

/// Opaque node identifier handed out by the bookmark store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A node in the tree returned by the store. Leaves carry a URL, folders carry
/// children. The store owns the real tree; this is a read-only snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct BookmarkNode {
    pub id: NodeId,
    pub title: Option<String>,
    pub url: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub date_added: Option<i64>,
    pub children: Option<Vec<BookmarkNode>>,
}

impl BookmarkNode {
    pub fn bookmark(id: &str, title: &str, url: &str, date_added: Option<i64>) -> Self {
        Self {
            id: NodeId::new(id),
            title: Some(title.to_string()),
            url: Some(url.to_string()),
            date_added,
            children: None,
        }
    }

    pub fn folder(
        id: &str,
        title: &str,
        date_added: Option<i64>,
        children: Vec<BookmarkNode>,
    ) -> Self {
        Self {
            id: NodeId::new(id),
            title: Some(title.to_string()),
            url: None,
            date_added,
            children: Some(children),
        }
    }

    /// Non-empty URL, if any.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }

    /// Non-empty title, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    pub fn kind(&self) -> Option<ItemKind> {
        if self.url().is_some() {
            Some(ItemKind::Bookmark)
        } else if self.children.is_some() && self.title().is_some() {
            Some(ItemKind::Folder)
        } else {
            None
        }
    }

    pub fn child_count(&self) -> usize {
        self.children.as_ref().map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Bookmark,
    Folder,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Bookmark => f.write_str("bookmark"),
            ItemKind::Folder => f.write_str("folder"),
        }
    }
}

/// A flattened bookmark or folder, detached from the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedItem {
    pub id: NodeId,
    pub kind: ItemKind,
    pub title: Option<String>,
    pub url: Option<String>,
    pub date_added: Option<i64>,
    pub child_count: usize,
}

impl ScannedItem {
    /// Grouping key: URL for bookmarks, title for folders.
    pub fn identity_key(&self) -> &str {
        let key = match self.kind {
            ItemKind::Bookmark => self.url.as_deref(),
            ItemKind::Folder => self.title.as_deref(),
        };
        key.unwrap_or_default()
    }

    /// Creation time used for ordering; missing timestamps sort as 0.
    pub fn sort_timestamp(&self) -> i64 {
        self.date_added.unwrap_or(0)
    }

    pub fn added_at(&self) -> Option<DateTime<Utc>> {
        self.date_added.and_then(DateTime::from_timestamp_millis)
    }
}

/// One identity key that mapped to two or more items, resolved to a single
/// survivor and the copies to remove.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateGroup {
    pub kind: ItemKind,
    pub key: String,
    pub keep: ScannedItem,
    pub delete: Vec<ScannedItem>,
}

impl DuplicateGroup {
    pub fn member_count(&self) -> usize {
        self.delete.len() + 1
    }
}
