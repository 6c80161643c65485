use super::models::{BookmarkNode, NodeId};
use super::BookmarkStore;
use crate::error::Error;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Milliseconds between 1601-01-01 and 1970-01-01.
const WEBKIT_EPOCH_OFFSET_MILLIS: i64 = 11_644_473_600_000;

/// Permanent roots, in the order the browser shows them.
const ROOT_ORDER: [&str; 3] = ["bookmark_bar", "other", "synced"];

/// Id of the synthetic untitled node that parents the permanent roots.
const ROOT_NODE_ID: &str = "0";

/// A Chromium-family `Bookmarks` profile file.
///
/// The whole document is held in memory; removals edit it in place and
/// `save` writes it back. Fields the tree snapshot does not expose (guid,
/// meta_info, sync data) are carried through untouched.
pub struct ChromiumBookmarks {
    path: Option<PathBuf>,
    document: Value,
}

/// Where a node sits: the permanent root it lives under and the child index
/// at each level below it. An empty `path` is the permanent root itself.
#[derive(Debug, Clone, PartialEq)]
struct Location {
    root: String,
    path: Vec<usize>,
}

impl ChromiumBookmarks {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let mut store = Self::from_json_str(&contents)?;
        store.path = Some(path.to_path_buf());
        info!("Loaded bookmarks from {}", path.display());
        Ok(store)
    }

    /// Profiles can nest folders past serde_json's default depth limit, so
    /// parsing runs unbounded on a growable stack.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let mut deserializer = serde_json::Deserializer::from_str(json);
        deserializer.disable_recursion_limit();
        let document = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
        deserializer.end()?;
        Ok(Self {
            path: None,
            document,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Serialized document without the stale checksum; the browser
    /// recomputes it on next load.
    pub fn to_json_string(&self) -> Result<String, Error> {
        let mut document = self.document.clone();
        if let Some(obj) = document.as_object_mut() {
            obj.remove("checksum");
        }
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Write the document back to the file it was opened from. With `backup`
    /// the current file is first copied to `<file>.bak`.
    pub fn save(&self, backup: bool) -> Result<(), Error> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| Error::Other("bookmarks were not loaded from a file".to_string()))?;

        if backup && path.exists() {
            let backup_path = with_suffix(path, ".bak");
            fs::copy(path, &backup_path)?;
            debug!("Backed up {} to {}", path.display(), backup_path.display());
        }

        let tmp_path = with_suffix(path, ".tmp");
        let written = fs::write(&tmp_path, self.to_json_string()?)
            .and_then(|()| fs::rename(&tmp_path, path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        info!("Saved bookmarks to {}", path.display());
        Ok(())
    }

    fn roots(&self) -> Option<&Map<String, Value>> {
        self.document.get("roots")?.as_object()
    }

    fn root_keys(roots: &Map<String, Value>) -> Vec<&str> {
        let mut keys: Vec<&str> = ROOT_ORDER
            .iter()
            .copied()
            .filter(|key| roots.get(*key).is_some_and(Value::is_object))
            .collect();
        keys.extend(
            roots
                .iter()
                .filter(|(key, value)| !ROOT_ORDER.contains(&key.as_str()) && value.is_object())
                .map(|(key, _)| key.as_str()),
        );
        keys
    }

    fn locate(&self, id: &NodeId) -> Option<Location> {
        let roots = self.roots()?;
        for root in Self::root_keys(roots) {
            let mut stack: Vec<(&Value, Vec<usize>)> = vec![(&roots[root], Vec::new())];
            while let Some((node, path)) = stack.pop() {
                if node_id(node).as_deref() == Some(id.as_str()) {
                    return Some(Location {
                        root: root.to_string(),
                        path,
                    });
                }
                if let Some(children) = node.get("children").and_then(Value::as_array) {
                    for (idx, child) in children.iter().enumerate() {
                        let mut child_path = path.clone();
                        child_path.push(idx);
                        stack.push((child, child_path));
                    }
                }
            }
        }
        None
    }

    fn node_at(&self, location: &Location) -> Option<&Value> {
        let mut node = self.roots()?.get(&location.root)?;
        for &idx in &location.path {
            node = node.get("children")?.get(idx)?;
        }
        Some(node)
    }

    fn detach(&mut self, location: &Location) -> Option<Value> {
        let (last, parent_path) = location.path.split_last()?;
        let mut parent = self.document.get_mut("roots")?.get_mut(&location.root)?;
        for &idx in parent_path {
            parent = parent.get_mut("children")?.get_mut(idx)?;
        }
        let children = parent.get_mut("children")?.as_array_mut()?;
        if *last < children.len() {
            Some(children.remove(*last))
        } else {
            None
        }
    }

    fn locate_removable(&self, id: &NodeId) -> Result<Location, Error> {
        let location = self
            .locate(id)
            .ok_or_else(|| Error::removal(id.as_str(), "Can't find bookmark for id."))?;
        if location.path.is_empty() {
            return Err(Error::removal(
                id.as_str(),
                "Can't modify the root bookmark folders.",
            ));
        }
        Ok(location)
    }
}

impl BookmarkStore for ChromiumBookmarks {
    fn get_full_tree(&self) -> Result<Vec<BookmarkNode>, Error> {
        let roots = self
            .roots()
            .ok_or_else(|| Error::Retrieval("document has no \"roots\" object".to_string()))?;

        let children = Self::root_keys(roots)
            .into_iter()
            .map(|key| node_from_json(&roots[key]))
            .collect();

        Ok(vec![BookmarkNode {
            id: NodeId::new(ROOT_NODE_ID),
            title: None,
            url: None,
            date_added: None,
            children: Some(children),
        }])
    }

    fn remove_single(&mut self, id: &NodeId) -> Result<(), Error> {
        let location = self.locate_removable(id)?;
        let non_empty_folder = self
            .node_at(&location)
            .and_then(|node| node.get("children"))
            .and_then(Value::as_array)
            .is_some_and(|children| !children.is_empty());
        if non_empty_folder {
            return Err(Error::removal(id.as_str(), "Can't remove non-empty folder."));
        }

        self.detach(&location)
            .ok_or_else(|| Error::removal(id.as_str(), "Can't find bookmark for id."))?;
        debug!("Removed bookmark {}", id);
        Ok(())
    }

    fn remove_subtree(&mut self, id: &NodeId) -> Result<(), Error> {
        let location = self.locate_removable(id)?;
        self.detach(&location)
            .ok_or_else(|| Error::removal(id.as_str(), "Can't find bookmark for id."))?;
        debug!("Removed folder {} and its contents", id);
        Ok(())
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn node_id(node: &Value) -> Option<String> {
    match node.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A node whose children are still being converted.
struct PartialNode<'a> {
    value: &'a Value,
    remaining: std::slice::Iter<'a, Value>,
    children: Option<Vec<BookmarkNode>>,
}

impl<'a> PartialNode<'a> {
    fn new(value: &'a Value) -> Self {
        let children = value.get("children").and_then(Value::as_array);
        let remaining: &'a [Value] = children.map_or(&[], Vec::as_slice);
        Self {
            value,
            remaining: remaining.iter(),
            children: children.map(|c| Vec::with_capacity(c.len())),
        }
    }

    fn finish(self) -> BookmarkNode {
        let node = self.value;
        BookmarkNode {
            id: NodeId::new(node_id(node).unwrap_or_default()),
            title: node.get("name").and_then(Value::as_str).map(str::to_string),
            url: node.get("url").and_then(Value::as_str).map(str::to_string),
            date_added: node.get("date_added").and_then(webkit_to_unix_millis),
            children: self.children,
        }
    }
}

/// Post-order conversion on an explicit stack; a node is built once all of
/// its children are.
fn node_from_json(root: &Value) -> BookmarkNode {
    let mut ancestors: Vec<PartialNode> = Vec::new();
    let mut current = PartialNode::new(root);

    loop {
        if let Some(child) = current.remaining.next() {
            ancestors.push(std::mem::replace(&mut current, PartialNode::new(child)));
            continue;
        }

        let node = current.finish();
        match ancestors.pop() {
            Some(mut parent) => {
                parent.children.get_or_insert_with(Vec::new).push(node);
                current = parent;
            }
            None => return node,
        }
    }
}

/// `date_added` is microseconds since 1601-01-01, stored as a decimal string.
fn webkit_to_unix_millis(value: &Value) -> Option<i64> {
    let micros: i64 = match value {
        Value::String(s) => s.parse().ok()?,
        Value::Number(n) => n.as_i64()?,
        _ => return None,
    };
    if micros <= 0 {
        return None;
    }
    Some(micros / 1000 - WEBKIT_EPOCH_OFFSET_MILLIS)
}
