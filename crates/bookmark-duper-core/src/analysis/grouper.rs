use crate::scanner::FlattenedTree;
use crate::storage::models::{DuplicateGroup, ItemKind, ScannedItem};
use ahash::AHashMap;
use tracing::debug;

/// Group flattened items by identity key and resolve every key shared by two
/// or more items. Bookmark groups come first, then folder groups, each in the
/// order their key was first seen.
pub fn find_duplicate_groups(flattened: &FlattenedTree) -> Vec<DuplicateGroup> {
    let mut groups = resolve_groups(ItemKind::Bookmark, &flattened.bookmarks);
    groups.extend(resolve_groups(ItemKind::Folder, &flattened.folders));

    debug!(
        "{} duplicate groups ({} items marked for deletion)",
        groups.len(),
        groups.iter().map(|g| g.delete.len()).sum::<usize>(),
    );

    groups
}

fn resolve_groups(kind: ItemKind, items: &[ScannedItem]) -> Vec<DuplicateGroup> {
    group_by_identity(items)
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .filter_map(|(key, members)| resolve_group(kind, key, members))
        .collect()
}

/// Key → members, keeping first-seen key order and encounter order within
/// each key.
fn group_by_identity(items: &[ScannedItem]) -> Vec<(&str, Vec<&ScannedItem>)> {
    let mut index: AHashMap<&str, usize> = AHashMap::new();
    let mut grouped: Vec<(&str, Vec<&ScannedItem>)> = Vec::new();

    for item in items {
        let key = item.identity_key();
        match index.get(key) {
            Some(&slot) => grouped[slot].1.push(item),
            None => {
                index.insert(key, grouped.len());
                grouped.push((key, vec![item]));
            }
        }
    }

    grouped
}

/// Newest survives. `sort_by` is stable, so equal timestamps keep encounter
/// order and the first-seen item wins the tie.
fn resolve_group(
    kind: ItemKind,
    key: &str,
    mut members: Vec<&ScannedItem>,
) -> Option<DuplicateGroup> {
    members.sort_by(|a, b| b.sort_timestamp().cmp(&a.sort_timestamp()));

    let mut members = members.into_iter().cloned();
    let keep = members.next()?;

    Some(DuplicateGroup {
        kind,
        key: key.to_string(),
        keep,
        delete: members.collect(),
    })
}
