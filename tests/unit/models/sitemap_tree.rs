use super::*;
use crate::models::entry::{EntryId, SitemapEntry};

fn entry(id: u64, path: &str) -> SitemapEntry {
    SitemapEntry::new(EntryId(id), path)
}

fn tree_with_root() -> (SitemapTree, ItemId) {
    let mut tree = SitemapTree::new();
    let root = tree.insert_detached(TreeItem::from_entry(&entry(1, "/")));
    tree.set_root(root).unwrap();
    (tree, root)
}

fn names(tree: &SitemapTree, parent: ItemId) -> Vec<String> {
    tree.children(parent)
        .iter()
        .map(|id| tree.item(*id).unwrap().name.to_string())
        .collect()
}

#[test]
fn test_insert_child_clamps_out_of_range_index() {
    let (mut tree, root) = tree_with_root();
    let a = tree.insert_detached(TreeItem::from_entry(&entry(2, "/a/")));
    let b = tree.insert_detached(TreeItem::from_entry(&entry(3, "/b/")));

    assert_eq!(tree.insert_child(root, a, 5).unwrap(), 0);
    assert_eq!(tree.insert_child(root, b, 0).unwrap(), 0);
    assert_eq!(names(&tree, root), vec!["b", "a"]);
}

#[test]
fn test_insert_child_moves_between_parents() {
    let (mut tree, root) = tree_with_root();
    let a = tree.insert_detached(TreeItem::from_entry(&entry(2, "/a/")));
    let b = tree.insert_detached(TreeItem::from_entry(&entry(3, "/b/")));
    let c = tree.insert_detached(TreeItem::from_entry(&entry(4, "/a/c/")));
    tree.add_child(root, a).unwrap();
    tree.add_child(root, b).unwrap();
    tree.add_child(a, c).unwrap();

    tree.insert_child(b, c, 0).unwrap();

    assert!(tree.children(a).is_empty());
    assert_eq!(tree.children(b), &[c]);
    assert_eq!(tree.parent(c), Some(b));
}

#[test]
fn test_insert_child_rejects_cycle() {
    let (mut tree, root) = tree_with_root();
    let a = tree.insert_detached(TreeItem::from_entry(&entry(2, "/a/")));
    let c = tree.insert_detached(TreeItem::from_entry(&entry(3, "/a/c/")));
    tree.add_child(root, a).unwrap();
    tree.add_child(a, c).unwrap();

    assert_eq!(
        tree.insert_child(c, a, 0),
        Err(SitemapTreeError::MoveIntoDescendant)
    );
    assert_eq!(tree.parent(a), Some(root));
}

#[test]
fn test_insert_detached_replaces_stale_item() {
    let (mut tree, root) = tree_with_root();
    let first = tree.insert_detached(TreeItem::from_entry(&entry(2, "/a/")));
    tree.add_child(root, first).unwrap();

    let second = tree.insert_detached(TreeItem::from_entry(&entry(2, "/a/")));
    tree.add_child(root, second).unwrap();

    assert!(tree.item(first).is_none());
    assert_eq!(tree.children(root), &[second]);
    assert_eq!(tree.item_id(EntryId(2)), Some(second));
}

#[test]
fn test_remove_subtree_unregisters_descendants() {
    let (mut tree, root) = tree_with_root();
    let a = tree.insert_detached(TreeItem::from_entry(&entry(2, "/a/")));
    let c = tree.insert_detached(TreeItem::from_entry(&entry(3, "/a/c/")));
    tree.add_child(root, a).unwrap();
    tree.add_child(a, c).unwrap();

    tree.remove_subtree(a);

    assert!(tree.children(root).is_empty());
    assert!(tree.item_id(EntryId(2)).is_none());
    assert!(tree.item_id(EntryId(3)).is_none());
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_with_animations_suppressed_restores_flag() {
    let (mut tree, _) = tree_with_root();
    assert!(tree.animation_enabled());

    let seen = tree.with_animations_suppressed(|tree| tree.animation_enabled());

    assert!(!seen);
    assert!(tree.animation_enabled());
    assert_eq!(tree.suppressed_regions(), 1);
}

#[test]
fn test_flatten_for_view_only_descends_open_items() {
    let (mut tree, root) = tree_with_root();
    let a = tree.insert_detached(TreeItem::from_entry(&entry(2, "/a/")));
    let c = tree.insert_detached(TreeItem::from_entry(&entry(3, "/a/c/")));
    tree.add_child(root, a).unwrap();
    tree.add_child(a, c).unwrap();
    tree.item_mut(root).unwrap().open = true;

    let rows = tree.flatten_for_view();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].depth, 1);

    tree.item_mut(a).unwrap().open = true;
    let rows = tree.flatten_for_view();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2].name, "c");
    assert_eq!(rows[2].depth, 2);
}

#[test]
fn test_update_entry_renames_item() {
    let mut item = TreeItem::from_entry(&entry(2, "/a/"));
    let mut renamed = entry(2, "/b/");
    renamed.title = "B".to_string();

    item.update_entry(&renamed);

    assert_eq!(item.name, "b");
    assert_eq!(item.site_path, "/b/");
    assert_eq!(item.title, "B");
}

#[test]
fn test_from_entry_names_item_by_last_segment() {
    let mut e = entry(5, "/b/d/");
    e.name.clear();

    let item = TreeItem::from_entry(&e);

    assert_eq!(item.name, "d");
}
