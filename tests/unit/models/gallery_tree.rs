use super::*;

fn gallery_type(id: i32, name: &str, nice: &str) -> GalleryType {
    GalleryType {
        type_id: id,
        type_name: name.to_string(),
        nice_name: nice.to_string(),
    }
}

fn folder(id: u64, path: &str, ty: &str) -> GalleryFolderEntry {
    GalleryFolderEntry {
        structure_id: EntryId(id),
        site_path: path.to_string(),
        resource_type: ty.to_string(),
        title: String::new(),
        sub_galleries: Vec::new(),
    }
}

#[test]
fn test_add_folders_recursive_registers_sub_galleries() {
    let mut tree = GalleryTree::new();
    let ty = tree.add_type(gallery_type(1, "imagegallery", "Images"));
    let mut outer = folder(10, "/.galleries/pics/", "imagegallery");
    outer
        .sub_galleries
        .push(folder(11, "/.galleries/pics/2024/", "imagegallery"));

    tree.add_folders_recursive(ty, &[outer]);

    let outer_id = tree.folder_item(EntryId(10)).unwrap();
    let inner_id = tree.folder_item(EntryId(11)).unwrap();
    assert_eq!(tree.children(ty), &[outer_id]);
    assert_eq!(tree.children(outer_id), &[inner_id]);
}

#[test]
fn test_remove_folder_ignores_unknown_ids() {
    let mut tree = GalleryTree::new();
    let ty = tree.add_type(gallery_type(1, "imagegallery", "Images"));
    tree.add_folder(ty, &folder(10, "/.galleries/pics/", "imagegallery"));

    assert!(!tree.remove_folder(EntryId(99)));
    assert!(tree.remove_folder(EntryId(10)));
    assert!(tree.children(ty).is_empty());
    assert!(!tree.contains_folder(EntryId(10)));
}

#[test]
fn test_move_type_to_top() {
    let mut tree = GalleryTree::new();
    tree.add_type(gallery_type(1, "a", "A"));
    let b = tree.add_type(gallery_type(2, "b", "B"));

    assert!(tree.move_type_to_top("b"));
    assert!(!tree.move_type_to_top("missing"));
    assert_eq!(tree.top_level()[0], b);
}

#[test]
fn test_visible_types_skip_hidden() {
    let mut tree = GalleryTree::new();
    let a = tree.add_type(gallery_type(1, "a", "A"));
    tree.add_type(gallery_type(2, "b", "B"));
    tree.item_mut(a).unwrap().hidden = true;

    let names: Vec<_> = tree
        .visible_types()
        .into_iter()
        .map(|t| t.type_name.as_str())
        .collect();
    assert_eq!(names, vec!["b"]);
}
