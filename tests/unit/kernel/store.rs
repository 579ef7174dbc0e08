use super::*;
use crate::kernel::services::adapters::{GallerySnapshot, MemoryController, SitemapSnapshot};
use crate::kernel::services::bus::{sitemap_bus, SitemapBusReceiver, SitemapBusSender, SitemapMessage};
use crate::kernel::services::ports::EffectHandler;
use crate::kernel::{ChangeType, NotificationKind, SitemapChange};
use crate::models::{
    last_segment, EditorMode, EntryId, GalleryFolderEntry, GalleryType, LoadState, SitemapData,
    SitemapEntry, TreeItem,
};
use std::time::{Duration, Instant};

fn folder(id: u64, path: &str, loaded: bool, children: Vec<SitemapEntry>) -> SitemapEntry {
    let mut entry = SitemapEntry::new(EntryId(id), path);
    entry.title = last_segment(path).to_uppercase();
    entry.in_navigation = true;
    entry.children_loaded_initially = loaded;
    entry.sub_entries = children;
    entry
}

/// /            (1, loaded)
/// ├── a/       (2, loaded)
/// │   └── c/   (4) └── e/ (6)
/// ├── b/       (3) ├── d/ (5) └── x/ (8)
/// │                └── f/ (7)
/// └── g/       (9, loaded)
///     └── h/   (10)
fn sample_root() -> SitemapEntry {
    folder(
        1,
        "/",
        true,
        vec![
            folder(
                2,
                "/a/",
                true,
                vec![folder(4, "/a/c/", false, vec![folder(6, "/a/c/e/", false, vec![])])],
            ),
            folder(
                3,
                "/b/",
                false,
                vec![
                    folder(5, "/b/d/", false, vec![folder(8, "/b/d/x/", false, vec![])]),
                    folder(7, "/b/f/", false, vec![]),
                ],
            ),
            folder(9, "/g/", true, vec![folder(10, "/g/h/", false, vec![])]),
        ],
    )
}

fn sample_snapshot() -> SitemapSnapshot {
    SitemapSnapshot {
        data: SitemapData {
            root: sample_root(),
            ..SitemapData::default()
        },
        editable: true,
        detail_pages: Vec::new(),
        galleries: Vec::new(),
    }
}

fn gallery_type(type_id: i32, type_name: &str, nice_name: &str) -> GalleryType {
    GalleryType {
        type_id,
        type_name: type_name.to_string(),
        nice_name: nice_name.to_string(),
    }
}

fn gallery_folder(id: u64, path: &str, ty: &str) -> GalleryFolderEntry {
    GalleryFolderEntry {
        structure_id: EntryId(id),
        site_path: path.to_string(),
        resource_type: ty.to_string(),
        title: last_segment(path).to_string(),
        sub_galleries: Vec::new(),
    }
}

fn gallery_snapshot() -> SitemapSnapshot {
    let mut images = folder(21, "/.galleries/images/", false, vec![]);
    images.resource_type_name = "imagegallery".to_string();
    let mut docs = folder(22, "/.galleries/docs/", false, vec![]);
    docs.resource_type_name = "downloadgallery".to_string();
    let mut misc = folder(23, "/.galleries/misc/", false, vec![]);
    misc.resource_type_name = "zgallery".to_string();
    let root = folder(
        1,
        "/",
        true,
        vec![folder(20, "/.galleries/", true, vec![images, docs, misc])],
    );

    SitemapSnapshot {
        data: SitemapData {
            root,
            ..SitemapData::default()
        },
        editable: true,
        detail_pages: Vec::new(),
        galleries: vec![
            GallerySnapshot {
                gallery_type: gallery_type(1, "imagegallery", "Images"),
                folders: vec![gallery_folder(21, "/.galleries/images/", "imagegallery")],
            },
            GallerySnapshot {
                gallery_type: gallery_type(2, "downloadgallery", "Downloads"),
                folders: vec![gallery_folder(22, "/.galleries/docs/", "downloadgallery")],
            },
            GallerySnapshot {
                gallery_type: gallery_type(3, "linkgallery", "Links"),
                folders: Vec::new(),
            },
            GallerySnapshot {
                gallery_type: gallery_type(4, "zgallery", "Custom"),
                folders: vec![
                    gallery_folder(23, "/.galleries/misc/", "zgallery"),
                    gallery_folder(40, "/other/one/", "zgallery"),
                    gallery_folder(41, "/other/two/", "zgallery"),
                ],
            },
        ],
    }
}

struct Harness {
    store: Store,
    ctl: MemoryController,
    tx: SitemapBusSender,
    rx: SitemapBusReceiver,
}

impl Harness {
    fn new(snapshot: SitemapSnapshot) -> (Self, Vec<Effect>) {
        let ctl = MemoryController::from_snapshot(snapshot);
        let (store, effects) = Store::init(&ctl, SitemapConfig::default()).unwrap();
        let (tx, rx) = sitemap_bus();
        (Self { store, ctl, tx, rx }, effects)
    }

    fn sample() -> Self {
        let (mut h, effects) = Self::new(sample_snapshot());
        h.settle(effects);
        h
    }

    fn dispatch(&mut self, action: Action) -> DispatchResult {
        self.store.dispatch(&self.ctl, action)
    }

    /// Hands effects to the controller and applies its answers until the
    /// bus is empty.
    fn settle(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.ctl.handle_effect(effect, &self.tx);
        }
        while let Ok(SitemapMessage::Action(action)) = self.rx.try_recv() {
            let result = self.dispatch(action);
            for effect in result.effects {
                self.ctl.handle_effect(effect, &self.tx);
            }
        }
    }

    fn run(&mut self, action: Action) {
        let result = self.dispatch(action);
        self.settle(result.effects);
    }

    fn change(&mut self, change: SitemapChange) -> DispatchResult {
        self.dispatch(Action::Change(change))
    }

    fn state(&self) -> &SitemapViewState {
        self.store.state()
    }

    fn item(&self, id: u64) -> Option<&TreeItem> {
        self.state().tree.item_for_entry(EntryId(id))
    }

    fn child_entries(&self, id: u64) -> Vec<u64> {
        let tree = &self.state().tree;
        let Some(item) = tree.item_id(EntryId(id)) else {
            return Vec::new();
        };
        tree.children(item)
            .iter()
            .map(|c| tree.item(*c).unwrap().entry_id.0)
            .collect()
    }

    fn count_items(&self, id: u64) -> usize {
        self.state()
            .tree
            .items()
            .filter(|(_, item)| item.entry_id == EntryId(id))
            .count()
    }
}

#[test]
fn test_init_without_data_fails() {
    let ctl = MemoryController::unavailable();
    let result = Store::init(&ctl, SitemapConfig::default());
    assert!(matches!(result, Err(SitemapError::DataUnavailable)));
}

#[test]
fn test_init_builds_loaded_open_root() {
    let (h, effects) = Harness::new(sample_snapshot());

    assert_eq!(effects, vec![Effect::RecomputeProperties]);
    let root = h.item(1).unwrap();
    assert!(root.open);
    assert_eq!(root.load_state, LoadState::Loaded);
    assert_eq!(h.child_entries(1), vec![2, 3, 9]);
    assert_eq!(h.child_entries(2), vec![4]);
    assert_eq!(h.item(3).unwrap().load_state, LoadState::Unloaded);
    assert!(h.state().notifications().is_empty());
}

#[test]
fn test_init_expands_open_path_without_prefetch() {
    let mut snapshot = sample_snapshot();
    snapshot.data.open_path = Some("/a/c/".to_string());

    let (h, effects) = Harness::new(snapshot);

    assert!(h.item(2).unwrap().open);
    assert_eq!(h.item(4).unwrap().load_state, LoadState::Loading);
    assert!(effects.contains(&Effect::FetchChildren {
        id: EntryId(4),
        set_open: true,
    }));
    assert!(!effects.contains(&Effect::FetchChildren {
        id: EntryId(2),
        set_open: false,
    }));
    assert!(!h.state().is_initializing());
}

#[test]
fn test_init_warns_when_not_editable() {
    let mut snapshot = sample_snapshot();
    snapshot.editable = false;
    snapshot.data.no_edit_reason = Some("locked by admin".to_string());

    let (h, _) = Harness::new(snapshot);

    let notifications = h.state().notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Warning);
    assert!(notifications[0].message.contains("locked by admin"));
}

#[test]
fn test_open_unloaded_item_fetches_once() {
    let mut h = Harness::sample();

    let result = h.dispatch(Action::Open { entry: EntryId(3) });
    assert_eq!(
        result.effects,
        vec![Effect::FetchChildren {
            id: EntryId(3),
            set_open: true,
        }]
    );
    assert_eq!(h.item(3).unwrap().load_state, LoadState::Loading);
    assert!(!h.item(3).unwrap().open);

    let again = h.dispatch(Action::Open { entry: EntryId(3) });
    assert!(again.effects.is_empty());
    assert!(!again.state_changed);

    h.settle(result.effects);

    let item = h.item(3).unwrap();
    assert!(item.open);
    assert_eq!(item.load_state, LoadState::Loaded);
    assert_eq!(h.child_entries(3), vec![5, 7]);
    // grandchildren were prefetched
    assert_eq!(h.child_entries(5), vec![8]);
    assert_eq!(h.item(5).unwrap().load_state, LoadState::Loaded);

    let third = h.dispatch(Action::Open { entry: EntryId(3) });
    assert!(third.effects.is_empty());
    assert!(!third.state_changed);
}

#[test]
fn test_open_loaded_item_prefetches_grandchildren() {
    let mut h = Harness::sample();

    let result = h.dispatch(Action::Open { entry: EntryId(9) });

    assert!(result.state_changed);
    assert!(h.item(9).unwrap().open);
    assert_eq!(
        result.effects,
        vec![Effect::FetchChildren {
            id: EntryId(9),
            set_open: false,
        }]
    );
}

#[test]
fn test_open_and_close_unknown_entry_is_noop() {
    let mut h = Harness::sample();

    assert!(!h.dispatch(Action::Open { entry: EntryId(99) }).state_changed);
    assert!(!h.dispatch(Action::Close { entry: EntryId(99) }).state_changed);
    assert!(!h.dispatch(Action::Close { entry: EntryId(2) }).state_changed);
}

#[test]
fn test_children_loaded_emits_recompute_in_suppressed_region() {
    let mut h = Harness::sample();
    let before = h.state().tree.suppressed_regions();
    let entry = h.ctl.entry_by_id(EntryId(9)).unwrap();

    let result = h.dispatch(Action::ChildrenLoaded {
        entry,
        set_open: false,
    });

    assert_eq!(result.effects, vec![Effect::RecomputeProperties]);
    assert_eq!(h.state().tree.suppressed_regions(), before + 1);
    assert!(h.state().tree.animation_enabled());
    assert_eq!(h.child_entries(9), vec![10]);
}

#[test]
fn test_children_loaded_names_items_from_site_path() {
    let mut h = Harness::sample();
    let mut child = SitemapEntry::new(EntryId(5), "/b/d/");
    child.name.clear();
    let mut entry = SitemapEntry::new(EntryId(3), "/b/");
    entry.children_loaded_initially = true;
    entry.sub_entries = vec![child];

    h.dispatch(Action::ChildrenLoaded {
        entry,
        set_open: true,
    });

    assert_eq!(h.item(5).unwrap().name, "d");
    assert_eq!(
        h.state().item_by_path("/b/d/"),
        h.state().tree.item_id(EntryId(5))
    );
}

#[test]
fn test_children_loaded_for_unknown_item_is_ignored() {
    let mut h = Harness::sample();
    let entry = h.ctl.entry_by_id(EntryId(5)).unwrap();

    let result = h.dispatch(Action::ChildrenLoaded {
        entry,
        set_open: true,
    });

    assert!(!result.state_changed);
    assert!(result.effects.is_empty());
}

#[test]
fn test_create_inserts_at_controller_position() {
    let mut h = Harness::sample();

    let change = h.ctl.create_entry(EntryId(1), "n", 1).unwrap();
    let new_id = change.entry_id;
    assert!(h.change(change).state_changed);
    assert_eq!(h.child_entries(1), vec![2, new_id.0, 3, 9]);

    let change = h.ctl.create_entry(EntryId(1), "last", 99).unwrap();
    let last_id = change.entry_id;
    h.change(change);
    assert_eq!(h.child_entries(1).last(), Some(&last_id.0));
    assert_eq!(h.item(last_id.0).unwrap().site_path, "/last/");
}

#[test]
fn test_creates_into_empty_parent_follow_declared_positions() {
    let mut h = Harness::sample();
    let change = h.ctl.create_entry(EntryId(1), "box", 99).unwrap();
    let parent = change.entry_id;
    h.change(change);
    assert!(h.child_entries(parent.0).is_empty());

    for (name, position) in [("a", 5), ("b", 0), ("c", 1), ("d", 99), ("e", 2)] {
        let change = h.ctl.create_entry(parent, name, position).unwrap();
        assert!(h.change(change).state_changed);
    }

    let tree = &h.state().tree;
    let names: Vec<_> = tree
        .children(tree.item_id(parent).unwrap())
        .iter()
        .map(|id| tree.item(*id).unwrap().name.to_string())
        .collect();
    assert_eq!(names, vec!["b", "c", "e", "a", "d"]);
    let expected: Vec<_> = h
        .ctl
        .entry_by_id(parent)
        .unwrap()
        .sub_entries
        .iter()
        .map(|e| e.id.0)
        .collect();
    assert_eq!(h.child_entries(parent.0), expected);
}

#[test]
fn test_create_under_unmounted_parent_is_ignored() {
    let mut h = Harness::sample();

    let change = h.ctl.create_entry(EntryId(5), "deep", 0).unwrap();
    let new_id = change.entry_id;

    assert!(!h.change(change).state_changed);
    assert_eq!(h.count_items(new_id.0), 0);
}

#[test]
fn test_delete_then_undelete_keeps_single_item() {
    let mut h = Harness::sample();

    let delete = h.ctl.delete_entry(EntryId(4)).unwrap();
    assert!(h.change(delete).state_changed);
    assert!(h.item(4).is_none());
    assert!(h.child_entries(2).is_empty());

    let undelete = h.ctl.undelete_entry(EntryId(4)).unwrap();
    h.change(undelete.clone());
    assert_eq!(h.count_items(4), 1);
    assert_eq!(h.child_entries(2), vec![4]);

    // a repeated event replaces the stale item instead of duplicating it
    h.change(undelete);
    assert_eq!(h.count_items(4), 1);
    assert_eq!(h.child_entries(2), vec![4]);
}

#[test]
fn test_delete_root_is_refused() {
    let mut h = Harness::sample();

    let result = h.change(SitemapChange::new(EntryId(1), ChangeType::Delete));

    assert!(!result.state_changed);
    assert!(h.item(1).is_some());
}

#[test]
fn test_modify_root_with_position_only_refreshes() {
    let mut h = Harness::sample();
    let before = h.state().tree.len();

    let result = h.change(SitemapChange::new(EntryId(1), ChangeType::Modify).with_position(0));

    assert!(result.effects.is_empty());
    assert_eq!(h.state().tree.len(), before);
    assert_eq!(h.state().tree.root(), h.state().tree.item_id(EntryId(1)));
    assert_eq!(h.child_entries(1), vec![2, 3, 9]);
}

#[test]
fn test_move_to_new_parent_in_suppressed_region() {
    let mut h = Harness::sample();
    h.run(Action::Open { entry: EntryId(3) });
    let before = h.state().tree.suppressed_regions();

    let change = h.ctl.move_entry(EntryId(5), EntryId(9), 0).unwrap();
    assert!(change.has_new_parent);
    let result = h.change(change);

    assert!(result.state_changed);
    assert_eq!(h.child_entries(9), vec![5, 10]);
    assert_eq!(h.child_entries(3), vec![7]);
    assert_eq!(h.count_items(5), 1);
    assert!(h.state().tree.animation_enabled());
    assert_eq!(h.state().tree.suppressed_regions(), before + 1);
    assert!(result.effects.contains(&Effect::ScrollIntoView(EntryId(5))));
    assert!(h.item(9).unwrap().open);

    let moved = h.item(5).unwrap();
    assert_eq!(moved.site_path, "/g/d/");
    assert_eq!(h.item(8).unwrap().site_path, "/g/d/x/");
}

#[test]
fn test_move_to_front_of_parent_with_two_children() {
    let mut h = Harness::sample();
    h.run(Action::Open { entry: EntryId(3) });
    let extra = h.ctl.create_entry(EntryId(9), "k", 99).unwrap();
    let extra_id = extra.entry_id;
    h.change(extra);
    assert_eq!(h.child_entries(9), vec![10, extra_id.0]);
    let before = h.state().tree.suppressed_regions();

    let change = h.ctl.move_entry(EntryId(5), EntryId(9), 0).unwrap();
    assert!(change.has_new_parent);
    assert_eq!(change.parent_id, Some(EntryId(9)));
    assert_eq!(change.position, Some(0));
    h.change(change);

    assert_eq!(h.child_entries(9), vec![5, 10, extra_id.0]);
    assert_eq!(h.child_entries(3), vec![7]);
    assert_eq!(h.count_items(5), 1);
    assert!(h.state().tree.animation_enabled());
    assert_eq!(h.state().tree.suppressed_regions(), before + 1);
}

#[test]
fn test_move_within_parent_reorders() {
    let mut h = Harness::sample();

    let change = h.ctl.move_entry(EntryId(9), EntryId(1), 0).unwrap();
    assert!(!change.has_new_parent);
    h.change(change);

    assert_eq!(h.child_entries(1), vec![9, 2, 3]);
}

#[test]
fn test_move_to_unmounted_parent_drops_item() {
    let mut h = Harness::sample();

    let change = h.ctl.move_entry(EntryId(2), EntryId(5), 0).unwrap();
    let result = h.change(change);

    assert!(result.state_changed);
    assert_eq!(h.count_items(2), 0);
    assert!(h.item(4).is_none());
    assert_eq!(h.child_entries(1), vec![3, 9]);
}

#[test]
fn test_modify_updates_title_and_paths() {
    let mut h = Harness::sample();

    let change = h.ctl.set_title(EntryId(2), "Alpha").unwrap();
    assert!(h.change(change).state_changed);
    assert_eq!(h.item(2).unwrap().title, "Alpha");

    let change = h.ctl.rename_entry(EntryId(2), "z").unwrap();
    h.change(change);
    assert_eq!(h.item(2).unwrap().name, "z");
    assert_eq!(h.item(4).unwrap().site_path, "/z/c/");
    assert!(h.state().item_by_path("/z/c/").is_some());
    assert!(h.state().item_by_path("/a/c/").is_none());
}

#[test]
fn test_remove_from_navigation_updates_item() {
    let mut h = Harness::sample();

    let change = h.ctl.remove_from_navigation(EntryId(2)).unwrap();
    h.change(change);

    assert!(!h.item(2).unwrap().in_navigation);
}

#[test]
fn test_bump_detail_page_refreshes_detail_items() {
    let mut snapshot = sample_snapshot();
    snapshot.detail_pages = vec![
        crate::models::DetailPageInfo {
            id: EntryId(2),
            type_name: "news".to_string(),
            icon_type: "news".to_string(),
        },
        crate::models::DetailPageInfo {
            id: EntryId(9),
            type_name: "news".to_string(),
            icon_type: "newslist".to_string(),
        },
    ];
    let (mut h, _) = Harness::new(snapshot);
    assert_eq!(h.item(2).unwrap().icon, "cms_type_icon cms_type_icon_news");

    let change = h.ctl.bump_detail_page(EntryId(9)).unwrap();
    let result = h.change(change);

    assert!(result.state_changed);
    assert_eq!(h.item(9).unwrap().icon, "cms_type_icon cms_type_icon_newslist");
}

#[test]
fn test_clipboard_only_change_is_ignored() {
    let mut h = Harness::sample();

    let result = h.change(SitemapChange::new(EntryId(2), ChangeType::ClipboardOnly));

    assert!(!result.state_changed);
    assert!(result.effects.is_empty());
}

#[test]
fn test_update_entries_refreshes_items() {
    let mut h = Harness::sample();
    h.ctl.set_title(EntryId(9), "Gamma").unwrap();

    let result = h.dispatch(Action::UpdateEntries(vec![EntryId(9), EntryId(99)]));

    assert!(result.state_changed);
    assert_eq!(h.item(9).unwrap().title, "Gamma");
}

#[test]
fn test_ensure_visible_opens_ancestors_then_scrolls() {
    let mut h = Harness::sample();

    let result = h.dispatch(Action::EnsureVisible { entry: EntryId(10) });

    assert!(h.item(9).unwrap().open);
    assert_eq!(
        result.effects,
        vec![
            Effect::FetchChildren {
                id: EntryId(9),
                set_open: false,
            },
            Effect::ScrollIntoView(EntryId(10)),
        ]
    );
}

#[test]
fn test_highlight_expires_on_tick() {
    let mut h = Harness::sample();
    let now = Instant::now();

    h.run(Action::HighlightPath {
        path: "/g/".to_string(),
        now,
    });
    assert!(h.item(9).unwrap().is_highlighted());
    assert!(h.item(9).unwrap().open);

    let early = h.dispatch(Action::Tick {
        now: now + Duration::from_millis(1000),
    });
    assert!(!early.state_changed);
    assert!(h.item(9).unwrap().is_highlighted());

    let late = h.dispatch(Action::Tick {
        now: now + Duration::from_millis(1500),
    });
    assert!(late.state_changed);
    assert!(!h.item(9).unwrap().is_highlighted());
}

#[test]
fn test_highlight_missing_path_is_skipped() {
    let mut h = Harness::sample();

    let result = h.dispatch(Action::HighlightPath {
        path: "/nope/".to_string(),
        now: Instant::now(),
    });

    assert!(!result.state_changed);
    assert!(h.state().tree.items().all(|(_, item)| !item.is_highlighted()));
}

#[test]
fn test_vfs_mode_disables_new() {
    let mut h = Harness::sample();

    let result = h.dispatch(Action::SetEditorMode(EditorMode::Vfs));

    assert!(result.state_changed);
    assert!(result.effects.is_empty());
    assert!(!h.state().toolbar.new_enabled);
    assert!(h.state().toolbar.new_disabled_reason.is_some());

    h.dispatch(Action::SetEditorMode(EditorMode::Navigation));
    assert!(h.state().toolbar.new_enabled);
    assert!(h.state().toolbar.new_disabled_reason.is_none());
}

fn gallery_harness() -> Harness {
    let (mut h, effects) = Harness::new(gallery_snapshot());
    h.settle(effects);
    h.run(Action::SetEditorMode(EditorMode::Galleries));
    h
}

#[test]
fn test_gallery_mode_loads_galleries() {
    let mut h = Harness::sample();

    let result = h.dispatch(Action::SetEditorMode(EditorMode::Galleries));

    assert_eq!(result.effects, vec![Effect::LoadGalleries]);
    assert!(!h.state().main_tree_visible());
    assert!(h.state().gallery_tree_visible());
    assert!(h.state().toolbar.galleries_mode);
}

#[test]
fn test_galleries_pinned_types_first_then_by_nice_name() {
    let h = gallery_harness();
    let state = h.state();

    let visible: Vec<_> = state
        .galleries
        .visible_types()
        .into_iter()
        .map(|t| t.type_name.as_str())
        .collect();
    assert_eq!(visible, vec!["imagegallery", "downloadgallery", "zgallery"]);
    assert_eq!(state.galleries.top_level().len(), 4);

    let toolbar: Vec<_> = state
        .toolbar
        .gallery_types
        .iter()
        .map(|t| t.nice_name.as_str())
        .collect();
    assert_eq!(toolbar, vec!["Custom", "Downloads", "Images", "Links"]);
    assert_eq!(state.galleries_folder(), Some(EntryId(20)));
}

#[test]
fn test_gallery_delete_of_unknown_id_is_ignored() {
    let mut h = gallery_harness();

    let result = h.change(SitemapChange::new(EntryId(999), ChangeType::Delete));
    assert!(!result.state_changed);

    let change = h.ctl.delete_entry(EntryId(21)).unwrap();
    assert!(h.change(change).state_changed);
    assert!(!h.state().galleries.contains_folder(EntryId(21)));
}

#[test]
fn test_gallery_create_adds_folder_under_type() {
    let mut h = gallery_harness();

    let change = h.ctl.create_gallery(EntryId(20), "more", 1).unwrap();
    let new_id = change.entry_id;
    h.change(change);

    let galleries = &h.state().galleries;
    let folder = galleries.folder_item(new_id).unwrap();
    let ty = galleries.type_item("imagegallery").unwrap();
    assert!(galleries.children(ty).contains(&folder));
    assert_eq!(galleries.item(folder).unwrap().title, "more");
    assert_eq!(h.child_entries(20).last(), Some(&new_id.0));
}

#[test]
fn test_gallery_modify_updates_title_and_path() {
    let mut h = gallery_harness();

    let change = h.ctl.set_title(EntryId(21), "Pictures").unwrap();
    assert!(h.change(change).state_changed);
    let change = h.ctl.rename_entry(EntryId(21), "pics").unwrap();
    h.change(change);

    let galleries = &h.state().galleries;
    let item = galleries
        .item(galleries.folder_item(EntryId(21)).unwrap())
        .unwrap();
    assert_eq!(item.title, "Pictures");
    assert_eq!(item.site_path, "/.galleries/pics/");
}

#[test]
fn test_new_gallery_updates_mounted_parent() {
    let mut h = gallery_harness();

    let result = h.dispatch(Action::NewGallery(gallery_folder(
        30,
        "/.galleries/new/",
        "linkgallery",
    )));

    assert_eq!(result.effects, vec![Effect::UpdateEntry(EntryId(20))]);
    let galleries = &h.state().galleries;
    let ty = galleries.item(galleries.type_item("linkgallery").unwrap()).unwrap();
    assert!(ty.open);
    assert!(!ty.hidden);
    assert!(galleries.contains_folder(EntryId(30)));
}

#[test]
fn test_new_gallery_loads_unmounted_parent() {
    let mut h = gallery_harness();

    let result = h.dispatch(Action::NewGallery(gallery_folder(
        31,
        "/x/y/new/",
        "imagegallery",
    )));

    assert_eq!(result.effects, vec![Effect::LoadPath("/x/y/".to_string())]);
}

#[test]
fn test_gallery_opened_loads_each_unknown_parent_once() {
    let mut h = gallery_harness();
    let ty = h.state().galleries.type_item("zgallery").unwrap();

    let result = h.dispatch(Action::GalleryOpened { item: ty });

    assert!(result.state_changed);
    assert_eq!(result.effects, vec![Effect::LoadPath("/other/".to_string())]);
    assert!(h.state().galleries.item(ty).unwrap().open);
}
