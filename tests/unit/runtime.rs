use super::*;
use crate::kernel::services::adapters::MemoryController;
use crate::models::{EntryId, LoadState};

const SNAPSHOT: &str = r#"{
    "data": {
        "root": {
            "id": 1,
            "site_path": "/",
            "children_loaded_initially": true,
            "sub_entries": [
                { "id": 2, "site_path": "/a/", "children_loaded_initially": true },
                { "id": 3, "site_path": "/b/", "sub_entries": [
                    { "id": 4, "site_path": "/b/c/", "sub_entries": [
                        { "id": 5, "site_path": "/b/c/d/" }
                    ] }
                ] }
            ]
        }
    }
}"#;

fn runtime() -> SitemapRuntime<MemoryController> {
    let controller = MemoryController::from_json_str(SNAPSHOT).unwrap();
    SitemapRuntime::new(controller, SitemapConfig::default()).unwrap()
}

#[test]
fn test_new_hands_startup_effects_to_controller() {
    let rt = runtime();

    assert_eq!(rt.controller().recompute_count(), 1);
    assert!(rt.state().root_item().is_some());
}

#[test]
fn test_new_fails_without_data() {
    let result = SitemapRuntime::new(MemoryController::unavailable(), SitemapConfig::default());
    assert!(result.is_err());
}

#[test]
fn test_open_round_trips_through_controller() {
    let mut rt = runtime();

    assert!(rt.dispatch(Action::Open { entry: EntryId(3) }));
    assert_eq!(
        rt.state().tree.item_for_entry(EntryId(3)).unwrap().load_state,
        LoadState::Loading
    );

    // children load, then the grandchild prefetch answers
    assert_eq!(rt.run_until_idle(), 2);

    let tree = &rt.state().tree;
    let item = tree.item_for_entry(EntryId(3)).unwrap();
    assert!(item.open);
    assert_eq!(item.load_state, LoadState::Loaded);
    assert!(tree.item_for_entry(EntryId(5)).is_some());
}

#[test]
fn test_apply_queues_controller_change() {
    let mut rt = runtime();

    rt.apply(|c| c.create_entry(EntryId(2), "new", 0)).unwrap();
    assert!(rt.state().item_by_path("/a/new/").is_none());

    rt.run_until_idle();
    assert!(rt.state().item_by_path("/a/new/").is_some());

    assert!(rt.apply(|c| c.delete_entry(EntryId(99))).is_err());
}

#[test]
fn test_run_script_counts_failures() {
    let mut rt = runtime();
    let ops: Vec<ScriptOp> = serde_json::from_str(
        r#"[
            { "op": "open", "entry": 3 },
            { "op": "create", "parent": 1, "name": "n", "position": 1 },
            { "op": "move", "entry": 2, "parent": 3 },
            { "op": "delete", "entry": 99 }
        ]"#,
    )
    .unwrap();

    let failed = run_script(&mut rt, ops);

    assert_eq!(failed, 1);
    let tree = &rt.state().tree;
    let root = tree.root().unwrap();
    let names: Vec<_> = tree
        .children(root)
        .iter()
        .map(|id| tree.item(*id).unwrap().name.to_string())
        .collect();
    assert_eq!(names, vec!["n", "b"]);
    assert_eq!(
        tree.item_for_entry(EntryId(2)).unwrap().site_path,
        "/b/a/"
    );
}

#[tokio::test]
async fn test_run_stops_at_shutdown_in_order() {
    let mut rt = runtime();
    let tx = rt.sender();

    tx.send_action(Action::Open { entry: EntryId(3) }).unwrap();
    tx.shutdown().unwrap();

    // the controller's answer is queued behind the shutdown
    assert_eq!(rt.run().await, 1);
    assert_eq!(
        rt.state().tree.item_for_entry(EntryId(3)).unwrap().load_state,
        LoadState::Loading
    );

    assert_eq!(rt.run_until_idle(), 2);
    assert!(rt.state().tree.item_for_entry(EntryId(3)).unwrap().open);
}
