//! Integration tests for selection and cascading state.

use assethub_core::events::EventPayload;
use assethub_core::types::NodeId;
use assethub_entity::view::SelectionState;

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn test_bundle_cascade_is_idempotent() {
    let app = TestApp::new();
    app.init().await;
    app.expand(&[NodeId::bundle(1), NodeId::bundle(2)]).await;
    let marketing = NodeId::bundle(1);

    let added = app.explorer.toggle_bundle_cascade(&marketing, true).await;
    // Marketing, Campaigns, its two assets, and the two container assets.
    assert_eq!(added, 6);
    let first = app.explorer.selected_ids().await;

    assert_eq!(app.explorer.toggle_bundle_cascade(&marketing, true).await, 0);
    assert_eq!(app.explorer.selected_ids().await, first);

    // Children of the container assets were never loaded.
    assert!(!first.contains(&NodeId::asset(111)));
    assert!(!first.contains(&NodeId::asset(121)));
}

#[tokio::test]
async fn test_full_and_partial_never_both() {
    let app = TestApp::new();
    app.init().await;
    app.expand(&[NodeId::bundle(1), NodeId::bundle(2)]).await;
    let campaigns = NodeId::bundle(2);

    let states = [
        (vec![], SelectionState::None),
        (vec![NodeId::asset(21)], SelectionState::Partial),
        (vec![NodeId::asset(21), NodeId::asset(22)], SelectionState::Partial),
        (
            vec![NodeId::asset(21), NodeId::asset(22), campaigns.clone()],
            SelectionState::Full,
        ),
    ];

    for (selected, expected) in states {
        app.explorer.clear_selection().await;
        for id in &selected {
            app.explorer.toggle_select(id, true).await;
        }
        let full = app.explorer.is_bundle_fully_selected(&campaigns).await;
        let partial = app.explorer.is_bundle_partially_selected(&campaigns).await;
        assert!(!(full && partial));
        assert_eq!(full, expected == SelectionState::Full);
        assert_eq!(partial, expected == SelectionState::Partial);

        let view = app.explorer.view().await;
        assert_eq!(helpers::find(&view, &campaigns).unwrap().selection, expected);
    }
}

#[tokio::test]
async fn test_composite_auto_selects_loaded_images() {
    let app = TestApp::new();
    app.init().await;
    app.expand(&[NodeId::bundle(1), NodeId::asset(12)]).await;
    let mut events = app.explorer.subscribe();

    let outcome = app.explorer.toggle_select(&NodeId::asset(12), true).await;
    assert_eq!(outcome.auto_added, 1);
    let selected = app.explorer.selected_ids().await;
    assert!(selected.contains(&NodeId::asset(121)));
    assert!(!selected.contains(&NodeId::asset(122)));

    match events.recv().await.unwrap().payload {
        EventPayload::AutoSelected { parent_id, added } => {
            assert_eq!(parent_id, NodeId::asset(12));
            assert_eq!(added, 1);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    // One-way: deselecting the article keeps the image.
    app.explorer.toggle_select(&NodeId::asset(12), true).await;
    assert!(app.explorer.selected_ids().await.contains(&NodeId::asset(121)));
}

#[tokio::test]
async fn test_select_all_visible_and_unknown_ids() {
    let app = TestApp::new();
    app.init().await;
    app.expand(&[NodeId::bundle(3)]).await;

    app.explorer.select_all_visible().await;
    let selected = app.explorer.selected_ids().await;
    // Four roots plus the archive's one child.
    assert_eq!(selected.len(), 5);
    assert!(selected.contains(&NodeId::asset(31)));

    app.explorer.toggle_select(&NodeId::asset(999), false).await;
    assert_eq!(app.explorer.selected_ids().await.len(), 1);
    assert_eq!(app.explorer.view().await.len(), 4);
}
