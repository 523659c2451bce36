//! Integration tests for moves, drops, and deletes.

use assethub_core::error::ErrorKind;
use assethub_core::events::EventPayload;
use assethub_core::types::NodeId;
use assethub_service::DropTarget;

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn test_move_touches_only_old_and_new_parent() {
    let app = TestApp::new();
    app.init().await;
    app.expand(&[
        NodeId::bundle(1),
        NodeId::bundle(2),
        NodeId::bundle(3),
        NodeId::bundle(4),
    ])
    .await;
    let mut events = app.explorer.subscribe();

    app.explorer.toggle_select(&NodeId::asset(31), false).await;
    let report = app
        .explorer
        .move_selection_to(Some(NodeId::bundle(4)))
        .await
        .unwrap();
    assert_eq!(report.moved, vec![NodeId::asset(31)]);
    assert!(app.explorer.selected_ids().await.is_empty());

    // Expanded parents were re-fetched; everything else kept its entry.
    assert_eq!(app.backend.child_calls(&NodeId::bundle(3)), 2);
    assert_eq!(app.backend.child_calls(&NodeId::bundle(4)), 2);
    assert_eq!(app.backend.child_calls(&NodeId::bundle(1)), 1);
    assert_eq!(app.backend.child_calls(&NodeId::bundle(2)), 1);
    assert_eq!(app.backend.root_calls(), 1);

    let view = app.explorer.view().await;
    let empty = helpers::find(&view, &NodeId::bundle(4)).unwrap();
    assert_eq!(
        helpers::ids(empty.children.as_ref().unwrap()),
        vec![NodeId::asset(31)]
    );
    let archive = helpers::find(&view, &NodeId::bundle(3)).unwrap();
    assert_eq!(archive.children, Some(vec![]));

    match events.recv().await.unwrap().payload {
        EventPayload::NodesMoved { node_ids, target } => {
            assert_eq!(node_ids, vec![NodeId::asset(31)]);
            assert_eq!(target, Some(NodeId::bundle(4)));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn test_move_to_root_reloads_roots() {
    let app = TestApp::new();
    app.init().await;
    app.expand(&[NodeId::bundle(1)]).await;

    app.explorer
        .drop_items(&[NodeId::bundle(2)], DropTarget::Root)
        .await
        .unwrap();
    assert_eq!(app.backend.root_calls(), 2);

    let view = app.explorer.view().await;
    assert_eq!(view.len(), 5);
    let marketing = helpers::find(&view, &NodeId::bundle(1)).unwrap();
    assert_eq!(marketing.children.as_ref().unwrap().len(), 2);
}

#[tokio::test]
async fn test_drop_asset_on_asset_groups_them() {
    let app = TestApp::new();
    app.init().await;
    app.expand(&[NodeId::bundle(3)]).await;

    let report = app
        .explorer
        .drop_items(
            &[NodeId::asset(31)],
            DropTarget::Node(NodeId::asset(5)),
        )
        .await
        .unwrap();

    let bundle = report.created_bundle.unwrap();
    assert_eq!(bundle.name, "New Bundle");
    assert_eq!(bundle.parent_id, None);

    let view = app.explorer.view().await;
    assert!(helpers::find(&view, &bundle.id).is_some());
    assert!(helpers::find(&view, &NodeId::asset(5)).is_none());
    assert_eq!(
        helpers::find(&view, &NodeId::bundle(3)).unwrap().children,
        Some(vec![])
    );

    assert!(app.explorer.toggle_expand(&bundle.id).await);
    let view = app.explorer.view().await;
    let group = helpers::find(&view, &bundle.id).unwrap();
    assert_eq!(group.children.as_ref().unwrap().len(), 2);
}

#[tokio::test]
async fn test_drop_on_container_asset_is_rejected() {
    let app = TestApp::new();
    app.init().await;
    app.expand(&[NodeId::bundle(1)]).await;

    let err = app
        .explorer
        .drop_items(&[NodeId::asset(5)], DropTarget::Node(NodeId::asset(11)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(app.backend.move_calls(), 0);
}

#[tokio::test]
async fn test_partial_failure_keeps_selection() {
    let app = TestApp::new();
    app.init().await;
    app.backend.fail_move(&NodeId::bundle(3));

    app.explorer.toggle_select(&NodeId::bundle(3), true).await;
    app.explorer.toggle_select(&NodeId::asset(5), true).await;
    let err = app
        .explorer
        .move_selection_to(Some(NodeId::bundle(1)))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Network);
    assert_eq!(app.explorer.selected_ids().await.len(), 2);
    assert_eq!(
        app.backend.node(&NodeId::asset(5)).unwrap().parent_id,
        Some(NodeId::bundle(1))
    );
}

#[tokio::test]
async fn test_delete_selection() {
    let app = TestApp::new();
    app.init().await;
    app.expand(&[NodeId::bundle(1), NodeId::bundle(2)]).await;

    app.explorer.toggle_select(&NodeId::bundle(2), true).await;
    app.explorer.toggle_select(&NodeId::asset(5), true).await;
    let deleted = app.explorer.delete_selection().await.unwrap();

    assert_eq!(deleted, vec![NodeId::asset(5), NodeId::bundle(2)]);
    assert!(app.explorer.selected_ids().await.is_empty());
    assert!(!app.explorer.expanded_ids().await.contains(&NodeId::bundle(2)));

    let view = app.explorer.view().await;
    assert_eq!(view.len(), 3);
    let marketing = helpers::find(&view, &NodeId::bundle(1)).unwrap();
    assert_eq!(marketing.children.as_ref().unwrap().len(), 2);
    assert!(app.backend.node(&NodeId::asset(21)).is_none());
}
