//! Integration tests for refresh.

use std::collections::HashSet;
use std::time::Duration;

use assethub_core::config::AppConfig;
use assethub_core::events::EventPayload;
use assethub_core::types::NodeId;
use assethub_entity::node::{AssetKind, TreeNode};

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn test_refresh_preserves_expansion() {
    let app = TestApp::new();
    app.init().await;
    app.expand(&[NodeId::bundle(1), NodeId::bundle(2)]).await;

    app.backend.insert(
        TreeNode::asset(23, "teaser.png", AssetKind::Image).with_parent(NodeId::bundle(2)),
    );
    let report = app.explorer.refresh().await.unwrap();
    assert_eq!(report.restored.len(), 2);
    assert!(report.dropped.is_empty());

    let view = app.explorer.view().await;
    let campaigns = helpers::find(&view, &NodeId::bundle(2)).unwrap();
    assert!(campaigns.is_expanded);
    assert_eq!(campaigns.children.as_ref().unwrap().len(), 3);
    assert_eq!(
        app.explorer.expanded_ids().await,
        HashSet::from([NodeId::bundle(1), NodeId::bundle(2)])
    );
}

#[tokio::test]
async fn test_refresh_collapses_vanished_nodes() {
    let app = TestApp::new();
    app.init().await;
    app.expand(&[NodeId::bundle(1), NodeId::bundle(3)]).await;
    let mut events = app.explorer.subscribe();

    app.backend.fail_children(&NodeId::bundle(3));
    let report = app.explorer.refresh().await.unwrap();
    assert_eq!(report.dropped, vec![NodeId::bundle(3)]);
    assert!(!app.explorer.expanded_ids().await.contains(&NodeId::bundle(3)));

    let view = app.explorer.view().await;
    assert_eq!(helpers::find(&view, &NodeId::bundle(3)).unwrap().children, None);

    match events.recv().await.unwrap().payload {
        EventPayload::RefreshCompleted { restored, dropped } => {
            assert_eq!(restored, 1);
            assert_eq!(dropped, vec![NodeId::bundle(3)]);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_refresh_keeps_snapshot() {
    let app = TestApp::new();
    app.init().await;
    app.expand(&[NodeId::bundle(1)]).await;
    let before = app.explorer.view().await;

    app.backend.fail_root(true);
    assert!(app.explorer.refresh().await.is_err());
    assert_eq!(app.explorer.view().await, before);
}

#[tokio::test]
async fn test_refresh_batches_respect_config() {
    let mut config = AppConfig::default();
    config.explorer.refresh_batch_size = 2;
    let app = TestApp::with_config(config);
    app.init().await;
    app.expand(&[
        NodeId::bundle(1),
        NodeId::bundle(2),
        NodeId::bundle(3),
        NodeId::bundle(4),
    ])
    .await;

    app.explorer.refresh().await.unwrap();
    assert!(app.backend.peak_in_flight() <= 2);
}

#[tokio::test(start_paused = true)]
async fn test_node_expanded_during_refresh_keeps_children() {
    let app = TestApp::new();
    app.init().await;
    app.expand(&[NodeId::bundle(3)]).await;
    app.backend.set_latency(Duration::from_millis(40));

    let (report, expanded) = tokio::join!(app.explorer.refresh(), async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        app.explorer.toggle_expand(&NodeId::bundle(1)).await
    });
    assert!(expanded);
    assert_eq!(report.unwrap().restored, vec![NodeId::bundle(3)]);

    let cache = app.explorer.cache();
    assert!(cache.is_cached(&NodeId::bundle(1)));
    assert!(!cache.is_pending(&NodeId::bundle(1)));

    let view = app.explorer.view().await;
    let marketing = helpers::find(&view, &NodeId::bundle(1)).unwrap();
    assert!(marketing.is_expanded);
    assert!(!marketing.is_loading);
    assert_eq!(marketing.children.as_ref().unwrap().len(), 3);
}
