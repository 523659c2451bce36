//! Integration tests for lazy loading through the explorer.

use std::time::Duration;

use assethub_core::config::AppConfig;
use assethub_core::events::EventPayload;
use assethub_core::types::NodeId;
use assethub_service::WorkspaceContext;

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn test_expanding_twice_fetches_once() {
    let app = TestApp::new();
    app.init().await;
    let marketing = NodeId::bundle(1);

    assert!(app.explorer.toggle_expand(&marketing).await);
    assert!(!app.explorer.toggle_expand(&marketing).await);
    assert!(app.explorer.toggle_expand(&marketing).await);

    assert_eq!(app.backend.child_calls(&marketing), 1);
    assert_eq!(app.backend.root_calls(), 1);
}

#[tokio::test]
async fn test_invalidate_forces_refetch() {
    let app = TestApp::new();
    app.init().await;
    let cache = app.explorer.cache();
    let archive = NodeId::bundle(3);

    cache.fetch_children(&archive).await.unwrap();
    assert!(cache.invalidate(&archive));
    cache.fetch_children(&archive).await.unwrap();
    assert_eq!(app.backend.child_calls(&archive), 2);
}

#[tokio::test]
async fn test_empty_bundle_is_known_empty() {
    let app = TestApp::new();
    app.init().await;
    app.expand(&[NodeId::bundle(4)]).await;

    let view = app.explorer.view().await;
    let empty = helpers::find(&view, &NodeId::bundle(4)).unwrap();
    assert_eq!(empty.children, Some(vec![]));

    let archive = helpers::find(&view, &NodeId::bundle(3)).unwrap();
    assert_eq!(archive.children, None);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_expands_share_one_request() {
    let app = TestApp::new();
    app.init().await;
    app.backend.set_latency(Duration::from_millis(30));
    let cache = app.explorer.cache();
    let marketing = NodeId::bundle(1);

    let (a, b, c) = tokio::join!(
        cache.fetch_children(&marketing),
        cache.fetch_children(&marketing),
        cache.fetch_children(&marketing),
    );
    assert_eq!(a.unwrap().len(), 3);
    assert_eq!(b.unwrap(), c.unwrap());
    assert_eq!(app.backend.child_calls(&marketing), 1);
}

#[tokio::test]
async fn test_root_failure_is_published() {
    let app = TestApp::new();
    app.backend.fail_root(true);
    let mut events = app.explorer.subscribe();

    app.init().await;
    assert!(app.explorer.view().await.is_empty());
    let event = events.recv().await.unwrap();
    assert!(matches!(
        event.payload,
        EventPayload::LoadFailed { node_id: None, .. }
    ));
}

#[tokio::test]
async fn test_switching_workspace_discards_state() {
    let app = TestApp::new();
    app.init().await;
    app.expand(&[NodeId::bundle(1)]).await;
    app.explorer.toggle_select(&NodeId::bundle(3), false).await;

    app.init_with(WorkspaceContext::new(assethub_core::types::WorkspaceId(8)))
        .await;
    assert!(app.explorer.selected_ids().await.is_empty());
    assert!(app.explorer.expanded_ids().await.is_empty());
    assert!(!app.explorer.cache().is_cached(&NodeId::bundle(1)));
    assert_eq!(app.backend.root_calls(), 2);
}

#[tokio::test]
async fn test_long_children_lists_load_in_pages() {
    let mut config = AppConfig::default();
    config.cache.children_page_size = 2;
    let app = TestApp::with_config(config);
    app.init().await;
    let marketing = NodeId::bundle(1);
    app.expand(&[marketing.clone()]).await;

    let view = app.explorer.view().await;
    let item = helpers::find(&view, &marketing).unwrap();
    assert!(item.has_more);
    assert_eq!(item.total_children, Some(3));
    assert_eq!(item.children.as_ref().unwrap().len(), 2);

    // Only the loaded page takes part in the cascade.
    app.explorer.toggle_bundle_cascade(&marketing, true).await;
    assert_eq!(app.explorer.selected_ids().await.len(), 3);
    app.explorer.clear_selection().await;

    assert!(!app.explorer.load_more(&marketing).await);
    let view = app.explorer.view().await;
    let item = helpers::find(&view, &marketing).unwrap();
    assert!(!item.has_more);
    assert_eq!(item.children.as_ref().unwrap().len(), 3);
    assert_eq!(app.backend.child_calls(&marketing), 2);

    app.explorer.toggle_bundle_cascade(&marketing, true).await;
    assert_eq!(app.explorer.selected_ids().await.len(), 4);
}
