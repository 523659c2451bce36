//! Integration tests for the search overlay.

use std::time::Duration;

use assethub_core::config::AppConfig;
use assethub_core::config::search::SearchMode;
use assethub_core::events::EventPayload;
use assethub_core::types::NodeId;
use assethub_entity::node::AssetKind;
use assethub_entity::view::SelectionState;
use assethub_service::{TypeFilter, WorkspaceContext};

use crate::helpers::{self, TestApp, WORKSPACE};

#[tokio::test]
async fn test_overlay_replaces_tree() {
    let app = TestApp::new();
    app.init().await;
    app.expand(&[NodeId::bundle(1)]).await;

    let outcome = app.explorer.set_search_query("report").await.unwrap();
    assert_eq!(outcome.served_by, SearchMode::Lexical);

    let view = app.explorer.view().await;
    // Archive is collapsed yet its asset is found; no bundles appear.
    assert_eq!(helpers::ids(&view), vec![NodeId::asset(31)]);
    assert!(view[0].score.is_some());
    assert!(view.iter().all(|item| item.children.is_none() && item.depth == 0));

    app.explorer.set_search_query("").await;
    let view = app.explorer.view().await;
    assert_eq!(view.len(), 4);
    assert!(helpers::find(&view, &NodeId::bundle(2)).is_some());
}

#[tokio::test]
async fn test_semantic_overlay_replaces_tree() {
    let app = TestApp::new();
    app.init_with(WorkspaceContext::new(WORKSPACE).with_embedding_model("clip")).await;
    app.backend.set_embeddings(true);
    app.expand(&[NodeId::bundle(1), NodeId::bundle(2), NodeId::bundle(3)]).await;

    app.explorer.set_search_mode(SearchMode::Semantic).await;
    let outcome = app
        .explorer
        .set_search_query("launch video poster")
        .await
        .unwrap();
    assert_eq!(outcome.served_by, SearchMode::Semantic);
    assert!(!outcome.fell_back);

    let view = app.explorer.view().await;
    // Exactly the ranked hits: no bundles, no cached non-hits, no nesting.
    assert_eq!(helpers::ids(&view), vec![NodeId::asset(21), NodeId::asset(22)]);
    assert!(view.iter().all(|item| item.depth == 0 && item.children.is_none()));
    assert!(view[0].score > view[1].score);
    assert!(helpers::find(&view, &NodeId::asset(31)).is_none());
    assert!(helpers::find(&view, &NodeId::bundle(3)).is_none());
}

#[tokio::test]
async fn test_overlay_respects_type_filter_and_selection() {
    let app = TestApp::new();
    app.init().await;
    app.explorer.set_search_query("png").await;
    assert_eq!(app.explorer.view().await.len(), 2);

    app.explorer
        .set_type_filter(TypeFilter::only(AssetKind::Video))
        .await;
    assert!(app.explorer.view().await.is_empty());

    app.explorer.set_type_filter(TypeFilter::All).await;
    app.explorer.toggle_select(&NodeId::asset(22), false).await;
    let view = app.explorer.view().await;
    let poster = helpers::find(&view, &NodeId::asset(22)).unwrap();
    assert!(poster.is_selected);
    assert_eq!(poster.selection, SelectionState::Full);
}

#[tokio::test]
async fn test_semantic_falls_back_visibly() {
    let app = TestApp::new();
    app.init_with(WorkspaceContext::new(WORKSPACE).with_embedding_model("clip")).await;
    let mut events = app.explorer.subscribe();

    app.explorer.set_search_mode(SearchMode::Semantic).await;
    let outcome = app.explorer.set_search_query("launch").await.unwrap();
    assert!(outcome.fell_back);
    assert_eq!(outcome.served_by, SearchMode::Lexical);
    assert_eq!(outcome.results.len(), 1);

    match events.recv().await.unwrap().payload {
        EventPayload::SearchFallback {
            requested,
            served_by,
            ..
        } => {
            assert_eq!(requested, SearchMode::Semantic);
            assert_eq!(served_by, SearchMode::Lexical);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    app.backend.set_embeddings(true);
    app.explorer.set_search_query("launch video").await;
    let outcome = app.explorer.search_outcome().await.unwrap();
    assert!(!outcome.fell_back);
    assert_eq!(outcome.served_by, SearchMode::Semantic);
}

#[tokio::test]
async fn test_semantic_without_model_uses_lexical() {
    let app = TestApp::new();
    app.init().await;
    app.backend.set_embeddings(true);

    app.explorer.set_search_mode(SearchMode::Semantic).await;
    let outcome = app.explorer.set_search_query("hero").await.unwrap();
    assert_eq!(outcome.served_by, SearchMode::Lexical);
    assert!(!outcome.fell_back);
    assert_eq!(app.backend.searches(), vec![(SearchMode::Lexical, "hero".to_string())]);
}

#[tokio::test(start_paused = true)]
async fn test_debounce_sends_only_latest_query() {
    let mut config = AppConfig::default();
    config.search.debounce_ms = 50;
    let app = TestApp::with_config(config);
    app.init().await;

    let (first, second) = tokio::join!(app.explorer.set_search_query("rep"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        app.explorer.set_search_query("report").await
    });

    assert!(first.is_none());
    assert_eq!(second.unwrap().query, "report");
    assert_eq!(
        app.backend.searches(),
        vec![(SearchMode::Lexical, "report".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn test_stale_results_are_discarded() {
    let app = TestApp::new();
    app.init().await;
    app.backend.set_latency(Duration::from_millis(40));

    let (first, second) = tokio::join!(app.explorer.set_search_query("poster"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        app.explorer.set_search_query("hero").await
    });

    assert!(first.is_none());
    assert!(second.is_some());
    let outcome = app.explorer.search_outcome().await.unwrap();
    assert_eq!(outcome.query, "hero");
    assert_eq!(app.backend.searches().len(), 2);
}
