//! Integration tests for view composition.

use assethub_core::config::AppConfig;
use assethub_core::types::{NodeId, SortField, SortKey, SortOption};
use assethub_entity::node::{AssetKind, TreeNode};
use assethub_service::TypeFilter;
use chrono::{TimeZone, Utc};

use crate::helpers::{self, TestApp};

fn local_search_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.search.remote_enabled = false;
    config
}

#[tokio::test]
async fn test_compound_sort_orders_each_level() {
    let at = |day| Utc.with_ymd_and_hms(2024, 5, day, 9, 0, 0).unwrap();
    let app = TestApp::with_nodes(
        AppConfig::default(),
        vec![
            TreeNode::asset(1, "A", AssetKind::Pdf).updated(at(2)),
            TreeNode::asset(2, "B", AssetKind::Pdf).updated(at(5)),
            TreeNode::asset(3, "C", AssetKind::Image).updated(at(1)),
            TreeNode::bundle(4, "Z bundle").updated(at(1)),
        ],
    );
    app.init().await;
    app.explorer
        .set_sort_option(SortOption::compound(
            SortField::asc(SortKey::Kind),
            SortField::desc(SortKey::UpdatedAt),
        ))
        .await;

    let view = app.explorer.view().await;
    let names: Vec<&str> = view.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, ["Z bundle", "C", "B", "A"]);
}

#[tokio::test]
async fn test_type_filter_keeps_ancestors_of_matches() {
    let app = TestApp::new();
    app.init().await;
    app.expand(&[
        NodeId::bundle(1),
        NodeId::bundle(2),
        NodeId::bundle(3),
        NodeId::bundle(4),
    ])
    .await;
    app.explorer
        .set_type_filter(TypeFilter::only(AssetKind::Image))
        .await;

    let view = app.explorer.view().await;
    // Empty is known empty; Archive only holds a pdf.
    assert_eq!(helpers::ids(&view), vec![NodeId::bundle(1)]);

    let marketing = &view[0];
    assert_eq!(
        helpers::ids(marketing.children.as_ref().unwrap()),
        vec![NodeId::bundle(2)]
    );
    let campaigns = &marketing.children.as_ref().unwrap()[0];
    assert_eq!(
        helpers::ids(campaigns.children.as_ref().unwrap()),
        vec![NodeId::asset(22)]
    );
}

#[tokio::test]
async fn test_kind_filter_drops_uncached_bundles() {
    let app = TestApp::new();
    app.init().await;
    app.explorer
        .set_type_filter(TypeFilter::only(AssetKind::Image))
        .await;

    // Nothing is cached below the roots, so no bundle can hold an image.
    assert!(app.explorer.view().await.is_empty());

    app.expand(&[NodeId::bundle(1)]).await;
    // Campaigns is still uncached; the other children are not images.
    assert!(app.explorer.view().await.is_empty());

    app.expand(&[NodeId::bundle(2)]).await;
    let view = app.explorer.view().await;
    assert_eq!(helpers::ids(&view), vec![NodeId::bundle(1)]);
    assert_eq!(
        helpers::ids(view[0].children.as_ref().unwrap()),
        vec![NodeId::bundle(2)]
    );

    app.explorer.set_type_filter(TypeFilter::All).await;
    assert_eq!(
        helpers::ids(&app.explorer.view().await),
        vec![NodeId::bundle(3), NodeId::bundle(4), NodeId::bundle(1), NodeId::asset(5)]
    );
}

#[tokio::test]
async fn test_local_term_filters_cached_tree() {
    let app = TestApp::with_config(local_search_config());
    app.init().await;
    app.expand(&[NodeId::bundle(3)]).await;

    assert!(app.explorer.set_search_query("REPORT").await.is_none());
    let view = app.explorer.view().await;
    assert_eq!(helpers::ids(&view), vec![NodeId::bundle(3)]);
    assert_eq!(
        helpers::ids(view[0].children.as_ref().unwrap()),
        vec![NodeId::asset(31)]
    );
    assert!(app.backend.searches().is_empty());

    app.explorer.set_search_query("market").await;
    assert_eq!(helpers::ids(&app.explorer.view().await), vec![NodeId::bundle(1)]);
}

#[tokio::test]
async fn test_scoped_view_shows_bundle_children() {
    let app = TestApp::new();
    app.init().await;
    app.explorer.set_scope(Some(NodeId::bundle(1))).await;

    let view = app.explorer.view().await;
    assert_eq!(
        helpers::ids(&view),
        vec![NodeId::bundle(2), NodeId::asset(11), NodeId::asset(12)]
    );
    assert!(view.iter().all(|item| item.depth == 0));

    app.explorer.set_scope(None).await;
    assert_eq!(app.explorer.view().await.len(), 4);
}
