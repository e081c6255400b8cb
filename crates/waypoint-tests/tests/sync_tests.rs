//! View-layer scenarios: debounced search and pagination over the directory.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use waypoint_cache::ListCache;
use waypoint_core::ports::ListFetcher;
use waypoint_core::SyncConfig;
use waypoint_data::MockDirectory;
use waypoint_sync::{ListController, debounce};
use waypoint_tests::init_test_logging;

fn users_controller(directory: Arc<MockDirectory>) -> ListController {
    let cache = Arc::new(ListCache::new(SyncConfig::default()));
    ListController::new("users", cache, directory as Arc<dyn ListFetcher>)
}

#[tokio::test]
async fn keystroke_burst_produces_a_single_search_query() {
    init_test_logging();
    let directory = Arc::new(MockDirectory::new());
    let mut ctl = users_controller(directory);

    let (tx, rx) = mpsc::channel(16);
    let mut searches = debounce(rx, Duration::from_millis(40));
    for text in ["c", "ch", "cha", "chap", "chape", "chapel"] {
        tx.send(text.to_string()).await.expect("send keystroke");
    }
    drop(tx);

    let mut emitted = Vec::new();
    while let Some(text) = searches.recv().await {
        emitted.push(text);
    }
    assert_eq!(emitted, vec!["chapel".to_string()]);

    for text in emitted {
        ctl.apply_search(text);
    }
    let snapshot = ctl.load().await.expect("search load");
    assert_eq!(ctl.page(), 1);
    assert_eq!(snapshot.pagination.total_items, 1);
    assert_eq!(snapshot.rows[0]["name"], json!("Jason Chapel"));
}

#[tokio::test]
async fn filter_change_resets_pagination() {
    init_test_logging();
    let directory = Arc::new(MockDirectory::new());
    let mut ctl = users_controller(directory);

    let first = ctl.load().await.expect("first page");
    assert_eq!(first.pagination.total_items, 12);
    assert_eq!(first.pagination.total_pages, 2);

    ctl.set_page(2);
    let second = ctl.load().await.expect("second page");
    assert_eq!(second.rows.len(), 2);

    ctl.set_filter("role", "tour-guide");
    assert_eq!(ctl.page(), 1);
    let guides = ctl.load().await.expect("filtered load");
    assert_eq!(guides.pagination.current_page, 1);
    assert_eq!(guides.pagination.total_items, 6);
    for row in &guides.rows {
        assert_eq!(row["role"], json!("tour-guide"));
    }
}

#[tokio::test]
async fn all_filter_value_matches_everything() {
    init_test_logging();
    let directory = Arc::new(MockDirectory::new());
    let mut ctl = users_controller(directory);

    ctl.set_filter("role", "all");
    ctl.set_filter("status", "all");
    let snapshot = ctl.load().await.expect("load");
    assert_eq!(snapshot.pagination.total_items, 12);
}
