use crate::helpers::{
    client::logged_in_collector,
    mock_server::{post_uri, MockServer},
};
use bsky_core::TimeWindow;
use chrono::{TimeZone, Utc};

/// 観点: キーワードを順に検索し、ページ送りと重複排除が HTTP 越しでも効いているか
#[tokio::test]
async fn test_keywords_paginate_and_dedup_over_http() {
    let server = MockServer::start().await;
    let collector = logged_in_collector(&server).await;

    let posts = collector
        .collect_by_keywords(&["BTC", "eth"], TimeWindow::default(), 100)
        .await;

    let uris: Vec<&str> = posts.iter().map(|p| p.uri()).collect();
    assert_eq!(
        uris,
        vec![
            post_uri("btc-1"),
            post_uri("shared"),
            post_uri("btc-2"),
            post_uri("eth-1"),
        ]
    );

    let first = &posts[0];
    assert_eq!(first.text(), "Post btc-1");
    assert_eq!(first.author_handle(), "btc-1.test");
    assert_eq!(first.author_display_name(), Some("User btc-1"));
    assert_eq!(first.tags(), Some(&["crypto".to_string()][..]));
    assert_eq!(first.like_count(), 3);
    assert_eq!(first.repost_count(), 2);
    assert_eq!(first.reply_count(), 1);

    // btc 2 ページ + eth 1 ページ。キーワードは小文字で送られる
    let requests = server.search_requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0]["q"], "btc");
    assert!(!requests[0].contains_key("cursor"));
    assert_eq!(requests[1]["q"], "btc");
    assert_eq!(requests[1]["cursor"], "p2");
    assert_eq!(requests[2]["q"], "eth");
    assert_eq!(requests[2]["limit"], "100");
}

/// 観点: サーバーエラーのキーワードは飛ばされ、残りのキーワードは収集される
#[tokio::test]
async fn test_server_error_skips_keyword() {
    let server = MockServer::start().await;
    let collector = logged_in_collector(&server).await;

    let posts = collector
        .collect_by_keywords(&["broken", "eth"], TimeWindow::default(), 100)
        .await;

    let uris: Vec<&str> = posts.iter().map(|p| p.uri()).collect();
    assert_eq!(uris, vec![post_uri("shared"), post_uri("eth-1")]);

    // broken は 1 回だけ (再試行しない)
    let broken_calls = server
        .search_requests()
        .iter()
        .filter(|r| r["q"] == "broken")
        .count();
    assert_eq!(broken_calls, 1);
}

/// 観点: 期間指定が秒精度 + Z で送られる
#[tokio::test]
async fn test_time_window_query_params() {
    let server = MockServer::start().await;
    let collector = logged_in_collector(&server).await;

    let window = TimeWindow::new(
        Some(Utc.with_ymd_and_hms(2024, 11, 1, 0, 0, 0).unwrap()),
        Some(Utc.with_ymd_and_hms(2024, 11, 30, 23, 59, 59).unwrap()),
    );
    collector.collect_by_keywords(&["eth"], window, 25).await;

    let requests = server.search_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["since"], "2024-11-01T00:00:00Z");
    assert_eq!(requests[0]["until"], "2024-11-30T23:59:59Z");
    assert_eq!(requests[0]["limit"], "25");
}
