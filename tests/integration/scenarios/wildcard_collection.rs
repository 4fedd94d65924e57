use crate::helpers::{
    client::logged_in_collector,
    mock_server::{post_uri, MockServer},
};
use collector::WildcardOptions;
use std::time::Duration;

/// 観点: 503 が続いても同じページを取り直し、カーソルが尽きるまで集め切る
#[tokio::test]
async fn test_wildcard_retries_until_success() {
    let server = MockServer::start_with_wildcard_failures(2).await;
    let collector = logged_in_collector(&server).await;

    let posts = collector
        .collect_all(WildcardOptions {
            retry_delay: Duration::ZERO,
            ..Default::default()
        })
        .await;

    let uris: Vec<&str> = posts.iter().map(|p| p.uri()).collect();
    assert_eq!(uris, vec![post_uri("any-1"), post_uri("any-2")]);

    // 失敗 2 回 + 成功 2 ページ。失敗分はすべてカーソルなしの同じリクエスト
    let requests = server.search_requests();
    assert_eq!(requests.len(), 4);
    for r in &requests[..3] {
        assert_eq!(r["q"], "*");
        assert_eq!(r["lang"], "en");
        assert!(!r.contains_key("cursor"));
    }
    assert_eq!(requests[3]["cursor"], "p2");
}

/// 観点: 言語指定なしなら lang パラメータを送らない
#[tokio::test]
async fn test_wildcard_without_language() {
    let server = MockServer::start().await;
    let collector = logged_in_collector(&server).await;

    let posts = collector
        .collect_all(WildcardOptions {
            language: None,
            page_size: 50,
            retry_delay: Duration::ZERO,
            ..Default::default()
        })
        .await;

    assert_eq!(posts.len(), 2);
    let requests = server.search_requests();
    assert!(requests.iter().all(|r| !r.contains_key("lang")));
    assert!(requests.iter().all(|r| r["limit"] == "50"));
}
