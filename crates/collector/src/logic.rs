use crate::api::PostFetcher;
use crate::structs::PostView;
use bsky_core::{Post, SearchQuery, TimeWindow, MAX_PAGE_SIZE};
use std::collections::HashSet;
use std::time::Duration;

pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// 1 ページの取得に失敗したときの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// そのクエリのページ送りを打ち切る
    Abandon,
    /// 待ってから同じページを取り直す。回数の上限はない。
    RetryAfter(Duration),
}

/// 失敗時にページ送りループが取る次の動作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    GiveUp,
    Retry(Duration),
}

impl FailurePolicy {
    pub fn on_failure(&self) -> Recovery {
        match self {
            FailurePolicy::Abandon => Recovery::GiveUp,
            FailurePolicy::RetryAfter(delay) => Recovery::Retry(*delay),
        }
    }
}

/// 1 回の収集呼び出しの間だけ生きる、URI で重複排除された投稿列
#[derive(Debug, Default)]
pub struct Collection {
    seen: HashSet<String>,
    posts: Vec<Post>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 未出の URI だけを到着順に追加し、追加した件数を返す
    pub fn absorb(&mut self, views: impl IntoIterator<Item = PostView>) -> usize {
        let before = self.posts.len();
        for view in views {
            if self.seen.contains(&view.uri) {
                continue;
            }
            self.seen.insert(view.uri.clone());
            self.posts.push(Post::from(view));
        }
        self.posts.len() - before
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn into_posts(self) -> Vec<Post> {
        self.posts
    }
}

/// 全件 (`*`) 検索の条件
#[derive(Debug, Clone)]
pub struct WildcardOptions {
    pub window: TimeWindow,
    pub language: Option<String>,
    pub page_size: u32,
    pub retry_delay: Duration,
}

impl Default for WildcardOptions {
    fn default() -> Self {
        Self {
            window: TimeWindow::default(),
            language: Some(DEFAULT_LANGUAGE.to_string()),
            page_size: DEFAULT_PAGE_SIZE,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

pub struct PostCollector<F> {
    fetcher: F,
}

impl<F: PostFetcher> PostCollector<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// キーワードごとに順番に検索し、重複を除いた投稿を初出順で返す
    ///
    /// あるキーワードで取得に失敗した場合はそのキーワードだけを打ち切り、
    /// それまでに集めた投稿は残したまま次のキーワードへ進む。
    pub async fn collect_by_keywords<S: AsRef<str>>(
        &self,
        keywords: &[S],
        window: TimeWindow,
        page_size: u32,
    ) -> Vec<Post> {
        let limit = safe_page_size(page_size);
        let mut collection = Collection::new();

        for keyword in keywords {
            let keyword = keyword.as_ref();
            let query = SearchQuery::keyword(keyword, window, limit);
            let added = self
                .drain(query, FailurePolicy::Abandon, &mut collection)
                .await;
            tracing::info!(
                "Keyword '{}': {} new posts ({} total)",
                keyword,
                added,
                collection.len()
            );
        }

        collection.into_posts()
    }

    /// `*` で全件を検索する。失敗しても諦めず、`retry_delay` 待って同じページを取り直す。
    pub async fn collect_all(&self, options: WildcardOptions) -> Vec<Post> {
        let limit = safe_page_size(options.page_size);
        let mut collection = Collection::new();

        let query = SearchQuery::wildcard(options.window, options.language, limit);
        self.drain(
            query,
            FailurePolicy::RetryAfter(options.retry_delay),
            &mut collection,
        )
        .await;
        tracing::info!("Wildcard search finished: {} posts", collection.len());

        collection.into_posts()
    }

    /// 1 本のクエリをカーソルが尽きるまでページ送りし、追加件数を返す
    async fn drain(
        &self,
        first: SearchQuery,
        policy: FailurePolicy,
        collection: &mut Collection,
    ) -> usize {
        let before = collection.len();
        let mut query = first;
        let mut page_no = 1usize;

        loop {
            match self.fetcher.search_posts(&query).await {
                Ok(page) => {
                    let fetched = page.posts.len();
                    let added = collection.absorb(page.posts);
                    tracing::debug!(
                        "'{}' page {}: {} fetched, {} new",
                        query.text,
                        page_no,
                        fetched,
                        added
                    );

                    // 空文字のカーソルも終端扱い
                    match page.cursor.filter(|c| !c.is_empty()) {
                        Some(next) => {
                            query = query.with_cursor(Some(next));
                            page_no += 1;
                        }
                        None => break,
                    }
                }
                Err(e) => match policy.on_failure() {
                    Recovery::GiveUp => {
                        tracing::error!(
                            "Error during API request for query '{}': {:#}",
                            query.text,
                            e
                        );
                        break;
                    }
                    Recovery::Retry(delay) => {
                        tracing::warn!(
                            "Error during API request for query '{}' (page {}): {:#}. Retrying in {:?}",
                            query.text,
                            page_no,
                            e,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                    }
                },
            }
        }

        collection.len() - before
    }
}

/// 0 は既定値に、上限を超える値は上限に丸める。丸めたときは警告を出す
fn safe_page_size(page_size: u32) -> u32 {
    let limit = if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size.min(MAX_PAGE_SIZE)
    };

    if limit != page_size {
        tracing::warn!(
            "Page size {} is out of range (1..={}), using {}",
            page_size,
            MAX_PAGE_SIZE,
            limit
        );
    }
    limit
}
