use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 全件検索で使うワイルドカードクエリ
pub const WILDCARD_QUERY: &str = "*";

/// searchPosts が受け付ける 1 ページあたりの最大件数
pub const MAX_PAGE_SIZE: u32 = 100;

/// 検索 API の `since` / `until` に渡す形式 (秒精度 + `Z`)
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// 収集した 1 投稿分のレコード
///
/// 検索レスポンスの 1 要素からのみ生成され、以後は変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    text: String,
    created_at: String,
    author_handle: String,
    author_display_name: Option<String>,
    uri: String,
    tags: Option<Vec<String>>,
    like_count: u64,
    repost_count: u64,
    reply_count: u64,
    quote_count: u64,
}

/// `Post` を組み立てるための材料。フィールドの欠損は呼び出し側で既定値に寄せておく。
#[derive(Debug, Clone, Default)]
pub struct PostFields {
    pub text: String,
    pub created_at: String,
    pub author_handle: String,
    pub author_display_name: Option<String>,
    pub uri: String,
    pub tags: Option<Vec<String>>,
    pub like_count: u64,
    pub repost_count: u64,
    pub reply_count: u64,
    pub quote_count: u64,
}

impl Post {
    pub fn new(fields: PostFields) -> Self {
        Self {
            text: fields.text,
            created_at: fields.created_at,
            author_handle: fields.author_handle,
            author_display_name: fields.author_display_name,
            uri: fields.uri,
            tags: fields.tags,
            like_count: fields.like_count,
            repost_count: fields.repost_count,
            reply_count: fields.reply_count,
            quote_count: fields.quote_count,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// ソースが返した ISO-8601 文字列そのまま
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn author_handle(&self) -> &str {
        &self.author_handle
    }

    pub fn author_display_name(&self) -> Option<&str> {
        self.author_display_name.as_deref()
    }

    /// 重複排除のキー
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn tags(&self) -> Option<&[String]> {
        self.tags.as_deref()
    }

    pub fn like_count(&self) -> u64 {
        self.like_count
    }

    pub fn repost_count(&self) -> u64 {
        self.repost_count
    }

    pub fn reply_count(&self) -> u64 {
        self.reply_count
    }

    pub fn quote_count(&self) -> u64 {
        self.quote_count
    }
}

/// 検索対象期間。どちらの端も省略できる。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }
}

/// searchPosts への 1 回分のリクエスト内容
///
/// ページ送りのたびにカーソルだけを差し替えた新しい値を作る。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub lang: Option<String>,
    pub cursor: Option<String>,
    pub limit: u32,
}

impl SearchQuery {
    /// キーワード検索用。キーワードは小文字化する。
    pub fn keyword(keyword: &str, window: TimeWindow, limit: u32) -> Self {
        Self {
            text: keyword.to_lowercase(),
            since: window.start,
            until: window.end,
            lang: None,
            cursor: None,
            limit,
        }
    }

    /// 全件検索用 (`*` + 言語指定)
    pub fn wildcard(window: TimeWindow, lang: Option<String>, limit: u32) -> Self {
        Self {
            text: WILDCARD_QUERY.to_string(),
            since: window.start,
            until: window.end,
            lang,
            cursor: None,
            limit,
        }
    }

    /// 同じ条件で次ページを指すクエリを返す
    pub fn with_cursor(&self, cursor: Option<String>) -> Self {
        Self {
            cursor,
            ..self.clone()
        }
    }

    /// HTTP クエリパラメータへ変換する。値のないものは含めない。
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", self.text.clone()), ("limit", self.limit.to_string())];

        if let Some(since) = self.since {
            params.push(("since", format_timestamp(&since)));
        }
        if let Some(until) = self.until {
            params.push(("until", format_timestamp(&until)));
        }
        if let Some(lang) = &self.lang {
            params.push(("lang", lang.clone()));
        }
        if let Some(cursor) = &self.cursor {
            params.push(("cursor", cursor.clone()));
        }

        params
    }
}

pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}
