use bsky_core::{Post, PostFields};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct SessionResponse {
    #[serde(rename = "accessJwt")]
    pub access_jwt: String,
    #[serde(rename = "refreshJwt")]
    pub refresh_jwt: String,
    pub did: String,
}

/// app.bsky.feed.searchPosts のレスポンス 1 ページ分
#[derive(Deserialize, Debug, Clone, Default)]
pub struct SearchPage {
    pub posts: Vec<PostView>,
    pub cursor: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PostView {
    pub uri: String,
    pub author: Author,
    pub record: PostRecord,
    #[serde(rename = "likeCount", default)]
    pub like_count: u64,
    #[serde(rename = "repostCount", default)]
    pub repost_count: u64,
    #[serde(rename = "replyCount", default)]
    pub reply_count: u64,
    #[serde(rename = "quoteCount", default)]
    pub quote_count: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Author {
    pub handle: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PostRecord {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    pub tags: Option<Vec<String>>,
}

impl From<PostView> for Post {
    fn from(view: PostView) -> Self {
        Post::new(PostFields {
            text: view.record.text,
            created_at: view.record.created_at,
            author_handle: view.author.handle,
            author_display_name: view.author.display_name,
            uri: view.uri,
            tags: view.record.tags,
            like_count: view.like_count,
            repost_count: view.repost_count,
            reply_count: view.reply_count,
            quote_count: view.quote_count,
        })
    }
}
