use crate::structs::{SearchPage, SessionResponse};
use anyhow::{Context, Result};
use bsky_core::SearchQuery;
use reqwest::{Client, StatusCode};
use tokio::sync::RwLock;

pub const DEFAULT_SERVICE_URL: &str = "https://bsky.social";

#[async_trait::async_trait]
pub trait PostFetcher {
    async fn search_posts(&self, query: &SearchQuery) -> Result<SearchPage>;
}

#[derive(Debug, Clone)]
struct SessionTokens {
    access_jwt: String,
    refresh_jwt: String,
}

impl From<SessionResponse> for SessionTokens {
    fn from(session: SessionResponse) -> Self {
        Self {
            access_jwt: session.access_jwt,
            refresh_jwt: session.refresh_jwt,
        }
    }
}

/// ログイン済みセッションで searchPosts を叩くクライアント
///
/// トークン切れの応答を受けたらセッションを更新してからエラーを返す。
/// 取り直すかどうかは呼び出し側の方針に任せる。
pub struct BlueskyFetcher {
    client: Client,
    base_url: String,
    identifier: String,
    password: String,
    did: String,
    tokens: RwLock<SessionTokens>,
}

impl BlueskyFetcher {
    /// createSession でアクセストークンを取得してからクライアントを作る
    pub async fn login(
        client: Client,
        base_url: &str,
        identifier: &str,
        password: &str,
    ) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let session = create_session(&client, &base_url, identifier, password).await?;

        Ok(Self {
            client,
            base_url,
            identifier: identifier.to_string(),
            password: password.to_string(),
            did: session.did.clone(),
            tokens: RwLock::new(SessionTokens::from(session)),
        })
    }

    pub fn did(&self) -> &str {
        &self.did
    }

    /// refreshSession を試し、だめなら createSession でログインし直す
    async fn renew_session(&self) -> Result<()> {
        let refresh_jwt = self.tokens.read().await.refresh_jwt.clone();

        let session = match refresh_session(&self.client, &self.base_url, &refresh_jwt).await {
            Ok(session) => {
                tracing::info!("Session refreshed (DID: {})", session.did);
                session
            }
            Err(e) => {
                tracing::warn!("refreshSession failed, logging in again: {:#}", e);
                create_session(&self.client, &self.base_url, &self.identifier, &self.password)
                    .await?
            }
        };

        *self.tokens.write().await = SessionTokens::from(session);
        Ok(())
    }
}

#[async_trait::async_trait]
impl PostFetcher for BlueskyFetcher {
    async fn search_posts(&self, query: &SearchQuery) -> Result<SearchPage> {
        let url = format!("{}/xrpc/app.bsky.feed.searchPosts", self.base_url);
        let access_jwt = self.tokens.read().await.access_jwt.clone();
        tracing::debug!("searchPosts q={} cursor={:?}", query.text, query.cursor);

        let res = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", access_jwt))
            .query(&query.to_params())
            .send()
            .await
            .context("Failed to send search request")?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();

            if is_session_expired(status, &text) {
                tracing::warn!("Token expired, attempting refresh... ({})", status);
                if let Err(e) = self.renew_session().await {
                    tracing::error!("Re-authentication failed: {:#}", e);
                }
            }

            anyhow::bail!("Search API failed: {} - {}", status, text);
        }

        let page: SearchPage = res
            .json()
            .await
            .context("Failed to parse search response")?;
        Ok(page)
    }
}

async fn create_session(
    client: &Client,
    base_url: &str,
    identifier: &str,
    password: &str,
) -> Result<SessionResponse> {
    let url = format!("{}/xrpc/com.atproto.server.createSession", base_url);
    let body = serde_json::json!({
        "identifier": identifier,
        "password": password,
    });

    let res = client
        .post(url)
        .json(&body)
        .send()
        .await
        .context("Failed to send auth request")?;

    if !res.status().is_success() {
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        anyhow::bail!("Auth failed: {} - {}", status, text);
    }

    res.json().await.context("Failed to parse auth response")
}

async fn refresh_session(
    client: &Client,
    base_url: &str,
    refresh_jwt: &str,
) -> Result<SessionResponse> {
    let url = format!("{}/xrpc/com.atproto.server.refreshSession", base_url);

    let res = client
        .post(url)
        .header("Authorization", format!("Bearer {}", refresh_jwt))
        .send()
        .await
        .context("Failed to send refresh request")?;

    if !res.status().is_success() {
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        anyhow::bail!("Refresh failed: {} - {}", status, text);
    }

    res.json().await.context("Failed to parse refresh response")
}

/// 401、または `ExpiredToken` / `InvalidToken` を含む応答をトークン切れとみなす
fn is_session_expired(status: StatusCode, body: &str) -> bool {
    status == StatusCode::UNAUTHORIZED
        || body.contains("ExpiredToken")
        || body.contains("InvalidToken")
}
