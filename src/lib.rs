pub mod cli;
pub mod config;
pub mod error;

use bsky_core::Post;
use cli::{Cli, Command};
use collector::{BlueskyFetcher, PostCollector, PostFetcher, WildcardOptions};
use config::{Credentials, USER_AGENT};
use error::AppError;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug)]
pub struct RunSummary {
    pub posts: usize,
    pub output: PathBuf,
}

/// サブコマンドに応じて収集だけを行う
pub async fn collect<F: PostFetcher>(collector: &PostCollector<F>, command: &Command) -> Vec<Post> {
    match command {
        Command::Keywords {
            keywords,
            window,
            limit,
            ..
        } => {
            collector
                .collect_by_keywords(keywords.as_slice(), window.window(), *limit)
                .await
        }
        Command::All {
            window,
            lang,
            limit,
            retry_delay,
            ..
        } => {
            let options = WildcardOptions {
                window: window.window(),
                language: Some(lang.clone()).filter(|l| !l.is_empty()),
                page_size: *limit,
                retry_delay: Duration::from_secs(*retry_delay),
            };
            collector.collect_all(options).await
        }
    }
}

/// ログイン → 収集 → Parquet 保存
pub async fn run(cli: Cli) -> Result<RunSummary, AppError> {
    let credentials = Credentials::new(cli.username, cli.password)?;

    let http_client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

    tracing::info!("Logging in to {} as {}...", cli.service_url, credentials.username);
    let fetcher = BlueskyFetcher::login(
        http_client,
        &cli.service_url,
        &credentials.username,
        &credentials.password,
    )
    .await
    .map_err(AppError::Auth)?;

    tracing::info!("Login successful. DID: {}", fetcher.did());

    let collector = PostCollector::new(fetcher);
    let posts = collect(&collector, &cli.command).await;

    let output = cli.command.output().to_path_buf();
    archive::save_to_parquet(&posts, &output)?;

    Ok(RunSummary {
        posts: posts.len(),
        output,
    })
}
