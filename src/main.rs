use bluesky_collector::cli::Cli;
use clap::Parser;
use dotenv::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // .env は引数の env フォールバックより先に読む
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let summary = bluesky_collector::run(cli).await?;

    tracing::info!(
        "Saved {} posts to {}",
        summary.posts,
        summary.output.display()
    );

    Ok(())
}
