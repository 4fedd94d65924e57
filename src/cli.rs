use bsky_core::{TimeWindow, MAX_PAGE_SIZE};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use crate::config::{PASSWORD_ENV, SERVICE_URL_ENV, USERNAME_ENV};
use clap::{Args, Parser, Subcommand};
use collector::{DEFAULT_LANGUAGE, DEFAULT_PAGE_SIZE, DEFAULT_SERVICE_URL};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "bluesky-collector")]
#[command(about = "Collect Bluesky posts by keyword or wildcard search and save them as Parquet")]
pub struct Cli {
    /// Bluesky handle or email used for createSession
    #[arg(long, env = USERNAME_ENV, global = true, hide_env_values = true)]
    pub username: Option<String>,

    /// App password
    #[arg(long, env = PASSWORD_ENV, global = true, hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long, env = SERVICE_URL_ENV, global = true, default_value = DEFAULT_SERVICE_URL)]
    pub service_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct WindowArgs {
    /// Lower bound (RFC 3339, `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD`, UTC)
    #[arg(long, value_parser = parse_timestamp)]
    pub since: Option<DateTime<Utc>>,

    /// Upper bound, same formats as --since
    #[arg(long, value_parser = parse_timestamp)]
    pub until: Option<DateTime<Utc>>,
}

impl WindowArgs {
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.since, self.until)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search each keyword in turn; a failing keyword is skipped
    Keywords {
        #[arg(required = true)]
        keywords: Vec<String>,

        #[command(flatten)]
        window: WindowArgs,

        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = page_size)]
        limit: u32,

        #[arg(short, long)]
        output: PathBuf,
    },
    /// Search everything (`*`), retrying failed pages until the results run out
    All {
        #[command(flatten)]
        window: WindowArgs,

        /// Language filter; pass an empty string to disable
        #[arg(long, default_value = DEFAULT_LANGUAGE)]
        lang: String,

        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = page_size)]
        limit: u32,

        /// Seconds to wait before retrying a failed page
        #[arg(long, default_value_t = 5)]
        retry_delay: u64,

        #[arg(short, long)]
        output: PathBuf,
    },
}

impl Command {
    pub fn output(&self) -> &Path {
        match self {
            Command::Keywords { output, .. } | Command::All { output, .. } => output,
        }
    }
}

fn page_size(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|e| format!("{}", e))?;
    if n == 0 || n > MAX_PAGE_SIZE {
        return Err(format!("must be between 1 and {}", MAX_PAGE_SIZE));
    }
    Ok(n)
}

pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    if let Some(naive) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    Err(format!("Invalid timestamp: '{}'", s))
}
