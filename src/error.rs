use archive::ArchiveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} must be set (environment variable or command-line flag)")]
    MissingCredential(&'static str),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Login failed: {0:#}")]
    Auth(anyhow::Error),

    #[error(transparent)]
    Archive(#[from] ArchiveError),
}
