use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{0} is empty")]
    Blank(&'static str),
    #[error("store URL must start with http:// or https://, got '{0}'")]
    InvalidUrl(String),
    #[error("failed to load env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to remote store failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid API key header: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
    #[error("remote store returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode transactions: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("fetch ended before a result arrived")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
    #[error("failed to open log file {path}: {source}")]
    LogFile { path: PathBuf, source: io::Error },
    #[error("failed to start async runtime: {0}")]
    Runtime(io::Error),
}
