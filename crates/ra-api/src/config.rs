use std::path::PathBuf;

use axum::http::HeaderValue;
use clap::Parser;

use crate::error::ApiError;

#[derive(Debug, Clone, Parser)]
#[command(name = "ra-api", about = "HTTP API for candidate and listing search")]
pub(crate) struct Cli {
    /// Listen port
    #[arg(long, env = "PORT", default_value_t = 3001)]
    port: u16,

    /// JSON snapshot with candidates, listings, visibility exceptions and alliances
    #[arg(long, env = "RA_SNAPSHOT_PATH")]
    snapshot_path: Option<PathBuf>,

    /// Browser origins allowed to call the API, comma separated
    #[arg(long, env = "RA_CORS_ORIGINS", default_value = "http://localhost:3000")]
    cors_origins: String,

    /// Prometheus exporter port (exporter is off when unset)
    #[arg(long, env = "RA_METRICS_PORT")]
    metrics_port: Option<u16>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub snapshot_path: Option<PathBuf>,
    pub cors_origins: Vec<HeaderValue>,
    pub metrics_port: Option<u16>,
}

impl AppConfig {
    pub(crate) fn from_cli(cli: Cli) -> Result<Self, ApiError> {
        Ok(Self {
            port: cli.port,
            snapshot_path: cli.snapshot_path,
            cors_origins: parse_origins(&cli.cors_origins)?,
            metrics_port: cli.metrics_port,
        })
    }

    pub fn for_tests() -> Self {
        Self {
            port: 3001,
            snapshot_path: None,
            cors_origins: vec![HeaderValue::from_static("http://localhost:3000")],
            metrics_port: None,
        }
    }
}

/// ワイルドカードは受け付けない。ヘッダ値にできない origin も設定エラー。
fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ApiError> {
    let mut origins = Vec::new();
    for origin in raw.split(',').map(str::trim).filter(|o| !o.is_empty()) {
        if origin == "*" {
            return Err(ApiError::Config(
                "RA_CORS_ORIGINS must list explicit origins".into(),
            ));
        }
        let value = HeaderValue::from_str(origin)
            .map_err(|_| ApiError::Config(format!("invalid CORS origin: {origin}")))?;
        origins.push(value);
    }
    Ok(origins)
}
