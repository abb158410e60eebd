use std::{path::PathBuf, str::FromStr};

use strum::AsRefStr;
use thiserror::Error;
use tracing::warn;

use crate::matching::EquivalenceLoadError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),
    #[error(transparent)]
    EquivalenceTable(#[from] EquivalenceLoadError),
}

/// 実行環境。本番でのみテストテナントの除外が有効になる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "staging" | "stg" => Ok(Environment::Staging),
            "development" | "dev" | "local" | "test" => Ok(Environment::Development),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

/// 検索エンジンの設定
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchConfig {
    pub environment: Environment,
    /// 本番で他テナントから隠すテスト用エージェント
    pub test_agent_ids: Vec<i64>,
    /// テスト用エージェントも閲覧できるシステムエージェント
    pub system_agent_ids: Vec<i64>,
    /// 資格同等表の差し替えファイル。未指定なら組み込みの表を使う
    pub qualification_table_path: Option<PathBuf>,
}

impl SearchConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のキー参照関数から設定を組み立てる（テストでは HashMap を渡す）
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("RA_ENV") {
            Some(raw) => raw.parse().unwrap_or_else(|err: ConfigError| {
                warn!(error = %err, "falling back to development environment");
                Environment::Development
            }),
            None => Environment::Development,
        };

        Self {
            environment,
            test_agent_ids: parse_agent_ids("RA_TEST_AGENT_IDS", lookup("RA_TEST_AGENT_IDS")),
            system_agent_ids: parse_agent_ids("RA_SYSTEM_AGENT_IDS", lookup("RA_SYSTEM_AGENT_IDS")),
            qualification_table_path: lookup("RA_QUALIFICATION_TABLE_PATH")
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
                .map(PathBuf::from),
        }
    }
}

fn parse_agent_ids(key: &str, raw: Option<String>) -> Vec<i64> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| match part.parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!(key, value = part, "ignoring unparseable agent id");
                None
            }
        })
        .collect()
}
