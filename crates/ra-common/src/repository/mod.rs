pub mod snapshot;

use std::collections::{BTreeSet, HashSet};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, IntoStaticStr};
use thiserror::Error;

use crate::{Candidate, Listing};

pub use snapshot::{Snapshot, SnapshotRepository};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecordKind {
    Candidate,
    Listing,
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("record source unavailable: {0}")]
    Unavailable(String),
}

/// 検索対象レコードの取得元
///
/// `fetch_*` は依頼エージェント自身と提携先エージェントのレコードを返す。
#[async_trait]
pub trait RecordRepository: Send + Sync {
    async fn fetch_candidates(&self, agent_id: i64) -> Result<Vec<Candidate>, RepositoryError>;

    async fn fetch_listings(&self, agent_id: i64) -> Result<Vec<Listing>, RepositoryError>;

    /// `agent_id` に対して非表示設定されたレコード ID
    async fn hidden_record_ids(
        &self,
        kind: RecordKind,
        agent_id: i64,
    ) -> Result<HashSet<i64>, RepositoryError>;

    async fn allied_agent_ids(&self, agent_id: i64) -> Result<BTreeSet<i64>, RepositoryError>;
}
