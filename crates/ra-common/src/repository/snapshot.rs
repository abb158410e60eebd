use std::{
    collections::{BTreeSet, HashSet},
    path::Path,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{RecordKind, RecordRepository, RepositoryError};
use crate::{Candidate, Listing};

/// レコード単位の非表示設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityException {
    pub kind: RecordKind,
    pub record_id: i64,
    /// このエージェントからは見えない
    pub agent_id: i64,
}

/// エージェント間の提携（双方向）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alliance {
    pub agent_id: i64,
    pub allied_agent_id: i64,
}

/// JSON スナップショットの中身
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub candidates: Vec<Candidate>,
    pub listings: Vec<Listing>,
    pub visibility_exceptions: Vec<VisibilityException>,
    pub alliances: Vec<Alliance>,
}

/// メモリ上のスナップショットを返すリポジトリ
#[derive(Debug, Clone, Default)]
pub struct SnapshotRepository {
    snapshot: Snapshot,
}

impl SnapshotRepository {
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn from_path(path: &Path) -> Result<Self, RepositoryError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let snapshot: Snapshot = serde_json::from_str(&raw)?;
        info!(
            candidates = snapshot.candidates.len(),
            listings = snapshot.listings.len(),
            "loaded record snapshot"
        );
        Ok(Self { snapshot })
    }

    fn allies_of(&self, agent_id: i64) -> BTreeSet<i64> {
        self.snapshot
            .alliances
            .iter()
            .filter_map(|a| {
                if a.agent_id == agent_id {
                    Some(a.allied_agent_id)
                } else if a.allied_agent_id == agent_id {
                    Some(a.agent_id)
                } else {
                    None
                }
            })
            .filter(|ally| *ally != agent_id)
            .collect()
    }

    fn visible_owner(&self, agent_id: i64) -> impl Fn(i64) -> bool {
        let allies = self.allies_of(agent_id);
        move |owner| owner == agent_id || allies.contains(&owner)
    }
}

#[async_trait]
impl RecordRepository for SnapshotRepository {
    #[instrument(skip(self))]
    async fn fetch_candidates(&self, agent_id: i64) -> Result<Vec<Candidate>, RepositoryError> {
        let visible = self.visible_owner(agent_id);
        Ok(self
            .snapshot
            .candidates
            .iter()
            .filter(|c| visible(c.agent_id))
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn fetch_listings(&self, agent_id: i64) -> Result<Vec<Listing>, RepositoryError> {
        let visible = self.visible_owner(agent_id);
        Ok(self
            .snapshot
            .listings
            .iter()
            .filter(|l| visible(l.agent_id))
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn hidden_record_ids(
        &self,
        kind: RecordKind,
        agent_id: i64,
    ) -> Result<HashSet<i64>, RepositoryError> {
        Ok(self
            .snapshot
            .visibility_exceptions
            .iter()
            .filter(|e| e.kind == kind && e.agent_id == agent_id)
            .map(|e| e.record_id)
            .collect())
    }

    #[instrument(skip(self))]
    async fn allied_agent_ids(&self, agent_id: i64) -> Result<BTreeSet<i64>, RepositoryError> {
        Ok(self.allies_of(agent_id))
    }
}
