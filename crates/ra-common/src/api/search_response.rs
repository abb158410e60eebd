use serde::{Deserialize, Serialize};

use crate::{
    matching::FacetedRecord,
    search::{SearchOutcome, TenantPartition},
};

/// 一覧の 1 行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit<R> {
    #[serde(flatten)]
    pub record: R,
    /// 他テナントにも同一人物が登録されている
    pub duplicate: bool,
    /// 依頼エージェント自身のレコード
    pub own: bool,
}

/// GUI 向け検索結果レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse<R> {
    pub hits: Vec<SearchHit<R>>,
    pub total: usize,
    pub page: usize,
    pub max_page: usize,
    /// 全ページ分の ID（一括操作用）
    pub all_ids: Vec<i64>,
    pub own_ids: Vec<i64>,
    pub allied_ids: Vec<i64>,
}

impl<R: FacetedRecord> SearchResponse<R> {
    pub fn from_outcome(outcome: SearchOutcome<R>, agent_id: i64) -> Self {
        let SearchOutcome {
            records,
            total,
            page,
            max_page,
            duplicate_ids,
            partition: TenantPartition { all, own, allied },
            ..
        } = outcome;

        let hits = records
            .into_iter()
            .map(|record| SearchHit {
                duplicate: duplicate_ids.contains(&record.record_id()),
                own: record.agent_id() == agent_id,
                record,
            })
            .collect();

        Self {
            hits,
            total,
            page,
            max_page,
            all_ids: all,
            own_ids: own,
            allied_ids: allied,
        }
    }
}
