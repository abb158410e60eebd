use std::{
    collections::{BTreeSet, HashSet},
    sync::Arc,
};

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

use crate::{
    Candidate, Listing,
    config::{ConfigError, SearchConfig},
    date::today_jst,
    matching::{
        EquivalenceTable, FacetedRecord, FilterPipeline, SearchCriteria, TenantGate, ViewerContext,
        apply_visibility, max_page, page_slice,
    },
    repository::{RecordKind, RecordRepository, RepositoryError},
};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 絞り込み後の ID を所有テナント別に分けたもの
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TenantPartition {
    pub all: Vec<i64>,
    pub own: Vec<i64>,
    pub allied: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome<R> {
    /// 要求ページのレコード（他テナント分は連絡先を消してある）
    pub records: Vec<R>,
    /// 絞り込み後の全 ID（順序は入力順）
    pub all_ids: Vec<i64>,
    pub total: usize,
    pub page: usize,
    pub max_page: usize,
    pub duplicate_ids: BTreeSet<i64>,
    pub partition: TenantPartition,
}

/// 可視性 → ファセット絞り込み → ページング → 他テナント情報の秘匿 を行う
#[derive(Debug, Clone)]
pub struct SearchEngine {
    table: Arc<EquivalenceTable>,
    gate: TenantGate,
}

impl SearchEngine {
    pub fn new(table: Arc<EquivalenceTable>, gate: TenantGate) -> Self {
        Self { table, gate }
    }

    /// 設定から資格同等表を読み込んでエンジンを作る
    pub fn from_config(config: &SearchConfig) -> Result<Self, ConfigError> {
        let table = EquivalenceTable::load(config.qualification_table_path.as_deref())?;
        Ok(Self::new(table, TenantGate::from_config(config)))
    }

    pub fn table(&self) -> &Arc<EquivalenceTable> {
        &self.table
    }

    pub fn search<R>(
        &self,
        records: &[R],
        criteria: &SearchCriteria,
        viewer: &ViewerContext,
        page: usize,
        today: NaiveDate,
    ) -> SearchOutcome<R>
    where
        R: FacetedRecord + Clone,
    {
        let fetched = records.len();
        let visible = apply_visibility(records, viewer, &self.gate);
        let after_visibility = visible.records.len();

        let filtered = FilterPipeline::new(Arc::clone(&self.table), today).run(visible.records, criteria);

        let partition = partition_by_tenant(&filtered, viewer);
        let page = page.max(1);
        let page_records: Vec<R> = page_slice(&filtered, page)
            .iter()
            .map(|record| {
                let mut record = (*record).clone();
                if !viewer.owns(&record) {
                    record.redact();
                }
                record
            })
            .collect();

        let total = filtered.len();
        let max_page = max_page(total);
        let filtered_ids: HashSet<i64> = partition.all.iter().copied().collect();
        let duplicate_ids: BTreeSet<i64> = visible
            .duplicate_ids
            .into_iter()
            .filter(|id| filtered_ids.contains(id))
            .collect();

        info!(
            agent_id = viewer.agent_id,
            fetched,
            after_visibility,
            total,
            page,
            max_page,
            duplicates = duplicate_ids.len(),
            facets = ?criteria.active_facets(),
            "search completed"
        );

        SearchOutcome {
            records: page_records,
            all_ids: partition.all.clone(),
            total,
            page,
            max_page,
            duplicate_ids,
            partition,
        }
    }
}

fn partition_by_tenant<R: FacetedRecord>(records: &[&R], viewer: &ViewerContext) -> TenantPartition {
    let mut partition = TenantPartition::default();
    for record in records {
        let id = record.record_id();
        partition.all.push(id);
        if viewer.owns(*record) {
            partition.own.push(id);
        } else if viewer.allied_agent_ids.contains(&record.agent_id()) {
            partition.allied.push(id);
        }
    }
    partition
}

/// リポジトリからレコードを取得して検索する
#[derive(Clone)]
pub struct SearchService {
    repo: Arc<dyn RecordRepository>,
    engine: SearchEngine,
}

impl SearchService {
    pub fn new(repo: Arc<dyn RecordRepository>, engine: SearchEngine) -> Self {
        Self { repo, engine }
    }

    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    async fn viewer(&self, kind: RecordKind, agent_id: i64) -> Result<ViewerContext, RepositoryError> {
        let (hidden_record_ids, allied_agent_ids) = tokio::try_join!(
            self.repo.hidden_record_ids(kind, agent_id),
            self.repo.allied_agent_ids(agent_id),
        )?;

        Ok(ViewerContext {
            agent_id,
            hidden_record_ids,
            allied_agent_ids,
        })
    }

    #[instrument(skip(self, criteria), fields(kind = RecordKind::Candidate.as_ref()))]
    pub async fn search_candidates(
        &self,
        agent_id: i64,
        criteria: &SearchCriteria,
        page: usize,
    ) -> Result<SearchOutcome<Candidate>, SearchError> {
        let (records, viewer) = tokio::try_join!(
            self.repo.fetch_candidates(agent_id),
            self.viewer(RecordKind::Candidate, agent_id),
        )?;

        Ok(self.engine.search(&records, criteria, &viewer, page, today_jst()))
    }

    #[instrument(skip(self, criteria), fields(kind = RecordKind::Listing.as_ref()))]
    pub async fn search_listings(
        &self,
        agent_id: i64,
        criteria: &SearchCriteria,
        page: usize,
    ) -> Result<SearchOutcome<Listing>, SearchError> {
        let (records, viewer) = tokio::try_join!(
            self.repo.fetch_listings(agent_id),
            self.viewer(RecordKind::Listing, agent_id),
        )?;

        Ok(self.engine.search(&records, criteria, &viewer, page, today_jst()))
    }
}
