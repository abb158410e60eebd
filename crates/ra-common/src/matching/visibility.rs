use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::debug;

use super::record::FacetedRecord;
use crate::config::{Environment, SearchConfig};

/// 検索を実行するテナント側の文脈
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewerContext {
    pub agent_id: i64,
    /// このエージェントに対して非表示設定されたレコード ID
    pub hidden_record_ids: HashSet<i64>,
    /// 提携先エージェント
    pub allied_agent_ids: BTreeSet<i64>,
}

impl ViewerContext {
    pub fn new(agent_id: i64) -> Self {
        Self {
            agent_id,
            ..Self::default()
        }
    }

    pub fn owns<R: FacetedRecord>(&self, record: &R) -> bool {
        record.agent_id() == self.agent_id
    }
}

/// 本番環境でのテストテナント除外
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantGate {
    pub environment: Environment,
    pub test_agent_ids: Vec<i64>,
    pub system_agent_ids: Vec<i64>,
}

impl TenantGate {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            environment: config.environment,
            test_agent_ids: config.test_agent_ids.clone(),
            system_agent_ids: config.system_agent_ids.clone(),
        }
    }

    /// `viewer` から `owner` のレコードを隠すか
    pub fn hides(&self, viewer: i64, owner: i64) -> bool {
        self.environment == Environment::Production
            && self.test_agent_ids.contains(&owner)
            && !self.system_agent_ids.contains(&viewer)
    }
}

/// 可視性フィルタの結果
#[derive(Debug)]
pub struct VisibleSet<'a, R> {
    pub records: Vec<&'a R>,
    /// 複数テナントで重複登録されているレコード（表示用フラグ）
    pub duplicate_ids: BTreeSet<i64>,
}

pub fn exclude_hidden<'a, R: FacetedRecord>(
    records: Vec<&'a R>,
    hidden: &HashSet<i64>,
) -> Vec<&'a R> {
    if hidden.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| !hidden.contains(&record.record_id()))
        .collect()
}

pub fn exclude_test_tenants<'a, R: FacetedRecord>(
    records: Vec<&'a R>,
    viewer_agent_id: i64,
    gate: &TenantGate,
) -> Vec<&'a R> {
    if gate.environment != Environment::Production {
        return records;
    }
    records
        .into_iter()
        .filter(|record| !gate.hides(viewer_agent_id, record.agent_id()))
        .collect()
}

/// 指紋が同じレコードをまとめる
///
/// - 自テナントのレコードがあるグループでは、自テナント分だけを残す
/// - ないグループでは、テナントごとに先頭の 1 件を残し、2 件以上残れば全件に重複フラグを立てる
/// - 指紋を持たないレコードはそのまま通す
///
/// 入力順は保たれる。
pub fn collapse_duplicates<'a, R: FacetedRecord>(
    records: Vec<&'a R>,
    viewer_agent_id: i64,
) -> (Vec<&'a R>, BTreeSet<i64>) {
    let fingerprints: Vec<Option<String>> = records.iter().map(|r| r.fingerprint()).collect();

    let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, fingerprint) in fingerprints.iter().enumerate() {
        if let Some(fp) = fingerprint {
            groups.entry(fp.as_str()).or_default().push(index);
        }
    }

    let mut dropped: HashSet<usize> = HashSet::new();
    let mut duplicate_ids = BTreeSet::new();

    for members in groups.values() {
        if members.len() < 2 {
            continue;
        }

        let has_own = members
            .iter()
            .any(|&i| records[i].agent_id() == viewer_agent_id);

        if has_own {
            dropped.extend(
                members
                    .iter()
                    .copied()
                    .filter(|&i| records[i].agent_id() != viewer_agent_id),
            );
            continue;
        }

        let mut seen_agents = HashSet::new();
        let mut kept = Vec::new();
        for &i in members {
            if seen_agents.insert(records[i].agent_id()) {
                kept.push(i);
            } else {
                dropped.insert(i);
            }
        }

        if kept.len() >= 2 {
            duplicate_ids.extend(kept.iter().map(|&i| records[i].record_id()));
        }
    }

    if !dropped.is_empty() {
        debug!(dropped = dropped.len(), "collapsed duplicate records");
    }

    let collapsed = records
        .into_iter()
        .enumerate()
        .filter(|(index, _)| !dropped.contains(index))
        .map(|(_, record)| record)
        .collect();

    (collapsed, duplicate_ids)
}

/// 非表示設定 → テストテナント除外 → 重複集約 の順に適用する
///
/// 重複集約は閲覧者に見えるレコードだけを対象にする。
pub fn apply_visibility<'a, R: FacetedRecord>(
    records: &'a [R],
    viewer: &ViewerContext,
    gate: &TenantGate,
) -> VisibleSet<'a, R> {
    let visible = exclude_hidden(records.iter().collect(), &viewer.hidden_record_ids);
    let visible = exclude_test_tenants(visible, viewer.agent_id, gate);
    let (visible, duplicate_ids) = collapse_duplicates(visible, viewer.agent_id);

    VisibleSet {
        records: visible,
        duplicate_ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Candidate;

    fn tanaka(id: i64, agent_id: i64) -> Candidate {
        Candidate {
            id,
            agent_id,
            last_name_kana: Some("タナカ".into()),
            first_name_kana: Some("タロウ".into()),
            phone_number: Some("080-0000-0000".into()),
            ..Candidate::default()
        }
    }

    fn plain(id: i64, agent_id: i64) -> Candidate {
        Candidate {
            id,
            agent_id,
            ..Candidate::default()
        }
    }

    fn ids(records: &[&Candidate]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn hidden_records_are_removed() {
        let records = vec![plain(1, 10), plain(2, 10), plain(3, 20)];
        let viewer = ViewerContext {
            agent_id: 10,
            hidden_record_ids: HashSet::from([3]),
            ..ViewerContext::default()
        };

        let visible = apply_visibility(&records, &viewer, &TenantGate::default());
        assert_eq!(ids(&visible.records), vec![1, 2]);
    }

    #[test]
    fn duplicates_across_two_tenants_are_kept_and_flagged() {
        let records = vec![tanaka(1, 20), tanaka(2, 30), plain(3, 20)];
        let viewer = ViewerContext::new(10);

        let visible = apply_visibility(&records, &viewer, &TenantGate::default());
        assert_eq!(ids(&visible.records), vec![1, 2, 3]);
        assert_eq!(visible.duplicate_ids, BTreeSet::from([1, 2]));
    }

    #[test]
    fn duplicates_across_three_tenants_are_all_flagged() {
        let records = vec![tanaka(1, 20), tanaka(2, 30), tanaka(3, 40)];
        let visible = apply_visibility(&records, &ViewerContext::new(10), &TenantGate::default());

        assert_eq!(ids(&visible.records), vec![1, 2, 3]);
        assert_eq!(visible.duplicate_ids, BTreeSet::from([1, 2, 3]));
    }

    #[test]
    fn same_tenant_duplicates_keep_first_only() {
        let records = vec![tanaka(1, 20), tanaka(2, 20)];
        let visible = apply_visibility(&records, &ViewerContext::new(10), &TenantGate::default());

        assert_eq!(ids(&visible.records), vec![1]);
        assert!(visible.duplicate_ids.is_empty());
    }

    #[test]
    fn own_record_wins_over_other_tenants() {
        let records = vec![tanaka(1, 20), tanaka(2, 10), tanaka(3, 30)];
        let visible = apply_visibility(&records, &ViewerContext::new(10), &TenantGate::default());

        assert_eq!(ids(&visible.records), vec![2]);
        assert!(visible.duplicate_ids.is_empty());
    }

    #[test]
    fn test_tenants_hidden_only_in_production() {
        let records = vec![plain(1, 10), plain(2, 98), plain(3, 99)];
        let mut gate = TenantGate {
            environment: Environment::Development,
            test_agent_ids: vec![98, 99],
            system_agent_ids: vec![1],
        };

        let dev = apply_visibility(&records, &ViewerContext::new(10), &gate);
        assert_eq!(ids(&dev.records), vec![1, 2, 3]);

        gate.environment = Environment::Production;
        let prod = apply_visibility(&records, &ViewerContext::new(10), &gate);
        assert_eq!(ids(&prod.records), vec![1]);

        let system = apply_visibility(&records, &ViewerContext::new(1), &gate);
        assert_eq!(ids(&system.records), vec![1, 2, 3]);
    }

    #[test]
    fn gated_test_tenant_records_do_not_take_part_in_dedup() {
        let records = vec![tanaka(1, 20), tanaka(2, 99)];
        let gate = TenantGate {
            environment: Environment::Production,
            test_agent_ids: vec![98, 99],
            system_agent_ids: vec![1],
        };

        // 見えない相手との重複フラグは立てない
        let regular = apply_visibility(&records, &ViewerContext::new(10), &gate);
        assert_eq!(ids(&regular.records), vec![1]);
        assert!(regular.duplicate_ids.is_empty());

        // テストテナント自身の閲覧でも、他テナントのレコードは消えない
        let test_tenant = apply_visibility(&records, &ViewerContext::new(99), &gate);
        assert_eq!(ids(&test_tenant.records), vec![1]);
        assert!(test_tenant.duplicate_ids.is_empty());

        let system = apply_visibility(&records, &ViewerContext::new(1), &gate);
        assert_eq!(ids(&system.records), vec![1, 2]);
        assert_eq!(system.duplicate_ids, BTreeSet::from([1, 2]));
    }
}
