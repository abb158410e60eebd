//! 資格の同等表
//!
//! `保有 → {要求}` の隣接リスト。保有資格はリスト内のどの要求資格も満たす。
//! 向きがあり推移閉包は取らないので、認める組み合わせはすべてデータに列挙する。
//! 完全一致は常に満たすので保存しない。

use std::{
    collections::{HashMap, HashSet},
    path::Path,
    sync::Arc,
};

use once_cell::sync::Lazy;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

const BUILTIN_TABLE_JSON: &str = include_str!("../../data/qualification_equivalence.json");
const SUPPORTED_VERSION: u32 = 1;

static BUILTIN: Lazy<Arc<EquivalenceTable>> = Lazy::new(|| {
    Arc::new(
        EquivalenceTable::from_json_str(BUILTIN_TABLE_JSON)
            .expect("embedded qualification equivalence table must be valid"),
    )
});

#[derive(Debug, Error)]
pub enum EquivalenceLoadError {
    #[error("failed to read equivalence table: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse equivalence table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported equivalence table version: {0}")]
    UnsupportedVersion(u32),
    #[error("equivalence rule has an empty held code")]
    EmptyHeldCode,
}

#[derive(Debug, Deserialize)]
struct EquivalenceDocument {
    version: u32,
    #[serde(default)]
    wildcards: Vec<String>,
    rules: Vec<EquivalenceRule>,
}

#[derive(Debug, Deserialize)]
struct EquivalenceRule {
    held: String,
    satisfies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquivalenceTable {
    satisfies: HashMap<String, HashSet<String>>,
    wildcards: HashSet<String>,
}

impl EquivalenceTable {
    /// バイナリに埋め込んだ表
    pub fn builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    /// `path` があればそこから読み込み、なければ組み込みの表を返す
    pub fn load(path: Option<&Path>) -> Result<Arc<Self>, EquivalenceLoadError> {
        match path {
            Some(path) => {
                let table = Self::from_path(path)?;
                info!(
                    path = %path.display(),
                    pairs = table.pair_count(),
                    "loaded qualification equivalence table"
                );
                Ok(Arc::new(table))
            }
            None => Ok(Self::builtin()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, EquivalenceLoadError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, EquivalenceLoadError> {
        let document: EquivalenceDocument = serde_json::from_str(raw)?;
        if document.version != SUPPORTED_VERSION {
            return Err(EquivalenceLoadError::UnsupportedVersion(document.version));
        }

        let mut table = Self::default();
        for rule in document.rules {
            let held = rule.held.trim();
            if held.is_empty() {
                return Err(EquivalenceLoadError::EmptyHeldCode);
            }
            table.insert_rule(held, &rule.satisfies);
        }

        table.wildcards = document
            .wildcards
            .iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();

        Ok(table)
    }

    fn insert_rule(&mut self, held: &str, required: &[String]) {
        let entry = self.satisfies.entry(held.to_string()).or_default();
        for code in required.iter().map(|code| code.trim()) {
            if !code.is_empty() && code != held {
                entry.insert(code.to_string());
            }
        }
    }

    /// 保有資格 `held` が要求資格 `required` を満たすか
    pub fn satisfies(&self, held: &str, required: &str) -> bool {
        held == required
            || self
                .satisfies
                .get(held)
                .is_some_and(|codes| codes.contains(required))
    }

    /// "資格不要" のように、要求されても何も要求しない値か
    pub fn is_wildcard(&self, required: &str) -> bool {
        self.wildcards.contains(required)
    }

    /// 明示された (保有, 要求) の組の数
    pub fn pair_count(&self) -> usize {
        self.satisfies.values().map(HashSet::len).sum()
    }
}
