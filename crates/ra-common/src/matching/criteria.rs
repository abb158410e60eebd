use std::collections::BTreeMap;

use unicode_normalization::UnicodeNormalization;

use super::facets::{RangeFacet, Semantics, ValueFacet};

/// ファセットごとの制約。空リストは `Unconstrained` に畳み込まれる。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FacetConstraint {
    #[default]
    Unconstrained,
    RequireAny(Vec<String>),
    RequireAll(Vec<String>),
}

impl FacetConstraint {
    /// 要求値を正規化し、ファセットの結合方法に応じた制約を作る
    pub fn for_facet<I, S>(facet: ValueFacet, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for value in values {
            if let Some(v) = facet.normalize(value.as_ref()) {
                if !normalized.contains(&v) {
                    normalized.push(v);
                }
            }
        }

        if normalized.is_empty() {
            return FacetConstraint::Unconstrained;
        }

        match facet.semantics() {
            Semantics::Any => FacetConstraint::RequireAny(normalized),
            Semantics::All => FacetConstraint::RequireAll(normalized),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        matches!(self, FacetConstraint::Unconstrained)
    }

    pub fn values(&self) -> &[String] {
        match self {
            FacetConstraint::Unconstrained => &[],
            FacetConstraint::RequireAny(values) | FacetConstraint::RequireAll(values) => values,
        }
    }
}

/// 数値ファセットの下限・上限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub lower: Option<i64>,
    pub upper: Option<i64>,
}

impl Bounds {
    /// 文字列の境界値を解釈する。整数として読めない値は未指定と同じ扱い。
    pub fn parse(lower: Option<&str>, upper: Option<&str>) -> Self {
        Self {
            lower: lower.and_then(parse_bound),
            upper: upper.and_then(parse_bound),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.lower.is_none() && self.upper.is_none()
    }
}

/// 境界値の文字列を整数に変換する（全角数字・桁区切りカンマ可）
pub fn parse_bound(raw: &str) -> Option<i64> {
    let normalized: String = raw.nfkc().filter(|c| *c != ',').collect();
    normalized.trim().parse::<i64>().ok()
}

/// 検索条件。ファセットごとに制約を持ち、未設定のファセットは制約なし。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    values: BTreeMap<ValueFacet, FacetConstraint>,
    ranges: BTreeMap<RangeFacet, Bounds>,
}

static UNCONSTRAINED: FacetConstraint = FacetConstraint::Unconstrained;

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, S>(mut self, facet: ValueFacet, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_values(facet, values);
        self
    }

    pub fn with_bounds(mut self, facet: RangeFacet, lower: Option<&str>, upper: Option<&str>) -> Self {
        self.set_bounds(facet, Bounds::parse(lower, upper));
        self
    }

    pub fn set_values<I, S>(&mut self, facet: ValueFacet, values: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match FacetConstraint::for_facet(facet, values) {
            FacetConstraint::Unconstrained => {
                self.values.remove(&facet);
            }
            constraint => {
                self.values.insert(facet, constraint);
            }
        }
    }

    pub fn set_bounds(&mut self, facet: RangeFacet, bounds: Bounds) {
        if bounds.is_unbounded() {
            self.ranges.remove(&facet);
        } else {
            self.ranges.insert(facet, bounds);
        }
    }

    pub fn constraint(&self, facet: ValueFacet) -> &FacetConstraint {
        self.values.get(&facet).unwrap_or(&UNCONSTRAINED)
    }

    pub fn bounds(&self, facet: RangeFacet) -> Bounds {
        self.ranges.get(&facet).copied().unwrap_or_default()
    }

    /// どのファセットにも制約がない
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.ranges.is_empty()
    }

    /// 制約が設定されているファセット名（ログ用）
    pub fn active_facets(&self) -> Vec<&str> {
        self.values
            .keys()
            .map(|facet| facet.as_ref())
            .chain(self.ranges.keys().map(|facet| facet.as_ref()))
            .collect()
    }
}
