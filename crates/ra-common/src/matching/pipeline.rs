use std::sync::Arc;

use chrono::NaiveDate;
use strum::IntoEnumIterator;
use tracing::debug;

use super::{
    criteria::{Bounds, SearchCriteria},
    equivalence::EquivalenceTable,
    facet_match::{match_all, match_any},
    facets::{FacetStage, RangeFacet, Semantics, StageKind, ValueFacet},
    range::{RangeValue, satisfies_lower, satisfies_upper},
    record::FacetedRecord,
};
use crate::corrections::location_satisfies;

/// 固定順のファセットステージを畳み込み、レコード集合を単調に絞り込む
///
/// 各ステージは制約なしなら素通しで、入力の部分集合だけを返す。
/// 入力順は保たれる。
pub struct FilterPipeline {
    table: Arc<EquivalenceTable>,
    today: NaiveDate,
}

impl FilterPipeline {
    pub fn new(table: Arc<EquivalenceTable>, today: NaiveDate) -> Self {
        Self { table, today }
    }

    pub fn run<'a, R: FacetedRecord>(
        &self,
        records: Vec<&'a R>,
        criteria: &SearchCriteria,
    ) -> Vec<&'a R> {
        if criteria.is_empty() {
            return records;
        }

        FacetStage::iter().fold(records, |current, stage| {
            if current.is_empty() {
                return current;
            }

            let before = current.len();
            let narrowed = self.apply_stage(stage, current, criteria);
            if narrowed.len() != before {
                debug!(
                    stage = stage.as_ref(),
                    before,
                    after = narrowed.len(),
                    "facet stage narrowed records"
                );
            }
            narrowed
        })
    }

    fn apply_stage<'a, R: FacetedRecord>(
        &self,
        stage: FacetStage,
        records: Vec<&'a R>,
        criteria: &SearchCriteria,
    ) -> Vec<&'a R> {
        match stage.kind() {
            StageKind::Values(facet) => {
                let constraint = criteria.constraint(facet);
                if constraint.is_unconstrained() {
                    return records;
                }
                let requested = constraint.values();
                records
                    .into_iter()
                    .filter(|record| self.accepts_values(*record, facet, requested))
                    .collect()
            }
            StageKind::Lower(facet) => {
                let Bounds { lower, .. } = criteria.bounds(facet);
                if lower.is_none() {
                    return records;
                }
                self.retain_range(records, facet, |value| satisfies_lower(lower, value))
            }
            StageKind::Upper(facet) => {
                let Bounds { upper, .. } = criteria.bounds(facet);
                if upper.is_none() {
                    return records;
                }
                self.retain_range(records, facet, |value| satisfies_upper(upper, value))
            }
            StageKind::Between(facet) => {
                let bounds = criteria.bounds(facet);
                if bounds.is_unbounded() {
                    return records;
                }
                self.retain_range(records, facet, |value| {
                    satisfies_lower(bounds.lower, value) && satisfies_upper(bounds.upper, value)
                })
            }
        }
    }

    fn retain_range<'a, R, F>(&self, records: Vec<&'a R>, facet: RangeFacet, keep: F) -> Vec<&'a R>
    where
        R: FacetedRecord,
        F: Fn(RangeValue) -> bool,
    {
        records
            .into_iter()
            .filter(|record| keep(record.facet_range(facet, self.today)))
            .collect()
    }

    /// 1 レコードが値ファセットの要求を満たすか
    pub fn accepts_values<R: FacetedRecord>(
        &self,
        record: &R,
        facet: ValueFacet,
        requested: &[String],
    ) -> bool {
        let held: Vec<String> = record
            .facet_values(facet)
            .iter()
            .filter_map(|value| facet.normalize(value))
            .collect();
        let wildcards = facet.record_wildcards();

        match facet.semantics() {
            Semantics::Any => match_any(requested, &held, wildcards),
            Semantics::All => {
                if facet == ValueFacet::Qualifications
                    && requested.iter().any(|req| self.table.is_wildcard(req))
                {
                    return true;
                }

                match_all(requested, &held, |held, required| match facet {
                    ValueFacet::Qualifications => self.table.satisfies(held, required),
                    ValueFacet::WorkLocations => location_satisfies(held, required),
                    _ => held == required || wildcards.contains(&held),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Candidate, LanguageSkill, Listing, RequiredCondition};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn pipeline() -> FilterPipeline {
        FilterPipeline::new(EquivalenceTable::builtin(), today())
    }

    fn candidate(id: i64) -> Candidate {
        Candidate {
            id,
            agent_id: 1,
            ..Candidate::default()
        }
    }

    fn ids<R: FacetedRecord>(records: &[&R]) -> Vec<i64> {
        records.iter().map(|r| r.record_id()).collect()
    }

    #[test]
    fn empty_criteria_returns_input_unchanged() {
        let records: Vec<Candidate> = (1..=3).map(candidate).collect();
        let refs: Vec<&Candidate> = records.iter().collect();

        let out = pipeline().run(refs, &SearchCriteria::new());
        assert_eq!(ids(&out), vec![1, 2, 3]);
    }

    #[test]
    fn or_facet_accepts_any_requested_value() {
        let mut a = candidate(1);
        a.final_education = Some("大学卒".into());
        let mut b = candidate(2);
        b.final_education = Some("高校卒".into());
        let mut c = candidate(3);
        c.final_education = Some("中学卒".into());
        let records = [a, b, c];

        let criteria = SearchCriteria::new()
            .with_values(ValueFacet::FinalEducation, ["大学卒", "高校卒"]);
        let out = pipeline().run(records.iter().collect(), &criteria);
        assert_eq!(ids(&out), vec![1, 2]);
    }

    #[test]
    fn and_facet_requires_every_requested_value() {
        let mut a = candidate(1);
        a.experience_industries = vec!["IT".into(), "金融".into()];
        let mut b = candidate(2);
        b.experience_industries = vec!["IT".into()];
        let records = [a, b];

        let criteria = SearchCriteria::new()
            .with_values(ValueFacet::ExperienceIndustries, ["IT", "金融"]);
        let out = pipeline().run(records.iter().collect(), &criteria);
        assert_eq!(ids(&out), vec![1]);
    }

    #[test]
    fn qualification_equivalence_substitutes_higher_grade() {
        let mut a = candidate(1);
        a.qualifications = vec!["日商簿記検定1級".into()];
        let mut b = candidate(2);
        b.qualifications = vec!["日商簿記検定3級".into()];
        let records = [a, b];

        let criteria = SearchCriteria::new()
            .with_values(ValueFacet::Qualifications, ["日商簿記検定2級"]);
        let out = pipeline().run(records.iter().collect(), &criteria);
        assert_eq!(ids(&out), vec![1]);
    }

    #[test]
    fn qualification_wildcard_accepts_everyone() {
        let records = [candidate(1), candidate(2)];
        let criteria = SearchCriteria::new().with_values(ValueFacet::Qualifications, ["資格不要"]);
        let out = pipeline().run(records.iter().collect(), &criteria);
        assert_eq!(ids(&out), vec![1, 2]);
    }

    #[test]
    fn age_bounds_are_inclusive_and_missing_birth_date_is_excluded() {
        let mut thirty = candidate(1);
        thirty.birth_date = Some("1994-06-15".into());
        let mut twenty_nine = candidate(2);
        twenty_nine.birth_date = Some("1994-06-16".into());
        let unknown = candidate(3);
        let records = [thirty, twenty_nine, unknown];

        let criteria = SearchCriteria::new().with_bounds(RangeFacet::Age, Some("30"), Some("35"));
        let out = pipeline().run(records.iter().collect(), &criteria);
        assert_eq!(ids(&out), vec![1]);
    }

    #[test]
    fn work_location_nationwide_and_area_match() {
        let mut nationwide = candidate(1);
        nationwide.desired_work_locations = vec!["全国".into()];
        let mut tokyo = candidate(2);
        tokyo.desired_work_locations = vec!["東京都".into()];
        let mut osaka = candidate(3);
        osaka.desired_work_locations = vec!["大阪府".into()];
        let records = [nationwide, tokyo, osaka];

        let criteria = SearchCriteria::new().with_values(ValueFacet::WorkLocations, ["関東"]);
        let out = pipeline().run(records.iter().collect(), &criteria);
        assert_eq!(ids(&out), vec![1, 2]);
    }

    #[test]
    fn stages_only_narrow() {
        let mut a = candidate(1);
        a.gender = Some("男性".into());
        a.desired_income = Some(500);
        let mut b = candidate(2);
        b.gender = Some("女性".into());
        b.desired_income = Some(400);
        let records = [a, b];
        let p = pipeline();

        let by_gender = SearchCriteria::new().with_values(ValueFacet::Gender, ["男性"]);
        let both = by_gender.clone().with_bounds(RangeFacet::Income, Some("450"), None);

        let first = p.run(records.iter().collect(), &by_gender);
        let second = p.run(records.iter().collect(), &both);
        assert!(second.len() <= first.len());
        assert_eq!(ids(&second), vec![1]);
    }

    #[test]
    fn listing_income_without_range_is_excluded_when_bounded() {
        let priced = Listing {
            id: 1,
            income_lower: Some(400),
            income_upper: Some(600),
            ..Listing::default()
        };
        let unpriced = Listing {
            id: 2,
            ..Listing::default()
        };
        let records = [priced, unpriced];

        let criteria = SearchCriteria::new().with_bounds(RangeFacet::Income, Some("550"), None);
        let out = pipeline().run(records.iter().collect(), &criteria);
        assert_eq!(ids(&out), vec![1]);
    }

    #[test]
    fn listing_languages_match_case_insensitively() {
        let listing = Listing {
            id: 1,
            required_conditions: vec![RequiredCondition {
                languages: vec![LanguageSkill {
                    language: "English".into(),
                    level: Some("ビジネス".into()),
                }],
                ..RequiredCondition::default()
            }],
            ..Listing::default()
        };
        let records = [listing];

        let criteria = SearchCriteria::new().with_values(ValueFacet::Languages, ["english"]);
        let out = pipeline().run(records.iter().collect(), &criteria);
        assert_eq!(ids(&out), vec![1]);
    }
}
