use std::borrow::Cow;

use chrono::NaiveDate;
use unicode_normalization::UnicodeNormalization;

use super::{
    facets::{RangeFacet, ValueFacet},
    range::RangeValue,
};
use crate::{Candidate, DevSkillCategory, Listing, RequiredCondition, date::age_from_birth_date};

/// 絞り込みパイプラインが扱うレコード（人材・求人）の共通インターフェース
pub trait FacetedRecord {
    fn record_id(&self) -> i64;

    /// 所有テナント（エージェント）ID
    fn agent_id(&self) -> i64;

    /// ファセットの値。単一値ファセットは 0〜1 件、ネストしたコレクションは複数件。
    fn facet_values(&self, facet: ValueFacet) -> Vec<Cow<'_, str>>;

    /// 数値ファセットの値。年齢は `today` を基準に都度計算する。
    fn facet_range(&self, facet: RangeFacet, today: NaiveDate) -> RangeValue;

    /// 同一人物判定用の指紋。持たないレコード種別は None。
    fn fingerprint(&self) -> Option<String> {
        None
    }

    /// 他テナントに見せる前に連絡先などの機微情報を消す
    fn redact(&mut self) {}
}

fn single(value: &Option<String>) -> Vec<Cow<'_, str>> {
    value.as_deref().map(Cow::Borrowed).into_iter().collect()
}

fn many(values: &[String]) -> Vec<Cow<'_, str>> {
    values.iter().map(|v| Cow::Borrowed(v.as_str())).collect()
}

fn staff(staff_id: Option<i64>) -> Vec<Cow<'static, str>> {
    staff_id
        .map(|id| Cow::Owned(id.to_string()))
        .into_iter()
        .collect()
}

fn normalize_reading(raw: &str) -> String {
    raw.nfkc().filter(|c| !c.is_whitespace()).collect()
}

impl FacetedRecord for Candidate {
    fn record_id(&self) -> i64 {
        self.id
    }

    fn agent_id(&self) -> i64 {
        self.agent_id
    }

    fn facet_values(&self, facet: ValueFacet) -> Vec<Cow<'_, str>> {
        match facet {
            ValueFacet::StaffId => staff(self.staff_id),
            ValueFacet::Phase => single(&self.phase),
            ValueFacet::Gender => single(&self.gender),
            ValueFacet::DesiredIndustries => many(&self.desired_industries),
            ValueFacet::DesiredOccupations => many(&self.desired_occupations),
            ValueFacet::WorkLocations => many(&self.desired_work_locations),
            ValueFacet::FinalEducation => single(&self.final_education),
            ValueFacet::StudyCategory => single(&self.study_category),
            ValueFacet::SchoolLevel => single(&self.school_level),
            ValueFacet::Nationality => single(&self.nationality),
            ValueFacet::JobChangeCount => single(&self.job_change_count),
            ValueFacet::ShortResignation => single(&self.short_resignation),
            ValueFacet::Transfer => single(&self.transfer),
            ValueFacet::HolidayType => single(&self.holiday_type),
            ValueFacet::CompanyScale => many(&self.desired_company_scales),
            ValueFacet::ExperienceIndustries => many(&self.experience_industries),
            ValueFacet::ExperienceOccupations => many(&self.experience_occupations),
            ValueFacet::ManagementExperience => single(&self.management_experience),
            ValueFacet::Qualifications => many(&self.qualifications),
            ValueFacet::Languages => self
                .languages
                .iter()
                .map(|l| Cow::Borrowed(l.language.as_str()))
                .collect(),
            ValueFacet::ExcelSkill => single(&self.excel_skill),
            ValueFacet::WordSkill => single(&self.word_skill),
            ValueFacet::PowerpointSkill => single(&self.powerpoint_skill),
            ValueFacet::PcTools => many(&self.pc_tools),
            ValueFacet::DevLanguages => dev_skill_names(&self.dev_skills, DevSkillCategory::Language),
            ValueFacet::DevOs => dev_skill_names(&self.dev_skills, DevSkillCategory::Os),
            ValueFacet::Appearance => single(&self.appearance),
            ValueFacet::Communication => single(&self.communication),
            ValueFacet::Thinking => single(&self.thinking),
        }
    }

    fn facet_range(&self, facet: RangeFacet, today: NaiveDate) -> RangeValue {
        match facet {
            RangeFacet::Age => {
                RangeValue::point_or_absent(age_from_birth_date(self.birth_date.as_deref(), today))
            }
            RangeFacet::Income => RangeValue::point_or_absent(self.desired_income),
            RangeFacet::SocialExperience => {
                RangeValue::point_or_absent(self.social_experience_months)
            }
        }
    }

    /// "セイ" + "メイ" + "_" + 電話番号（NFKC 正規化・空白除去）
    fn fingerprint(&self) -> Option<String> {
        let phone = normalize_reading(self.phone_number.as_deref()?);
        let reading = format!(
            "{}{}",
            normalize_reading(self.last_name_kana.as_deref().unwrap_or_default()),
            normalize_reading(self.first_name_kana.as_deref().unwrap_or_default())
        );

        if phone.is_empty() || reading.is_empty() {
            return None;
        }

        Some(format!("{reading}_{phone}"))
    }

    fn redact(&mut self) {
        self.last_name = None;
        self.first_name = None;
        self.phone_number = None;
        self.email = None;
        self.address = None;
    }
}

fn dev_skill_names(skills: &[crate::DevSkill], category: DevSkillCategory) -> Vec<Cow<'_, str>> {
    skills
        .iter()
        .filter(|skill| skill.category == category)
        .map(|skill| Cow::Borrowed(skill.name.as_str()))
        .collect()
}

impl Listing {
    fn condition_values<'a, F>(&'a self, pick: F) -> Vec<Cow<'a, str>>
    where
        F: Fn(&'a RequiredCondition) -> Vec<Cow<'a, str>>,
    {
        self.required_conditions.iter().flat_map(pick).collect()
    }

    /// 必須条件グループのうち、最も長い社会人経験の要求（月数）
    pub fn required_social_experience_months(&self) -> Option<i64> {
        self.required_conditions
            .iter()
            .filter_map(|c| c.social_experience_months)
            .max()
    }
}

impl FacetedRecord for Listing {
    fn record_id(&self) -> i64 {
        self.id
    }

    fn agent_id(&self) -> i64 {
        self.agent_id
    }

    fn facet_values(&self, facet: ValueFacet) -> Vec<Cow<'_, str>> {
        match facet {
            ValueFacet::StaffId => staff(self.staff_id),
            ValueFacet::Phase => single(&self.phase),
            ValueFacet::Gender => single(&self.gender),
            ValueFacet::DesiredIndustries => many(&self.industries),
            ValueFacet::DesiredOccupations => many(&self.occupations),
            ValueFacet::WorkLocations => many(&self.work_locations),
            ValueFacet::FinalEducation => single(&self.final_education),
            ValueFacet::StudyCategory => single(&self.study_category),
            ValueFacet::SchoolLevel => single(&self.school_level),
            ValueFacet::Nationality => single(&self.nationality),
            ValueFacet::JobChangeCount => single(&self.job_change_count),
            ValueFacet::ShortResignation => single(&self.short_resignation),
            ValueFacet::Transfer => single(&self.transfer),
            ValueFacet::HolidayType => single(&self.holiday_type),
            ValueFacet::CompanyScale => single(&self.company_scale),
            ValueFacet::ExperienceIndustries => {
                self.condition_values(|c| many(&c.experience_industries))
            }
            ValueFacet::ExperienceOccupations => {
                self.condition_values(|c| many(&c.experience_occupations))
            }
            ValueFacet::ManagementExperience => {
                self.condition_values(|c| single(&c.management_experience))
            }
            ValueFacet::Qualifications => self.condition_values(|c| many(&c.qualifications)),
            ValueFacet::Languages => self.condition_values(|c| {
                c.languages
                    .iter()
                    .map(|l| Cow::Borrowed(l.language.as_str()))
                    .collect()
            }),
            ValueFacet::ExcelSkill => single(&self.excel_skill),
            ValueFacet::WordSkill => single(&self.word_skill),
            ValueFacet::PowerpointSkill => single(&self.powerpoint_skill),
            ValueFacet::PcTools => self.condition_values(|c| many(&c.pc_tools)),
            ValueFacet::DevLanguages => {
                self.condition_values(|c| dev_skill_names(&c.dev_skills, DevSkillCategory::Language))
            }
            ValueFacet::DevOs => {
                self.condition_values(|c| dev_skill_names(&c.dev_skills, DevSkillCategory::Os))
            }
            ValueFacet::Appearance => single(&self.appearance),
            ValueFacet::Communication => single(&self.communication),
            ValueFacet::Thinking => single(&self.thinking),
        }
    }

    fn facet_range(&self, facet: RangeFacet, _today: NaiveDate) -> RangeValue {
        match facet {
            // 年齢制限なしは不問
            RangeFacet::Age => {
                RangeValue::span_or(self.age_lower, self.age_upper, RangeValue::Unquestioned)
            }
            // 想定年収が未設定の求人は年収条件に合致しない
            RangeFacet::Income => {
                RangeValue::span_or(self.income_lower, self.income_upper, RangeValue::Absent)
            }
            RangeFacet::SocialExperience => self
                .required_social_experience_months()
                .map_or(RangeValue::Unquestioned, RangeValue::Point),
        }
    }
}
