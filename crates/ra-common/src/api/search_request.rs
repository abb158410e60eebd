use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::matching::{Bounds, RangeFacet, SearchCriteria, ValueFacet};

/// HTTP API からの検索条件（画面のフォームと同じフラットな形）
///
/// リストが空の項目は条件なし。数値の境界は数値・文字列どちらでも受け付け、解釈できなければ条件なし。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub staff_ids: Vec<i64>,
    pub phases: Vec<String>,
    pub genders: Vec<String>,
    pub age_lower: Option<Value>,
    pub age_upper: Option<Value>,
    pub desired_industries: Vec<String>,
    pub desired_occupations: Vec<String>,
    pub work_locations: Vec<String>,
    pub final_educations: Vec<String>,
    pub study_categories: Vec<String>,
    pub school_levels: Vec<String>,
    pub nationalities: Vec<String>,
    pub job_change_counts: Vec<String>,
    pub short_resignations: Vec<String>,
    /// 年収（万円）
    pub income_lower: Option<Value>,
    pub income_upper: Option<Value>,
    pub transfers: Vec<String>,
    pub holiday_types: Vec<String>,
    pub company_scales: Vec<String>,
    pub experience_industries: Vec<String>,
    pub experience_occupations: Vec<String>,
    /// 社会人経験（月数）
    pub social_experience_lower: Option<Value>,
    pub social_experience_upper: Option<Value>,
    pub management_experiences: Vec<String>,
    pub qualifications: Vec<String>,
    pub languages: Vec<String>,
    pub excel_skills: Vec<String>,
    pub word_skills: Vec<String>,
    pub powerpoint_skills: Vec<String>,
    pub pc_tools: Vec<String>,
    pub dev_languages: Vec<String>,
    pub dev_os: Vec<String>,
    pub appearances: Vec<String>,
    pub communications: Vec<String>,
    pub thinkings: Vec<String>,
}

fn bound_text(value: &Option<Value>) -> Option<String> {
    match value.as_ref()? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn bounds(lower: &Option<Value>, upper: &Option<Value>) -> Bounds {
    Bounds::parse(bound_text(lower).as_deref(), bound_text(upper).as_deref())
}

impl From<&SearchRequest> for SearchCriteria {
    fn from(req: &SearchRequest) -> Self {
        let mut criteria = SearchCriteria::new();

        let staff_ids: Vec<String> = req.staff_ids.iter().map(i64::to_string).collect();
        criteria.set_values(ValueFacet::StaffId, &staff_ids);

        let lists: [(ValueFacet, &Vec<String>); 28] = [
            (ValueFacet::Phase, &req.phases),
            (ValueFacet::Gender, &req.genders),
            (ValueFacet::DesiredIndustries, &req.desired_industries),
            (ValueFacet::DesiredOccupations, &req.desired_occupations),
            (ValueFacet::WorkLocations, &req.work_locations),
            (ValueFacet::FinalEducation, &req.final_educations),
            (ValueFacet::StudyCategory, &req.study_categories),
            (ValueFacet::SchoolLevel, &req.school_levels),
            (ValueFacet::Nationality, &req.nationalities),
            (ValueFacet::JobChangeCount, &req.job_change_counts),
            (ValueFacet::ShortResignation, &req.short_resignations),
            (ValueFacet::Transfer, &req.transfers),
            (ValueFacet::HolidayType, &req.holiday_types),
            (ValueFacet::CompanyScale, &req.company_scales),
            (ValueFacet::ExperienceIndustries, &req.experience_industries),
            (ValueFacet::ExperienceOccupations, &req.experience_occupations),
            (ValueFacet::ManagementExperience, &req.management_experiences),
            (ValueFacet::Qualifications, &req.qualifications),
            (ValueFacet::Languages, &req.languages),
            (ValueFacet::ExcelSkill, &req.excel_skills),
            (ValueFacet::WordSkill, &req.word_skills),
            (ValueFacet::PowerpointSkill, &req.powerpoint_skills),
            (ValueFacet::PcTools, &req.pc_tools),
            (ValueFacet::DevLanguages, &req.dev_languages),
            (ValueFacet::DevOs, &req.dev_os),
            (ValueFacet::Appearance, &req.appearances),
            (ValueFacet::Communication, &req.communications),
            (ValueFacet::Thinking, &req.thinkings),
        ];
        for (facet, values) in lists {
            criteria.set_values(facet, values);
        }

        criteria.set_bounds(RangeFacet::Age, bounds(&req.age_lower, &req.age_upper));
        criteria.set_bounds(RangeFacet::Income, bounds(&req.income_lower, &req.income_upper));
        criteria.set_bounds(
            RangeFacet::SocialExperience,
            bounds(&req.social_experience_lower, &req.social_experience_upper),
        );

        criteria
    }
}
