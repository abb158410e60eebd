pub mod api;
pub mod config;
pub mod corrections;
pub mod date;
pub mod logging;
pub mod matching;
pub mod repository;
pub mod search;

use serde::{Deserialize, Serialize};

// Commonly used data models for search functions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Candidate {
    pub id: i64,
    pub agent_id: i64,
    pub staff_id: Option<i64>,
    pub phase: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name_kana: Option<String>,
    pub first_name_kana: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub birth_date: Option<String>,
    pub nationality: Option<String>,
    pub final_education: Option<String>,
    pub study_category: Option<String>,
    pub school_level: Option<String>,
    pub job_change_count: Option<String>,
    pub short_resignation: Option<String>,
    pub transfer: Option<String>,
    pub holiday_type: Option<String>,
    /// 希望年収（万円）
    pub desired_income: Option<i64>,
    pub social_experience_months: Option<i64>,
    pub management_experience: Option<String>,
    pub excel_skill: Option<String>,
    pub word_skill: Option<String>,
    pub powerpoint_skill: Option<String>,
    pub appearance: Option<String>,
    pub communication: Option<String>,
    pub thinking: Option<String>,
    pub desired_industries: Vec<String>,
    pub desired_occupations: Vec<String>,
    pub desired_work_locations: Vec<String>,
    pub desired_company_scales: Vec<String>,
    pub experience_industries: Vec<String>,
    pub experience_occupations: Vec<String>,
    pub qualifications: Vec<String>,
    pub languages: Vec<LanguageSkill>,
    pub pc_tools: Vec<String>,
    pub dev_skills: Vec<DevSkill>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Listing {
    pub id: i64,
    pub agent_id: i64,
    pub staff_id: Option<i64>,
    pub phase: Option<String>,
    pub company_name: Option<String>,
    pub title: Option<String>,
    /// "男性" / "女性" / "不問"
    pub gender: Option<String>,
    pub age_lower: Option<i64>,
    pub age_upper: Option<i64>,
    /// 想定年収（万円）
    pub income_lower: Option<i64>,
    pub income_upper: Option<i64>,
    pub final_education: Option<String>,
    pub study_category: Option<String>,
    pub school_level: Option<String>,
    pub nationality: Option<String>,
    pub job_change_count: Option<String>,
    pub short_resignation: Option<String>,
    pub transfer: Option<String>,
    pub holiday_type: Option<String>,
    pub company_scale: Option<String>,
    pub excel_skill: Option<String>,
    pub word_skill: Option<String>,
    pub powerpoint_skill: Option<String>,
    pub appearance: Option<String>,
    pub communication: Option<String>,
    pub thinking: Option<String>,
    pub industries: Vec<String>,
    pub occupations: Vec<String>,
    pub work_locations: Vec<String>,
    pub required_conditions: Vec<RequiredCondition>,
}

/// 求人の必須条件グループ。`conjunction` がグループ内の項目の結合方法を決める。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequiredCondition {
    pub conjunction: Conjunction,
    pub experience_industries: Vec<String>,
    pub experience_occupations: Vec<String>,
    pub qualifications: Vec<String>,
    pub languages: Vec<LanguageSkill>,
    pub pc_tools: Vec<String>,
    pub dev_skills: Vec<DevSkill>,
    pub social_experience_months: Option<i64>,
    pub management_experience: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageSkill {
    pub language: String,
    pub level: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevSkillCategory {
    #[default]
    Language,
    Os,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevSkill {
    pub category: DevSkillCategory,
    pub name: String,
    pub experience_months: Option<i64>,
}
