use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

use crate::corrections::{correct_gender, normalize_nationality, normalize_work_location};

/// ファセットの結合方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Semantics {
    /// 要求値のいずれかに一致すれば通過
    Any,
    /// 要求値すべてを満たす必要がある
    All,
}

/// 値リストで絞り込むファセット
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    AsRefStr,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ValueFacet {
    StaffId,
    Phase,
    Gender,
    DesiredIndustries,
    DesiredOccupations,
    WorkLocations,
    FinalEducation,
    StudyCategory,
    SchoolLevel,
    Nationality,
    JobChangeCount,
    ShortResignation,
    Transfer,
    HolidayType,
    CompanyScale,
    ExperienceIndustries,
    ExperienceOccupations,
    ManagementExperience,
    Qualifications,
    Languages,
    ExcelSkill,
    WordSkill,
    PowerpointSkill,
    PcTools,
    DevLanguages,
    DevOs,
    Appearance,
    Communication,
    Thinking,
}

const UNQUESTIONED: &[&str] = &["不問"];
const NATIONWIDE: &[&str] = &["全国"];

impl ValueFacet {
    pub fn semantics(self) -> Semantics {
        match self {
            ValueFacet::DesiredIndustries
            | ValueFacet::DesiredOccupations
            | ValueFacet::WorkLocations
            | ValueFacet::ExperienceIndustries
            | ValueFacet::ExperienceOccupations
            | ValueFacet::Qualifications
            | ValueFacet::Languages
            | ValueFacet::PcTools
            | ValueFacet::DevLanguages
            | ValueFacet::DevOs => Semantics::All,
            _ => Semantics::Any,
        }
    }

    /// レコード側がこの値を持っていれば、どの要求値にも一致するとみなす
    pub fn record_wildcards(self) -> &'static [&'static str] {
        match self {
            ValueFacet::WorkLocations => NATIONWIDE,
            ValueFacet::Gender
            | ValueFacet::FinalEducation
            | ValueFacet::StudyCategory
            | ValueFacet::SchoolLevel
            | ValueFacet::Nationality
            | ValueFacet::JobChangeCount
            | ValueFacet::ShortResignation
            | ValueFacet::Transfer
            | ValueFacet::HolidayType
            | ValueFacet::CompanyScale
            | ValueFacet::ManagementExperience => UNQUESTIONED,
            _ => &[],
        }
    }

    /// 比較用の正規化。空文字は None。
    pub fn normalize(self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        match self {
            ValueFacet::WorkLocations => normalize_work_location(trimmed),
            ValueFacet::Gender => correct_gender(trimmed),
            ValueFacet::Nationality => normalize_nationality(trimmed),
            ValueFacet::Languages
            | ValueFacet::PcTools
            | ValueFacet::DevLanguages
            | ValueFacet::DevOs => Some(trimmed.to_lowercase()),
            _ => Some(trimmed.to_string()),
        }
    }
}

/// 下限・上限で絞り込むファセット
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    AsRefStr,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RangeFacet {
    Age,
    Income,
    SocialExperience,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Values(ValueFacet),
    Lower(RangeFacet),
    Upper(RangeFacet),
    /// 下限・上限を同じステージでまとめて判定する
    Between(RangeFacet),
}

/// 絞り込みステージ。宣言順がそのまま実行順になる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum FacetStage {
    StaffId,
    Phase,
    Gender,
    AgeLower,
    AgeUpper,
    DesiredIndustries,
    DesiredOccupations,
    WorkLocations,
    FinalEducation,
    StudyCategory,
    SchoolLevel,
    Nationality,
    JobChangeCount,
    ShortResignation,
    IncomeLower,
    IncomeUpper,
    Transfer,
    HolidayType,
    CompanyScale,
    ExperienceIndustries,
    ExperienceOccupations,
    SocialExperience,
    ManagementExperience,
    Qualifications,
    Languages,
    ExcelSkill,
    WordSkill,
    PowerpointSkill,
    PcTools,
    DevLanguages,
    DevOs,
    Appearance,
    Communication,
    Thinking,
}

impl FacetStage {
    pub fn kind(self) -> StageKind {
        use FacetStage as S;
        use ValueFacet as V;

        match self {
            S::AgeLower => StageKind::Lower(RangeFacet::Age),
            S::AgeUpper => StageKind::Upper(RangeFacet::Age),
            S::IncomeLower => StageKind::Lower(RangeFacet::Income),
            S::IncomeUpper => StageKind::Upper(RangeFacet::Income),
            S::SocialExperience => StageKind::Between(RangeFacet::SocialExperience),
            S::StaffId => StageKind::Values(V::StaffId),
            S::Phase => StageKind::Values(V::Phase),
            S::Gender => StageKind::Values(V::Gender),
            S::DesiredIndustries => StageKind::Values(V::DesiredIndustries),
            S::DesiredOccupations => StageKind::Values(V::DesiredOccupations),
            S::WorkLocations => StageKind::Values(V::WorkLocations),
            S::FinalEducation => StageKind::Values(V::FinalEducation),
            S::StudyCategory => StageKind::Values(V::StudyCategory),
            S::SchoolLevel => StageKind::Values(V::SchoolLevel),
            S::Nationality => StageKind::Values(V::Nationality),
            S::JobChangeCount => StageKind::Values(V::JobChangeCount),
            S::ShortResignation => StageKind::Values(V::ShortResignation),
            S::Transfer => StageKind::Values(V::Transfer),
            S::HolidayType => StageKind::Values(V::HolidayType),
            S::CompanyScale => StageKind::Values(V::CompanyScale),
            S::ExperienceIndustries => StageKind::Values(V::ExperienceIndustries),
            S::ExperienceOccupations => StageKind::Values(V::ExperienceOccupations),
            S::ManagementExperience => StageKind::Values(V::ManagementExperience),
            S::Qualifications => StageKind::Values(V::Qualifications),
            S::Languages => StageKind::Values(V::Languages),
            S::ExcelSkill => StageKind::Values(V::ExcelSkill),
            S::WordSkill => StageKind::Values(V::WordSkill),
            S::PowerpointSkill => StageKind::Values(V::PowerpointSkill),
            S::PcTools => StageKind::Values(V::PcTools),
            S::DevLanguages => StageKind::Values(V::DevLanguages),
            S::DevOs => StageKind::Values(V::DevOs),
            S::Appearance => StageKind::Values(V::Appearance),
            S::Communication => StageKind::Values(V::Communication),
            S::Thinking => StageKind::Values(V::Thinking),
        }
    }
}
