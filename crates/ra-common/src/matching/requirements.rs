use super::{equivalence::EquivalenceTable, facets::ValueFacet};
use crate::{Candidate, Conjunction, DevSkill, Listing, RequiredCondition};

/// 必須条件グループの判定結果
#[derive(Debug, Clone, PartialEq)]
pub enum KoDecision {
    /// 条件を満たさない
    HardKo { reason: String },
    /// 人材側の情報不足で判定できない（要手動確認）
    SoftKo { reason: String },
    Pass,
}

impl KoDecision {
    pub fn is_hard_ko(&self) -> bool {
        matches!(self, KoDecision::HardKo { .. })
    }

    pub fn needs_manual_review(&self) -> bool {
        matches!(self, KoDecision::SoftKo { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            KoDecision::HardKo { reason } | KoDecision::SoftKo { reason } => Some(reason),
            KoDecision::Pass => None,
        }
    }
}

/// 求人の全グループに対する判定の集約
#[derive(Debug, Clone, PartialEq)]
pub struct RequirementReport {
    /// いずれかのグループが HardKo
    pub is_hard_knockout: bool,
    /// SoftKo が 1 つ以上ある
    pub needs_manual_review: bool,
    /// (グループ名, 判定)
    pub decisions: Vec<(String, KoDecision)>,
}

impl RequirementReport {
    pub fn new(decisions: Vec<(String, KoDecision)>) -> Self {
        Self {
            is_hard_knockout: decisions.iter().any(|(_, d)| d.is_hard_ko()),
            needs_manual_review: decisions.iter().any(|(_, d)| d.needs_manual_review()),
            decisions,
        }
    }

    pub fn passed(&self) -> bool {
        !self.is_hard_knockout && !self.needs_manual_review
    }

    /// KO 理由を "; " 区切りで連結（なければ None）
    pub fn reasons(&self) -> Option<String> {
        let reasons: Vec<_> = self
            .decisions
            .iter()
            .filter_map(|(name, d)| d.reason().map(|r| format!("{name}: {r}")))
            .collect();

        if reasons.is_empty() {
            None
        } else {
            Some(reasons.join("; "))
        }
    }
}

enum Item {
    Met,
    Unmet(String),
    Unknown(String),
}

/// 人材が求人の必須条件を満たすか判定する
///
/// AND グループは全項目、OR グループはいずれかの項目を満たせば Pass。求人は全グループの Pass を要する。
pub fn evaluate_requirements(
    listing: &Listing,
    candidate: &Candidate,
    table: &EquivalenceTable,
) -> RequirementReport {
    let decisions = listing
        .required_conditions
        .iter()
        .enumerate()
        .map(|(index, group)| {
            (
                format!("required_conditions[{index}]"),
                evaluate_group(group, candidate, table),
            )
        })
        .collect();

    RequirementReport::new(decisions)
}

fn evaluate_group(group: &RequiredCondition, candidate: &Candidate, table: &EquivalenceTable) -> KoDecision {
    let items = group_items(group, candidate, table);
    if items.is_empty() {
        return KoDecision::Pass;
    }

    let mut unmet = Vec::new();
    let mut unknown = Vec::new();
    let mut any_met = false;
    for item in items {
        match item {
            Item::Met => any_met = true,
            Item::Unmet(reason) => unmet.push(reason),
            Item::Unknown(reason) => unknown.push(reason),
        }
    }

    match group.conjunction {
        Conjunction::And if !unmet.is_empty() => KoDecision::HardKo {
            reason: unmet.join(", "),
        },
        Conjunction::Or if any_met => KoDecision::Pass,
        _ if !unknown.is_empty() => KoDecision::SoftKo {
            reason: unknown.join(", "),
        },
        Conjunction::And => KoDecision::Pass,
        Conjunction::Or => KoDecision::HardKo {
            reason: format!("いずれも未充足: {}", unmet.join(", ")),
        },
    }
}

fn group_items(group: &RequiredCondition, candidate: &Candidate, table: &EquivalenceTable) -> Vec<Item> {
    let mut items = Vec::new();

    items.extend(value_items(
        ValueFacet::ExperienceIndustries,
        &group.experience_industries,
        &candidate.experience_industries,
        |held, req| held == req,
    ));
    items.extend(value_items(
        ValueFacet::ExperienceOccupations,
        &group.experience_occupations,
        &candidate.experience_occupations,
        |held, req| held == req,
    ));

    for required in &group.qualifications {
        if table.is_wildcard(required.trim()) {
            items.push(Item::Met);
            continue;
        }
        items.extend(value_items(
            ValueFacet::Qualifications,
            std::slice::from_ref(required),
            &candidate.qualifications,
            |held, req| table.satisfies(held, req),
        ));
    }

    let required_languages: Vec<String> = group.languages.iter().map(|l| l.language.clone()).collect();
    let held_languages: Vec<String> = candidate.languages.iter().map(|l| l.language.clone()).collect();
    items.extend(value_items(
        ValueFacet::Languages,
        &required_languages,
        &held_languages,
        |held, req| held == req,
    ));

    items.extend(value_items(
        ValueFacet::PcTools,
        &group.pc_tools,
        &candidate.pc_tools,
        |held, req| held == req,
    ));

    items.extend(group.dev_skills.iter().map(|skill| dev_skill_item(skill, &candidate.dev_skills)));

    if let Some(required) = group.social_experience_months {
        items.push(match candidate.social_experience_months {
            Some(months) if months >= required => Item::Met,
            Some(months) => Item::Unmet(format!("社会人経験 {months}ヶ月 < {required}ヶ月")),
            None => Item::Unknown("社会人経験不明".into()),
        });
    }

    if let Some(required) = group
        .management_experience
        .as_deref()
        .and_then(|v| ValueFacet::ManagementExperience.normalize(v))
    {
        let held = candidate
            .management_experience
            .as_deref()
            .and_then(|v| ValueFacet::ManagementExperience.normalize(v));
        items.push(match held {
            _ if ValueFacet::ManagementExperience
                .record_wildcards()
                .contains(&required.as_str()) =>
            {
                Item::Met
            }
            Some(held) if held == required => Item::Met,
            Some(held) => Item::Unmet(format!("マネジメント経験 {held} ≠ {required}")),
            None => Item::Unknown("マネジメント経験不明".into()),
        });
    }

    items
}

/// 要求値ごとに 1 項目。人材側が空なら情報不足とみなす。
fn value_items<F>(facet: ValueFacet, required: &[String], held: &[String], satisfies: F) -> Vec<Item>
where
    F: Fn(&str, &str) -> bool,
{
    let held: Vec<String> = held.iter().filter_map(|v| facet.normalize(v)).collect();

    required
        .iter()
        .filter_map(|r| facet.normalize(r))
        .map(|req| {
            if held.is_empty() {
                Item::Unknown(format!("{}不明", facet.as_ref()))
            } else if held.iter().any(|h| satisfies(h, &req)) {
                Item::Met
            } else {
                Item::Unmet(format!("{}: {req} なし", facet.as_ref()))
            }
        })
        .collect()
}

fn dev_skill_item(required: &DevSkill, held: &[DevSkill]) -> Item {
    let name = required.name.trim().to_lowercase();
    let matching = held
        .iter()
        .find(|skill| skill.category == required.category && skill.name.trim().to_lowercase() == name);

    match (matching, required.experience_months) {
        (None, _) if held.is_empty() => Item::Unknown("開発スキル不明".into()),
        (None, _) => Item::Unmet(format!("開発スキル: {} なし", required.name)),
        (Some(_), None) => Item::Met,
        (Some(skill), Some(months)) => match skill.experience_months {
            Some(have) if have >= months => Item::Met,
            Some(have) => Item::Unmet(format!("{} 経験 {have}ヶ月 < {months}ヶ月", required.name)),
            None => Item::Unknown(format!("{} 経験年数不明", required.name)),
        },
    }
}
