//! Rule-based ("v2") engine payloads
//!
//! Full build: `hero_talent`, `recommended_*`, numeric scores on every pick.
//! Quick build: `talent`, `top_skills` / `top_items`, no scores.

use serde::Deserialize;

use super::{lenient_id, lenient_priority, rank};
use crate::error::PayloadError;
use crate::model::{
    BuildMode, EngineOutput, PickDetail, RecommendationResult, ScoredPick,
};

#[derive(Debug, Clone, Deserialize)]
pub struct RulePayload {
    pub hero_name: String,
    #[serde(alias = "talent")]
    pub hero_talent: String,
    pub build_type: String,
    #[serde(default)]
    pub primary_stat: Option<String>,
    pub build_summary: String,
    #[serde(alias = "top_skills")]
    pub recommended_skills: Vec<RuleSkill>,
    #[serde(alias = "top_items")]
    pub recommended_items: Vec<RuleItem>,
    #[serde(default)]
    pub recommended_talents: Option<Vec<RuleTalent>>,
    #[serde(default)]
    pub synergy_score: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleSkill {
    #[serde(default, deserialize_with = "lenient_id")]
    pub skill_id: Option<u32>,
    #[serde(alias = "name")]
    pub skill_name: String,
    #[serde(default, alias = "type")]
    pub skill_type: Option<String>,
    #[serde(default)]
    pub damage_type: Option<String>,
    #[serde(default)]
    pub is_dot: Option<bool>,
    #[serde(default)]
    pub is_spell_burst_compatible: Option<bool>,
    #[serde(default)]
    pub is_combo: Option<bool>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleItem {
    #[serde(default, deserialize_with = "lenient_id")]
    pub item_id: Option<u32>,
    #[serde(alias = "name")]
    pub item_name: String,
    #[serde(default)]
    pub slot: Option<String>,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub stat_type: Option<String>,
    #[serde(default)]
    pub set_name: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleTalent {
    #[serde(default, deserialize_with = "lenient_id")]
    pub node_id: Option<u32>,
    pub node_name: String,
    #[serde(default)]
    pub node_type: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub god_class: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl RulePayload {
    pub fn into_result(self, mode: BuildMode) -> Result<RecommendationResult, PayloadError> {
        // Full builds are scored; a pick without a score breaks the contract.
        if mode == BuildMode::Full {
            require_scores("recommended_skills", self.recommended_skills.iter().map(|s| s.score))?;
            require_scores("recommended_items", self.recommended_items.iter().map(|i| i.score))?;
            if let Some(talents) = &self.recommended_talents {
                require_scores("recommended_talents", talents.iter().map(|t| t.score))?;
            }
        }

        let skills = self
            .recommended_skills
            .into_iter()
            .enumerate()
            .map(|(i, s)| ScoredPick {
                rank: rank(i),
                name: s.skill_name,
                source_id: s.skill_id,
                score: s.score,
                reason: s.reason,
                priority: s.priority,
                detail: PickDetail::Skill {
                    skill_type: s.skill_type,
                    damage_type: s.damage_type,
                    is_dot: s.is_dot,
                    is_combo: s.is_combo,
                    is_spell_burst: s.is_spell_burst_compatible,
                },
            })
            .collect();

        let items = self
            .recommended_items
            .into_iter()
            .enumerate()
            .map(|(i, it)| ScoredPick {
                rank: rank(i),
                name: it.item_name,
                source_id: it.item_id,
                score: it.score,
                reason: it.reason,
                priority: None,
                detail: PickDetail::Item {
                    slot: it.slot,
                    rarity: it.rarity,
                    stat_type: it.stat_type,
                    set_name: it.set_name,
                },
            })
            .collect();

        let talents = self.recommended_talents.map(|talents| {
            talents
                .into_iter()
                .enumerate()
                .map(|(i, t)| ScoredPick {
                    rank: rank(i),
                    name: t.node_name,
                    source_id: t.node_id,
                    score: t.score,
                    reason: t.reason,
                    priority: None,
                    detail: PickDetail::Talent {
                        node_type: t.node_type,
                        tier: t.tier,
                        god_class: t.god_class,
                    },
                })
                .collect()
        });

        Ok(RecommendationResult {
            hero_name: self.hero_name,
            hero_talent: self.hero_talent,
            build_type: self.build_type,
            primary_stat: self.primary_stat,
            build_summary: self.build_summary,
            mode,
            skills,
            items,
            talents,
            playstyle_tips: Vec::new(),
            output: EngineOutput::RuleBased {
                synergy_score: self.synergy_score.map(synergy_to_percent),
            },
        })
    }
}

fn require_scores(
    list: &str,
    scores: impl Iterator<Item = Option<f64>>,
) -> Result<(), PayloadError> {
    for (i, score) in scores.enumerate() {
        if score.is_none() {
            return Err(PayloadError::MissingField(format!("{}[{}].score", list, i)));
        }
    }
    Ok(())
}

/// The engine reports a float rounded to two decimals; the UI shows 0..=100.
fn synergy_to_percent(score: f64) -> u8 {
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as u8
}
