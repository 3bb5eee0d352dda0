//! AI engine payloads
//!
//! Picks carry a reason and sometimes a priority, never a score. The quick
//! variant renames `talent_name` to `talent` and flattens `tokens_used` to
//! the top level.

use serde::Deserialize;

use super::{lenient_id, lenient_priority, rank};
use crate::model::{
    BuildMode, EngineOutput, PickDetail, RecommendationResult, ScoredPick, UsageMetadata,
};

#[derive(Debug, Clone, Deserialize)]
pub struct AiPayload {
    pub hero_name: String,
    #[serde(alias = "talent")]
    pub talent_name: String,
    pub build_type: String,
    pub build_summary: String,
    #[serde(default)]
    pub recommended_skills: Option<Vec<AiSkill>>,
    #[serde(default)]
    pub recommended_items: Option<Vec<AiItem>>,
    #[serde(default)]
    pub synergy_explanation: Option<String>,
    #[serde(default)]
    pub playstyle_tips: Option<Vec<String>>,
    #[serde(default)]
    pub ai_metadata: Option<AiMetadata>,
    /// Quick builds only
    #[serde(default)]
    pub tokens_used: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiSkill {
    pub skill_name: String,
    #[serde(default, deserialize_with = "lenient_id")]
    pub skill_id: Option<u32>,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Option<u8>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiItem {
    pub item_name: String,
    #[serde(default, deserialize_with = "lenient_id")]
    pub item_id: Option<u32>,
    #[serde(default)]
    pub slot: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiMetadata {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub tokens_used: Option<u64>,
    #[serde(default)]
    pub prompt_tokens: Option<u64>,
    #[serde(default)]
    pub completion_tokens: Option<u64>,
}

impl AiPayload {
    pub fn into_result(self, mode: BuildMode) -> RecommendationResult {
        let usage = match (self.ai_metadata, self.tokens_used) {
            (Some(meta), _) => Some(UsageMetadata {
                model: meta.model,
                tokens_used: meta.tokens_used,
                prompt_tokens: meta.prompt_tokens,
                completion_tokens: meta.completion_tokens,
            }),
            (None, Some(tokens)) => Some(UsageMetadata {
                tokens_used: Some(tokens),
                ..UsageMetadata::default()
            }),
            (None, None) => None,
        };

        let skills = self
            .recommended_skills
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, s)| ScoredPick {
                rank: rank(i),
                name: s.skill_name,
                source_id: s.skill_id,
                score: None,
                reason: s.reason,
                priority: s.priority,
                detail: PickDetail::Skill {
                    skill_type: None,
                    damage_type: None,
                    is_dot: None,
                    is_combo: None,
                    is_spell_burst: None,
                },
            })
            .collect();

        let items = self
            .recommended_items
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, it)| ScoredPick {
                rank: rank(i),
                name: it.item_name,
                source_id: it.item_id,
                score: None,
                reason: it.reason,
                priority: None,
                detail: PickDetail::Item {
                    slot: it.slot,
                    rarity: None,
                    stat_type: None,
                    set_name: None,
                },
            })
            .collect();

        RecommendationResult {
            hero_name: self.hero_name,
            hero_talent: self.talent_name,
            build_type: self.build_type,
            primary_stat: None,
            build_summary: self.build_summary,
            mode,
            skills,
            items,
            talents: None,
            playstyle_tips: self.playstyle_tips.unwrap_or_default(),
            output: EngineOutput::Ai {
                synergy_explanation: self.synergy_explanation,
                usage,
            },
        }
    }
}
