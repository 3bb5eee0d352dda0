//! Build advisor domain model
//!
//! Engine-agnostic types shared by the catalog, the orchestrator and the
//! presenter. Both recommendation engines are normalized into
//! [`RecommendationResult`]; engine-only data lives in [`EngineOutput`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AdvisorError;

// =====================================================
// Catalog types
// =====================================================

/// Hero identifier as issued by the catalog service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeroId(pub u32);

impl fmt::Display for HeroId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A selectable playable character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub id: HeroId,
    pub name: String,
    pub talent: String,
    pub god_type: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub popularity_score: Option<f64>,
}

/// Skill reference entry (`GET /skills`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub skill_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub damage_type: Option<String>,
    #[serde(default)]
    pub cooldown: Option<f64>,
    #[serde(default)]
    pub mana_cost: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Item reference entry (`GET /items`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub slot: String,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub stat_type: Option<String>,
    #[serde(default)]
    pub set_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

// =====================================================
// Selection & request
// =====================================================

/// Recommendation backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Engine {
    RuleBased,
    #[default]
    Ai,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::RuleBased => "rule-based",
            Engine::Ai => "ai",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Engine::RuleBased => "Rule-Based",
            Engine::Ai => "AI-Powered",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rule-based" | "rule_based" | "rules" | "v2" => Ok(Engine::RuleBased),
            "ai" => Ok(Engine::Ai),
            other => Err(AdvisorError::Validation(format!("unknown engine: {other}"))),
        }
    }
}

/// Which endpoint family a request goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Full,
    Quick,
}

/// What the user has currently chosen. Only the orchestrator mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionState {
    pub hero: Option<HeroId>,
    pub engine: Engine,
    pub playstyle: Option<String>,
    pub focus: Option<String>,
}

impl SelectionState {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    /// Empty input and "unset" are the same thing.
    pub fn set_playstyle(&mut self, text: &str) {
        self.playstyle = non_empty(text);
    }

    pub fn set_focus(&mut self, text: &str) {
        self.focus = non_empty(text);
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

pub const DEFAULT_MAX_SKILLS: u8 = 6;
pub const DEFAULT_MAX_ITEMS: u8 = 10;
pub const MAX_SKILLS_LIMIT: u8 = 10;
pub const MAX_ITEMS_LIMIT: u8 = 20;

/// One recommendation call, built fresh from the selection at dispatch time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub hero_id: HeroId,
    pub engine: Engine,
    pub mode: BuildMode,
    pub playstyle: Option<String>,
    pub focus: Option<String>,
    pub max_skills: u8,
    pub max_items: u8,
}

impl RecommendationRequest {
    pub fn new(hero_id: HeroId, engine: Engine) -> Self {
        Self {
            hero_id,
            engine,
            mode: BuildMode::Full,
            playstyle: None,
            focus: None,
            max_skills: DEFAULT_MAX_SKILLS,
            max_items: DEFAULT_MAX_ITEMS,
        }
    }

    /// Snapshot the selection. Returns `None` when no hero is selected.
    pub fn from_selection(
        selection: &SelectionState,
        mode: BuildMode,
        max_skills: u8,
        max_items: u8,
    ) -> Option<Self> {
        let hero_id = selection.hero?;
        Some(
            Self {
                mode,
                playstyle: selection.playstyle.clone(),
                focus: selection.focus.clone(),
                ..Self::new(hero_id, selection.engine)
            }
            .with_limits(max_skills, max_items),
        )
    }

    /// Clamp result-size parameters to what the engines accept.
    pub fn with_limits(mut self, max_skills: u8, max_items: u8) -> Self {
        self.max_skills = max_skills.clamp(1, MAX_SKILLS_LIMIT);
        self.max_items = max_items.clamp(1, MAX_ITEMS_LIMIT);
        if self.max_skills != max_skills || self.max_items != max_items {
            tracing::warn!(
                max_skills,
                max_items,
                clamped_skills = self.max_skills,
                clamped_items = self.max_items,
                "result-size parameters out of range, clamped"
            );
        }
        self
    }

    /// Endpoint path relative to the API base URL
    pub fn path(&self) -> String {
        let prefix = match self.engine {
            Engine::RuleBased => "/recommendations",
            Engine::Ai => "/recommendations/ai",
        };
        let mode = match self.mode {
            BuildMode::Full => "build",
            BuildMode::Quick => "quick",
        };
        format!("{}/{}/{}", prefix, mode, self.hero_id)
    }

    /// Query parameters. Quick endpoints take none; `focus` is rule-based only.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        if self.mode == BuildMode::Quick {
            return Vec::new();
        }
        let mut pairs = Vec::with_capacity(4);
        if let Some(playstyle) = &self.playstyle {
            pairs.push(("playstyle", playstyle.clone()));
        }
        if self.engine == Engine::RuleBased {
            if let Some(focus) = &self.focus {
                pairs.push(("focus", focus.clone()));
            }
        }
        pairs.push(("max_skills", self.max_skills.to_string()));
        pairs.push(("max_items", self.max_items.to_string()));
        pairs
    }
}

// =====================================================
// Normalized result
// =====================================================

/// Kind-specific pick attributes. Rule-based picks fill most of these;
/// AI picks usually carry only a slot or nothing at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PickDetail {
    Skill {
        skill_type: Option<String>,
        damage_type: Option<String>,
        is_dot: Option<bool>,
        is_combo: Option<bool>,
        is_spell_burst: Option<bool>,
    },
    Item {
        slot: Option<String>,
        rarity: Option<String>,
        stat_type: Option<String>,
        set_name: Option<String>,
    },
    Talent {
        node_type: Option<String>,
        tier: Option<String>,
        god_class: Option<String>,
    },
}

/// A recommended skill, item or talent node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPick {
    /// 1-based position in the engine response
    pub rank: u32,
    pub name: String,
    pub source_id: Option<u32>,
    pub score: Option<f64>,
    pub reason: Option<String>,
    pub priority: Option<u8>,
    pub detail: PickDetail,
}

/// Token accounting reported by the AI engine
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub model: Option<String>,
    pub tokens_used: Option<u64>,
    pub prompt_tokens: Option<u64>,
    pub completion_tokens: Option<u64>,
}

/// Engine-only part of a result; the variant identifies the producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "engine", rename_all = "kebab-case")]
pub enum EngineOutput {
    RuleBased {
        /// 0..=100
        synergy_score: Option<u8>,
    },
    Ai {
        synergy_explanation: Option<String>,
        usage: Option<UsageMetadata>,
    },
}

impl EngineOutput {
    pub fn engine(&self) -> Engine {
        match self {
            EngineOutput::RuleBased { .. } => Engine::RuleBased,
            EngineOutput::Ai { .. } => Engine::Ai,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub hero_name: String,
    pub hero_talent: String,
    pub build_type: String,
    pub primary_stat: Option<String>,
    pub build_summary: String,
    pub mode: BuildMode,
    pub skills: Vec<ScoredPick>,
    pub items: Vec<ScoredPick>,
    pub talents: Option<Vec<ScoredPick>>,
    pub playstyle_tips: Vec<String>,
    pub output: EngineOutput,
}

impl RecommendationResult {
    pub fn engine(&self) -> Engine {
        self.output.engine()
    }

    pub fn synergy_score(&self) -> Option<u8> {
        match &self.output {
            EngineOutput::RuleBased { synergy_score } => *synergy_score,
            EngineOutput::Ai { .. } => None,
        }
    }
}

// =====================================================
// Tests
// =====================================================
