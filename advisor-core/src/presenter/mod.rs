//! Recommendation Presenter
//!
//! Pure mapping from the normalized model to what the front-end shows.
//! Every optional field is checked on its own: a fragment appears when its
//! data is present and is simply left out otherwise. Cards keep the order
//! the engine sent; scores from the two engines are not comparable, so
//! nothing is re-sorted here.

mod text;

use serde::Serialize;

use crate::model::{
    EngineOutput, Hero, HeroId, PickDetail, RecommendationResult, ScoredPick, UsageMetadata,
};

/// Boolean skill attributes rendered as tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PickTag {
    DamageOverTime,
    SpellBurst,
    Combo,
}

impl PickTag {
    pub fn label(&self) -> &'static str {
        match self {
            PickTag::DamageOverTime => "DoT",
            PickTag::SpellBurst => "Spell Burst",
            PickTag::Combo => "Combo",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickCard {
    /// `#1`, `#2`, ...
    pub rank_label: String,
    pub title: String,
    /// Short attribute chips (type, slot, rarity, tier, ...)
    pub details: Vec<String>,
    pub tags: Vec<PickTag>,
    pub set_name: Option<String>,
    pub reason: Option<String>,
    pub score_line: Option<String>,
    pub priority_line: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildView {
    pub engine_label: &'static str,
    pub title: String,
    pub badges: Vec<String>,
    /// `82/100`, rule-based engine only
    pub synergy_badge: Option<String>,
    /// AI engine only
    pub synergy_narrative: Option<String>,
    pub summary: String,
    pub skill_cards: Vec<PickCard>,
    pub item_cards: Vec<PickCard>,
    /// `None` when the engine sent no talents or an empty list
    pub talent_cards: Option<Vec<PickCard>>,
    pub tips: Vec<String>,
    pub usage_line: Option<String>,
}

impl BuildView {
    pub fn has_talent_section(&self) -> bool {
        self.talent_cards.is_some()
    }
}

pub fn present(result: &RecommendationResult) -> BuildView {
    let mut badges = vec![format!("{} Build", result.build_type)];
    if let Some(stat) = &result.primary_stat {
        badges.push(stat.clone());
    }

    let (synergy_badge, synergy_narrative, usage_line) = match &result.output {
        EngineOutput::RuleBased { synergy_score } => {
            (synergy_score.map(|s| format!("{}/100", s)), None, None)
        }
        EngineOutput::Ai {
            synergy_explanation,
            usage,
        } => {
            if let Some(tokens) = usage.as_ref().and_then(|u| u.tokens_used) {
                badges.push(format!("{} tokens used", tokens));
            }
            (
                None,
                synergy_explanation
                    .as_ref()
                    .filter(|text| !text.trim().is_empty())
                    .cloned(),
                usage.as_ref().map(usage_line),
            )
        }
    };

    let talent_cards = result
        .talents
        .as_ref()
        .filter(|talents| !talents.is_empty())
        .map(|talents| talents.iter().map(card).collect());

    BuildView {
        engine_label: result.engine().label(),
        title: format!("{} - {}", result.hero_name, result.hero_talent),
        badges,
        synergy_badge,
        synergy_narrative,
        summary: result.build_summary.clone(),
        skill_cards: result.skills.iter().map(card).collect(),
        item_cards: result.items.iter().map(card).collect(),
        talent_cards,
        tips: result.playstyle_tips.clone(),
        usage_line,
    }
}

fn card(pick: &ScoredPick) -> PickCard {
    let mut details = Vec::new();
    let mut tags = Vec::new();
    let mut set_name = None;

    match &pick.detail {
        PickDetail::Skill {
            skill_type,
            damage_type,
            is_dot,
            is_combo,
            is_spell_burst,
        } => {
            details.extend(skill_type.iter().cloned());
            details.extend(damage_type.iter().cloned());
            if *is_dot == Some(true) {
                tags.push(PickTag::DamageOverTime);
            }
            if *is_spell_burst == Some(true) {
                tags.push(PickTag::SpellBurst);
            }
            if *is_combo == Some(true) {
                tags.push(PickTag::Combo);
            }
        }
        PickDetail::Item {
            slot,
            rarity,
            stat_type,
            set_name: set,
        } => {
            details.extend(slot.iter().cloned());
            details.extend(rarity.iter().cloned());
            details.extend(stat_type.iter().cloned());
            set_name = set.clone();
        }
        PickDetail::Talent {
            node_type,
            tier,
            god_class,
        } => {
            details.extend(node_type.iter().cloned());
            details.extend(tier.iter().cloned());
            details.extend(god_class.iter().cloned());
        }
    }

    let priority_line = pick.priority.map(|p| format!("Priority: {}", p));
    let score_line = pick.score.map(|score| match pick.priority {
        Some(p) => format!("Score: {:.1} | Priority: {}", score, p),
        None => format!("Score: {:.1}", score),
    });

    PickCard {
        rank_label: format!("#{}", pick.rank),
        title: pick.name.clone(),
        details,
        tags,
        set_name,
        reason: pick.reason.clone().filter(|r| !r.trim().is_empty()),
        score_line,
        priority_line,
    }
}

fn usage_line(usage: &UsageMetadata) -> String {
    let model = usage.model.as_deref().unwrap_or("unknown model");
    let mut line = format!("Model: {}", model);
    if let Some(total) = usage.tokens_used {
        line.push_str(&format!(" | Tokens: {}", total));
        if let (Some(prompt), Some(completion)) = (usage.prompt_tokens, usage.completion_tokens) {
            line.push_str(&format!(" ({} prompt + {} completion)", prompt, completion));
        }
    }
    line
}

// =====================================================
// Hero selection grid
// =====================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroCard {
    pub id: HeroId,
    pub name: String,
    pub talent: String,
    pub god_type: String,
    pub image_url: Option<String>,
    pub selected: bool,
}

pub fn present_heroes(heroes: &[Hero], selected: Option<HeroId>) -> Vec<HeroCard> {
    heroes
        .iter()
        .map(|h| HeroCard {
            id: h.id,
            name: h.name.clone(),
            talent: h.talent.clone(),
            god_type: h.god_type.clone(),
            image_url: h.image_url.clone(),
            selected: selected == Some(h.id),
        })
        .collect()
}

// =====================================================
// Tests
// =====================================================
