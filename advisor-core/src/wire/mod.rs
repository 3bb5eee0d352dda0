//! Engine payload schemas and normalization
//!
//! The rule-based and AI engines answer with structurally different JSON,
//! and each has an abbreviated `quick` variant. Everything is decoded into
//! the engine's raw schema first, then mapped onto
//! [`RecommendationResult`](crate::model::RecommendationResult).
//!
//! ```text
//! body ──► rule_based::RulePayload ─┐
//!                                   ├──► RecommendationResult
//! body ──► ai::AiPayload ───────────┘
//! ```
//!
//! Required fields are enforced by serde (no `#[serde(default)]`); anything
//! the presenter can live without is an `Option`.

mod ai;
mod rule_based;

use serde::{Deserialize, Deserializer};

use crate::error::PayloadError;
use crate::model::{BuildMode, Engine, RecommendationResult};

pub use ai::{AiItem, AiMetadata, AiPayload, AiSkill};
pub use rule_based::{RuleItem, RulePayload, RuleSkill, RuleTalent};

/// Decode an engine response body into the normalized result.
pub fn normalize(
    engine: Engine,
    mode: BuildMode,
    body: &[u8],
) -> Result<RecommendationResult, PayloadError> {
    let result = match engine {
        Engine::RuleBased => {
            let payload: RulePayload = serde_json::from_slice(body)?;
            payload.into_result(mode)?
        }
        Engine::Ai => {
            let payload: AiPayload = serde_json::from_slice(body)?;
            payload.into_result(mode)
        }
    };

    tracing::debug!(
        engine = %engine,
        skills = result.skills.len(),
        items = result.items.len(),
        talents = result.talents.as_ref().map(Vec::len).unwrap_or(0),
        "normalized recommendation payload"
    );
    Ok(result)
}

/// 1-based rank from response position
pub(crate) fn rank(index: usize) -> u32 {
    index as u32 + 1
}

/// Priorities arrive as integers, floats or numeric strings depending on the
/// engine. Anything else is treated as absent.
pub(crate) fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(lenient_number)
        .and_then(|p| u8::try_from(p).ok()))
}

/// Catalog ids on picks; same tolerance as priorities.
pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(lenient_number)
        .and_then(|id| u32::try_from(id).ok()))
}

fn lenient_number(value: serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}
