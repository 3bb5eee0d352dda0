//! Build Advisor - Core Library
//!
//! Engine-agnostic model and pure logic for the build advisor client:
//! - Hero / selection / request / normalized result types
//! - Rule-based and AI engine payload schemas, normalized into one result
//! - Presenter (normalized result → view model, text rendering)
//! - Error taxonomy (validation / network / server)
//! - Configuration and structured logging setup

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod presenter;
pub mod wire;

pub use config::AdvisorConfig;
pub use error::{AdvisorError, PayloadError};
pub use model::{
    BuildMode, Engine, EngineOutput, Hero, HeroId, ItemRecord, PickDetail,
    RecommendationRequest, RecommendationResult, ScoredPick, SelectionState, SkillRecord,
    UsageMetadata,
};
pub use presenter::{present, present_heroes, BuildView, HeroCard, PickCard, PickTag};
