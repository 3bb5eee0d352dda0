//! Build Advisor - client runtime
//!
//! Catalog loading, the recommendation orchestrator and the HTTP gateway
//! they share. Pure model and presentation logic lives in `advisor_core`.

pub mod catalog;
pub mod gateway;
pub mod orchestrator;

pub use catalog::{CatalogLoader, CatalogState};
pub use gateway::{AdvisorApi, HttpAdvisorApi};
pub use orchestrator::{
    Dispatch, Orchestrator, OrchestratorEvent, RecommendationState, RequestOutcome, Ticket,
};
