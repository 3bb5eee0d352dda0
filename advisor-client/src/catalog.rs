//! Hero catalog loading with an explicit state machine
//!
//! `Idle → Loading → Loaded | Failed`. A failed load keeps the error so the
//! front-end can show it next to a retry affordance; `retry` re-issues the
//! same request.

use std::sync::Arc;
use tracing::{info, warn};

use advisor_core::{AdvisorError, Hero, HeroId, ItemRecord, SkillRecord};

use crate::gateway::AdvisorApi;

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogState {
    Idle,
    Loading,
    Loaded(Vec<Hero>),
    Failed(AdvisorError),
}

pub struct CatalogLoader<A: AdvisorApi> {
    api: Arc<A>,
    state: CatalogState,
    attempts: u32,
}

impl<A: AdvisorApi> CatalogLoader<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: CatalogState::Idle,
            attempts: 0,
        }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    /// Number of list requests issued so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Fetch the hero list. Ordering is whatever the service returns.
    pub async fn load(&mut self) -> Result<&[Hero], AdvisorError> {
        self.state = CatalogState::Loading;
        self.attempts += 1;

        match self.api.list_heroes().await {
            Ok(heroes) => {
                info!(count = heroes.len(), attempt = self.attempts, "hero catalog loaded");
                self.state = CatalogState::Loaded(heroes);
                Ok(self.heroes())
            }
            Err(err) => {
                warn!(error = %err, attempt = self.attempts, "hero catalog load failed");
                self.state = CatalogState::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Re-issue the list request after a failure of any kind.
    pub async fn retry(&mut self) -> Result<&[Hero], AdvisorError> {
        if !self.can_retry() {
            return Err(AdvisorError::Validation(
                "no failed catalog load to retry".to_string(),
            ));
        }
        self.load().await
    }

    pub fn can_retry(&self) -> bool {
        matches!(self.state, CatalogState::Failed(_))
    }

    /// Loaded heroes, empty until a load succeeds
    pub fn heroes(&self) -> &[Hero] {
        match &self.state {
            CatalogState::Loaded(heroes) => heroes,
            _ => &[],
        }
    }

    /// Look a hero up by numeric id or case-insensitive name.
    pub fn find(&self, query: &str) -> Option<&Hero> {
        let query = query.trim();
        if let Ok(id) = query.parse::<u32>() {
            return self.heroes().iter().find(|h| h.id == HeroId(id));
        }
        self.heroes()
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(query))
    }

    pub async fn hero(&self, id: HeroId) -> Result<Hero, AdvisorError> {
        self.api.get_hero(id).await
    }

    pub async fn skills(&self) -> Result<Vec<SkillRecord>, AdvisorError> {
        self.api.list_skills().await
    }

    pub async fn items(&self) -> Result<Vec<ItemRecord>, AdvisorError> {
        self.api.list_items().await
    }
}
