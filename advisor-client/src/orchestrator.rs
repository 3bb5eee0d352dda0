//! Recommendation orchestrator
//!
//! Owns the user's selection and the recommendation lifecycle, and routes each
//! request to the engine selected at dispatch time.
//!
//! ```text
//! select_hero / set_engine / set_playstyle / set_focus
//!       │
//!       ▼
//! SelectionState ──► begin_request ──► Pending(ticket) ──► AdvisorApi
//!                                                              │
//!                    complete(ticket, outcome) ◄───────────────┘
//!                          │
//!                          ├─ ticket current, selection unchanged → Ready | Failed
//!                          └─ otherwise → discarded (Superseded)
//! ```
//!
//! State sits behind a `parking_lot::Mutex` that is never held across an
//! `.await`; every transition is published on a broadcast channel.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use advisor_core::{
    AdvisorConfig, AdvisorError, BuildMode, Engine, HeroId, RecommendationRequest,
    RecommendationResult, SelectionState,
};

use crate::gateway::AdvisorApi;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Identifies one dispatched request and what it was dispatched for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub id: u64,
    pub hero: HeroId,
    pub engine: Engine,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationState {
    Idle,
    Pending(Ticket),
    Ready(Arc<RecommendationResult>),
    Failed(AdvisorError),
}

impl RecommendationState {
    pub fn is_pending(&self) -> bool {
        matches!(self, RecommendationState::Pending(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrchestratorEvent {
    SelectionChanged(SelectionState),
    StateChanged(RecommendationState),
}

/// Result of `begin_request`
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Issued {
        ticket: Ticket,
        request: RecommendationRequest,
    },
    /// A request is already in flight; nothing was issued
    AlreadyPending,
}

/// What became of a request once its response arrived
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    Ready(Arc<RecommendationResult>),
    Failed(AdvisorError),
    /// The selection moved on while the request was in flight
    Superseded,
    AlreadyPending,
}

struct Inner {
    selection: SelectionState,
    state: RecommendationState,
    next_ticket: u64,
}

pub struct Orchestrator<A: AdvisorApi> {
    api: Arc<A>,
    inner: Arc<Mutex<Inner>>,
    events: broadcast::Sender<OrchestratorEvent>,
    max_skills: u8,
    max_items: u8,
}

impl<A: AdvisorApi> Clone for Orchestrator<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            inner: Arc::clone(&self.inner),
            events: self.events.clone(),
            max_skills: self.max_skills,
            max_items: self.max_items,
        }
    }
}

impl<A: AdvisorApi> Orchestrator<A> {
    pub fn new(api: Arc<A>, config: &AdvisorConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            api,
            inner: Arc::new(Mutex::new(Inner {
                selection: SelectionState::new(config.default_engine),
                state: RecommendationState::Idle,
                next_ticket: 0,
            })),
            events,
            max_skills: config.max_skills,
            max_items: config.max_items,
        }
    }

    pub fn selection(&self) -> SelectionState {
        self.inner.lock().selection.clone()
    }

    pub fn state(&self) -> RecommendationState {
        self.inner.lock().state.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OrchestratorEvent> {
        self.events.subscribe()
    }

    /// Select a hero. Any previous result, failure or in-flight request is
    /// dropped and the state returns to `Idle`.
    pub fn select_hero(&self, hero: HeroId) {
        let mut inner = self.inner.lock();
        inner.selection.hero = Some(hero);
        info!(%hero, "hero selected");
        self.publish(OrchestratorEvent::SelectionChanged(inner.selection.clone()));
        self.transition(&mut inner, RecommendationState::Idle);
    }

    /// Switch engines. The current state is kept and nothing is fetched; an
    /// in-flight response for the other engine is discarded when it lands.
    pub fn set_engine(&self, engine: Engine) {
        let mut inner = self.inner.lock();
        if inner.selection.engine == engine {
            return;
        }
        inner.selection.engine = engine;
        info!(%engine, "engine switched");
        self.publish(OrchestratorEvent::SelectionChanged(inner.selection.clone()));
    }

    pub fn set_playstyle(&self, text: &str) {
        let mut inner = self.inner.lock();
        inner.selection.set_playstyle(text);
        self.publish(OrchestratorEvent::SelectionChanged(inner.selection.clone()));
    }

    /// Focus hint, forwarded to the rule-based engine only
    pub fn set_focus(&self, text: &str) {
        let mut inner = self.inner.lock();
        inner.selection.set_focus(text);
        self.publish(OrchestratorEvent::SelectionChanged(inner.selection.clone()));
    }

    /// Validate the selection and move to `Pending`.
    ///
    /// Fails with a validation error, without touching the state, when no
    /// hero is selected.
    pub fn begin_request(&self, mode: BuildMode) -> Result<Dispatch, AdvisorError> {
        let mut inner = self.inner.lock();
        let request = RecommendationRequest::from_selection(
            &inner.selection,
            mode,
            self.max_skills,
            self.max_items,
        )
        .ok_or_else(AdvisorError::no_hero_selected)?;

        if let RecommendationState::Pending(ticket) = inner.state {
            debug!(ticket = ticket.id, "request already pending, ignoring");
            return Ok(Dispatch::AlreadyPending);
        }

        inner.next_ticket += 1;
        let ticket = Ticket {
            id: inner.next_ticket,
            hero: request.hero_id,
            engine: request.engine,
        };
        info!(
            ticket = ticket.id,
            hero = %ticket.hero,
            engine = %ticket.engine,
            ?mode,
            "dispatching recommendation request"
        );
        self.transition(&mut inner, RecommendationState::Pending(ticket));
        Ok(Dispatch::Issued { ticket, request })
    }

    /// Apply a response. It only lands if `ticket` is still the pending one
    /// and still matches the selected hero and engine.
    pub fn complete(
        &self,
        ticket: Ticket,
        outcome: Result<RecommendationResult, AdvisorError>,
    ) -> RequestOutcome {
        let mut inner = self.inner.lock();

        let current = matches!(inner.state, RecommendationState::Pending(t) if t.id == ticket.id);
        if !current {
            debug!(ticket = ticket.id, "discarding response for superseded request");
            return RequestOutcome::Superseded;
        }

        let selection_matches = inner.selection.hero == Some(ticket.hero)
            && inner.selection.engine == ticket.engine;
        if !selection_matches {
            debug!(
                ticket = ticket.id,
                engine = %ticket.engine,
                selected = %inner.selection.engine,
                "engine changed while pending, discarding response"
            );
            self.transition(&mut inner, RecommendationState::Idle);
            return RequestOutcome::Superseded;
        }

        match outcome {
            Ok(result) => {
                let result = Arc::new(result);
                info!(
                    ticket = ticket.id,
                    skills = result.skills.len(),
                    items = result.items.len(),
                    "recommendation ready"
                );
                self.transition(&mut inner, RecommendationState::Ready(Arc::clone(&result)));
                RequestOutcome::Ready(result)
            }
            Err(err) => {
                warn!(ticket = ticket.id, error = %err, "recommendation failed");
                self.transition(&mut inner, RecommendationState::Failed(err.clone()));
                RequestOutcome::Failed(err)
            }
        }
    }

    /// Full build from the selected engine.
    ///
    /// `Err` only for validation failures; engine failures land in the state
    /// and come back as `RequestOutcome::Failed`.
    pub async fn request_recommendation(&self) -> Result<RequestOutcome, AdvisorError> {
        self.dispatch(BuildMode::Full).await
    }

    /// Condensed build from the selected engine's quick endpoint.
    pub async fn request_quick_recommendation(&self) -> Result<RequestOutcome, AdvisorError> {
        self.dispatch(BuildMode::Quick).await
    }

    async fn dispatch(&self, mode: BuildMode) -> Result<RequestOutcome, AdvisorError> {
        let (ticket, request) = match self.begin_request(mode)? {
            Dispatch::Issued { ticket, request } => (ticket, request),
            Dispatch::AlreadyPending => return Ok(RequestOutcome::AlreadyPending),
        };
        let outcome = self.api.fetch_recommendation(&request).await;
        Ok(self.complete(ticket, outcome))
    }

    fn transition(&self, inner: &mut Inner, next: RecommendationState) {
        if inner.state == next {
            return;
        }
        inner.state = next;
        self.publish(OrchestratorEvent::StateChanged(inner.state.clone()));
    }

    fn publish(&self, event: OrchestratorEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
