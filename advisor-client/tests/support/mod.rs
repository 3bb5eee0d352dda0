//! In-process fixture of the advisor service
//!
//! Serves the catalog and both engines' endpoints on an ephemeral port and
//! records every request's path and query so tests can assert on what the
//! gateway actually sent.
//!
//! Hero 98 answers every engine endpoint with a payload missing
//! `build_summary`; hero 99 answers with HTTP 500.

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use advisor_client::HttpAdvisorApi;
use advisor_core::{AdvisorConfig, Engine};

pub const MALFORMED_HERO: u32 = 98;
pub const FAILING_HERO: u32 = 99;

#[derive(Clone, Default)]
struct FixtureState {
    hits: Arc<Mutex<Vec<String>>>,
    /// `/heroes` answers 503 while this is above zero
    catalog_failures: Arc<AtomicUsize>,
}

impl FixtureState {
    fn record(&self, uri: &Uri) {
        let hit = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string());
        self.hits.lock().push(hit);
    }
}

pub struct Fixture {
    pub base_url: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl Fixture {
    /// Every request received so far, as `path?query`
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().clone()
    }

    pub fn recommendation_hits(&self) -> Vec<String> {
        self.hits()
            .into_iter()
            .filter(|h| h.starts_with("/api/recommendations"))
            .collect()
    }

    pub fn config(&self, engine: Engine) -> AdvisorConfig {
        AdvisorConfig {
            api_base_url: self.base_url.clone(),
            request_timeout_secs: 5,
            default_engine: engine,
            ..AdvisorConfig::default()
        }
    }

    pub fn api(&self) -> Arc<HttpAdvisorApi> {
        Arc::new(HttpAdvisorApi::new(&self.config(Engine::Ai)).unwrap())
    }
}

pub async fn spawn_fixture() -> Fixture {
    spawn_fixture_with_catalog_failures(0).await
}

/// Fixture whose hero list fails `failures` times before answering.
pub async fn spawn_fixture_with_catalog_failures(failures: usize) -> Fixture {
    let state = FixtureState::default();
    state.catalog_failures.store(failures, Ordering::SeqCst);
    let hits = Arc::clone(&state.hits);

    let app = Router::new()
        .route("/api/heroes", get(list_heroes))
        .route("/api/heroes/{id}", get(get_hero))
        .route("/api/skills", get(list_skills))
        .route("/api/items", get(list_items))
        .route("/api/recommendations/build/{id}", get(rule_build))
        .route("/api/recommendations/quick/{id}", get(rule_quick))
        .route("/api/recommendations/ai/build/{id}", get(ai_build))
        .route("/api/recommendations/ai/quick/{id}", get(ai_quick))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Fixture {
        base_url: format!("http://{}/api", addr),
        hits,
    }
}

/// Base URL of a port nothing listens on
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}

// ============================================================================
// Catalog
// ============================================================================

fn heroes() -> Value {
    json!([
        {"id": 1, "name": "Rehan", "talent": "Anger", "god_type": "Might",
         "image_url": "/img/rehan.png", "popularity_score": 8.7},
        {"id": 2, "name": "Carrie", "talent": "Seven Weapons", "god_type": "Might"},
        {"id": 3, "name": "Youga", "talent": "Spacetime Illusion", "god_type": "Wisdom",
         "description": "Bends time around her summons"}
    ])
}

async fn list_heroes(State(state): State<FixtureState>, uri: Uri) -> Response {
    state.record(&uri);
    let failing = state
        .catalog_failures
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if failing {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"detail": "catalog warming up"})),
        )
            .into_response();
    }
    Json(heroes()).into_response()
}

async fn get_hero(State(state): State<FixtureState>, Path(id): Path<u32>, uri: Uri) -> Response {
    state.record(&uri);
    let found = heroes()
        .as_array()
        .and_then(|all| all.iter().find(|h| h["id"] == id).cloned());
    match found {
        Some(hero) => Json(hero).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": format!("Hero with id {} not found", id)})),
        )
            .into_response(),
    }
}

async fn list_skills(State(state): State<FixtureState>, uri: Uri) -> Json<Value> {
    state.record(&uri);
    Json(json!([
        {"id": 10, "name": "Flame Slash", "type": "Attack", "damage_type": "Fire",
         "cooldown": 2.5, "mana_cost": 20},
        {"id": 11, "name": "Frost Nova", "type": "Spell", "tags": "Area, Cold"}
    ]))
}

async fn list_items(State(state): State<FixtureState>, uri: Uri) -> Json<Value> {
    state.record(&uri);
    Json(json!([
        {"id": 100, "name": "Ember Blade", "type": "Weapon", "slot": "Main Hand",
         "rarity": "Legendary"},
        {"id": 101, "name": "Ashen Helm", "type": "Armor", "slot": "Helmet",
         "set_name": "Cinder Set"}
    ]))
}

// ============================================================================
// Engines
// ============================================================================

fn special_case(id: u32) -> Option<Response> {
    match id {
        FAILING_HERO => Some(
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "Recommendation failed: boom"})),
            )
                .into_response(),
        ),
        MALFORMED_HERO => Some(
            Json(json!({"hero_name": "Broken", "talent_name": "None",
                        "hero_talent": "None", "build_type": "Melee"}))
            .into_response(),
        ),
        _ => None,
    }
}

async fn rule_build(State(state): State<FixtureState>, Path(id): Path<u32>, uri: Uri) -> Response {
    state.record(&uri);
    if let Some(response) = special_case(id) {
        return response;
    }
    Json(json!({
        "hero_name": "Rehan",
        "hero_talent": "Anger",
        "build_type": "Melee",
        "primary_stat": "Strength",
        "build_summary": "Close-range burn build.",
        "recommended_skills": [
            {"skill_id": 10, "skill_name": "Flame Slash", "skill_type": "Attack",
             "damage_type": "Fire", "is_dot": true, "score": 9.4,
             "reason": "Applies Ignite", "priority": 1},
            {"skill_id": 12, "skill_name": "Whirlwind", "skill_type": "Attack",
             "is_combo": true, "score": 8.1, "priority": "2"},
            {"skill_id": 13, "skill_name": "Rage Burst", "skill_type": "Spell",
             "is_spell_burst_compatible": true, "score": 7.5}
        ],
        "recommended_items": [
            {"item_id": 100, "item_name": "Ember Blade", "slot": "Main Hand",
             "rarity": "Legendary", "score": 9.0},
            {"item_id": 101, "item_name": "Ashen Helm", "slot": "Helmet",
             "set_name": "Cinder Set", "score": 7.2},
            {"item_id": 102, "item_name": "Cinder Plate", "slot": "Chest",
             "set_name": "Cinder Set", "score": 7.0},
            {"item_id": 103, "item_name": "Burning Band", "slot": "Ring", "score": 6.4},
            {"item_id": 104, "item_name": "Char Boots", "slot": "Feet", "score": 5.9}
        ],
        "synergy_score": 81.6
    }))
    .into_response()
}

async fn rule_quick(State(state): State<FixtureState>, Path(id): Path<u32>, uri: Uri) -> Response {
    state.record(&uri);
    if let Some(response) = special_case(id) {
        return response;
    }
    Json(json!({
        "hero_name": "Rehan",
        "talent": "Anger",
        "build_type": "Melee",
        "build_summary": "Close-range burn build.",
        "top_skills": [{"name": "Flame Slash", "type": "Attack", "priority": 1}],
        "top_items": [{"name": "Ember Blade", "slot": "Main Hand", "rarity": "Legendary"}]
    }))
    .into_response()
}

async fn ai_build(State(state): State<FixtureState>, Path(id): Path<u32>, uri: Uri) -> Response {
    state.record(&uri);
    if let Some(response) = special_case(id) {
        return response;
    }
    Json(json!({
        "hero_name": "Rehan",
        "talent_name": "Anger",
        "build_type": "Melee",
        "build_summary": "Stack Rage and cash it in with burst windows.",
        "recommended_skills": [
            {"skill_name": "Flame Slash", "priority": 1, "reason": "Core damage"},
            {"skill_name": "Whirlwind", "priority": 2}
        ],
        "recommended_items": [
            {"item_name": "Ember Blade", "slot": "Main Hand", "reason": "Fire scaling"}
        ],
        "synergy_explanation": "Ignite stacks amplify Whirlwind's final hit.",
        "playstyle_tips": ["Open with Flame Slash", "Save Whirlwind for groups"],
        "ai_metadata": {"model": "gpt-4o-mini", "tokens_used": 1200,
                        "prompt_tokens": 900, "completion_tokens": 300}
    }))
    .into_response()
}

async fn ai_quick(State(state): State<FixtureState>, Path(id): Path<u32>, uri: Uri) -> Response {
    state.record(&uri);
    if let Some(response) = special_case(id) {
        return response;
    }
    Json(json!({
        "hero_name": "Rehan",
        "talent_name": "Anger",
        "build_type": "Melee",
        "build_summary": "Rage in, burst out.",
        "recommended_skills": [{"skill_name": "Flame Slash", "priority": 1}],
        "tokens_used": 450
    }))
    .into_response()
}
