//! Catalog access over HTTP

mod support;

use advisor_client::{AdvisorApi, CatalogLoader, CatalogState, HttpAdvisorApi};
use advisor_core::{present_heroes, AdvisorConfig, AdvisorError, HeroId};
use std::sync::Arc;
use support::{spawn_fixture, spawn_fixture_with_catalog_failures, unreachable_base_url};

#[tokio::test]
async fn test_list_heroes_in_service_order() {
    let fixture = spawn_fixture().await;
    let mut catalog = CatalogLoader::new(fixture.api());

    let heroes = catalog.load().await.unwrap();
    let ids: Vec<u32> = heroes.iter().map(|h| h.id.0).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(heroes[0].image_url.as_deref(), Some("/img/rehan.png"));
    assert_eq!(heroes[1].description, None);

    let cards = present_heroes(catalog.heroes(), Some(HeroId(2)));
    assert_eq!(cards.iter().filter(|c| c.selected).count(), 1);
    assert!(cards[1].selected);
    assert_eq!(fixture.hits(), vec!["/api/heroes"]);
}

#[tokio::test]
async fn test_get_hero_and_not_found() {
    let fixture = spawn_fixture().await;
    let api = fixture.api();

    let hero = api.get_hero(HeroId(3)).await.unwrap();
    assert_eq!(hero.name, "Youga");

    let err = api.get_hero(HeroId(42)).await.unwrap_err();
    assert_eq!(
        err,
        AdvisorError::server("catalog", 404, "Hero with id 42 not found")
    );
}

#[tokio::test]
async fn test_reference_lists() {
    let fixture = spawn_fixture().await;
    let api = fixture.api();

    let skills = api.list_skills().await.unwrap();
    assert_eq!(skills.len(), 2);
    assert_eq!(skills[0].skill_type, "Attack");
    assert_eq!(skills[1].cooldown, None);

    let items = api.list_items().await.unwrap();
    assert_eq!(items[1].set_name.as_deref(), Some("Cinder Set"));
}

#[tokio::test]
async fn test_unreachable_catalog_offers_retry() {
    let config = AdvisorConfig {
        api_base_url: unreachable_base_url(),
        request_timeout_secs: 5,
        ..AdvisorConfig::default()
    };
    let api = Arc::new(HttpAdvisorApi::new(&config).unwrap());
    let mut catalog = CatalogLoader::new(api);

    let err = catalog.load().await.unwrap_err();
    assert!(err.is_retryable());
    assert!(err.to_string().starts_with("catalog: network error"));
    assert!(catalog.can_retry());
    assert!(matches!(catalog.state(), CatalogState::Failed(_)));

    catalog.retry().await.unwrap_err();
    assert_eq!(catalog.attempts(), 2);
}

#[tokio::test]
async fn test_retry_reissues_identical_fetch() {
    let fixture = spawn_fixture_with_catalog_failures(1).await;
    let mut catalog = CatalogLoader::new(fixture.api());

    let err = catalog.load().await.unwrap_err();
    assert_eq!(
        err,
        AdvisorError::server("catalog", 503, "catalog warming up")
    );
    assert!(catalog.can_retry());

    let heroes = catalog.retry().await.unwrap();
    assert_eq!(heroes.len(), 3);
    assert!(!catalog.can_retry());
    assert_eq!(fixture.hits(), vec!["/api/heroes", "/api/heroes"]);
}
