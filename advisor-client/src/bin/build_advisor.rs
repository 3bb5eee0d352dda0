//! Build Advisor terminal front-end
//!
//! Loads the hero catalog, optionally selects a hero and prints a build
//! recommendation from the chosen engine.
//!
//! Usage:
//!   build_advisor --url http://localhost:8000/api
//!   build_advisor --hero Rehan --engine rule-based --playstyle "Fire, DoT" --focus dot
//!   build_advisor --hero 3 --engine ai --quick --json
//!
//! Environment: ADVISOR_API_URL, ADVISOR_TIMEOUT_SECS, ADVISOR_ENGINE,
//! ADVISOR_MAX_SKILLS, ADVISOR_MAX_ITEMS, RUST_LOG. Flags win over env.

use anyhow::{anyhow, bail, Context};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use advisor_client::{AdvisorApi, CatalogLoader, HttpAdvisorApi, Orchestrator, RequestOutcome};
use advisor_core::logging::{self, LogLevel, TracingConfig};
use advisor_core::{present, present_heroes, AdvisorConfig, AdvisorError, Engine};

const DEFAULT_RETRIES: u32 = 2;
const RETRY_BACKOFF_MS: u64 = 500;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        print_usage();
        return Ok(());
    }

    let level = parse_str_arg(&args, "--log-level")
        .and_then(|s| s.parse::<LogLevel>().ok())
        .unwrap_or(LogLevel::Warn);
    logging::init_tracing(&TracingConfig::with_level(level));

    let config = apply_args(AdvisorConfig::from_env(), &args)?;
    let retries: u32 = parse_num_arg(&args, "--retries").unwrap_or(DEFAULT_RETRIES);
    let json = has_flag(&args, "--json");
    info!(url = %config.api_base_url, engine = %config.default_engine, "starting build advisor");

    let api = Arc::new(HttpAdvisorApi::new(&config)?);

    if has_flag(&args, "--skills") {
        let skills = api_list(api.list_skills().await)?;
        for skill in &skills {
            println!("{:>4}  {:<28} {}", skill.id, skill.name, skill.skill_type);
        }
        return Ok(());
    }
    if has_flag(&args, "--items") {
        let items = api_list(api.list_items().await)?;
        for item in &items {
            println!(
                "{:>4}  {:<28} {:<12} {}",
                item.id,
                item.name,
                item.slot,
                item.rarity.as_deref().unwrap_or("-")
            );
        }
        return Ok(());
    }

    let mut catalog = CatalogLoader::new(Arc::clone(&api));
    let mut loaded = catalog.load().await.map(|heroes| heroes.len());
    let mut attempt = 0;
    while let Err(err) = &loaded {
        if !err.is_retryable() || attempt >= retries {
            return Err(anyhow!(err.clone())).context("could not load the hero catalog");
        }
        attempt += 1;
        warn!(attempt, retries, error = %err, "retrying catalog load");
        tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS * attempt as u64)).await;
        loaded = catalog.retry().await.map(|heroes| heroes.len());
    }

    let Some(query) = parse_str_arg(&args, "--hero") else {
        for card in present_heroes(catalog.heroes(), None) {
            println!("{}", card);
        }
        return Ok(());
    };

    let hero = catalog
        .find(&query)
        .cloned()
        .ok_or_else(|| anyhow!("unknown hero: {}", query))?;
    if !json {
        for card in present_heroes(catalog.heroes(), Some(hero.id)) {
            println!("{}", card);
        }
        println!();
    }

    let orchestrator = Orchestrator::new(api, &config);
    orchestrator.select_hero(hero.id);
    orchestrator.set_engine(config.default_engine);
    if let Some(playstyle) = parse_str_arg(&args, "--playstyle") {
        orchestrator.set_playstyle(&playstyle);
    }
    if let Some(focus) = parse_str_arg(&args, "--focus") {
        orchestrator.set_focus(&focus);
    }

    let outcome = if has_flag(&args, "--quick") {
        orchestrator.request_quick_recommendation().await?
    } else {
        orchestrator.request_recommendation().await?
    };

    match outcome {
        RequestOutcome::Ready(result) => {
            let view = present(&result);
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", view);
            }
            Ok(())
        }
        RequestOutcome::Failed(err) => Err(anyhow!(err)).context("recommendation failed"),
        RequestOutcome::Superseded | RequestOutcome::AlreadyPending => {
            bail!("recommendation request did not complete")
        }
    }
}

fn api_list<T>(result: Result<Vec<T>, AdvisorError>) -> anyhow::Result<Vec<T>> {
    result.context("catalog request failed")
}

/// Overlay `--url`, `--engine`, `--max-skills`, `--max-items` and `--timeout`.
fn apply_args(mut config: AdvisorConfig, args: &[String]) -> anyhow::Result<AdvisorConfig> {
    if let Some(url) = parse_str_arg(args, "--url") {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(engine) = parse_str_arg(args, "--engine") {
        config.default_engine = engine.parse::<Engine>()?;
    }
    if let Some(max_skills) = parse_num_arg(args, "--max-skills") {
        config.max_skills = max_skills;
    }
    if let Some(max_items) = parse_num_arg(args, "--max-items") {
        config.max_items = max_items;
    }
    if let Some(timeout) = parse_num_arg(args, "--timeout") {
        config.request_timeout_secs = timeout;
    }
    Ok(config)
}

fn print_usage() {
    println!("build_advisor - hero build recommendations");
    println!();
    println!("  --url <base>           API base URL (default http://127.0.0.1:8000/api)");
    println!("  --hero <id|name>       hero to recommend for; omit to list heroes");
    println!("  --engine <rule-based|ai>");
    println!("  --playstyle <text>     forwarded verbatim to either engine");
    println!("  --focus <text>         rule-based engine only");
    println!("  --max-skills <n>       1-10");
    println!("  --max-items <n>        1-20");
    println!("  --quick                condensed build");
    println!("  --json                 print the view model as JSON");
    println!("  --retries <n>          catalog retries on network failure (default 2)");
    println!("  --timeout <secs>       per-request timeout");
    println!("  --skills | --items     list reference data and exit");
    println!("  --log-level <level>    trace|debug|info|warn|error");
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_num_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    parse_str_arg(args, flag).and_then(|v| v.parse().ok())
}
