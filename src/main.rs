//! contest-cache - Ongoing and upcoming programming contests
//!
//! Prints the contest listing for all supported platforms, or for the ones
//! given with `--platform`, served through the contest cache.

use std::collections::BTreeMap;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use futures::future::try_join_all;
use tracing::{error, info};

use contest_cache::cache::{CacheError, CacheStore, FileStore, RedisStore};
use contest_cache::cli::{Cli, Query};
use contest_cache::config::Config;
use contest_cache::contests::{ContestError, ContestService};
use contest_cache::data::{ClistClient, ContestResult};
use contest_cache::display::render_table;
use contest_cache::logging::setup_logging;

/// Picks Redis when configured, otherwise the on-disk store
async fn build_store(config: &Config) -> Result<Arc<dyn CacheStore>, CacheError> {
    if let Some(url) = &config.redis_url {
        return Ok(Arc::new(RedisStore::connect(url).await?));
    }

    let store = match &config.cache_dir {
        Some(dir) => FileStore::with_dir(dir.clone()),
        None => FileStore::new()
            .unwrap_or_else(|| FileStore::with_dir(std::env::temp_dir().join("contest-cache"))),
    };
    info!(dir = %store.cache_dir().display(), "using file cache store");
    Ok(Arc::new(store))
}

/// Runs the query, returning one listing per requested view
async fn fetch_views(
    service: &ContestService,
    query: &Query,
) -> Result<Vec<(String, ContestResult)>, ContestError> {
    if query.platforms.is_empty() {
        let all = service.get_all_contests().await?;
        return Ok(vec![("all platforms".to_string(), all)]);
    }

    try_join_all(query.platforms.iter().map(|platform| async move {
        let result = service.get_contests_for_platform(platform.as_str()).await?;
        Ok::<_, ContestError>((platform.to_string(), result))
    }))
    .await
}

fn print_views(views: Vec<(String, ContestResult)>, json: bool) -> Result<(), serde_json::Error> {
    if !json {
        let tables: Vec<String> = views
            .iter()
            .map(|(heading, result)| render_table(heading, result))
            .collect();
        println!("{}", tables.join("\n"));
        return Ok(());
    }

    let output = if views.len() == 1 && views[0].0 == "all platforms" {
        serde_json::to_string_pretty(&views[0].1)?
    } else {
        let by_platform: BTreeMap<String, ContestResult> = views.into_iter().collect();
        serde_json::to_string_pretty(&by_platform)?
    };
    println!("{}", output);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Validate arguments before touching config, cache or network
    let query = match Query::from_cli(&cli) {
        Ok(query) => query,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    setup_logging(&config, cli.tracing);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        platforms = ?query.platforms,
        "starting contest-cache"
    );

    let store = match build_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "failed to open cache store");
            return ExitCode::FAILURE;
        }
    };

    let source = match ClistClient::with_timeout(config.clist_key.clone(), config.fetch_timeout()) {
        Ok(client) => client.with_base_url(config.clist_url.clone()),
        Err(e) => {
            error!(error = %e, "failed to build http client");
            return ExitCode::FAILURE;
        }
    };

    // Several platform views are served from one listing; share its refresh
    let coalesce = config.coalesce_misses || query.platforms.len() > 1;
    let service = ContestService::new(store, Arc::new(source))
        .with_ttl(config.cache_ttl())
        .with_coalesced_misses(coalesce);

    let views = match fetch_views(&service, &query).await {
        Ok(views) => views,
        Err(e) => {
            error!(error = %e, "contest query failed");
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = print_views(views, query.json) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
