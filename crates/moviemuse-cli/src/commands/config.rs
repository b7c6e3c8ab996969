use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::Input;
use serde_json::json;

use super::AppContext;
use crate::output::Output;

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        "(not set)".to_string()
    } else if secret.len() <= 4 {
        "****".to_string()
    } else {
        match secret.get(..4) {
            Some(prefix) => format!("{}****", prefix),
            None => "****".to_string(),
        }
    }
}

pub async fn run_show(full: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let config = &ctx.config;

    let tmdb_key = if full {
        config.catalog.tmdb_api_key.clone()
    } else {
        mask(&config.catalog.tmdb_api_key)
    };
    let omdb_key = if full {
        config.catalog.omdb_api_key.clone()
    } else {
        mask(&config.catalog.omdb_api_key)
    };

    if output.is_human() {
        output.info(format!("config file: {:?}", ctx.paths.config_file()));
        output.info(format!("tmdb_api_key = {}", tmdb_key));
        output.info(format!("omdb_api_key = {}", omdb_key));
        output.info(format!("language = {}", config.catalog.language));
        output.info(format!("backend.base_url = {}", config.backend.base_url));
        output.info(format!(
            "search: debounce {} ms, spinner delay {} ms, min query length {}",
            config.search.debounce_ms, config.search.spinner_delay_ms, config.search.min_query_len
        ));
        output.info(format!(
            "cache: query TTL {} min, feed TTL {} min",
            config.cache.query_ttl_minutes, config.cache.feed_ttl_minutes
        ));
        match ctx.session.username() {
            Some(username) if ctx.session.is_valid() => {
                output.info(format!("session: logged in as {}", username))
            }
            Some(username) => output.info(format!("session: expired (was {})", username)),
            None => output.info("session: not logged in"),
        }
    } else {
        output.json(&json!({
            "tmdb_api_key": tmdb_key,
            "omdb_api_key": omdb_key,
            "language": config.catalog.language,
            "backend_base_url": config.backend.base_url,
            "logged_in": ctx.session.is_valid(),
        }));
    }
    Ok(())
}

pub async fn run_init(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut config = ctx.config;

    let tmdb_api_key: String = Input::new()
        .with_prompt("TMDB API key")
        .with_initial_text(config.catalog.tmdb_api_key.clone())
        .allow_empty(true)
        .interact_text()
        .map_err(|e| eyre!("{}", e))?;
    let omdb_api_key: String = Input::new()
        .with_prompt("OMDB API key")
        .with_initial_text(config.catalog.omdb_api_key.clone())
        .allow_empty(true)
        .interact_text()
        .map_err(|e| eyre!("{}", e))?;
    let base_url: String = Input::new()
        .with_prompt("Backend URL")
        .with_initial_text(config.backend.base_url.clone())
        .interact_text()
        .map_err(|e| eyre!("{}", e))?;

    config.catalog.tmdb_api_key = tmdb_api_key;
    config.catalog.omdb_api_key = omdb_api_key;
    config.backend.base_url = base_url;
    config
        .save(&ctx.paths.config_file())
        .map_err(|e| eyre!("{:#}", e))?;

    output.success(format!("Saved {:?}", ctx.paths.config_file()));
    Ok(())
}
