use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let env = parse_environment(&or_default("CREATORLENS_ENV", "development"));

    let bind_addr: SocketAddr = parse_as(
        "CREATORLENS_BIND_ADDR",
        &or_default("CREATORLENS_BIND_ADDR", "0.0.0.0:8000"),
    )?;
    let log_level = or_default("CREATORLENS_LOG_LEVEL", "info");
    let cors_origins = parse_origins(&or_default(
        "CREATORLENS_CORS_ORIGINS",
        "http://localhost:5173",
    ));
    let competitors_path = PathBuf::from(or_default(
        "CREATORLENS_COMPETITORS_PATH",
        "./config/competitors.yaml",
    ));

    let http_timeout_secs: u64 = parse_as(
        "CREATORLENS_HTTP_TIMEOUT_SECS",
        &or_default("CREATORLENS_HTTP_TIMEOUT_SECS", "30"),
    )?;
    let user_agent = or_default(
        "CREATORLENS_USER_AGENT",
        "creatorlens/0.1 (social-analytics)",
    );
    let apify_base_url = or_default("CREATORLENS_APIFY_BASE_URL", "https://api.apify.com/v2");
    let youtube_base_url = or_default(
        "CREATORLENS_YOUTUBE_BASE_URL",
        "https://www.googleapis.com/youtube/v3",
    );

    let scrape_poll_interval_secs: u64 = parse_as(
        "CREATORLENS_SCRAPE_POLL_INTERVAL_SECS",
        &or_default("CREATORLENS_SCRAPE_POLL_INTERVAL_SECS", "5"),
    )?;
    let scrape_max_polls: u32 = parse_as(
        "CREATORLENS_SCRAPE_MAX_POLLS",
        &or_default("CREATORLENS_SCRAPE_MAX_POLLS", "60"),
    )?;
    let scrape_results_limit: u32 = parse_as(
        "CREATORLENS_SCRAPE_RESULTS_LIMIT",
        &or_default("CREATORLENS_SCRAPE_RESULTS_LIMIT", "100"),
    )?;

    let competitor_batch_size: usize = parse_as(
        "CREATORLENS_COMPETITOR_BATCH_SIZE",
        &or_default("CREATORLENS_COMPETITOR_BATCH_SIZE", "10"),
    )?;
    if competitor_batch_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "CREATORLENS_COMPETITOR_BATCH_SIZE".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let competitor_batch_delay_ms: u64 = parse_as(
        "CREATORLENS_COMPETITOR_BATCH_DELAY_MS",
        &or_default("CREATORLENS_COMPETITOR_BATCH_DELAY_MS", "3000"),
    )?;
    let competitor_reel_target: usize = parse_as(
        "CREATORLENS_COMPETITOR_REEL_TARGET",
        &or_default("CREATORLENS_COMPETITOR_REEL_TARGET", "100"),
    )?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        cors_origins,
        competitors_path,
        http_timeout_secs,
        user_agent,
        apify_base_url,
        youtube_base_url,
        scrape_poll_interval_secs,
        scrape_max_polls,
        scrape_results_limit,
        competitor_batch_size,
        competitor_batch_delay_ms,
        competitor_reel_target,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_as<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
