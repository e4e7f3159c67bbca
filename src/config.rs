use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

// Default configuration constants
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_API_BASE_URL: &str = "";
pub const DEFAULT_API_TOKEN: &str = "";
pub const SESSION_COOKIE: &str = "vmquote_session";
pub const DEFAULT_SESSION_IDLE_MINUTES: u64 = 120;
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

pub fn get_api_base_url() -> String {
    sanitize_base_url(&env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()))
}

pub fn get_api_token() -> String {
    env::var("API_TOKEN").unwrap_or_else(|_| DEFAULT_API_TOKEN.to_string())
}

/// Offline catalog used instead of the backend product listing.
pub fn get_catalog_file() -> Option<PathBuf> {
    optional_path("CATALOG_FILE")
}

/// Offline VM templates used instead of the backend template listing.
pub fn get_templates_file() -> Option<PathBuf> {
    optional_path("TEMPLATES_FILE")
}

/// Idle time after which a quote session is dropped (`SESSION_IDLE_MINUTES`).
pub fn get_session_idle_ttl() -> Duration {
    let minutes = env::var("SESSION_IDLE_MINUTES")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|m| *m > 0)
        .unwrap_or(DEFAULT_SESSION_IDLE_MINUTES);
    Duration::from_secs(minutes * 60)
}

/// Most quote sessions kept in memory at once (`MAX_SESSIONS`).
pub fn get_max_sessions() -> usize {
    env::var("MAX_SESSIONS")
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_MAX_SESSIONS)
}

fn optional_path(var: &str) -> Option<PathBuf> {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

pub fn sanitize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "http://localhost:5000".to_string()
    } else {
        trimmed.to_string()
    }
}
