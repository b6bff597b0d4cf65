use std::time::Duration;

use crate::domain::types::SESSION_TTL_SECS;

/// Web service configuration loaded from environment variables.
#[derive(Debug)]
pub struct WebConfig {
    /// Database connection URL.
    pub database_url: String,
    /// Redis URL for session storage. Sessions stay in memory when unset.
    /// Env var: `REDIS_URL`.
    pub redis_url: Option<String>,
    /// TCP port for the HTTP server (default 8080). Env var: `WEB_PORT`.
    pub web_port: u16,
    /// Path prefix used when building redirect URLs (default empty).
    pub context_path: String,
    /// Directory holding `layout/` and `views/` templates (default `templates`).
    pub templates_dir: String,
    /// Employees per list page (default 15). Env var: `ROWS_PER_PAGE`.
    pub rows_per_page: u64,
    /// Idle lifetime of a session. Env var: `SESSION_TTL_SECS`.
    pub session_ttl: Duration,
    pub site_title: String,
    /// Administrator seeded into an empty employee table at startup.
    /// Env vars: `INITIAL_ADMIN_CODE`, `INITIAL_ADMIN_PASSWORD`, `INITIAL_ADMIN_NAME`.
    pub initial_admin: Option<InitialAdmin>,
}

#[derive(Debug)]
pub struct InitialAdmin {
    pub code: String,
    pub name: String,
    pub password: String,
}

impl WebConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            redis_url: std::env::var("REDIS_URL").ok().filter(|v| !v.is_empty()),
            web_port: parse_var("WEB_PORT").unwrap_or(8080),
            context_path: std::env::var("CONTEXT_PATH")
                .map(|v| v.trim_end_matches('/').to_owned())
                .unwrap_or_default(),
            templates_dir: std::env::var("TEMPLATES_DIR").unwrap_or_else(|_| "templates".into()),
            rows_per_page: parse_var("ROWS_PER_PAGE")
                .filter(|&n: &u64| n > 0)
                .unwrap_or(15),
            session_ttl: Duration::from_secs(
                parse_var("SESSION_TTL_SECS").unwrap_or(SESSION_TTL_SECS),
            ),
            site_title: std::env::var("SITE_TITLE").unwrap_or_else(|_| "Nippo".into()),
            initial_admin: initial_admin_from_env(),
        }
    }
}

fn initial_admin_from_env() -> Option<InitialAdmin> {
    let code = std::env::var("INITIAL_ADMIN_CODE").ok().filter(|v| !v.is_empty())?;
    let password = std::env::var("INITIAL_ADMIN_PASSWORD").ok().filter(|v| !v.is_empty())?;
    Some(InitialAdmin {
        code,
        name: std::env::var("INITIAL_ADMIN_NAME").unwrap_or_else(|_| "Administrator".into()),
        password,
    })
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
