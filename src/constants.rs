// src/constants.rs
//
// Application-wide constants shared by the domain model and the HTTP clients.

/// Sentinel monthly limit meaning "no quota".
///
/// The auth service reports it as `monthlyLimit: -1` for unlimited plans.
pub const UNLIMITED: i64 = -1;

/// Default base URL of the tag-generation service.
pub const DEFAULT_NLP_URL: &str = "http://localhost:8000";

/// Default base URL of the auth/billing service.
pub const DEFAULT_AUTH_URL: &str = "http://localhost:3001";

/// Request timeout for tag generation, in seconds.
///
/// Generation runs an NLP pipeline server-side and is noticeably slower than
/// the auth calls.
pub const NLP_TIMEOUT_SECS: u64 = 20;

/// Request timeout for auth, usage and admin calls, in seconds.
pub const AUTH_TIMEOUT_SECS: u64 = 10;

/// Environment variable overriding the tag-generation base URL.
pub const ENV_NLP_URL: &str = "TAGSMITH_API_URL";

/// Environment variable overriding the auth base URL.
pub const ENV_AUTH_URL: &str = "TAGSMITH_AUTH_API_URL";

/// Directory name below the platform config/data dirs.
pub const APP_DIR: &str = "tagsmith";

pub const CONFIG_FILE: &str = "config.toml";
pub const SESSION_FILE: &str = "session.json";
pub const WORKSPACE_FILE: &str = "workspace.json";
