use std::path::PathBuf;

pub const WORKSPACE_ENV: &str = "CENTERD_WORKSPACE";
pub const LOG_ENV: &str = "CENTERD_LOG";
const DEFAULT_LOG_FILTER: &str = "info";

/// Process-level settings. Everything workspace-specific lives in the
/// workspace `settings` table instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub workspace: Option<PathBuf>,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let workspace = non_blank(WORKSPACE_ENV).map(PathBuf::from);
        let log_filter = non_blank(LOG_ENV)
            .or_else(|| non_blank("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        Config {
            workspace,
            log_filter,
        }
    }
}
