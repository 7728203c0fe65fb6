use std::path::PathBuf;

pub const BACKEND_URL_ENV_VAR: &str = "BACKEND_URL";
pub const DATA_DIR_ENV_VAR: &str = "DIET_PLANNER_DATA_DIR";
pub const LOCALE_ENV_VAR: &str = "DIET_PLANNER_LOCALE";
pub const LOG_LEVEL_ENV_VAR: &str = "DIET_PLANNER_LOG";
pub const CATALOG_ENV_VAR: &str = "DIET_PLANNER_CATALOG";

const DEFAULT_DATA_DIR: &str = ".diet_planner";
const DEFAULT_LOCALE: &str = "ru-RU";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Only needed by commands that talk to the backend.
    pub backend_url: Option<String>,
    pub data_dir: PathBuf,
    pub locale: String,
    pub log_level: String,
    /// CSV catalog replacing the embedded one.
    pub catalog_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            locale: DEFAULT_LOCALE.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            catalog_path: None,
        }
    }
}

impl AppConfig {
    /// Reads the process environment after loading `.env`, if any.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Self {
            backend_url: get(BACKEND_URL_ENV_VAR),
            data_dir: get(DATA_DIR_ENV_VAR).map(PathBuf::from).unwrap_or(defaults.data_dir),
            locale: get(LOCALE_ENV_VAR).unwrap_or(defaults.locale),
            log_level: get(LOG_LEVEL_ENV_VAR).unwrap_or(defaults.log_level),
            catalog_path: get(CATALOG_ENV_VAR).map(PathBuf::from),
        }
    }
}
