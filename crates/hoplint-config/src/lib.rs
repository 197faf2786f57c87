use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Simple configuration for hoplint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub probe: ProbeConfig,

    #[serde(default)]
    pub suggestions: SuggestionConfig,

    #[serde(default)]
    pub declaration: DeclarationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra attempts after a transport failure (HTTP errors never retry).
    #[serde(default)]
    pub retries: u32,

    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    #[serde(default = "default_budget_bytes")]
    pub budget_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclarationConfig {
    #[serde(default = "default_declaration_path")]
    pub well_known_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            probe: ProbeConfig::default(),
            suggestions: SuggestionConfig::default(),
            declaration: DeclarationConfig::default(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            retries: 0,
            concurrency: default_concurrency(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            budget_bytes: default_budget_bytes(),
        }
    }
}

impl Default for DeclarationConfig {
    fn default() -> Self {
        Self {
            well_known_path: default_declaration_path(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_concurrency() -> usize {
    8
}

fn default_user_agent() -> String {
    format!("hoplint/{}", env!("CARGO_PKG_VERSION"))
}

fn default_budget_bytes() -> usize {
    400 * 1024
}

fn default_declaration_path() -> String {
    "/redirects.json".to_string()
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            // Create default config file
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(&path, content)?;
            Ok(config)
        }
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "hoplint", "hoplint") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.hoplint/config.toml")
        }
    }
}
