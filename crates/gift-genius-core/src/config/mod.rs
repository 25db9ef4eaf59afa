use crate::error::{GiftError, Result};
use crate::i18n::{Budget, Occasion};
use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GiftGeniusConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Generative backend settings. There is no timeout or retry knob: every
/// call is a single attempt with the transport's defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub env_var: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            api_key: None,
            base_url: None,
            env_var: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for history, saved items and preferences.
    /// Defaults to `~/.local/share/gift-genius` (platform data dir).
    #[serde(default)]
    pub path: Option<String>,
}

impl StorageConfig {
    pub fn resolved_path(&self) -> PathBuf {
        match self.path.as_deref() {
            Some(p) if !p.is_empty() => PathBuf::from(p),
            _ => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("gift-genius"),
        }
    }
}

/// Option keys used when the caller does not pick one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_occasion")]
    pub occasion: String,
    #[serde(default = "default_budget")]
    pub budget: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            occasion: default_occasion(),
            budget: default_budget(),
        }
    }
}

impl DefaultsConfig {
    pub fn occasion(&self) -> Occasion {
        Occasion::from_key(&self.occasion).unwrap_or_default()
    }

    pub fn budget(&self) -> Budget {
        Budget::from_key(&self.budget).unwrap_or_default()
    }
}

// -- Defaults --

fn default_llm_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_occasion() -> String {
    Occasion::default().key().to_string()
}
fn default_budget() -> String {
    Budget::default().key().to_string()
}

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Env vars checked for the API key, in order, when `llm.env_var` is unset.
pub const DEFAULT_API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

impl GiftGeniusConfig {
    /// Load configuration with three-layer TOML merge:
    /// 1. ~/.config/gift-genius/config.toml (global)
    /// 2. .gift-genius/config.toml (project)
    /// 3. .gift-genius/config.local.toml (local, gitignored)
    pub fn load(project_dir: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(dir) = project_dir {
            let project_config = dir.join(".gift-genius").join("config.toml");
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }

            let local_config = dir.join(".gift-genius").join("config.local.toml");
            if local_config.exists() {
                builder = builder.add_source(File::from(local_config).required(false));
            }
        }

        let config = builder
            .build()
            .map_err(|e| GiftError::Config(e.to_string()))?;

        let mut cfg: Self = config
            .try_deserialize()
            .map_err(|e| GiftError::Config(e.to_string()))?;

        cfg.validate();
        Ok(cfg)
    }

    /// Load with defaults only (no files).
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Validate config values, resetting bad ones and logging warnings.
    /// Lenient: it fixes values rather than rejecting the config.
    pub fn validate(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.llm.model.trim().is_empty() {
            warnings.push(format!(
                "llm.model is empty, using '{}'",
                default_llm_model()
            ));
            self.llm.model = default_llm_model();
        }

        if let Err(e) = Occasion::from_key(&self.defaults.occasion) {
            warnings.push(format!("defaults.occasion: {e}, using '{}'", default_occasion()));
            self.defaults.occasion = default_occasion();
        }

        if let Err(e) = Budget::from_key(&self.defaults.budget) {
            warnings.push(format!("defaults.budget: {e}, using '{}'", default_budget()));
            self.defaults.budget = default_budget();
        }

        for w in &warnings {
            tracing::warn!("config: {}", w);
        }

        warnings
    }
}

/// Resolve the API key from config, a custom env var, or the default env vars.
pub fn resolve_api_key(config: &LlmConfig) -> Result<String> {
    if let Some(ref key) = config.api_key {
        if !key.is_empty() {
            return Ok(key.clone());
        }
    }

    if let Some(ref env_var) = config.env_var {
        return std::env::var(env_var).map_err(|_| {
            GiftError::Config(format!(
                "Gemini backend requires an API key (set llm.api_key or {env_var})"
            ))
        });
    }

    DEFAULT_API_KEY_ENV_VARS
        .iter()
        .find_map(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
        .ok_or_else(|| {
            GiftError::Config(format!(
                "Gemini backend requires an API key (set llm.api_key or {})",
                DEFAULT_API_KEY_ENV_VARS.join(" / ")
            ))
        })
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("gift-genius").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GiftGeniusConfig::default_config();
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert!(config.llm.api_key.is_none());
        assert_eq!(config.defaults.occasion, "birthday");
        assert_eq!(config.defaults.budget, "range100_500");
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn test_load_config_no_files() {
        let config = GiftGeniusConfig::load(Some(Path::new("/nonexistent/path"))).unwrap();
        assert!(!config.llm.model.is_empty());
    }

    #[test]
    fn test_load_project_and_local_layers() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_dir = dir.path().join(".gift-genius");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(
            cfg_dir.join("config.toml"),
            "[llm]\nmodel = \"gemini-2.0-flash\"\n[defaults]\nbudget = \"sultan\"\n",
        )
        .unwrap();
        std::fs::write(
            cfg_dir.join("config.local.toml"),
            "[llm]\nmodel = \"gemini-2.5-pro\"\n",
        )
        .unwrap();

        let config = GiftGeniusConfig::load(Some(dir.path())).unwrap();
        assert_eq!(config.llm.model, "gemini-2.5-pro");
        assert_eq!(config.defaults.budget(), Budget::Sultan);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = GiftGeniusConfig::default_config();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: GiftGeniusConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.llm.model, config.llm.model);
        assert_eq!(parsed.defaults.occasion, config.defaults.occasion);
    }

    #[test]
    fn test_llm_config_full_toml() {
        let toml_str = r#"
[llm]
model = "gemini-2.0-flash"
api_key = "test-key"
base_url = "http://localhost:8000"
env_var = "MY_GEMINI_KEY"
"#;
        let config: GiftGeniusConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.llm.model, "gemini-2.0-flash");
        assert_eq!(config.llm.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.llm.base_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.llm.env_var.as_deref(), Some("MY_GEMINI_KEY"));
    }

    #[test]
    fn test_validate_default_config_no_warnings() {
        let mut config = GiftGeniusConfig::default_config();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_resets_unknown_options() {
        let mut config = GiftGeniusConfig::default_config();
        config.defaults.occasion = "wedding".into();
        config.defaults.budget = "cheap".into();
        config.llm.model = "  ".into();
        let warnings = config.validate();
        assert_eq!(warnings.len(), 3);
        assert_eq!(config.defaults.occasion, "birthday");
        assert_eq!(config.defaults.budget, "range100_500");
        assert_eq!(config.llm.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_storage_path_override() {
        let config = StorageConfig {
            path: Some("/tmp/gifts".into()),
        };
        assert_eq!(config.resolved_path(), PathBuf::from("/tmp/gifts"));
        assert!(StorageConfig::default()
            .resolved_path()
            .ends_with("gift-genius"));
    }

    #[test]
    fn test_resolve_api_key_from_config() {
        let config = LlmConfig {
            api_key: Some("config-key".into()),
            ..Default::default()
        };
        assert_eq!(resolve_api_key(&config).unwrap(), "config-key");
    }

    #[test]
    fn test_resolve_api_key_custom_env_var() {
        std::env::set_var("GIFT_GENIUS_TEST_KEY", "env-key");
        let config = LlmConfig {
            env_var: Some("GIFT_GENIUS_TEST_KEY".into()),
            ..Default::default()
        };
        assert_eq!(resolve_api_key(&config).unwrap(), "env-key");
        std::env::remove_var("GIFT_GENIUS_TEST_KEY");
    }

    #[test]
    fn test_resolve_api_key_missing_custom_env_var_errors() {
        let config = LlmConfig {
            env_var: Some("GIFT_GENIUS_DEFINITELY_UNSET".into()),
            ..Default::default()
        };
        let err = resolve_api_key(&config).unwrap_err();
        assert!(err.to_string().contains("API key"));
        assert!(err.to_string().contains("GIFT_GENIUS_DEFINITELY_UNSET"));
    }
}
