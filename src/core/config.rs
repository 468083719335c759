//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.quizdeck/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::store::{ImportPolicy, default_bank_path};
use crate::tutor::gateway::{DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE};
use crate::tutor::providers::{lmstudio, openrouter};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct QuizConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub tutor: TutorConfig,
    #[serde(default)]
    pub openrouter: OpenRouterConfig,
    #[serde(default)]
    pub lmstudio: LmStudioConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub bank_file: Option<String>,
    pub randomize: Option<bool>,
    pub import_policy: Option<ImportPolicy>,
    pub export_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TutorConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub system_prompt_file: Option<String>,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OpenRouterConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LmStudioConfig {
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_PROVIDER: &str = "openrouter";
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_TUTOR_TIMEOUT_SECS: u64 = 60;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub provider: String,
    pub model_name: String,
    pub bank_path: PathBuf,
    pub export_dir: PathBuf,
    pub randomize: bool,
    pub import_policy: ImportPolicy,
    pub system_prompt: String,
    pub temperature: f32,
    pub tutor_timeout_secs: u64,
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub lmstudio_base_url: String,
}

/// Values given on the command line. `None` means "not specified".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub provider: Option<String>,
    pub bank_path: Option<PathBuf>,
    pub randomize: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.quizdeck/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".quizdeck"))
}

/// Returns the path to `~/.quizdeck/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.quizdeck/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `QuizConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<QuizConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(QuizConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(QuizConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: QuizConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# quizdeck configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# bank_file = "bank.json"            # Path relative to ~/.quizdeck/
# randomize = false                  # Shuffle questions when a quiz starts
# import_policy = "strict"           # "strict" rejects malformed questions, "permissive" accepts them
# export_dir = "."                   # Where Ctrl+S on the export screen writes files

# [tutor]
# provider = "openrouter"            # "openrouter" or "lmstudio"
# model = "google/gemini-2.5-flash"
# temperature = 0.7
# timeout_secs = 60
# system_prompt = "You are a rigorous exam tutor."
# system_prompt_file = "tutor.md"    # Path relative to ~/.quizdeck/

# [openrouter]
# api_key = "sk-or-..."              # Or set OPENROUTER_API_KEY env var
# base_url = "https://openrouter.ai/api/v1"

# [lmstudio]
# base_url = "http://localhost:1234/v1"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &QuizConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Provider: CLI → env → config → default
    let provider = cli
        .provider
        .clone()
        .or_else(|| std::env::var("QUIZDECK_PROVIDER").ok())
        .or_else(|| config.tutor.provider.clone())
        .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());

    // Model: env → config → default
    let model_name = std::env::var("QUIZDECK_MODEL")
        .ok()
        .or_else(|| config.tutor.model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    // Bank file: CLI → config (relative to ~/.quizdeck/) → default
    let bank_path = cli
        .bank_path
        .clone()
        .or_else(|| config.general.bank_file.as_deref().map(relative_to_config_dir))
        .or_else(default_bank_path)
        .unwrap_or_else(|| PathBuf::from("bank.json"));

    let export_dir = config
        .general
        .export_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    // OpenRouter API key: env → config. Blank values count as missing.
    let openrouter_api_key = std::env::var("OPENROUTER_API_KEY")
        .ok()
        .or_else(|| config.openrouter.api_key.clone())
        .filter(|key| !key.trim().is_empty());

    // OpenRouter base URL: env → config → default
    let openrouter_base_url = std::env::var("OPENROUTER_BASE_URL")
        .ok()
        .or_else(|| config.openrouter.base_url.clone())
        .unwrap_or_else(|| openrouter::DEFAULT_BASE_URL.to_string());

    // LM Studio base URL: env → config → default
    let lmstudio_base_url = std::env::var("LM_STUDIO_BASE_URL")
        .ok()
        .or_else(|| config.lmstudio.base_url.clone())
        .unwrap_or_else(|| lmstudio::DEFAULT_BASE_URL.to_string());

    ResolvedConfig {
        provider,
        model_name,
        bank_path,
        export_dir,
        randomize: cli.randomize || config.general.randomize.unwrap_or(false),
        import_policy: config.general.import_policy.unwrap_or_default(),
        system_prompt: resolve_system_prompt(config),
        temperature: config.tutor.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        tutor_timeout_secs: config
            .tutor
            .timeout_secs
            .unwrap_or(DEFAULT_TUTOR_TIMEOUT_SECS),
        openrouter_api_key,
        openrouter_base_url,
        lmstudio_base_url,
    }
}

/// Relative paths in the config file are relative to `~/.quizdeck/`.
fn relative_to_config_dir(file: &str) -> PathBuf {
    let path = PathBuf::from(file);
    if path.is_absolute() {
        return path;
    }
    config_dir().map(|d| d.join(&path)).unwrap_or(path)
}

/// Resolves the tutor system prompt: inline wins over file, both win over default.
fn resolve_system_prompt(config: &QuizConfig) -> String {
    if let Some(ref prompt) = config.tutor.system_prompt {
        return prompt.clone();
    }

    if let Some(ref file) = config.tutor.system_prompt_file {
        let prompt_path = relative_to_config_dir(file);
        match fs::read_to_string(&prompt_path) {
            Ok(contents) => {
                let trimmed = contents.trim().to_string();
                if !trimmed.is_empty() {
                    info!("Loaded tutor prompt from {}", prompt_path.display());
                    return trimmed;
                }
                warn!("Tutor prompt file is empty: {}", prompt_path.display());
            }
            Err(e) => {
                warn!(
                    "Failed to read tutor prompt file {}: {}",
                    prompt_path.display(),
                    e
                );
            }
        }
    }

    DEFAULT_SYSTEM_PROMPT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_empty() {
        let config = QuizConfig::default();
        assert!(config.tutor.provider.is_none());
        assert!(config.general.randomize.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = QuizConfig::default();
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.import_policy, ImportPolicy::Strict);
        assert_eq!(resolved.tutor_timeout_secs, DEFAULT_TUTOR_TIMEOUT_SECS);
        assert!((resolved.temperature - DEFAULT_TEMPERATURE).abs() < f32::EPSILON);
        assert!(resolved.system_prompt.starts_with("You are a rigorous exam tutor"));
        assert!(resolved.bank_path.ends_with("bank.json"));
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = QuizConfig {
            general: GeneralConfig {
                randomize: Some(true),
                import_policy: Some(ImportPolicy::Permissive),
                ..Default::default()
            },
            tutor: TutorConfig {
                model: Some("my-model".to_string()),
                system_prompt: Some("Custom prompt.".to_string()),
                temperature: Some(0.2),
                timeout_secs: Some(5),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert!(resolved.randomize);
        assert_eq!(resolved.import_policy, ImportPolicy::Permissive);
        assert_eq!(resolved.system_prompt, "Custom prompt.");
        assert_eq!(resolved.tutor_timeout_secs, 5);
        assert!((resolved.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = QuizConfig {
            tutor: TutorConfig {
                provider: Some("openrouter".to_string()),
                ..Default::default()
            },
            general: GeneralConfig {
                bank_file: Some("from-config.json".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            provider: Some("lmstudio".to_string()),
            bank_path: Some(PathBuf::from("/tmp/cli-bank.json")),
            randomize: true,
        };
        let resolved = resolve(&config, &cli);
        assert_eq!(resolved.provider, "lmstudio");
        assert_eq!(resolved.bank_path, PathBuf::from("/tmp/cli-bank.json"));
        assert!(resolved.randomize);
    }

    #[test]
    fn test_toml_parses_all_sections() {
        let toml_str = r#"
[general]
bank_file = "my-bank.json"
randomize = true
import_policy = "permissive"

[tutor]
provider = "lmstudio"
model = "qwen2.5-7b"
timeout_secs = 30

[openrouter]
api_key = "sk-test-123"

[lmstudio]
base_url = "http://192.168.1.100:1234/v1"
"#;
        let config: QuizConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.bank_file.as_deref(), Some("my-bank.json"));
        assert_eq!(config.general.import_policy, Some(ImportPolicy::Permissive));
        assert_eq!(config.tutor.provider.as_deref(), Some("lmstudio"));
        assert_eq!(config.tutor.timeout_secs, Some(30));
        assert_eq!(config.openrouter.api_key.as_deref(), Some("sk-test-123"));
        assert_eq!(
            config.lmstudio.base_url.as_deref(),
            Some("http://192.168.1.100:1234/v1")
        );
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[tutor]
model = "my-model"
"#;
        let config: QuizConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.tutor.model.as_deref(), Some("my-model"));
        assert!(config.tutor.provider.is_none());
        assert!(config.general.import_policy.is_none());
    }

    #[test]
    fn test_unknown_import_policy_is_a_parse_error() {
        let toml_str = r#"
[general]
import_policy = "sometimes"
"#;
        assert!(toml::from_str::<QuizConfig>(toml_str).is_err());
    }

    #[test]
    fn test_inline_system_prompt_wins_over_file() {
        let config = QuizConfig {
            tutor: TutorConfig {
                system_prompt: Some("Inline wins.".to_string()),
                system_prompt_file: Some("should-not-load.md".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve(&config, &CliOverrides::default());
        assert_eq!(resolved.system_prompt, "Inline wins.");
    }
}
