//! Deployment configuration - all tunables as operator-editable TOML values
//!
//! Every threshold that is a tuning surface (not part of the numeric
//! contract) lives here. Each struct implements `Default` with the shipped
//! values, ensuring zero-change behavior when no config file is present.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a deployment.
///
/// Load with `SentinelConfig::load()` which searches:
/// 1. `$SENTINEL_CONFIG` env var
/// 2. `./sentinel_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentinelConfig {
    /// Model artifact locations
    #[serde(default)]
    pub models: ModelConfig,

    /// Case store backend selection and connection settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Diagnosis resolver tunables
    #[serde(default)]
    pub diagnosis: DiagnosisConfig,

    /// Risk scorer tunables
    #[serde(default)]
    pub risk: RiskConfig,

    /// Maintenance scheduling tunables
    #[serde(default)]
    pub scheduling: SchedulingConfig,

    /// Narrative collaborator settings
    #[serde(default)]
    pub narrative: NarrativeConfig,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            models: ModelConfig::default(),
            store: StoreConfig::default(),
            diagnosis: DiagnosisConfig::default(),
            risk: RiskConfig::default(),
            scheduling: SchedulingConfig::default(),
            narrative: NarrativeConfig::default(),
        }
    }
}

impl SentinelConfig {
    /// Load configuration using the standard search order:
    /// 1. `$SENTINEL_CONFIG` environment variable
    /// 2. `./sentinel_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("SENTINEL_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from SENTINEL_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from SENTINEL_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "SENTINEL_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("sentinel_config.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./sentinel_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./sentinel_config.toml, using defaults");
                }
            }
        }

        info!("No sentinel_config.toml found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e.to_string()))?;
        toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(path.display().to_string(), e.to_string()))
    }
}

/// Config loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Io(String, String),
    #[error("Failed to parse config file {0}: {1}")]
    Parse(String, String),
}

// ============================================================================
// Sections
// ============================================================================

/// Model artifact locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Directory holding `trend.json`, `survival.json`, `classifier.json`
    /// and `norm_stats.json`.
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from(defaults::MODEL_ARTIFACT_DIR)
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_dir: default_artifact_dir(),
        }
    }
}

/// Case store backend selection. The analysis core only depends on the
/// `CaseStore` contract; this picks which implementation is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Local sled-backed store.
    Embedded,
    /// Managed vector service over HTTP.
    Remote,
}

/// Case store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Which backend to construct.
    #[serde(default = "default_store_backend")]
    pub backend: StoreBackend,
    /// Data directory for the embedded backend.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Base URL for the remote backend.
    #[serde(default)]
    pub remote_url: String,
    /// API key for the remote backend.
    #[serde(default)]
    pub remote_api_key: String,
    /// HTTP timeout for remote store calls (seconds).
    #[serde(default = "default_store_timeout")]
    pub remote_timeout_secs: u64,
}

fn default_store_backend() -> StoreBackend {
    StoreBackend::Embedded
}

fn default_store_path() -> PathBuf {
    PathBuf::from(defaults::CASE_STORE_DIR)
}

fn default_store_timeout() -> u64 {
    defaults::STORE_HTTP_TIMEOUT_SECS
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            path: default_store_path(),
            remote_url: String::new(),
            remote_api_key: String::new(),
            remote_timeout_secs: default_store_timeout(),
        }
    }
}

/// Diagnosis resolver tunables. The component-selection policy constants
/// (0.7 override, 0.7/0.3 confidence blend) are part of the numeric contract
/// and intentionally not configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisConfig {
    /// Number of nearest neighbors retrieved per diagnosis.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Matches below this similarity are dropped after ranking.
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f64,
    /// RUL spread (cycles) across families that flags MODEL_DISAGREEMENT.
    #[serde(default = "default_rul_spread")]
    pub model_disagreement_cycles: f64,
    /// Probability spread across families that flags PROBABILITY_SPIKE.
    #[serde(default = "default_probability_spike")]
    pub probability_spike_spread: f64,
    /// Max failure probability that flags HIGH_FAILURE_PROBABILITY.
    #[serde(default = "default_high_probability")]
    pub high_failure_probability: f64,
    /// Max component probability below which LOW_CLASSIFIER_CONFIDENCE
    /// is flagged.
    #[serde(default = "default_low_classifier_confidence")]
    pub low_classifier_confidence: f64,
}

fn default_top_k() -> usize {
    defaults::DIAGNOSIS_TOP_K
}

fn default_min_similarity() -> f64 {
    defaults::DIAGNOSIS_MIN_SIMILARITY
}

fn default_rul_spread() -> f64 {
    defaults::MODEL_DISAGREEMENT_CYCLES
}

fn default_probability_spike() -> f64 {
    defaults::PROBABILITY_SPIKE_SPREAD
}

fn default_high_probability() -> f64 {
    defaults::HIGH_FAILURE_PROBABILITY
}

fn default_low_classifier_confidence() -> f64 {
    defaults::LOW_CLASSIFIER_CONFIDENCE
}

impl Default for DiagnosisConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_similarity: default_min_similarity(),
            model_disagreement_cycles: default_rul_spread(),
            probability_spike_spread: default_probability_spike(),
            high_failure_probability: default_high_probability(),
            low_classifier_confidence: default_low_classifier_confidence(),
        }
    }
}

/// Risk scorer tunables. The level boundaries (probability 0.5, RUL 30/60)
/// and the score formula are contract-fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// RUL spread (cycles) that contributes MODEL_DISAGREEMENT to the
    /// risk factor list.
    #[serde(default = "default_rul_spread")]
    pub model_disagreement_cycles: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            model_disagreement_cycles: default_rul_spread(),
        }
    }
}

/// Maintenance scheduling tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingConfig {
    /// Expected flight cycles flown per day, used to convert window bounds
    /// into cycles until the target date.
    #[serde(default = "default_cycles_per_day")]
    pub cycles_per_day: f64,
}

fn default_cycles_per_day() -> f64 {
    defaults::CYCLES_PER_DAY
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            cycles_per_day: default_cycles_per_day(),
        }
    }
}

/// Narrative collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeConfig {
    /// Whether to call the external service at all. When false every
    /// narrative comes from the deterministic templates.
    #[serde(default)]
    pub enabled: bool,
    /// Service endpoint.
    #[serde(default)]
    pub url: String,
    /// Bearer token for the service.
    #[serde(default)]
    pub api_key: String,
    /// Per-call timeout (milliseconds) before the template fallback is used.
    #[serde(default = "default_narrative_timeout")]
    pub timeout_ms: u64,
}

fn default_narrative_timeout() -> u64 {
    defaults::NARRATIVE_TIMEOUT_MS
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: String::new(),
            api_key: String::new(),
            timeout_ms: default_narrative_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = SentinelConfig::default();
        assert_eq!(config.diagnosis.top_k, defaults::DIAGNOSIS_TOP_K);
        assert_eq!(config.store.backend, StoreBackend::Embedded);
        assert!(!config.narrative.enabled);
        assert_eq!(config.scheduling.cycles_per_day, defaults::CYCLES_PER_DAY);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: SentinelConfig = toml::from_str(
            r#"
            [store]
            backend = "remote"
            remote_url = "https://vectors.example.com"

            [diagnosis]
            top_k = 7
            "#,
        )
        .expect("parses");
        assert_eq!(config.store.backend, StoreBackend::Remote);
        assert_eq!(config.store.remote_url, "https://vectors.example.com");
        assert_eq!(config.diagnosis.top_k, 7);
        // Untouched sections keep defaults
        assert_eq!(
            config.diagnosis.min_similarity,
            defaults::DIAGNOSIS_MIN_SIMILARITY
        );
        assert_eq!(config.narrative.timeout_ms, defaults::NARRATIVE_TIMEOUT_MS);
    }
}
