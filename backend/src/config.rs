//! Configuration management for the AMBA ERP inventory server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with AMBA__ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{
    AnomalyModel, AnomalyStrategy, ForecastConfig, ForecastMode, IsolationForest, ThresholdRule,
    DEFAULT_RATE_FLOOR, DEFAULT_WINDOW,
};

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Where the product catalog is loaded from
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Depletion forecast settings
    pub forecast: ForecastSettings,

    /// Anomaly detection settings
    pub anomaly: AnomalySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// CSV file with the initial catalog. The seed catalog is used when unset.
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastSettings {
    /// Estimator used when a request does not name one
    pub mode: ForecastMode,

    /// Orders averaged by the recent-window estimator
    pub window: usize,

    /// Rate assumed for products with too little history
    #[serde(default)]
    pub default_rate: Option<f64>,

    /// Substitute for non-positive rates
    pub rate_floor: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnomalySettings {
    pub strategy: AnomalyStrategy,

    /// Threshold rule: multiple of the per-product median quantity
    pub median_multiple: f64,

    /// Threshold rule: quantity that is always flagged
    pub absolute_threshold: u32,

    /// Isolation forest: expected anomalous fraction
    pub contamination: f64,

    /// Isolation forest: number of trees
    pub n_trees: usize,

    /// Isolation forest: per-tree subsample cap
    pub max_samples: usize,

    /// Isolation forest: RNG seed
    pub seed: u64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("AMBA__ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let forecast = ForecastSettings::default();
        let anomaly = AnomalySettings::default();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("forecast.mode", forecast.mode.as_str())?
            .set_default("forecast.window", forecast.window as i64)?
            .set_default("forecast.rate_floor", forecast.rate_floor)?
            .set_default("anomaly.strategy", "threshold")?
            .set_default("anomaly.median_multiple", anomaly.median_multiple)?
            .set_default("anomaly.absolute_threshold", i64::from(anomaly.absolute_threshold))?
            .set_default("anomaly.contamination", anomaly.contamination)?
            .set_default("anomaly.n_trees", anomaly.n_trees as i64)?
            .set_default("anomaly.max_samples", anomaly.max_samples as i64)?
            .set_default("anomaly.seed", anomaly.seed as i64)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (AMBA__ prefix)
            .add_source(
                Environment::with_prefix("AMBA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl ForecastSettings {
    /// Engine configuration derived from these settings
    pub fn engine_config(&self) -> ForecastConfig {
        ForecastConfig {
            window: self.window,
            default_rate: self.default_rate,
            rate_floor: self.rate_floor,
        }
    }
}

impl AnomalySettings {
    /// Build the configured detection model
    pub fn build_model(&self) -> Box<dyn AnomalyModel> {
        match self.strategy {
            AnomalyStrategy::Threshold => Box::new(ThresholdRule {
                median_multiple: self.median_multiple,
                absolute_threshold: self.absolute_threshold,
            }),
            AnomalyStrategy::IsolationForest => Box::new(IsolationForest {
                n_trees: self.n_trees,
                max_samples: self.max_samples,
                contamination: self.contamination,
                seed: self.seed,
            }),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            mode: ForecastMode::default(),
            window: DEFAULT_WINDOW,
            default_rate: None,
            rate_floor: DEFAULT_RATE_FLOOR,
        }
    }
}

impl Default for AnomalySettings {
    fn default() -> Self {
        let rule = ThresholdRule::default();
        let forest = IsolationForest::default();
        Self {
            strategy: AnomalyStrategy::default(),
            median_multiple: rule.median_multiple,
            absolute_threshold: rule.absolute_threshold,
            contamination: forest.contamination,
            n_trees: forest.n_trees,
            max_samples: forest.max_samples,
            seed: forest.seed,
        }
    }
}
