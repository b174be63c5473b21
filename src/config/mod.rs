//! Configuration for srtlib containers
//!
//! Every container takes its tuning knobs from plain values passed at
//! construction; there is no global configuration state. This module collects
//! those knobs into serializable configuration types with validation,
//! environment initialization and presets.
//!
//! # Configuration Types
//!
//! - [`ContainerConfig`]: top-level configuration grouping the three below
//! - [`GrowthConfig`]: buffer growth strategy, first allocation size and inline storage
//! - [`SearchConfig`]: substring search strategy thresholds
//! - [`CaseConfig`]: scratch sizing for the Unicode case-conversion path
//!
//! # Builder Patterns
//!
//! ```rust
//! use srtlib::config::ContainerConfig;
//! use srtlib::GrowthStrategy;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ContainerConfig::builder()
//!     .growth_strategy(GrowthStrategy::GoldenRatio)
//!     .short_needle_max(3)
//!     .scratch_slack_percent(50)
//!     .build()?;
//! assert_eq!(config.search.short_needle_max, 3);
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Initialization
//!
//! ```rust
//! use srtlib::config::{Config, ContainerConfig};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads SRT_GROWTH_STRATEGY, SRT_SEARCH_SHORT_NEEDLE_MAX, ...
//! let config = ContainerConfig::from_env()?;
//! assert!(config.validate().is_ok());
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use std::env;
use std::fmt;
use std::path::Path;

pub mod container;


pub use container::{
    CaseConfig, ContainerConfig, ContainerConfigBuilder, GrowthConfig, SearchConfig,
};

/// Common configuration trait providing validation, environment initialization,
/// and preset management functionality.
pub trait Config: Clone + fmt::Debug {
    /// Validate the configuration for correctness and consistency.
    fn validate(&self) -> Result<()>;

    /// Initialize configuration from environment variables.
    ///
    /// Environment variables use the format `SRT_{COMPONENT}_{FIELD}`, for
    /// example `SRT_SEARCH_FALLBACK_BUDGET=8`.
    fn from_env() -> Result<Self>
    where
        Self: Default,
    {
        Self::from_env_with_prefix("SRT_")
    }

    /// Initialize configuration from environment variables with a custom prefix.
    fn from_env_with_prefix(prefix: &str) -> Result<Self>
    where
        Self: Default;

    /// Preset favouring throughput over memory.
    fn performance_preset() -> Self;

    /// Preset favouring a small memory footprint.
    fn memory_preset() -> Self;

    /// Preset favouring predictable per-operation cost.
    fn realtime_preset() -> Self;

    /// Balanced preset; the default configuration.
    fn balanced_preset() -> Self
    where
        Self: Default,
    {
        Self::default()
    }

    /// Save configuration to a JSON file.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Load and validate configuration from a JSON file.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

/// Configuration validation error details.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// The invalid value
    pub value: String,
    /// Description of why the value is invalid
    pub reason: String,
    /// Suggested valid values or ranges
    pub suggestion: Option<String>,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(field: &str, value: &str, reason: &str) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
            suggestion: None,
        }
    }

    /// Add a suggestion for valid values.
    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid configuration for field '{}': value '{}' is invalid ({})",
            self.field, self.value, self.reason
        )?;

        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". Suggested values: {}", suggestion)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Parse an environment variable, falling back to `default` when it is unset
/// or does not parse.
pub fn parse_env_var<T>(var_name: &str, default: T) -> T
where
    T: std::str::FromStr + Clone,
{
    env::var(var_name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Parse a boolean environment variable.
///
/// Accepts "true", "1", "yes", "on" (case-insensitive) as true and everything
/// else as false.
pub fn parse_env_bool(var_name: &str, default: bool) -> bool {
    env::var(var_name)
        .ok()
        .map(|s| {
            let s = s.trim().to_lowercase();
            matches!(s.as_str(), "true" | "1" | "yes" | "on")
        })
        .unwrap_or(default)
}
