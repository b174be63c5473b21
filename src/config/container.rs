//! Container configuration: growth, search and case-conversion knobs

use super::{parse_env_bool, parse_env_var, Config, ValidationError};
use crate::error::{Result, SrtError};
use crate::memory::{GrowthPolicy, GrowthStrategy};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Largest accepted first-allocation size
const MAX_MIN_CAPACITY_BYTES: usize = 1 << 20;

/// Largest accepted short-needle threshold
const MAX_SHORT_NEEDLE: usize = 16;

/// Largest accepted scratch slack for the Unicode case path
const MAX_SLACK_PERCENT: usize = 300;

/// Buffer growth configuration, turned into a [`GrowthPolicy`] for `RawBuf`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Geometric growth strategy
    pub strategy: GrowthStrategy,
    /// Size in bytes of the first heap allocation
    pub min_capacity_bytes: usize,
    /// Start small buffers in the inline area of the handle
    pub inline: bool,
}

impl GrowthConfig {
    /// Default growth configuration
    pub const DEFAULT: GrowthConfig = GrowthConfig {
        strategy: GrowthStrategy::Doubling,
        min_capacity_bytes: 64,
        inline: true,
    };

    /// The policy handed to buffers
    pub const fn policy(&self) -> GrowthPolicy {
        GrowthPolicy::new(self.strategy, self.min_capacity_bytes, self.inline)
    }

    fn check(&self, errors: &mut Vec<ValidationError>) {
        if self.min_capacity_bytes == 0 || self.min_capacity_bytes > MAX_MIN_CAPACITY_BYTES {
            errors.push(
                ValidationError::new(
                    "growth.min_capacity_bytes",
                    &self.min_capacity_bytes.to_string(),
                    "first allocation must be between 1 byte and 1 MiB",
                )
                .with_suggestion("typical values: 16, 64, 256"),
            );
        }
    }

    /// Validate this section on its own
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        self.check(&mut errors);
        into_result("growth", errors)
    }
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Substring search tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Needles up to this many bytes use the direct first-byte scan
    pub short_needle_max: usize,
    /// Verified bytes allowed per scanned byte before switching to the linear scan
    pub fallback_budget: usize,
}

impl SearchConfig {
    /// Default search configuration
    pub const DEFAULT: SearchConfig = SearchConfig {
        short_needle_max: 4,
        fallback_budget: 8,
    };

    fn check(&self, errors: &mut Vec<ValidationError>) {
        if self.short_needle_max == 0 || self.short_needle_max > MAX_SHORT_NEEDLE {
            errors.push(
                ValidationError::new(
                    "search.short_needle_max",
                    &self.short_needle_max.to_string(),
                    "short needle threshold must be between 1 and 16",
                )
                .with_suggestion("typical values: 2-4"),
            );
        }
        if self.fallback_budget == 0 {
            errors.push(
                ValidationError::new(
                    "search.fallback_budget",
                    &self.fallback_budget.to_string(),
                    "fallback budget must be at least 1",
                )
                .with_suggestion("typical values: 4-16"),
            );
        }
    }

    /// Validate this section on its own
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        self.check(&mut errors);
        into_result("search", errors)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Case-conversion tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseConfig {
    /// Extra scratch capacity for the Unicode path, as a percentage of the input length
    pub scratch_slack_percent: usize,
}

impl CaseConfig {
    /// Default case configuration
    pub const DEFAULT: CaseConfig = CaseConfig {
        scratch_slack_percent: 25,
    };

    /// Scratch capacity for an input of `len` bytes
    #[inline]
    pub fn scratch_capacity(&self, len: usize) -> usize {
        len.saturating_add(len.saturating_mul(self.scratch_slack_percent) / 100)
    }

    fn check(&self, errors: &mut Vec<ValidationError>) {
        if self.scratch_slack_percent > MAX_SLACK_PERCENT {
            errors.push(
                ValidationError::new(
                    "case.scratch_slack_percent",
                    &self.scratch_slack_percent.to_string(),
                    "scratch slack must be between 0 and 300 percent",
                )
                .with_suggestion("typical values: 10-50"),
            );
        }
    }

    /// Validate this section on its own
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        self.check(&mut errors);
        into_result("case", errors)
    }
}

impl Default for CaseConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Top-level container configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Buffer growth
    pub growth: GrowthConfig,
    /// Substring search
    pub search: SearchConfig,
    /// Case conversion
    pub case: CaseConfig,
}

impl ContainerConfig {
    /// Default configuration, usable in `const` contexts
    pub const DEFAULT: ContainerConfig = ContainerConfig {
        growth: GrowthConfig::DEFAULT,
        search: SearchConfig::DEFAULT,
        case: CaseConfig::DEFAULT,
    };

    /// Create a new configuration builder.
    pub fn builder() -> ContainerConfigBuilder {
        ContainerConfigBuilder::new()
    }
}

impl Config for ContainerConfig {
    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        self.growth.check(&mut errors);
        self.search.check(&mut errors);
        self.case.check(&mut errors);
        into_result("container", errors)
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let mut config = Self::default();

        let strategy_var = format!("{}GROWTH_STRATEGY", prefix);
        if let Ok(raw) = env::var(&strategy_var) {
            config.growth.strategy = GrowthStrategy::parse(&raw).ok_or_else(|| {
                SrtError::configuration(
                    ValidationError::new(&strategy_var, &raw, "unknown growth strategy")
                        .with_suggestion("doubling, one_and_half, golden")
                        .to_string(),
                )
            })?;
        }
        config.growth.min_capacity_bytes = parse_env_var(
            &format!("{}GROWTH_MIN_CAPACITY_BYTES", prefix),
            config.growth.min_capacity_bytes,
        );
        config.growth.inline = parse_env_bool(&format!("{}GROWTH_INLINE", prefix), config.growth.inline);

        config.search.short_needle_max = parse_env_var(
            &format!("{}SEARCH_SHORT_NEEDLE_MAX", prefix),
            config.search.short_needle_max,
        );
        config.search.fallback_budget = parse_env_var(
            &format!("{}SEARCH_FALLBACK_BUDGET", prefix),
            config.search.fallback_budget,
        );

        config.case.scratch_slack_percent = parse_env_var(
            &format!("{}CASE_SCRATCH_SLACK_PERCENT", prefix),
            config.case.scratch_slack_percent,
        );

        config.validate()?;
        log::debug!("container configuration from environment ({}*): {:?}", prefix, config);
        Ok(config)
    }

    fn performance_preset() -> Self {
        let mut config = Self::default();
        config.growth.min_capacity_bytes = 256;
        config.search.fallback_budget = 16;
        config.case.scratch_slack_percent = 50;
        config
    }

    fn memory_preset() -> Self {
        let mut config = Self::default();
        config.growth.strategy = GrowthStrategy::OneAndHalf;
        config.growth.min_capacity_bytes = 16;
        config.case.scratch_slack_percent = 10;
        config
    }

    fn realtime_preset() -> Self {
        let mut config = Self::default();
        config.growth.strategy = GrowthStrategy::GoldenRatio;
        config.search.fallback_budget = 2;
        config.case.scratch_slack_percent = 100;
        config
    }

    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self).map_err(|e| {
            SrtError::configuration(format!("Failed to serialize container config: {}", e))
        })?;

        std::fs::write(path.as_ref(), serialized)?;

        log::debug!("saved container configuration to {}", path.as_ref().display());
        Ok(())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;

        let config: Self = serde_json::from_str(&content).map_err(|e| {
            SrtError::configuration(format!("Failed to parse container config file: {}", e))
        })?;

        config.validate()?;
        log::debug!("loaded container configuration from {}", path.as_ref().display());
        Ok(config)
    }
}

fn into_result(section: &str, errors: Vec<ValidationError>) -> Result<()> {
    if errors.is_empty() {
        return Ok(());
    }
    Err(SrtError::configuration(format!(
        "{} configuration validation failed: {}",
        section,
        errors
            .into_iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    )))
}

/// Builder for [`ContainerConfig`].
#[derive(Debug, Clone)]
pub struct ContainerConfigBuilder {
    config: ContainerConfig,
}

impl ContainerConfigBuilder {
    /// Create a builder starting from the default configuration.
    pub fn new() -> Self {
        Self {
            config: ContainerConfig::default(),
        }
    }

    /// Set the growth strategy.
    pub fn growth_strategy(mut self, strategy: GrowthStrategy) -> Self {
        self.config.growth.strategy = strategy;
        self
    }

    /// Set the first heap allocation size.
    pub fn min_capacity_bytes(mut self, bytes: usize) -> Self {
        self.config.growth.min_capacity_bytes = bytes;
        self
    }

    /// Enable or disable inline storage.
    pub fn inline(mut self, enabled: bool) -> Self {
        self.config.growth.inline = enabled;
        self
    }

    /// Set the short-needle threshold.
    pub fn short_needle_max(mut self, max: usize) -> Self {
        self.config.search.short_needle_max = max;
        self
    }

    /// Set the search fallback budget.
    pub fn fallback_budget(mut self, budget: usize) -> Self {
        self.config.search.fallback_budget = budget;
        self
    }

    /// Set the Unicode case scratch slack.
    pub fn scratch_slack_percent(mut self, percent: usize) -> Self {
        self.config.case.scratch_slack_percent = percent;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<ContainerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ContainerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ContainerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config, ContainerConfig::DEFAULT);
        assert_eq!(config.growth.policy(), GrowthPolicy::DEFAULT);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ContainerConfig::builder()
            .growth_strategy(GrowthStrategy::OneAndHalf)
            .min_capacity_bytes(128)
            .inline(false)
            .fallback_budget(4)
            .build()
            .expect("Failed to build container config");

        assert_eq!(config.growth.strategy, GrowthStrategy::OneAndHalf);
        assert_eq!(config.growth.min_capacity_bytes, 128);
        assert!(!config.growth.inline);
        assert_eq!(config.search.fallback_budget, 4);
        assert!(!config.growth.policy().inline());
    }

    #[test]
    fn test_builder_rejects_invalid() {
        assert!(ContainerConfig::builder().short_needle_max(0).build().is_err());
        assert!(ContainerConfig::builder().short_needle_max(17).build().is_err());
        assert!(ContainerConfig::builder().fallback_budget(0).build().is_err());
        assert!(ContainerConfig::builder().scratch_slack_percent(301).build().is_err());
        assert!(ContainerConfig::builder().min_capacity_bytes(0).build().is_err());
    }

    #[test]
    fn test_presets() {
        let perf = ContainerConfig::performance_preset();
        assert!(perf.validate().is_ok());
        assert_eq!(perf.growth.min_capacity_bytes, 256);

        let mem = ContainerConfig::memory_preset();
        assert!(mem.validate().is_ok());
        assert_eq!(mem.growth.strategy, GrowthStrategy::OneAndHalf);

        let rt = ContainerConfig::realtime_preset();
        assert!(rt.validate().is_ok());
        assert_eq!(rt.search.fallback_budget, 2);

        assert_eq!(ContainerConfig::balanced_preset(), ContainerConfig::default());
    }

    #[test]
    fn test_scratch_capacity() {
        let case = CaseConfig { scratch_slack_percent: 50 };
        assert_eq!(case.scratch_capacity(100), 150);
        assert_eq!(case.scratch_capacity(0), 0);
        assert_eq!(CaseConfig { scratch_slack_percent: 0 }.scratch_capacity(7), 7);
    }

    #[test]
    fn test_validation_message_names_field() {
        let mut config = ContainerConfig::default();
        config.search.short_needle_max = 99;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("search.short_needle_max"));
        assert!(err.contains("Suggested values"));
    }

    #[test]
    fn test_serialization() {
        let config = ContainerConfig::realtime_preset();
        let json = serde_json::to_string(&config).expect("Failed to serialize");
        let deserialized: ContainerConfig = serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ContainerConfig =
            serde_json::from_str(r#"{"search": {"short_needle_max": 2}}"#).unwrap();
        assert_eq!(config.search.short_needle_max, 2);
        assert_eq!(config.search.fallback_budget, SearchConfig::DEFAULT.fallback_budget);
        assert_eq!(config.growth, GrowthConfig::DEFAULT);
    }
}
