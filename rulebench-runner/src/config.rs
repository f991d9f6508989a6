//! Configuration loading from rulebench.toml
//!
//! Every section and field is optional; missing values fall back to the
//! defaults shown by [`RulebenchConfig::default_toml`]. Discovering the file is
//! left to the caller.

use anyhow::{Context, anyhow, bail};
use rulebench_core::{BenchmarkConfig, WarmupConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// rulebench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RulebenchConfig {
    /// Sample executor policy
    #[serde(default)]
    pub benchmark: BenchmarkSection,
    /// Outlier filter settings
    #[serde(default)]
    pub outliers: OutlierConfig,
    /// Orchestrator settings
    #[serde(default)]
    pub runner: RunnerConfig,
}

/// `[benchmark]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BenchmarkSection {
    /// Run name
    #[serde(default = "default_name")]
    pub name: String,
    /// Measured calls per sample
    #[serde(default = "default_iterations")]
    pub iterations: u64,
    /// Time budget per sample (e.g., "5s", "500ms")
    #[serde(default = "default_timeout")]
    pub timeout: String,
    /// Warmup policy
    #[serde(default)]
    pub warmup: WarmupSection,
}

impl Default for BenchmarkSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            iterations: default_iterations(),
            timeout: default_timeout(),
            warmup: WarmupSection::default(),
        }
    }
}

fn default_name() -> String {
    "rulebench".to_string()
}
fn default_iterations() -> u64 {
    50
}
fn default_timeout() -> String {
    "5s".to_string()
}

/// `[benchmark.warmup]` section
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WarmupSection {
    /// Run discarded calls before measuring
    #[serde(default = "default_warmup_enabled")]
    pub enabled: bool,
    /// Number of discarded calls
    #[serde(default = "default_warmup_iterations")]
    pub iterations: u64,
}

impl Default for WarmupSection {
    fn default() -> Self {
        Self {
            enabled: default_warmup_enabled(),
            iterations: default_warmup_iterations(),
        }
    }
}

fn default_warmup_enabled() -> bool {
    true
}
fn default_warmup_iterations() -> u64 {
    5
}

/// `[outliers]` section
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OutlierConfig {
    /// Tukey fence multiplier applied to the IQR
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            multiplier: default_multiplier(),
        }
    }
}

fn default_multiplier() -> f64 {
    rulebench_stats::DEFAULT_IQR_MULTIPLIER
}

/// `[runner]` section
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Show a progress bar while cases run
    #[serde(default)]
    pub progress: bool,
}

impl RulebenchConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Sample executor policy described by this configuration
    pub fn benchmark_config(&self) -> anyhow::Result<BenchmarkConfig> {
        let timeout = Self::parse_duration(&self.benchmark.timeout)
            .with_context(|| format!("invalid benchmark.timeout {:?}", self.benchmark.timeout))?;

        Ok(BenchmarkConfig {
            name: self.benchmark.name.clone(),
            iterations: self.benchmark.iterations,
            timeout,
            warmup: WarmupConfig {
                enabled: self.benchmark.warmup.enabled,
                iterations: self.benchmark.warmup.iterations,
            },
        })
    }

    /// Validated outlier fence multiplier
    pub fn outlier_multiplier(&self) -> anyhow::Result<f64> {
        let multiplier = self.outliers.multiplier;
        if !multiplier.is_finite() || multiplier < 0.0 {
            bail!("outliers.multiplier must be a non-negative number, got {multiplier}");
        }
        Ok(multiplier)
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# rulebench configuration

[benchmark]
# Run name shown in reports
name = "rulebench"
# Measured calls per code sample (upper bound)
iterations = 50
# Time budget for the measured calls of one code sample
timeout = "5s"

[benchmark.warmup]
# Run discarded calls before measuring
enabled = true
# Number of discarded calls
iterations = 5

[outliers]
# Tukey fence multiplier (values outside q1 - k*IQR .. q3 + k*IQR are dropped)
multiplier = 1.5

[runner]
# Show a progress bar while test cases run
progress = false
"#
        .to_string()
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m")
    pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow!("Empty duration string"));
        }

        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic() || *c == 'µ')
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid duration number: {}", num_part))?;
        if !value.is_finite() || value < 0.0 {
            return Err(anyhow!("Duration must be non-negative: {}", s));
        }

        let nanos_per_unit: f64 = match unit_part.trim().to_lowercase().as_str() {
            "ns" => 1.0,
            "us" | "µs" => 1_000.0,
            "ms" => 1_000_000.0,
            "s" | "" => 1_000_000_000.0,
            "m" | "min" => 60_000_000_000.0,
            _ => return Err(anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok(Duration::from_nanos((value * nanos_per_unit) as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RulebenchConfig::default();
        assert_eq!(config.benchmark.name, "rulebench");
        assert_eq!(config.benchmark.iterations, 50);
        assert_eq!(config.benchmark.timeout, "5s");
        assert!(config.benchmark.warmup.enabled);
        assert_eq!(config.benchmark.warmup.iterations, 5);
        assert!(!config.runner.progress);
    }

    #[test]
    fn test_parse_duration() {
        let parse = |s| RulebenchConfig::parse_duration(s).unwrap();
        assert_eq!(parse("3s"), Duration::from_secs(3));
        assert_eq!(parse("500ms"), Duration::from_millis(500));
        assert_eq!(parse("100us"), Duration::from_micros(100));
        assert_eq!(parse("100µs"), Duration::from_micros(100));
        assert_eq!(parse("1000ns"), Duration::from_nanos(1000));
        assert_eq!(parse("2m"), Duration::from_secs(120));
        assert_eq!(parse("1.5s"), Duration::from_millis(1500));
        assert_eq!(parse("7"), Duration::from_secs(7));
    }

    #[test]
    fn test_parse_duration_errors() {
        assert!(RulebenchConfig::parse_duration("").is_err());
        assert!(RulebenchConfig::parse_duration("fast").is_err());
        assert!(RulebenchConfig::parse_duration("3h").is_err());
        assert!(RulebenchConfig::parse_duration("-1s").is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [benchmark]
            iterations = 10
            timeout = "250ms"

            [benchmark.warmup]
            enabled = false
        "#;

        let config = RulebenchConfig::from_toml_str(toml_str).unwrap();
        let bench = config.benchmark_config().unwrap();
        assert_eq!(bench.iterations, 10);
        assert_eq!(bench.timeout, Duration::from_millis(250));
        assert!(!bench.warmup.enabled);
        // Defaults should still apply
        assert_eq!(bench.warmup.iterations, 5);
        assert_eq!(bench.name, "rulebench");
        assert_eq!(config.outlier_multiplier().unwrap(), 1.5);
    }

    #[test]
    fn test_default_toml_parses() {
        let config = RulebenchConfig::from_toml_str(&RulebenchConfig::default_toml()).unwrap();
        assert_eq!(config, RulebenchConfig::default());
        assert_eq!(
            config.benchmark_config().unwrap(),
            BenchmarkConfig::default()
        );
    }

    #[test]
    fn test_invalid_values() {
        let config = RulebenchConfig::from_toml_str("[benchmark]\ntimeout = \"soon\"\n").unwrap();
        assert!(config.benchmark_config().is_err());

        let config = RulebenchConfig::from_toml_str("[outliers]\nmultiplier = -2.0\n").unwrap();
        assert!(config.outlier_multiplier().is_err());

        assert!(RulebenchConfig::from_toml_str("[benchmark]\niterations = \"many\"\n").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = RulebenchConfig::load("/nonexistent/rulebench.toml").unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
