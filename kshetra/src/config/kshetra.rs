//! Top-level configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::explorer::ExplorerConfig;
use crate::grid::GridConfig;
use crate::safety::SeedConfig;
use crate::surrogate::KernelConfig;

use super::error::ConfigLoadError;
use super::sections::{GridSection, SafetySection, SamplingSection, SeedSection, SurrogateSection};

/// Complete experiment configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KshetraConfig {
    #[serde(default)]
    pub grid: GridSection,

    #[serde(default)]
    pub safety: SafetySection,

    #[serde(default)]
    pub surrogate: SurrogateSection,

    #[serde(default)]
    pub seed: SeedSection,

    #[serde(default)]
    pub sampling: SamplingSection,
}

impl KshetraConfig {
    /// Load and validate a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load `configs/kshetra.yaml` if present, built-in defaults otherwise.
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        let path = Path::new("configs/kshetra.yaml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigLoadError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        serde_yaml::to_string(self).map_err(|e| ConfigLoadError::Parse(e.to_string()))
    }

    /// Range-check every section.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        self.to_grid_config().validate()?;
        self.to_explorer_config().validate()?;
        self.to_kernel_config().validate()?;
        Ok(())
    }

    pub fn to_grid_config(&self) -> GridConfig {
        self.grid.to_grid_config()
    }

    /// Explorer settings. A slope-derived threshold is scaled by the
    /// row step.
    pub fn to_explorer_config(&self) -> ExplorerConfig {
        ExplorerConfig {
            beta: self.safety.beta,
            lipschitz: self.safety.lipschitz,
            threshold: self.safety.threshold(self.grid.step_x),
            tie_break: self.sampling.tie_break,
            closure_iteration_cap: self.safety.closure_iteration_cap,
            allow_degenerate_threshold: self.safety.allow_degenerate_threshold,
        }
    }

    pub fn to_kernel_config(&self) -> KernelConfig {
        self.surrogate.to_kernel_config()
    }

    pub fn to_seed_config(&self) -> SeedConfig {
        self.seed.to_seed_config()
    }

    /// Noise margin ε used for the coverage ground truth.
    pub fn epsilon(&self) -> f64 {
        self.surrogate.noise_std
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::TieBreak;

    #[test]
    fn test_defaults_match_reference_experiment() {
        let config = KshetraConfig::default();
        assert_eq!(config.grid.rows, 60);
        assert_eq!(config.grid.cols, 42);
        assert_eq!(config.seed.center, Some(77));
        let h = config.to_explorer_config().threshold;
        assert!((h + 25f64.to_radians().tan()).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
grid:
  rows: 10
  cols: 12
safety:
  threshold: -0.3
sampling:
  tie_break:
    mode: random
    seed: 42
"#;
        let config = KshetraConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.grid.rows, 10);
        assert_eq!(config.grid.step_x, 1.0);
        assert_eq!(config.safety.beta, 3.0);
        assert_eq!(config.to_explorer_config().threshold, -0.3);
        assert_eq!(config.sampling.tie_break, TieBreak::Random { seed: 42 });
        assert_eq!(config.sampling.iterations, 20);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = KshetraConfig::from_yaml("grid:\n  rows: 0\n").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Invalid(_)));

        let err = KshetraConfig::from_yaml("safety:\n  threshold: 0.5\n").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Invalid(_)));

        let err = KshetraConfig::from_yaml("grid: [1, 2]").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse(_)));
    }
}
