//! Analysis configuration
//!
//! Values come from (lowest to highest precedence) the built-in defaults, an
//! optional config file (TOML, JSON or YAML by extension) and `HISTVOL_*`
//! environment variables, e.g. `HISTVOL_BIN_STEP=0.5`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{AnalysisError, Result};

/// Slack on the stop condition so the last edge survives rounding
const EDGE_EPSILON: f64 = 1e-9;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "HISTVOL";

/// Upper bound on the number of interior bin edges
pub const MAX_BIN_EDGES: usize = 1_000;

/// Upper bound on the decimal places of bin labels
pub const MAX_LABEL_PRECISION: usize = 10;

/// Parameters of the distribution binner and label formatting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Interior bin edges span mean ± `sigma_span` standard deviations
    pub sigma_span: f64,
    /// Width of each interior bin in standard deviations
    pub bin_step: f64,
    /// Decimal places of the percentages in bin labels
    pub label_precision: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sigma_span: 3.0,
            bin_step: 0.75,
            label_precision: 1,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from an optional file plus environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = config::Config::builder()
            .set_default("sigma_span", defaults.sigma_span)?
            .set_default("bin_step", defaults.bin_step)?
            .set_default("label_precision", defaults.label_precision as u64)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let loaded: Self = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject parameters that cannot produce a sensible set of bins
    pub fn validate(&self) -> Result<()> {
        if !(self.sigma_span.is_finite() && self.sigma_span > 0.0) {
            return Err(AnalysisError::Config {
                message: format!("sigma_span must be positive, got {}", self.sigma_span),
            });
        }
        if !(self.bin_step.is_finite() && self.bin_step > 0.0) {
            return Err(AnalysisError::Config {
                message: format!("bin_step must be positive, got {}", self.bin_step),
            });
        }
        if self.bin_step > 2.0 * self.sigma_span {
            return Err(AnalysisError::Config {
                message: format!(
                    "bin_step {} is wider than the whole span of {} sigma",
                    self.bin_step,
                    2.0 * self.sigma_span
                ),
            });
        }
        if self.edge_count() > MAX_BIN_EDGES {
            return Err(AnalysisError::Config {
                message: format!(
                    "bin_step {} over a span of {} sigma needs more than {} edges",
                    self.bin_step,
                    2.0 * self.sigma_span,
                    MAX_BIN_EDGES
                ),
            });
        }
        if self.label_precision > MAX_LABEL_PRECISION {
            return Err(AnalysisError::Config {
                message: format!(
                    "label_precision must be at most {}, got {}",
                    MAX_LABEL_PRECISION, self.label_precision
                ),
            });
        }
        Ok(())
    }

    /// Number of interior bin edges, the last one kept through `EDGE_EPSILON`
    pub(crate) fn edge_count(&self) -> usize {
        let steps = (2.0 * self.sigma_span / self.bin_step + EDGE_EPSILON).floor();
        // Saturates for zero or non-finite steps; validate() rejects those first
        (steps as usize).saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sigma_span, 3.0);
        assert_eq!(config.bin_step, 0.75);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: AnalysisConfig = toml::from_str("bin_step = 0.5").unwrap();
        assert_eq!(config.bin_step, 0.5);
        assert_eq!(config.sigma_span, 3.0);
        assert_eq!(config.label_precision, 1);
    }

    #[test]
    fn test_validation_rejects_bad_parameters() {
        let zero_step = AnalysisConfig {
            bin_step: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            zero_step.validate(),
            Err(AnalysisError::Config { .. })
        ));

        let too_wide = AnalysisConfig {
            sigma_span: 1.0,
            bin_step: 2.5,
            ..Default::default()
        };
        assert!(too_wide.validate().is_err());
    }

    #[test]
    fn test_validation_bounds_edge_count() {
        let tiny_step: AnalysisConfig = toml::from_str("bin_step = 1e-12").unwrap();
        assert!(matches!(
            tiny_step.validate(),
            Err(AnalysisError::Config { .. })
        ));

        let fine = AnalysisConfig {
            bin_step: 0.01,
            ..Default::default()
        };
        assert_eq!(fine.edge_count(), 601);
        assert!(fine.validate().is_ok());

        let wide_labels = AnalysisConfig {
            label_precision: 64,
            ..Default::default()
        };
        assert!(wide_labels.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "sigma_span = 2.0\nlabel_precision = 2").unwrap();

        let config = AnalysisConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.sigma_span, 2.0);
        assert_eq!(config.label_precision, 2);
        assert_eq!(config.bin_step, 0.75);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = AnalysisConfig::load(Some(Path::new("/nonexistent/histvol.toml")));
        assert!(matches!(result, Err(AnalysisError::Config { .. })));
    }
}
