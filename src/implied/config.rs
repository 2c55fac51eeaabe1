//! Solver configuration shared by the scalar and batch entry points.

use std::f64::consts::FRAC_2_PI;

use serde::{Deserialize, Serialize};

use crate::error::{self, PolyaVolError};
use crate::validate::validate_positive;

/// Polya's original normal-CDF coefficient `2/π`, used by Stefanica and Radoicic.
pub const DEFAULT_POLYA_FACTOR: f64 = FRAC_2_PI;

/// Coefficient minimizing the absolute CDF error over `[-10, 10]`.
pub const OPTIMAL_POLYA_FACTOR: f64 = 0.623_050_51;

/// Rounded `5/8` coefficient (Eidous and Al-Salman, 2016).
pub const EIGHTHS_POLYA_FACTOR: f64 = 0.625;

/// Minimum distance between an undiscounted price and either no-arbitrage bound.
pub const BOUND_EPSILON: f64 = 1e-8;

/// Configuration for Polya implied volatility extraction.
///
/// # Examples
/// ```
/// use polyavol::implied::{PolyaConfig, DEFAULT_POLYA_FACTOR};
///
/// let config = PolyaConfig::default();
/// assert_eq!(config.polya_factor(), DEFAULT_POLYA_FACTOR);
/// assert!(!config.validate_args());
///
/// let strict = PolyaConfig::new(0.625)?.with_validation(true);
/// assert!(strict.validate_args());
/// # Ok::<(), polyavol::PolyaVolError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolyaConfigRaw", into = "PolyaConfigRaw")]
pub struct PolyaConfig {
    /// Coefficient `k` in `N(x) ≈ 0.5 + 0.5·sign(x)·√(1 − e^(−k·x²))`.
    polya_factor: f64,
    /// Run the no-arbitrage validator before solving.
    validate_args: bool,
}

#[derive(Serialize, Deserialize)]
struct PolyaConfigRaw {
    polya_factor: f64,
    #[serde(default)]
    validate_args: bool,
}

impl TryFrom<PolyaConfigRaw> for PolyaConfig {
    type Error = PolyaVolError;
    fn try_from(raw: PolyaConfigRaw) -> Result<Self, Self::Error> {
        Ok(Self::new(raw.polya_factor)?.with_validation(raw.validate_args))
    }
}

impl From<PolyaConfig> for PolyaConfigRaw {
    fn from(c: PolyaConfig) -> Self {
        Self {
            polya_factor: c.polya_factor,
            validate_args: c.validate_args,
        }
    }
}

impl Default for PolyaConfig {
    fn default() -> Self {
        Self {
            polya_factor: DEFAULT_POLYA_FACTOR,
            validate_args: false,
        }
    }
}

impl PolyaConfig {
    /// Create a configuration with the given polya factor and validation off.
    ///
    /// # Errors
    /// Returns [`PolyaVolError::InvalidInput`] if `polya_factor` is not
    /// positive and finite.
    pub fn new(polya_factor: f64) -> error::Result<Self> {
        validate_positive(polya_factor, "polya_factor")?;
        Ok(Self {
            polya_factor,
            validate_args: false,
        })
    }

    /// Enable or disable the no-arbitrage validator.
    pub fn with_validation(mut self, validate_args: bool) -> Self {
        self.validate_args = validate_args;
        self
    }

    /// The Polya CDF coefficient.
    pub fn polya_factor(&self) -> f64 {
        self.polya_factor
    }

    /// Whether inputs are validated before solving.
    pub fn validate_args(&self) -> bool {
        self.validate_args
    }
}
