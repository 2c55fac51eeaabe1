//! Batch implied volatility extraction.
//!
//! ```
//! use polyavol::implied::ImpliedVolBuilder;
//!
//! let prices = vec![10.0, 5.0, 15.0];
//! let strikes = vec![100.0, 110.0, 110.0];
//!
//! let vols = ImpliedVolBuilder::new()
//!     .option_prices(&prices)
//!     .forwards(&[100.0])
//!     .strikes(&strikes)
//!     .expiries(&[1.0])
//!     .is_call_options(&[true, true, false])
//!     .validate_args(true)
//!     .compute()
//!     .unwrap();
//!
//! assert_eq!(vols.len(), 3);
//! assert!((vols[1] - vols[2]).abs() < 1e-12); // put-call parity
//! ```

use crate::error::{self, PolyaVolError};
use crate::implied::bounds::check_batch;
use crate::implied::config::PolyaConfig;
use crate::implied::polya::solve_quote;
use crate::implied::quote::QuoteBatch;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Batches shorter than this are solved on the calling thread.
#[cfg(feature = "parallel")]
const PARALLEL_MIN_LEN: usize = 4096;

/// Approximate implied volatilities for a batch of quotes.
///
/// Every slice must have the batch length or length one (broadcast).
/// `discount_factors` defaults to 1 and `is_call_options` to all calls.
///
/// With validation disabled in `config`, invalid quotes produce NaN or
/// infinite vols instead of errors.
///
/// # Errors
/// Returns [`PolyaVolError::InvalidInput`] for non-broadcastable lengths,
/// and validator errors when `config.validate_args()` is set.
///
/// # Examples
/// ```
/// use polyavol::implied::{implied_volatility, PolyaConfig};
///
/// let vols = implied_volatility(
///     &[10.0],
///     &[100.0],
///     &[100.0],
///     &[1.0],
///     None,
///     None,
///     PolyaConfig::default(),
/// )?;
/// assert!((vols[0] - 0.2513).abs() < 1e-3);
/// # Ok::<(), polyavol::PolyaVolError>(())
/// ```
pub fn implied_volatility(
    option_prices: &[f64],
    forwards: &[f64],
    strikes: &[f64],
    expiries: &[f64],
    discount_factors: Option<&[f64]>,
    is_call_options: Option<&[bool]>,
    config: PolyaConfig,
) -> error::Result<Vec<f64>> {
    let batch = QuoteBatch::new(
        option_prices,
        forwards,
        strikes,
        expiries,
        discount_factors,
        is_call_options,
    )?;
    solve_batch(&batch, config)
}

fn solve_batch(batch: &QuoteBatch<'_>, config: PolyaConfig) -> error::Result<Vec<f64>> {
    #[cfg(feature = "logging")]
    tracing::debug!(
        n_quotes = batch.len(),
        validate_args = config.validate_args(),
        polya_factor = config.polya_factor(),
        "implied vol batch started"
    );

    if config.validate_args() {
        check_batch(batch)?;
    }

    let k = config.polya_factor();

    #[cfg(feature = "parallel")]
    let vols: Vec<f64> = if batch.len() >= PARALLEL_MIN_LEN {
        (0..batch.len())
            .into_par_iter()
            .map(|i| solve_quote(&batch.quote(i), k))
            .collect()
    } else {
        batch.iter().map(|(_, q)| solve_quote(&q, k)).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let vols: Vec<f64> = batch.iter().map(|(_, q)| solve_quote(&q, k)).collect();

    #[cfg(feature = "logging")]
    tracing::debug!(
        n_quotes = vols.len(),
        n_non_finite = vols.iter().filter(|v| !v.is_finite()).count(),
        "implied vol batch complete"
    );

    Ok(vols)
}

/// Builder for batch implied volatility calls.
///
/// Collects borrowed input columns and the solver configuration, then
/// evaluates every quote with [`compute`](ImpliedVolBuilder::compute).
///
/// # Examples
///
/// ```
/// use polyavol::implied::{ImpliedVolBuilder, OPTIMAL_POLYA_FACTOR};
///
/// let vols = ImpliedVolBuilder::new()
///     .option_prices(&[9.5, 4.75])
///     .forwards(&[100.0])
///     .strikes(&[100.0, 110.0])
///     .expiries(&[1.0])
///     .discount_factors(&[0.95])
///     .polya_factor(OPTIMAL_POLYA_FACTOR)
///     .validate_args(true)
///     .compute()?;
///
/// assert!(vols.iter().all(|v| v.is_finite() && *v > 0.0));
/// # Ok::<(), polyavol::PolyaVolError>(())
/// ```
#[derive(Debug, Default)]
pub struct ImpliedVolBuilder<'a> {
    option_prices: Option<&'a [f64]>,
    forwards: Option<&'a [f64]>,
    strikes: Option<&'a [f64]>,
    expiries: Option<&'a [f64]>,
    discount_factors: Option<&'a [f64]>,
    is_call_options: Option<&'a [bool]>,
    polya_factor: Option<f64>,
    validate_args: bool,
}

impl<'a> ImpliedVolBuilder<'a> {
    /// Create an empty builder (polya factor 2/π, no validation).
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn with_config(config: PolyaConfig) -> Self {
        Self {
            polya_factor: Some(config.polya_factor()),
            validate_args: config.validate_args(),
            ..Self::default()
        }
    }

    /// Observed option prices (required).
    pub fn option_prices(mut self, option_prices: &'a [f64]) -> Self {
        self.option_prices = Some(option_prices);
        self
    }

    /// Forward prices to expiry (required).
    pub fn forwards(mut self, forwards: &'a [f64]) -> Self {
        self.forwards = Some(forwards);
        self
    }

    /// Strikes (required).
    pub fn strikes(mut self, strikes: &'a [f64]) -> Self {
        self.strikes = Some(strikes);
        self
    }

    /// Times to expiry (required).
    pub fn expiries(mut self, expiries: &'a [f64]) -> Self {
        self.expiries = Some(expiries);
        self
    }

    /// Discount factors to expiry. Defaults to 1 (undiscounted prices).
    pub fn discount_factors(mut self, discount_factors: &'a [f64]) -> Self {
        self.discount_factors = Some(discount_factors);
        self
    }

    /// Call flags. Defaults to all calls.
    pub fn is_call_options(mut self, is_call_options: &'a [bool]) -> Self {
        self.is_call_options = Some(is_call_options);
        self
    }

    /// Polya CDF coefficient shared by the whole batch.
    pub fn polya_factor(mut self, polya_factor: f64) -> Self {
        self.polya_factor = Some(polya_factor);
        self
    }

    /// Run the no-arbitrage validator before solving.
    pub fn validate_args(mut self, validate_args: bool) -> Self {
        self.validate_args = validate_args;
        self
    }

    /// Solve every quote of the batch.
    ///
    /// # Errors
    /// Returns [`PolyaVolError::InvalidInput`] if a required column is
    /// missing, lengths do not broadcast, or the polya factor is not
    /// positive and finite. Returns validator errors when validation is on.
    pub fn compute(self) -> error::Result<Vec<f64>> {
        let option_prices = required(self.option_prices, "option_prices")?;
        let forwards = required(self.forwards, "forwards")?;
        let strikes = required(self.strikes, "strikes")?;
        let expiries = required(self.expiries, "expiries")?;

        let config = match self.polya_factor {
            Some(k) => PolyaConfig::new(k)?,
            None => PolyaConfig::default(),
        }
        .with_validation(self.validate_args);

        implied_volatility(
            option_prices,
            forwards,
            strikes,
            expiries,
            self.discount_factors,
            self.is_call_options,
            config,
        )
    }
}

fn required<'a, T>(column: Option<&'a [T]>, name: &str) -> error::Result<&'a [T]> {
    column.ok_or_else(|| PolyaVolError::InvalidInput {
        message: format!("{name} is required"),
    })
}
