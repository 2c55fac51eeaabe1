//! No-arbitrage validation of option quotes.
//!
//! Undiscounted European option prices must lie in a model-independent band:
//!
//! ```text
//! call:  max(F − K, 0) ≤ C ≤ F
//! put:   max(K − F, 0) ≤ P ≤ K
//! ```
//!
//! Prices inside the band but within [`BOUND_EPSILON`] of either edge are also
//! rejected: the quadratic solved by the Polya method degenerates there.
//!
//! Checks run condition by condition across the whole batch, so the first
//! failing condition is reported together with its first failing element.
//! Every comparison is phrased so that NaN inputs fail it.

use crate::error::{self, PolyaVolError};
use crate::implied::config::BOUND_EPSILON;
use crate::implied::quote::{Quote, QuoteBatch};
use crate::types::OptionType;

/// Undiscounted no-arbitrage price band of a European option.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArbitrageBounds {
    /// Intrinsic value on the forward.
    pub lower: f64,
    /// Forward for calls, strike for puts.
    pub upper: f64,
}

impl ArbitrageBounds {
    /// Bounds for an option on `forward` struck at `strike`.
    ///
    /// # Examples
    /// ```
    /// use polyavol::implied::ArbitrageBounds;
    /// use polyavol::OptionType;
    ///
    /// let b = ArbitrageBounds::for_quote(110.0, 100.0, OptionType::Call);
    /// assert_eq!((b.lower, b.upper), (10.0, 110.0));
    /// let b = ArbitrageBounds::for_quote(110.0, 100.0, OptionType::Put);
    /// assert_eq!((b.lower, b.upper), (0.0, 100.0));
    /// ```
    pub fn for_quote(forward: f64, strike: f64, option_type: OptionType) -> Self {
        match option_type {
            OptionType::Call => Self {
                lower: (forward - strike).max(0.0),
                upper: forward,
            },
            OptionType::Put => Self {
                lower: (strike - forward).max(0.0),
                upper: strike,
            },
        }
    }

    /// `price ≥ lower`. False for NaN.
    pub fn above_lower(&self, price: f64) -> bool {
        self.lower <= price
    }

    /// `price ≤ upper`. False for NaN.
    pub fn below_upper(&self, price: f64) -> bool {
        self.upper >= price
    }

    /// `|price − lower| > epsilon`. False for NaN.
    pub fn clear_of_lower(&self, price: f64, epsilon: f64) -> bool {
        (price - self.lower).abs() > epsilon
    }

    /// `|price − upper| > epsilon`. False for NaN.
    pub fn clear_of_upper(&self, price: f64, epsilon: f64) -> bool {
        (price - self.upper).abs() > epsilon
    }

    /// Whether `price` lies inside the closed band.
    pub fn contains(&self, price: f64) -> bool {
        self.above_lower(price) && self.below_upper(price)
    }

    /// Whether `price` lies inside the band and more than `epsilon` away
    /// from both edges. A quote passes the price checks of the validator
    /// exactly when this holds with [`BOUND_EPSILON`].
    pub fn contains_strictly(&self, price: f64, epsilon: f64) -> bool {
        self.contains(price)
            && self.clear_of_lower(price, epsilon)
            && self.clear_of_upper(price, epsilon)
    }
}

/// A single precondition checked by the validator, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundCheck {
    /// `expiry ≥ 0`.
    ExpiryNonNegative,
    /// `forward > 0`.
    ForwardPositive,
    /// `strike > 0`.
    StrikePositive,
    /// Undiscounted price at or above the intrinsic value.
    LowerBound,
    /// Undiscounted price at or below the forward (call) or strike (put).
    UpperBound,
    /// Undiscounted price more than epsilon above the lower bound.
    LowerProximity,
    /// Undiscounted price more than epsilon below the upper bound.
    UpperProximity,
}

impl BoundCheck {
    /// All checks, in the order the validator runs them.
    pub const ALL: [BoundCheck; 7] = [
        BoundCheck::ExpiryNonNegative,
        BoundCheck::ForwardPositive,
        BoundCheck::StrikePositive,
        BoundCheck::LowerBound,
        BoundCheck::UpperBound,
        BoundCheck::LowerProximity,
        BoundCheck::UpperProximity,
    ];

    /// Whether `quote` passes this check.
    pub fn passes(self, quote: &Quote) -> bool {
        let price = quote.undiscounted_price();
        let bounds = ArbitrageBounds::for_quote(quote.forward, quote.strike, quote.option_type);
        match self {
            BoundCheck::ExpiryNonNegative => quote.expiry >= 0.0,
            BoundCheck::ForwardPositive => quote.forward > 0.0,
            BoundCheck::StrikePositive => quote.strike > 0.0,
            BoundCheck::LowerBound => bounds.above_lower(price),
            BoundCheck::UpperBound => bounds.below_upper(price),
            BoundCheck::LowerProximity => bounds.clear_of_lower(price, BOUND_EPSILON),
            BoundCheck::UpperProximity => bounds.clear_of_upper(price, BOUND_EPSILON),
        }
    }

    fn to_error(self, index: usize, quote: &Quote) -> PolyaVolError {
        let price = quote.undiscounted_price();
        let bounds = ArbitrageBounds::for_quote(quote.forward, quote.strike, quote.option_type);
        let kind = match quote.option_type {
            OptionType::Call => "call",
            OptionType::Put => "put",
        };
        match self {
            BoundCheck::ExpiryNonNegative => PolyaVolError::InvalidDomain {
                index,
                message: format!("expiry must be non-negative, got {}", quote.expiry),
            },
            BoundCheck::ForwardPositive => PolyaVolError::InvalidDomain {
                index,
                message: format!("forward must be positive, got {}", quote.forward),
            },
            BoundCheck::StrikePositive => PolyaVolError::InvalidDomain {
                index,
                message: format!("strike must be positive, got {}", quote.strike),
            },
            BoundCheck::LowerBound => PolyaVolError::ArbitrageViolation {
                index,
                message: format!(
                    "undiscounted {kind} price {price} below intrinsic value {}",
                    bounds.lower
                ),
            },
            BoundCheck::UpperBound => PolyaVolError::ArbitrageViolation {
                index,
                message: format!(
                    "undiscounted {kind} price {price} above upper bound {}",
                    bounds.upper
                ),
            },
            BoundCheck::LowerProximity => PolyaVolError::NumericalInstability {
                index,
                message: format!(
                    "undiscounted {kind} price {price} within {BOUND_EPSILON:e} of lower bound {}",
                    bounds.lower
                ),
            },
            BoundCheck::UpperProximity => PolyaVolError::NumericalInstability {
                index,
                message: format!(
                    "undiscounted {kind} price {price} within {BOUND_EPSILON:e} of upper bound {}",
                    bounds.upper
                ),
            },
        }
    }
}

/// Validate a single quote against every [`BoundCheck`].
///
/// # Errors
/// Returns [`PolyaVolError::InvalidDomain`],
/// [`PolyaVolError::ArbitrageViolation`] or
/// [`PolyaVolError::NumericalInstability`] (with index 0) for the first
/// failing check.
///
/// # Examples
/// ```
/// use polyavol::implied::{check_quote, Quote};
/// use polyavol::{OptionType, PolyaVolError};
///
/// let ok = Quote::new(10.0, 100.0, 100.0, 1.0, OptionType::Call);
/// assert!(check_quote(&ok).is_ok());
///
/// let zero_price = Quote::new(0.0, 100.0, 100.0, 1.0, OptionType::Call);
/// assert!(matches!(
///     check_quote(&zero_price),
///     Err(PolyaVolError::NumericalInstability { .. })
/// ));
/// ```
pub fn check_quote(quote: &Quote) -> error::Result<()> {
    match BoundCheck::ALL.iter().find(|c| !c.passes(quote)) {
        Some(check) => Err(check.to_error(0, quote)),
        None => Ok(()),
    }
}

/// Validate every quote of a batch, condition-major.
pub(crate) fn check_batch(batch: &QuoteBatch<'_>) -> error::Result<()> {
    for check in BoundCheck::ALL {
        if let Some((index, quote)) = batch.iter().find(|(_, q)| !check.passes(q)) {
            #[cfg(feature = "logging")]
            tracing::warn!(index, check = ?check, "quote rejected by no-arbitrage validation");
            return Err(check.to_error(index, &quote));
        }
    }
    Ok(())
}
