//! Market conventions for turning raw market data into solver inputs.
//!
//! The implied volatility routines take forwards and discount factors. These
//! helpers derive them from spot, rates, and dividend yields.

use crate::error;
use crate::validate::{validate_finite, validate_non_negative, validate_positive};

/// Convert a strike to log-moneyness: k = ln(K / F).
///
/// # Errors
/// Returns [`PolyaVolError::InvalidInput`](crate::PolyaVolError::InvalidInput)
/// if either argument is not positive and finite.
pub fn log_moneyness(strike: f64, forward: f64) -> error::Result<f64> {
    Ok(moneyness(strike, forward)?.ln())
}

/// Convert a strike to simple moneyness: m = K / F.
///
/// # Errors
/// Returns [`PolyaVolError::InvalidInput`](crate::PolyaVolError::InvalidInput)
/// if either argument is not positive and finite.
pub fn moneyness(strike: f64, forward: f64) -> error::Result<f64> {
    validate_positive(strike, "strike")?;
    validate_positive(forward, "forward")?;
    Ok(strike / forward)
}

/// Compute forward price from spot: F = S · exp((r − q) · T).
///
/// # Errors
/// Returns [`PolyaVolError::InvalidInput`](crate::PolyaVolError::InvalidInput)
/// for a non-positive spot, non-finite rates, or a negative expiry.
///
/// # Examples
/// ```
/// use polyavol::conventions::forward_price;
/// let f = forward_price(100.0, 0.05, 0.0, 1.0).unwrap();
/// assert!((f - 105.127_109_637_602_4).abs() < 1e-9);
/// ```
pub fn forward_price(spot: f64, rate: f64, dividend_yield: f64, expiry: f64) -> error::Result<f64> {
    validate_positive(spot, "spot")?;
    validate_finite(rate, "rate")?;
    validate_finite(dividend_yield, "dividend_yield")?;
    validate_non_negative(expiry, "expiry")?;
    Ok(spot * ((rate - dividend_yield) * expiry).exp())
}

/// Continuously compounded discount factor: D = exp(−r · T).
///
/// # Errors
/// Returns [`PolyaVolError::InvalidInput`](crate::PolyaVolError::InvalidInput)
/// for a non-finite rate or a negative expiry.
pub fn discount_factor(rate: f64, expiry: f64) -> error::Result<f64> {
    validate_finite(rate, "rate")?;
    validate_non_negative(expiry, "expiry")?;
    Ok((-rate * expiry).exp())
}
