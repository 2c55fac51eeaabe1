//! Strike normalization of option quotes.
//!
//! The Polya solver works on dimensionless quantities: the price per unit of
//! discounted strike and the forward per unit of strike.

use crate::implied::quote::Quote;

/// A quote expressed relative to its (discounted) strike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedQuote {
    /// `option_price / (strike · discount_factor)`.
    pub price: f64,
    /// `forward / strike`.
    pub forward: f64,
}

impl NormalizedQuote {
    /// `y = ln(F / K)`.
    pub fn log_forward(&self) -> f64 {
        self.forward.ln()
    }
}

/// Normalize a raw quote. Non-finite inputs propagate.
///
/// # Examples
/// ```
/// use polyavol::implied::{normalize, Quote};
/// use polyavol::OptionType;
///
/// let q = Quote::new(9.0, 110.0, 100.0, 1.0, OptionType::Call).with_discount_factor(0.9);
/// let n = normalize(&q);
/// assert!((n.price - 0.1).abs() < 1e-15);
/// assert!((n.forward - 1.1).abs() < 1e-15);
/// ```
pub fn normalize(quote: &Quote) -> NormalizedQuote {
    let adjusted_strike = quote.strike * quote.discount_factor;
    NormalizedQuote {
        price: quote.option_price / adjusted_strike,
        forward: quote.forward / quote.strike,
    }
}
