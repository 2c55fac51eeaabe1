//! Core domain types for implied volatility extraction.
//!
//! Outputs are wrapped in newtypes so an annualized volatility cannot be
//! silently confused with an implied total volatility `σ√T`. Inputs stay
//! bare `f64` for ergonomics; parameter names document their meaning.
//!
//! These types wrap `f64`, so only `PartialEq` and `PartialOrd` are derived.

use serde::{Deserialize, Serialize};

/// Implied volatility `σ`, measured as annualized standard deviation.
///
/// # Examples
/// ```
/// use polyavol::types::Vol;
/// let vol = Vol(0.20);
/// assert_eq!(vol.0, 0.20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Vol(pub f64);

/// Implied total volatility `σ·√T`, dimensionless.
///
/// # Examples
/// ```
/// use polyavol::types::{TotalVol, Vol};
/// let total = TotalVol(0.40);
/// assert_eq!(total.to_vol(4.0), Vol(0.20));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct TotalVol(pub f64);

impl TotalVol {
    /// Rescale to an annualized volatility: `σ = total / √T`.
    ///
    /// A zero expiry divides by zero and yields an infinite or NaN vol.
    pub fn to_vol(self, expiry: f64) -> Vol {
        Vol(self.0 / expiry.sqrt())
    }
}

/// Option type: call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OptionType {
    /// Right to buy at strike price.
    #[default]
    Call,
    /// Right to sell at strike price.
    Put,
}

impl OptionType {
    /// Map a call flag to an option type (`true` → [`Call`](OptionType::Call)).
    pub fn from_is_call(is_call: bool) -> Self {
        if is_call {
            OptionType::Call
        } else {
            OptionType::Put
        }
    }

    /// `+1` for calls, `-1` for puts.
    pub fn sign(self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Whether this is a call.
    pub fn is_call(self) -> bool {
        self == OptionType::Call
    }
}

impl From<bool> for OptionType {
    fn from(is_call: bool) -> Self {
        OptionType::from_is_call(is_call)
    }
}
