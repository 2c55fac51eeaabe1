//! Approximate implied volatility extraction from option prices.
//!
//! The pipeline runs three pure, element-wise stages:
//!
//! - [`bounds`]: optional no-arbitrage validation of the raw quotes
//! - [`normalize`](mod@normalize): strike normalization of price and forward
//! - [`polya`]: the Stefanica-Radoicic closed-form solver
//!
//! [`PolyaImpliedVol`] handles single quotes; [`ImpliedVolBuilder`] and
//! [`implied_volatility`] handle broadcast batches.

pub mod bounds;
pub mod builder;
pub mod config;
pub mod normalize;
pub mod polya;
pub mod quote;

pub use bounds::{ArbitrageBounds, BoundCheck, check_quote};
pub use builder::{ImpliedVolBuilder, implied_volatility};
pub use config::{
    BOUND_EPSILON, DEFAULT_POLYA_FACTOR, EIGHTHS_POLYA_FACTOR, OPTIMAL_POLYA_FACTOR, PolyaConfig,
};
pub use normalize::{NormalizedQuote, normalize};
pub use polya::{PolyaImpliedVol, implied_total_vol, polya_cdf};
pub use quote::Quote;
