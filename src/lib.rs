//! # polyavol
//!
//! Closed-form approximate Black implied volatility for European options.
//!
//! Implements the Stefanica-Radoicic explicit formula: with both normal CDFs
//! of the Black formula replaced by Polya's approximation, the implied total
//! volatility solves a quadratic. Repricing at the result reproduces the
//! quote to about 0.003 per unit of strike; it is meant to seed a root
//! finder.
//!
//! Pipeline: raw quotes → no-arbitrage validation (optional) → strike
//! normalization → Polya solver → implied volatility.
//!
//! ## Architecture
//!
//! - **`implied`**: validator, normalizer, solver, scalar and batch entry points
//! - **`conventions`**: forwards and discount factors from market data
//! - **`types`**: [`OptionType`], [`Vol`], [`TotalVol`]
//!
//! ## Design
//!
//! - **Pure element-wise functions.** No state outlives a call; batches are
//!   solved independently per element and in parallel with the `parallel`
//!   feature.
//! - **Validation is opt-in for batches.** With validation off, invalid
//!   quotes produce NaN or infinite vols rather than errors. The scalar
//!   [`PolyaImpliedVol`](implied::PolyaImpliedVol) API always validates.
//! - **No panics.** Every fallible operation returns [`Result`].
//!
//! ```
//! use polyavol::implied::PolyaImpliedVol;
//! use polyavol::OptionType;
//!
//! let vol = PolyaImpliedVol::default().compute(10.0, 100.0, 100.0, 1.0, OptionType::Call)?;
//! assert!((vol.0 - 0.25).abs() < 0.01);
//! # Ok::<(), polyavol::PolyaVolError>(())
//! ```

pub mod conventions;
pub mod error;
pub mod implied;
pub mod types;
mod validate;

#[doc(inline)]
pub use error::{PolyaVolError, Result};
#[doc(inline)]
pub use implied::{ImpliedVolBuilder, PolyaConfig, PolyaImpliedVol, implied_volatility};
#[doc(inline)]
pub use types::{OptionType, TotalVol, Vol};
