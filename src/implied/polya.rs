//! Approximate Black implied volatility via the Polya normal-CDF approximation.
//!
//! Replacing both normal CDFs in the Black formula by Polya's elementary
//! approximation
//!
//! ```text
//! N(x) ≈ 0.5 + 0.5 · sign(x) · √(1 − exp(−k·x²))
//! ```
//!
//! turns the pricing equation into a quadratic in an auxiliary unknown that
//! can be solved in closed form. The Polya CDF is accurate to about 0.003
//! (`k = 2/π`) and the resulting volatility is a good seed for a root finder,
//! not a replacement for one.
//!
//! Notation (normalized quote): `α` is the price per unit discounted strike,
//! `F/K` the normalized forward and `y = ln(F/K)`.
//!
//! # References
//! - Stefanica, D. & Radoicic, R. "An explicit implied volatility formula",
//!   International Journal of Theoretical and Applied Finance 20(7) (2017)
//! - Eidous, O. & Al-Salman, S. "One-term approximation for Normal
//!   distribution function", Mathematics and Statistics 4(1) (2016)

use std::f64::consts::LN_2;

use crate::error;
use crate::implied::bounds::check_quote;
use crate::implied::config::{DEFAULT_POLYA_FACTOR, PolyaConfig};
use crate::implied::normalize::{NormalizedQuote, normalize};
use crate::implied::quote::Quote;
use crate::types::{OptionType, TotalVol, Vol};
use crate::validate::validate_positive;

/// Relative size of the negative `γ ± y` that is treated as rounding noise.
const DRIFT_TOLERANCE: f64 = 1e-12;

/// Polya approximation of the standard normal CDF.
///
/// # Examples
/// ```
/// use polyavol::implied::{polya_cdf, DEFAULT_POLYA_FACTOR};
///
/// assert_eq!(polya_cdf(0.0, DEFAULT_POLYA_FACTOR), 0.5);
/// assert!((polya_cdf(1.0, DEFAULT_POLYA_FACTOR) - 0.841_344_746).abs() < 3.2e-3);
/// ```
pub fn polya_cdf(x: f64, polya_factor: f64) -> f64 {
    0.5 + sign(x) * polya_half_width(x * x, polya_factor)
}

/// `0.5 · √(1 − exp(−k·x²))`, given `x²`.
#[inline]
fn polya_half_width(x_squared: f64, polya_factor: f64) -> f64 {
    0.5 * (-(-polya_factor * x_squared).exp_m1()).sqrt()
}

/// Sign with `sign(0) = 0`; NaN propagates.
#[inline]
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        x
    }
}

/// Square root that maps rounding-sized negatives to zero.
///
/// Values below `-DRIFT_TOLERANCE · scale` are left alone and yield NaN.
#[inline]
fn drift_sqrt(x: f64, scale: f64) -> f64 {
    if x < 0.0 && x >= -DRIFT_TOLERANCE * scale {
        0.0
    } else {
        x.sqrt()
    }
}

/// Coefficients `(A, B, ln C)` of the Stefanica-Radoicic quadratic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct QuadraticCoeffs {
    pub a: f64,
    pub b: f64,
    /// Kept in log space: `C` over- or underflows far from the money.
    pub ln_c: f64,
}

/// Table 3 of Stefanica-Radoicic.
fn quadratic_coeffs(
    quote: &NormalizedQuote,
    log_forward: f64,
    option_sign: f64,
    polya_factor: f64,
) -> QuadraticCoeffs {
    let alpha = quote.price;
    let fwd = quote.forward;

    // e^y − 1 and e^y + 1
    let q1 = fwd - 1.0;
    let q2 = fwd + 1.0;
    let r = 2.0 * alpha - option_sign * q1;

    // f1 = e^(−k·y), g1 = e^((1−k)·y)
    let f1 = fwd.powf(-polya_factor);
    let f2 = f1.recip();
    let g1 = f1 * fwd;
    let g2 = g1.recip();

    let a = (g1 - g2).powi(2);
    let b = 4.0 * (f1 + f2) - 2.0 * (g1 + g2) * (1.0 + fwd * fwd - r * r) / fwd;
    let ln_c = (4.0 * alpha).ln()
        + (alpha - option_sign * q1).ln()
        + (q2 - r).ln()
        + (q2 + r).ln()
        - 2.0 * log_forward;

    QuadraticCoeffs { a, b, ln_c }
}

/// Implied total volatility `σ√T` of a normalized quote.
///
/// No validation is performed: out-of-band prices produce NaN or infinite
/// results rather than errors.
pub fn implied_total_vol(
    quote: &NormalizedQuote,
    option_type: OptionType,
    polya_factor: f64,
) -> TotalVol {
    let y = quote.log_forward();
    let sign_y = sign(y);
    let option_sign = option_type.sign();
    let signs = option_sign * sign_y;

    // Polya N(d1) at the total vol √(2|y|), where d2 = 0.
    let cdf = 0.5 + signs * polya_half_width(2.0 * y.abs(), polya_factor);
    // C0 / P0 of Table 2: the price at which the two branches below meet.
    let threshold = signs * (quote.forward.max(1.0) * cdf - quote.forward.min(1.0) / 2.0);

    let QuadraticCoeffs { a, b, ln_c } = quadratic_coeffs(quote, y, option_sign, polya_factor);
    let c = ln_c.exp();
    let ln_beta = LN_2 + ln_c - (b + (b * b + 4.0 * a * c).sqrt()).ln();
    let gamma = -ln_beta / polya_factor;

    let scale = gamma.abs().max(y.abs()).max(1.0);
    let term1 = drift_sqrt(gamma + y, scale);
    let term2 = drift_sqrt(gamma - y, scale);

    if quote.price <= threshold {
        TotalVol(sign_y * (term1 - term2))
    } else {
        TotalVol(term1 + term2)
    }
}

/// Unvalidated implied volatility of a raw quote.
#[inline]
pub(crate) fn solve_quote(quote: &Quote, polya_factor: f64) -> f64 {
    implied_total_vol(&normalize(quote), quote.option_type, polya_factor)
        .to_vol(quote.expiry)
        .0
}

/// Approximate Black implied volatility calculator (Stefanica-Radoicic).
///
/// All `compute*` methods validate the quote against its no-arbitrage
/// bounds first. Use [`compute_unchecked`](PolyaImpliedVol::compute_unchecked)
/// to skip validation.
///
/// # Examples
/// ```
/// use polyavol::implied::PolyaImpliedVol;
/// use polyavol::OptionType;
///
/// let iv = PolyaImpliedVol::default()
///     .compute(10.0, 100.0, 100.0, 1.0, OptionType::Call)?;
/// assert!((iv.0 - 0.2513).abs() < 1e-3);
/// # Ok::<(), polyavol::PolyaVolError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolyaImpliedVol {
    /// Coefficient `k` of the Polya CDF.
    polya_factor: f64,
}

impl Default for PolyaImpliedVol {
    fn default() -> Self {
        Self {
            polya_factor: DEFAULT_POLYA_FACTOR,
        }
    }
}

impl PolyaImpliedVol {
    /// Create a calculator with the given Polya coefficient.
    ///
    /// # Errors
    /// Returns [`PolyaVolError::InvalidInput`](crate::PolyaVolError::InvalidInput)
    /// if `polya_factor` is not positive and finite.
    pub fn new(polya_factor: f64) -> error::Result<Self> {
        validate_positive(polya_factor, "polya_factor")?;
        Ok(Self { polya_factor })
    }

    /// Calculator using the coefficient of `config`.
    pub fn from_config(config: &PolyaConfig) -> Self {
        Self {
            polya_factor: config.polya_factor(),
        }
    }

    /// The Polya coefficient.
    pub fn polya_factor(&self) -> f64 {
        self.polya_factor
    }

    /// Implied volatility of an undiscounted option price.
    ///
    /// # Arguments
    /// * `option_price` — Undiscounted market price
    /// * `forward` — Forward price at expiry (must be > 0)
    /// * `strike` — Strike price (must be > 0)
    /// * `expiry` — Time to expiry (must be ≥ 0; zero yields an infinite vol)
    /// * `option_type` — Call or Put
    ///
    /// # Errors
    /// Returns [`PolyaVolError::InvalidDomain`](crate::PolyaVolError::InvalidDomain),
    /// [`PolyaVolError::ArbitrageViolation`](crate::PolyaVolError::ArbitrageViolation) or
    /// [`PolyaVolError::NumericalInstability`](crate::PolyaVolError::NumericalInstability)
    /// when the quote fails validation.
    pub fn compute(
        &self,
        option_price: f64,
        forward: f64,
        strike: f64,
        expiry: f64,
        option_type: OptionType,
    ) -> error::Result<Vol> {
        let quote = Quote::new(option_price, forward, strike, expiry, option_type);
        self.compute_quote(&quote)
    }

    /// Implied volatility of a discounted option price.
    ///
    /// # Errors
    /// Same as [`compute`](PolyaImpliedVol::compute); bounds are checked on
    /// `option_price / discount_factor`.
    pub fn compute_discounted(
        &self,
        option_price: f64,
        forward: f64,
        strike: f64,
        expiry: f64,
        discount_factor: f64,
        option_type: OptionType,
    ) -> error::Result<Vol> {
        let quote = Quote::new(option_price, forward, strike, expiry, option_type)
            .with_discount_factor(discount_factor);
        self.compute_quote(&quote)
    }

    /// Implied total volatility `σ√T` of an undiscounted price.
    ///
    /// Does not need an expiry, so it stays finite for expiring options.
    ///
    /// # Errors
    /// Same as [`compute`](PolyaImpliedVol::compute).
    pub fn total_vol(
        &self,
        option_price: f64,
        forward: f64,
        strike: f64,
        option_type: OptionType,
    ) -> error::Result<TotalVol> {
        let quote = Quote::new(option_price, forward, strike, 0.0, option_type);
        check_quote(&quote)?;
        Ok(implied_total_vol(
            &normalize(&quote),
            option_type,
            self.polya_factor,
        ))
    }

    /// Validated implied volatility of a [`Quote`].
    ///
    /// # Errors
    /// Same as [`compute`](PolyaImpliedVol::compute).
    pub fn compute_quote(&self, quote: &Quote) -> error::Result<Vol> {
        check_quote(quote)?;
        Ok(self.compute_unchecked(quote))
    }

    /// Implied volatility without validation; may be NaN or infinite.
    pub fn compute_unchecked(&self, quote: &Quote) -> Vol {
        Vol(solve_quote(quote, self.polya_factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PolyaVolError;
    use crate::implied::config::OPTIMAL_POLYA_FACTOR;
    use approx::assert_abs_diff_eq;
    use statrs::distribution::{ContinuousCDF, Normal};

    fn normalized(price: f64, forward: f64, strike: f64) -> NormalizedQuote {
        normalize(&Quote::new(price, forward, strike, 1.0, OptionType::Call))
    }

    // --- Polya CDF ---

    #[test]
    fn polya_cdf_is_symmetric() {
        for x in [0.1, 0.5, 1.0, 2.5, 6.0] {
            let up = polya_cdf(x, DEFAULT_POLYA_FACTOR);
            let down = polya_cdf(-x, DEFAULT_POLYA_FACTOR);
            assert_abs_diff_eq!(up + down, 1.0, epsilon = 1e-15);
        }
        assert_eq!(polya_cdf(0.0, DEFAULT_POLYA_FACTOR), 0.5);
    }

    #[test]
    fn polya_cdf_error_bounds() {
        let n = Normal::new(0.0, 1.0).unwrap();
        let max_err = |k: f64| {
            (-10_000..=10_000)
                .map(|i| i as f64 / 1000.0)
                .map(|x| (polya_cdf(x, k) - n.cdf(x)).abs())
                .fold(0.0_f64, f64::max)
        };
        assert!(max_err(DEFAULT_POLYA_FACTOR) < 3.2e-3);
        assert!(max_err(OPTIMAL_POLYA_FACTOR) < 1.7e-3);
    }

    #[test]
    fn polya_cdf_saturates() {
        assert_abs_diff_eq!(polya_cdf(40.0, DEFAULT_POLYA_FACTOR), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(polya_cdf(-40.0, DEFAULT_POLYA_FACTOR), 0.0, epsilon = 1e-15);
    }

    // --- helpers ---

    #[test]
    fn sign_of_zero_is_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(3.0), 1.0);
        assert_eq!(sign(-1e-300), -1.0);
        assert!(sign(f64::NAN).is_nan());
    }

    #[test]
    fn drift_sqrt_clamps_only_rounding_noise() {
        assert_eq!(drift_sqrt(-5e-15, 1.0), 0.0);
        assert_eq!(drift_sqrt(4.0, 1.0), 2.0);
        assert!(drift_sqrt(-1e-6, 1.0).is_nan());
        assert!(drift_sqrt(-1e-3, 10.0).is_nan());
    }

    #[test]
    fn coefficients_at_the_money() {
        // y = 0: f = g = 1, so A = 0 and B = 4R² with R = 2α.
        let q = normalized(10.0, 100.0, 100.0);
        let c = quadratic_coeffs(&q, 0.0, 1.0, DEFAULT_POLYA_FACTOR);
        assert_eq!(c.a, 0.0);
        assert_abs_diff_eq!(c.b, 4.0 * 0.2 * 0.2, epsilon = 1e-14);
        let expected_ln_c = (0.4_f64).ln() + (0.1_f64).ln() + (1.8_f64).ln() + (2.2_f64).ln();
        assert_abs_diff_eq!(c.ln_c, expected_ln_c, epsilon = 1e-14);
    }

    #[test]
    fn coefficients_are_put_call_consistent() {
        // Put-call parity: α_put = α_call − (F/K − 1).
        let fwd: f64 = 1.1;
        let call = NormalizedQuote {
            price: 0.15,
            forward: fwd,
        };
        let put = NormalizedQuote {
            price: 0.15 - (fwd - 1.0),
            forward: fwd,
        };
        let y = call.log_forward();
        let cc = quadratic_coeffs(&call, y, 1.0, DEFAULT_POLYA_FACTOR);
        let pc = quadratic_coeffs(&put, y, -1.0, DEFAULT_POLYA_FACTOR);
        assert_abs_diff_eq!(cc.a, pc.a, epsilon = 1e-14);
        assert_abs_diff_eq!(cc.b, pc.b, epsilon = 1e-12);
        assert_abs_diff_eq!(cc.ln_c, pc.ln_c, epsilon = 1e-12);
    }

    // --- solver ---

    #[test]
    fn atm_reference_value() {
        let v = PolyaImpliedVol::default()
            .compute(10.0, 100.0, 100.0, 1.0, OptionType::Call)
            .unwrap();
        assert_abs_diff_eq!(v.0, 0.251_292_901_943_019_56, epsilon = 1e-10);
        // Black implied vol of this quote is 0.251322...
        assert!((v.0 - 0.251_322_693_710_148).abs() < 1e-3);
    }

    #[test]
    fn otm_call_reference_value() {
        let v = PolyaImpliedVol::default()
            .compute(5.0, 100.0, 110.0, 1.0, OptionType::Call)
            .unwrap();
        assert_abs_diff_eq!(v.0, 0.217_922_078_983_164_35, epsilon = 1e-10);
    }

    #[test]
    fn expiry_rescales_total_vol() {
        let iv = PolyaImpliedVol::default();
        let one = iv.compute(10.0, 100.0, 100.0, 1.0, OptionType::Call).unwrap();
        let four = iv.compute(10.0, 100.0, 100.0, 4.0, OptionType::Call).unwrap();
        assert_abs_diff_eq!(four.0, one.0 / 2.0, epsilon = 1e-15);
    }

    #[test]
    fn total_vol_matches_vol_times_sqrt_expiry() {
        let iv = PolyaImpliedVol::default();
        let total = iv.total_vol(12.0, 100.0, 105.0, OptionType::Call).unwrap();
        let vol = iv.compute(12.0, 100.0, 105.0, 0.25, OptionType::Call).unwrap();
        assert_abs_diff_eq!(total.0 * 2.0, vol.0, epsilon = 1e-14);
    }

    #[test]
    fn discounting_is_removed_before_solving() {
        let iv = PolyaImpliedVol::default();
        let plain = iv.compute(5.0 / 0.9, 100.0, 110.0, 1.0, OptionType::Call).unwrap();
        let disc = iv
            .compute_discounted(5.0, 100.0, 110.0, 1.0, 0.9, OptionType::Call)
            .unwrap();
        assert_abs_diff_eq!(plain.0, disc.0, epsilon = 1e-12);
        assert_abs_diff_eq!(disc.0, 0.232_580_795_404_807_92, epsilon = 1e-10);
    }

    #[test]
    fn optimal_factor_changes_estimate() {
        let d = PolyaImpliedVol::default()
            .compute(10.0, 100.0, 100.0, 1.0, OptionType::Call)
            .unwrap();
        let o = PolyaImpliedVol::new(OPTIMAL_POLYA_FACTOR)
            .unwrap()
            .compute(10.0, 100.0, 100.0, 1.0, OptionType::Call)
            .unwrap();
        assert_abs_diff_eq!(o.0, 0.254_014_585_900_185_2, epsilon = 1e-9);
        assert!(o.0 > d.0);
    }

    #[test]
    fn branches_meet_at_threshold() {
        // Normalized prices equal to C0/P0 for F/K ∈ {1/1.1, 1.1, 1.25}.
        let cases = [
            (1.0_f64 / 1.1, OptionType::Call, 0.123_570_956_003_858_31),
            (1.1, OptionType::Call, 0.235_928_051_604_244_35),
            (1.1, OptionType::Put, 0.135_928_051_604_244_26),
            (1.25, OptionType::Call, 0.435_820_527_158_537_9),
        ];
        for (fwd, option_type, threshold) in cases {
            let expected = (2.0 * fwd.ln().abs()).sqrt();
            for bump in [1.0 - 1e-12, 1.0, 1.0 + 1e-12] {
                let q = NormalizedQuote {
                    price: threshold * bump,
                    forward: fwd,
                };
                let total = implied_total_vol(&q, option_type, DEFAULT_POLYA_FACTOR);
                assert!(total.0.is_finite(), "NaN near threshold for F/K={fwd}");
                assert_abs_diff_eq!(total.0, expected, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn continuous_across_threshold() {
        let fwd = 1.0 / 1.1;
        let threshold = 0.123_570_956_003_858_31;
        let below = implied_total_vol(
            &NormalizedQuote {
                price: threshold * (1.0 - 1e-6),
                forward: fwd,
            },
            OptionType::Call,
            DEFAULT_POLYA_FACTOR,
        );
        let above = implied_total_vol(
            &NormalizedQuote {
                price: threshold * (1.0 + 1e-6),
                forward: fwd,
            },
            OptionType::Call,
            DEFAULT_POLYA_FACTOR,
        );
        assert!(below.0 < above.0);
        assert!(above.0 - below.0 < 1e-5);
    }

    #[test]
    fn at_the_money_uses_sum_branch() {
        // y = 0: threshold is 0 and vol is 2√γ.
        let q = normalized(10.0, 100.0, 100.0);
        let total = implied_total_vol(&q, OptionType::Put, DEFAULT_POLYA_FACTOR);
        assert_abs_diff_eq!(total.0, 0.251_292_901_943_019_56, epsilon = 1e-10);
    }

    #[test]
    fn nearly_atm_is_continuous() {
        let iv = PolyaImpliedVol::default();
        let atm = iv.compute(10.0, 100.0, 100.0, 1.0, OptionType::Call).unwrap();
        for fwd in [99.999, 100.001] {
            for option_type in [OptionType::Call, OptionType::Put] {
                let v = iv.compute(10.0, fwd, 100.0, 1.0, option_type).unwrap();
                assert_abs_diff_eq!(v.0, atm.0, epsilon = 1e-4);
            }
        }
    }

    // --- degenerate inputs ---

    #[test]
    fn unchecked_out_of_band_is_nan() {
        let iv = PolyaImpliedVol::default();
        // Call price above the forward.
        let q = Quote::new(120.0, 100.0, 100.0, 1.0, OptionType::Call);
        assert!(iv.compute_unchecked(&q).0.is_nan());
        // Call price below intrinsic.
        let q = Quote::new(5.0, 120.0, 100.0, 1.0, OptionType::Call);
        assert!(iv.compute_unchecked(&q).0.is_nan());
    }

    #[test]
    fn unchecked_zero_expiry_is_infinite() {
        let q = Quote::new(10.0, 100.0, 100.0, 0.0, OptionType::Call);
        let v = PolyaImpliedVol::default().compute_unchecked(&q);
        assert!(v.0.is_infinite());
    }

    #[test]
    fn checked_rejects_out_of_band() {
        let iv = PolyaImpliedVol::default();
        assert!(matches!(
            iv.compute(120.0, 100.0, 100.0, 1.0, OptionType::Call),
            Err(PolyaVolError::ArbitrageViolation { .. })
        ));
        assert!(matches!(
            iv.compute(0.0, 100.0, 100.0, 1.0, OptionType::Call),
            Err(PolyaVolError::NumericalInstability { .. })
        ));
        assert!(matches!(
            iv.total_vol(10.0, 100.0, -100.0, OptionType::Call),
            Err(PolyaVolError::InvalidDomain { .. })
        ));
    }

    #[test]
    fn new_rejects_bad_factor() {
        assert!(PolyaImpliedVol::new(0.0).is_err());
        assert!(PolyaImpliedVol::new(f64::NAN).is_err());
        assert_eq!(PolyaImpliedVol::new(0.6).unwrap().polya_factor(), 0.6);
    }

    #[test]
    fn from_config_uses_factor() {
        let cfg = PolyaConfig::new(0.625).unwrap();
        assert_eq!(PolyaImpliedVol::from_config(&cfg).polya_factor(), 0.625);
    }
}
