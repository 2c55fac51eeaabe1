//! Approximate implied volatility from option prices.
//!
//! Shows how to:
//!   - Derive forwards and discount factors from market data
//!   - Extract a Polya implied vol for a single quote
//!   - Run a validated batch across a strike strip
//!   - Handle a quote rejected by the no-arbitrage validator
//!
//! Run with: `cargo run --example implied_vol`

use polyavol::conventions::{discount_factor, forward_price};
use polyavol::implied::{ImpliedVolBuilder, OPTIMAL_POLYA_FACTOR, PolyaImpliedVol};
use polyavol::{OptionType, PolyaVolError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let spot = 100.0;
    let rate = 0.03;
    let dividend_yield = 0.01;
    let expiry = 0.75;

    let forward = forward_price(spot, rate, dividend_yield, expiry)?;
    let df = discount_factor(rate, expiry)?;

    println!("Market");
    println!("  Spot:     {spot}");
    println!("  Forward:  {forward:.6}");
    println!("  Discount: {df:.6}");
    println!("  Expiry:   {expiry}y");

    // ---------------------------------------------------------------
    // 1. Single quote
    // ---------------------------------------------------------------

    let price = 7.85; // discounted ATM-forward call premium
    let iv = PolyaImpliedVol::default().compute_discounted(
        price,
        forward,
        forward,
        expiry,
        df,
        OptionType::Call,
    )?;
    let iv_opt = PolyaImpliedVol::new(OPTIMAL_POLYA_FACTOR)?.compute_discounted(
        price,
        forward,
        forward,
        expiry,
        df,
        OptionType::Call,
    )?;

    println!("\nSingle quote (call, K = F, premium {price})");
    println!("  k = 2/pi:       {:.6}", iv.0);
    println!("  k = 0.62305051: {:.6}", iv_opt.0);

    // ---------------------------------------------------------------
    // 2. Strike strip: OTM puts below the forward, OTM calls above
    // ---------------------------------------------------------------

    let strikes = [80.0, 90.0, 95.0, 105.0, 110.0, 120.0];
    let premiums = [0.95, 2.70, 4.30, 4.80, 3.15, 1.20];
    let is_call: Vec<bool> = strikes.iter().map(|&k| k > forward).collect();

    let vols = ImpliedVolBuilder::new()
        .option_prices(&premiums)
        .forwards(&[forward])
        .strikes(&strikes)
        .expiries(&[expiry])
        .discount_factors(&[df])
        .is_call_options(&is_call)
        .validate_args(true)
        .compute()?;

    println!("\n{:>8} {:>6} {:>10} {:>10}", "Strike", "Type", "Premium", "Vol");
    println!("{}", "-".repeat(38));
    for (((k, p), c), v) in strikes.iter().zip(&premiums).zip(&is_call).zip(&vols) {
        let kind = if *c { "call" } else { "put" };
        println!("{k:>8.1} {kind:>6} {p:>10.4} {:>9.4}%", v * 100.0);
    }

    // ---------------------------------------------------------------
    // 3. Arbitrage violations are reported with their batch index
    // ---------------------------------------------------------------

    let bad = ImpliedVolBuilder::new()
        .option_prices(&[4.0, 130.0])
        .forwards(&[forward])
        .strikes(&[100.0])
        .expiries(&[expiry])
        .validate_args(true)
        .compute();

    match bad {
        Err(PolyaVolError::ArbitrageViolation { index, message }) => {
            println!("\nRejected quote {index}: {message}");
        }
        other => println!("\nUnexpected result: {other:?}"),
    }

    Ok(())
}
