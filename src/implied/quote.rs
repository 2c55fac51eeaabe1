//! Option quotes and broadcast batches of quotes.
//!
//! A batch is a set of one-dimensional columns. Each column either has the
//! batch length or a single element that is broadcast to every position.

use crate::error::{self, PolyaVolError};
use crate::types::OptionType;

/// A single European option quote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    /// Observed (discounted) market price.
    pub option_price: f64,
    /// Forward price of the underlying to expiry.
    pub forward: f64,
    /// Strike price.
    pub strike: f64,
    /// Time to expiry; `expiry · σ²` must be dimensionless.
    pub expiry: f64,
    /// Present value of one unit paid at expiry.
    pub discount_factor: f64,
    pub option_type: OptionType,
}

impl Quote {
    /// Create an undiscounted quote (discount factor 1).
    pub fn new(
        option_price: f64,
        forward: f64,
        strike: f64,
        expiry: f64,
        option_type: OptionType,
    ) -> Self {
        Self {
            option_price,
            forward,
            strike,
            expiry,
            discount_factor: 1.0,
            option_type,
        }
    }

    /// Set the discount factor to expiry.
    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    /// Price with discounting removed: `option_price / discount_factor`.
    pub fn undiscounted_price(&self) -> f64 {
        self.option_price / self.discount_factor
    }
}

/// One input column: a slice, possibly of length one, or an implicit default.
#[derive(Debug, Clone, Copy)]
enum Column<'a, T> {
    Slice(&'a [T]),
    Fill(T),
}

impl<T: Copy> Column<'_, T> {
    #[inline]
    fn get(&self, i: usize) -> T {
        match *self {
            Column::Slice(s) if s.len() == 1 => s[0],
            Column::Slice(s) => s[i],
            Column::Fill(v) => v,
        }
    }
}

/// Broadcast view over the columns of a batch call.
#[derive(Debug, Clone, Copy)]
pub(crate) struct QuoteBatch<'a> {
    len: usize,
    option_prices: Column<'a, f64>,
    forwards: Column<'a, f64>,
    strikes: Column<'a, f64>,
    expiries: Column<'a, f64>,
    discount_factors: Column<'a, f64>,
    is_call_options: Column<'a, bool>,
}

impl<'a> QuoteBatch<'a> {
    /// Resolve the broadcast length of the columns.
    ///
    /// Missing discount factors default to 1 and missing call flags to
    /// "all calls".
    ///
    /// # Errors
    /// Returns [`PolyaVolError::InvalidInput`] if two columns have different
    /// lengths and neither has length one.
    pub(crate) fn new(
        option_prices: &'a [f64],
        forwards: &'a [f64],
        strikes: &'a [f64],
        expiries: &'a [f64],
        discount_factors: Option<&'a [f64]>,
        is_call_options: Option<&'a [bool]>,
    ) -> error::Result<Self> {
        let mut lengths = vec![
            ("option_prices", option_prices.len()),
            ("forwards", forwards.len()),
            ("strikes", strikes.len()),
            ("expiries", expiries.len()),
        ];
        if let Some(d) = discount_factors {
            lengths.push(("discount_factors", d.len()));
        }
        if let Some(c) = is_call_options {
            lengths.push(("is_call_options", c.len()));
        }

        let mut len: Option<(&str, usize)> = None;
        for &(name, n) in &lengths {
            if n == 1 {
                continue;
            }
            match len {
                None => len = Some((name, n)),
                Some((first, m)) if m != n => {
                    return Err(PolyaVolError::InvalidInput {
                        message: format!(
                            "{name} has length {n} which does not broadcast against {first} of length {m}"
                        ),
                    });
                }
                Some(_) => {}
            }
        }

        Ok(Self {
            len: len.map_or(1, |(_, n)| n),
            option_prices: Column::Slice(option_prices),
            forwards: Column::Slice(forwards),
            strikes: Column::Slice(strikes),
            expiries: Column::Slice(expiries),
            discount_factors: discount_factors.map_or(Column::Fill(1.0), Column::Slice),
            is_call_options: is_call_options.map_or(Column::Fill(true), Column::Slice),
        })
    }

    /// Broadcast batch length.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// The quote at position `i` (`i < len`).
    #[inline]
    pub(crate) fn quote(&self, i: usize) -> Quote {
        Quote {
            option_price: self.option_prices.get(i),
            forward: self.forwards.get(i),
            strike: self.strikes.get(i),
            expiry: self.expiries.get(i),
            discount_factor: self.discount_factors.get(i),
            option_type: OptionType::from_is_call(self.is_call_options.get(i)),
        }
    }

    /// Iterate over all quotes with their batch index.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, Quote)> + '_ {
        (0..self.len).map(move |i| (i, self.quote(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undiscounted_price_divides_by_discount() {
        let q = Quote::new(9.0, 100.0, 100.0, 1.0, OptionType::Call).with_discount_factor(0.9);
        assert!((q.undiscounted_price() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn same_length_columns() {
        let p = [1.0, 2.0, 3.0];
        let f = [100.0, 101.0, 102.0];
        let b = QuoteBatch::new(&p, &f, &f, &p, None, None).unwrap();
        assert_eq!(b.len(), 3);
        let q = b.quote(2);
        assert_eq!(q.option_price, 3.0);
        assert_eq!(q.forward, 102.0);
        assert_eq!(q.discount_factor, 1.0);
        assert_eq!(q.option_type, OptionType::Call);
    }

    #[test]
    fn scalars_broadcast() {
        let p = [1.0, 2.0, 3.0, 4.0];
        let b = QuoteBatch::new(&p, &[100.0], &[95.0], &[0.5], Some(&[0.99]), Some(&[false]))
            .unwrap();
        assert_eq!(b.len(), 4);
        for (i, q) in b.iter() {
            assert_eq!(q.option_price, p[i]);
            assert_eq!(q.forward, 100.0);
            assert_eq!(q.strike, 95.0);
            assert_eq!(q.expiry, 0.5);
            assert_eq!(q.discount_factor, 0.99);
            assert_eq!(q.option_type, OptionType::Put);
        }
    }

    #[test]
    fn all_scalars_is_length_one() {
        let b = QuoteBatch::new(&[10.0], &[100.0], &[100.0], &[1.0], None, None).unwrap();
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn empty_batch() {
        let b = QuoteBatch::new(&[], &[], &[100.0], &[], None, None).unwrap();
        assert_eq!(b.len(), 0);
        assert_eq!(b.iter().count(), 0);
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let r = QuoteBatch::new(
            &[1.0, 2.0],
            &[100.0, 100.0, 100.0],
            &[100.0],
            &[1.0],
            None,
            None,
        );
        match r {
            Err(PolyaVolError::InvalidInput { message }) => {
                assert!(message.contains("forwards"));
                assert!(message.contains("option_prices"));
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn mismatched_call_flags_rejected() {
        let p = [1.0, 2.0];
        let r = QuoteBatch::new(&p, &p, &p, &p, None, Some(&[true, false, true]));
        assert!(matches!(r, Err(PolyaVolError::InvalidInput { .. })));
    }
}
