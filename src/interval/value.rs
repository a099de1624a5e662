use rug::{
    Float,
    float::{ParseIncomplete, Round},
    ops::AssignRound,
};
use std::cmp::Ordering;
use std::fmt;
use tracing::{debug, trace};

use super::error::IntervalError;
use crate::mpfr::{mpfr_sign, zero};

/// Precision used by `Interval::default()`, matching an IEEE double.
pub const DEFAULT_PREC: u32 = 53;

/// One bound of an interval. `strict` means the value itself is excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub val: Float,
    pub strict: bool,
}

/// A closed, open or half-open range of reals with arbitrary-precision bounds.
///
/// `lo` is always rounded toward negative infinity and `hi` toward positive
/// infinity, so the represented set encloses every value the interval stands for.
/// Intervals are expected to satisfy `lo.val <= hi.val`, and a single point is
/// never strict on either side. Operations on inputs that break this are
/// numerically unspecified.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub lo: Endpoint,
    pub hi: Endpoint,
}

impl Endpoint {
    pub fn new(val: Float, strict: bool) -> Self {
        Endpoint { val, strict }
    }

    #[inline]
    pub fn as_float(&self) -> &Float {
        &self.val
    }

    #[inline]
    pub fn as_float_mut(&mut self) -> &mut Float {
        &mut self.val
    }

    /// Keeps the smaller of two lower-bound candidates. On a tie the bound stays
    /// closed if either candidate reaches it with closed operands.
    pub fn min_assign(&mut self, b: Endpoint) {
        match self.val.partial_cmp(&b.val) {
            Some(Ordering::Less) | None => (),
            Some(Ordering::Greater) => *self = b,
            Some(Ordering::Equal) => {
                trace!(value = %self.val, "tied lower candidates");
                self.strict &= b.strict;
            }
        }
    }

    /// Upper-bound counterpart of `min_assign`.
    pub fn max_assign(&mut self, b: Endpoint) {
        match self.val.partial_cmp(&b.val) {
            Some(Ordering::Greater) | None => (),
            Some(Ordering::Less) => *self = b,
            Some(Ordering::Equal) => {
                trace!(value = %self.val, "tied upper candidates");
                self.strict &= b.strict;
            }
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::new(DEFAULT_PREC)
    }
}

impl Interval {
    /// A receiver for arithmetic results: the closed point zero at `prec` bits.
    pub fn new(prec: u32) -> Self {
        assert!(prec >= 1, "interval precision must be at least one bit");
        Interval {
            lo: Endpoint::new(zero(prec), false),
            hi: Endpoint::new(zero(prec), false),
        }
    }

    /// Builds an interval from separately rounded bounds. When the two roundings
    /// disagree the exact value lies strictly between them, so both sides are strict.
    fn from_rounded(lo: Float, hi: Float) -> Self {
        debug_assert!(lo <= hi, "outward rounding produced an inverted interval");
        let strict = lo != hi;
        if strict {
            trace!(%lo, %hi, "inexact construction");
        }
        Interval {
            lo: Endpoint::new(lo, strict),
            hi: Endpoint::new(hi, strict),
        }
    }

    pub fn from_i64(n: i64, prec: u32) -> Self {
        assert!(prec >= 1, "interval precision must be at least one bit");
        let (lo, _) = Float::with_val_round(prec, n, Round::Down);
        let (hi, _) = Float::with_val_round(prec, n, Round::Up);
        Interval::from_rounded(lo, hi)
    }

    /// # Panics
    ///
    /// Panics if `n` is NaN or `prec` is zero.
    pub fn from_f64(n: f64, prec: u32) -> Self {
        assert!(prec >= 1, "interval precision must be at least one bit");
        assert!(!n.is_nan(), "cannot build an interval around NaN");
        let (lo, _) = Float::with_val_round(prec, n, Round::Down);
        let (hi, _) = Float::with_val_round(prec, n, Round::Up);
        Interval::from_rounded(lo, hi)
    }

    /// Parses `s` as a numeral in `base`, once per rounding direction.
    ///
    /// # Panics
    ///
    /// Panics if `base` is outside `2..=36` or `prec` is zero.
    pub fn from_str_radix(s: &str, base: i32, prec: u32) -> Result<Self, IntervalError> {
        assert!(prec >= 1, "interval precision must be at least one bit");
        assert!((2..=36).contains(&base), "radix {base} is not in 2..=36");
        let lo = parse_rounded(s, base, prec, Round::Down)?;
        let hi = parse_rounded(s, base, prec, Round::Up)?;
        if lo.is_nan() || hi.is_nan() {
            debug!(numeral = s, "numeral parsed to NaN");
            return Err(IntervalError::NotANumber(s.to_string()));
        }
        Ok(Interval::from_rounded(lo, hi))
    }

    #[inline]
    pub fn prec(&self) -> u32 {
        self.lo.as_float().prec()
    }

    /// Precision for a result computed from `x` and `y`: the smaller of the two.
    pub fn result_prec(x: &Interval, y: &Interval) -> u32 {
        x.prec().min(y.prec())
    }

    /// Re-rounds both bounds outward to `prec` bits. A bound that moves no longer
    /// belongs to the represented set and becomes strict; exact re-roundings keep
    /// their flags.
    pub fn set_prec(&mut self, prec: u32) {
        assert!(prec >= 1, "interval precision must be at least one bit");
        let lo_dir = self.lo.as_float_mut().set_prec_round(prec, Round::Down);
        let hi_dir = self.hi.as_float_mut().set_prec_round(prec, Round::Up);
        self.lo.strict |= lo_dir != Ordering::Equal;
        self.hi.strict |= hi_dir != Ordering::Equal;
    }

    /// Assigns both bounds from doubles at the current precision, rounding outward.
    /// Leaves the strictness flags alone.
    pub fn set_f64(&mut self, lo: f64, hi: f64) {
        self.lo.as_float_mut().assign_round(lo, Round::Down);
        self.hi.as_float_mut().assign_round(hi, Round::Up);
    }

    pub fn set_strict(&mut self, lo: bool, hi: bool) {
        self.lo.strict = lo;
        self.hi.strict = hi;
    }

    pub fn is_point(&self) -> bool {
        self.lo.val == self.hi.val
    }

    pub fn contains_zero(&self) -> bool {
        let lsgn = mpfr_sign(self.lo.as_float());
        let usgn = mpfr_sign(self.hi.as_float());
        (lsgn < 0 || (lsgn == 0 && !self.lo.strict)) && (usgn > 0 || (usgn == 0 && !self.hi.strict))
    }

    pub fn contains(&self, x: &Float) -> bool {
        let lo = self.lo.as_float();
        let hi = self.hi.as_float();
        (*lo < *x || (*lo == *x && !self.lo.strict)) && (*x < *hi || (*x == *hi && !self.hi.strict))
    }
}

fn parse_rounded(s: &str, base: i32, prec: u32, rnd: Round) -> Result<Float, IntervalError> {
    let parsed: ParseIncomplete = Float::parse_radix(s, base).inspect_err(|err| {
        debug!(numeral = s, base, %err, "rejected numeral");
    })?;
    let (val, _) = Float::with_val_round(prec, parsed, rnd);
    Ok(val)
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.lo.strict { '(' } else { '[' };
        let close = if self.hi.strict { ')' } else { ']' };
        write!(
            f,
            "{open}{},{}{close}",
            render_bound(self.lo.as_float()),
            render_bound(self.hi.as_float())
        )
    }
}

/// Integers below 2^128 print exactly; everything else uses MPFR's decimal form
/// with the trailing zeros of the mantissa dropped.
fn render_bound(v: &Float) -> String {
    if v.is_zero() {
        return if v.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    if v.is_integer() && v.get_exp().is_some_and(|e| e <= 128) {
        if let Some(int) = v.to_integer() {
            return int.to_string();
        }
    }
    let s = v.to_string();
    let (mantissa, exp) = match s.find('e') {
        Some(i) => s.split_at(i),
        None => (s.as_str(), ""),
    };
    if !mantissa.contains('.') {
        return s;
    }
    let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
    format!("{mantissa}{exp}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalClass {
    Pos = 1,
    Neg = -1,
    Mix = 0,
}

/// Sign class by bound value alone. A zero bound sorts into the class containing
/// zero whether or not it is strict.
pub fn classify(ival: &Interval) -> IntervalClass {
    if mpfr_sign(ival.lo.as_float()) >= 0 {
        IntervalClass::Pos
    } else if mpfr_sign(ival.hi.as_float()) <= 0 {
        IntervalClass::Neg
    } else {
        IntervalClass::Mix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed(lo: f64, hi: f64) -> Interval {
        let mut x = Interval::default();
        x.set_f64(lo, hi);
        x
    }

    #[test]
    fn small_integers_are_closed_points() {
        for n in [3, 5, -7, 0] {
            let x = Interval::from_i64(n, 10);
            assert_eq!(x.lo.val, x.hi.val, "{x}");
            assert!(!x.lo.strict && !x.hi.strict, "{x}");
        }
    }

    #[test]
    fn unrepresentable_integer_is_open_on_both_sides() {
        let x = Interval::from_i64(65535, 10);
        assert!(x.lo.val < x.hi.val);
        assert!(x.lo.strict && x.hi.strict);
        assert!(x.contains(&Float::with_val(64, 65535)));
        assert_eq!(x.to_string(), "(65472,65536)");
    }

    #[test]
    fn from_f64_brackets_inexact_doubles() {
        let x = Interval::from_f64(0.1, 8);
        assert!(x.lo.val < x.hi.val);
        assert!(x.lo.strict && x.hi.strict);
        assert!(x.contains(&Float::with_val(53, 0.1)));

        let y = Interval::from_f64(0.5, 8);
        assert!(y.is_point());
        assert!(!y.lo.strict && !y.hi.strict);
    }

    #[test]
    fn from_str_radix_parses_in_base() {
        let x = Interval::from_str_radix("ff", 16, 53).unwrap();
        assert!(x.is_point());
        assert_eq!(x.to_string(), "[255,255]");

        let tenth = Interval::from_str_radix("0.1", 10, 53).unwrap();
        assert!(tenth.lo.val < tenth.hi.val);
        assert!(tenth.lo.strict && tenth.hi.strict);
    }

    #[test]
    fn from_str_radix_rejects_garbage() {
        let err = Interval::from_str_radix("12z", 10, 53).unwrap_err();
        assert!(matches!(err, IntervalError::MalformedNumeral(_)));
        assert!(matches!(
            Interval::from_str_radix("", 10, 53),
            Err(IntervalError::MalformedNumeral(_))
        ));
    }

    #[test]
    fn from_str_radix_rejects_nan() {
        let err = Interval::from_str_radix("nan", 10, 53).unwrap_err();
        assert!(matches!(err, IntervalError::NotANumber(_)));
    }

    #[test]
    fn contains_respects_openness() {
        let mut x = closed(2.0, 5.0);
        let two = Float::with_val(53, 2);
        let three = Float::with_val(53, 3);
        let five = Float::with_val(53, 5);

        assert!(x.contains(&three));
        assert!(x.contains(&two));
        assert!(x.contains(&five));

        x.hi.strict = true;
        assert!(!x.contains(&five));
        assert!(x.contains(&two));

        x.lo.strict = true;
        assert!(!x.contains(&two));
        assert!(x.contains(&three));

        x.set_strict(true, false);
        assert!(x.contains(&five));
        assert!(!x.contains(&Float::with_val(53, 5.5)));
    }

    #[test]
    fn contains_zero_at_the_edges() {
        let mut x = closed(0.0, 4.0);
        assert!(x.contains_zero());
        x.lo.strict = true;
        assert!(!x.contains_zero());

        let mut y = closed(-4.0, 0.0);
        assert!(y.contains_zero());
        y.hi.strict = true;
        assert!(!y.contains_zero());

        assert!(closed(-1.0, 1.0).contains_zero());
        assert!(!closed(1.0, 2.0).contains_zero());
    }

    #[test]
    fn set_prec_marks_moved_bounds_strict() {
        let mut x = Interval::from_i64(3, 53);
        x.set_prec(10);
        assert!(x.is_point());
        assert!(!x.lo.strict && !x.hi.strict);

        let mut y = Interval::from_i64(65535, 53);
        y.set_prec(10);
        assert_eq!(y.prec(), 10);
        assert_eq!(y.lo.val, 65472);
        assert_eq!(y.hi.val, 65536);
        assert!(y.lo.strict && y.hi.strict);
    }

    #[test]
    fn set_f64_leaves_flags_alone() {
        let mut x = Interval::new(53);
        x.set_strict(true, false);
        x.set_f64(-1.0, 2.0);
        assert!(x.lo.strict && !x.hi.strict);
        assert_eq!(x.lo.val, -1);
        assert_eq!(x.hi.val, 2);
    }

    #[test]
    fn display_uses_bracket_per_side() {
        let mut x = closed(2.0, 5.0);
        assert_eq!(x.to_string(), "[2,5]");
        x.hi.strict = true;
        assert_eq!(x.to_string(), "[2,5)");
        x.set_strict(true, false);
        assert_eq!(x.to_string(), "(2,5]");

        let y = closed(-2.5, f64::INFINITY);
        assert_eq!(y.to_string(), "[-2.5,inf]");
    }

    #[test]
    fn result_prec_takes_the_smaller() {
        let x = Interval::new(10);
        let y = Interval::new(80);
        assert_eq!(Interval::result_prec(&x, &y), 10);
        assert_eq!(Interval::result_prec(&y, &x), 10);
    }

    #[test]
    fn classify_by_bound_value() {
        assert_eq!(classify(&closed(0.0, 3.0)), IntervalClass::Pos);
        assert_eq!(classify(&closed(-3.0, 0.0)), IntervalClass::Neg);
        assert_eq!(classify(&closed(-3.0, 3.0)), IntervalClass::Mix);
        assert_eq!(classify(&closed(0.0, 0.0)), IntervalClass::Pos);

        let mut open_zero = closed(0.0, 3.0);
        open_zero.lo.strict = true;
        assert_eq!(classify(&open_zero), IntervalClass::Pos);
    }

    #[test]
    fn min_assign_ties_close_if_either_closed() {
        let mut a = Endpoint::new(Float::with_val(53, -6), true);
        a.min_assign(Endpoint::new(Float::with_val(53, -6), false));
        assert!(!a.strict);

        let mut b = Endpoint::new(Float::with_val(53, 6), true);
        b.max_assign(Endpoint::new(Float::with_val(53, 6), true));
        assert!(b.strict);

        let mut c = Endpoint::new(Float::with_val(53, -2), false);
        c.min_assign(Endpoint::new(Float::with_val(53, -3), true));
        assert_eq!(c.val, -3);
        assert!(c.strict);
    }
}
