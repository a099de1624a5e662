use super::value::{Endpoint, Interval, IntervalClass, classify};
use crate::mpfr::{mpfr_add, mpfr_mul, mpfr_neg, mpfr_sub};
use rug::{Assign, Float, float::Round};
use std::cmp::Ordering;
use std::ops::{Add, Mul, Neg, Sub};

// The `*_assign` methods compute at the destination's precision. Operands are
// shared borrows and the destination is exclusive, so a result can never be
// written over an operand that is still being read.
impl Interval {
    pub fn neg_assign(&mut self, a: &Interval) {
        mpfr_neg(a.hi.as_float(), self.lo.as_float_mut(), Round::Down);
        mpfr_neg(a.lo.as_float(), self.hi.as_float_mut(), Round::Up);
        self.lo.strict = a.hi.strict;
        self.hi.strict = a.lo.strict;
    }

    pub fn add_assign(&mut self, a: &Interval, b: &Interval) {
        self.lo.strict =
            endpoint_binary(mpfr_add, &a.lo, &b.lo, self.lo.as_float_mut(), Round::Down);
        self.hi.strict =
            endpoint_binary(mpfr_add, &a.hi, &b.hi, self.hi.as_float_mut(), Round::Up);
    }

    pub fn sub_assign(&mut self, a: &Interval, b: &Interval) {
        self.lo.strict =
            endpoint_binary(mpfr_sub, &a.lo, &b.hi, self.lo.as_float_mut(), Round::Down);
        self.hi.strict =
            endpoint_binary(mpfr_sub, &a.hi, &b.lo, self.hi.as_float_mut(), Round::Up);
    }

    pub fn mul_assign(&mut self, a: &Interval, b: &Interval) {
        let mkmul = |out: &mut Interval,
                     lo_a: &Endpoint,
                     lo_b: &Endpoint,
                     hi_a: &Endpoint,
                     hi_b: &Endpoint| {
            out.lo.strict = epmul(lo_a, lo_b, out.lo.as_float_mut(), Round::Down);
            out.hi.strict = epmul(hi_a, hi_b, out.hi.as_float_mut(), Round::Up);
        };

        match (classify(a), classify(b)) {
            (IntervalClass::Pos, IntervalClass::Pos) => mkmul(self, &a.lo, &b.lo, &a.hi, &b.hi),
            (IntervalClass::Pos, IntervalClass::Neg) => mkmul(self, &a.hi, &b.lo, &a.lo, &b.hi),
            (IntervalClass::Pos, IntervalClass::Mix) => mkmul(self, &a.hi, &b.lo, &a.hi, &b.hi),
            (IntervalClass::Neg, IntervalClass::Pos) => mkmul(self, &a.lo, &b.hi, &a.hi, &b.lo),
            (IntervalClass::Neg, IntervalClass::Neg) => mkmul(self, &a.hi, &b.hi, &a.lo, &b.lo),
            (IntervalClass::Neg, IntervalClass::Mix) => mkmul(self, &a.lo, &b.hi, &a.lo, &b.lo),
            (IntervalClass::Mix, IntervalClass::Pos) => mkmul(self, &a.lo, &b.hi, &a.hi, &b.hi),
            (IntervalClass::Mix, IntervalClass::Neg) => mkmul(self, &a.hi, &b.lo, &a.lo, &b.lo),
            (IntervalClass::Mix, IntervalClass::Mix) => {
                // Two candidates per bound; ties are settled by the endpoint min/max.
                let mut other = Interval::new(self.prec());
                mkmul(self, &a.hi, &b.lo, &a.lo, &b.lo);
                mkmul(&mut other, &a.lo, &b.hi, &a.hi, &b.hi);
                self.lo.min_assign(other.lo);
                self.hi.max_assign(other.hi);
            }
        }
    }
}

#[must_use]
fn endpoint_binary(
    f: impl FnOnce(&Float, &Float, &mut Float, Round) -> Ordering,
    ep1: &Endpoint,
    ep2: &Endpoint,
    out: &mut Float,
    rnd: Round,
) -> bool {
    f(ep1.as_float(), ep2.as_float(), out, rnd);
    ep1.strict || ep2.strict
}

/// Product of two endpoints, returning the strictness of the result. A closed zero
/// factor is reached by every partner value, so it closes the bound; a zero factor
/// also pins the product to zero even against an infinite partner.
#[must_use]
fn epmul(ep1: &Endpoint, ep2: &Endpoint, out: &mut Float, rnd: Round) -> bool {
    let a = ep1.as_float();
    let b = ep2.as_float();

    if a.is_zero() || b.is_zero() {
        out.assign(0);
        let attained = (a.is_zero() && !ep1.strict) || (b.is_zero() && !ep2.strict);
        return !attained && (ep1.strict || ep2.strict);
    }

    mpfr_mul(a, b, out, rnd);
    ep1.strict || ep2.strict
}

impl Neg for &Interval {
    type Output = Interval;

    fn neg(self) -> Interval {
        let mut out = Interval::new(self.prec());
        out.neg_assign(self);
        out
    }
}

impl Add<&Interval> for &Interval {
    type Output = Interval;

    fn add(self, rhs: &Interval) -> Interval {
        let mut out = Interval::new(Interval::result_prec(self, rhs));
        out.add_assign(self, rhs);
        out
    }
}

impl Sub<&Interval> for &Interval {
    type Output = Interval;

    fn sub(self, rhs: &Interval) -> Interval {
        let mut out = Interval::new(Interval::result_prec(self, rhs));
        out.sub_assign(self, rhs);
        out
    }
}

impl Mul<&Interval> for &Interval {
    type Output = Interval;

    fn mul(self, rhs: &Interval) -> Interval {
        let mut out = Interval::new(Interval::result_prec(self, rhs));
        out.mul_assign(self, rhs);
        out
    }
}
