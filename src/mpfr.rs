//! Directed-rounding wrappers around MPFR using the `rug` and `gmp_mpfr_sys` crates.
//! Every call takes its rounding direction as an argument and reports where the
//! stored result landed relative to the exact one, read from MPFR's ternary return
//! value rather than the global inexact flag.
use gmp_mpfr_sys::mpfr;
use rug::Float;
use rug::float::Round;
use std::cmp::Ordering;
use std::os::raw::c_int;

fn to_mpfr_round(rnd: Round) -> mpfr::rnd_t {
    match rnd {
        Round::Down => mpfr::rnd_t::RNDD,
        Round::Up => mpfr::rnd_t::RNDU,
        Round::Zero => mpfr::rnd_t::RNDZ,
        Round::Nearest => mpfr::rnd_t::RNDN,
        _ => mpfr::rnd_t::RNDN,
    }
}

/// `Less` if the stored value is below the exact result, `Greater` if above.
#[inline]
fn ternary(t: c_int) -> Ordering {
    t.cmp(&0)
}

/// Checks that a rounded result did not land on the inner side of the exact value.
#[inline]
fn debug_check_direction(dir: Ordering, rnd: Round) {
    debug_assert!(
        !(rnd == Round::Down && dir == Ordering::Greater)
            && !(rnd == Round::Up && dir == Ordering::Less),
        "MPFR rounded {rnd:?} but landed {dir:?}"
    );
}

macro_rules! mpfr_unary_op {
    ($name:ident, $func:path) => {
        pub fn $name(input: &Float, out: &mut Float, rnd: Round) -> Ordering {
            let dir = ternary(unsafe {
                $func(out.as_raw_mut(), input.as_raw(), to_mpfr_round(rnd))
            });
            debug_check_direction(dir, rnd);
            dir
        }
    };
}

macro_rules! mpfr_binary_op {
    ($name:ident, $func:path) => {
        pub fn $name(lhs: &Float, rhs: &Float, out: &mut Float, rnd: Round) -> Ordering {
            let dir = ternary(unsafe {
                $func(
                    out.as_raw_mut(),
                    lhs.as_raw(),
                    rhs.as_raw(),
                    to_mpfr_round(rnd),
                )
            });
            debug_check_direction(dir, rnd);
            dir
        }
    };
}

mpfr_unary_op!(mpfr_neg, mpfr::neg);

mpfr_binary_op!(mpfr_add, mpfr::add);
mpfr_binary_op!(mpfr_sub, mpfr::sub);
mpfr_binary_op!(mpfr_mul, mpfr::mul);

pub fn mpfr_sign(x: &Float) -> i32 {
    unsafe { mpfr::sgn(x.as_raw()) }
}

pub fn zero(prec: u32) -> Float {
    Float::with_val(prec, 0)
}
