pub mod interval;
mod mpfr;

pub use interval::{DEFAULT_PREC, Endpoint, Interval, IntervalClass, IntervalError, classify};
