pub mod arithmetic;
pub mod error;
pub mod value;

pub use error::IntervalError;
pub use value::{DEFAULT_PREC, Endpoint, Interval, IntervalClass, classify};
