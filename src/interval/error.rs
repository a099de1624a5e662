use rug::float::ParseFloatError;

#[derive(thiserror::Error, Debug)]
pub enum IntervalError {
    /// The text is not a numeral in the requested base. Carries the parser's error as is.
    #[error(transparent)]
    MalformedNumeral(#[from] ParseFloatError),
    #[error("numeral {0:?} does not denote a number")]
    NotANumber(String),
}
