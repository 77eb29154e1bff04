//! Validation failures surfaced by the reconstruction engine.
//!
//! All of these are detected before any projection work starts: a
//! reconstruction call either fails fast with one of these, or runs to
//! completion. Numerical edge cases inside the engine (zero-weight detector
//! bins, pixels touched by no ray) are handled as zero contributions, not
//! errors.

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Angle sampling parameters do not define a non-empty angle sequence
    InvalidAngle { max_angle: u32, step: u32 },

    /// Filter name outside the five recognized kernels
    UnsupportedFilter(String),

    /// Image grid is empty or not square
    InvalidImage { rows: usize, cols: usize },

    /// SART iteration budget or relaxation factor out of range
    InvalidIterationParameters { iterations: usize, relaxation: f32 },

    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidAngle { max_angle, step } =>
                write!(f, "invalid angle sampling: max_angle = {max_angle}, step = {step} (both must be positive)"),
            Error::UnsupportedFilter(name) =>
                write!(f, "unsupported filter `{name}` (expected one of: ramp, shepp-logan, cosine, hamming, hann)"),
            Error::InvalidImage { rows, cols } =>
                write!(f, "invalid image: {rows}x{cols} grid (must be square and non-empty)"),
            Error::InvalidIterationParameters { iterations, relaxation } =>
                write!(f, "invalid SART parameters: iterations = {iterations} (must be > 0), relaxation = {relaxation} (must lie in (0, 2))"),
            Error::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self { Error::Io(e) }
}
