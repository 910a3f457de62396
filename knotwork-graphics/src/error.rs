use thiserror::Error;

use crate::types::Scalar;

/// Errors returned by path construction and path algebra.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphicsError {
    /// A path needs at least one knot.
    #[error("path has no knots")]
    EmptyPath,

    /// The knot configuration cannot be resolved into a spline.
    #[error("cannot build path at knot {index}: {reason}")]
    PathBuild { index: usize, reason: &'static str },

    /// A coordinate, angle or factor was NaN or infinite.
    #[error("non-finite {what}")]
    NonFinite { what: &'static str },

    /// Tension must be finite and at least 3/4.
    #[error("invalid tension {value} at knot {index} (must be at least 0.75)")]
    InvalidTension { index: usize, value: Scalar },

    /// Curl must be finite and non-negative.
    #[error("invalid curl {value} at knot {index} (must not be negative)")]
    InvalidCurl { index: usize, value: Scalar },

    /// A time outside [0, length] was given for an open path.
    #[error("time {t} is outside [0, {length}] on an open path")]
    TimeOutOfRange { t: Scalar, length: usize },

    /// `buildcycle` was given no paths.
    #[error("buildcycle needs at least one path")]
    TooFewPaths,

    /// Two neighbouring paths given to `buildcycle` never meet.
    #[error("paths {first} and {second} do not intersect")]
    BuildCycle { first: usize, second: usize },

    /// A style keyword such as a line join or cap name was not recognised.
    #[error("unknown {kind} `{value}`")]
    UnknownKeyword { kind: &'static str, value: String },
}
