use thiserror::Error;

/// Errors produced by the sequence toolkit.
///
/// Everything except `Io` comes from the pure string/integer core and is
/// deterministic: retrying the same call yields the same error.
#[derive(Error, Debug)]
pub enum Error {
    /// A range expression item could not be parsed.
    #[error("invalid range item \"{item}\": {reason}")]
    Parse { item: String, reason: &'static str },

    /// A number slot index was outside `-count..count`.
    #[error("number index {index} out of range (string has {count} numbers)")]
    Index { index: isize, count: usize },

    /// The number of substitution patterns doesn't match the number of values.
    #[error("{} substitution patterns in \"{template}\": found {patterns}, expected {values}", excess(.patterns, .values))]
    PatternCount {
        template: String,
        patterns: usize,
        values: usize,
    },

    /// `cardinality()` was called on an interval without an upper bound.
    #[error("cannot count the members of an unbounded range")]
    UnboundedCardinality,

    /// A renumbering destination cannot be mapped onto the source numbers.
    #[error("invalid destination name \"{name}\": {reason}")]
    Destination { name: String, reason: String },

    #[error("invalid name pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn excess(patterns: &usize, values: &usize) -> &'static str {
    if patterns > values {
        "too many"
    } else {
        "too few"
    }
}

pub type Result<T> = std::result::Result<T, Error>;
