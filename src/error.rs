use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the scicalc crate
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Malformed expression syntax
    #[error("ParseError: {0}")]
    Parse(String),
    /// Reference to an identifier that is not bound in the context
    #[error("NameError: {0}")]
    Name(String),
    /// A top-level result that is NaN or infinite
    #[error("non-finite result: {0}")]
    NonFinite(f64),
    /// Plot bounds that can not be sampled
    #[error("invalid plot range [{xmin}, {xmax}]")]
    InvalidRange {
        /// Left bound of the range
        xmin: f64,
        /// Right bound of the range
        xmax: f64,
    },
}

impl Error {
    /// Check whether this error was raised while compiling an expression,
    /// either for malformed syntax or for an unbound identifier.
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse(_) | Self::Name(_))
    }

    pub(crate) fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }
}
