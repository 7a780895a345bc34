use std::{error::Error, fmt::Display};

/// This type gets used to be our catch all error.
/// The first three variants are the failures the interval trees report to their callers,
/// the remaining ones wrap everything the surrounding tooling might run into.
#[derive(Debug)]
pub enum AggError {
    /// A point operation addressed an index outside of `[0, len - 1]`.
    InvalidIndex {
        /// The rejected index.
        index: usize,
        /// Number of elements the structure was built over.
        len: usize,
    },
    /// A range operation was outside of `[0, len - 1]` or had `start > end`.
    InvalidRange {
        /// First index of the rejected (inclusive) range.
        start: usize,
        /// Last index of the rejected (inclusive) range.
        end: usize,
        /// Number of elements the structure was built over.
        len: usize,
    },
    /// A structure could not be set up, e.g. a policy operation is missing or the
    /// initial sequence was empty.
    ConfigurationError(String),
    /// Allows a generic Error message.
    StringAggError(String),
    /// Anticipated errors, may be rethrown with an additional error message
    RethrowAggError(String, Box<dyn Error>),
    /// All other library Errors get converted to this error.
    OtherAggError(Box<dyn Error>),
}

/// This type is our goto Result, as it allows us to convert between many different errors.
pub type AggResult<O> = Result<O, AggError>;

impl Display for AggError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggError::InvalidIndex { index, len } => {
                write!(f, "index {} is out of bounds for length {}", index, len)
            }
            AggError::InvalidRange { start, end, len } => write!(
                f,
                "range [{}, {}] is not a valid range for length {}",
                start, end, len
            ),
            AggError::ConfigurationError(str) => {
                "configuration error: ".fmt(f)?;
                str.fmt(f)
            }
            AggError::StringAggError(str) => str.fmt(f),
            AggError::RethrowAggError(str, err) => {
                str.fmt(f)?;
                " with: ".fmt(f)?;
                err.fmt(f)?;
                Ok(())
            }
            AggError::OtherAggError(err) => err.fmt(f),
        }
    }
}
impl Error for AggError {}

impl AggError {
    /// Allows to annotate an AggError to better detect the origin of errors.
    /// # Usage
    /// ```
    /// # use common::{AggError, AggResult};
    /// # fn fallible_function() -> AggResult<()> {
    /// # Err(AggError::StringAggError("".into()))
    /// # }
    /// # fn container_function() -> AggResult<()> {
    /// fallible_function().map_err(AggError::rethrow_with("function failed"))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn rethrow_with(str: &'static str) -> impl Fn(AggError) -> AggError {
        move |err| AggError::RethrowAggError(str.to_string(), Box::new(err))
    }

    /// Returns true for the errors a tree reports about its caller's input,
    /// i.e. [AggError::InvalidIndex] and [AggError::InvalidRange].
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            AggError::InvalidIndex { .. } | AggError::InvalidRange { .. }
        )
    }
}

macro_rules! implement_from {
    ($type:ty) => {
        impl From<$type> for AggError {
            fn from(other: $type) -> Self {
                AggError::OtherAggError(Box::from(other))
            }
        }
    };
}
implement_from!(std::io::Error);
implement_from!(serde_json::Error);
implement_from!(serde_dhall::Error);

impl<'a> From<&'a str> for AggError {
    fn from(other: &'a str) -> Self {
        AggError::StringAggError(other.to_string())
    }
}
impl From<String> for AggError {
    fn from(other: String) -> Self {
        AggError::StringAggError(other)
    }
}
