use std::fmt;

/// Errors produced by the combination store and the recipe solvers.
///
/// Solvers themselves never raise these — a failed search simply returns
/// `None` or an empty list. These variants surface at the store-loading and
/// request-validation boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The combination database could not be parsed.
    LoadFailure { message: String },
    /// A search was requested with an empty or whitespace-only target.
    EmptyTarget,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::LoadFailure { message } => {
                write!(
                    f,
                    "failed to load combination database: {}\n  hint: verify the file is a JSON array of {{root, left, right, tier}} records",
                    message
                )
            }
            Error::EmptyTarget => {
                write!(f, "target element must not be empty")
            }
        }
    }
}

impl std::error::Error for Error {}
