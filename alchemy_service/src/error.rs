//! Error taxonomy for the service layer (§7).
//!
//! Strategies never raise — a failed search just returns `None` or an
//! empty list. These variants exist at the request-validation and
//! process-boundary level: bad input, a store that never finished
//! loading, and a panicked worker task that must become a 500 rather than
//! crash the handler.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug)]
pub enum Error {
    /// Bad request input: missing/empty target, unknown mode, non-positive `max_recipes`.
    Input { message: String },
    /// The combination database failed to load at startup.
    InternalLoad { message: String },
    /// A worker task panicked; converted to a 500 rather than propagated.
    InternalPanic { message: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Input { message } => write!(f, "bad request: {message}"),
            Error::InternalLoad { message } => write!(f, "failed to load combination database: {message}"),
            Error::InternalPanic { message } => write!(f, "internal error: {message}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<alchemy_core::Error> for Error {
    fn from(err: alchemy_core::Error) -> Self {
        match err {
            alchemy_core::Error::LoadFailure { message } => Error::InternalLoad { message },
            alchemy_core::Error::EmptyTarget => Error::Input {
                message: "target element must not be empty".to_string(),
            },
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Input { .. } => StatusCode::BAD_REQUEST,
            Error::InternalLoad { .. } | Error::InternalPanic { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_error_maps_to_bad_request() {
        let err = Error::Input {
            message: "missing element".to_string(),
        };
        assert_eq!(err.to_string(), "bad request: missing element");
    }

    #[test]
    fn core_empty_target_maps_to_input_error() {
        let err: Error = alchemy_core::Error::EmptyTarget.into();
        assert!(matches!(err, Error::Input { .. }));
    }
}
