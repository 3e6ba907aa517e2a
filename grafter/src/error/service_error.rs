//! The closed error taxonomy delivered to callers.

use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

/// A failure one level above the wire.
///
/// Every [`RemoteError`](crate::RemoteError) is translated into exactly one
/// of these before it reaches a result callback or the application state.
/// [`RequestBad`](Self::RequestBad) and
/// [`ProgrammerFailure`](Self::ProgrammerFailure) signal misuse and should
/// not be retried; [`ServiceUnavailable`](Self::ServiceUnavailable) is
/// environmental and safe to retry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum ServiceError {
    #[error("authentication request malformed: {0}")]
    AuthenticationRequestBad(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("not authorized: {0}")]
    AuthenticationUnauthorized(String),

    #[error("bad request: {0}")]
    RequestBad(String),

    #[error("invalid request type: {0}")]
    RequestBadType(String),

    #[error("request not understood: {0}")]
    RequestNotUnderstood(String),

    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("configuration failure: {0}")]
    ConfigurationFailure(String),

    #[error("programmer failure: {0}")]
    ProgrammerFailure(String),

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// The discriminant of a [`ServiceError`].
///
/// ## Examples
///
/// ```
/// use strum::IntoEnumIterator;
/// use grafter::{ServiceError, ServiceErrorKind};
///
/// assert_eq!(ServiceErrorKind::iter().count(), 11);
///
/// let err = ServiceErrorKind::NotFound.with_message("no such account");
/// assert_eq!(err, ServiceError::NotFound("no such account".to_string()));
/// assert_eq!(err.kind().to_string(), "not_found");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ServiceErrorKind {
    AuthenticationRequestBad,
    AuthenticationRequired,
    AuthenticationUnauthorized,
    RequestBad,
    RequestBadType,
    RequestNotUnderstood,
    MethodNotAllowed,
    NotFound,
    ConfigurationFailure,
    ProgrammerFailure,
    ServiceUnavailable,
}

impl ServiceErrorKind {
    /// Builds the matching [`ServiceError`].
    pub fn with_message(self, message: impl Into<String>) -> ServiceError {
        let message = message.into();
        match self {
            Self::AuthenticationRequestBad => ServiceError::AuthenticationRequestBad(message),
            Self::AuthenticationRequired => ServiceError::AuthenticationRequired(message),
            Self::AuthenticationUnauthorized => ServiceError::AuthenticationUnauthorized(message),
            Self::RequestBad => ServiceError::RequestBad(message),
            Self::RequestBadType => ServiceError::RequestBadType(message),
            Self::RequestNotUnderstood => ServiceError::RequestNotUnderstood(message),
            Self::MethodNotAllowed => ServiceError::MethodNotAllowed(message),
            Self::NotFound => ServiceError::NotFound(message),
            Self::ConfigurationFailure => ServiceError::ConfigurationFailure(message),
            Self::ProgrammerFailure => ServiceError::ProgrammerFailure(message),
            Self::ServiceUnavailable => ServiceError::ServiceUnavailable(message),
        }
    }
}

impl ServiceError {
    pub fn kind(&self) -> ServiceErrorKind {
        match self {
            Self::AuthenticationRequestBad(_) => ServiceErrorKind::AuthenticationRequestBad,
            Self::AuthenticationRequired(_) => ServiceErrorKind::AuthenticationRequired,
            Self::AuthenticationUnauthorized(_) => ServiceErrorKind::AuthenticationUnauthorized,
            Self::RequestBad(_) => ServiceErrorKind::RequestBad,
            Self::RequestBadType(_) => ServiceErrorKind::RequestBadType,
            Self::RequestNotUnderstood(_) => ServiceErrorKind::RequestNotUnderstood,
            Self::MethodNotAllowed(_) => ServiceErrorKind::MethodNotAllowed,
            Self::NotFound(_) => ServiceErrorKind::NotFound,
            Self::ConfigurationFailure(_) => ServiceErrorKind::ConfigurationFailure,
            Self::ProgrammerFailure(_) => ServiceErrorKind::ProgrammerFailure,
            Self::ServiceUnavailable(_) => ServiceErrorKind::ServiceUnavailable,
        }
    }

    /// Returns the message carried by the error.
    pub fn message(&self) -> &str {
        match self {
            Self::AuthenticationRequestBad(m)
            | Self::AuthenticationRequired(m)
            | Self::AuthenticationUnauthorized(m)
            | Self::RequestBad(m)
            | Self::RequestBadType(m)
            | Self::RequestNotUnderstood(m)
            | Self::MethodNotAllowed(m)
            | Self::NotFound(m)
            | Self::ConfigurationFailure(m)
            | Self::ProgrammerFailure(m)
            | Self::ServiceUnavailable(m) => m,
        }
    }

    /// Returns `true` only for environmental failures a caller may retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ServiceUnavailable(_))
    }

    /// Returns `true` for failures caused by misuse of the client.
    pub fn is_programmer_error(&self) -> bool {
        matches!(self, Self::RequestBad(_) | Self::ProgrammerFailure(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_kind_round_trips_through_with_message() {
        for kind in ServiceErrorKind::iter() {
            let err = kind.with_message("m");
            assert_eq!(err.kind(), kind);
            assert_eq!(err.message(), "m");
        }
    }

    #[test]
    fn test_only_unavailable_is_retryable() {
        let retryable: Vec<_> = ServiceErrorKind::iter()
            .filter(|k| k.with_message("").is_retryable())
            .collect();
        assert_eq!(retryable, vec![ServiceErrorKind::ServiceUnavailable]);
    }

    #[test]
    fn test_programmer_errors() {
        assert!(ServiceError::RequestBad("x".into()).is_programmer_error());
        assert!(ServiceError::ProgrammerFailure("x".into()).is_programmer_error());
        assert!(!ServiceError::ServiceUnavailable("x".into()).is_programmer_error());
    }

    #[test]
    fn test_kind_parses_snake_case() {
        assert_eq!(
            ServiceErrorKind::from_str("authentication_unauthorized").unwrap(),
            ServiceErrorKind::AuthenticationUnauthorized
        );
    }

    #[test]
    fn test_display() {
        let err = ServiceError::AuthenticationUnauthorized("bad token".to_string());
        assert_eq!(err.to_string(), "not authorized: bad token");
    }
}
