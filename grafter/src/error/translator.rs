//! Translation of wire errors into the service taxonomy.

use tracing::trace;

use super::remote_error::{ErrorOrigin, RemoteError};
use super::service_error::{ServiceError, ServiceErrorKind};

/// Maps a [`RemoteError`] to exactly one [`ServiceError`].
///
/// Applications register a translator on the
/// [`RemoteClient`](crate::RemoteClient); closures implement the trait.
///
/// ## Examples
///
/// ```
/// use grafter::{ErrorTranslator, RemoteError, ServiceError};
///
/// let translator = |error: &RemoteError| ServiceError::NotFound(error.message.clone());
/// let translated = translator.translate(&RemoteError::service("gone"));
/// assert_eq!(translated, ServiceError::NotFound("gone".to_string()));
/// ```
pub trait ErrorTranslator: Send + Sync {
    fn translate(&self, error: &RemoteError) -> ServiceError;
}

impl<F> ErrorTranslator for F
where
    F: Fn(&RemoteError) -> ServiceError + Send + Sync,
{
    fn translate(&self, error: &RemoteError) -> ServiceError {
        self(error)
    }
}

/// Service-reported `extensions.code` values and their taxonomy case.
const CODE_RULES: &[(&str, ServiceErrorKind)] = &[
    ("UNAUTHENTICATED", ServiceErrorKind::AuthenticationRequired),
    ("FORBIDDEN", ServiceErrorKind::AuthenticationUnauthorized),
    ("UNAUTHORIZED", ServiceErrorKind::AuthenticationUnauthorized),
    ("BAD_USER_INPUT", ServiceErrorKind::RequestBad),
    ("BAD_REQUEST", ServiceErrorKind::RequestBad),
    ("GRAPHQL_PARSE_FAILED", ServiceErrorKind::RequestNotUnderstood),
    ("GRAPHQL_VALIDATION_FAILED", ServiceErrorKind::RequestNotUnderstood),
    ("OPERATION_RESOLUTION_FAILURE", ServiceErrorKind::RequestNotUnderstood),
    ("METHOD_NOT_ALLOWED", ServiceErrorKind::MethodNotAllowed),
    ("NOT_FOUND", ServiceErrorKind::NotFound),
    ("INTERNAL_SERVER_ERROR", ServiceErrorKind::ServiceUnavailable),
    ("SERVICE_UNAVAILABLE", ServiceErrorKind::ServiceUnavailable),
];

/// Message fragments (lowercase) checked in order when no code matched.
const MESSAGE_RULES: &[(&str, ServiceErrorKind)] = &[
    ("malformed authorization", ServiceErrorKind::AuthenticationRequestBad),
    ("authorization header", ServiceErrorKind::AuthenticationRequestBad),
    ("not authenticated", ServiceErrorKind::AuthenticationRequired),
    ("unauthenticated", ServiceErrorKind::AuthenticationRequired),
    ("authentication required", ServiceErrorKind::AuthenticationRequired),
    ("login required", ServiceErrorKind::AuthenticationRequired),
    ("unauthorized", ServiceErrorKind::AuthenticationUnauthorized),
    ("forbidden", ServiceErrorKind::AuthenticationUnauthorized),
    ("permission", ServiceErrorKind::AuthenticationUnauthorized),
    ("token", ServiceErrorKind::AuthenticationUnauthorized),
    ("not found", ServiceErrorKind::NotFound),
    ("does not exist", ServiceErrorKind::NotFound),
    ("not allowed", ServiceErrorKind::MethodNotAllowed),
    ("expected type", ServiceErrorKind::RequestBadType),
    ("invalid type", ServiceErrorKind::RequestBadType),
    ("invalid value", ServiceErrorKind::RequestBad),
    ("syntax error", ServiceErrorKind::RequestNotUnderstood),
    ("cannot query field", ServiceErrorKind::RequestNotUnderstood),
    ("unavailable", ServiceErrorKind::ServiceUnavailable),
    ("timed out", ServiceErrorKind::ServiceUnavailable),
];

/// The translator used when the application registers none.
///
/// - Transport failures map by HTTP status; without a status (connection
///   failure, timeout) they are [`ServiceError::ServiceUnavailable`].
/// - Decode failures are [`ServiceError::ProgrammerFailure`]: the response
///   did not match the generated types.
/// - Service-reported errors map by `extensions.code`, then by message
///   keywords, falling back to [`ServiceError::RequestNotUnderstood`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTranslator;

impl DefaultTranslator {
    fn status_kind(status: u16) -> ServiceErrorKind {
        match status {
            400 => ServiceErrorKind::RequestBad,
            401 => ServiceErrorKind::AuthenticationRequired,
            403 => ServiceErrorKind::AuthenticationUnauthorized,
            404 => ServiceErrorKind::NotFound,
            405 => ServiceErrorKind::MethodNotAllowed,
            406 | 415 => ServiceErrorKind::RequestBadType,
            422 => ServiceErrorKind::RequestNotUnderstood,
            429 => ServiceErrorKind::ServiceUnavailable,
            500..=599 => ServiceErrorKind::ServiceUnavailable,
            400..=499 => ServiceErrorKind::RequestBad,
            _ => ServiceErrorKind::ConfigurationFailure,
        }
    }

    fn service_kind(error: &RemoteError) -> ServiceErrorKind {
        if let Some(code) = error.code() {
            if let Some((_, kind)) = CODE_RULES.iter().find(|(c, _)| c.eq_ignore_ascii_case(code)) {
                return *kind;
            }
            trace!(code, "unrecognized error code");
        }

        let message = error.message.to_lowercase();
        MESSAGE_RULES
            .iter()
            .find(|(keyword, _)| message.contains(keyword))
            .map(|(_, kind)| *kind)
            .unwrap_or(ServiceErrorKind::RequestNotUnderstood)
    }
}

impl ErrorTranslator for DefaultTranslator {
    fn translate(&self, error: &RemoteError) -> ServiceError {
        let kind = match error.origin {
            ErrorOrigin::Transport {
                status: Some(status),
                ..
            } => Self::status_kind(status),
            ErrorOrigin::Transport { status: None, .. } => ServiceErrorKind::ServiceUnavailable,
            ErrorOrigin::Decode => ServiceErrorKind::ProgrammerFailure,
            ErrorOrigin::Service => Self::service_kind(error),
        };
        kind.with_message(error.message.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;

    fn translate(error: RemoteError) -> ServiceErrorKind {
        DefaultTranslator.translate(&error).kind()
    }

    fn status(code: u16) -> ServiceErrorKind {
        translate(RemoteError::from(TransportError::Status {
            status: code,
            body: String::new(),
        }))
    }

    #[test]
    fn test_bad_token_is_unauthorized() {
        let error: RemoteError = serde_json::from_str(
            r#"{"message":"bad token","locations":[{"line":2,"column":5}]}"#,
        )
        .unwrap();
        let translated = DefaultTranslator.translate(&error);
        assert_eq!(translated, ServiceError::AuthenticationUnauthorized("bad token".to_string()));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(status(400), ServiceErrorKind::RequestBad);
        assert_eq!(status(401), ServiceErrorKind::AuthenticationRequired);
        assert_eq!(status(403), ServiceErrorKind::AuthenticationUnauthorized);
        assert_eq!(status(404), ServiceErrorKind::NotFound);
        assert_eq!(status(405), ServiceErrorKind::MethodNotAllowed);
        assert_eq!(status(415), ServiceErrorKind::RequestBadType);
        assert_eq!(status(422), ServiceErrorKind::RequestNotUnderstood);
        assert_eq!(status(429), ServiceErrorKind::ServiceUnavailable);
        assert_eq!(status(503), ServiceErrorKind::ServiceUnavailable);
        assert_eq!(status(418), ServiceErrorKind::RequestBad);
        assert_eq!(status(302), ServiceErrorKind::ConfigurationFailure);
    }

    #[test]
    fn test_transport_without_status_is_unavailable() {
        let kind = translate(RemoteError::from(TransportError::Connection("refused".into())));
        assert_eq!(kind, ServiceErrorKind::ServiceUnavailable);
        let kind = translate(RemoteError::from(TransportError::Timeout { duration_ms: 1 }));
        assert_eq!(kind, ServiceErrorKind::ServiceUnavailable);
    }

    #[test]
    fn test_decode_is_programmer_failure() {
        assert_eq!(translate(RemoteError::decode("eof")), ServiceErrorKind::ProgrammerFailure);
    }

    #[test]
    fn test_code_wins_over_message() {
        let error = RemoteError::service("token missing").with_code("UNAUTHENTICATED");
        assert_eq!(translate(error), ServiceErrorKind::AuthenticationRequired);
    }

    #[test]
    fn test_unknown_code_falls_back_to_message() {
        let error = RemoteError::service("Account does not exist").with_code("CUSTOM");
        assert_eq!(translate(error), ServiceErrorKind::NotFound);
    }

    #[test]
    fn test_unmatched_message_is_not_understood() {
        assert_eq!(
            translate(RemoteError::service("something odd happened")),
            ServiceErrorKind::RequestNotUnderstood
        );
    }

    #[test]
    fn test_closure_translator() {
        let translator = |_: &RemoteError| ServiceError::ConfigurationFailure("fixed".into());
        assert_eq!(
            translator.translate(&RemoteError::service("x")).kind(),
            ServiceErrorKind::ConfigurationFailure
        );
    }
}
