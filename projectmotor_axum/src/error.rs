use http::StatusCode;
use projectmotor::{CoordinationError, OAuth2Error, SessionError};

pub(crate) const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";
pub(crate) const LOGIN_FAILED_MESSAGE: &str = "We couldn't sign you in with GitHub. Please try again.";

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Status and user-facing message of a coordination error.
///
/// Client errors carry their own message. Server and provider errors only
/// carry a generic one; the details stay in the log.
pub(crate) fn status_and_message(e: &CoordinationError) -> (StatusCode, String) {
    match e {
        CoordinationError::StateMismatch => (StatusCode::BAD_REQUEST, e.to_string()),
        CoordinationError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, e.to_string()),
        CoordinationError::SelfShare => (StatusCode::BAD_REQUEST, e.to_string()),
        CoordinationError::Unauthorized => (StatusCode::UNAUTHORIZED, e.to_string()),
        CoordinationError::UserNotFound => (StatusCode::NOT_FOUND, e.to_string()),
        CoordinationError::ResourceNotFound { .. } => {
            (StatusCode::NOT_FOUND, "Not found".to_string())
        }
        CoordinationError::SessionError(SessionError::NoSession) => {
            (StatusCode::UNAUTHORIZED, "Unauthorized access".to_string())
        }
        CoordinationError::OAuth2Error(OAuth2Error::Storage(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            GENERIC_ERROR_MESSAGE.to_string(),
        ),
        CoordinationError::OAuth2Error(_) => {
            (StatusCode::BAD_GATEWAY, LOGIN_FAILED_MESSAGE.to_string())
        }
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            GENERIC_ERROR_MESSAGE.to_string(),
        ),
    }
}

impl<T> IntoResponseError<T> for Result<T, CoordinationError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| status_and_message(&e))
    }
}

/// Template rendering failures
impl<T> IntoResponseError<T> for Result<T, askama::Error> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            tracing::error!(error = %e, "Failed to render template");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERIC_ERROR_MESSAGE.to_string(),
            )
        })
    }
}
