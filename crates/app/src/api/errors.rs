//! Storefront service errors.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the storefront service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("storefront service returned {status}: {body}")]
    Status {
        /// Status code returned.
        status: StatusCode,

        /// Response body, possibly empty.
        body: String,
    },

    /// The service answered with something other than what was asked for.
    #[error("unexpected response from storefront service: {0}")]
    UnexpectedResponse(String),
}

/// Coarse classification used to pick a customer-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The requested resource does not exist.
    NotFound,
    /// The service failed while handling the request.
    Server,
    /// The service could not be reached in time.
    Unreachable,
    /// Any other failure.
    Other,
}

impl ApiError {
    /// Classify the error for customer-facing messages.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Status { status, .. } if *status == StatusCode::NOT_FOUND => {
                FailureKind::NotFound
            }
            Self::Status { status, .. } if status.is_server_error() => FailureKind::Server,
            Self::Http(source) if source.is_connect() || source.is_timeout() => {
                FailureKind::Unreachable
            }
            Self::Http(source) => match source.status() {
                Some(StatusCode::NOT_FOUND) => FailureKind::NotFound,
                Some(status) if status.is_server_error() => FailureKind::Server,
                _ => FailureKind::Other,
            },
            Self::Status { .. } | Self::UnexpectedResponse(_) => FailureKind::Other,
        }
    }

    /// Message suitable for showing to a customer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self.kind() {
            FailureKind::NotFound => "找不到資料（API 404）".to_string(),
            FailureKind::Server => "伺服器發生錯誤，請稍後再試".to_string(),
            FailureKind::Unreachable => "無法連線到伺服器，請確認 json-server 是否啟動".to_string(),
            FailureKind::Other => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: StatusCode) -> ApiError {
        ApiError::Status {
            status: code,
            body: String::new(),
        }
    }

    #[test]
    fn status_errors_are_classified() {
        assert_eq!(status(StatusCode::NOT_FOUND).kind(), FailureKind::NotFound);
        assert_eq!(
            status(StatusCode::BAD_GATEWAY).kind(),
            FailureKind::Server
        );
        assert_eq!(status(StatusCode::CONFLICT).kind(), FailureKind::Other);
    }

    #[test]
    fn other_failures_keep_their_own_message() {
        let error = ApiError::UnexpectedResponse("empty body".to_string());

        assert_eq!(
            error.user_message(),
            "unexpected response from storefront service: empty body"
        );
    }
}
