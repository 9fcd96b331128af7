//! Errors raised while talking to the search backend.

use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    /// The backend answered with a status other than 200 and no usable message.
    Transport { endpoint: &'static str, status: u16 },
    /// The request never got an answer (connection refused, reset, timeout...).
    Network { endpoint: &'static str, source: reqwest::Error },
    /// Status 500 with a non-empty body; the body is meant for the user.
    Backend { endpoint: &'static str, message: String },
    /// Status 200, but the body is not an object holding the expected key.
    MalformedResponse { endpoint: &'static str, expected_key: &'static str, detail: String },
}

impl ApiError {
    /// Classifies a non-200 answer.
    pub fn from_status(endpoint: &'static str, status: u16, body: String) -> Self {
        if status == 500 && !body.is_empty() {
            ApiError::Backend { endpoint, message: body }
        } else {
            ApiError::Transport { endpoint, status }
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            ApiError::Transport { endpoint, .. }
            | ApiError::Network { endpoint, .. }
            | ApiError::Backend { endpoint, .. }
            | ApiError::MalformedResponse { endpoint, .. } => *endpoint,
        }
    }

    /// The text shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport { status, .. } => format!("Unknown error with status code {status}."),
            ApiError::Network { .. } => "Unable to reach the search service.".to_string(),
            ApiError::Backend { message, .. } => message.clone(),
            ApiError::MalformedResponse { .. } => "Unknown error.".to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport { endpoint, status } => {
                write!(f, "{endpoint}: unknown error with status code {status}")
            }
            ApiError::Network { endpoint, source } => write!(f, "{endpoint}: request failed: {source}"),
            ApiError::Backend { endpoint, message } => write!(f, "{endpoint}: backend error: {message}"),
            ApiError::MalformedResponse { endpoint, expected_key, detail } => {
                write!(f, "{endpoint}: malformed response, expected `{expected_key}`: {detail}")
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_500_with_body_is_a_backend_error() {
        let err = ApiError::from_status("key_hints", 500, "index is rebuilding".to_string());
        assert!(matches!(err, ApiError::Backend { .. }));
        assert_eq!(err.user_message(), "index is rebuilding");
    }

    #[test]
    fn empty_500_and_other_statuses_are_transport_errors() {
        let err = ApiError::from_status("top_info", 500, String::new());
        assert!(matches!(err, ApiError::Transport { status: 500, .. }));
        assert_eq!(err.user_message(), "Unknown error with status code 500.");

        let err = ApiError::from_status("top_info", 404, "not found".to_string());
        assert!(matches!(err, ApiError::Transport { status: 404, .. }));
        assert_eq!(err.endpoint(), "top_info");
    }
}
