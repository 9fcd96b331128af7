//! Errors surfaced by the search engine to its user.

use std::fmt;

use common::text_highlight::HighlightBoundaryError;

use crate::api::ApiError;

#[derive(Debug)]
pub enum ClientError {
    Api(ApiError),
    HighlightBoundary(HighlightBoundaryError),
}

impl ClientError {
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api(err) => err.user_message(),
            ClientError::HighlightBoundary(err) => format!("Unable to display search result: {err}."),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Api(err) => write!(f, "{err}"),
            ClientError::HighlightBoundary(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Api(err) => Some(err),
            ClientError::HighlightBoundary(err) => Some(err),
        }
    }
}

impl From<ApiError> for ClientError {
    fn from(err: ApiError) -> Self {
        ClientError::Api(err)
    }
}

impl From<HighlightBoundaryError> for ClientError {
    fn from(err: HighlightBoundaryError) -> Self {
        ClientError::HighlightBoundary(err)
    }
}
