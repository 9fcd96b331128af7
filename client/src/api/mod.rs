//! Client API calls for search endpoints.

mod api_error;
pub use api_error::ApiError;

mod search_api;
pub use search_api::{HttpSearchBackend, SearchBackend, parse_envelope};
