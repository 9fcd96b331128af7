//! Constants shared by the search client.

/// Number of articles requested per page.
pub const PAGE_SIZE: u64 = 10;

/// Quiet period before a key hint request is sent.
pub const KEY_HINTS_DEBOUNCE_MS: u64 = 1000;

/// Max count of key hints returned by the backend
pub const MAX_KEY_HINTS_COUNT: usize = 8;

pub const TOP_ARTICLE_INFOS_COUNT: usize = 10;

/// Max length of title and/or title snippet (in UTF-8 chars)
pub const MAX_TITLE_LENGTH: usize = 32;

/// Max length of body snippet (in UTF-8 chars)
pub const MAX_BODY_LENGTH: usize = 256;

/// Max length of code snippet (in UTF-8 chars)
pub const MAX_CODE_LENGTH: usize = 256;
