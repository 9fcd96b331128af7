//! Common library exports shared by the search client crates.

extern crate serde;


pub mod search_query;
pub mod search_result;
pub mod text_highlight;
pub mod search_const;
