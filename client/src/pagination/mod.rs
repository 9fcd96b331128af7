//! Incremental loading of result lists.
//!
//! The same three-state machine drives the primary search results and every
//! "more like this" list. [`PaginationController`] holds the state and the
//! accumulated items without doing any I/O; [`PaginatedList`] pairs it with a
//! [`PageSource`] to actually fetch pages.

mod controller;
pub use controller::{LoadOutcome, PageRequest, PaginationController};

mod source;
pub use source::{MoreLikeThisSource, PageSource, SearchResultsSource};

mod list;
pub use list::PaginatedList;
