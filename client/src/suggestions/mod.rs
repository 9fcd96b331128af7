//! Autocomplete hints while the user types.
//!
//! Keystrokes are debounced before a request goes out, several requests may
//! be in flight at once, and only the answer to the most recently dispatched
//! one is ever displayed.

mod debounce;
pub use debounce::Debouncer;

mod race;
pub use race::{HintRequest, KeyChange, RequestTimestamp, SuggestionRaceController};

mod pipeline;
pub use pipeline::{SuggestionCommand, SuggestionHandle, SuggestionPipeline};
