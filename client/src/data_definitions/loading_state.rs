//! Loading state of an incrementally loaded result list.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingState {
    /// Another page may be requested.
    #[default]
    ReadyToLoad,
    /// A page request is in flight.
    Loading,
    /// The backend returned an empty page; the list is complete.
    NothingToLoad,
}

impl LoadingState {
    pub fn can_load(self) -> bool {
        self == LoadingState::ReadyToLoad
    }
}
