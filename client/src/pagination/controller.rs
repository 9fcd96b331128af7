//! Sans-IO pagination state machine.

use crate::{
    data_definitions::{loading_state::LoadingState, result_page::ResultPage},
    error::ClientError,
};

/// Parameters of the next page to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub page_size: u64,
}

/// What a load attempt did to the list.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The list was not ready (already loading or exhausted); nothing was requested.
    Skipped,
    /// This many items were appended.
    Appended(usize),
    /// The backend returned an empty page.
    Exhausted,
    /// The request failed; the list is unchanged and ready for a retry.
    Failed(ClientError),
}

impl LoadOutcome {
    pub fn error(&self) -> Option<&ClientError> {
        match self {
            LoadOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// `ReadyToLoad -> Loading -> {ReadyToLoad, NothingToLoad}`.
///
/// `NothingToLoad` is terminal. A new search gets a new controller.
#[derive(Debug)]
pub struct PaginationController<T> {
    state: LoadingState,
    page: ResultPage<T>,
    page_size: u64,
}

impl<T> PaginationController<T> {
    pub fn new(page_size: u64) -> Self {
        Self { state: LoadingState::ReadyToLoad, page: ResultPage::default(), page_size: page_size.max(1) }
    }

    pub fn state(&self) -> LoadingState {
        self.state
    }

    pub fn items(&self) -> &[T] {
        self.page.items()
    }

    pub fn offset(&self) -> u64 {
        self.page.offset()
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Moves to `Loading` and returns the page to fetch, or `None` when the
    /// list is not `ReadyToLoad`.
    pub fn begin_load(&mut self) -> Option<PageRequest> {
        if !self.state.can_load() {
            return None;
        }
        self.state = LoadingState::Loading;
        Some(PageRequest { offset: self.page.offset(), page_size: self.page_size })
    }

    /// Applies the answer to the request returned by [`Self::begin_load`].
    ///
    /// An answer arriving while no load is in flight is dropped.
    pub fn complete_load(&mut self, result: Result<Vec<T>, ClientError>) -> LoadOutcome {
        if self.state != LoadingState::Loading {
            tracing::debug!(state = ?self.state, "dropping page answer with no load in flight");
            return LoadOutcome::Skipped;
        }
        match result {
            Ok(items) if items.is_empty() => {
                self.state = LoadingState::NothingToLoad;
                LoadOutcome::Exhausted
            }
            Ok(items) => {
                let count = items.len();
                self.page.append(items);
                self.state = LoadingState::ReadyToLoad;
                LoadOutcome::Appended(count)
            }
            Err(err) => {
                self.state = LoadingState::ReadyToLoad;
                LoadOutcome::Failed(err)
            }
        }
    }
}
