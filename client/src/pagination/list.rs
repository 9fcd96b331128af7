use super::{LoadOutcome, PageSource, PaginationController};
use crate::{data_definitions::loading_state::LoadingState, error::ClientError};

/// A result list bound to the source of its pages.
pub struct PaginatedList<S: PageSource> {
    source: S,
    controller: PaginationController<S::Item>,
}

impl<S: PageSource> PaginatedList<S> {
    pub fn new(source: S, page_size: u64) -> Self {
        Self { source, controller: PaginationController::new(page_size) }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn state(&self) -> LoadingState {
        self.controller.state()
    }

    pub fn items(&self) -> &[S::Item] {
        self.controller.items()
    }

    pub fn offset(&self) -> u64 {
        self.controller.offset()
    }

    /// Fetches and appends the next page if the list is ready for one.
    pub async fn load_more(&mut self) -> LoadOutcome {
        let Some(request) = self.controller.begin_load() else {
            tracing::debug!(state = ?self.controller.state(), "load more ignored");
            return LoadOutcome::Skipped;
        };
        tracing::debug!(offset = request.offset, page_size = request.page_size, "loading page");
        let result = self.source.fetch_page(request).await.map_err(ClientError::from);
        let outcome = self.controller.complete_load(result);
        tracing::debug!(state = ?self.controller.state(), total = self.controller.items().len(), "page loaded");
        outcome
    }
}
