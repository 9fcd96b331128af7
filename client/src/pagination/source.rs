//! Where the pages of a list come from.

use std::rc::Rc;

use common::{
    search_query::SearchQueryOptions,
    search_result::{DocAddress, MoreLikeThisArticleInfo, SearchedArticleInfo},
};

use super::PageRequest;
use crate::api::{ApiError, SearchBackend};

#[allow(async_fn_in_trait)]
pub trait PageSource {
    type Item;

    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<Self::Item>, ApiError>;
}

/// Pages of `/api/retrieved_info` for one submitted query.
///
/// Key and options are captured at submission; later option changes only
/// apply to the next search.
pub struct SearchResultsSource<B> {
    backend: Rc<B>,
    key: String,
    options: SearchQueryOptions,
}

impl<B> SearchResultsSource<B> {
    pub fn new(backend: Rc<B>, key: impl Into<String>, options: SearchQueryOptions) -> Self {
        Self { backend, key: key.into(), options }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<B: SearchBackend> PageSource for SearchResultsSource<B> {
    type Item = SearchedArticleInfo;

    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<SearchedArticleInfo>, ApiError> {
        self.backend.retrieved_info(&self.key, self.options, request.offset, request.page_size).await
    }
}

/// Pages of `/api/more_like_this` for one document.
pub struct MoreLikeThisSource<B> {
    backend: Rc<B>,
    address: DocAddress,
}

impl<B> MoreLikeThisSource<B> {
    pub fn new(backend: Rc<B>, address: DocAddress) -> Self {
        Self { backend, address }
    }
}

impl<B: SearchBackend> PageSource for MoreLikeThisSource<B> {
    type Item = MoreLikeThisArticleInfo;

    async fn fetch_page(&self, request: PageRequest) -> Result<Vec<MoreLikeThisArticleInfo>, ApiError> {
        self.backend.more_like_this(self.address, request.offset, request.page_size).await
    }
}
