//! One search page: the query being edited, the submitted search and the
//! lists hanging off it.

use std::{collections::HashMap, rc::Rc};

use common::{
    search_query::{SearchQueryModel, SearchQueryOptions},
    search_result::{DocAddress, TopArticleInfo},
    text_highlight::{HighlightTextSpan, Snippet},
};
use tokio::sync::mpsc;

use crate::{
    api::SearchBackend,
    config::ClientConfig,
    error::ClientError,
    notification::{Notification, NotificationSource, Notifier},
    pagination::{LoadOutcome, MoreLikeThisSource, PaginatedList, SearchResultsSource},
    suggestions::{SuggestionHandle, SuggestionPipeline},
};

pub type SearchResultsList<B> = PaginatedList<SearchResultsSource<B>>;
pub type MoreLikeThisList<B> = PaginatedList<MoreLikeThisSource<B>>;

/// Everything needed to run a session: the session itself, the suggestion
/// task to spawn next to it and the receiving end of its notifications.
pub struct SessionParts<B: SearchBackend> {
    pub session: SearchSession<B>,
    pub pipeline: SuggestionPipeline<B>,
    pub notifications: mpsc::UnboundedReceiver<Notification>,
}

/// State of one search page.
///
/// Owns its suggestion pipeline (and with it the key hints watermark), so two
/// sessions never see each other's answers.
pub struct SearchSession<B: SearchBackend> {
    backend: Rc<B>,
    page_size: u64,
    query: SearchQueryModel,
    committed_key: Option<String>,
    results: Option<SearchResultsList<B>>,
    more_like_this: HashMap<DocAddress, MoreLikeThisList<B>>,
    suggestions: SuggestionHandle,
    notifier: Notifier,
}

impl<B: SearchBackend + 'static> SearchSession<B> {
    pub fn new(backend: Rc<B>, config: &ClientConfig) -> SessionParts<B> {
        let (notifier, notifications) = Notifier::channel();
        let (pipeline, suggestions) =
            SuggestionPipeline::new(backend.clone(), config.key_hints_debounce, notifier.clone());
        let session = Self {
            backend,
            page_size: config.page_size,
            query: SearchQueryModel::default(),
            committed_key: None,
            results: None,
            more_like_this: HashMap::new(),
            suggestions,
            notifier,
        };
        SessionParts { session, pipeline, notifications }
    }

    pub fn query(&self) -> &SearchQueryModel {
        &self.query
    }

    pub fn suggestions(&self) -> &SuggestionHandle {
        &self.suggestions
    }

    /// The search box changed. Editing a committed query brings hints back.
    pub fn edit_query(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.committed_key.as_ref().is_some_and(|committed| *committed != text) {
            self.committed_key = None;
            self.suggestions.release();
        }
        self.suggestions.key_changed(text.clone());
        self.query.set_query_string(text);
    }

    /// Applies an option toggle. The submitted search keeps the options it
    /// was started with; the new ones are used by the next [`Self::submit`].
    pub fn update_options(&mut self, update: impl FnOnce(SearchQueryOptions) -> SearchQueryOptions) -> SearchQueryOptions {
        let options = self.query.update_options(update);
        tracing::debug!(?options, "search options changed");
        options
    }

    /// Starts a new search from the current query, discarding the previous
    /// result list and every more-like-this list, then loads the first page.
    ///
    /// Returns `None` without doing anything when the query is empty.
    pub async fn submit(&mut self) -> Option<LoadOutcome> {
        if !self.query.is_valid() {
            tracing::debug!("empty query, search not submitted");
            return None;
        }
        let key = self.query.query_string.clone();
        tracing::info!(key = %key, options = ?self.query.options, "submitting search");

        self.suggestions.commit();
        self.committed_key = Some(key.clone());
        self.more_like_this.clear();
        let source = SearchResultsSource::new(self.backend.clone(), key, self.query.options);
        let results = self.results.insert(PaginatedList::new(source, self.page_size));
        let outcome = results.load_more().await;
        Some(self.observe(NotificationSource::SearchResults, outcome))
    }

    /// Loads the next page of the submitted search.
    pub async fn load_more(&mut self) -> LoadOutcome {
        let Some(results) = self.results.as_mut() else {
            tracing::debug!("no search submitted, nothing to load");
            return LoadOutcome::Skipped;
        };
        let outcome = results.load_more().await;
        self.observe(NotificationSource::SearchResults, outcome)
    }

    pub fn results(&self) -> Option<&SearchResultsList<B>> {
        self.results.as_ref()
    }

    /// Loads the next page of documents similar to `address`, creating the
    /// list on first use.
    pub async fn load_more_like_this(&mut self, address: DocAddress) -> LoadOutcome {
        let backend = &self.backend;
        let page_size = self.page_size;
        let list = self
            .more_like_this
            .entry(address)
            .or_insert_with(|| PaginatedList::new(MoreLikeThisSource::new(backend.clone(), address), page_size));
        let outcome = list.load_more().await;
        self.observe(NotificationSource::MoreLikeThis, outcome)
    }

    pub fn more_like_this(&self, address: DocAddress) -> Option<&MoreLikeThisList<B>> {
        self.more_like_this.get(&address)
    }

    /// Today's top articles, or `None` after reporting the failure.
    pub async fn top_articles(&self) -> Option<Vec<TopArticleInfo>> {
        match self.backend.top_info().await {
            Ok(top) => Some(top),
            Err(err) => {
                self.notifier.report(NotificationSource::TopArticles, &ClientError::from(err));
                None
            }
        }
    }

    /// Highlighted spans of `snippet`, or `None` after reporting a range that
    /// splits a character.
    pub fn highlight(&self, snippet: &Snippet) -> Option<Vec<HighlightTextSpan>> {
        match snippet.try_highlight_spans() {
            Ok(spans) => Some(spans),
            Err(err) => {
                self.notifier.report(NotificationSource::Highlight, &ClientError::from(err));
                None
            }
        }
    }

    fn observe(&self, source: NotificationSource, outcome: LoadOutcome) -> LoadOutcome {
        if let Some(err) = outcome.error() {
            self.notifier.report(source, err);
        }
        outcome
    }
}
