//! In-memory [`SearchBackend`] for unit tests.

use std::cell::RefCell;

use chrono::{TimeZone, Utc};
use common::{
    search_query::SearchQueryOptions,
    search_result::{DocAddress, MoreLikeThisArticleInfo, SearchedArticleInfo, TopArticleInfo},
    text_highlight::{ByteRange, Snippet},
};

use crate::api::{ApiError, SearchBackend};

#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedCall {
    pub key: String,
    pub options: SearchQueryOptions,
    pub offset: u64,
    pub page_size: u64,
}

/// Serves `article_count` articles titled "article N" for any key, and
/// `similar_count` more-like-this items per address.
pub struct MemoryBackend {
    pub article_count: u64,
    pub similar_count: u64,
    pub retrieved_calls: RefCell<Vec<RetrievedCall>>,
    pub fail_next: RefCell<Option<ApiError>>,
}

impl MemoryBackend {
    pub fn new(article_count: u64, similar_count: u64) -> Self {
        Self { article_count, similar_count, retrieved_calls: RefCell::new(vec![]), fail_next: RefCell::new(None) }
    }

    pub fn fail_next(&self, err: ApiError) {
        *self.fail_next.borrow_mut() = Some(err);
    }

    fn take_failure(&self) -> Result<(), ApiError> {
        match self.fail_next.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

pub fn article(key: &str, n: u64) -> SearchedArticleInfo {
    let title = format!("{key} article {n}");
    SearchedArticleInfo {
        url: format!("https://example.org/{n}"),
        title_snippet: Snippet::new(title, [ByteRange::new(0, key.len())]),
        body_snippet: Snippet::plain(format!("body of {n}")),
        code_snippet: None,
        likes: n,
        time: Utc.timestamp_millis_opt(1_600_000_000_000 + n as i64).unwrap(),
        address: DocAddress { segment_ord: 0, doc_id: n as u32 },
    }
}

fn range(offset: u64, page_size: u64, total: u64) -> std::ops::Range<u64> {
    offset.min(total)..(offset + page_size).min(total)
}

impl SearchBackend for MemoryBackend {
    async fn key_hints(&self, key: &str) -> Result<Vec<Snippet>, ApiError> {
        self.take_failure()?;
        Ok(vec![Snippet::new(format!("{key}s"), [ByteRange::new(0, key.len())])])
    }

    async fn retrieved_info(
        &self,
        key: &str,
        options: SearchQueryOptions,
        offset: u64,
        page_size: u64,
    ) -> Result<Vec<SearchedArticleInfo>, ApiError> {
        self.retrieved_calls.borrow_mut().push(RetrievedCall { key: key.to_string(), options, offset, page_size });
        self.take_failure()?;
        Ok(range(offset, page_size, self.article_count).map(|n| article(key, n)).collect())
    }

    async fn top_info(&self) -> Result<Vec<TopArticleInfo>, ApiError> {
        self.take_failure()?;
        Ok((0..3).map(|n| TopArticleInfo { url: format!("https://example.org/top/{n}"), title: format!("top {n}"), likes: 100 - n }).collect())
    }

    async fn more_like_this(
        &self,
        address: DocAddress,
        offset: u64,
        page_size: u64,
    ) -> Result<Vec<MoreLikeThisArticleInfo>, ApiError> {
        self.take_failure()?;
        Ok(range(offset, page_size, self.similar_count)
            .map(|n| MoreLikeThisArticleInfo {
                url: format!("https://example.org/{}/similar/{n}", address.doc_id),
                title: format!("similar {n}"),
                body: String::new(),
                likes: n,
                time: Utc.timestamp_millis_opt(1_600_000_000_000).unwrap(),
            })
            .collect())
    }
}
