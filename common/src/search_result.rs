//! Article records and response envelopes of the search API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::text_highlight::Snippet;

/// Backend locator of an indexed document, used for more-like-this queries.
///
/// The client never looks inside; it only sends it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocAddress {
    pub segment_ord: u32,
    pub doc_id: u32,
}

impl DocAddress {
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [("segmentOrd", self.segment_ord.to_string()), ("docId", self.doc_id.to_string())]
    }
}

/// Article structure used for searching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchedArticleInfo {
    pub url: String,
    /// Never empty: when only other fields matched this is the whole title.
    pub title_snippet: Snippet,
    pub body_snippet: Snippet,
    /// Absent when the article has no code block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<Snippet>,
    pub likes: u64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub time: DateTime<Utc>,
    pub address: DocAddress,
}

/// Article structure used for today's top
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopArticleInfo {
    pub url: String,
    pub title: String,
    pub likes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoreLikeThisArticleInfo {
    pub url: String,
    pub title: String,
    pub body: String,
    pub likes: u64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub time: DateTime<Utc>,
}

/// Top-level JSON object returned by one API endpoint.
///
/// A body is only accepted if it is an object holding [`Self::ITEMS_KEY`].
pub trait ResponseEnvelope: DeserializeOwned {
    const ITEMS_KEY: &'static str;
    type Item;

    /// Backend processing time in milliseconds, when reported.
    fn duration_ms(&self) -> Option<u64>;
    fn into_items(self) -> Vec<Self::Item>;
}

macro_rules! response_envelope {
    ($name:ident, $field:ident, $key:literal, $item:ty) => {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            pub $field: Vec<$item>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub duration: Option<u64>,
        }

        impl ResponseEnvelope for $name {
            const ITEMS_KEY: &'static str = $key;
            type Item = $item;

            fn duration_ms(&self) -> Option<u64> {
                self.duration
            }

            fn into_items(self) -> Vec<Self::Item> {
                self.$field
            }
        }
    };
}

response_envelope!(KeyHintsResponse, key_hints, "keyHints", Snippet);
response_envelope!(RetrievedInfoResponse, article_infos, "articleInfos", SearchedArticleInfo);
response_envelope!(TopInfoResponse, top_article_infos, "topArticleInfos", TopArticleInfo);
response_envelope!(MoreLikeThisResponse, more_like_this_article_infos, "moreLikeThisArticleInfos", MoreLikeThisArticleInfo);
