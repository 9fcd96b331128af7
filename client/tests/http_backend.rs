//! `HttpSearchBackend` and `SearchSession` against a stub search service.

use std::{
    collections::HashMap,
    rc::Rc,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use client::{
    api::{ApiError, HttpSearchBackend, SearchBackend},
    config::ClientConfig,
    data_definitions::loading_state::LoadingState,
    pagination::LoadOutcome,
    session::{SearchSession, SessionParts},
};
use common::{
    search_query::{SearchQueryOptions, SearchSortBy},
    search_result::DocAddress,
    text_highlight::ByteRange,
};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

const ARTICLE_COUNT: u64 = 10;

type Params = HashMap<String, String>;
type Seen = Arc<Mutex<Vec<Params>>>;

fn page(params: &Params, total: u64) -> std::ops::Range<u64> {
    let offset: u64 = params["offset"].parse().unwrap();
    let page_size: u64 = params["pageSize"].parse().unwrap();
    offset.min(total)..(offset + page_size).min(total)
}

async fn key_hints(Query(params): Query<Params>) -> Response {
    let key = params.get("key").cloned().unwrap_or_default();
    match key.as_str() {
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, "index offline").into_response(),
        "silent" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "gone" => StatusCode::NOT_FOUND.into_response(),
        "odd" => Json(json!({ "hints": [] })).into_response(),
        _ => Json(json!({
            "keyHints": [{
                "fragments": format!("{key} tutorial"),
                "highlightedPositions": [{ "start": 0, "end": key.len() }],
            }],
            "duration": 1,
        }))
        .into_response(),
    }
}

async fn retrieved_info(State(seen): State<Seen>, Query(params): Query<Params>) -> Json<Value> {
    let key = params["key"].clone();
    let items: Vec<Value> = page(&params, ARTICLE_COUNT)
        .map(|n| {
            json!({
                "url": format!("https://example.org/{n}"),
                "titleSnippet": { "fragments": format!("{key} article {n}"), "highlightedPositions": [{ "start": 0, "end": key.len() }] },
                "bodySnippet": { "fragments": "body", "highlightedPositions": [] },
                "likes": n,
                "time": 1_600_000_000_000_u64 + n,
                "address": { "segmentOrd": 1, "docId": n },
            })
        })
        .collect();
    seen.lock().unwrap().push(params);
    Json(json!({ "articleInfos": items, "duration": 2 }))
}

async fn top_info() -> Json<Value> {
    Json(json!({ "topArticleInfos": [
        { "url": "https://example.org/top/0", "title": "most liked", "likes": 99 },
        { "url": "https://example.org/top/1", "title": "runner up", "likes": 50 },
    ]}))
}

async fn more_like_this(State(seen): State<Seen>, Query(params): Query<Params>) -> Json<Value> {
    let doc_id = params["docId"].clone();
    let items: Vec<Value> = page(&params, 3)
        .map(|n| {
            json!({
                "url": format!("https://example.org/{doc_id}/similar/{n}"),
                "title": format!("similar {n}"),
                "body": "",
                "likes": n,
                "time": 1_600_000_000_000_u64,
            })
        })
        .collect();
    seen.lock().unwrap().push(params);
    Json(json!({ "moreLikeThisArticleInfos": items }))
}

async fn serve() -> (String, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route("/api/key_hints", get(key_hints))
        .route("/api/retrieved_info", get(retrieved_info))
        .route("/api/top_info", get(top_info))
        .route("/api/more_like_this", get(more_like_this))
        .with_state(seen.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/"), seen)
}

#[tokio::test]
async fn key_hints_are_decoded() {
    let (url, _seen) = serve().await;
    let backend = HttpSearchBackend::new(url);
    let hints = backend.key_hints("rust").await.unwrap();
    assert_eq!(hints.len(), 1);
    assert_eq!(hints[0].fragments, "rust tutorial");
    assert_eq!(hints[0].highlighted_positions, vec![ByteRange::new(0, 4)]);
}

#[tokio::test]
async fn error_statuses_are_classified() {
    let (url, _seen) = serve().await;
    let backend = HttpSearchBackend::new(url);

    let err = backend.key_hints("boom").await.unwrap_err();
    assert!(matches!(err, ApiError::Backend { .. }));
    assert_eq!(err.user_message(), "index offline");

    let err = backend.key_hints("silent").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport { status: 500, .. }));
    assert_eq!(err.user_message(), "Unknown error with status code 500.");

    let err = backend.key_hints("gone").await.unwrap_err();
    assert_eq!(err.user_message(), "Unknown error with status code 404.");

    let err = backend.key_hints("odd").await.unwrap_err();
    assert!(matches!(err, ApiError::MalformedResponse { expected_key: "keyHints", .. }));
    assert_eq!(err.endpoint(), "key_hints");
}

#[tokio::test]
async fn unreachable_service_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpSearchBackend::new(format!("http://{addr}"));
    let err = backend.top_info().await.unwrap_err();
    assert!(matches!(err, ApiError::Network { .. }));
    assert_eq!(err.user_message(), "Unable to reach the search service.");
}

#[tokio::test]
async fn retrieved_info_sends_options_as_discriminants() {
    let (url, seen) = serve().await;
    let backend = HttpSearchBackend::new(url);
    let options = SearchQueryOptions::default().with_sort_by(SearchSortBy::Hot);
    let articles = backend.retrieved_info("rust async", options, 4, 3).await.unwrap();
    assert_eq!(articles.len(), 3);
    assert_eq!(articles[0].title_snippet.fragments, "rust async article 4");
    assert_eq!(articles[0].address, DocAddress { segment_ord: 1, doc_id: 4 });

    let params = seen.lock().unwrap()[0].clone();
    assert_eq!(params["key"], "rust async");
    assert_eq!(params["offset"], "4");
    assert_eq!(params["pageSize"], "3");
    assert_eq!(params["sortBy"], "1");
    assert_eq!(params["searchField"], "2");
    assert_eq!(params["searchMethod"], "0");
}

#[tokio::test]
async fn session_pages_through_the_service() {
    let (url, seen) = serve().await;
    let config = ClientConfig { api_url: url, page_size: 4, ..ClientConfig::default() };
    let backend = Rc::new(HttpSearchBackend::new(config.api_url.clone()));
    let SessionParts { mut session, .. } = SearchSession::new(backend, &config);

    session.edit_query("rust");
    assert!(matches!(session.submit().await, Some(LoadOutcome::Appended(4))));
    assert!(matches!(session.load_more().await, LoadOutcome::Appended(4)));
    assert!(matches!(session.load_more().await, LoadOutcome::Appended(2)));
    assert!(matches!(session.load_more().await, LoadOutcome::Exhausted));

    let results = session.results().unwrap();
    assert_eq!(results.items().len(), 10);
    assert_eq!(results.state(), LoadingState::NothingToLoad);

    let address = results.items()[2].address;
    assert!(matches!(session.load_more_like_this(address).await, LoadOutcome::Appended(3)));
    assert!(matches!(session.load_more_like_this(address).await, LoadOutcome::Exhausted));
    assert_eq!(session.more_like_this(address).unwrap().items()[0].url, "https://example.org/2/similar/0");

    let offsets: Vec<String> = seen.lock().unwrap().iter().map(|p| p["offset"].clone()).collect();
    assert_eq!(offsets, vec!["0", "4", "8", "10", "0", "3"]);

    let top = session.top_articles().await.unwrap();
    assert_eq!(top[0].title, "most liked");
}

/// `retrieved_info` that never answers its first call.
async fn serve_stalling() -> String {
    let calls = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route(
            "/api/retrieved_info",
            get(|State(calls): State<Arc<AtomicUsize>>, Query(params): Query<Params>| async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    std::future::pending::<()>().await;
                }
                let items: Vec<Value> = page(&params, 2)
                    .map(|n| {
                        json!({
                            "url": format!("https://example.org/{n}"),
                            "titleSnippet": { "fragments": "late", "highlightedPositions": [] },
                            "bodySnippet": { "fragments": "", "highlightedPositions": [] },
                            "likes": 0,
                            "time": 1_600_000_000_000_u64,
                            "address": { "segmentOrd": 0, "docId": n },
                        })
                    })
                    .collect();
                Json(json!({ "articleInfos": items }))
            }),
        )
        .with_state(calls);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn stalled_page_times_out_and_can_be_retried() {
    let url = serve_stalling().await;
    let config = ClientConfig { api_url: url, request_timeout: Duration::from_millis(300), ..ClientConfig::default() };
    let backend = Rc::new(HttpSearchBackend::from_config(&config).unwrap());
    let SessionParts { mut session, mut notifications, .. } = SearchSession::new(backend, &config);

    session.edit_query("rust");
    let outcome = session.submit().await.unwrap();
    assert!(matches!(outcome.error(), Some(client::error::ClientError::Api(ApiError::Network { .. }))));
    assert_eq!(notifications.try_recv().unwrap().message, "Unable to reach the search service.");

    let results = session.results().unwrap();
    assert_eq!(results.state(), LoadingState::ReadyToLoad);
    assert!(results.items().is_empty());

    assert!(matches!(session.load_more().await, LoadOutcome::Appended(2)));
    assert_eq!(session.results().unwrap().offset(), 2);
}

#[tokio::test]
async fn unreadable_error_body_keeps_the_status() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0_u8; 1024];
        let _ = socket.read(&mut request).await;
        socket
            .write_all(b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\ncut short")
            .await
            .unwrap();
    });

    let backend = HttpSearchBackend::new(format!("http://{addr}"));
    let err = backend.top_info().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport { status: 500, .. }), "{err:?}");
}
