//! SDK Integration Tests
//!
//! Tests for request shaping and error normalization against a fake transport.

mod common;

use std::sync::Arc;

use common::FakeTransport;
use reqwest::Method;
use zenblog::sdk::{
    CacheMode, ClientOptions, FetchError, GetOptions, PostListParams, RequestOptions,
    ZenblogClient,
};

const BASE: &str = "https://api.test/public";

fn client(transport: &Arc<FakeTransport>) -> ZenblogClient {
    ZenblogClient::with_transport(
        ClientOptions::new("blog-123").with_url(BASE),
        transport.clone(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_posts_list_default_query() {
    let transport = Arc::new(FakeTransport::default().respond(200, r#"{"data": [], "total": 0}"#));
    let client = client(&transport);

    let posts = client.posts().list(PostListParams::default()).await.unwrap();
    assert!(posts.data.is_empty());
    assert_eq!(posts.total, Some(0));

    let request = transport.last_request();
    assert_eq!(request.method, Method::GET);
    assert_eq!(
        request.url,
        "https://api.test/public/blogs/blog-123/posts?limit=20&offset=0"
    );
    assert!(!request.url.contains("category"));
    assert!(!request.url.contains("tags"));
    assert!(!request.url.contains("author"));
    assert_eq!(request.header("Content-Type"), Some("application/json"));
    assert_eq!(request.header("Cache-Control"), None);
}

#[tokio::test]
async fn test_posts_list_with_filters() {
    let transport = Arc::new(FakeTransport::default());
    let client = client(&transport);

    client
        .posts()
        .list(
            PostListParams::new()
                .limit(5)
                .offset(10)
                .category("news")
                .tags(["a", "b"])
                .author("jane")
                .cache(CacheMode::NoStore),
        )
        .await
        .unwrap();

    let request = transport.last_request();
    assert_eq!(
        request.url,
        "https://api.test/public/blogs/blog-123/posts?limit=5&offset=10&category=news&tags=a%2Cb&author=jane"
    );
    assert_eq!(request.header("cache-control"), Some("no-store"));
}

#[tokio::test]
async fn test_single_resource_paths() {
    let transport = Arc::new(
        FakeTransport::default()
            .respond(200, r#"{"data": {"slug": "hello", "title": "Hello", "html_content": "<p>hi</p>"}}"#)
            .respond(200, r#"{"data": {"slug": "jane", "name": "Jane"}}"#),
    );
    let client = client(&transport);

    let post = client
        .posts()
        .get("hello", GetOptions::with_cache(CacheMode::Reload))
        .await
        .unwrap();
    assert_eq!(post.data.html_content.as_deref(), Some("<p>hi</p>"));
    assert_eq!(
        transport.last_request().url,
        "https://api.test/public/blogs/blog-123/posts/hello"
    );
    assert_eq!(transport.last_request().header("Cache-Control"), Some("no-cache"));

    let author = client.authors().get("jane", GetOptions::default()).await.unwrap();
    assert_eq!(author.data.name.as_deref(), Some("Jane"));
    assert_eq!(
        transport.last_request().url,
        "https://api.test/public/blogs/blog-123/authors/jane"
    );
}

#[tokio::test]
async fn test_slug_with_reserved_characters_is_encoded() {
    let transport = Arc::new(
        FakeTransport::default().respond(200, r#"{"data": {"slug": "what?", "title": "What"}}"#),
    );
    let client = client(&transport);

    client.posts().get("what?/now#1", GetOptions::default()).await.unwrap();
    assert_eq!(
        transport.last_request().url,
        "https://api.test/public/blogs/blog-123/posts/what%3F%2Fnow%231"
    );
}

#[tokio::test]
async fn test_parameterless_list_endpoints() {
    let transport = Arc::new(
        FakeTransport::default()
            .respond(200, r#"{"data": [{"name": "News", "slug": "news"}]}"#)
            .respond(200, r#"{"data": [{"name": "Rust", "slug": "rust"}]}"#)
            .respond(200, r#"{"data": [{"name": "Jane", "slug": "jane"}]}"#),
    );
    let client = client(&transport);

    let categories = client.categories().list().await.unwrap();
    let tags = client.tags().list().await.unwrap();
    let authors = client.authors().list().await.unwrap();

    assert_eq!(categories.data[0].slug, "news");
    assert_eq!(tags.data[0].slug, "rust");
    assert_eq!(authors.data[0].slug, "jane");

    let urls: Vec<String> = transport
        .requests
        .lock()
        .unwrap()
        .iter()
        .map(|r| r.url.clone())
        .collect();
    assert_eq!(
        urls,
        vec![
            "https://api.test/public/blogs/blog-123/categories",
            "https://api.test/public/blogs/blog-123/tags",
            "https://api.test/public/blogs/blog-123/authors",
        ]
    );
}

#[tokio::test]
async fn test_posts_with_null_and_missing_fields() {
    let transport = Arc::new(
        FakeTransport::default()
            .respond(200, r#"{"data": [{"slug": "a", "title": "A", "tags": null, "authors": null}, {"slug": "b"}]}"#)
            .respond(200, r#"{"data": {"slug": "a", "title": null, "category": null}}"#),
    );
    let client = client(&transport);

    let posts = client.posts().list(PostListParams::default()).await.unwrap();
    assert_eq!(posts.data.len(), 2);
    assert_eq!(posts.data[0].title.as_deref(), Some("A"));
    assert!(posts.data[0].tags.is_empty());
    assert!(posts.data[1].authors.is_empty());

    let post = client.posts().get("a", GetOptions::default()).await.unwrap();
    assert!(post.data.title.is_none());
    assert!(post.data.category.is_none());
}

#[tokio::test]
async fn test_caller_headers_override_defaults() {
    let transport = Arc::new(FakeTransport::default().respond(200, r#"{"ok": true}"#));
    let client = client(&transport);

    let value: serde_json::Value = client
        .fetch(
            "custom",
            RequestOptions::get()
                .with_header("content-type", "application/vnd.zenblog+json")
                .with_header("X-Request-Id", "abc"),
        )
        .await
        .unwrap();
    assert_eq!(value["ok"], serde_json::Value::Bool(true));

    let request = transport.last_request();
    assert_eq!(request.header("Content-Type"), Some("application/vnd.zenblog+json"));
    assert_eq!(request.header("x-request-id"), Some("abc"));
    assert_eq!(
        request
            .headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .count(),
        1
    );
}

#[tokio::test]
async fn test_non_2xx_is_api_error_with_status() {
    let transport = Arc::new(FakeTransport::default().respond(404, r#"{"error": "Post not found"}"#));
    let client = client(&transport);

    let err = client
        .posts()
        .get("missing", GetOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    match err {
        FetchError::Api { response } => {
            assert_eq!(response.status, 404);
            assert!(response.body.contains("Post not found"));
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_json_is_parse_error() {
    let transport = Arc::new(FakeTransport::default().respond(200, "<html>oops</html>"));
    let client = client(&transport);

    let err = client.tags().list().await.unwrap_err();
    assert!(matches!(err, FetchError::Parse { status: 200, .. }));
    assert!(err.to_string().contains("Failed to parse JSON response from API"));
}

#[tokio::test]
async fn test_transport_error_keeps_source() {
    let transport = Arc::new(FakeTransport::default().fail("api.test:443"));
    let client = client(&transport);

    let err = client.categories().list().await.unwrap_err();
    match &err {
        FetchError::Transport(source) => {
            assert!(source.is::<common::ConnectionRefused>());
        }
        other => panic!("expected transport error, got {:?}", other),
    }
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_empty_blog_id_sends_nothing() {
    let transport = Arc::new(FakeTransport::default());
    let result = ZenblogClient::with_transport(ClientOptions::new(""), transport.clone());

    assert!(matches!(result, Err(FetchError::Validation(_))));
    assert_eq!(transport.request_count(), 0);
}
