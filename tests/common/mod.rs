//! Recording fakes for the media backends and the HTTP transport.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Notify;

use zenblog::adapters::{ImageHost, ListOptions, MediaTable, ObjectStorage};
use zenblog::domain::{BlogImageRow, NewBlogImage, StorageObject, StorageObjectMetadata};
use zenblog::sdk::{BoxError, HttpRequest, HttpTransport, RawResponse};

/// Transport that returns queued responses and records requests
#[derive(Default)]
pub struct FakeTransport {
    pub requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<Result<RawResponse, String>>>,
}

impl FakeTransport {
    pub fn respond(self, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().push_back(Ok(RawResponse {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.to_string(),
        }));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[derive(Debug)]
pub struct ConnectionRefused(pub String);

impl std::fmt::Display for ConnectionRefused {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "connection refused: {}", self.0)
    }
}

impl std::error::Error for ConnectionRefused {}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, BoxError> {
        self.requests.lock().unwrap().push(request);
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(Box::new(ConnectionRefused(message))),
            None => Ok(RawResponse {
                status: 200,
                headers: Vec::new(),
                body: r#"{"data": []}"#.to_string(),
            }),
        }
    }
}

/// Bucket fake with fixed listing and recorded mutations
#[derive(Default)]
pub struct FakeStorage {
    pub objects: Vec<StorageObject>,
    pub fail_list: Option<String>,
    pub fail_remove: Option<String>,
    /// When set, `list` waits for a notification before answering
    pub list_gate: Option<Arc<Notify>>,
    pub list_calls: Mutex<Vec<(String, ListOptions)>>,
    pub remove_calls: Mutex<Vec<Vec<String>>>,
    pub uploads: Mutex<Vec<(String, usize, String)>>,
}

impl FakeStorage {
    pub fn with_objects(objects: Vec<StorageObject>) -> Self {
        Self {
            objects,
            ..Default::default()
        }
    }
}

pub fn object(name: &str, created_at: &str, size: u64) -> StorageObject {
    StorageObject {
        name: name.to_string(),
        id: Some(format!("obj-{}", name)),
        created_at: Some(created_at.to_string()),
        updated_at: None,
        metadata: Some(StorageObjectMetadata {
            size: Some(size),
            mime_type: Some("image/png".to_string()),
        }),
    }
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn list(&self, prefix: &str, options: &ListOptions) -> Result<Vec<StorageObject>> {
        self.list_calls
            .lock()
            .unwrap()
            .push((prefix.to_string(), options.clone()));
        if let Some(gate) = &self.list_gate {
            gate.notified().await;
        }
        if let Some(message) = &self.fail_list {
            anyhow::bail!("{}", message);
        }
        Ok(self.objects.clone())
    }

    async fn upload(&self, path: &str, body: Vec<u8>, content_type: &str) -> Result<String> {
        self.uploads
            .lock()
            .unwrap()
            .push((path.to_string(), body.len(), content_type.to_string()));
        Ok(format!("images/{}", path))
    }

    async fn remove(&self, paths: &[String]) -> Result<()> {
        self.remove_calls.lock().unwrap().push(paths.to_vec());
        if let Some(message) = &self.fail_remove {
            anyhow::bail!("{}", message);
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://storage.test/public/images/{}", path)
    }
}

/// Image table fake
#[derive(Default)]
pub struct FakeTable {
    pub rows: Vec<BlogImageRow>,
    pub select_calls: Mutex<Vec<String>>,
    pub inserts: Mutex<Vec<NewBlogImage>>,
}

impl FakeTable {
    pub fn with_rows(rows: Vec<BlogImageRow>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }
}

pub fn row(id: i64, name: &str, created_at: &str) -> BlogImageRow {
    BlogImageRow {
        id,
        file_url: Some(format!("https://cdn.test/{}", name)),
        file_name: name.to_string(),
        created_at: created_at.to_string(),
        size_in_bytes: Some(1024),
    }
}

#[async_trait]
impl MediaTable for FakeTable {
    async fn select_for_blog(&self, blog_id: &str) -> Result<Vec<BlogImageRow>> {
        self.select_calls.lock().unwrap().push(blog_id.to_string());
        Ok(self.rows.clone())
    }

    async fn insert(&self, image: &NewBlogImage) -> Result<BlogImageRow> {
        self.inserts.lock().unwrap().push(image.clone());
        Ok(BlogImageRow {
            id: 99,
            file_url: Some(image.file_url.clone()),
            file_name: image.file_name.clone(),
            created_at: "2024-06-01T00:00:00Z".to_string(),
            size_in_bytes: image.size_in_bytes,
        })
    }
}

/// External image host fake
#[derive(Default)]
pub struct FakeImageHost {
    pub fail: Option<String>,
    pub calls: Mutex<Vec<(String, Vec<String>)>>,
}

#[async_trait]
impl ImageHost for FakeImageHost {
    async fn delete_images(&self, blog_id: &str, file_names: &[String]) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((blog_id.to_string(), file_names.to_vec()));
        if let Some(message) = &self.fail {
            anyhow::bail!("{}", message);
        }
        Ok(())
    }
}
