//! HTTP client for the adboard API.
//!
//! Every call returns the raw status and JSON body rather than failing on
//! non-2xx, so error envelopes can be inspected by the caller.

use anyhow::{Context, Result};
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use adboard_types::api::{CreateAdvertisement, CreateUser, PatchAdvertisement, PatchUser};

pub const DEFAULT_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

#[derive(Clone)]
pub struct AdboardClient {
    http: Client,
    base_url: String,
}

impl AdboardClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -- Users --

    pub async fn create_user(&self, req: &CreateUser) -> Result<ApiResponse> {
        self.send(Method::POST, "/users/", Some(req)).await
    }

    pub async fn get_user(&self, id: i64) -> Result<ApiResponse> {
        self.send::<()>(Method::GET, &format!("/users/{id}"), None).await
    }

    pub async fn patch_user(&self, id: i64, req: &PatchUser) -> Result<ApiResponse> {
        self.send(Method::PATCH, &format!("/users/{id}"), Some(req)).await
    }

    pub async fn delete_user(&self, id: i64) -> Result<ApiResponse> {
        self.send::<()>(Method::DELETE, &format!("/users/{id}"), None).await
    }

    // -- Advertisements --

    pub async fn create_advertisement(&self, req: &CreateAdvertisement) -> Result<ApiResponse> {
        self.send(Method::POST, "/advertisements/", Some(req)).await
    }

    pub async fn get_advertisement(&self, id: i64) -> Result<ApiResponse> {
        self.send::<()>(Method::GET, &format!("/advertisements/{id}"), None)
            .await
    }

    pub async fn patch_advertisement(
        &self,
        id: i64,
        req: &PatchAdvertisement,
    ) -> Result<ApiResponse> {
        self.send(Method::PATCH, &format!("/advertisements/{id}"), Some(req))
            .await
    }

    pub async fn delete_advertisement(&self, id: i64) -> Result<ApiResponse> {
        self.send::<()>(Method::DELETE, &format!("/advertisements/{id}"), None)
            .await
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("{} {} failed", method, url))?;
        let status = response.status();
        let text = response.text().await.context("reading response body")?;

        // Non-JSON bodies (e.g. proxy errors) are kept as a string.
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(ApiResponse { status, body })
    }
}
