//! CRM API Client
//!
//! HTTP bindings to the CRM REST API, organized by domain.
//! `reqwest` runs on top of `fetch` in the browser and natively in tests.

mod opportunities;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::context::SessionContext;
use crate::error::{ApiError, ApiResult};
use crate::models::{Opportunity, PipelineStatus};

pub use opportunities::*;

/// Backend operations the board depends on
#[async_trait(?Send)]
pub trait BoardApi {
    /// Load all pipeline columns with their opportunities
    async fn load_board(&self) -> ApiResult<Vec<PipelineStatus>>;

    /// Move an opportunity to another pipeline status
    async fn move_opportunity(&self, opportunity_id: u32, new_status_id: u32) -> ApiResult<Opportunity>;
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl ApiClient {
    pub fn new(session: &SessionContext) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: session.api_base_url.clone(),
            auth_token: session.auth_token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.url(path);
        tracing::debug!("[API] GET {}", url);
        let response = self.authorize(self.http.get(&url)).send().await?;
        decode(response).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ApiResult<T> {
        let url = self.url(path);
        tracing::debug!("[API] PATCH {}", url);
        let response = self.authorize(self.http.patch(&url)).json(body).send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    if !status.is_success() {
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!("[API] HTTP {} from {}", status.as_u16(), url);
        return Err(ApiError::from_status(status.as_u16(), body));
    }
    response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
}

