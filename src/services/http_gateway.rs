//! HTTP implementation of the gateways.
//!
//! Speaks the reqres-style REST API:
//! - `GET  /api/users?page=N` returns `{"page", "total_pages", "data": [...]}`
//! - `PUT  /api/users/{id}` takes the editable fields
//! - `DELETE /api/users/{id}`
//! - `POST /api/login` exchanges `{"email", "password"}` for `{"token"}`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{Page, Record, RecordId, RecordPatch};
use crate::error::{Error, Result};
use crate::services::gateway::{AuthGateway, GatewayError, GatewayResult, RecordGateway};
use crate::services::session::TokenSource;

/// Header carrying the optional API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Wire shape of a page of users.
#[derive(Debug, Deserialize)]
struct UsersEnvelope {
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    data: Vec<Record>,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// Connection settings for [`HttpRecordGateway`].
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    /// Sent as `x-api-key` when present.
    pub api_key: Option<String>,
    /// Per-request timeout. No timeout when `None`.
    pub timeout: Option<Duration>,
}

/// Gateway over the remote REST API.
#[derive(Clone)]
pub struct HttpRecordGateway {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    tokens: Arc<dyn TokenSource>,
}

impl std::fmt::Debug for HttpRecordGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRecordGateway")
            .field("base_url", &self.base_url.as_str())
            .field("has_api_key", &self.api_key.is_some())
            .field("has_token", &self.tokens.bearer_token().is_some())
            .finish()
    }
}

impl HttpRecordGateway {
    /// Creates a gateway rooted at `base_url`.
    pub fn new(base_url: &str, tokens: Arc<dyn TokenSource>, options: HttpOptions) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        // Keep any path prefix when joining endpoints onto it.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(Error::Http)?;

        tracing::info!("Using remote collection at {}", base_url);

        Ok(Self {
            client,
            base_url,
            api_key: options.api_key,
            tokens,
        })
    }

    fn endpoint(&self, path: &str) -> GatewayResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| GatewayError::Network(format!("invalid endpoint {}: {}", path, e)))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut request = self.client.request(method, url);
        if let Some(token) = self.tokens.bearer_token() {
            request = request.bearer_auth(token);
        }
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        request
    }

    async fn send(&self, request: RequestBuilder) -> GatewayResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), url = %response.url(), "Request rejected");
            return Err(GatewayError::from_status(status.as_u16()));
        }
        Ok(response)
    }

    async fn body(response: Response) -> GatewayResult<String> {
        response
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))
    }
}

/// Decodes a page of users.
pub(crate) fn decode_page(body: &str) -> GatewayResult<Page> {
    let envelope: UsersEnvelope =
        serde_json::from_str(body).map_err(|e| GatewayError::Decode(e.to_string()))?;
    Ok(Page {
        items: envelope.data,
        total_pages: envelope.total_pages,
    })
}

/// Decodes a login response.
pub(crate) fn decode_token(body: &str) -> GatewayResult<String> {
    let response: LoginResponse =
        serde_json::from_str(body).map_err(|e| GatewayError::Decode(e.to_string()))?;
    Ok(response.token)
}

#[async_trait]
impl RecordGateway for HttpRecordGateway {
    async fn fetch_page(&self, page: u32) -> GatewayResult<Page> {
        let mut url = self.endpoint("api/users")?;
        url.query_pairs_mut().append_pair("page", &page.to_string());

        let response = self.send(self.request(Method::GET, url)).await?;
        decode_page(&Self::body(response).await?)
    }

    async fn update_record(&self, id: RecordId, patch: RecordPatch) -> GatewayResult<()> {
        let url = self.endpoint(&format!("api/users/{}", id))?;
        self.send(self.request(Method::PUT, url).json(&patch)).await?;
        Ok(())
    }

    async fn delete_record(&self, id: RecordId) -> GatewayResult<()> {
        let url = self.endpoint(&format!("api/users/{}", id))?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for HttpRecordGateway {
    async fn login(&self, email: &str, password: &str) -> GatewayResult<String> {
        let url = self.endpoint("api/login")?;
        let request = self
            .request(Method::POST, url)
            .json(&LoginRequest { email, password });

        let response = self.send(request).await?;
        decode_token(&Self::body(response).await?)
    }
}
