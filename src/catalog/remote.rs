//! Supabase implementation of [`CatalogBackend`].
//!
//! Talks to the REST table endpoint for listing and to the edge functions for
//! search, filter vocabulary and signed-URL exchange. Every backend request
//! carries the key both as `apikey` and as a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;

use super::types::{FilterOptions, Slide, SlideId, SlideUrl};
use super::CatalogBackend;
use crate::config::BackendConfig;
use crate::error::CatalogError;
use crate::taskpane::filters::FilterState;

pub struct SupabaseClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl SupabaseClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let base_url = base_url.strip_suffix('/').unwrap_or(base_url).to_string();
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key: api_key.to_string(),
            http,
        })
    }

    /// Client authenticated with the public key, as used by the task pane.
    pub fn from_config(config: &BackendConfig) -> Result<Self, CatalogError> {
        Self::new(&config.url, &config.anon_key, config.request_timeout())
    }

    /// Client authenticated with the service-role key, for maintenance jobs.
    pub fn service_from_config(config: &BackendConfig) -> Result<Self, CatalogError> {
        Self::new(&config.url, &config.service_key, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "backend request");

        self.http
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum WebResponse<T> {
    Error { error: String },
    Data(T),
}

#[derive(Serialize, Debug)]
struct SearchBody<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    template_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    section_name: Option<&'a str>,
}

/// Decode a backend response, turning `{ "error": ... }` bodies and non-2xx
/// statuses into [`CatalogError::Backend`].
pub(crate) async fn handle_response<T>(response: reqwest::Response) -> Result<T, CatalogError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    let text = response.text().await?;

    match serde_json::from_str::<WebResponse<T>>(&text) {
        Ok(WebResponse::Error { error }) => Err(CatalogError::Backend {
            status: status.as_u16(),
            message: error,
        }),
        Ok(WebResponse::Data(data)) if status.is_success() => Ok(data),
        Ok(WebResponse::Data(_)) => Err(CatalogError::Backend {
            status: status.as_u16(),
            message: text,
        }),
        Err(_) if !status.is_success() => Err(CatalogError::Backend {
            status: status.as_u16(),
            message: text,
        }),
        Err(err) => {
            // the untagged envelope hides the field-level cause
            let err = serde_json::from_str::<T>(&text).err().unwrap_or(err);
            tracing::error!(%err, body = %text, "failed to parse backend response");
            Err(CatalogError::Backend {
                status: status.as_u16(),
                message: format!("malformed response: {err}"),
            })
        }
    }
}

/// Like [`handle_response`] for endpoints that answer with an empty body.
pub(crate) async fn expect_success(response: reqwest::Response) -> Result<(), CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let text = response.text().await?;
    let message = match serde_json::from_str::<WebResponse<serde_json::Value>>(&text) {
        Ok(WebResponse::Error { error }) => error,
        _ => text,
    };

    Err(CatalogError::Backend {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl CatalogBackend for SupabaseClient {
    async fn list_slides(&self) -> Result<Vec<Slide>, CatalogError> {
        let resp = self
            .request(Method::GET, "/rest/v1/slides?select=*")
            .send()
            .await?;

        handle_response(resp).await
    }

    async fn list_filter_options(&self) -> Result<FilterOptions, CatalogError> {
        let resp = self
            .request(Method::POST, "/functions/v1/get-filter-options")
            .json(&json!({}))
            .send()
            .await?;

        handle_response(resp).await
    }

    async fn search(&self, query: &str, filters: &FilterState) -> Result<Vec<Slide>, CatalogError> {
        tracing::debug!(query, ?filters, "search");
        let body = SearchBody {
            query,
            template_type: filters.template_type.as_deref(),
            section_name: filters.section_name.as_deref(),
        };

        let resp = self
            .request(Method::POST, "/functions/v1/search-slides")
            .json(&body)
            .send()
            .await?;

        handle_response(resp).await
    }

    async fn get_insertable_url(&self, id: &SlideId) -> Result<SlideUrl, CatalogError> {
        let resp = self
            .request(Method::POST, "/functions/v1/get-slide-url")
            .json(&json!({ "slideId": id }))
            .send()
            .await?;

        match handle_response(resp).await {
            Err(CatalogError::Backend { status: 404, .. }) => {
                Err(CatalogError::NotFound(id.to_string()))
            }
            other => other,
        }
    }

    async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        // signed and public asset URLs are self-authorizing
        let resp = self.http.get(url).send().await?;
        let status = resp.status();

        if !status.is_success() {
            return Err(CatalogError::Backend {
                status: status.as_u16(),
                message: format!("asset download failed for {url}"),
            });
        }

        Ok(resp.bytes().await?.to_vec())
    }
}
