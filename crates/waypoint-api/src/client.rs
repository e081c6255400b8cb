//! Client-side fetch executor speaking the list endpoint contract.

use async_trait::async_trait;
use serde_json::Value;
use url::Url;
use waypoint_core::models::VerificationAction;
use waypoint_core::ports::{ListFetcher, MutationBackend};
use waypoint_core::{Error, ListEnvelope, QueryKey, Result};

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Network("request timed out".to_string())
    } else {
        Error::Network(err.to_string())
    }
}

/// Stateless fetch executor: `GET /api/<resource>?<filters>&page=<n>&limit=<m>`.
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpFetcher {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn list_url(&self, key: &QueryKey, limit: u32) -> Result<Url> {
        let mut url = self
            .base_url
            .join(&format!("api/{}", key.resource()))
            .map_err(|e| Error::Validation(e.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in key.filters() {
                pairs.append_pair(name, value);
            }
            pairs.append_pair("page", &key.page().to_string());
            pairs.append_pair("limit", &limit.to_string());
        }
        Ok(url)
    }
}

#[async_trait]
impl ListFetcher for HttpFetcher {
    async fn fetch_page(&self, key: &QueryKey, limit: u32) -> Result<ListEnvelope> {
        let url = self.list_url(key, limit)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::UnknownResource(key.resource().to_string()));
        }
        if !status.is_success() {
            return Err(Error::Network(format!(
                "list fetch for {key} returned {status}"
            )));
        }

        let body: Value = response.json().await.map_err(transport_error)?;
        ListEnvelope::from_value(body)
    }
}

/// Client-side mutation executor: `POST /api/verifications/<id>/<action>`.
pub struct HttpMutationBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpMutationBackend {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl MutationBackend for HttpMutationBackend {
    async fn verification_action(&self, id: &str, action: VerificationAction) -> Result<Value> {
        let url = self
            .base_url
            .join(&format!("api/verifications/{id}/{}", action.as_str()))
            .map_err(|e| Error::Validation(e.to_string()))?;

        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                resource: "verifications".to_string(),
                id: id.to_string(),
            });
        }
        if !status.is_success() {
            return Err(Error::MutationRejected(format!(
                "{} on verification {id} returned {status}",
                action.as_str()
            )));
        }

        response.json().await.map_err(transport_error)
    }
}
