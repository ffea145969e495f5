use std::{future::Future, time::Duration};

use reqwest::{Url, header::CONTENT_TYPE};
use tracing::trace;

use crate::error::TransportError;

/// HTTP transport used by the matrix client.
///
/// Implementations return the raw body of successful responses, decoding is
/// left to the caller. Calls must be safe to issue concurrently from
/// independent requests.
pub trait MatrixTransport: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;

    fn post_json(
        &self,
        url: &str,
        json_body: &str,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;
}

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn read_body(response: reqwest::Response) -> Result<Vec<u8>, TransportError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.bytes().await?.to_vec())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(TransportError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

impl MatrixTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        trace!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Self::read_body(response).await
    }

    async fn post_json(&self, url: &str, json_body: &str) -> Result<Vec<u8>, TransportError> {
        trace!("POST {}", url);
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(json_body.to_owned())
            .send()
            .await?;
        Self::read_body(response).await
    }
}

/// Sets the API key as the `key` query parameter, replacing any key the URL
/// already carries.
pub(crate) fn with_key(url: &str, api_key: &str) -> Result<String, TransportError> {
    if api_key.is_empty() {
        return Ok(url.to_owned());
    }

    let mut parsed = Url::parse(url).map_err(|error| TransportError::InvalidUrl {
        url: url.to_owned(),
        message: error.to_string(),
    })?;

    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(name, _)| name != "key")
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    parsed
        .query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("key", api_key);

    Ok(parsed.into())
}
