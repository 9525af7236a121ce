//! HTTP definition source for dictionaryapi.dev-shaped endpoints.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use tracing::instrument;

use wordstash_core::error::FetchError;
use wordstash_core::traits::DefinitionSource;

pub const DEFAULT_BASE_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Fetches `GET {base_url}/{word}`. One request per call, no retries.
///
/// The word is appended as a single percent-encoded path segment.
pub struct DictionaryApiSource {
    base_url: String,
    endpoint: Url,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl DictionaryApiSource {
    pub fn new(base_url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let base = if base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            base_url
        };

        let base = base.trim_end_matches('/');
        let endpoint =
            Url::parse(base).with_context(|| format!("invalid dictionary URL: {base}"))?;
        anyhow::ensure!(
            !endpoint.cannot_be_a_base(),
            "invalid dictionary URL: {base}"
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base.to_string(),
            endpoint,
            timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn word_url(&self, word: &str) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(word);
        }
        url
    }

    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            FetchError::NetworkUnavailable(format!(
                "dictionary not reachable at {}",
                self.base_url
            ))
        } else {
            FetchError::NetworkUnavailable(e.to_string())
        }
    }
}

#[async_trait]
impl DefinitionSource for DictionaryApiSource {
    fn name(&self) -> &str {
        "dictionaryapi"
    }

    #[instrument(skip(self))]
    async fn fetch(&self, word: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(self.word_url(word))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(word.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::NetworkUnavailable(format!(
                "dictionary returned HTTP {}",
                status.as_u16()
            )));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        tracing::debug!(bytes = body.len(), "fetched definition");
        Ok(body)
    }
}
