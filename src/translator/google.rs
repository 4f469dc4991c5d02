//! Remote translation over the public `translate_a/single` endpoint.

use super::Translate;
use anyhow::{Context, Result, anyhow, bail};
use reqwest::Url;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct GoogleTranslate {
    client: Client,
    endpoint: String,
    source_language: String,
    target_language: String,
}

impl GoogleTranslate {
    pub fn new(
        endpoint: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Building translation HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        })
    }

    pub fn request_url(&self, text: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("client", "gtx"),
                ("sl", self.source_language.as_str()),
                ("tl", self.target_language.as_str()),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .with_context(|| format!("Invalid translation endpoint `{}`", self.endpoint))
    }
}

impl Translate for GoogleTranslate {
    fn translate(&self, text: &str) -> Result<String> {
        let url = self.request_url(text)?;
        debug!(chars = text.len(), target = %self.target_language, "Requesting translation");
        let response = self
            .client
            .get(url)
            .send()
            .context("Sending translation request")?;
        let status = response.status();
        if !status.is_success() {
            bail!("Translation endpoint returned {status}");
        }
        let body = response.text().context("Reading translation response")?;
        parse_response(&body)
    }
}

/// Join the translated fragment of every segment in `data[0]`.
pub fn parse_response(body: &str) -> Result<String> {
    let data: Value = serde_json::from_str(body).context("Parsing translation response")?;
    let segments = data
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("Translation response has no segment list"))?;

    Ok(segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect())
}
