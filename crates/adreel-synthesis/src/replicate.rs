//! Replicate-style prediction client.
//!
//! A prediction is created for a model, then polled until it reaches a
//! terminal status. There is no automatic retry: a transient failure
//! surfaces to the caller and requires a fresh run.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::SynthesisConfig;
use crate::error::{SynthesisError, SynthesisResult};

/// Client for the prediction API backing the video providers.
pub struct ReplicateClient {
    http: Client,
    token: String,
    base_url: String,
    poll_interval: Duration,
    generation_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    id: String,
    status: String,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

impl Prediction {
    fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "succeeded" | "failed" | "canceled")
    }
}

impl ReplicateClient {
    /// Create a new client.
    pub fn new(config: &SynthesisConfig) -> SynthesisResult<Self> {
        if config.replicate_api_token.is_empty() {
            return Err(SynthesisError::MissingCredentials(
                "REPLICATE_API_TOKEN not set".to_string(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            http,
            token: config.replicate_api_token.clone(),
            base_url: config.replicate_base_url.trim_end_matches('/').to_string(),
            poll_interval: config.poll_interval,
            generation_timeout: config.generation_timeout,
        })
    }

    /// Run a model to completion and return its output.
    pub async fn run(&self, model: &str, input: Value) -> SynthesisResult<Value> {
        let url = format!("{}/v1/models/{}/predictions", self.base_url, model);
        debug!(model, "Creating prediction");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "input": input }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::request_failed(format!(
                "Prediction create returned {status}: {body}"
            )));
        }

        let mut prediction: Prediction = response.json().await?;
        let started = std::time::Instant::now();

        while !prediction.is_terminal() {
            if started.elapsed() > self.generation_timeout {
                return Err(SynthesisError::Timeout(self.generation_timeout.as_secs()));
            }
            tokio::time::sleep(self.poll_interval).await;
            prediction = self.fetch(&prediction.id).await?;
        }

        match prediction.status.as_str() {
            "succeeded" => {
                info!(id = %prediction.id, "Prediction succeeded");
                prediction.output.ok_or_else(|| {
                    SynthesisError::UnexpectedResponse(
                        "Prediction succeeded without output".to_string(),
                    )
                })
            }
            status => {
                let detail = prediction
                    .error
                    .as_ref()
                    .map(Value::to_string)
                    .unwrap_or_else(|| "no error detail".to_string());
                Err(SynthesisError::request_failed(format!(
                    "Prediction {status}: {detail}"
                )))
            }
        }
    }

    async fn fetch(&self, id: &str) -> SynthesisResult<Prediction> {
        let url = format!("{}/v1/predictions/{}", self.base_url, id);

        let response = self.http.get(&url).bearer_auth(&self.token).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::request_failed(format!(
                "Prediction fetch returned {status}: {body}"
            )));
        }

        Ok(response.json().await?)
    }
}
