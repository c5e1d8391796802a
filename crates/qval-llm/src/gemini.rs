//! Gemini `generateContent` adapter.

use std::time::Duration;

use async_trait::async_trait;
use qval_types::{AssetParams, ValuationResult};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};

use crate::errors::ClientError;
use crate::parse::{extract_payload_text, parse_valuation};
use crate::prompt::{SYSTEM_INSTRUCTION, build_prompt, valuation_schema};
use crate::provider::ValuationClient;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }

    /// Reads the credential and optional overrides from the environment.
    /// `API_KEY` is accepted as a fallback name for the credential.
    pub fn from_env() -> Result<Self, ClientError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| {
                ClientError::Configuration("GEMINI_API_KEY is not set".to_string())
            })?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("QVAL_GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model) = std::env::var("QVAL_GEMINI_MODEL") {
            config.model = model;
        }
        Ok(config)
    }
}

#[derive(Clone)]
pub struct GeminiValuationClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl std::fmt::Debug for GeminiValuationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiValuationClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish()
    }
}

impl GeminiValuationClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&config.api_key).map_err(|error| {
                ClientError::Configuration(format!("invalid API key header: {error}"))
            })?,
        );
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|error| ClientError::Network(error.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(GeminiConfig::from_env()?)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request_body(params: &AssetParams) -> Value {
        json!({
            "contents": [
                { "parts": [ { "text": build_prompt(params) } ] }
            ],
            "systemInstruction": {
                "parts": [ { "text": SYSTEM_INSTRUCTION } ]
            },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": valuation_schema()
            }
        })
    }
}

#[async_trait]
impl ValuationClient for GeminiValuationClient {
    async fn generate(&self, params: &AssetParams) -> Result<ValuationResult, ClientError> {
        let body = Self::request_body(params);
        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    ClientError::Timeout
                } else {
                    ClientError::Network(error.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            tracing::debug!(status, "gemini returned non-success status");
            return Err(ClientError::Provider { status, message });
        }

        let raw = response
            .json::<Value>()
            .await
            .map_err(|error| ClientError::Network(error.to_string()))?;
        let text = extract_payload_text(&raw)?;
        parse_valuation(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qval_types::{AssetType, Region};

    fn params() -> AssetParams {
        AssetParams {
            name: "Madinah Water Utility".to_string(),
            asset_type: AssetType::Infrastructure,
            region: Region::Mena,
            initial_value: 80_000_000.0,
            currency: "SAR".to_string(),
            tenure_years: 7,
            description: "Regulated water distribution concession".to_string(),
        }
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let mut config = GeminiConfig::new("k");
        config.base_url = "http://127.0.0.1:9000/v1beta/".to_string();
        let client = GeminiValuationClient::new(config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://127.0.0.1:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn request_body_declares_schema_and_persona() {
        let body = GeminiValuationClient::request_body(&params());
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert!(body["generationConfig"]["responseSchema"]["required"].is_array());
        let system = body["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
        assert!(system.contains("Q-Val"));
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("Madinah Water Utility"));
    }

    #[test]
    fn invalid_header_value_is_configuration_error() {
        let err = GeminiValuationClient::new(GeminiConfig::new("bad\nkey")).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }
}
