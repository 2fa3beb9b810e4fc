//! Google Cloud Speech-to-Text `speech:recognize` client.
//!
//! Sends the whole upload inline (base64) in a single synchronous
//! recognition request. No retries; the language code is the only hint.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use solace_core::config::SpeechConfig;

use crate::{AudioUpload, SpeechError, TranscriptionService};

/// Hosted speech recognition client.
pub struct GoogleSpeechClient {
    client: Client,
    api_key: String,
    endpoint: String,
    language_code: String,
}

impl GoogleSpeechClient {
    /// Build a client from the `[speech]` config section.
    pub fn new(api_key: impl Into<String>, config: &SpeechConfig) -> Result<Self, SpeechError> {
        Self::with_timeout(
            api_key,
            &config.base_url,
            &config.language_code,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn with_timeout(
        api_key: impl Into<String>,
        base_url: &str,
        language_code: &str,
        timeout: Duration,
    ) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SpeechError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: format!("{}/speech:recognize", base_url.trim_end_matches('/')),
            language_code: language_code.to_string(),
        })
    }

    fn build_request<'a>(&'a self, audio: &AudioUpload) -> RecognizeRequest<'a> {
        RecognizeRequest {
            config: RecognitionConfig {
                language_code: &self.language_code,
            },
            audio: RecognitionAudio {
                content: BASE64.encode(&audio.bytes),
            },
        }
    }

    /// Join the top alternative of every result.
    fn extract_transcript(resp: RecognizeResponse) -> Result<String, SpeechError> {
        let transcript = resp
            .results
            .into_iter()
            .filter_map(|r| r.alternatives.into_iter().next())
            .map(|alt| alt.transcript.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if transcript.is_empty() {
            Err(SpeechError::Unintelligible)
        } else {
            Ok(transcript)
        }
    }
}

#[async_trait]
impl TranscriptionService for GoogleSpeechClient {
    async fn transcribe(&self, audio: &AudioUpload) -> Result<String, SpeechError> {
        if audio.bytes.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }

        tracing::debug!(
            bytes = audio.bytes.len(),
            file_name = audio.file_name.as_deref().unwrap_or("-"),
            "Sending recognize request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&self.build_request(audio))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SpeechError::Provider(format!("Request timeout: {}", e))
                } else {
                    SpeechError::Provider(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SpeechError::Provider(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|r| r.error.message)
                .unwrap_or(body);
            tracing::warn!(status = %status, error = %message, "Speech recognition failed");
            return Err(SpeechError::Provider(format!("HTTP {}: {}", status.as_u16(), message)));
        }

        let parsed: RecognizeResponse = serde_json::from_str(&body)
            .map_err(|e| SpeechError::Provider(format!("Failed to parse response: {}", e)))?;

        Self::extract_transcript(parsed)
    }
}

// Speech API types

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    language_code: &'a str,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<RecognitionAlternative>,
}

#[derive(Debug, Deserialize)]
struct RecognitionAlternative {
    #[serde(default)]
    transcript: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}
