//! Transcription backend trait and remote callable implementation.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use scrappr_core::defaults::{ENV_TRANSCRIBE_ID_TOKEN, ENV_TRANSCRIBE_URL, TRANSCRIBE_TIMEOUT_SECS};
use scrappr_core::{Error, Result};

/// Backend for turning a recorded audio clip into text.
#[async_trait]
pub trait TranscriptionBackend: Send + Sync {
    /// Transcribe encoded audio bytes. Invoked exactly once per completed
    /// recording session; failures are surfaced, never retried.
    async fn transcribe(&self, audio: &[u8]) -> Result<String>;
}

/// Client for the remote transcription callable.
///
/// Encodes the clip as base64 and posts it to the callable endpoint once
/// per call. The remote procedure owns the execution time and payload
/// ceiling; this client mirrors its declared timeout and imposes no size
/// guard of its own.
pub struct CallableBackend {
    url: String,
    id_token: Option<String>,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl CallableBackend {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            id_token: None,
            client: reqwest::Client::new(),
            timeout_secs: TRANSCRIBE_TIMEOUT_SECS,
        }
    }

    /// Attach the caller's identity token, sent as a bearer credential.
    pub fn with_id_token(mut self, token: impl Into<String>) -> Self {
        self.id_token = Some(token.into());
        self
    }

    /// Create from environment variables.
    /// Returns None if SCRAPPR_TRANSCRIBE_URL is not set or empty.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var(ENV_TRANSCRIBE_URL).ok()?;
        if url.is_empty() {
            return None;
        }
        let mut backend = Self::new(url);
        if let Ok(token) = std::env::var(ENV_TRANSCRIBE_ID_TOKEN) {
            if !token.is_empty() {
                backend = backend.with_id_token(token);
            }
        }
        Some(backend)
    }
}

#[derive(Serialize)]
struct CallableRequest<'a> {
    data: AudioPayload<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioPayload<'a> {
    audio_base64: &'a str,
}

/// Callable wire response: exactly one of `result` or `error` is present.
#[derive(Deserialize)]
struct CallableResponse {
    #[serde(default)]
    result: Option<CallableResult>,
    #[serde(default)]
    error: Option<CallableError>,
}

#[derive(Deserialize)]
struct CallableResult {
    text: String,
}

#[derive(Deserialize)]
struct CallableError {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

impl CallableError {
    fn into_error(self) -> Error {
        let message = self.message.unwrap_or_else(|| self.status.clone());
        match self.status.as_str() {
            "UNAUTHENTICATED" => Error::Unauthenticated(message),
            "INVALID_ARGUMENT" => Error::InvalidArgument(message),
            _ => Error::Internal(message),
        }
    }
}

#[async_trait]
impl TranscriptionBackend for CallableBackend {
    async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        let audio_base64 = BASE64.encode(audio);
        tracing::debug!(clip_bytes = audio.len(), "invoking transcription callable");

        let mut request = self
            .client
            .post(&self.url)
            .json(&CallableRequest {
                data: AudioPayload {
                    audio_base64: &audio_base64,
                },
            })
            .timeout(std::time::Duration::from_secs(self.timeout_secs));

        if let Some(token) = &self.id_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Internal(format!("Transcription request failed: {}", e)))?;

        let body: CallableResponse = response
            .json()
            .await
            .map_err(|e| Error::Internal(format!("Failed to parse callable response: {}", e)))?;

        if let Some(err) = body.error {
            return Err(err.into_error());
        }

        body.result
            .map(|r| r.text)
            .ok_or_else(|| Error::Internal("Callable response missing result".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_transcribe_success() {
        let server = MockServer::start().await;
        let expected_b64 = BASE64.encode(b"audio-bytes");
        Mock::given(method("POST"))
            .and(path("/transcribe"))
            .and(body_partial_json(
                json!({ "data": { "audioBase64": expected_b64 } }),
            ))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "result": { "text": "hello" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let backend = CallableBackend::new(format!("{}/transcribe", server.uri()));
        let text = backend.transcribe(b"audio-bytes").await.unwrap();
        assert_eq!(text, "hello");
    }

    #[tokio::test]
    async fn test_transcribe_unauthenticated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "status": "UNAUTHENTICATED", "message": "must be signed in" }
            })))
            .mount(&server)
            .await;

        let backend = CallableBackend::new(server.uri());
        let err = backend.transcribe(b"audio").await.unwrap_err();
        assert!(matches!(err, Error::Unauthenticated(_)));
        assert!(err.to_string().contains("must be signed in"));
    }

    #[tokio::test]
    async fn test_transcribe_invalid_argument_for_empty_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "status": "INVALID_ARGUMENT", "message": "Missing audio data." }
            })))
            .mount(&server)
            .await;

        let backend = CallableBackend::new(server.uri());
        let err = backend.transcribe(b"").await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_transcribe_internal_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": { "status": "INTERNAL", "message": "Transcription failed" }
            })))
            .mount(&server)
            .await;

        let backend = CallableBackend::new(server.uri());
        let err = backend.transcribe(b"audio").await.unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[tokio::test]
    async fn test_transcribe_error_without_message_uses_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": { "status": "RESOURCE_EXHAUSTED" }
            })))
            .mount(&server)
            .await;

        let backend = CallableBackend::new(server.uri());
        let err = backend.transcribe(b"audio").await.unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
        assert!(err.to_string().contains("RESOURCE_EXHAUSTED"));
    }

    #[tokio::test]
    async fn test_transcribe_malformed_response_is_internal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let backend = CallableBackend::new(server.uri());
        let err = backend.transcribe(b"audio").await.unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[tokio::test]
    async fn test_transcribe_empty_body_missing_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let backend = CallableBackend::new(server.uri());
        let err = backend.transcribe(b"audio").await.unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[tokio::test]
    async fn test_id_token_sent_as_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(wiremock::matchers::header(
                "authorization",
                "Bearer token-123",
            ))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "result": { "text": "ok" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let backend = CallableBackend::new(server.uri()).with_id_token("token-123");
        assert_eq!(backend.transcribe(b"audio").await.unwrap(), "ok");
    }
}
