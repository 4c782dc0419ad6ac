//src/gateway.rs
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to reach the text generation service: {0}")]
    Http(#[from] reqwest::Error),
    // Display carries the service's own message so callers can classify it
    #[error("Text generation service returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Failed to decode text generation response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Text generation response contained no text")]
    EmptyResponse,
}

/// Anything that can turn a prompt into generated text.
pub trait TextGenerator: Send + Sync {
    /// # Errors
    /// Returns an error if the service is unreachable, rejects the request,
    /// or answers without any text.
    fn generate(&self, prompt: &str) -> Result<String, Error>;
}

#[derive(Serialize, Debug)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize, Debug)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize, Debug)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    message: String,
}

/// Extracts the generated text from a `generateContent` response body.
/// Text parts of the first candidate are concatenated.
/// # Errors
/// - `Error::Decode` if the body is not a valid response document.
/// - `Error::EmptyResponse` if no text part is present.
pub fn parse_generate_response(body: &str) -> Result<String, Error> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        Err(Error::EmptyResponse)
    } else {
        Ok(text)
    }
}

/// Pulls `error.message` out of an error body, falling back to the raw body.
pub fn parse_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Gemini `generateContent` over HTTPS.
pub struct GeminiClient {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// # Errors
    /// Returns `Error::Http` if the HTTP client cannot be constructed.
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, Error> {
        let url = self.endpoint();
        info!("Requesting generated text from {} ({} prompt chars)", url, prompt.len());

        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            let message = parse_error_message(&body);
            error!("Text generation failed with status {}: {}", status, message);
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Received {} bytes of generated content", body.len());
        parse_generate_response(&body)
    }
}
