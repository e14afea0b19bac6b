//! Client for the external AI service.
//!
//! All three endpoints are pure pass-throughs: the request body is relayed
//! upstream and the upstream JSON is relayed back. Failures surface as
//! `ApiError::Upstream` and are never retried here.

use crate::error::{ApiError, ApiResult};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Request for a title recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitlePrompt {
    pub text: String,
    pub target: String,
}

/// Title recommendation with a sentiment rating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleSuggestion {
    pub title: String,
    pub rating: i64,
}

/// Request for a content rewrite recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextPrompt {
    pub text: String,
    pub target: String,
    pub instruction: String,
}

/// Rewritten content suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextSuggestion {
    pub processed_content: String,
}

/// Transcription of an uploaded audio file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    pub result: String,
}

/// HTTP client for the AI service.
#[derive(Clone)]
pub struct AiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AiClient {
    /// Create a client for the given base URL.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Internal(format!("invalid AI service URL: {e}")))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    fn url(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Internal(format!("failed to build AI service URL: {e}")))
    }

    async fn send_json<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> ApiResult<T> {
        let response = req
            .send()
            .await
            .map_err(|e| ApiError::Upstream(format!("AI service unreachable: {e}")))?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ApiError::Upstream(format!("AI service returned {status}")));
        }
        serde_json::from_str(&body)
            .map_err(|e| ApiError::Upstream(format!("malformed AI service response: {e}")))
    }

    /// Ask the AI service for a title suggestion.
    pub async fn recommend_title(&self, prompt: &TitlePrompt) -> ApiResult<TitleSuggestion> {
        let url = self.url("/get-info")?;
        self.send_json(self.http.post(url).json(prompt)).await
    }

    /// Ask the AI service to rewrite letter content.
    pub async fn recommend_text(&self, prompt: &TextPrompt) -> ApiResult<TextSuggestion> {
        let url = self.url("/process-content")?;
        self.send_json(self.http.post(url).json(prompt)).await
    }

    /// Send an audio payload for transcription.
    pub async fn transcribe(&self, file_name: &str, data: Vec<u8>) -> ApiResult<Transcription> {
        let url = self.url("/transcribe-audio")?;

        let part = reqwest::multipart::Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str("audio/x-m4a")
            .map_err(|e| ApiError::Internal(format!("failed to build audio part: {e}")))?;
        let form = reqwest::multipart::Form::new().part("audio_file", part);

        self.send_json(self.http.post(url).multipart(form)).await
    }
}
