use log::{debug, info};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error, PartialEq)]
pub enum FetchError {
    #[error("Gemini API key is not set. Set GEMINI_API_KEY or api_key in the config file")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("unexpected response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    /// The model is unknown or cannot serve `generateContent`.
    fn suggests_fallback(&self) -> bool {
        match self {
            FetchError::Api { message, .. } => {
                let message = message.to_lowercase();
                message.contains("not found") || message.contains("not support")
            }
            _ => false,
        }
    }
}

/// Turns a prompt into generated text.
pub trait ResponseFetcher {
    fn fetch(&self, request: &str) -> Result<String, FetchError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Fetches responses from the Gemini `generateContent` endpoint.
pub struct GeminiFetcher {
    client: Client,
    base_url: String,
    api_version: String,
    model: String,
    fallback_model: Option<String>,
    api_key: Option<String>,
}

impl GeminiFetcher {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            model: config.model.clone(),
            fallback_model: config.fallback_model.clone(),
            api_key: config.usable_api_key().map(str::to_string),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url, self.api_version, model
        )
    }

    fn generate(&self, model: &str, api_key: &str, request: &str) -> Result<String, FetchError> {
        let url = self.endpoint(model);
        debug!("POST {}", url);

        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: request }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .ok()
                .and_then(|body| body.error)
                .and_then(|detail| detail.message)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            debug!("{} answered {}: {}", model, status, message);
            return Err(FetchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let data: GenerateResponse = response
            .json()
            .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;

        data.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| FetchError::MalformedResponse("no candidate text".to_string()))
    }
}

impl ResponseFetcher for GeminiFetcher {
    fn fetch(&self, request: &str) -> Result<String, FetchError> {
        let api_key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;

        match self.generate(&self.model, api_key, request) {
            Err(err) if err.suggests_fallback() => match &self.fallback_model {
                Some(fallback) => {
                    info!("{}: {}; retrying with {}", self.model, err, fallback);
                    self.generate(fallback, api_key, request).map_err(|_| err)
                }
                None => Err(err),
            },
            result => result,
        }
    }
}
