//! Quiz generation through a hosted multimodal model.
//!
//! [`GeminiClient`] posts the prompt (and optional images) to the
//! `generateContent` endpoint and hands the candidate text to
//! [`parse_questions`].

use std::future::Future;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use super::prompt::{build_prompt, PromptOptions};
use super::question::{parse_questions, Question};
use crate::error::{ModelError, Result};
use crate::storage::ModelConfig;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Everything needed for one generation call.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub options: PromptOptions,
    /// Study material as text. May be empty when `images` carry the content.
    pub source: String,
    pub images: Vec<PathBuf>,
    /// Recently missed questions to target.
    pub weak_spots: Vec<Question>,
}

/// Source of freshly generated questions.
pub trait QuizGenerator {
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<Vec<Question>>> + Send;
}

pub struct GeminiClient {
    http: Client,
    url: Url,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Part {
    Text(String),
    InlineData(Blob),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: &'static str,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
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
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiClient {
    /// Build a client from configuration, falling back to `GEMINI_API_KEY`
    /// when no key is configured.
    ///
    /// # Errors
    /// Returns [`ModelError::MissingApiKey`] if neither source has a key, or
    /// [`ModelError::InvalidEndpoint`] if the endpoint is not a URL.
    pub fn from_config(config: &ModelConfig) -> Result<Self, ModelError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or(ModelError::MissingApiKey)?;
        Self::with_api_key(&config.endpoint, &config.name, &api_key)
    }

    pub fn with_api_key(endpoint: &str, model: &str, api_key: &str) -> Result<Self, ModelError> {
        let raw = format!(
            "{}/v1beta/models/{}:generateContent",
            endpoint.trim_end_matches('/'),
            model
        );
        let url = Url::parse(&raw).map_err(|e| ModelError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            http: Client::new(),
            url,
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send the prompt and return the raw candidate text.
    async fn generate_text(&self, request: &GenerationRequest) -> Result<String, ModelError> {
        let prompt = build_prompt(&request.options, &request.source, &request.weak_spots);

        let mut parts = vec![Part::Text(prompt)];
        for path in &request.images {
            parts.push(Part::InlineData(load_image(path)?));
        }

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        info!(
            model = %self.model,
            questions = request.options.question_count,
            images = request.images.len(),
            "requesting quiz generation"
        );

        let resp = self
            .http
            .post(self.url.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = resp.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ModelError::EmptyResponse);
        }
        debug!(len = text.len(), "received candidate text");
        Ok(text)
    }
}

impl QuizGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<Question>> {
        let text = self.generate_text(request).await?;
        Ok(parse_questions(&text)?)
    }
}

fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

fn load_image(path: &Path) -> Result<Blob, ModelError> {
    let mime_type = mime_type_for(path).ok_or_else(|| ModelError::UnsupportedImage {
        path: path.to_path_buf(),
    })?;
    let bytes = std::fs::read(path).map_err(|source| ModelError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Blob {
        mime_type,
        data: base64::engine::general_purpose::STANDARD.encode(bytes),
    })
}
