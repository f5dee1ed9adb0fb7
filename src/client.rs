//! Image generation over the Google `generateContent` API.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ureq::Agent;
use url::Url;

use crate::constants::{MAX_RESPONSE_BYTES, RESPONSE_SNAPSHOT_CHARS};
use crate::error::ImageError;

/// Something that turns a prompt into image bytes.
pub trait ImageGenerator {
    /// Makes one attempt, no retries.
    fn generate(&self, prompt: &str) -> Result<Vec<u8>, ImageError>;
}

/// Request body for POST /{model}:generateContent
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize, Debug)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize, Debug)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: [&'static str; 2],
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_modalities: ["TEXT", "IMAGE"],
            },
        }
    }
}

// Every level is optional, the API leaves things out when it feels like it.

#[derive(Deserialize, Debug, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize, Debug, Default)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Option<Vec<Part>>,
}

#[derive(Deserialize, Debug, Default)]
struct Part {
    #[serde(default, rename = "inlineData", alias = "inline_data")]
    inline_data: Option<InlineData>,
}

#[derive(Deserialize, Debug, Default)]
struct InlineData {
    #[serde(default, rename = "mimeType", alias = "mime_type")]
    mime_type: Option<String>,
    #[serde(default)]
    data: Option<String>,
}

impl InlineData {
    fn image_data(&self) -> Option<&str> {
        let mime = self.mime_type.as_deref()?.to_ascii_lowercase();
        let data = self.data.as_deref().filter(|data| !data.is_empty())?;
        mime.starts_with("image/").then_some(data)
    }
}

impl GenerateContentResponse {
    /// First image part, in candidate then part order. Later ones are ignored.
    fn first_image(&self) -> Option<&str> {
        self.candidates
            .iter()
            .flatten()
            .filter_map(|candidate| candidate.content.as_ref())
            .filter_map(|content| content.parts.as_ref())
            .flatten()
            .filter_map(|part| part.inline_data.as_ref())
            .find_map(InlineData::image_data)
    }
}

fn snapshot(body: &str) -> String {
    body.chars().take(RESPONSE_SNAPSHOT_CHARS).collect()
}

/// Pulls the first inline image out of a `generateContent` response body.
pub fn extract_image(body: &str) -> Result<Vec<u8>, ImageError> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(body).map_err(|source| ImageError::InvalidJson {
            source,
            snapshot: snapshot(body),
        })?;
    let encoded = parsed
        .first_image()
        .ok_or_else(|| ImageError::NoImage(snapshot(body)))?;
    Ok(general_purpose::STANDARD.decode(encoded)?)
}

/// Blocking client for the Gemini image models.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    agent: Agent,
    url: Url,
}

impl GeminiClient {
    /// Builds a client for `{endpoint}/{model}:generateContent?key={api_key}`.
    pub fn new(
        endpoint: &str,
        model: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, url::ParseError> {
        let mut url = Url::parse(&format!(
            "{}/{}:generateContent",
            endpoint.trim_end_matches('/'),
            model
        ))?;
        url.query_pairs_mut().append_pair("key", api_key);

        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Ok(Self {
            agent: Agent::new_with_config(config),
            url,
        })
    }

    /// The endpoint without the key, safe to log.
    pub fn redacted_url(&self) -> String {
        let mut url = self.url.clone();
        url.set_query(None);
        url.to_string()
    }
}

impl ImageGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<Vec<u8>, ImageError> {
        debug!("POST {} ({} prompt chars)", self.redacted_url(), prompt.len());
        let mut response = self
            .agent
            .post(self.url.as_str())
            .send_json(GenerateContentRequest::new(prompt))?;

        let status = response.status();
        // bytes, not a string: error pages aren't always valid UTF-8
        let bytes = response
            .body_mut()
            .with_config()
            .limit(MAX_RESPONSE_BYTES)
            .read_to_vec()?;
        debug!("{} returned {} ({} bytes)", self.redacted_url(), status, bytes.len());

        let body = String::from_utf8_lossy(&bytes);
        if !status.is_success() {
            return Err(ImageError::Http {
                status: status.as_u16(),
                body: body.into_owned(),
            });
        }
        extract_image(&body)
    }
}
