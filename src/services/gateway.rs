use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_MODEL: &str = "gemini-1.5-flash";

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    Gemini,
    OpenAi,
}

impl Provider {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" => Some(Provider::Gemini),
            "openai" => Some(Provider::OpenAi),
            _ => None,
        }
    }
}

/// Raw image bytes forwarded untouched to a multimodal model.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway error {status}: {body}")]
    Provider {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("empty response from model")]
    EmptyResponse,
}

/// The external completion service. Its output is an opaque string until it
/// has passed lenient recovery and normalization.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        image: Option<&ImagePayload>,
    ) -> Result<String, GatewayError>;
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        GeminiClient {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl Gateway for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        image: Option<&ImagePayload>,
    ) -> Result<String, GatewayError> {
        let mut parts = vec![Part::Text {
            text: prompt.to_string(),
        }];
        if let Some(image) = image {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type.clone(),
                    data: STANDARD.encode(&image.data),
                },
            });
        }

        let request = GenerateRequest {
            contents: vec![Content { parts }],
        };

        let url = format!("{}/models/{}:generateContent", GEMINI_BASE_URL, GEMINI_MODEL);
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Provider { status, body });
        }

        let body: GenerateResponse = response.json().await?;
        let text = body
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<String>()
            })
            .ok_or(GatewayError::EmptyResponse)?;

        if text.is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        Ok(text)
    }
}

pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        OpenAiClient {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl Gateway for OpenAiClient {
    async fn generate(
        &self,
        prompt: &str,
        image: Option<&ImagePayload>,
    ) -> Result<String, GatewayError> {
        let content = match image {
            Some(image) => {
                let data_url = format!(
                    "data:{};base64,{}",
                    image.mime_type,
                    STANDARD.encode(&image.data)
                );
                json!([
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": data_url } }
                ])
            }
            None => Value::String(prompt.to_string()),
        };

        let request = ChatRequest {
            model: OPENAI_MODEL.to_string(),
            temperature: 0.1,
            messages: vec![Message {
                role: "user".to_string(),
                content,
            }],
        };

        let response = self
            .client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Provider { status, body });
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or(GatewayError::EmptyResponse)?;

        if content.is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parse_is_case_insensitive() {
        assert_eq!(Provider::parse("gemini"), Some(Provider::Gemini));
        assert_eq!(Provider::parse(" OpenAI "), Some(Provider::OpenAi));
        assert_eq!(Provider::parse("claude"), None);
    }

    #[test]
    fn gemini_request_serializes_inline_data() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: "extract".to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/png".to_string(),
                            data: STANDARD.encode(b"bytes"),
                        },
                    },
                ],
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "extract");
        assert_eq!(
            value["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/png"
        );
    }
}
