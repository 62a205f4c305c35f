// Gemini API client

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::models::{AppConfig, GenerationRequest};

/// Anything that can turn a prepared request into generated text
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// Where the API key comes from. Resolved on every call, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeySource {
    Env(String),
    #[allow(dead_code)]
    Fixed(String),
}

impl ApiKeySource {
    fn resolve(&self) -> Result<String, GenerationError> {
        match self {
            Self::Env(var) => std::env::var(var)
                .ok()
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| GenerationError::MissingCredential { var: var.clone() }),
            Self::Fixed(key) => Ok(key.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: String,
    model: String,
    temperature: f64,
    api_key: ApiKeySource,
    client: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<Content<'a>>,
    pub system_instruction: Content<'a>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'a str>,
    pub parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Part<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, joined as-is
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl GeminiClient {
    pub fn new(
        base_url: String,
        model: String,
        temperature: f64,
        api_key: ApiKeySource,
    ) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url,
            model,
            temperature,
            api_key,
            client,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.api_base_url.clone(),
            config.model.clone(),
            config.temperature,
            ApiKeySource::Env(config.api_key_env.clone()),
        )
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    async fn send(&self, request: &GenerationRequest, api_key: &str) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &request.prompt_text,
                }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: request.system_instruction,
                }],
            },
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send generate request")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("API request failed with status {status}: {text}");
        }

        let result = response
            .json::<GenerateContentResponse>()
            .await
            .context("Failed to parse generate response")?;

        Ok(result.text())
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let api_key = self.api_key.resolve()?;

        tracing::debug!(
            model = %self.model,
            prompt_chars = request.prompt_text.len(),
            "sending generate request"
        );

        self.send(request, &api_key).await.map_err(|err| {
            tracing::error!(error = ?err, "error generating content");
            GenerationError::failed(format!("{err:#}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::SYSTEM_INSTRUCTION;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn request() -> GenerationRequest {
        GenerationRequest {
            prompt_text: "Generate a \"Case Study\"".to_string(),
            system_instruction: SYSTEM_INSTRUCTION,
        }
    }

    fn client(base_url: String, api_key: ApiKeySource) -> GeminiClient {
        GeminiClient::new(base_url, "gemini-2.5-flash".to_string(), 0.7, api_key).unwrap()
    }

    #[test]
    fn test_client_from_config() {
        let client = GeminiClient::from_config(&AppConfig::default()).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(client.api_key, ApiKeySource::Env("API_KEY".to_string()));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = client("http://localhost:1234/".to_string(), ApiKeySource::Fixed("k".into()));
        assert_eq!(client.endpoint(), format!("http://localhost:1234{GENERATE_PATH}"));
    }

    #[test]
    fn test_request_serialization() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: "hi" }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: "be nice" }],
            },
            generation_config: GenerationConfig { temperature: 0.5 },
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{ "role": "user", "parts": [{ "text": "hi" }] }],
                "systemInstruction": { "parts": [{ "text": "be nice" }] },
                "generationConfig": { "temperature": 0.5 }
            })
        );
    }

    #[test]
    fn test_response_text_joins_parts() {
        let json = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hello "},{"text":"*world*"}]}}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), "Hello *world*");
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.text(), "");
    }

    #[tokio::test]
    async fn test_generate_returns_text_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "parts": [{ "text": "Generate a \"Case Study\"" }] }],
                "generationConfig": { "temperature": 0.7 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "  **wild** launched it.\n" }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(server.uri(), ApiKeySource::Fixed("test-key".to_string()));
        let text = client.generate(&request()).await.unwrap();
        assert_eq!(text, "  **wild** launched it.\n");
    }

    #[tokio::test]
    async fn test_generate_sends_system_instruction() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(body_partial_json(json!({
                "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(server.uri(), ApiKeySource::Fixed("test-key".to_string()));
        assert_eq!(client.generate(&request()).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_missing_credential_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let var = "WILDCOPY_TEST_KEY_THAT_IS_NEVER_SET";
        let client = client(server.uri(), ApiKeySource::Env(var.to_string()));
        let err = client.generate(&request()).await.unwrap_err();
        assert_eq!(
            err,
            GenerationError::MissingCredential {
                var: var.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_provider_error_is_generation_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let client = client(server.uri(), ApiKeySource::Fixed("bad-key".to_string()));
        let err = client.generate(&request()).await.unwrap_err();
        match err {
            GenerationError::GenerationFailed { detail } => {
                assert!(detail.contains("403"), "{detail}");
                assert!(detail.contains("API key not valid"), "{detail}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_generation_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client(server.uri(), ApiKeySource::Fixed("test-key".to_string()));
        let err = client.generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::GenerationFailed { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_generation_failed() {
        let client = client(
            "http://127.0.0.1:9".to_string(),
            ApiKeySource::Fixed("test-key".to_string()),
        );
        let err = client.generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::GenerationFailed { .. }));
    }
}
