use serde::{Deserialize, Serialize};

use super::provider::{GenerateInput, GenerateOutput, ProviderError, ProviderResult, TextProvider};
use crate::http::HttpClient;

/// Client for the Gemini `generateContent` REST endpoint. Constructing one
/// requires a non-empty api key; the caller treats a failed construction as
/// "fallback unavailable" for the whole session.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: HttpClient,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        http: HttpClient,
        api_key: Option<String>,
        model: String,
        base_url: String,
    ) -> ProviderResult<Self> {
        let api_key = api_key
            .filter(|v| !v.trim().is_empty())
            .ok_or(ProviderError::MissingApiKey)?;

        Ok(Self {
            http,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_request(input: &GenerateInput) -> GeminiGenerateRequest {
        GeminiGenerateRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: input.prompt.clone(),
                }],
            }],
            system_instruction: input.system_instruction.as_ref().map(|text| {
                GeminiSystemInstruction {
                    parts: vec![GeminiPart { text: text.clone() }],
                }
            }),
        }
    }

    fn extract_text(resp: GeminiGenerateResponse) -> ProviderResult<String> {
        for candidate in resp.candidates {
            for part in candidate.content.parts {
                let text = part.text.trim();
                if !text.is_empty() {
                    return Ok(text.to_string());
                }
            }
        }

        Err(ProviderError::EmptyResponse)
    }
}

impl TextProvider for GeminiClient {
    async fn generate(&self, input: GenerateInput) -> ProviderResult<GenerateOutput> {
        let payload = Self::build_request(&input);
        let resp = self
            .http
            .post_json(
                &self.endpoint(),
                &[("key", self.api_key.as_str())],
                &payload,
            )
            .await
            .map_err(|err| ProviderError::Transport(err.to_string()))?;

        if !(200..300).contains(&resp.status) {
            let body = resp.body.chars().take(400).collect::<String>();
            return Err(ProviderError::HttpStatus {
                status: resp.status,
                body,
            });
        }

        let parsed = serde_json::from_str::<GeminiGenerateResponse>(&resp.body)
            .map_err(|err| ProviderError::Parse(err.to_string()))?;
        let text = Self::extract_text(parsed)?;
        Ok(GenerateOutput { text })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerateRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiGenerateResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    parts: Vec<GeminiPart>,
}

#[cfg(test)]
mod tests {
    use super::GeminiClient;
    use crate::http::HttpClient;
    use crate::http::debug::HttpDebugConfig;
    use crate::llm::provider::{GenerateInput, ProviderError, TextProvider};
    use reqwest::Client;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_http() -> HttpClient {
        HttpClient::new(Client::new(), HttpDebugConfig::disabled())
    }

    fn test_client(server_uri: String) -> GeminiClient {
        GeminiClient::new(
            test_http(),
            Some("test-key".to_string()),
            "test-model".to_string(),
            server_uri,
        )
        .expect("client")
    }

    #[tokio::test]
    async fn generate_returns_first_non_empty_text_part() {
        let server = MockServer::start().await;
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": ""}, {"text": "hello from gemini"}]}}
            ]
        }"#;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/test-model:generateContent"))
            .and(query_param("key", "test-key"))
            .and(body_string_contains("systemInstruction"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let out = client
            .generate(GenerateInput {
                prompt: "hello".to_string(),
                system_instruction: Some("system".to_string()),
            })
            .await
            .expect("success response");

        assert_eq!(out.text, "hello from gemini");
    }

    #[tokio::test]
    async fn generate_maps_http_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let err = client
            .generate(GenerateInput {
                prompt: "hello".to_string(),
                system_instruction: None,
            })
            .await
            .expect_err("expected auth error");

        match err {
            ProviderError::HttpStatus { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("invalid key"));
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn generate_maps_unparseable_body_to_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let err = client
            .generate(GenerateInput {
                prompt: "hello".to_string(),
                system_instruction: None,
            })
            .await
            .expect_err("expected parse error");

        assert!(matches!(err, ProviderError::Parse(_)));
    }

    #[tokio::test]
    async fn generate_returns_empty_response_error_when_no_text() {
        let server = MockServer::start().await;
        let body = r#"{"candidates": [{"content": {"parts": [{"text": ""}]}}]}"#;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let err = client
            .generate(GenerateInput {
                prompt: "hello".to_string(),
                system_instruction: None,
            })
            .await
            .expect_err("expected empty response error");

        assert_eq!(err, ProviderError::EmptyResponse);
    }

    #[test]
    fn new_requires_api_key() {
        let err = GeminiClient::new(
            test_http(),
            None,
            "test-model".to_string(),
            "https://example.com".to_string(),
        )
        .expect_err("missing key should fail");

        assert_eq!(err, ProviderError::MissingApiKey);

        let err = GeminiClient::new(
            test_http(),
            Some("   ".to_string()),
            "test-model".to_string(),
            "https://example.com".to_string(),
        )
        .expect_err("blank key should fail");

        assert_eq!(err, ProviderError::MissingApiKey);
    }
}
