use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use super::{Completion, GenerateError};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";
pub const TEMPERATURE: f32 = 0.7;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Blocking client for an OpenAI-compatible chat-completions endpoint.
pub struct GroqClient {
    agent: ureq::Agent,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize, Debug)]
struct ChoiceMessage {
    content: Option<String>,
}

impl GroqClient {
    /// A missing `api_key` is not an error here; every call fails instead.
    pub fn new(api_key: Option<String>, model: &str, base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        let api_key = api_key.filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            log::warn!("GROQ_API_KEY is not set, question generation will fail");
        }

        Self {
            agent,
            api_key,
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl Completion for GroqClient {
    fn complete(&self, system_prompt: &str, user_message: &str) -> Result<String, GenerateError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerateError::MissingCredential)?;

        let payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_message}
            ],
            "temperature": TEMPERATURE,
            "response_format": { "type": "json_object" }
        });

        log::debug!("POST {} (model {})", self.endpoint(), self.model);
        let response = self
            .agent
            .post(&self.endpoint())
            .set("Authorization", &format!("Bearer {}", api_key))
            .set("Content-Type", "application/json")
            .send_json(&payload)
            .map_err(|e| match e {
                ureq::Error::Status(code, response) => {
                    let body = response.into_string().unwrap_or_default();
                    log::debug!("completion endpoint answered {}: {}", code, body);
                    GenerateError::Server { status: code }
                }
                other => GenerateError::Http(other),
            })?;

        let body: ChatResponse = response.into_json()?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(GenerateError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_fails_without_network() {
        let client = GroqClient::new(None, DEFAULT_MODEL, DEFAULT_BASE_URL);
        let err = client.complete("system", "user").unwrap_err();
        assert!(matches!(err, GenerateError::MissingCredential));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let client = GroqClient::new(Some("   ".into()), DEFAULT_MODEL, DEFAULT_BASE_URL);
        let err = client.complete("system", "user").unwrap_err();
        assert!(matches!(err, GenerateError::MissingCredential));
    }

    #[test]
    fn test_endpoint_ignores_trailing_slash() {
        let client = GroqClient::new(None, "m", "http://localhost:8080/v1/");
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(client.model(), "m");
    }

    #[test]
    fn test_response_envelope() {
        let raw = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"{\"questions\":[]}"}}]}"#;
        let body: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            body.choices[0].message.content.as_deref(),
            Some(r#"{"questions":[]}"#)
        );
    }
}
