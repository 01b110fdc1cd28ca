use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use reqwest::Client;
use tracing::{info, error};

use crate::models::FormState;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")] Http(String),
    #[error("Other: {0}")] Other(String),
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        let base_url = std::env::var("GEMINI_API_BASE")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string());
        let model = std::env::var("GEMINI_MODEL")
            .unwrap_or_else(|_| "gemini-1.5-flash-8b".to_string());
        Self { client: Client::new(), api_key, base_url, model }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
            model: "gemini-1.5-flash-8b".to_string(),
        }
    }

    /// Substitutes the four form values into the fixed assistant template.
    /// Pure: identical form state always yields the identical prompt.
    pub fn build_prompt(form: &FormState) -> String {
        format!(
            "\
You are a helpful modest fashion assistant. Based on the user's input about occasion, location, weather, and gender, suggest a modest outfit idea. Include fabric types, colors, and hijab styles (if female) or modest styling tips (if male) suitable for the event. Provide styling tips in a friendly tone.

User input:
- Occasion: {}
- Location: {}
- Weather: {}
- Gender: {}

Answer:
",
            form.occasion.as_str(),
            form.location,
            form.weather.as_str(),
            form.gender.as_str(),
        )
    }

    /// One blocking call to `generateContent`; returns the trimmed response
    /// text. No retries, no timeout override.
    pub async fn request_suggestion(&self, prompt: &str) -> Result<String, GeminiError> {
        if self.api_key == "DEMO_KEY" {
            info!("Using demo mode - no real suggestion generated");
            return Ok("Demo suggestion: a long-sleeved cotton dress in soft pastel tones with a matching draped hijab.".to_string());
        }

        info!("Generating suggestion with Gemini API...");

        let payload = json!({
            "contents": [{
                "parts": [{"text": prompt}]
            }],
            "generationConfig": {
                "temperature": 0.7,
                "topK": 40,
                "topP": 0.95,
                "maxOutputTokens": 512
            }
        });

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        info!("🔗 Making request to: {}", url.replace(&self.api_key, "***"));

        let response = self.client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| GeminiError::Http(e.to_string()))?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| GeminiError::Http(e.to_string()))?;

        if !status.is_success() {
            error!("❌ Gemini API call failed with status {}: {}", status, response_text);
            return Err(GeminiError::Http(format!("HTTP {}: {}", status, response_text)));
        }

        let parsed: GeminiResponse = serde_json::from_str(&response_text)
            .map_err(|e| GeminiError::Other(format!("Failed to parse response: {}", e)))?;

        if let Some(candidate) = parsed.candidates.first() {
            for part in &candidate.content.parts {
                if let Part::Text { text } = part {
                    let text = text.trim();
                    if !text.is_empty() {
                        info!("✅ Suggestion generated ({} chars)", text.len());
                        return Ok(text.to_string());
                    }
                }
            }
        }

        Err(GeminiError::Other("No text content found in response".to_string()))
    }
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate { #[serde(default)] content: Content }

#[derive(Debug, Deserialize, Default)]
struct Content { #[serde(default)] parts: Vec<Part> }

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    Other(serde_json::Value),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FormState, Gender, Occasion, Weather};
    use pretty_assertions::assert_eq;

    fn berlin_form() -> FormState {
        FormState {
            occasion: Occasion::Work,
            location: "Berlin".into(),
            weather: Weather::Cold,
            gender: Gender::Female,
        }
    }

    #[test]
    fn prompt_contains_the_literal_field_values() {
        let prompt = GeminiClient::build_prompt(&berlin_form());
        assert!(prompt.contains("- Occasion: Work"));
        assert!(prompt.contains("- Location: Berlin"));
        assert!(prompt.contains("- Weather: Cold"));
        assert!(prompt.contains("- Gender: Female"));
    }

    #[test]
    fn prompt_keeps_the_assistant_template() {
        let prompt = GeminiClient::build_prompt(&FormState::default());
        assert!(prompt.starts_with("You are a helpful modest fashion assistant."));
        assert!(prompt.contains("hijab styles (if female)"));
        assert!(prompt.contains("modest styling tips (if male)"));
        assert!(prompt.trim_end().ends_with("Answer:"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let form = berlin_form();
        assert_eq!(GeminiClient::build_prompt(&form), GeminiClient::build_prompt(&form));
    }

    #[test]
    fn religious_event_is_spelled_out_in_the_prompt() {
        let form = FormState { occasion: Occasion::ReligiousEvent, ..berlin_form() };
        let prompt = GeminiClient::build_prompt(&form);
        assert!(prompt.contains("- Occasion: Religious Event"));
    }

    #[test]
    fn response_parsing_picks_the_first_text_part() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"  Wear a wool coat...  "}]}}]}"#;
        let parsed: GeminiResponse = serde_json::from_str(body).unwrap();
        let text = match &parsed.candidates[0].content.parts[0] {
            Part::Text { text } => text.trim().to_string(),
            _ => panic!("expected text part"),
        };
        assert_eq!(text, "Wear a wool coat...");
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_a_generation_error() {
        // port 9 (discard) refuses the connection immediately
        let client = GeminiClient::with_base_url("not-a-real-key".into(), "http://127.0.0.1:9/v1beta".into());
        let prompt = GeminiClient::build_prompt(&berlin_form());
        let result = client.request_suggestion(&prompt).await;
        assert!(matches!(result, Err(GeminiError::Http(_))));
    }

    #[test]
    fn response_parsing_tolerates_unknown_part_shapes() {
        let body = r#"{"candidates":[{"content":{"parts":[{"inlineData":{"data":"x"}}]}}]}"#;
        let parsed: GeminiResponse = serde_json::from_str(body).unwrap();
        assert!(matches!(parsed.candidates[0].content.parts[0], Part::Other(_)));
    }
}
