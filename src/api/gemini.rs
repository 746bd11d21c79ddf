use std::time::Instant;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

use super::{ApiError, check_status};

pub const NO_RECIPE: &str = "No recipe found.";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Asks Gemini for a recipe.
#[derive(Clone)]
pub struct RecipeClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl RecipeClient {
    pub fn new(http: Client, config: &AppConfig) -> Self {
        Self {
            http,
            base_url: config.endpoints().gemini.clone(),
            model: config.model().to_string(),
            api_key: config.gemini_api_key().to_string(),
        }
    }

    /// Never fails: errors come back as text starting with `Error fetching recipe:`.
    pub async fn get_recipe(&self, dish_name: &str) -> String {
        match self.try_get_recipe(dish_name).await {
            Ok(Some(recipe)) => recipe,
            Ok(None) => NO_RECIPE.to_string(),
            Err(err) => {
                tracing::warn!(dish = dish_name, error = %err, "recipe request failed");
                format!("Error fetching recipe: {err}")
            }
        }
    }

    pub async fn try_get_recipe(&self, dish_name: &str) -> Result<Option<String>, ApiError> {
        let started = Instant::now();
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let request = GenerateRequest::from_prompt(recipe_prompt(dish_name));
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await?;

        let parsed: GenerateResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(ApiError::parse)?;

        tracing::info!(
            dish = dish_name,
            model = %self.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "recipe generated"
        );
        Ok(parsed.first_text())
    }
}

pub fn recipe_prompt(dish_name: &str) -> String {
    format!("Please provide a detailed recipe for {dish_name}. Be a helpful assistant.")
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

impl GenerateRequest {
    fn from_prompt(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: Some(prompt) }],
            }],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .find_map(|part| part.text)
            .filter(|text| !text.trim().is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::StubServer;
    use crate::api::{build_client, unreachable_base_url};
    use crate::config::test_cli;
    use serde_json::json;

    #[test]
    fn prompt_embeds_dish_name() {
        assert_eq!(
            recipe_prompt("Paneer Butter Masala"),
            "Please provide a detailed recipe for Paneer Butter Masala. Be a helpful assistant."
        );
    }

    #[test]
    fn request_body_matches_generate_content_shape() {
        let body = serde_json::to_value(GenerateRequest::from_prompt("hi".into())).unwrap();
        assert_eq!(body, json!({"contents": [{"parts": [{"text": "hi"}]}]}));
    }

    #[test]
    fn takes_text_of_first_candidate() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "## Dosa\n1. Soak rice"}], "role": "model"}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(response.first_text().as_deref(), Some("## Dosa\n1. Soak rice"));
    }

    #[test]
    fn no_candidates_means_no_recipe() {
        let response: GenerateResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert_eq!(response.first_text(), None);
    }

    #[tokio::test]
    async fn outage_degrades_to_error_text() {
        let mut cli = test_cli();
        cli.gemini_base_url = Some(unreachable_base_url());
        let config = AppConfig::from(cli);
        let client = RecipeClient::new(build_client(&config).unwrap(), &config);

        let recipe = client.get_recipe("Paneer Butter Masala").await;
        assert!(recipe.starts_with("Error fetching recipe:"), "{recipe}");
        assert!(!recipe.contains("gemini-key"), "{recipe}");
    }

    fn client_for(server: &StubServer) -> RecipeClient {
        let mut cli = test_cli();
        cli.gemini_base_url = Some(server.base_url.clone());
        let config = AppConfig::from(cli);
        RecipeClient::new(build_client(&config).unwrap(), &config)
    }

    #[tokio::test]
    async fn key_travels_in_header_not_url() {
        let body = json!({"candidates": [{"content": {"parts": [{"text": "Soak the lentils."}]}}]});
        let server = StubServer::start(200, "application/json", body.to_string().into_bytes()).await;

        let recipe = client_for(&server).get_recipe("Dal").await;

        assert_eq!(recipe, "Soak the lentils.");
        let request = &server.requests()[0];
        let request_line = request.lines().next().unwrap();
        assert_eq!(
            request_line,
            "post /v1beta/models/gemini-1.5-flash:generatecontent http/1.1"
        );
        assert!(request.contains("x-goog-api-key: gemini-key"), "{request}");
    }

    #[tokio::test]
    async fn api_error_degrades_without_leaking_key() {
        let body = json!({"error": {"code": 400, "message": "API key not valid."}});
        let server = StubServer::start(400, "application/json", body.to_string().into_bytes()).await;

        let recipe = client_for(&server).get_recipe("Dal").await;

        assert_eq!(
            recipe,
            "Error fetching recipe: api returned status 400: API key not valid."
        );
    }
}
