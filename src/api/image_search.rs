use reqwest::{Client, Url};
use serde::Deserialize;

use crate::config::AppConfig;

use super::{ApiError, check_status};

/// Google Custom Search client restricted to image results.
#[derive(Clone)]
pub struct ImageSearchClient {
    http: Client,
    base_url: String,
    api_key: String,
    engine_id: String,
}

impl ImageSearchClient {
    pub fn new(http: Client, config: &AppConfig) -> Self {
        Self {
            http,
            base_url: config.endpoints().custom_search.clone(),
            api_key: config.google_api_key().to_string(),
            engine_id: config.search_engine_id().to_string(),
        }
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Returns the `link` of each result in rank order. Items without a link
    /// stay in the list as `None`.
    pub async fn search_image_links(
        &self,
        query: &str,
    ) -> Result<Vec<Option<String>>, ApiError> {
        let url = Url::parse_with_params(
            &format!("{}/customsearch/v1", self.base_url),
            [
                ("q", query),
                ("searchType", "image"),
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
            ],
        )
        .map_err(|err| ApiError::Parse(err.to_string()))?;

        let response = check_status(self.http.get(url).send().await?).await?;
        let body: ImageSearchResponse = response
            .json()
            .await
            .map_err(ApiError::parse)?;

        Ok(body.links())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ImageSearchResponse {
    items: Vec<ImageItem>,
}

impl ImageSearchResponse {
    fn links(self) -> Vec<Option<String>> {
        self.items
            .into_iter()
            .map(|item| item.link.filter(|link| !link.trim().is_empty()))
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ImageItem {
    link: Option<String>,
}
