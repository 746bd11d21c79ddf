use reqwest::{Client, Url};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::models::{VideoLink, VideoLookup};

use super::{ApiError, check_status};

pub const MAX_VIDEOS: usize = 5;

/// YouTube Data API search client.
#[derive(Clone)]
pub struct VideoSearchClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl VideoSearchClient {
    pub fn new(http: Client, config: &AppConfig) -> Self {
        Self {
            http,
            base_url: config.endpoints().youtube.clone(),
            api_key: config.youtube_api_key().to_string(),
        }
    }

    pub async fn get_video_links(&self, dish_name: &str) -> VideoLookup {
        match self.search(dish_name).await {
            Ok(response) => {
                let lookup = response.into_lookup();
                tracing::info!(
                    dish = dish_name,
                    videos = lookup.links().len(),
                    "video search completed"
                );
                lookup
            }
            Err(err) => {
                tracing::warn!(dish = dish_name, error = %err, "video search failed");
                VideoLookup::Failed(err.to_string())
            }
        }
    }

    async fn search(&self, dish_name: &str) -> Result<VideoSearchResponse, ApiError> {
        let max_results = MAX_VIDEOS.to_string();
        let url = Url::parse_with_params(
            &format!("{}/youtube/v3/search", self.base_url),
            [
                ("part", "snippet"),
                ("q", dish_name),
                ("key", self.api_key.as_str()),
                ("maxResults", max_results.as_str()),
                ("type", "video"),
            ],
        )
        .map_err(|err| ApiError::Parse(err.to_string()))?;

        let response = check_status(self.http.get(url).send().await?).await?;
        response
            .json()
            .await
            .map_err(ApiError::parse)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VideoSearchResponse {
    items: Vec<VideoItem>,
}

impl VideoSearchResponse {
    /// Items without a video id are skipped; nothing usable means `NotFound`.
    fn into_lookup(self) -> VideoLookup {
        let links: Vec<VideoLink> = self
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                let title = item.snippet.map(|s| s.title).unwrap_or_default();
                Some(VideoLink::from_video_id(title, &video_id))
            })
            .collect();

        if links.is_empty() {
            VideoLookup::NotFound
        } else {
            VideoLookup::Found(links)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VideoItem {
    id: VideoId,
    snippet: Option<Snippet>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VideoId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Snippet {
    title: String,
}
