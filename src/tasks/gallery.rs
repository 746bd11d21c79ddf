//! Gallery fetch: one image search, then every result downloaded concurrently.
//!
//! Output slots are index-aligned with the search results. A slot that fails to
//! download or decode becomes [`ImageSlot::Missing`] and never affects its siblings.

use std::future::Future;
use std::time::Instant;

use futures::future::join_all;
use thiserror::Error;
use tokio::task;

use crate::api::ApiError;
use crate::api::image_search::ImageSearchClient;
use crate::models::{DishImage, ImageSlot};

/// Upper bound on gallery size, and therefore on concurrent downloads.
pub const MAX_IMAGES: usize = 5;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("image search failed: {0}")]
    Discovery(#[from] ApiError),
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("search result has no image link")]
    MissingLink,
    #[error("network error: {0}")]
    Network(reqwest::Error),
    #[error("image host returned status {0}")]
    Status(u16),
    #[error("{0}")]
    Decode(String),
    #[error("decode task failed: {0}")]
    Join(String),
}

// The slot already records its url.
impl From<reqwest::Error> for ImageError {
    fn from(err: reqwest::Error) -> Self {
        ImageError::Network(err.without_url())
    }
}

/// Where gallery candidates and their bytes come from.
pub trait ImageSource {
    /// Candidate links in rank order; `None` marks a result with no usable link.
    fn discover(
        &self,
        dish_name: &str,
    ) -> impl Future<Output = Result<Vec<Option<String>>, ApiError>> + Send;

    fn download(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, ImageError>> + Send;
}

/// Custom Search for discovery, plain GETs for the bytes.
#[derive(Clone)]
pub struct WebImageSource {
    search: ImageSearchClient,
}

impl WebImageSource {
    pub fn new(search: ImageSearchClient) -> Self {
        Self { search }
    }
}

impl ImageSource for WebImageSource {
    async fn discover(&self, dish_name: &str) -> Result<Vec<Option<String>>, ApiError> {
        self.search.search_image_links(dish_name).await
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        let response = self.search.http().get(url).send().await?;
        if !response.status().is_success() {
            return Err(ImageError::Status(response.status().as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[derive(Clone)]
pub struct Gallery<S> {
    source: S,
}

impl<S: ImageSource> Gallery<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub async fn fetch_images(&self, dish_name: &str) -> Result<Vec<ImageSlot>, GalleryError> {
        let started = Instant::now();
        let candidates: Vec<Option<String>> = self
            .source
            .discover(dish_name)
            .await?
            .into_iter()
            .take(MAX_IMAGES)
            .collect();

        if candidates.is_empty() {
            tracing::info!(dish = dish_name, "image search returned no results");
            return Ok(Vec::new());
        }

        // join_all keeps input order no matter which download finishes first.
        let slots = join_all(
            candidates
                .into_iter()
                .enumerate()
                .map(|(index, candidate)| self.fetch_slot(index, candidate)),
        )
        .await;

        tracing::info!(
            dish = dish_name,
            requested = slots.len(),
            loaded = slots.iter().filter(|slot| slot.is_loaded()).count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "gallery fetch completed"
        );
        Ok(slots)
    }

    async fn fetch_slot(&self, index: usize, candidate: Option<String>) -> ImageSlot {
        let Some(url) = candidate else {
            tracing::warn!(index, "skipping image result without a link");
            return ImageSlot::Missing {
                url: None,
                reason: ImageError::MissingLink.to_string(),
            };
        };

        match self.load(&url).await {
            Ok(image) => {
                tracing::debug!(
                    index,
                    url = %image.source_url,
                    format = ?image.format,
                    "image decoded"
                );
                ImageSlot::Loaded(image)
            }
            Err(err) => {
                tracing::warn!(index, url = %url, error = %err, "image unavailable");
                ImageSlot::Missing {
                    url: Some(url),
                    reason: err.to_string(),
                }
            }
        }
    }

    async fn load(&self, url: &str) -> Result<DishImage, ImageError> {
        let bytes = self.source.download(url).await?;
        let source_url = url.to_string();
        task::spawn_blocking(move || DishImage::decode(&source_url, &bytes))
            .await
            .map_err(|err| ImageError::Join(err.to_string()))?
            .map_err(ImageError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::api::build_client;
    use crate::api::stub::StubServer;
    use crate::config::test_config;
    use crate::models::photo::png_fixture;

    enum Reply {
        Png { shade: u8, delay_ms: u64 },
        Status(u16),
        Garbage,
    }

    #[derive(Clone, Default)]
    struct FakeSource {
        links: Vec<Option<String>>,
        replies: Arc<HashMap<String, Reply>>,
        discovery_fails: bool,
        downloads: Arc<AtomicUsize>,
        in_flight: Arc<AtomicUsize>,
        max_in_flight: Arc<AtomicUsize>,
    }

    impl FakeSource {
        fn new(entries: Vec<(&str, Reply)>) -> Self {
            let links = entries.iter().map(|(url, _)| Some(url.to_string())).collect();
            let replies = entries
                .into_iter()
                .map(|(url, reply)| (url.to_string(), reply))
                .collect();
            Self {
                links,
                replies: Arc::new(replies),
                ..Self::default()
            }
        }
    }

    impl ImageSource for FakeSource {
        async fn discover(&self, _dish_name: &str) -> Result<Vec<Option<String>>, ApiError> {
            if self.discovery_fails {
                return Err(ApiError::Api {
                    status: 403,
                    message: "Daily limit exceeded".into(),
                });
            }
            Ok(self.links.clone())
        }

        async fn download(&self, url: &str) -> Result<Vec<u8>, ImageError> {
            self.downloads.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let result = match self.replies.get(url) {
                Some(Reply::Png { shade, delay_ms }) => {
                    tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                    Ok(png_fixture(4, 4, [*shade, 0, 0, 255]))
                }
                Some(Reply::Status(code)) => {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    Err(ImageError::Status(*code))
                }
                Some(Reply::Garbage) => Ok(b"not an image".to_vec()),
                None => Err(ImageError::Status(404)),
            };

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }

    fn loaded(slot: &ImageSlot) -> Option<&DishImage> {
        match slot {
            ImageSlot::Loaded(image) => Some(image),
            ImageSlot::Missing { .. } => None,
        }
    }

    fn shade(slot: &ImageSlot) -> Option<u8> {
        loaded(slot).map(|image| image.preview.get_pixel(0, 0).0[0])
    }

    #[tokio::test]
    async fn output_order_follows_search_rank_not_completion() {
        let source = FakeSource::new(vec![
            ("https://img.test/0", Reply::Png { shade: 10, delay_ms: 60 }),
            ("https://img.test/1", Reply::Png { shade: 20, delay_ms: 45 }),
            ("https://img.test/2", Reply::Png { shade: 30, delay_ms: 30 }),
            ("https://img.test/3", Reply::Png { shade: 40, delay_ms: 15 }),
            ("https://img.test/4", Reply::Png { shade: 50, delay_ms: 0 }),
        ]);
        let gallery = Gallery::new(source.clone());

        let slots = gallery.fetch_images("Paneer Butter Masala").await.unwrap();

        let shades: Vec<_> = slots.iter().map(shade).collect();
        assert_eq!(shades, vec![Some(10), Some(20), Some(30), Some(40), Some(50)]);
        assert_eq!(loaded(&slots[3]).unwrap().source_url, "https://img.test/3");
    }

    #[tokio::test]
    async fn all_downloads_run_at_once() {
        let entries = (0..5)
            .map(|i| (format!("https://img.test/{i}"), i as u8))
            .collect::<Vec<_>>();
        let source = FakeSource::new(
            entries
                .iter()
                .map(|(url, shade)| (url.as_str(), Reply::Png { shade: *shade, delay_ms: 40 }))
                .collect(),
        );
        let gallery = Gallery::new(source.clone());

        gallery.fetch_images("Dosa").await.unwrap();

        assert_eq!(source.max_in_flight.load(Ordering::SeqCst), MAX_IMAGES);
        assert_eq!(source.in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn one_failure_leaves_a_marker_at_its_index() {
        let source = FakeSource::new(vec![
            ("https://img.test/0", Reply::Png { shade: 1, delay_ms: 5 }),
            ("https://img.test/1", Reply::Png { shade: 2, delay_ms: 5 }),
            ("https://img.test/2", Reply::Status(504)),
            ("https://img.test/3", Reply::Png { shade: 4, delay_ms: 5 }),
            ("https://img.test/4", Reply::Png { shade: 5, delay_ms: 5 }),
        ]);
        let gallery = Gallery::new(source);

        let slots = gallery.fetch_images("Paneer Butter Masala").await.unwrap();

        assert_eq!(slots.len(), 5);
        assert_eq!(slots.iter().filter(|slot| slot.is_loaded()).count(), 4);
        match &slots[2] {
            ImageSlot::Missing { url, reason } => {
                assert_eq!(url.as_deref(), Some("https://img.test/2"));
                assert_eq!(reason, "image host returned status 504");
            }
            other => panic!("expected missing slot, got {other:?}"),
        }
        assert_eq!(shade(&slots[3]), Some(4));
    }

    #[tokio::test]
    async fn undecodable_body_is_isolated() {
        let source = FakeSource::new(vec![
            ("https://img.test/html", Reply::Garbage),
            ("https://img.test/ok", Reply::Png { shade: 9, delay_ms: 0 }),
        ]);
        let slots = Gallery::new(source).fetch_images("Idli").await.unwrap();

        assert!(matches!(slots[0], ImageSlot::Missing { .. }));
        assert_eq!(shade(&slots[1]), Some(9));
    }

    #[tokio::test]
    async fn no_search_results_starts_no_downloads() {
        let source = FakeSource::default();
        let slots = Gallery::new(source.clone()).fetch_images("Unknown").await.unwrap();

        assert!(slots.is_empty());
        assert_eq!(source.downloads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn only_first_five_results_are_fetched() {
        let urls: Vec<String> = (0..8).map(|i| format!("https://img.test/{i}")).collect();
        let source = FakeSource::new(
            urls.iter()
                .map(|url| (url.as_str(), Reply::Png { shade: 1, delay_ms: 0 }))
                .collect(),
        );

        let slots = Gallery::new(source.clone()).fetch_images("Biryani").await.unwrap();

        assert_eq!(slots.len(), MAX_IMAGES);
        assert_eq!(source.downloads.load(Ordering::SeqCst), MAX_IMAGES);
    }

    #[tokio::test]
    async fn result_without_link_is_missing_without_download() {
        let mut source = FakeSource::new(vec![("https://img.test/a", Reply::Png {
            shade: 3,
            delay_ms: 0,
        })]);
        source.links.insert(0, None);

        let slots = Gallery::new(source.clone()).fetch_images("Vada").await.unwrap();

        assert_eq!(
            slots[0],
            ImageSlot::Missing {
                url: None,
                reason: "search result has no image link".into(),
            }
        );
        assert_eq!(shade(&slots[1]), Some(3));
        assert_eq!(source.downloads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn discovery_failure_is_an_error() {
        let source = FakeSource {
            discovery_fails: true,
            ..FakeSource::default()
        };

        let err = Gallery::new(source).fetch_images("Dosa").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "image search failed: api returned status 403: Daily limit exceeded"
        );
    }

    fn web_source() -> WebImageSource {
        let config = test_config();
        let search = ImageSearchClient::new(build_client(&config).unwrap(), &config);
        WebImageSource::new(search)
    }

    #[tokio::test]
    async fn web_download_returns_body_bytes() {
        let png = png_fixture(2, 2, [7, 7, 7, 255]);
        let server = StubServer::start(200, "image/png", png.clone()).await;

        let bytes = web_source()
            .download(&format!("{}/dosa.png", server.base_url))
            .await
            .unwrap();

        assert_eq!(bytes, png);
    }

    #[tokio::test]
    async fn web_download_rejects_error_status() {
        let server = StubServer::start(404, "text/html", b"<h1>gone</h1>".to_vec()).await;

        let err = web_source()
            .download(&format!("{}/gone.jpg", server.base_url))
            .await
            .unwrap_err();

        assert!(matches!(err, ImageError::Status(404)), "{err:?}");
    }
}
