use anyhow::Result;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task;

use crate::api::build_client;
use crate::api::gemini::RecipeClient;
use crate::api::image_search::ImageSearchClient;
use crate::api::youtube::VideoSearchClient;
use crate::app::AppMessage;
use crate::config::AppConfig;
use crate::tasks::gallery::{Gallery, WebImageSource};

#[derive(Clone)]
pub struct AppController {
    recipes: RecipeClient,
    videos: VideoSearchClient,
    gallery: Gallery<WebImageSource>,
    message_tx: UnboundedSender<AppMessage>,
}

impl AppController {
    pub fn new(config: &AppConfig, message_tx: UnboundedSender<AppMessage>) -> Result<Self> {
        let http = build_client(config)?;
        let search = ImageSearchClient::new(http.clone(), config);

        Ok(Self {
            recipes: RecipeClient::new(http.clone(), config),
            videos: VideoSearchClient::new(http, config),
            gallery: Gallery::new(WebImageSource::new(search)),
            message_tx,
        })
    }

    pub fn get_recipe(&self, dish_name: String) {
        let client = self.recipes.clone();
        let tx = self.message_tx.clone();
        task::spawn(async move {
            let recipe = client.get_recipe(&dish_name).await;
            let _ = tx.send(AppMessage::RecipeLoaded(recipe));
        });
    }

    pub fn get_images(&self, dish_name: String) {
        let gallery = self.gallery.clone();
        let tx = self.message_tx.clone();
        task::spawn(async move {
            match gallery.fetch_images(&dish_name).await {
                Ok(slots) => {
                    let missing = slots.iter().filter(|slot| !slot.is_loaded()).count();
                    if missing > 0 {
                        let _ = tx.send(AppMessage::Log(format!(
                            "{missing} of {} images for '{dish_name}' could not be loaded",
                            slots.len()
                        )));
                    }
                    let _ = tx.send(AppMessage::ImagesLoaded(slots));
                }
                Err(err) => {
                    let _ = tx.send(AppMessage::Log(format!("Error fetching images: {err}")));
                    let _ = tx.send(AppMessage::ImagesLoaded(Vec::new()));
                }
            }
        });
    }

    pub fn get_video_links(&self, dish_name: String) {
        let client = self.videos.clone();
        let tx = self.message_tx.clone();
        task::spawn(async move {
            let lookup = client.get_video_links(&dish_name).await;
            let _ = tx.send(AppMessage::VideosLoaded(lookup));
        });
    }
}
