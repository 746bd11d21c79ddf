use super::photo::ImageSlot;
use super::video::VideoLookup;

/// Results of the current chat session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub recipe: String,
    pub images: Vec<ImageSlot>,
    pub videos: Option<VideoLookup>,
    pub images_requested: bool,
}

impl SessionState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_recipe(&mut self, recipe: String) {
        self.recipe = recipe;
    }

    /// Stores a gallery and records that images were asked for, even when none came back.
    pub fn set_images(&mut self, images: Vec<ImageSlot>) {
        self.images = images;
        self.images_requested = true;
    }

    pub fn set_videos(&mut self, videos: VideoLookup) {
        self.videos = Some(videos);
    }

    pub fn loaded_image_count(&self) -> usize {
        self.images.iter().filter(|slot| slot.is_loaded()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::video::VideoLink;

    fn populated() -> SessionState {
        let mut state = SessionState::default();
        state.set_recipe("Soak the rice overnight.".to_string());
        state.set_images(vec![ImageSlot::Missing {
            url: Some("https://img.test/1.jpg".to_string()),
            reason: "status 404".to_string(),
        }]);
        state.set_videos(VideoLookup::Found(vec![VideoLink::from_video_id("Dosa", "x1")]));
        state
    }

    #[test]
    fn reset_restores_initial_state_and_is_idempotent() {
        let mut state = populated();
        state.reset();
        let once = state.clone();
        state.reset();

        assert_eq!(once, SessionState::default());
        assert_eq!(state, once);
        assert!(!state.images_requested);
        assert!(state.videos.is_none());
    }

    #[test]
    fn empty_gallery_still_marks_images_requested() {
        let mut state = SessionState::default();
        state.set_images(Vec::new());

        assert!(state.images.is_empty());
        assert!(state.images_requested);
        assert!(state.recipe.is_empty());
        assert!(state.videos.is_none());
    }

    #[test]
    fn each_setter_touches_one_field() {
        let mut state = populated();
        let before = state.clone();
        state.set_recipe("Grind the batter.".to_string());

        assert_eq!(state.images, before.images);
        assert_eq!(state.videos, before.videos);
        assert_eq!(state.images_requested, before.images_requested);
        assert_eq!(state.loaded_image_count(), 0);
    }
}
