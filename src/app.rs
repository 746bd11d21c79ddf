use crate::models::{ImageSlot, VideoLookup};

/// Results posted back to the UI loop by background actions.
#[derive(Debug, Clone)]
pub enum AppMessage {
    RecipeLoaded(String),
    ImagesLoaded(Vec<ImageSlot>),
    VideosLoaded(VideoLookup),
    Log(String),
}

/// The three user-triggered fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Recipe,
    Images,
    Videos,
}

impl Action {
    pub fn progress_label(self) -> &'static str {
        match self {
            Action::Recipe => "Fetching recipe...",
            Action::Images => "Fetching images...",
            Action::Videos => "Fetching YouTube links...",
        }
    }

    /// The action a message completes, if any.
    pub fn completed_by(message: &AppMessage) -> Option<Self> {
        match message {
            AppMessage::RecipeLoaded(_) => Some(Action::Recipe),
            AppMessage::ImagesLoaded(_) => Some(Action::Images),
            AppMessage::VideosLoaded(_) => Some(Action::Videos),
            AppMessage::Log(_) => None,
        }
    }
}
