pub const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoLink {
    pub title: String,
    pub url: String,
}

impl VideoLink {
    pub fn from_video_id(title: impl Into<String>, video_id: &str) -> Self {
        Self {
            title: title.into(),
            url: format!("{WATCH_URL_BASE}{video_id}"),
        }
    }
}

/// Outcome of a video search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoLookup {
    Found(Vec<VideoLink>),
    NotFound,
    Failed(String),
}

impl VideoLookup {
    /// Text shown in place of a link list.
    pub fn message(&self) -> Option<String> {
        match self {
            VideoLookup::Found(_) => None,
            VideoLookup::NotFound => Some("No videos found.".to_string()),
            VideoLookup::Failed(details) => {
                Some(format!("Error fetching YouTube links: {details}"))
            }
        }
    }

    pub fn links(&self) -> &[VideoLink] {
        match self {
            VideoLookup::Found(links) => links,
            _ => &[],
        }
    }
}
