pub mod photo;
pub mod session;
pub mod video;

pub use photo::{DishImage, ImageSlot};
pub use session::SessionState;
pub use video::{VideoLink, VideoLookup};
