use std::collections::VecDeque;

use chrono::Local;
use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::{Action, AppMessage};
use crate::models::SessionState;

use super::controller::AppController;

const LOG_CAPACITY: usize = 200;

pub const EMPTY_DISH_WARNING: &str = "Please enter a dish name first.";
pub const RESET_NOTICE: &str = "Chat has been reset. You can start fresh!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusArea {
    Input,
    Recipe,
    Videos,
    Logs,
}

impl FocusArea {
    pub fn next(self) -> Self {
        match self {
            FocusArea::Input => FocusArea::Recipe,
            FocusArea::Recipe => FocusArea::Videos,
            FocusArea::Videos => FocusArea::Logs,
            FocusArea::Logs => FocusArea::Input,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            FocusArea::Input => FocusArea::Logs,
            FocusArea::Recipe => FocusArea::Input,
            FocusArea::Videos => FocusArea::Recipe,
            FocusArea::Logs => FocusArea::Videos,
        }
    }
}

pub struct App {
    pub controller: AppController,
    pub msg_rx: UnboundedReceiver<AppMessage>,
    pub dish_input: String,
    pub session: SessionState,
    pub busy: Option<Action>,
    pub recipe_scroll: u16,
    pub video_state: ListState,
    pub logs: VecDeque<String>,
    pub focus: FocusArea,
    pub tick: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: AppController, msg_rx: UnboundedReceiver<AppMessage>) -> Self {
        Self {
            controller,
            msg_rx,
            dish_input: String::new(),
            session: SessionState::default(),
            busy: None,
            recipe_scroll: 0,
            video_state: ListState::default(),
            logs: VecDeque::with_capacity(LOG_CAPACITY),
            focus: FocusArea::Input,
            tick: 0,
            should_quit: false,
        }
    }

    pub fn with_dish(mut self, dish: Option<&str>) -> Self {
        if let Some(dish) = dish {
            self.dish_input = dish.to_string();
        }
        self
    }

    /// Runs the empty-input and one-at-a-time guards, then hands off to the controller.
    pub fn trigger(&mut self, action: Action) {
        let dish = self.dish_input.trim().to_string();
        if dish.is_empty() {
            self.push_log(EMPTY_DISH_WARNING);
            return;
        }

        if self.reject_while_busy() {
            return;
        }

        tracing::info!(?action, dish = %dish, "action triggered");
        self.busy = Some(action);
        self.push_log(format!("{} ({dish})", action.progress_label()));

        match action {
            Action::Recipe => self.controller.get_recipe(dish),
            Action::Images => self.controller.get_images(dish),
            Action::Videos => self.controller.get_video_links(dish),
        }
    }

    /// Logs and returns true while an action is still running.
    fn reject_while_busy(&mut self) -> bool {
        match self.busy {
            Some(current) => {
                self.push_log(format!("Still working: {}", current.progress_label()));
                true
            }
            None => false,
        }
    }

    /// Refused while an action runs, so its late result cannot refill the cleared session.
    pub fn reset(&mut self) {
        if self.reject_while_busy() {
            return;
        }
        self.session.reset();
        self.recipe_scroll = 0;
        self.video_state.select(None);
        self.push_log(RESET_NOTICE);
    }

    pub fn handle_message(&mut self, message: AppMessage) {
        if let Some(action) = Action::completed_by(&message) {
            if self.busy == Some(action) {
                self.busy = None;
            }
        }

        match message {
            AppMessage::RecipeLoaded(recipe) => {
                self.session.set_recipe(recipe);
                self.recipe_scroll = 0;
                self.push_log("Recipe updated");
            }
            AppMessage::ImagesLoaded(images) => {
                self.session.set_images(images);
                if self.session.images.is_empty() {
                    self.push_log("No images found.");
                } else {
                    self.push_log(format!(
                        "Loaded {} of {} images",
                        self.session.loaded_image_count(),
                        self.session.images.len()
                    ));
                }
            }
            AppMessage::VideosLoaded(lookup) => {
                let count = lookup.links().len();
                let note = lookup.message();
                self.session.set_videos(lookup);
                self.video_state.select(if count == 0 { None } else { Some(0) });
                match note {
                    Some(text) => self.push_log(text),
                    None => self.push_log(format!("Found {count} videos")),
                }
            }
            AppMessage::Log(entry) => {
                self.push_log(entry);
            }
        }
    }

    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn previous_focus(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn push_log<S: Into<String>>(&mut self, message: S) {
        if self.logs.len() == LOG_CAPACITY {
            self.logs.pop_front();
        }
        let stamp = Local::now().format("%H:%M:%S");
        self.logs.push_back(format!("[{stamp}] {}", message.into()));
    }

    pub fn scroll_recipe(&mut self, delta: i32) {
        let max = self.session.recipe.lines().count().saturating_sub(1) as i32;
        let next = (self.recipe_scroll as i32 + delta).clamp(0, max.max(0));
        self.recipe_scroll = next as u16;
    }

    pub fn move_video_selection(&mut self, delta: isize) {
        let len = self
            .session
            .videos
            .as_ref()
            .map(|lookup| lookup.links().len())
            .unwrap_or(0);
        update_list_state(&mut self.video_state, len, delta);
    }
}

fn update_list_state(state: &mut ListState, len: usize, delta: isize) {
    if len == 0 {
        state.select(None);
        return;
    }

    let current = state.selected().unwrap_or(0);
    let step = delta.unsigned_abs();
    let new_index = if delta < 0 {
        current.saturating_sub(step)
    } else {
        (current + step).min(len - 1)
    };
    state.select(Some(new_index));
}
