//! Home screen: compose box and feed list.

mod render;
mod update;

use flock_core::feed::{FeedView, Post};
pub use render::render_home;
pub use update::{
    handle_feed_loaded, handle_follow_completed, handle_key, handle_paste, handle_post_created,
    handle_refresh_due, start_fetch,
};

use crate::common::TextField;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HomeFocus {
    #[default]
    Compose,
    Feed,
}

#[derive(Debug, Default)]
pub struct HomeScreen {
    pub view: FeedView,
    pub compose: TextField,
    pub focus: HomeFocus,
    selected: usize,
}

impl HomeScreen {
    /// Index of the highlighted post.
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_post(&self) -> Option<&Post> {
        self.view.posts().get(self.selected)
    }

    pub fn select_next(&mut self) {
        let len = self.view.posts().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keeps the selection inside the post list after it changes.
    fn clamp_selection(&mut self) {
        self.selected = self
            .selected
            .min(self.view.posts().len().saturating_sub(1));
    }
}
