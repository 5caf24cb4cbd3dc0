//! Shared building blocks for TUI slices.

mod task;
mod text;
mod text_field;

pub use task::{TaskId, TaskSeq};
pub use text::{mask, scroll_to_cursor, truncate_with_ellipsis};
pub use text_field::TextField;
