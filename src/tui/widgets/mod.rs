pub mod input_buffer;
pub mod markdown;
pub mod scroll_pane;
