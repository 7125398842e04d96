pub mod app;
pub mod theme;
pub mod track;

pub const WINDOW_WIDTH: i32 = 1100;
pub const WINDOW_HEIGHT: i32 = 900;
pub const FRAME_INTERVAL_MS: u64 = 16;
