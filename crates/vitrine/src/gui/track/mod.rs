pub mod model;
pub mod view;

pub use model::{TrackModel, TrackMotion, ViewportLayout};
pub use view::{HitTarget, dot_at, draw, draw_dots, hit_test};

pub const CARD_GAP: f64 = 20.0;
pub const CARD_HEIGHT: i32 = 340;
pub const CARD_RADIUS: f64 = 12.0;
pub const IMAGE_HEIGHT: f64 = 200.0;
pub const ICON_SIZE: i32 = 512;
pub const ORDER_PILL_HEIGHT: f64 = 32.0;
pub const PADDING: f64 = 12.0;
pub const DOT_RADIUS: f64 = 5.0;
pub const DOT_SPACING: f64 = 18.0;
pub const DOTS_HEIGHT: i32 = 24;
