//! Gesture and position state machine for horizontal card sliders.
//!
//! The engine never touches a rendering toolkit directly. Layout is read
//! through [`Layout`] and every visual effect goes through [`Surface`], so a
//! slider can be driven and inspected entirely from tests.

use std::time::Duration;

pub mod autoplay;
pub mod clock;
pub mod control;
pub mod engine;
pub mod geometry;
pub mod gesture;
pub mod macros;
pub mod navigator;
pub mod options;
pub mod registry;
pub mod surface;

pub use autoplay::Autoplay;
pub use clock::{Clock, ManualClock, SystemClock};
pub use control::{ControlCommand, ControlError};
pub use engine::SliderEngine;
pub use geometry::{CardMetrics, Geometry, Layout, StaticLayout};
pub use gesture::{GestureTracker, Phase, Point, PointerTarget, Step};
pub use navigator::Navigator;
pub use options::{AutoplayOverride, SliderId, SliderOptions};
pub use registry::SliderRegistry;
pub use surface::{Controls, Surface, SurfaceState};

pub const SOCKET_PATH: &str = "/tmp/vitrine.sock";

pub const LOCK_DISTANCE: f64 = 8.0; // px on either axis before a direction is chosen
pub const SWIPE_RATIO: f64 = 4.0; // release must travel card_full_width / SWIPE_RATIO
pub const SWIPE_GUARD: Duration = Duration::from_millis(100);
pub const TRANSITION: Duration = Duration::from_millis(300);

pub const DEFAULT_VISIBLE_COUNT: usize = 3;
pub const DEFAULT_SLIDE_INTERVAL: Duration = Duration::from_millis(5000);
/// Shorter autoplay intervals (including 0 from a config file) are raised to this.
pub const MIN_SLIDE_INTERVAL: Duration = TRANSITION;
