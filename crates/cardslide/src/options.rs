use crate::{DEFAULT_SLIDE_INTERVAL, DEFAULT_VISIBLE_COUNT};
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::time::Duration;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct SliderId(String);

crate::impl_string_newtype!(SliderId);

#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderOptions {
    pub visible_count: usize,
    pub auto_slide: bool,
    #[serde(rename = "slide_interval_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub slide_interval: Duration,
}

impl Default for SliderOptions {
    fn default() -> Self {
        Self {
            visible_count: DEFAULT_VISIBLE_COUNT,
            auto_slide: false,
            slide_interval: DEFAULT_SLIDE_INTERVAL,
        }
    }
}

/// Autoplay settings applied to an already running slider.
///
/// An override with `auto_slide = false` leaves the slider untouched; only
/// enabling overrides replace the interval and restart the timer.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoplayOverride {
    pub auto_slide: bool,
    #[serde(rename = "slide_interval_ms", default = "default_interval")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub slide_interval: Duration,
}

impl AutoplayOverride {
    pub fn enabled(slide_interval: Duration) -> Self {
        Self {
            auto_slide: true,
            slide_interval,
        }
    }
}

fn default_interval() -> Duration {
    DEFAULT_SLIDE_INTERVAL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults_fill_missing_fields() {
        let opts: SliderOptions = serde_json::from_str(r#"{ "auto_slide": true }"#).unwrap();
        assert_eq!(opts.visible_count, 3);
        assert!(opts.auto_slide);
        assert_eq!(opts.slide_interval, Duration::from_millis(5000));
    }

    #[test]
    fn test_override_deserialization() {
        let cases = vec![
            (
                r#"{ "auto_slide": true, "slide_interval_ms": 3500 }"#,
                AutoplayOverride::enabled(Duration::from_millis(3500)),
            ),
            (
                r#"{ "auto_slide": false }"#,
                AutoplayOverride {
                    auto_slide: false,
                    slide_interval: Duration::from_millis(5000),
                },
            ),
        ];

        for (json, expected) in cases {
            let parsed: AutoplayOverride = serde_json::from_str(json).unwrap();
            assert_eq!(parsed, expected);
        }
    }

    #[test]
    fn test_slider_id_is_transparent() {
        let id: SliderId = serde_json::from_str("\"casualwear-slider\"").unwrap();
        assert_eq!(id.as_str(), "casualwear-slider");
    }
}
