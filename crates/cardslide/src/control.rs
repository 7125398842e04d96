//! Line protocol spoken on the control socket.
//!
//! ```text
//! next <slider-id>
//! prev <slider-id>
//! goto <slider-id> <index>
//! autoplay <slider-id> <interval-ms>|off
//! ```

use crate::options::SliderId;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
enum Verb {
    Next,
    Prev,
    Goto,
    Autoplay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    Next(SliderId),
    Prev(SliderId),
    GoTo(SliderId, isize),
    /// `None` switches autoplay off.
    Autoplay(SliderId, Option<Duration>),
}

impl ControlCommand {
    pub fn slider(&self) -> &SliderId {
        match self {
            Self::Next(id) | Self::Prev(id) | Self::GoTo(id, _) | Self::Autoplay(id, _) => id,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ControlError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}'")]
    UnknownVerb(String),
    #[error("'{0}' needs a slider id")]
    MissingSlider(String),
    #[error("'{verb}' needs {what}")]
    MissingArgument { verb: String, what: &'static str },
    #[error("Invalid {what} '{value}'")]
    InvalidArgument { what: &'static str, value: String },
    #[error("Unexpected trailing argument '{0}'")]
    Trailing(String),
}

impl FromStr for ControlCommand {
    type Err = ControlError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb_word = words.next().ok_or(ControlError::Empty)?;
        let verb = Verb::from_str(verb_word)
            .map_err(|_| ControlError::UnknownVerb(verb_word.to_string()))?;
        let id = words
            .next()
            .map(SliderId::from)
            .ok_or_else(|| ControlError::MissingSlider(verb.to_string()))?;

        let command = match verb {
            Verb::Next => Self::Next(id),
            Verb::Prev => Self::Prev(id),
            Verb::Goto => {
                let raw = words.next().ok_or(ControlError::MissingArgument {
                    verb: verb.to_string(),
                    what: "an index",
                })?;
                let index = raw.parse().map_err(|_| ControlError::InvalidArgument {
                    what: "index",
                    value: raw.to_string(),
                })?;
                Self::GoTo(id, index)
            }
            Verb::Autoplay => {
                let raw = words.next().ok_or(ControlError::MissingArgument {
                    verb: verb.to_string(),
                    what: "an interval in ms or 'off'",
                })?;
                Self::Autoplay(id, parse_interval(raw)?)
            }
        };

        match words.next() {
            Some(extra) => Err(ControlError::Trailing(extra.to_string())),
            None => Ok(command),
        }
    }
}

fn parse_interval(raw: &str) -> Result<Option<Duration>, ControlError> {
    if raw.eq_ignore_ascii_case("off") {
        return Ok(None);
    }
    match raw.parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Some(Duration::from_millis(ms))),
        _ => Err(ControlError::InvalidArgument {
            what: "interval",
            value: raw.to_string(),
        }),
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next(id) => write!(f, "{} {}", Verb::Next, id),
            Self::Prev(id) => write!(f, "{} {}", Verb::Prev, id),
            Self::GoTo(id, index) => write!(f, "{} {} {}", Verb::Goto, id, index),
            Self::Autoplay(id, Some(interval)) => {
                write!(f, "{} {} {}", Verb::Autoplay, id, interval.as_millis())
            }
            Self::Autoplay(id, None) => write!(f, "{} {} off", Verb::Autoplay, id),
        }
    }
}
