//! Classifies a pointer sequence as a horizontal swipe or a vertical scroll.
//!
//! Every handler is a transition of `(phase, event)` that returns a [`Step`]
//! describing what the owner has to do. The tracker itself never touches the
//! track, the navigator or the autoplay timer.

use crate::{LOCK_DISTANCE, SWIPE_GUARD};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerTarget {
    #[default]
    Track,
    /// A link or button inside the track. Never starts a gesture.
    Interactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Undecided,
    Horizontal,
    /// Vertical scroll; left alone until the pointer is released.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Nothing to do.
    Ignore,
    /// A gesture opened. Autoplay must stop before any move is handled.
    Begin,
    /// Still inside the lock distance.
    Pending,
    /// Locked horizontally: start live tracking and keep the page from scrolling.
    Lock { translate: f64 },
    /// Locked vertically: let the page scroll.
    Reject,
    Drag { translate: f64 },
    /// A horizontal drag ended after travelling `moved_by` px.
    Release { moved_by: f64 },
    /// Released before any horizontal lock.
    Abandon,
    /// Forced back to idle from outside the tracked region.
    Reset,
}

impl Step {
    /// Whether the host should suppress default scrolling for this event.
    pub fn prevents_default(&self) -> bool {
        matches!(self, Step::Lock { .. } | Step::Drag { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct GestureTracker {
    phase: Phase,
    start: Point,
    last: Point,
    origin_translate: f64,
    translate: f64,
    swipe_guard: Option<Instant>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == Phase::Horizontal
    }

    pub fn origin_translate(&self) -> f64 {
        self.origin_translate
    }

    pub fn pointer_down(&mut self, at: Point, target: PointerTarget, translate: f64) -> Step {
        if target == PointerTarget::Interactive {
            return Step::Ignore;
        }

        self.phase = Phase::Undecided;
        self.start = at;
        self.last = at;
        self.origin_translate = translate;
        self.translate = translate;
        self.swipe_guard = None;
        Step::Begin
    }

    pub fn pointer_move(&mut self, at: Point) -> Step {
        match self.phase {
            Phase::Idle | Phase::Rejected => Step::Ignore,
            Phase::Undecided => {
                self.last = at;
                let (dx, dy) = self.delta();

                if dx.abs() < LOCK_DISTANCE && dy.abs() < LOCK_DISTANCE {
                    return Step::Pending;
                }

                if dx.abs() > dy.abs() {
                    self.phase = Phase::Horizontal;
                    self.translate = self.origin_translate + dx;
                    Step::Lock {
                        translate: self.translate,
                    }
                } else {
                    self.phase = Phase::Rejected;
                    Step::Reject
                }
            }
            Phase::Horizontal => {
                self.last = at;
                let (dx, _) = self.delta();
                self.translate = self.origin_translate + dx;
                Step::Drag {
                    translate: self.translate,
                }
            }
        }
    }

    pub fn pointer_up(&mut self, now: Instant) -> Step {
        let step = match self.phase {
            Phase::Idle => return Step::Ignore,
            Phase::Horizontal => {
                self.swipe_guard = Some(now + SWIPE_GUARD);
                Step::Release {
                    moved_by: self.translate - self.origin_translate,
                }
            }
            Phase::Undecided | Phase::Rejected => Step::Abandon,
        };
        self.phase = Phase::Idle;
        step
    }

    /// Abandons whatever is in flight, including the swipe guard.
    pub fn reset(&mut self) -> Step {
        self.swipe_guard = None;
        if self.phase == Phase::Idle {
            return Step::Ignore;
        }
        self.phase = Phase::Idle;
        Step::Reset
    }

    /// Continues a live drag from `translate`, used after the geometry moved
    /// underneath it.
    pub fn rebase(&mut self, translate: f64) {
        self.origin_translate = translate;
        self.translate = translate;
        self.start = self.last;
    }

    /// True for a short while after a horizontal swipe, so the click the
    /// platform synthesizes from the same touch can be dropped.
    pub fn just_swiped(&self, now: Instant) -> bool {
        self.swipe_guard.is_some_and(|until| now < until)
    }

    pub fn has_pending_guard(&self) -> bool {
        self.swipe_guard.is_some()
    }

    pub fn expire_guard(&mut self, now: Instant) {
        if self.swipe_guard.is_some_and(|until| now >= until) {
            self.swipe_guard = None;
        }
    }

    fn delta(&self) -> (f64, f64) {
        (self.last.x - self.start.x, self.last.y - self.start.y)
    }
}
