use crate::autoplay::Autoplay;
use crate::geometry::{Geometry, Layout};
use crate::gesture::{GestureTracker, Phase, Point, PointerTarget, Step};
use crate::navigator::Navigator;
use crate::options::{AutoplayOverride, SliderId, SliderOptions};
use crate::surface::Surface;
use crate::{MIN_SLIDE_INTERVAL, SWIPE_RATIO};
use std::time::{Duration, Instant};

struct Attached<S> {
    options: SliderOptions,
    geometry: Geometry,
    nav: Navigator,
    gesture: GestureTracker,
    autoplay: Autoplay,
    surface: S,
}

/// One slider instance.
///
/// An engine built without a layout (the container or its track is missing)
/// is detached: it keeps its id but every operation is a no-op.
pub struct SliderEngine<S> {
    id: SliderId,
    inner: Option<Attached<S>>,
}

impl<S: Surface> SliderEngine<S> {
    pub fn attach(
        id: SliderId,
        mut options: SliderOptions,
        layout: Option<&dyn Layout>,
        surface: S,
        now: Instant,
    ) -> Self {
        let Some(layout) = layout else {
            log::debug!("slider '{}' has no track, leaving it inert", id);
            return Self::detached(id);
        };

        options.slide_interval = bounded_interval(&id, options.slide_interval);
        let geometry = Geometry::resolve(layout, options.visible_count, &Geometry::default());
        let mut attached = Attached {
            options,
            geometry,
            nav: Navigator::new(&geometry),
            gesture: GestureTracker::new(),
            autoplay: Autoplay::new(options.auto_slide, options.slide_interval),
            surface,
        };

        attached
            .surface
            .rebuild_indicators(geometry.indicator_count());
        attached.go_to(0);
        attached.autoplay.resume(now);

        log::debug!(
            "slider '{}' attached: {} items, max index {}, step {}px",
            id,
            geometry.item_count,
            geometry.max_index,
            geometry.card_full_width
        );

        Self {
            id,
            inner: Some(attached),
        }
    }

    pub fn detached(id: SliderId) -> Self {
        Self { id, inner: None }
    }

    pub fn id(&self) -> &SliderId {
        &self.id
    }

    pub fn is_attached(&self) -> bool {
        self.inner.is_some()
    }

    pub fn current_index(&self) -> usize {
        self.inner.as_ref().map_or(0, |a| a.nav.current_index())
    }

    pub fn max_index(&self) -> usize {
        self.inner.as_ref().map_or(0, |a| a.nav.max_index())
    }

    pub fn translate(&self) -> f64 {
        self.inner.as_ref().map_or(0.0, |a| a.nav.current_translate())
    }

    pub fn card_full_width(&self) -> f64 {
        self.inner.as_ref().map_or(0.0, |a| a.nav.card_full_width())
    }

    pub fn phase(&self) -> Phase {
        self.inner.as_ref().map_or(Phase::Idle, |a| a.gesture.phase())
    }

    pub fn options(&self) -> Option<&SliderOptions> {
        self.inner.as_ref().map(|a| &a.options)
    }

    pub fn is_autoplaying(&self) -> bool {
        self.inner.as_ref().is_some_and(|a| a.autoplay.is_running())
    }

    /// Whether a swipe guard or other gesture-owned timer is still pending.
    pub fn has_pending_gesture_timer(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|a| a.gesture.has_pending_guard())
    }

    pub fn surface(&self) -> Option<&S> {
        self.inner.as_ref().map(|a| &a.surface)
    }

    pub fn go_to(&mut self, target: isize) {
        if let Some(a) = self.inner.as_mut() {
            a.go_to(target);
        }
    }

    pub fn next(&mut self) {
        let target = self.current_index() as isize + 1;
        self.go_to(target);
    }

    pub fn prev(&mut self) {
        let target = self.current_index() as isize - 1;
        self.go_to(target);
    }

    pub fn pointer_down(&mut self, at: Point, target: PointerTarget) -> Step {
        let Some(a) = self.inner.as_mut() else {
            return Step::Ignore;
        };
        if a.geometry.is_empty() {
            return Step::Ignore;
        }
        if a.gesture.is_dragging() {
            // previous drag never saw its release
            log::debug!("slider '{}' settling a drag cut short by a new press", self.id);
            a.gesture.reset();
            a.surface.set_transition(true);
            a.surface.set_dragging(false);
            let index = a.nav.current_index() as isize;
            a.go_to(index);
        }

        let step = a
            .gesture
            .pointer_down(at, target, a.nav.current_translate());
        if step == Step::Begin {
            // must happen before the first move is processed
            a.autoplay.stop();
        }
        step
    }

    pub fn pointer_move(&mut self, at: Point) -> Step {
        let Some(a) = self.inner.as_mut() else {
            return Step::Ignore;
        };

        let step = a.gesture.pointer_move(at);
        match step {
            Step::Lock { translate } => {
                a.surface.set_transition(false);
                a.surface.set_dragging(true);
                a.drag_to(translate);
            }
            Step::Drag { translate } => a.drag_to(translate),
            Step::Reject => log::trace!("slider '{}' yielding to vertical scroll", self.id),
            _ => {}
        }
        step
    }

    /// Pointer released or cancelled.
    pub fn pointer_up(&mut self, now: Instant) -> Step {
        let Some(a) = self.inner.as_mut() else {
            return Step::Ignore;
        };

        let step = a.gesture.pointer_up(now);
        match step {
            Step::Release { moved_by } => {
                a.surface.set_transition(true);
                a.surface.set_dragging(false);
                let target = a.nav.release_target(moved_by, SWIPE_RATIO);
                log::trace!(
                    "slider '{}' released after {}px, target {}",
                    self.id,
                    moved_by,
                    target
                );
                a.go_to(target);
                a.autoplay.resume(now);
            }
            Step::Abandon => a.autoplay.resume(now),
            _ => {}
        }
        step
    }

    /// Pointer activity somewhere outside this slider's track.
    pub fn outside_pointer(&mut self, now: Instant) -> Step {
        let Some(a) = self.inner.as_mut() else {
            return Step::Ignore;
        };

        let was_dragging = a.gesture.is_dragging();
        let step = a.gesture.reset();
        if step == Step::Reset {
            log::debug!("slider '{}' gesture abandoned off-track", self.id);
            a.surface.set_dragging(false);
            a.surface.set_transition(true);
            if was_dragging {
                let index = a.nav.current_index() as isize;
                a.go_to(index);
            }
            a.autoplay.resume(now);
        }
        step
    }

    /// Re-reads the layout after a resize or an item count change and
    /// re-clamps the position against it.
    pub fn relayout(&mut self, layout: &dyn Layout) {
        let Some(a) = self.inner.as_mut() else {
            return;
        };

        let geometry = Geometry::resolve(layout, a.options.visible_count, &a.geometry);
        if geometry.max_index != a.geometry.max_index {
            a.surface.rebuild_indicators(geometry.indicator_count());
        }
        a.geometry = geometry;
        a.nav.set_geometry(&geometry);

        let index = a.nav.current_index() as isize;
        a.go_to(index);

        if a.gesture.is_dragging() {
            a.gesture.rebase(a.nav.current_translate());
        }
    }

    /// Advances time: expires the swipe guard and runs a due autoplay tick.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(a) = self.inner.as_mut() else {
            return false;
        };

        a.gesture.expire_guard(now);
        if !a.autoplay.poll(now) {
            return false;
        }
        if a.gesture.is_active() {
            return false;
        }

        let target = a.nav.autoplay_target();
        a.go_to(target);
        true
    }

    /// True while a click synthesized by a swipe should be swallowed.
    pub fn click_suppressed(&self, now: Instant) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|a| a.gesture.just_swiped(now))
    }

    pub fn apply_override(&mut self, ov: AutoplayOverride, now: Instant) {
        let Some(a) = self.inner.as_mut() else {
            return;
        };
        if !ov.auto_slide {
            return;
        }

        let interval = bounded_interval(&self.id, ov.slide_interval);
        a.options.auto_slide = true;
        a.options.slide_interval = interval;
        a.autoplay.reconfigure(true, interval, now);
        if a.gesture.is_active() {
            // resumes on release
            a.autoplay.stop();
        }
        log::info!(
            "slider '{}' autoplay every {}ms",
            self.id,
            interval.as_millis()
        );
    }

    pub fn disable_autoplay(&mut self, now: Instant) {
        if let Some(a) = self.inner.as_mut() {
            a.options.auto_slide = false;
            a.autoplay.reconfigure(false, a.options.slide_interval, now);
            log::info!("slider '{}' autoplay off", self.id);
        }
    }
}

/// Autoplay never ticks faster than a slide can finish.
fn bounded_interval(id: &SliderId, interval: Duration) -> Duration {
    if interval < MIN_SLIDE_INTERVAL {
        log::warn!(
            "slider '{}' autoplay interval {}ms raised to {}ms",
            id,
            interval.as_millis(),
            MIN_SLIDE_INTERVAL.as_millis()
        );
        return MIN_SLIDE_INTERVAL;
    }
    interval
}

impl<S: Surface> Attached<S> {
    fn go_to(&mut self, target: isize) {
        let index = self.nav.go_to(target);
        self.surface.set_active_indicator(index);
        self.surface
            .set_controls(self.nav.at_start(), self.nav.at_end());
        self.surface.set_translate(self.nav.current_translate());
    }

    fn drag_to(&mut self, translate: f64) {
        self.nav.drag_to(translate);
        self.surface.set_translate(translate);
    }
}

impl<S> std::fmt::Debug for SliderEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SliderEngine")
            .field("id", &self.id)
            .field("attached", &self.inner.is_some())
            .finish()
    }
}
