use crate::clock::Clock;
use crate::control::ControlCommand;
use crate::engine::SliderEngine;
use crate::options::{AutoplayOverride, SliderId};
use crate::surface::Surface;
use std::collections::HashMap;

/// Sliders on one page, keyed by id. Instances never share state; the
/// registry only routes commands and time to them.
pub struct SliderRegistry<S, C> {
    sliders: HashMap<SliderId, SliderEngine<S>>,
    order: Vec<SliderId>,
    clock: C,
}

impl<S: Surface, C: Clock> SliderRegistry<S, C> {
    pub fn new(clock: C) -> Self {
        Self {
            sliders: HashMap::new(),
            order: Vec::new(),
            clock,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Registers an engine, replacing any previous one with the same id.
    pub fn insert(&mut self, engine: SliderEngine<S>) {
        let id = engine.id().clone();
        if self.sliders.insert(id.clone(), engine).is_none() {
            self.order.push(id);
        }
    }

    pub fn remove(&mut self, id: &SliderId) -> Option<SliderEngine<S>> {
        self.order.retain(|o| o != id);
        self.sliders.remove(id)
    }

    pub fn get(&self, id: &SliderId) -> Option<&SliderEngine<S>> {
        self.sliders.get(id)
    }

    pub fn get_mut(&mut self, id: &SliderId) -> Option<&mut SliderEngine<S>> {
        self.sliders.get_mut(id)
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> &[SliderId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SliderEngine<S>> {
        self.order.iter().filter_map(|id| self.sliders.get(id))
    }

    /// Polls every slider; returns the ids that moved.
    pub fn poll_all(&mut self) -> Vec<SliderId> {
        let now = self.clock.now();
        self.sliders
            .iter_mut()
            .filter_map(|(id, engine)| engine.poll(now).then(|| id.clone()))
            .collect()
    }

    /// Applies post-initialisation autoplay overrides. Unknown ids are skipped.
    pub fn apply_overrides(&mut self, overrides: &HashMap<SliderId, AutoplayOverride>) {
        let now = self.clock.now();
        for (id, ov) in overrides {
            match self.sliders.get_mut(id) {
                Some(engine) => engine.apply_override(*ov, now),
                None => log::warn!("autoplay override for unknown slider '{}'", id),
            }
        }
    }

    /// Pointer activity landed outside `except` (or outside every slider).
    pub fn outside_pointer(&mut self, except: Option<&SliderId>) {
        let now = self.clock.now();
        self.sliders
            .iter_mut()
            .filter(|(id, _)| Some(*id) != except)
            .for_each(|(_, engine)| {
                engine.outside_pointer(now);
            });
    }

    /// Runs a control command. Returns false when the slider is unknown.
    pub fn dispatch(&mut self, command: &ControlCommand) -> bool {
        let now = self.clock.now();
        let Some(engine) = self.sliders.get_mut(command.slider()) else {
            log::warn!("command '{}' for unknown slider", command);
            return false;
        };

        match command {
            ControlCommand::Next(_) => engine.next(),
            ControlCommand::Prev(_) => engine.prev(),
            ControlCommand::GoTo(_, index) => engine.go_to(*index),
            ControlCommand::Autoplay(_, Some(interval)) => {
                engine.apply_override(AutoplayOverride::enabled(*interval), now)
            }
            ControlCommand::Autoplay(_, None) => engine.disable_autoplay(now),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::geometry::{CardMetrics, StaticLayout};
    use crate::options::SliderOptions;
    use crate::surface::SurfaceState;
    use std::time::Duration;

    fn registry(ids: &[&str]) -> (SliderRegistry<SurfaceState, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let mut registry = SliderRegistry::new(clock.clone());
        let layout = StaticLayout::new(8, CardMetrics::new(240.0, 16.0));
        for id in ids {
            registry.insert(SliderEngine::attach(
                SliderId::new(*id),
                SliderOptions::default(),
                Some(&layout),
                SurfaceState::default(),
                clock.now(),
            ));
        }
        (registry, clock)
    }

    #[test]
    fn test_overrides_start_only_named_sliders() {
        let (mut registry, clock) = registry(&["casualwear-slider", "accessories-slider"]);
        let overrides = HashMap::from([
            (
                SliderId::new("casualwear-slider"),
                AutoplayOverride::enabled(Duration::from_millis(4000)),
            ),
            (
                SliderId::new("CapsHats-slider"),
                AutoplayOverride::enabled(Duration::from_millis(3500)),
            ),
        ]);

        registry.apply_overrides(&overrides);
        clock.advance(Duration::from_millis(4000));
        let moved = registry.poll_all();

        assert_eq!(moved, vec![SliderId::new("casualwear-slider")]);
        let casual = registry.get(&SliderId::new("casualwear-slider")).unwrap();
        assert_eq!(casual.current_index(), 1);
        let accessories = registry.get(&SliderId::new("accessories-slider")).unwrap();
        assert!(!accessories.is_autoplaying());
    }

    #[test]
    fn test_dispatch_routes_by_id() {
        let (mut registry, _clock) = registry(&["a", "b"]);

        assert!(registry.dispatch(&ControlCommand::GoTo(SliderId::new("b"), 3)));
        assert!(registry.dispatch(&ControlCommand::Prev(SliderId::new("b"))));
        assert!(!registry.dispatch(&ControlCommand::Next(SliderId::new("zzz"))));

        assert_eq!(registry.get(&SliderId::new("a")).unwrap().current_index(), 0);
        assert_eq!(registry.get(&SliderId::new("b")).unwrap().current_index(), 2);
    }

    #[test]
    fn test_dispatch_autoplay_off() {
        let (mut registry, clock) = registry(&["a"]);
        let id = SliderId::new("a");

        registry.dispatch(&ControlCommand::Autoplay(id.clone(), Some(Duration::from_millis(100))));
        assert!(registry.get(&id).unwrap().is_autoplaying());

        registry.dispatch(&ControlCommand::Autoplay(id.clone(), None));
        clock.advance(Duration::from_secs(1));
        assert!(registry.poll_all().is_empty());
    }

    #[test]
    fn test_outside_pointer_spares_the_touched_slider() {
        let (mut registry, _clock) = registry(&["a", "b"]);
        let (a, b) = (SliderId::new("a"), SliderId::new("b"));
        for id in [&a, &b] {
            let engine = registry.get_mut(id).unwrap();
            engine.pointer_down(Default::default(), Default::default());
        }

        registry.outside_pointer(Some(&a));

        assert!(registry.get(&a).unwrap().phase() != crate::Phase::Idle);
        assert_eq!(registry.get(&b).unwrap().phase(), crate::Phase::Idle);
    }

    #[test]
    fn test_insert_keeps_order_and_replaces() {
        let (mut registry, clock) = registry(&["x", "y"]);
        registry.insert(SliderEngine::attach(
            SliderId::new("x"),
            SliderOptions::default(),
            None,
            SurfaceState::default(),
            clock.now(),
        ));

        assert_eq!(registry.ids(), &[SliderId::new("x"), SliderId::new("y")]);
        assert!(!registry.get(&SliderId::new("x")).unwrap().is_attached());
        assert_eq!(registry.len(), 2);
    }
}
