use crate::geometry::Geometry;

/// Committed slide position. `current_translate` only leaves
/// `-(current_index * card_full_width)` while a drag is live.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Navigator {
    current_index: usize,
    max_index: usize,
    card_full_width: f64,
    current_translate: f64,
    prev_translate: f64,
}

impl Navigator {
    pub fn new(geometry: &Geometry) -> Self {
        let mut nav = Self::default();
        nav.set_geometry(geometry);
        nav
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn max_index(&self) -> usize {
        self.max_index
    }

    pub fn card_full_width(&self) -> f64 {
        self.card_full_width
    }

    pub fn current_translate(&self) -> f64 {
        self.current_translate
    }

    pub fn prev_translate(&self) -> f64 {
        self.prev_translate
    }

    pub fn at_start(&self) -> bool {
        self.current_index == 0
    }

    pub fn at_end(&self) -> bool {
        self.current_index == self.max_index
    }

    /// Takes new geometry without moving; callers re-clamp with [`Self::go_to`].
    pub fn set_geometry(&mut self, geometry: &Geometry) {
        self.max_index = geometry.max_index;
        self.card_full_width = geometry.card_full_width;
    }

    /// Clamps `target` into `0..=max_index` and snaps to it. Returns the
    /// committed index.
    pub fn go_to(&mut self, target: isize) -> usize {
        let index = target.clamp(0, self.max_index as isize) as usize;
        self.current_index = index;
        self.current_translate = self.settled_translate();
        self.prev_translate = self.current_translate;
        index
    }

    /// Live translate during a drag. No clamping.
    pub fn drag_to(&mut self, translate: f64) {
        self.current_translate = translate;
    }

    /// Index a release lands on after travelling `moved_by` px.
    pub fn release_target(&self, moved_by: f64, ratio: f64) -> isize {
        let index = self.current_index as isize;
        if moved_by.abs() > self.card_full_width / ratio {
            if moved_by < 0.0 { index + 1 } else { index - 1 }
        } else {
            index
        }
    }

    /// Next autoplay stop; wraps to the first slide from the last one.
    pub fn autoplay_target(&self) -> isize {
        if self.current_index >= self.max_index {
            0
        } else {
            self.current_index as isize + 1
        }
    }

    fn settled_translate(&self) -> f64 {
        -(self.current_index as f64 * self.card_full_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SWIPE_RATIO;
    use proptest::prelude::*;

    fn nav(max_index: usize, width: f64) -> Navigator {
        Navigator::new(&Geometry {
            card_full_width: width,
            item_count: max_index + 3,
            max_index,
        })
    }

    proptest! {
        #[test]
        fn test_go_to_always_clamps(target in any::<i32>(), max_index in 0usize..50) {
            let mut nav = nav(max_index, 120.0);
            let index = nav.go_to(target as isize);

            prop_assert_eq!(index, (target as i64).clamp(0, max_index as i64) as usize);
            prop_assert_eq!(nav.current_index(), index);
            prop_assert_eq!(nav.current_translate(), -(index as f64 * 120.0));
            prop_assert_eq!(nav.prev_translate(), nav.current_translate());
        }
    }

    #[test]
    fn test_release_past_quarter_advances() {
        let nav = nav(5, 300.0);
        assert_eq!(nav.release_target(-76.0, SWIPE_RATIO), 1);
        assert_eq!(nav.release_target(-75.0, SWIPE_RATIO), 0);
        assert_eq!(nav.release_target(-50.0, SWIPE_RATIO), 0);
    }

    #[test]
    fn test_release_to_the_right_goes_back() {
        let mut nav = nav(5, 300.0);
        nav.go_to(2);
        assert_eq!(nav.release_target(90.0, SWIPE_RATIO), 1);
    }

    #[test]
    fn test_autoplay_wraps_from_last() {
        let mut nav = nav(3, 100.0);
        nav.go_to(2);
        assert_eq!(nav.autoplay_target(), 3);
        nav.go_to(3);
        assert_eq!(nav.autoplay_target(), 0);
    }

    #[test]
    fn test_empty_track_pins_to_zero() {
        let mut nav = nav(0, 0.0);
        assert_eq!(nav.go_to(4), 0);
        assert!(nav.at_start() && nav.at_end());
        assert_eq!(nav.autoplay_target(), 0);
    }
}
