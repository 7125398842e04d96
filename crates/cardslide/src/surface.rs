/// Write side of the rendered slider.
///
/// Controls and indicator dots are optional parts of the markup, so their
/// methods default to doing nothing.
pub trait Surface {
    fn set_translate(&mut self, px: f64);

    /// Eased transition on (settling) or off (live tracking).
    fn set_transition(&mut self, enabled: bool);

    fn set_dragging(&mut self, dragging: bool);

    fn rebuild_indicators(&mut self, _count: usize) {}

    fn set_active_indicator(&mut self, _index: usize) {}

    fn set_controls(&mut self, _prev_disabled: bool, _next_disabled: bool) {}
}

/// Plain record of everything the engine asked the surface to show.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceState {
    pub translate: f64,
    pub transition: bool,
    pub dragging: bool,
    pub indicators: Option<Vec<bool>>,
    pub controls: Option<Controls>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

impl SurfaceState {
    pub fn new(with_controls: bool, with_indicators: bool) -> Self {
        Self {
            translate: 0.0,
            transition: true,
            dragging: false,
            indicators: with_indicators.then(Vec::new),
            controls: with_controls.then(Controls::default),
        }
    }

    pub fn active_indicator(&self) -> Option<usize> {
        self.indicators.as_ref()?.iter().position(|&on| on)
    }

    pub fn active_count(&self) -> usize {
        self.indicators
            .as_ref()
            .map(|dots| dots.iter().filter(|&&on| on).count())
            .unwrap_or(0)
    }
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl Surface for SurfaceState {
    fn set_translate(&mut self, px: f64) {
        self.translate = px;
    }

    fn set_transition(&mut self, enabled: bool) {
        self.transition = enabled;
    }

    fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    fn rebuild_indicators(&mut self, count: usize) {
        if let Some(dots) = self.indicators.as_mut() {
            *dots = vec![false; count];
            if let Some(first) = dots.first_mut() {
                *first = true;
            }
        }
    }

    fn set_active_indicator(&mut self, index: usize) {
        if let Some(dots) = self.indicators.as_mut() {
            dots.iter_mut()
                .enumerate()
                .for_each(|(i, dot)| *dot = i == index);
        }
    }

    fn set_controls(&mut self, prev_disabled: bool, next_disabled: bool) {
        if let Some(controls) = self.controls.as_mut() {
            *controls = Controls {
                prev_disabled,
                next_disabled,
            };
        }
    }
}
