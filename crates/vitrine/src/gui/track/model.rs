use super::{CARD_GAP, ICON_SIZE};
use crate::catalog::Product;
use crate::config::SliderConfig;
use cardslide::{CardMetrics, Layout, TRANSITION};
use gdk_pixbuf::Pixbuf;
use std::time::Instant;

/// Cards laid out to fill the visible width exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportLayout {
    pub width: f64,
    pub items: usize,
    pub visible_count: usize,
    pub gap: f64,
}

impl ViewportLayout {
    pub fn card_width(&self) -> f64 {
        let visible = self.visible_count.max(1) as f64;
        ((self.width - self.gap * (visible - 1.0)) / visible).max(1.0)
    }
}

impl Layout for ViewportLayout {
    fn item_count(&self) -> usize {
        self.items
    }

    fn card_metrics(&self) -> Option<CardMetrics> {
        (self.items > 0).then(|| CardMetrics::new(self.card_width(), self.gap))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Animation {
    from: f64,
    to: f64,
    started: Instant,
}

impl Animation {
    fn sample(&self, now: Instant) -> f64 {
        let t = (now.saturating_duration_since(self.started).as_secs_f64()
            / TRANSITION.as_secs_f64())
        .min(1.0);
        self.from + (self.to - self.from) * t
    }

    fn finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= TRANSITION
    }
}

/// Displayed track offset, trailing the engine's translate with a linear
/// transition when the surface asks for one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackMotion {
    displayed: f64,
    target: f64,
    animation: Option<Animation>,
}

impl TrackMotion {
    pub fn displayed(&self) -> f64 {
        self.displayed
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Follows `target`; returns true when the displayed offset changed.
    pub fn update(&mut self, target: f64, transition: bool, now: Instant) -> bool {
        if target != self.target {
            self.target = target;
            self.animation = transition.then_some(Animation {
                from: self.displayed,
                to: target,
                started: now,
            });
            if !transition {
                let changed = self.displayed != target;
                self.displayed = target;
                return changed;
            }
        }

        let Some(animation) = self.animation else {
            return false;
        };
        let before = self.displayed;
        if animation.finished(now) {
            self.displayed = animation.to;
            self.animation = None;
        } else {
            self.displayed = animation.sample(now);
        }
        before != self.displayed
    }
}

pub struct TrackModel {
    pub products: Vec<Product>,
    pub pixbufs: Vec<Option<Pixbuf>>,
    pub visible_count: usize,
    pub width: f64,
    pub motion: TrackMotion,
}

impl TrackModel {
    pub fn new(config: &SliderConfig, products: Vec<Product>) -> Self {
        let pixbufs = products.iter().map(Self::load_image).collect();
        Self {
            products,
            pixbufs,
            visible_count: config.options.visible_count,
            width: 0.0,
            motion: TrackMotion::default(),
        }
    }

    fn load_image(product: &Product) -> Option<Pixbuf> {
        let path = product.current_image()?;
        match Pixbuf::from_file_at_scale(path, ICON_SIZE, ICON_SIZE, true) {
            Ok(p) => Some(p),
            Err(e) => {
                log::debug!("No image for '{}' at {}: {}", product.name, path.display(), e);
                None
            }
        }
    }

    pub fn layout(&self) -> ViewportLayout {
        ViewportLayout {
            width: self.width,
            items: self.products.len(),
            visible_count: self.visible_count,
            gap: CARD_GAP,
        }
    }

    /// Swaps in new products after a config or catalog reload.
    pub fn replace_products(&mut self, products: Vec<Product>) {
        self.pixbufs = products.iter().map(Self::load_image).collect();
        self.products = products;
    }

    pub fn cycle_image(&mut self, index: usize) {
        if let Some(product) = self.products.get_mut(index) {
            product.next_image();
            self.pixbufs[index] = Self::load_image(product);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_cards_fill_viewport() {
        let layout = ViewportLayout {
            width: 940.0,
            items: 5,
            visible_count: 3,
            gap: 20.0,
        };
        assert_eq!(layout.card_width(), 300.0);
        assert_eq!(layout.card_metrics().unwrap().full_width(), 320.0);
    }

    #[test]
    fn test_empty_viewport_has_no_metrics() {
        let layout = ViewportLayout {
            width: 940.0,
            items: 0,
            visible_count: 3,
            gap: 20.0,
        };
        assert!(layout.card_metrics().is_none());
    }

    #[test]
    fn test_replaced_products_drive_layout() {
        let config = crate::config::parse_config(
            r#"
            [[sliders]]
            id = "caps"
            category = "CapsHats"
            visible_count = 2
            "#,
        )
        .unwrap();
        let catalog = crate::catalog::Catalog::from_json(
            r#"[
                { "id": 1, "name": "Cap", "price": 90000, "category": "CapsHats" },
                { "id": 2, "name": "Bucket Hat", "price": 120000, "category": "CapsHats" },
                { "id": 3, "name": "Beanie", "price": 75000, "category": "CapsHats" }
            ]"#,
        )
        .unwrap();
        let slider = &config.sliders[0];

        let mut track = TrackModel::new(slider, Vec::new());
        assert_eq!(track.layout().items, 0);
        assert!(track.layout().card_metrics().is_none());

        track.width = 620.0;
        track.replace_products(catalog.in_category(&slider.category));
        let layout = track.layout();
        assert_eq!(layout.items, 3);
        assert_eq!(layout.visible_count, 2);
        assert_eq!(layout.card_width(), 300.0);
        assert_eq!(track.pixbufs.len(), 3);
        assert!(track.pixbufs.iter().all(Option::is_none));
    }

    #[test]
    fn test_motion_jumps_without_transition() {
        let mut motion = TrackMotion::default();
        let now = Instant::now();

        assert!(motion.update(-45.0, false, now));
        assert_eq!(motion.displayed(), -45.0);
        assert!(!motion.update(-45.0, false, now));
    }

    #[test]
    fn test_motion_interpolates_linearly() {
        let mut motion = TrackMotion::default();
        let t0 = Instant::now();

        motion.update(-300.0, true, t0);
        motion.update(-300.0, true, t0 + TRANSITION / 2);
        assert!((motion.displayed() + 150.0).abs() < 1e-6);
        assert!(motion.is_animating());

        motion.update(-300.0, true, t0 + TRANSITION + Duration::from_millis(1));
        assert_eq!(motion.displayed(), -300.0);
        assert!(!motion.is_animating());
    }

    #[test]
    fn test_motion_retargets_from_current_position() {
        let mut motion = TrackMotion::default();
        let t0 = Instant::now();

        motion.update(-300.0, true, t0);
        motion.update(-300.0, true, t0 + TRANSITION / 2);
        motion.update(0.0, true, t0 + TRANSITION / 2);
        motion.update(0.0, true, t0 + TRANSITION);

        assert!((motion.displayed() + 75.0).abs() < 1e-6);
    }
}
