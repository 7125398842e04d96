/// Horizontal box of the representative card, in px.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CardMetrics {
    pub width: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub gap: f64,
}

impl CardMetrics {
    pub fn new(width: f64, gap: f64) -> Self {
        Self {
            width,
            gap,
            ..Default::default()
        }
    }

    /// Pixel step between two neighbouring slides.
    pub fn full_width(&self) -> f64 {
        self.width + self.margin_left + self.margin_right + self.gap
    }
}

/// Read side of the rendered track.
pub trait Layout {
    fn item_count(&self) -> usize;

    /// Metrics of the first card, `None` when the track is empty.
    fn card_metrics(&self) -> Option<CardMetrics>;
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub card_full_width: f64,
    pub item_count: usize,
    pub max_index: usize,
}

impl Geometry {
    /// Resolves the slide step and the last valid index from the current
    /// layout. Without a representative card the previous step is kept.
    pub fn resolve(layout: &dyn Layout, visible_count: usize, previous: &Geometry) -> Self {
        let item_count = layout.item_count();
        let card_full_width = layout
            .card_metrics()
            .map(|m| m.full_width())
            .unwrap_or(previous.card_full_width);

        Self {
            card_full_width,
            item_count,
            max_index: item_count.saturating_sub(visible_count),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    /// Number of indicator dots, one per valid index.
    pub fn indicator_count(&self) -> usize {
        self.max_index + 1
    }
}

/// Fixed layout, handy for hosts that already know their card size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StaticLayout {
    pub items: usize,
    pub metrics: CardMetrics,
}

impl StaticLayout {
    pub fn new(items: usize, metrics: CardMetrics) -> Self {
        Self { items, metrics }
    }
}

impl Layout for StaticLayout {
    fn item_count(&self) -> usize {
        self.items
    }

    fn card_metrics(&self) -> Option<CardMetrics> {
        (self.items > 0).then_some(self.metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_width_includes_margins_and_gap() {
        let metrics = CardMetrics {
            width: 280.0,
            margin_left: 4.0,
            margin_right: 6.0,
            gap: 10.0,
        };
        assert_eq!(metrics.full_width(), 300.0);
    }

    #[test]
    fn test_max_index_saturates() {
        let cases = [(0, 0), (2, 0), (3, 0), (4, 1), (10, 7)];
        for (items, expected) in cases {
            let layout = StaticLayout::new(items, CardMetrics::new(100.0, 0.0));
            let geometry = Geometry::resolve(&layout, 3, &Geometry::default());
            assert_eq!(geometry.max_index, expected, "items = {items}");
        }
    }

    #[test]
    fn test_empty_track_keeps_previous_step() {
        let previous = Geometry {
            card_full_width: 250.0,
            item_count: 5,
            max_index: 2,
        };
        let geometry = Geometry::resolve(&StaticLayout::default(), 3, &previous);

        assert_eq!(geometry.card_full_width, 250.0);
        assert_eq!(geometry.max_index, 0);
        assert!(geometry.is_empty());
    }
}
