use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub card: Srgba<f64>,
    pub text: Srgba<f64>,
    pub muted: Srgba<f64>,
    pub accent: Srgba<f64>,
    pub placeholder: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            card: Self::lookup_color(
                context,
                "theme_base_color",
                Srgba::new(0.98, 0.98, 0.98, 1.0),
                None,
            ),
            text: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.13, 0.13, 0.13, 1.0),
                None,
            ),
            muted: Self::lookup_color(
                context,
                "theme_unfocused_fg_color",
                Srgba::new(0.45, 0.45, 0.45, 0.8),
                Some(0.6),
            ),
            accent: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(0.85, 0.25, 0.3, 1.0),
                None,
            ),
            placeholder: Self::lookup_color(
                context,
                "theme_bg_color",
                Srgba::new(0.85, 0.85, 0.85, 1.0),
                None,
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.vitrine-row-title {
    font-weight: bold;
    font-size: 1.3em;
    margin: 18px 24px 6px 24px;
}
.vitrine-track.dragging {
    cursor: grabbing;
}
.vitrine-arrow {
    border-radius: 999px;
    min-width: 36px;
    min-height: 36px;
    margin: 0 6px;
}
.vitrine-status {
    margin: 8px 24px;
    opacity: 0.8;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
