use crate::catalog::Catalog;
use crate::config::{self, Config, SliderConfig};
use crate::events::AppEvent;
use crate::gui::theme::{self, ThemeColors};
use crate::gui::track::{self, CARD_HEIGHT, DOTS_HEIGHT, HitTarget, TrackModel};
use crate::gui::{FRAME_INTERVAL_MS, WINDOW_HEIGHT, WINDOW_WIDTH};
use cardslide::{
    Clock, ControlCommand, Point, PointerTarget, SliderEngine, SliderId, SliderRegistry, Step,
    SurfaceState, SystemClock,
};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

type SharedRegistry = Rc<RefCell<SliderRegistry<SurfaceState, SystemClock>>>;

/// Runs `f` on one engine with the registry clock's current time.
fn with_engine<R>(
    registry: &SharedRegistry,
    id: &SliderId,
    f: impl FnOnce(&mut SliderEngine<SurfaceState>, Instant) -> R,
) -> Option<R> {
    let mut registry = registry.borrow_mut();
    let now = registry.clock().now();
    registry.get_mut(id).map(|engine| f(engine, now))
}

/// New track width, applied before any further pointer event reaches the engine.
fn resize_track(
    registry: &SharedRegistry,
    id: &SliderId,
    track: &RefCell<TrackModel>,
    width: f64,
) {
    let layout = {
        let mut track = track.borrow_mut();
        track.width = width;
        track.layout()
    };
    with_engine(registry, id, |engine, _| engine.relayout(&layout));
}

struct TrackRow {
    id: SliderId,
    track: Rc<RefCell<TrackModel>>,
    area: gtk::DrawingArea,
    dots: gtk::DrawingArea,
    prev: gtk::Button,
    next: gtk::Button,
    shown_dots: Option<Vec<bool>>,
}

pub struct AppModel {
    registry: SharedRegistry,
    rows: Vec<TrackRow>,
    /// Row receiving Left/Right keys: the last one touched.
    focused: Option<usize>,
    order_phone: Option<String>,
    status: String,
}

#[derive(Debug)]
pub enum AppMsg {
    Tick,
    Focus(usize),
    Activate(usize, Point),
    Prev(usize),
    Next(usize),
    Dot(usize, f64),
    KeyPrev,
    KeyNext,
    Control(ControlCommand),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Control(command) => AppMsg::Control(command),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, Catalog, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        gtk::ApplicationWindow {
            set_title: Some("Vitrine"),
            set_default_size: (WINDOW_WIDTH, WINDOW_HEIGHT),
            add_css_class: "vitrine-window",

            add_controller = gtk::EventControllerKey {
                set_propagation_phase: gtk::PropagationPhase::Capture,
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match key {
                        gtk::gdk::Key::Left => {
                            sender.input(AppMsg::KeyPrev);
                            glib::Propagation::Stop
                        }
                        gtk::gdk::Key::Right => {
                            sender.input(AppMsg::KeyNext);
                            glib::Propagation::Stop
                        }
                        _ => glib::Propagation::Proceed,
                    }
                }
            },

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,

                gtk::ScrolledWindow {
                    set_vexpand: true,
                    set_hscrollbar_policy: gtk::PolicyType::Never,

                    #[name = "rows"]
                    gtk::Box {
                        set_orientation: gtk::Orientation::Vertical,
                        set_spacing: 8,
                        set_margin_bottom: 24,
                    }
                },

                gtk::Label {
                    add_css_class: "vitrine-status",
                    set_xalign: 0.0,
                    #[watch]
                    set_label: &model.status,
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, catalog, rx) = init;

        theme::load_css();

        let registry: SharedRegistry = Rc::new(RefCell::new(SliderRegistry::new(SystemClock)));

        let mut model = AppModel {
            registry: registry.clone(),
            rows: Vec::new(),
            focused: None,
            order_phone: config.order_phone.clone(),
            status: String::new(),
        };

        let widgets = view_output!();

        for slider in &config.sliders {
            if registry.borrow().get(&slider.id).is_some() {
                log::warn!("Duplicate slider id '{}', skipping", slider.id);
                continue;
            }
            let index = model.rows.len();
            let track = TrackModel::new(slider, catalog.in_category(&slider.category));
            {
                let mut registry = registry.borrow_mut();
                let now = registry.clock().now();
                let layout = track.layout();
                registry.insert(SliderEngine::attach(
                    slider.id.clone(),
                    slider.options,
                    Some(&layout),
                    SurfaceState::new(slider.controls, slider.indicators),
                    now,
                ));
            }
            let (container, row) = build_row(index, slider, track, &registry, &sender);
            widgets.rows.append(&container);
            model.rows.push(row);
        }

        registry.borrow_mut().apply_overrides(&config.autoplay);

        let areas: Vec<(SliderId, gtk::DrawingArea)> = model
            .rows
            .iter()
            .map(|row| (row.id.clone(), row.area.clone()))
            .collect();
        let outside = gtk::GestureClick::new();
        outside.set_button(0);
        outside.set_propagation_phase(gtk::PropagationPhase::Capture);
        {
            let registry = registry.clone();
            let root = root.clone();
            outside.connect_pressed(move |_, _, x, y| {
                let picked = root.pick(x, y, gtk::PickFlags::DEFAULT);
                let inside = picked.and_then(|widget| {
                    areas
                        .iter()
                        .find(|(_, area)| widget == *area || widget.is_ancestor(area))
                        .map(|(id, _)| id)
                });
                registry.borrow_mut().outside_pointer(inside);
            });
        }
        root.add_controller(outside);

        {
            let sender = sender.clone();
            glib::timeout_add_local(Duration::from_millis(FRAME_INTERVAL_MS), move || {
                sender.input(AppMsg::Tick);
                glib::ControlFlow::Continue
            });
        }

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Tick => {
                self.registry.borrow_mut().poll_all();
                let now = Instant::now();
                for index in 0..self.rows.len() {
                    self.sync_row(index, now);
                }
            }
            AppMsg::Focus(index) => self.focused = Some(index),
            AppMsg::Activate(index, at) => self.activate(index, at),
            AppMsg::Prev(index) => {
                self.focused = Some(index);
                self.navigate(index, |engine| engine.prev());
            }
            AppMsg::Next(index) => {
                self.focused = Some(index);
                self.navigate(index, |engine| engine.next());
            }
            AppMsg::Dot(index, x) => {
                self.focused = Some(index);
                let Some(row) = self.rows.get(index) else {
                    return;
                };
                let count = row.shown_dots.as_ref().map_or(0, Vec::len);
                if let Some(dot) = track::dot_at(f64::from(row.dots.width()), count, x) {
                    self.navigate(index, |engine| engine.go_to(dot as isize));
                }
            }
            AppMsg::KeyPrev => {
                if let Some(index) = self.focused {
                    self.navigate(index, |engine| engine.prev());
                }
            }
            AppMsg::KeyNext => {
                if let Some(index) = self.focused {
                    self.navigate(index, |engine| engine.next());
                }
            }
            AppMsg::Control(command) => {
                if !self.registry.borrow_mut().dispatch(&command) {
                    self.status = format!("No slider named '{}'", command.slider());
                }
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => self.reload(&new_config),
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}

impl AppModel {
    fn navigate(&self, index: usize, f: impl FnOnce(&mut SliderEngine<SurfaceState>)) {
        if let Some(row) = self.rows.get(index) {
            with_engine(&self.registry, &row.id, |engine, _| f(engine));
        }
    }

    /// Copies what the engine asked for onto the widgets.
    fn sync_row(&mut self, index: usize, now: Instant) {
        let registry = self.registry.borrow();
        let Some(row) = self.rows.get_mut(index) else {
            return;
        };
        let Some(surface) = registry.get(&row.id).and_then(SliderEngine::surface) else {
            return;
        };

        let moved = row
            .track
            .borrow_mut()
            .motion
            .update(surface.translate, surface.transition, now);
        if moved {
            row.area.queue_draw();
        }

        if surface.dragging {
            row.area.add_css_class("dragging");
        } else {
            row.area.remove_css_class("dragging");
        }

        if let Some(controls) = surface.controls {
            row.prev.set_sensitive(!controls.prev_disabled);
            row.next.set_sensitive(!controls.next_disabled);
        }

        if row.shown_dots != surface.indicators {
            row.shown_dots = surface.indicators.clone();
            row.dots.queue_draw();
        }
    }

    fn activate(&mut self, index: usize, at: Point) {
        let Some(row) = self.rows.get(index) else {
            return;
        };
        let suppressed = with_engine(&self.registry, &row.id, |engine, now| {
            engine.click_suppressed(now)
        })
        .unwrap_or(true);
        if suppressed {
            log::debug!("Click on '{}' swallowed after a swipe", row.id);
            return;
        }

        let mut track = row.track.borrow_mut();
        let hit = track::hit_test(
            track.motion.displayed(),
            track.layout().card_width(),
            f64::from(CARD_HEIGHT),
            track.products.len(),
            at.x,
            at.y,
        );
        match hit {
            HitTarget::Gap => {}
            HitTarget::Card(i) => {
                track.cycle_image(i);
                if let Some(product) = track.products.get(i) {
                    self.status = format!(
                        "{}: {}",
                        product.name,
                        crate::catalog::format_price(product.discounted_price())
                    );
                }
                row.area.queue_draw();
            }
            HitTarget::Order(i) => {
                let Some(product) = track.products.get(i) else {
                    return;
                };
                match &self.order_phone {
                    Some(phone) => {
                        let url = product.order_url(phone);
                        if let Err(e) = std::process::Command::new("xdg-open").arg(&url).spawn() {
                            log::error!("Failed to open order link: {}", e);
                        }
                        self.status = format!("Ordering {}", product.name);
                    }
                    None => {
                        log::info!("No order_phone configured, not ordering '{}'", product.name);
                        self.status = "Set order_phone in config.toml to enable ordering".into();
                    }
                }
            }
        }
    }

    fn reload(&mut self, config: &Config) {
        self.order_phone = config.order_phone.clone();
        let catalog = Catalog::load_or_default(config::catalog_path(config).as_deref());

        for row in &self.rows {
            let Some(slider) = config.sliders.iter().find(|s| s.id == row.id) else {
                log::warn!("Slider '{}' left the config; restart to remove it", row.id);
                continue;
            };
            let layout = {
                let mut track = row.track.borrow_mut();
                track.replace_products(catalog.in_category(&slider.category));
                track.layout()
            };
            with_engine(&self.registry, &row.id, |engine, _| engine.relayout(&layout));
            row.area.queue_draw();
        }
        for slider in &config.sliders {
            if !self.rows.iter().any(|row| row.id == slider.id) {
                log::warn!("New slider '{}' needs a restart", slider.id);
            }
        }

        self.registry.borrow_mut().apply_overrides(&config.autoplay);
        log::info!("Configuration reloaded");
    }
}

fn build_row(
    index: usize,
    slider: &SliderConfig,
    track: TrackModel,
    registry: &SharedRegistry,
    sender: &ComponentSender<AppModel>,
) -> (gtk::Box, TrackRow) {
    let track = Rc::new(RefCell::new(track));
    let id = slider.id.clone();

    let container = gtk::Box::new(gtk::Orientation::Vertical, 4);
    let title = gtk::Label::new(Some(slider.title()));
    title.set_xalign(0.0);
    title.add_css_class("vitrine-row-title");
    container.append(&title);

    let area = gtk::DrawingArea::new();
    area.set_hexpand(true);
    area.set_content_height(CARD_HEIGHT);
    area.add_css_class("vitrine-track");
    {
        let track = track.clone();
        area.set_draw_func(move |area, cr, w, h| {
            let colors = ThemeColors::from_context(&area.style_context());
            if let Err(e) = track::draw(cr, &track.borrow(), &colors, f64::from(w), f64::from(h)) {
                log::error!("Drawing error: {}", e);
            }
        });
    }
    {
        let (registry, track, id) = (registry.clone(), track.clone(), id.clone());
        area.connect_resize(move |area, w, _| {
            resize_track(&registry, &id, &track, f64::from(w));
            area.queue_draw();
        });
    }

    let drag = gtk::GestureDrag::new();
    {
        let (registry, track, id, sender) = (registry.clone(), track.clone(), id.clone(), sender.clone());
        drag.connect_drag_begin(move |_, x, y| {
            let target = {
                let track = track.borrow();
                let hit = track::hit_test(
                    track.motion.displayed(),
                    track.layout().card_width(),
                    f64::from(CARD_HEIGHT),
                    track.products.len(),
                    x,
                    y,
                );
                match hit {
                    HitTarget::Order(_) => PointerTarget::Interactive,
                    _ => PointerTarget::Track,
                }
            };
            with_engine(&registry, &id, |engine, _| engine.pointer_down(Point::new(x, y), target));
            sender.input(AppMsg::Focus(index));
        });
    }
    {
        let (registry, id) = (registry.clone(), id.clone());
        drag.connect_drag_update(move |gesture, dx, dy| {
            let Some((sx, sy)) = gesture.start_point() else {
                return;
            };
            let step = with_engine(&registry, &id, |engine, _| {
                engine.pointer_move(Point::new(sx + dx, sy + dy))
            });
            match step {
                Some(Step::Lock { .. }) => {
                    gesture.set_state(gtk::EventSequenceState::Claimed);
                }
                Some(Step::Reject) => {
                    gesture.set_state(gtk::EventSequenceState::Denied);
                }
                _ => {}
            }
        });
    }
    {
        let (registry, id) = (registry.clone(), id.clone());
        drag.connect_drag_end(move |_, _, _| {
            with_engine(&registry, &id, |engine, now| engine.pointer_up(now));
        });
    }
    {
        let (registry, id) = (registry.clone(), id.clone());
        drag.connect_cancel(move |_, _| {
            with_engine(&registry, &id, |engine, now| engine.pointer_up(now));
        });
    }
    area.add_controller(drag);

    let click = gtk::GestureClick::new();
    {
        let sender = sender.clone();
        click.connect_released(move |_, _, x, y| {
            sender.input(AppMsg::Activate(index, Point::new(x, y)));
        });
    }
    area.add_controller(click);

    let prev = gtk::Button::from_icon_name("go-previous-symbolic");
    let next = gtk::Button::from_icon_name("go-next-symbolic");
    for (button, halign) in [(&prev, gtk::Align::Start), (&next, gtk::Align::End)] {
        button.set_halign(halign);
        button.set_valign(gtk::Align::Center);
        button.add_css_class("vitrine-arrow");
        button.set_visible(slider.controls);
    }
    {
        let sender = sender.clone();
        prev.connect_clicked(move |_| sender.input(AppMsg::Prev(index)));
    }
    {
        let sender = sender.clone();
        next.connect_clicked(move |_| sender.input(AppMsg::Next(index)));
    }

    let overlay = gtk::Overlay::new();
    overlay.set_margin_start(24);
    overlay.set_margin_end(24);
    overlay.set_child(Some(&area));
    overlay.add_overlay(&prev);
    overlay.add_overlay(&next);
    container.append(&overlay);

    let dots = gtk::DrawingArea::new();
    dots.set_content_height(DOTS_HEIGHT);
    dots.set_visible(slider.indicators);
    {
        let (registry, id) = (registry.clone(), id.clone());
        dots.set_draw_func(move |area, cr, w, h| {
            let registry = registry.borrow();
            let Some(indicators) = registry
                .get(&id)
                .and_then(SliderEngine::surface)
                .and_then(|surface| surface.indicators.as_ref())
            else {
                return;
            };
            let colors = ThemeColors::from_context(&area.style_context());
            if let Err(e) = track::draw_dots(cr, indicators, &colors, f64::from(w), f64::from(h)) {
                log::error!("Drawing error: {}", e);
            }
        });
    }
    let dot_click = gtk::GestureClick::new();
    {
        let sender = sender.clone();
        dot_click.connect_released(move |_, _, x, _| sender.input(AppMsg::Dot(index, x)));
    }
    dots.add_controller(dot_click);
    container.append(&dots);

    let row = TrackRow {
        id,
        track,
        area,
        dots,
        prev,
        next,
        shown_dots: None,
    };
    (container, row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_resize_relayouts_engine_immediately() {
        let config = config::parse_config(
            r#"
            [[sliders]]
            id = "tees"
            category = "Sportwear"
            "#,
        )
        .unwrap();
        let catalog = Catalog::from_json(
            r#"[
                { "id": 1, "name": "Tee", "price": 100000, "category": "Sportwear" },
                { "id": 2, "name": "Shorts", "price": 150000, "category": "Sportwear" },
                { "id": 3, "name": "Socks", "price": 40000, "category": "Sportwear" },
                { "id": 4, "name": "Cap", "price": 80000, "category": "Sportwear" },
                { "id": 5, "name": "Band", "price": 20000, "category": "Sportwear" }
            ]"#,
        )
        .unwrap();
        let slider = &config.sliders[0];
        let track = RefCell::new(TrackModel::new(slider, catalog.in_category(&slider.category)));

        let registry: SharedRegistry = Rc::new(RefCell::new(SliderRegistry::new(SystemClock)));
        {
            let mut registry = registry.borrow_mut();
            let now = registry.clock().now();
            let layout = track.borrow().layout();
            registry.insert(SliderEngine::attach(
                slider.id.clone(),
                slider.options,
                Some(&layout),
                SurfaceState::default(),
                now,
            ));
        }
        with_engine(&registry, &slider.id, |engine, _| engine.go_to(2));

        resize_track(&registry, &slider.id, &track, 940.0);

        let registry = registry.borrow();
        let engine = registry.get(&slider.id).unwrap();
        assert_eq!(engine.card_full_width(), 320.0);
        assert_eq!(engine.current_index(), 2);
        assert_eq!(engine.translate(), -640.0);
    }
}
