use relm4::prelude::*;
use vitrine::catalog::Catalog;
use vitrine::config;
use vitrine::gui::app::AppModel;
use vitrine::sys::runtime;

fn main() {
    env_logger::init();

    let config = config::load_or_setup();
    let catalog = Catalog::load_or_default(config::catalog_path(&config).as_deref());
    log::info!(
        "{} products, {} sliders",
        catalog.products.len(),
        config.sliders.len()
    );

    let (tx, rx) = async_channel::bounded(32);

    if let Err(e) = runtime::start_background_services(tx) {
        log::error!("Control socket and config reload unavailable: {}", e);
    }

    let app = RelmApp::new("org.vitrine.vitrine");

    app.run::<AppModel>((config, catalog, rx));
}
