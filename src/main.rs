use log::{debug, info, warn};
use web_sys::{Document, Window};

mod config;
mod dom;
mod error;
mod effects {
    pub mod anchors;
    pub mod clipboard;
    pub mod gradient;
    pub mod hover;
    pub mod nav;
    pub mod reveal;
    pub mod ripple;
    pub mod scroll;
}
mod components {
    pub mod notification;
    pub mod typewriter;
}

use config::EffectsConfig;

fn report(feature: &str, result: error::Result<()>) {
    match result {
        Ok(()) => debug!("{} ready", feature),
        Err(e) => warn!("{} disabled: {}", feature, e),
    }
}

fn mount_all(window: &Window, document: &Document) {
    let config = EffectsConfig::from_document(document).unwrap_or_else(|e| {
        warn!("ignoring page config: {}", e);
        EffectsConfig::default()
    });

    report("notifications", components::notification::mount(document, config.notification));
    report("mobile nav", effects::nav::mount(document, &config.nav));
    report("smooth anchors", effects::anchors::mount(window, document, &config.anchors));
    report("scroll styler", effects::scroll::mount(window, document, &config.scroll));
    report("reveal", effects::reveal::mount(document, &config.reveal));
    report("ripple", effects::ripple::mount(document, &config.ripple));
    report("hover", effects::hover::mount(document, &config.hover));
    report("clipboard", effects::clipboard::mount(window, document, &config.clipboard));
    report("typewriter", components::typewriter::mount(document, &config.typewriter));

    // The loop keeps itself alive through its frame callback and pauses
    // on its own while the tab is hidden
    let gradient = effects::gradient::mount(window, document, &config.gradient);
    report("gradient loop", gradient.map(|handle| {
        if handle.is_none() {
            debug!("gradient loop turned off by config");
        }
    }));
}

fn start() -> error::Result<()> {
    let window = dom::window()?;
    let document = dom::document()?;

    if document.ready_state() == "loading" {
        let ready_window = window.clone();
        let ready_document = document.clone();
        dom::listen(&document, "DOMContentLoaded", move |_| {
            mount_all(&ready_window, &ready_document);
        })?;
    } else {
        mount_all(&window, &document);
    }
    Ok(())
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting site effects");
    if let Err(e) = start() {
        warn!("site effects not started: {}", e);
    }
}
