//! # sigmet-app
//!
//! WASM entry point of the SIGMET plot viewer. Installs the panic hook and
//! the tracing layer, reads the configuration and attaches the viewer to the
//! plot in the current document.

use leptos::task::Executor;
use sigmet_dom::{document, required, DomResult, Viewer, ViewerConfig};
use std::cell::RefCell;
use tracing::Level;
use tracing_subscriber::prelude::*;
use wasm_bindgen::prelude::*;

thread_local! {
    static VIEWER: RefCell<Option<Viewer>> = const { RefCell::new(None) };
}

/// Tracing level for a configured name; unknown names give `INFO`
pub fn max_level(name: &str) -> Level {
    name.trim().parse().unwrap_or(Level::INFO)
}

fn init_tracing(config: &ViewerConfig) {
    let layer_config = tracing_wasm::WASMLayerConfigBuilder::new()
        .set_max_level(max_level(&config.log_level))
        .build();
    // A second start keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(tracing_wasm::WASMLayer::new(layer_config))
        .try_init();
}

fn load_config() -> ViewerConfig {
    document()
        .and_then(|doc| required(&doc, "outermost"))
        .map(|outermost| ViewerConfig::from_element(&outermost))
        .unwrap_or_default()
}

fn attach(config: ViewerConfig) -> DomResult<()> {
    let viewer = Viewer::start(document()?, config)?;
    VIEWER.with(|slot| *slot.borrow_mut() = Some(viewer));
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let config = load_config();
    init_tracing(&config);
    if Executor::init_wasm_bindgen().is_err() {
        tracing::debug!("Async executor already initialized");
    }

    attach(config).map_err(|e| {
        tracing::error!("SIGMET viewer not started: {}", e);
        JsValue::from_str(&e.to_string())
    })
}
