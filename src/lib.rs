#![cfg(target_arch = "wasm32")]
use noy_core::GameConfig;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod app;
mod audio;
mod constants;
mod dom;
mod events;
mod input;
mod overlay;
mod scheduler;

use constants::{CONFIG_URL, RESTART_BUTTON_ID, START_BUTTON_ID};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("noy-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// Optional `config.json`; a rejected file falls back to the defaults.
async fn load_config() -> GameConfig {
    let Some(text) = audio::fetch_text(CONFIG_URL).await else {
        return GameConfig::default();
    };
    match GameConfig::from_json(&text) {
        Ok(config) => {
            log::info!("[config] loaded {}", CONFIG_URL);
            config
        }
        Err(e) => {
            log::error!("[config] {} rejected, using defaults: {}", CONFIG_URL, e);
            GameConfig::default()
        }
    }
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let config = load_config().await;
    let app = app::App::new(document.clone(), config)?;

    events::wire_buttons(&app);
    events::wire_field(&app);
    events::wire_global_keydown(&app);
    events::wire_resize(&app);

    // Idle until the start button; audio needs that gesture.
    overlay::show(&document, START_BUTTON_ID);
    overlay::hide(&document, RESTART_BUTTON_ID);
    Ok(())
}
