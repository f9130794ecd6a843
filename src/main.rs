// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

slint::include_modules!();

mod config;
mod error;
mod image_loader;
mod locator;
mod preferences;
mod services;
mod state;
mod ui;

use log::{debug, warn};
use preferences::Preferences;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let default_level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();

    let app = AppWindow::new()?;
    let app_state = state::AppState::new();

    let preferences = Preferences::open_default().unwrap_or_else(|e| {
        warn!("Window state will not be remembered: {}", e);
        Preferences::in_memory()
    });
    debug!("Preferences store: {:?}", preferences.path());
    ui::window_state::attach(&app, preferences);

    // Setup all UI event handlers
    ui::setup_handlers(&app, &app_state);

    app.run()?;

    Ok(())
}
