#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use eframe::egui;
use tracing_subscriber::EnvFilter;

mod app;
mod components;
mod screens;
mod settings;
mod theme;

use app::DetectiveApp;
use settings::AppSettings;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = AppSettings::load();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(screens::menu::TITLE)
            .with_inner_size([settings.window_width, settings.window_height]),
        ..Default::default()
    };

    eframe::run_native(
        screens::menu::TITLE,
        options,
        Box::new(|cc| Ok(Box::new(DetectiveApp::new(cc, settings)))),
    )
}
