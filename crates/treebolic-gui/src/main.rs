#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use eframe::egui;
use tracing_subscriber::EnvFilter;

mod app;
mod components;
mod graphics;
mod images;
mod settings;

use app::TreebolicApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1024.0, 768.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Treebolic",
        options,
        Box::new(|cc| Ok(Box::new(TreebolicApp::new(cc)?))),
    )
}
