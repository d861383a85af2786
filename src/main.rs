mod action_bar;
mod app;
mod assets;
mod canvas;
mod clipboard;
mod element;
mod export;
mod geometry;
mod history;
mod interaction;
mod scene;
mod state;
mod theme;
mod toolbar;
mod ui_controls;

use std::path::PathBuf;

use eframe::egui;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let assets_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets"));

    let viewport = egui::ViewportBuilder::default()
        .with_title("TacMark")
        .with_inner_size([1180.0, 800.0])
        .with_min_inner_size([720.0, 520.0]);

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "TacMark",
        options,
        Box::new(move |cc| Box::new(app::TacMarkApp::new(cc, assets_dir))),
    )
}
