// src/bin/gui.rs
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]
use eframe::egui::ViewportBuilder;
use sonaa::gui;

fn main() {
    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default().with_title("SONaa").with_inner_size([1200.0, 760.0]),
        ..Default::default()
    };

    if let Err(e) = gui::run(options) {
        eprintln!("GUI failed: {}", e);
        std::process::exit(1);
    }
}
