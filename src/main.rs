//! SegiTelep
//!
//! A segment-based visual teleprompter: import page images, draw timed
//! regions over them, and play the sequence back as a synchronized
//! slideshow with optional audio and a LAN remote control.

mod app;
mod components;
mod constants;
mod core;
mod hotkeys;
mod remote;
mod state;
mod utils;

use dioxus::desktop::{Config, LogicalSize, WindowBuilder};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Configure the window
    let config = Config::new()
        .with_window(
            WindowBuilder::new()
                .with_title("SegiTelep")
                .with_inner_size(LogicalSize::new(1280.0, 800.0))
                .with_resizable(true),
        )
        .with_menu(None); // Disable default menu bar

    // Launch the Dioxus desktop application
    dioxus::LaunchBuilder::desktop()
        .with_cfg(config)
        .launch(app::App);
}
