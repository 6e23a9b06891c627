//! # Gesture Reader
//!
//! Desktop text reader driven by hand gestures from a live webcam feed.
//! A background worker pulls frames, runs them through the landmark/gesture
//! helper and maps the results to pointer, click and scroll actions; the
//! UI thread owns all widget state and receives status/scroll updates over
//! a bounded channel.

use clap::Parser;

use env_logger::Env;
use gesture_reader::settings::Cli;
use log::debug;
use model::Model;

mod model;
mod ui;

fn main() -> Result<(), eframe::Error> {
    let cli = Cli::parse();

    // Initialize the logger from the environment

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level))
        .filter_module("winit", log::LevelFilter::Warn)
        .filter_module("eframe", log::LevelFilter::Warn)
        .init();

    debug!("Started; args: {:?}", cli);

    let options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(1280.0, 960.0)),
        maximized: true,
        ..Default::default()
    };
    eframe::run_native(
        "Gesture-Based Reader",
        options,
        Box::new(|_cc| Box::new(Model::new(cli))),
    )
}
