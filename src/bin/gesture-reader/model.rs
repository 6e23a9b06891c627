use std::{sync::mpsc::Receiver, time::Duration};

use crate::ui;

use egui::TextureHandle;
use log::{error, info};

use gesture_reader::{
    interpreter::STATUS_NO_GESTURE,
    settings::Cli,
    worker::{self, UiEvent, WorkerHandle},
};

pub const FONT_SIZE_DEFAULT: f32 = 18.0;
pub const FONT_SIZE_MIN: f32 = 8.0;
pub const FONT_SIZE_STEP: f32 = 2.0;

const WORKER_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

pub struct Model {
    pub text: String,
    pub file_path: String,
    pub font_size: f32,
    pub status: String,
    /// Offset of the text view as of the last rendered frame
    pub scroll_offset: egui::Vec2,
    /// Target offset to apply on the next rendered frame
    pub scroll_override: Option<egui::Vec2>,
    pub preview: Option<TextureHandle>,
    events: Receiver<UiEvent>,
    worker: Option<WorkerHandle>,
}

impl Model {
    pub fn new(cli: Cli) -> Self {
        let (worker, events) = worker::spawn(&cli);

        let mut model = Model {
            text: String::new(),
            file_path: cli.reader_file.unwrap_or_default(),
            font_size: FONT_SIZE_DEFAULT,
            status: String::from(STATUS_NO_GESTURE),
            scroll_offset: egui::Vec2::ZERO,
            scroll_override: None,
            preview: None,
            events,
            worker: Some(worker),
        };
        if !model.file_path.is_empty() {
            model.load_file();
        }

        info!("Gesture Reader started OK");
        model
    }

    /// Load the selected text file into the view. On failure the error is
    /// logged and the current text is left unmodified.
    pub fn load_file(&mut self) {
        match std::fs::read_to_string(&self.file_path) {
            Ok(contents) => {
                info!("Loaded \"{}\" ({} bytes)", self.file_path, contents.len());
                self.text = contents;
                self.scroll_override = Some(egui::Vec2::ZERO);
            }
            Err(e) => error!("Error loading file \"{}\": {}", self.file_path, e),
        }
    }

    pub fn adjust_font(&mut self, delta: f32) {
        let next = self.font_size + delta;
        if next >= FONT_SIZE_MIN {
            self.font_size = next;
        }
    }

    /// One scroll unit corresponds to one line of text at the current size
    fn line_height(&self) -> f32 {
        self.font_size * 1.4
    }

    fn apply_scroll(&mut self, delta: egui::Vec2) {
        let target = self.scroll_override.unwrap_or(self.scroll_offset) + delta;
        self.scroll_override = Some(target.max(egui::Vec2::ZERO));
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                UiEvent::Status(status) => self.status = status,
                UiEvent::ScrollVertical(units) => {
                    self.apply_scroll(egui::vec2(0., units as f32 * self.line_height()));
                }
                UiEvent::ScrollHorizontal(units) => {
                    self.apply_scroll(egui::vec2(units as f32 * self.line_height(), 0.));
                }
                UiEvent::Preview(image) => {
                    self.preview = Some(ctx.load_texture(
                        "camera_preview",
                        image,
                        egui::TextureOptions::LINEAR,
                    ));
                }
                UiEvent::Stopped(reason) => self.status = reason,
            }
        }
    }

    pub fn stop_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            info!("Stopping gesture worker...");
            worker.shutdown(WORKER_SHUTDOWN_TIMEOUT);
        }
    }
}

impl eframe::App for Model {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.drain_events(ctx);
        ui::render_ui(ctx, frame, self);
        // Keep polling worker events even when there is no input
        ctx.request_repaint_after(Duration::from_millis(33));
    }

    fn on_close_event(&mut self) -> bool {
        self.stop_worker();
        true
    }
}
