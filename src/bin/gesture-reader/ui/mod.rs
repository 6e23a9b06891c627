use egui::{RichText, ScrollArea};

use crate::model::{Model, FONT_SIZE_STEP};

pub const SPACING_AMOUNT: f32 = 16.0;

const PREVIEW_SIZE: egui::Vec2 = egui::vec2(200.0, 150.0);

pub fn render_ui(ctx: &egui::Context, frame: &mut eframe::Frame, model: &mut Model) {
    egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
        ui.add_space(SPACING_AMOUNT);
        ui.horizontal(|ui| {
            ui.label("File:");
            ui.text_edit_singleline(&mut model.file_path);
            if ui.button("Load File").clicked() {
                model.load_file();
            }
            if ui.button("Increase Text Size").clicked() {
                model.adjust_font(FONT_SIZE_STEP);
            }
            if ui.button("Decrease Text Size").clicked() {
                model.adjust_font(-FONT_SIZE_STEP);
            }
            if ui.button("Exit").clicked() {
                frame.close();
            }
        });
        ui.add_space(SPACING_AMOUNT);
        ui.horizontal(|ui| {
            if let Some(preview) = &model.preview {
                ui.image(preview.id(), PREVIEW_SIZE);
            }
            ui.label(RichText::new(&model.status).size(14.0));
        });
        ui.add_space(SPACING_AMOUNT);
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        // Wrapping stays off so horizontal scroll gestures have something
        // to act on
        let mut area = ScrollArea::both()
            .id_source("reader_text")
            .auto_shrink([false, false]);
        if let Some(offset) = model.scroll_override.take() {
            area = area
                .horizontal_scroll_offset(offset.x)
                .vertical_scroll_offset(offset.y);
        }
        let output = area.show(ui, |ui| {
            ui.add(egui::Label::new(RichText::new(&model.text).size(model.font_size)).wrap(false));
        });
        model.scroll_offset = output.state.offset;
    });
}
