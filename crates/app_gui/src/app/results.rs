//! Result cards for the last prediction run.

use super::UiApp;
use super::images::ImageSlot;
use eframe::egui;
use predictor_core::view::{CardBody, NO_PREDICTIONS, RESULTS_HEADING, ResultCard};

const MAX_IMAGE_HEIGHT: f32 = 300.0;

impl UiApp {
    pub(super) fn render_results(&mut self, ui: &mut egui::Ui, cards: &[ResultCard]) {
        ui.add_space(16.0);
        ui.heading(RESULTS_HEADING);
        ui.separator();
        ui.add_space(8.0);

        for card in cards {
            egui::Frame::group(ui.style())
                .inner_margin(egui::Margin::same(12))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(egui::RichText::new(&card.heading).strong().size(16.0));
                    ui.add_space(6.0);
                    match &card.body {
                        CardBody::Error(error) => {
                            ui.label(
                                egui::RichText::new(format!("Error: {error}"))
                                    .color(egui::Color32::RED)
                                    .strong(),
                            );
                        }
                        CardBody::Predictions { lines, image_url } => {
                            if lines.is_empty() {
                                ui.label(NO_PREDICTIONS);
                            }
                            for line in lines {
                                ui.horizontal(|ui| {
                                    ui.label(
                                        egui::RichText::new(format!("{}:", line.tag_name))
                                            .strong(),
                                    );
                                    ui.label(format!("{}%", line.probability));
                                });
                            }
                            if let Some(url) = image_url {
                                ui.add_space(10.0);
                                self.render_uploaded_image(ui, &card.path, url);
                            }
                        }
                    }
                });
            ui.add_space(12.0);
        }
    }

    fn render_uploaded_image(&mut self, ui: &mut egui::Ui, path: &str, url: &str) {
        let slot = self.images.slot(ui.ctx(), path, url);
        ui.vertical_centered(|ui| match slot {
            ImageSlot::Loading => {
                ui.spinner();
            }
            ImageSlot::Ready(id, size) => {
                ui.add(
                    egui::Image::new((id, size))
                        .max_height(MAX_IMAGE_HEIGHT)
                        .max_width(ui.available_width())
                        .alt_text(path),
                );
            }
            ImageSlot::Unavailable => {
                ui.weak("Image unavailable");
            }
        });
    }
}
