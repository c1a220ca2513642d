//! Main window: file picker, submit control and the result area.

mod images;
mod results;

use anyhow::{Context, Result};
use eframe::{App, Frame, egui};
use images::RemoteImages;
use predictor_core::view::{self, View};
use predictor_core::{HttpClient, SelectedFile, ServerConfig, Session, SubmitError};
use rfd::FileDialog;
use std::sync::Arc;

/// Extensions offered by the file picker. Other files can still be chosen.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

pub struct UiApp {
    session: Session,
    service: Arc<HttpClient>,
    config: ServerConfig,
    images: RemoteImages,
    // Set when a submit has to be refused; shown as a modal until dismissed.
    notice: Option<String>,
}

impl UiApp {
    pub fn new(ctx: &egui::Context, server_url: &str) -> Result<Self> {
        let config = ServerConfig::new(server_url);
        let service = Arc::new(
            HttpClient::new(config.clone()).context("could not build the HTTP client")?,
        );
        tracing::info!("Using prediction server at {}", config.base_url);

        let repaint = ctx.clone();
        Ok(Self {
            session: Session::with_waker(move || repaint.request_repaint()),
            images: RemoteImages::new(service.clone()),
            service,
            config,
            notice: None,
        })
    }

    fn pick_file(&mut self) {
        if let Some(path) = FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .set_directory(".")
            .pick_file()
        {
            self.session.select_file(SelectedFile::from_path(path));
        }
    }

    fn submit(&mut self) {
        match self.session.submit(self.service.clone()) {
            Ok(()) => {}
            Err(err @ SubmitError::NoFileSelected) => self.notice = Some(err.to_string()),
            // The button is disabled while loading; a stray click is harmless.
            Err(SubmitError::InFlight) => {}
        }
    }

    fn render_controls(&mut self, ui: &mut egui::Ui, view: &View) {
        ui.vertical_centered(|ui| ui.heading(view.title));
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let can_pick = !self.session.state().is_loading;
            if ui
                .add_enabled(can_pick, egui::Button::new("Choose image..."))
                .clicked()
            {
                self.pick_file();
            }
            let chosen = self
                .session
                .state()
                .selected_file
                .as_ref()
                .map(|f| f.file_name.clone())
                .unwrap_or_else(|| "No file chosen".to_string());
            ui.label(chosen);

            if ui
                .add_enabled(view.submit.enabled, egui::Button::new(view.submit.label))
                .clicked()
            {
                self.submit();
            }
            if self.session.state().is_loading {
                ui.spinner();
            }
        });
        ui.add_space(4.0);
    }

    fn render_notice(&mut self, ctx: &egui::Context) {
        let Some(message) = self.notice.clone() else {
            return;
        };
        let mut dismissed = false;
        let modal = egui::Modal::new(egui::Id::new("submit-notice")).show(ctx, |ui| {
            ui.set_width(280.0);
            ui.label(message);
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });
        if dismissed || modal.should_close() {
            self.notice = None;
        }
    }
}

impl App for UiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let changed = self.session.poll();
        self.images.poll(ctx);

        let view = view::render(self.session.state(), &self.config);
        if changed {
            tracing::debug!("View updated: {:?}", view.lines());
        }

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            self.render_controls(ui, &view);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    if let Some(error) = &view.error {
                        ui.vertical_centered(|ui| {
                            ui.label(
                                egui::RichText::new(error)
                                    .color(egui::Color32::RED)
                                    .strong(),
                            );
                        });
                    }

                    if !view.results.is_empty() {
                        self.render_results(ui, &view.results);
                    }

                    if let Some(prompt) = view.idle_prompt {
                        ui.add_space(24.0);
                        ui.vertical_centered(|ui| ui.weak(prompt));
                    }
                });
        });

        self.render_notice(ctx);
        self.images.end_frame();
    }
}
