use client_core::{
    view::{self, ResultView},
    ControllerSnapshot,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{err_label, UiError, UiErrorContext, UiEvent},
    orchestration::dispatch_backend_command,
};
use crate::ui::theme;

pub struct SentimentGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    text: String,
    snapshot: ControllerSnapshot,
    /// Submission count seen when an Analyze was queued; cleared once the
    /// worker reports a later submission or a skip.
    submit_queued: Option<u64>,
    status: String,
    status_banner: Option<UiError>,
}

impl SentimentGuiApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            text: String::new(),
            snapshot: ControllerSnapshot::default(),
            submit_queued: None,
            status: String::new(),
            status_banner: None,
        }
    }

    fn pending(&self) -> bool {
        self.submit_queued.is_some() || self.snapshot.is_pending()
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::StateChanged(snapshot) => {
                if self
                    .submit_queued
                    .is_some_and(|queued_at| snapshot.submissions() > queued_at)
                {
                    self.submit_queued = None;
                }
                self.snapshot = snapshot;
            }
            UiEvent::SubmitSkipped => {
                self.submit_queued = None;
            }
            UiEvent::Error(err) => {
                tracing::warn!(context = ?err.context(), "{}", err.message());
                self.status_banner = Some(err);
            }
        }
    }

    fn on_text_changed(&mut self) {
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::SetText(self.text.clone()),
            &mut self.status,
        );
    }

    fn on_analyze(&mut self) {
        if !view::submit_enabled(&self.text, self.pending()) {
            return;
        }
        if dispatch_backend_command(&self.cmd_tx, BackendCommand::Analyze, &mut self.status) {
            self.submit_queued = Some(self.snapshot.submissions());
        } else {
            self.status_banner = Some(UiError::from_message(
                UiErrorContext::Analyze,
                self.status.clone(),
            ));
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = &self.status_banner else {
            return;
        };
        let mut dismiss = false;
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(
                    theme::ERROR,
                    format!("{}: {}", err_label(banner.category()), banner.message()),
                );
                dismiss = ui.small_button("Dismiss").clicked();
            });
        });
        if dismiss {
            self.status_banner = None;
        }
    }

    fn show_result(&self, ui: &mut egui::Ui) {
        if let Some(error) = &self.snapshot.error {
            ui.colored_label(theme::ERROR, error.as_str());
        }

        let Some(result) = &self.snapshot.result else {
            return;
        };
        let card = ResultView::from(result);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.heading(
                egui::RichText::new(card.headline)
                    .color(theme::tone_color(card.tone))
                    .size(24.0),
            );
            ui.add(
                egui::ProgressBar::new(card.fill)
                    .fill(theme::tone_color(card.tone))
                    .desired_width(ui.available_width()),
            );
            ui.label(card.confidence_text);
        });
    }

    fn show_main(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.small(self.status.as_str());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(
                    egui::RichText::new(view::TITLE)
                        .color(theme::ACCENT)
                        .size(36.0)
                        .strong(),
                );
                ui.label(egui::RichText::new(view::SUBTITLE).italics().weak());
            });
            ui.add_space(12.0);

            self.show_status_banner(ui);

            let edit = ui.add(
                egui::TextEdit::multiline(&mut self.text)
                    .hint_text(view::INPUT_PLACEHOLDER)
                    .desired_rows(view::INPUT_ROWS)
                    .desired_width(f32::INFINITY),
            );
            if edit.changed() {
                self.on_text_changed();
            }
            ui.add_space(8.0);

            let pending = self.pending();
            let clicked = ui
                .add_enabled(
                    view::submit_enabled(&self.text, pending),
                    egui::Button::new(view::submit_label(pending)),
                )
                .clicked();
            if clicked {
                self.on_analyze();
            }
            ui.add_space(12.0);

            self.show_result(ui);
        });
    }
}

impl eframe::App for SentimentGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.show_main(ctx);

        if self.pending() {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
