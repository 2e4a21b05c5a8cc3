use std::time::Duration;

use client_core::{QueryController, QueryView};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::Citation;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiErrorContext, UiEvent};
use crate::controller::orchestration::{request_open_citation, submit_current_query};
use crate::controller::reducer::{apply_ui_event, ShellStatus};

const ACCENT: egui::Color32 = egui::Color32::from_rgb(37, 99, 235);
const ANSWER_TITLE: egui::Color32 = egui::Color32::from_rgb(21, 128, 61);
const QUOTE_BAR: egui::Color32 = egui::Color32::from_rgb(191, 219, 254);
const MUTED: egui::Color32 = egui::Color32::from_rgb(100, 116, 139);
const BODY_TEXT: egui::Color32 = egui::Color32::from_rgb(51, 65, 85);

pub struct DesktopGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    controller: QueryController,
    status: ShellStatus,
}

fn card_frame(ui: &egui::Ui) -> egui::Frame {
    egui::Frame::NONE
        .fill(ui.visuals().extreme_bg_color)
        .stroke(egui::Stroke::new(
            1.0,
            ui.visuals().widgets.noninteractive.bg_stroke.color,
        ))
        .corner_radius(12.0)
        .inner_margin(egui::Margin::symmetric(18, 16))
}

fn badge(ui: &mut egui::Ui, text: &str, filled: bool) {
    let (fill, stroke) = if filled {
        (ui.visuals().faint_bg_color, egui::Stroke::NONE)
    } else {
        (
            egui::Color32::TRANSPARENT,
            egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color),
        )
    };
    egui::Frame::NONE
        .fill(fill)
        .stroke(stroke)
        .corner_radius(6.0)
        .inner_margin(egui::Margin::symmetric(6, 2))
        .show(ui, |ui| {
            ui.small(text);
        });
}

impl DesktopGuiApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            controller: QueryController::new(),
            status: ShellStatus {
                line: "Starting backend worker...".to_string(),
                banner: None,
            },
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            apply_ui_event(&mut self.controller, &mut self.status, event);
        }
    }

    fn try_submit(&mut self) {
        // Blank or in-flight submissions are silently ignored.
        if submit_current_query(&mut self.controller, &self.cmd_tx, &mut self.status.line).is_ok()
        {
            self.status.banner = None;
        }
    }

    fn show_header(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(16.0);
            ui.label(
                egui::RichText::new("⚖ Lexi Legal Assistant")
                    .size(28.0)
                    .strong(),
            );
            ui.add_space(4.0);
            ui.label(
                egui::RichText::new(
                    "Ask legal questions and get AI-powered answers with citations from real legal documents",
                )
                .color(MUTED),
            );
            ui.add_space(16.0);
        });
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = self.status.banner.clone() else {
            return;
        };
        let heading = match banner.context() {
            UiErrorContext::BackendStartup => "Startup",
            UiErrorContext::OpenCitation => "Citation",
        };
        egui::Frame::NONE
            .fill(egui::Color32::from_rgb(111, 53, 53))
            .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(
                        egui::RichText::new(format!(
                            "{heading} ({}): {}",
                            err_label(banner.category()),
                            banner.message()
                        ))
                        .color(egui::Color32::WHITE),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            self.status.banner = None;
                        }
                    });
                });
            });
        ui.add_space(8.0);
    }

    fn show_query_card(&mut self, ui: &mut egui::Ui) {
        let view = QueryView::project(&self.controller);
        let mut query_buf = view.query.to_string();
        let char_count_label = view.char_count_label.clone();
        let (example_enabled, submit_enabled, loading, submit_label) = (
            view.example_enabled,
            view.submit_enabled,
            view.loading,
            view.submit_label,
        );
        let input_enabled = view.input_enabled;
        let error = view.error.clone();

        let mut submit_requested = false;
        let mut example_requested = false;

        card_frame(ui).show(ui, |ui| {
            ui.label(egui::RichText::new("🗎 Ask a Legal Question").size(18.0).strong());
            ui.label(
                egui::RichText::new(
                    "Enter your legal query below and get an answer with supporting citations",
                )
                .color(MUTED),
            );
            ui.add_space(8.0);

            // Ctrl/Cmd+Enter submits; consume it before the editor turns it into a newline.
            let editor_id = ui.make_persistent_id("query_editor");
            if ui.memory(|m| m.has_focus(editor_id))
                && ui.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::Enter))
            {
                submit_requested = true;
            }
            let editor = egui::TextEdit::multiline(&mut query_buf)
                .id(editor_id)
                .hint_text("Enter your legal question here...")
                .desired_rows(6)
                .desired_width(f32::INFINITY);
            if ui.add_enabled(input_enabled, editor).changed() {
                self.controller.set_query(&query_buf);
            }

            ui.horizontal(|ui| {
                if ui
                    .add_enabled(example_enabled, egui::Button::new("Try Example Query").small())
                    .clicked()
                {
                    example_requested = true;
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.small(egui::RichText::new(&char_count_label).color(MUTED));
                });
            });

            ui.add_space(6.0);
            let button = egui::Button::new(egui::RichText::new(submit_label).strong().size(15.0))
                .fill(ACCENT)
                .min_size(egui::vec2(ui.available_width(), 36.0));
            ui.horizontal(|ui| {
                if loading {
                    ui.add(egui::Spinner::new());
                }
                if ui.add_enabled(submit_enabled, button).clicked() {
                    submit_requested = true;
                }
            });

            if let Some(message) = &error {
                ui.add_space(8.0);
                ui.colored_label(egui::Color32::from_rgb(185, 28, 28), message.as_str());
            }
        });

        if example_requested {
            self.controller.fill_example_query();
        }
        if submit_requested {
            self.try_submit();
        }
    }

    fn show_answer_cards(&mut self, ui: &mut egui::Ui) {
        let Some(answer) = self.controller.displayed_answer().cloned() else {
            return;
        };
        let stale = self.controller.is_loading();

        ui.add_space(12.0);
        card_frame(ui).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(
                egui::RichText::new("Legal Answer")
                    .size(18.0)
                    .strong()
                    .color(ANSWER_TITLE),
            );
            if stale {
                ui.small(egui::RichText::new("Showing previous answer while analyzing...").color(MUTED));
            }
            ui.add_space(6.0);
            ui.label(egui::RichText::new(&answer.answer).color(BODY_TEXT));
        });

        ui.add_space(12.0);
        let mut clicked: Option<Citation> = None;
        card_frame(ui).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new("🔗 Supporting Citations").size(18.0).strong());
            ui.label(
                egui::RichText::new("Click on any citation to view the original document")
                    .color(MUTED),
            );
            ui.add_space(8.0);

            for (index, citation) in answer.citations.iter().enumerate() {
                let frame = egui::Frame::NONE
                    .stroke(egui::Stroke::new(
                        1.0,
                        ui.visuals().widgets.noninteractive.bg_stroke.color,
                    ))
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::same(12))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.push_id(index, |ui| {
                            ui.horizontal(|ui| {
                                let (bar, _) = ui.allocate_exact_size(
                                    egui::vec2(4.0, 40.0),
                                    egui::Sense::hover(),
                                );
                                ui.painter().rect_filled(bar, 0.0, QUOTE_BAR);
                                ui.label(
                                    egui::RichText::new(format!("\"{}\"", citation.text))
                                        .italics()
                                        .color(BODY_TEXT),
                                );
                            });
                            ui.add_space(6.0);
                            ui.horizontal_wrapped(|ui| {
                                badge(ui, &citation.source, true);
                                if let Some(paragraph) = &citation.paragraph {
                                    badge(ui, paragraph, false);
                                }
                            });
                        });
                    });
                let response = frame
                    .response
                    .interact(egui::Sense::click())
                    .on_hover_cursor(egui::CursorIcon::PointingHand)
                    .on_hover_text(citation.link.as_str());
                if response.clicked() {
                    clicked = Some(citation.clone());
                }
                ui.add_space(8.0);
            }
        });

        if let Some(citation) = clicked {
            request_open_citation(&self.cmd_tx, &citation, &mut self.status.line);
        }
    }

    fn show_footer(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.small(
                egui::RichText::new("© 2024 Lexi Legal Assistant - Powered by AI for Legal Research")
                    .color(MUTED),
            );
            ui.small(egui::RichText::new(&self.status.line).weak());
            ui.add_space(12.0);
        });
    }
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let width = ui.available_width().min(860.0);
                    ui.vertical_centered(|ui| {
                        ui.set_max_width(width);
                        self.show_header(ui);
                        self.show_status_banner(ui);
                        self.show_query_card(ui);
                        self.show_answer_cards(ui);
                        self.show_footer(ui);
                    });
                });
        });

        if self.controller.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
