// Panel rendering: path bar, entry table and status bar

use crate::app::FileBrowser;
use crate::style;
use chrono::{DateTime, Local};
use eframe::egui;

impl FileBrowser {
    pub(crate) fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let at_root = self.is_at_root();
                if ui.add_enabled(!at_root, egui::Button::new("⬆ Up")).clicked() {
                    self.go_up();
                }
                if ui.button("🏠").on_hover_text("Back to root").clicked() {
                    self.go_home();
                }
                if ui.button("⟳").on_hover_text("Refresh").clicked() {
                    self.refresh();
                }
                if ui
                    .button(self.sort.label())
                    .on_hover_text("Sort field (S), order (O)")
                    .clicked()
                {
                    self.cycle_sort();
                }

                let path = self
                    .listing
                    .as_ref()
                    .map(|l| l.path.display().to_string())
                    .unwrap_or_default();
                style::truncated_label(ui, path);
            });
            ui.add_space(4.0);
        });
    }

    pub(crate) fn render_bottom_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let count = self
                    .listing
                    .as_ref()
                    .map(|l| l.entries.iter().filter(|e| !e.is_parent()).count())
                    .unwrap_or(0);
                ui.label(format!("{} items", count));

                if let Some(details) = &self.details {
                    let mut parts = Vec::new();
                    if !details.is_dir {
                        parts.push(bytesize::ByteSize(details.size).to_string());
                    }
                    if let Some(modified) = details.modified {
                        let modified: DateTime<Local> = modified.into();
                        parts.push(format!("Modified: {}", modified.format("%Y-%m-%d %H:%M")));
                    }
                    if !parts.is_empty() {
                        ui.label(format!(" | {}", parts.join(" | ")));
                    }
                }

                if let Some(err) = &self.error_message {
                    ui.colored_label(egui::Color32::RED, format!(" | {}", err));
                }
            });
        });
    }

    pub(crate) fn render_entries(&mut self, ctx: &egui::Context) {
        let mut clicked = None;
        let mut activated = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(listing) = self.listing.as_ref() else {
                ui.centered_and_justified(|ui| {
                    ui.label("Loading…");
                });
                return;
            };

            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                use egui_extras::{Column, TableBuilder};

                TableBuilder::new(ui)
                    .striped(true)
                    .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                    .column(Column::auto().at_least(style::ICON_COL_WIDTH))
                    .column(Column::remainder())
                    .header(style::HEADER_HEIGHT, |mut header| {
                        header.col(|ui| {
                            ui.label("");
                        });
                        header.col(|ui| {
                            ui.label("Name");
                        });
                    })
                    .body(|body| {
                        body.rows(style::ROW_HEIGHT, listing.entries.len(), |mut row| {
                            let row_index = row.index();
                            let entry = &listing.entries[row_index];
                            let is_selected = self.selected_index == Some(row_index);
                            row.set_selected(is_selected);

                            row.col(|ui| {
                                ui.label(egui::RichText::new(self.icon_for(entry)).size(self.icon_size));
                            });
                            row.col(|ui| {
                                let text = egui::RichText::new(&entry.name).size(self.font_size);
                                let response = ui.selectable_label(is_selected, text);
                                if response.double_clicked() {
                                    activated = Some(row_index);
                                } else if response.clicked() {
                                    clicked = Some(row_index);
                                }
                            });
                        });
                    });
            });
        });

        if let Some(idx) = clicked {
            self.select(idx);
        }
        if let Some(idx) = activated {
            self.select(idx);
            self.activate(idx);
        }
    }
}
