use eframe::egui;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn from_config(mode: &str) -> Self {
        if mode.eq_ignore_ascii_case("light") {
            Self::Light
        } else {
            Self::Dark
        }
    }

    pub fn apply(self, ctx: &egui::Context) {
        match self {
            Self::Light => ctx.set_visuals(egui::Visuals::light()),
            Self::Dark => ctx.set_visuals(egui::Visuals::dark()),
        }
    }
}

// --- Sizing ---
pub const ICON_COL_WIDTH: f32 = 30.0;
pub const ROW_HEIGHT: f32 = 24.0;
pub const HEADER_HEIGHT: f32 = 20.0;

// --- Window ---
pub const WINDOW_SIZE: [f32; 2] = [720.0, 560.0];

pub fn truncated_label(
    ui: &mut egui::Ui,
    text: impl Into<egui::WidgetText>,
) -> egui::Response {
    ui.add(egui::Label::new(text).truncate())
}
