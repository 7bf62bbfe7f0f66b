use eframe::egui;
use treebolic_events::StatusKind;

pub struct StatusBar {
    kind: StatusKind,
    title: String,
    message: String,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            kind: StatusKind::Info,
            title: String::new(),
            message: "Ready".to_string(),
        }
    }

    pub fn put(&mut self, kind: StatusKind, title: &str, message: &str) {
        self.kind = kind;
        self.title = title.to_string();
        self.message = message.to_string();
    }

    /// Returns true when the user asked to recenter the tree.
    pub fn ui(&mut self, ui: &mut egui::Ui, node_count: usize, zoom: f64, animating: bool) -> bool {
        let mut home = false;
        ui.horizontal(|ui| {
            let color = match self.kind {
                StatusKind::Info => ui.visuals().text_color(),
                StatusKind::Link => ui.visuals().hyperlink_color,
                StatusKind::Mount => ui.visuals().warn_fg_color,
                StatusKind::Search => ui.visuals().selection.bg_fill,
            };
            if !self.title.is_empty() {
                ui.label(egui::RichText::new(&self.title).strong().color(color));
                ui.separator();
            }
            ui.label(egui::RichText::new(&self.message).color(ui.visuals().text_color()));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Home").clicked() {
                    home = true;
                }
                ui.separator();
                ui.label(format!("{} nodes", node_count));
                ui.separator();
                ui.label(format!("zoom {:.2}", zoom));
                if animating {
                    ui.separator();
                    ui.add(egui::Spinner::new());
                }
            });
        });
        home
    }
}
