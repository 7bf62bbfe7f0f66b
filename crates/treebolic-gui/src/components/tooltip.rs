use eframe::egui;
use treebolic_events::TooltipInfo;

pub struct TooltipManager {
    pub info: Option<TooltipInfo>,
    pub position: Option<egui::Pos2>,
}

impl TooltipManager {
    pub fn new() -> Self {
        Self {
            info: None,
            position: None,
        }
    }

    pub fn show(&mut self, info: TooltipInfo, pos: egui::Pos2) {
        self.info = Some(info);
        self.position = Some(pos);
    }

    /// Follow the pointer while the same node stays hot.
    pub fn move_to(&mut self, pos: egui::Pos2) {
        if self.info.is_some() {
            self.position = Some(pos);
        }
    }

    pub fn hide(&mut self) {
        self.info = None;
        self.position = None;
    }

    pub fn ui(&self, ctx: &egui::Context) {
        if let (Some(info), Some(pos)) = (&self.info, self.position) {
            egui::Area::new("tooltip_area".into())
                .fixed_pos(pos + egui::vec2(16.0, 16.0))
                .order(egui::Order::Tooltip)
                .interactable(false)
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.set_max_width(320.0);
                        if !info.title.is_empty() {
                            ui.label(egui::RichText::new(&info.title).strong());
                        }
                        if !info.title.is_empty() && !info.description.is_empty() {
                            ui.separator();
                        }
                        if !info.description.is_empty() {
                            ui.label(&info.description);
                        }
                    });
                });
        }
    }
}
