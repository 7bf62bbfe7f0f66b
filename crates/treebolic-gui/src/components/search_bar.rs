use eframe::egui;
use treebolic_search::{MatchMode, MatchScope};
use treebolic_view::SearchCommand;

/// Search bar: target text, scope and mode pickers, and the
/// search / continue / reset buttons.
pub struct SearchBar {
    query: String,
    scope: MatchScope,
    mode: MatchMode,
    /// A search is running and can be continued.
    pub active: bool,
}

impl SearchBar {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            scope: MatchScope::default(),
            mode: MatchMode::default(),
            active: false,
        }
    }

    /// Command for a fresh search with the current fields, or None when
    /// there is nothing to look for.
    pub fn command(&self) -> Option<SearchCommand> {
        let target = self.query.trim();
        if target.is_empty() {
            return None;
        }
        Some(SearchCommand::Search {
            scope: self.scope,
            mode: self.mode,
            target: target.to_string(),
            start: None,
        })
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) -> Option<SearchCommand> {
        let mut command = None;

        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.query)
                    .hint_text("Search nodes...")
                    .desired_width(240.0),
            );
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            egui::ComboBox::from_id_salt("search_scope")
                .selected_text(self.scope.to_string())
                .show_ui(ui, |ui| {
                    for scope in MatchScope::ALL {
                        ui.selectable_value(&mut self.scope, scope, scope.to_string());
                    }
                });
            egui::ComboBox::from_id_salt("search_mode")
                .selected_text(self.mode.to_string())
                .show_ui(ui, |ui| {
                    for mode in MatchMode::ALL {
                        ui.selectable_value(&mut self.mode, mode, mode.to_string());
                    }
                });

            if ui.button("Search").clicked() || submitted {
                command = self.command();
            }
            if ui
                .add_enabled(self.active, egui::Button::new("Continue"))
                .clicked()
            {
                command = Some(SearchCommand::Continue);
            }
            if ui.add_enabled(self.active, egui::Button::new("Reset")).clicked() {
                command = Some(SearchCommand::Reset);
            }
        });

        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_query_has_no_command() {
        let mut bar = SearchBar::new();
        assert_eq!(bar.command(), None);
        bar.query = "   ".into();
        assert_eq!(bar.command(), None);
    }

    #[test]
    fn test_command_trims_target() {
        let mut bar = SearchBar::new();
        bar.query = "  n.1 ".into();
        match bar.command() {
            Some(SearchCommand::Search { target, start, .. }) => {
                assert_eq!(target, "n.1");
                assert_eq!(start, None);
            }
            other => panic!("Expected Search, got {other:?}"),
        }
    }
}
