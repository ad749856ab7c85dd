use eframe::egui;

use super::{TableAction, TableApp};

/// Actions triggered by keyboard/menu input, processed after input handling
#[derive(Default)]
pub(super) struct InputActions {
    pub new_table: bool,
    pub preferences: bool,
    pub close_menus: bool,
    pub table_action: Option<TableAction>,
}

impl TableApp {
    /// Handle keyboard shortcuts
    /// Returns flags for deferred actions
    pub(super) fn handle_input(&mut self, ctx: &egui::Context) -> InputActions {
        let mut actions = InputActions::default();

        ctx.input(|i| {
            let ctrl = i.modifiers.ctrl || i.modifiers.mac_cmd;
            if ctrl && i.key_pressed(egui::Key::N) {
                actions.new_table = true;
            }
            if ctrl && i.key_pressed(egui::Key::Comma) {
                actions.preferences = true;
            }
            // Escape closes any open popover
            if i.key_pressed(egui::Key::Escape) {
                actions.close_menus = true;
            }
        });

        actions
    }

    /// Process input actions (deferred to avoid borrow conflicts)
    pub(super) fn process_input_actions(&mut self, actions: InputActions) {
        if actions.new_table {
            self.new_table();
        }
        if actions.preferences {
            self.settings_dialog_state.open_dialog();
        }
        if actions.close_menus {
            self.session.close_menus();
        }
        if let Some(action) = actions.table_action {
            self.session.apply(action);
        }
    }
}
