use eframe::egui;

use super::input::InputActions;
use super::{MenuId, TableAction, TableApp};

/// Returns the platform-appropriate modifier key text for shortcuts
fn modifier_key() -> &'static str {
    if cfg!(target_os = "macos") {
        "⌘ " // space to give the character that follows more breathing room
    } else {
        "Ctrl+"
    }
}

/// Menu item with shortcut hint that has better contrast than egui's default.
/// Shortcut text is dimmer when not hovered, brighter when hovered.
fn menu_item_with_shortcut(ui: &mut egui::Ui, label: &str, shortcut: &str, enabled: bool) -> bool {
    let label_galley = ui.painter().layout_no_wrap(
        label.to_string(),
        egui::FontId::default(),
        egui::Color32::WHITE,
    );
    let shortcut_galley = ui.painter().layout_no_wrap(
        shortcut.to_string(),
        egui::FontId::default(),
        egui::Color32::WHITE,
    );

    // Width = label + gap + shortcut + padding
    let desired_width = label_galley.size().x + 40.0 + shortcut_galley.size().x + 8.0;

    let response = ui.add_enabled(
        enabled,
        egui::Button::new(label).min_size(egui::vec2(desired_width, 0.0)),
    );

    if !shortcut.is_empty() {
        let shortcut_color = if response.hovered() {
            egui::Color32::from_gray(200)
        } else {
            egui::Color32::from_gray(120)
        };

        let shortcut_galley = ui.painter().layout_no_wrap(
            shortcut.to_string(),
            egui::FontId::default(),
            shortcut_color,
        );

        let pos = egui::pos2(
            response.rect.right() - shortcut_galley.size().x - 8.0,
            response.rect.center().y - shortcut_galley.size().y / 2.0,
        );
        ui.painter().galley(pos, shortcut_galley, shortcut_color);
    }

    response.clicked()
}

impl TableApp {
    /// Render the top menu bar and return deferred action flags
    pub(super) fn render_menu_bar(&mut self, ctx: &egui::Context) -> InputActions {
        let mut actions = InputActions::default();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| self.render_file_menu(ui, ctx, &mut actions));
                ui.menu_button("Table", |ui| self.render_table_menu(ui, &mut actions));
            });
        });

        actions
    }

    /// Render the File menu contents
    fn render_file_menu(
        &mut self,
        ui: &mut egui::Ui,
        ctx: &egui::Context,
        actions: &mut InputActions,
    ) {
        let mod_str = modifier_key();

        if menu_item_with_shortcut(ui, "New Table", &format!("{}N", mod_str), true) {
            actions.new_table = true;
            ui.close_menu();
        }
        if menu_item_with_shortcut(ui, "Preferences...", &format!("{},", mod_str), true) {
            actions.preferences = true;
            ui.close_menu();
        }
        ui.separator();
        if ui.button("Exit").clicked() {
            self.settings.save();
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            ui.close_menu();
        }
    }

    /// Render the Table menu contents (same actions as the block tunes popover)
    fn render_table_menu(&self, ui: &mut egui::Ui, actions: &mut InputActions) {
        let with_headings = self
            .session
            .table()
            .try_borrow()
            .is_ok_and(|table| table.with_headings);
        let mut headings = with_headings;
        if ui.checkbox(&mut headings, "Headings").changed() {
            actions.table_action = Some(TableAction::ToggleHeadings);
            ui.close_menu();
        }

        let any_open = MenuId::ALL
            .into_iter()
            .any(|id| self.session.menu(id).is_opened());
        ui.separator();
        if menu_item_with_shortcut(ui, "Close Menus", "Esc", any_open) {
            actions.close_menus = true;
            ui.close_menu();
        }
    }
}
