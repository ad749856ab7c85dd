//! Settings/Preferences dialog UI component

use crate::settings::{AppSettings, MIN_TABLE_SIZE};
use eframe::egui;

/// Upper bound offered for new table dimensions
const MAX_TABLE_SIZE: usize = 50;

/// State for the settings dialog
#[derive(Default)]
pub struct SettingsDialogState {
    /// Whether the dialog is visible
    pub dialog_open: bool,

    /// Name typed for a new data source
    new_source: String,
}

impl SettingsDialogState {
    /// Open the settings dialog
    pub fn open_dialog(&mut self) {
        self.dialog_open = true;
    }

    /// Close the settings dialog
    pub fn close_dialog(&mut self) {
        self.dialog_open = false;
        self.new_source.clear();
    }

    /// Take the typed source name if it is usable and not configured yet
    fn take_new_source(&mut self, settings: &AppSettings) -> Option<String> {
        let name = self.new_source.trim();
        if name.is_empty() || settings.iteratables.contains_key(name) {
            return None;
        }
        let name = name.to_owned();
        self.new_source.clear();
        Some(name)
    }
}

/// What a frame of the settings dialog changed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SettingsChanges {
    /// Something differs and the settings file should be rewritten
    pub settings_changed: bool,
    /// A setting the table menus are built from differs
    pub menus_changed: bool,
}

impl SettingsChanges {
    pub fn between(before: &AppSettings, after: &AppSettings) -> Self {
        Self {
            settings_changed: before != after,
            menus_changed: before.confirm_destructive != after.confirm_destructive
                || before.iteratables != after.iteratables,
        }
    }
}

/// Show the settings/preferences dialog and report what the user changed
pub fn show(
    ctx: &egui::Context,
    state: &mut SettingsDialogState,
    settings: &mut AppSettings,
) -> SettingsChanges {
    if !state.dialog_open {
        return SettingsChanges::default();
    }

    let before = settings.clone();
    let mut close_dialog = false;
    let mut add_source = false;
    let mut remove_source: Option<String> = None;

    egui::Window::new("Preferences")
        .collapsible(false)
        .resizable(true)
        .default_width(400.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            // New tables
            ui.heading("New Tables");
            ui.add_space(4.0);

            ui.checkbox(&mut settings.with_headings, "First row is a heading row");
            ui.horizontal(|ui| {
                ui.label("Rows:");
                ui.add(
                    egui::DragValue::new(&mut settings.default_rows)
                        .range(MIN_TABLE_SIZE..=MAX_TABLE_SIZE),
                );
                ui.label("Columns:");
                ui.add(
                    egui::DragValue::new(&mut settings.default_cols)
                        .range(MIN_TABLE_SIZE..=MAX_TABLE_SIZE),
                );
            });

            ui.add_space(16.0);

            // Menus
            ui.heading("Menus");
            ui.add_space(4.0);

            ui.checkbox(
                &mut settings.confirm_destructive,
                "Ask for a second click before deleting",
            )
            .on_hover_text(
                "Delete row/column items turn red on the first click \
                 and only run on the second one",
            );

            ui.add_space(16.0);

            // Data sources
            ui.heading("Data Sources");
            ui.add_space(4.0);

            for (name, fields) in &settings.iteratables {
                ui.horizontal(|ui| {
                    ui.label(name.as_str());
                    ui.label(
                        egui::RichText::new(fields.join(", "))
                            .small()
                            .color(egui::Color32::GRAY),
                    );
                    if ui.small_button("Remove").clicked() {
                        remove_source = Some(name.clone());
                    }
                });
            }
            ui.horizontal(|ui| {
                ui.text_edit_singleline(&mut state.new_source);
                if ui.button("Add").clicked() {
                    add_source = true;
                }
            });

            ui.add_space(16.0);

            // Info section
            ui.heading("About");
            ui.add_space(4.0);

            ui.label(
                egui::RichText::new("Settings are saved as soon as they change.")
                    .small()
                    .color(egui::Color32::GRAY),
            );

            if let Some(settings_path) = AppSettings::settings_path() {
                ui.label(
                    egui::RichText::new(format!("Settings file: {}", settings_path.display()))
                        .small()
                        .color(egui::Color32::GRAY),
                );
            }

            ui.add_space(16.0);

            ui.horizontal(|ui| {
                if ui.button("Close").clicked() {
                    close_dialog = true;
                }
            });

            if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                close_dialog = true;
            }
        });

    // Process actions after UI scope
    if add_source {
        if let Some(name) = state.take_new_source(settings) {
            log::info!("Added data source '{}'", name);
            settings.iteratables.insert(name, Vec::new());
        }
    }
    if let Some(name) = remove_source {
        log::info!("Removed data source '{}'", name);
        settings.iteratables.remove(&name);
    }

    if close_dialog {
        state.close_dialog();
    }

    SettingsChanges::between(&before, settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_dialog_state_default() {
        let state = SettingsDialogState::default();
        assert!(!state.dialog_open);
    }

    #[test]
    fn test_settings_dialog_state_open_close() {
        let mut state = SettingsDialogState::default();

        state.open_dialog();
        assert!(state.dialog_open);

        state.close_dialog();
        assert!(!state.dialog_open);
    }

    #[test]
    fn test_new_source_is_trimmed_and_deduplicated() {
        let settings = AppSettings::default();
        let mut state = SettingsDialogState::default();

        state.new_source = "  doctors ".into();
        assert_eq!(state.take_new_source(&settings), Some("doctors".to_string()));
        assert!(state.new_source.is_empty());

        state.new_source = "patients".into();
        assert_eq!(state.take_new_source(&settings), None);

        state.new_source = "   ".into();
        assert_eq!(state.take_new_source(&settings), None);
    }

    #[test]
    fn test_table_defaults_are_saved_without_menu_rebuild() {
        let before = AppSettings::default();
        let mut after = before.clone();
        after.with_headings = true;
        after.default_rows = 5;

        let changes = SettingsChanges::between(&before, &after);

        assert!(changes.settings_changed);
        assert!(!changes.menus_changed);
    }

    #[test]
    fn test_menu_settings_trigger_rebuild() {
        let before = AppSettings::default();
        let mut after = before.clone();
        after.iteratables.remove("billings");

        let changes = SettingsChanges::between(&before, &after);
        assert!(changes.settings_changed && changes.menus_changed);

        let mut after = before.clone();
        after.confirm_destructive = false;
        assert!(SettingsChanges::between(&before, &after).menus_changed);

        assert_eq!(
            SettingsChanges::between(&before, &before.clone()),
            SettingsChanges::default()
        );
    }

    #[test]
    fn test_closed_dialog_changes_nothing() {
        let ctx = egui::Context::default();
        let mut state = SettingsDialogState::default();
        let mut settings = AppSettings::default();

        let mut changes = SettingsChanges::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            changes = show(ctx, &mut state, &mut settings);
        });

        assert_eq!(changes, SettingsChanges::default());
    }
}
