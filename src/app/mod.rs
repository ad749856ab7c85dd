//! Main application state and egui integration

mod actions;
mod input;
mod menu_bar;
mod menus;
mod session;

pub use actions::{MenuId, TableAction};
pub use menus::MenuContext;
pub use session::{GridGeometry, TableSession};

use crate::settings::AppSettings;
use crate::ui::{
    popover,
    settings_dialog::{self, SettingsDialogState},
    table_grid,
};
use eframe::egui;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Threshold for detecting window size changes (pixels)
const WINDOW_RESIZE_THRESHOLD: f32 = 1.0;

/// Debounce delay for window resize saves (milliseconds)
const WINDOW_RESIZE_DEBOUNCE_MS: u64 = 500;

/// Repaint interval while menu predicates are still resolving (milliseconds)
const PREDICATE_POLL_MS: u64 = 50;

/// Space around the table so the togglers have room outside it
const TABLE_MARGIN: f32 = 40.0;

/// Main application state for the table demo
///
/// All table state and the three menu togglers live in [`TableSession`]. The app
/// only draws them and feeds clicks back; menu actions are applied after the
/// widgets that produced them are done with the frame.
pub struct TableApp {
    /// Table model and its row/column/tunes menus
    session: TableSession,

    /// Settings/preferences dialog state
    settings_dialog_state: SettingsDialogState,

    /// Application settings (persisted to disk)
    pub settings: AppSettings,

    /// Last known window size (for change detection)
    last_window_size: Option<egui::Vec2>,

    /// Timer for debouncing window resize saves
    window_resize_timer: Option<Instant>,
}

impl TableApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: AppSettings) -> Self {
        Self {
            session: TableSession::new(&settings),
            settings_dialog_state: SettingsDialogState::default(),
            settings,
            last_window_size: None,
            window_resize_timer: None,
        }
    }

    /// Replace the table with an empty one built from the current settings
    pub fn new_table(&mut self) {
        self.session = TableSession::new(&self.settings);
        log::info!(
            "Created {}x{} table",
            self.settings.default_rows,
            self.settings.default_cols
        );
    }

    /// Show all modal dialogs
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        let changes =
            settings_dialog::show(ctx, &mut self.settings_dialog_state, &mut self.settings);
        if changes.menus_changed {
            self.session.rebuild_menus(&self.settings);
        }
        if changes.settings_changed {
            self.settings.save();
        }
    }

    /// Save window size once it stops changing
    fn track_window_size(&mut self, ctx: &egui::Context) {
        let current_size = ctx.screen_rect().size();
        if let Some(last_size) = self.last_window_size {
            if (current_size.x - last_size.x).abs() > WINDOW_RESIZE_THRESHOLD
                || (current_size.y - last_size.y).abs() > WINDOW_RESIZE_THRESHOLD
            {
                self.window_resize_timer = Some(Instant::now());
                self.last_window_size = Some(current_size);
            }
        } else {
            self.last_window_size = Some(current_size);
        }

        if let Some(timer) = self.window_resize_timer {
            if timer.elapsed() > Duration::from_millis(WINDOW_RESIZE_DEBOUNCE_MS) {
                self.settings.window_width = current_size.x;
                self.settings.window_height = current_size.y;
                self.settings.save();
                self.window_resize_timer = None;
            }
        }
    }

    /// Render the status bar
    fn render_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let Ok(table) = self.session.table().try_borrow() else {
                    return;
                };
                ui.label(format!("{} x {}", table.rows(), table.cols()));
                if let Some(cell) = self.session.selection() {
                    ui.separator();
                    ui.label(format!("Row {}, Col {}", cell.row + 1, cell.col + 1));
                }
                if table.with_headings {
                    ui.separator();
                    ui.label("Headings");
                }
                if let Some(source) = table.iteratable() {
                    ui.separator();
                    let text = match table.iterated_row() {
                        Some(row) => format!("Row {} repeats for each {}", row + 1, source),
                        None => format!("Source: {}", source),
                    };
                    ui.label(text);
                }
            });
        });
    }

    /// Render the table and its menu togglers
    fn render_table(&mut self, ctx: &egui::Context) {
        let grid = egui::CentralPanel::default()
            .show(ctx, |ui| {
                ui.add_space(TABLE_MARGIN);
                ui.horizontal(|ui| {
                    ui.add_space(TABLE_MARGIN);
                    let table = Rc::clone(self.session.table());
                    let mut table = table.borrow_mut();
                    table_grid::show(ui, &mut table, self.session.selection())
                })
                .inner
            })
            .inner;

        if let Some(cell) = grid.focused {
            self.session.select(Some(cell));
        }
        self.session.place_togglers(&grid.geometry);

        for id in MenuId::ALL {
            let response = popover::show_toggler(
                ctx,
                egui::Id::new(("menu_toggler", id)),
                self.session.menu(id).element(),
                grid.rect,
                id.icon(),
            );
            if response.toggled {
                self.session.toggle(id);
            }
            if let Some(target) = response.click {
                self.session.click(id, target);
            }
        }
    }
}

impl eframe::App for TableApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.track_window_size(ctx);

        // Handle input and process actions
        let input_actions = self.handle_input(ctx);
        self.process_input_actions(input_actions);

        // Apply menu predicate results that arrived since the last frame
        if self.session.pump() {
            ctx.request_repaint_after(Duration::from_millis(PREDICATE_POLL_MS));
        }

        // Render UI components
        let menu_actions = self.render_menu_bar(ctx);
        self.process_input_actions(menu_actions);
        self.show_dialogs(ctx);
        self.render_status_bar(ctx);
        self.render_table(ctx);
    }
}
