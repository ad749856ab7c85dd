//! table-menu: desktop demo for the table popover menus
//!
//! Opens a small editable table with row, column and block-tunes togglers.
//! Set `RUST_LOG=debug` to follow menu dispatch and predicate resolution.

use eframe::NativeOptions;
use table_menu::app::TableApp;
use table_menu::settings::AppSettings;

fn main() -> eframe::Result<()> {
    env_logger::init();

    // Load settings for window size
    let settings = AppSettings::load();

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([settings.window_width, settings.window_height])
        .with_min_inner_size([640.0, 480.0]);

    let options = NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "table-menu - Table Popover Menus",
        options,
        Box::new(|cc| Ok(Box::new(TableApp::new(cc, settings)))),
    )
}
