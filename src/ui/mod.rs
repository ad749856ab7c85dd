//! UI components for the table demo

pub mod popover;
pub mod settings_dialog;
pub mod table_grid;
