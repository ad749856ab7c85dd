//! table-menu: contextual popover menus for table row/column actions
//!
//! [`menu`] holds the widgets themselves. The remaining modules make up the
//! desktop demo host that drives them from a small table editor.

pub mod app;
pub mod menu;
pub mod settings;
pub mod table;
pub mod ui;
