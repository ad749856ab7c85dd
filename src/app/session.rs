//! Table editing session: owns the menus and applies their actions

use std::cell::RefCell;
use std::rc::Rc;

use super::actions::{MenuId, TableAction};
use super::menus::{self, MenuContext};
use crate::menu::{ClickOutcome, ClickTarget, MenuToggler, StyleMap};
use crate::settings::AppSettings;
use crate::table::{CellPos, TableModel};

/// Horizontal distance of the row toggler from the table's left edge
pub const ROW_TOGGLER_INSET: f32 = 28.0;

/// Vertical distance of the column toggler above the table's top edge
pub const COL_TOGGLER_INSET: f32 = 28.0;

/// Geometry of the rendered grid, relative to the grid origin
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridGeometry {
    /// Vertical center of each row
    pub row_centers: Vec<f32>,
    /// Horizontal center of each column
    pub col_centers: Vec<f32>,
}

/// The tunes toggler sits above the table's top-right corner
fn tunes_position() -> StyleMap {
    StyleMap::from([
        ("top".to_string(), format!("{}px", -COL_TOGGLER_INSET)),
        ("right".to_string(), "0px".to_string()),
    ])
}

/// Table state plus the three menus that edit it
pub struct TableSession {
    ctx: MenuContext,
    row_menu: MenuToggler<TableAction>,
    col_menu: MenuToggler<TableAction>,
    tunes_menu: MenuToggler<TableAction>,
}

impl TableSession {
    pub fn new(settings: &AppSettings) -> Self {
        let ctx = MenuContext::new(TableModel::from_settings(settings));
        let mut session = Self {
            row_menu: menus::row_menu(&ctx, settings),
            col_menu: menus::col_menu(&ctx, settings),
            tunes_menu: menus::tunes_menu(&ctx, settings),
            ctx,
        };
        session.tunes_menu.show(tunes_position);
        session
    }

    /// Rebuild the menus after settings changed. Open menus are closed, and a
    /// data source that is no longer configured is unbound from the table.
    pub fn rebuild_menus(&mut self, settings: &AppSettings) {
        {
            let mut table = self.ctx.table.borrow_mut();
            let removed = table
                .iteratable()
                .filter(|source| !settings.iteratables.contains_key(*source))
                .map(str::to_owned);
            if let Some(source) = removed {
                log::info!("Data source '{}' was removed, unbinding table", source);
                table.set_iteratable(None);
            }
        }
        self.row_menu = menus::row_menu(&self.ctx, settings);
        self.col_menu = menus::col_menu(&self.ctx, settings);
        self.tunes_menu = menus::tunes_menu(&self.ctx, settings);
        self.tunes_menu.show(tunes_position);
        log::info!("Rebuilt table menus");
    }

    pub fn table(&self) -> &Rc<RefCell<TableModel>> {
        &self.ctx.table
    }

    pub fn selection(&self) -> Option<CellPos> {
        self.ctx.selection.get()
    }

    pub fn menu(&self, id: MenuId) -> &MenuToggler<TableAction> {
        match id {
            MenuId::Row => &self.row_menu,
            MenuId::Col => &self.col_menu,
            MenuId::Tunes => &self.tunes_menu,
        }
    }

    fn menu_mut(&mut self, id: MenuId) -> &mut MenuToggler<TableAction> {
        match id {
            MenuId::Row => &mut self.row_menu,
            MenuId::Col => &mut self.col_menu,
            MenuId::Tunes => &mut self.tunes_menu,
        }
    }

    /// Focus a cell (or nothing). Moving to another cell closes open menus.
    pub fn select(&mut self, cell: Option<CellPos>) {
        if self.ctx.selection.get() == cell {
            return;
        }
        self.ctx.selection.set(cell);
        self.close_menus();
        if cell.is_none() {
            self.row_menu.hide();
            self.col_menu.hide();
        }
    }

    /// Anchor the row and column togglers next to the selected cell
    pub fn place_togglers(&mut self, geometry: &GridGeometry) {
        let Some(cell) = self.ctx.selection.get() else {
            return;
        };
        if let Some(&center) = geometry.row_centers.get(cell.row) {
            self.row_menu.show(|| {
                StyleMap::from([
                    ("top".to_string(), format!("{:.0}px", center)),
                    ("left".to_string(), format!("{:.0}px", -ROW_TOGGLER_INSET)),
                ])
            });
        }
        if let Some(&center) = geometry.col_centers.get(cell.col) {
            self.col_menu.show(|| {
                StyleMap::from([
                    ("top".to_string(), format!("{:.0}px", -COL_TOGGLER_INSET)),
                    ("left".to_string(), format!("{:.0}px", center)),
                ])
            });
        }
    }

    /// Toggle-control click on one of the menus
    pub fn toggle(&mut self, id: MenuId) {
        let action = self.menu_mut(id).toggle();
        self.apply(action);
    }

    /// Click inside one of the popovers
    pub fn click(&mut self, id: MenuId, target: ClickTarget) {
        if let ClickOutcome::Invoked(action) = self.menu_mut(id).click(target) {
            self.apply(action);
        }
    }

    pub fn close_menus(&mut self) {
        for id in MenuId::ALL {
            self.menu_mut(id).popover_mut().close();
        }
    }

    /// Apply ready predicate results. Returns whether any are still in flight.
    pub fn pump(&mut self) -> bool {
        let mut pending = false;
        for id in MenuId::ALL {
            let popover = self.menu_mut(id).popover_mut();
            popover.pump();
            pending |= popover.has_pending_predicates();
        }
        pending
    }

    pub fn apply(&mut self, action: TableAction) {
        log::debug!("Applying {:?}", action);
        let item_action = action.is_item_action();
        let cell = self.ctx.selection.get();

        match action {
            TableAction::MenuOpened(id) => {
                for other in MenuId::ALL.into_iter().filter(|&other| other != id) {
                    self.menu_mut(other).popover_mut().close();
                }
            }
            TableAction::MenuClosed(_) => {}
            TableAction::ToggleHeadings => {
                let mut table = self.ctx.table.borrow_mut();
                table.with_headings = !table.with_headings;
            }
            TableAction::SelectIteratable(source) => {
                {
                    let mut table = self.ctx.table.borrow_mut();
                    let next = if table.iteratable() == Some(source.as_str()) {
                        None
                    } else {
                        Some(source)
                    };
                    table.set_iteratable(next);
                }
                let extra = menus::row_extra_items(&self.ctx);
                self.row_menu.set_extra_items(extra);
            }
            action => {
                let Some(cell) = cell else {
                    log::debug!("Ignoring {:?} without a selected cell", action);
                    return;
                };
                self.apply_to_cell(action, cell);
            }
        }

        if item_action {
            self.close_menus();
        }
    }

    fn apply_to_cell(&mut self, action: TableAction, cell: CellPos) {
        let mut table = self.ctx.table.borrow_mut();
        let selection = match action {
            TableAction::InsertRowAbove => {
                table.insert_row(cell.row);
                CellPos::new(cell.row + 1, cell.col)
            }
            TableAction::InsertRowBelow => {
                table.insert_row(cell.row + 1);
                cell
            }
            TableAction::DeleteRow => {
                if !table.delete_row(cell.row) {
                    log::warn!("Row {} could not be deleted", cell.row);
                }
                table.clamp(cell)
            }
            TableAction::InsertColLeft => {
                table.insert_col(cell.col);
                CellPos::new(cell.row, cell.col + 1)
            }
            TableAction::InsertColRight => {
                table.insert_col(cell.col + 1);
                cell
            }
            TableAction::DeleteCol => {
                if !table.delete_col(cell.col) {
                    log::warn!("Column {} could not be deleted", cell.col);
                }
                table.clamp(cell)
            }
            TableAction::ToggleIteratedRow => {
                table.toggle_iterated_row(cell.row);
                cell
            }
            _ => cell,
        };
        self.ctx.selection.set(Some(selection));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> TableSession {
        let mut session = TableSession::new(&AppSettings::default());
        session.select(Some(CellPos::new(1, 1)));
        session
    }

    #[test]
    fn test_opening_one_menu_closes_others() {
        let mut session = session();

        session.toggle(MenuId::Row);
        assert!(session.menu(MenuId::Row).is_opened());

        session.toggle(MenuId::Col);
        assert!(session.menu(MenuId::Col).is_opened());
        assert!(!session.menu(MenuId::Row).is_opened());
    }

    #[test]
    fn test_delete_row_needs_confirmation() {
        let mut session = session();
        session.toggle(MenuId::Row);

        session.click(MenuId::Row, ClickTarget::Item(2));
        assert_eq!(session.table().borrow().rows(), 3);
        assert!(session.menu(MenuId::Row).is_opened());

        session.click(MenuId::Row, ClickTarget::Item(2));
        assert_eq!(session.table().borrow().rows(), 2);
        assert!(!session.menu(MenuId::Row).is_opened());
    }

    #[test]
    fn test_insert_above_keeps_selected_content() {
        let mut session = session();
        session.toggle(MenuId::Row);

        session.click(MenuId::Row, ClickTarget::Item(0));

        assert_eq!(session.table().borrow().rows(), 4);
        assert_eq!(session.selection(), Some(CellPos::new(2, 1)));
    }

    #[test]
    fn test_selecting_source_enables_repeat_item() {
        let mut session = session();
        session.toggle(MenuId::Tunes);
        // Tunes: Headings, Iterate billings, Iterate patients
        session.click(MenuId::Tunes, ClickTarget::Item(2));
        assert_eq!(session.table().borrow().iteratable(), Some("patients"));

        session.toggle(MenuId::Row);
        let rendered = session.menu(MenuId::Row).popover().rendered();
        assert_eq!(rendered.len(), 4);
        assert_eq!(rendered[3].label, "Repeat for each patients");

        session.click(MenuId::Row, ClickTarget::Item(3));
        assert_eq!(session.table().borrow().iterated_row(), Some(1));
    }

    #[test]
    fn test_reselecting_source_clears_it() {
        let mut session = session();
        session.apply(TableAction::SelectIteratable("billings".into()));
        session.apply(TableAction::SelectIteratable("billings".into()));

        assert_eq!(session.table().borrow().iteratable(), None);
        session.toggle(MenuId::Row);
        assert_eq!(session.menu(MenuId::Row).popover().rendered().len(), 3);
    }

    #[test]
    fn test_cell_actions_need_selection() {
        let mut session = TableSession::new(&AppSettings::default());
        session.apply(TableAction::InsertColRight);
        assert_eq!(session.table().borrow().cols(), 3);
    }

    #[test]
    fn test_moving_selection_closes_menus() {
        let mut session = session();
        session.toggle(MenuId::Row);

        session.select(Some(CellPos::new(0, 0)));

        assert!(!session.menu(MenuId::Row).is_opened());
    }

    #[test]
    fn test_place_togglers_uses_geometry() {
        let mut session = session();
        let geometry = GridGeometry {
            row_centers: vec![10.0, 30.0, 50.0],
            col_centers: vec![40.0, 120.0, 200.0],
        };

        session.place_togglers(&geometry);

        let row = session.menu(MenuId::Row);
        assert!(row.is_shown());
        assert_eq!(row.style().get("top").map(String::as_str), Some("30px"));
        let col = session.menu(MenuId::Col);
        assert_eq!(col.style().get("left").map(String::as_str), Some("120px"));
    }

    #[test]
    fn test_rebuild_applies_confirmation_setting() {
        let mut session = session();
        let settings = AppSettings {
            confirm_destructive: false,
            ..AppSettings::default()
        };

        session.rebuild_menus(&settings);
        session.toggle(MenuId::Col);
        session.click(MenuId::Col, ClickTarget::Item(2));

        assert_eq!(session.table().borrow().cols(), 2);
        assert!(session.menu(MenuId::Tunes).is_shown());
    }

    #[test]
    fn test_removed_source_is_unbound() {
        let mut session = session();
        session.apply(TableAction::SelectIteratable("patients".into()));
        session.apply(TableAction::ToggleIteratedRow);
        let mut settings = AppSettings::default();
        settings.iteratables.remove("patients");

        session.rebuild_menus(&settings);

        assert_eq!(session.table().borrow().iteratable(), None);
        assert_eq!(session.table().borrow().iterated_row(), None);
        session.toggle(MenuId::Row);
        assert_eq!(session.menu(MenuId::Row).popover().rendered().len(), 3);
    }

    #[test]
    fn test_rebuild_keeps_configured_source() {
        let mut session = session();
        session.apply(TableAction::SelectIteratable("billings".into()));

        session.rebuild_menus(&AppSettings::default());

        assert_eq!(session.table().borrow().iteratable(), Some("billings"));
        session.toggle(MenuId::Row);
        assert_eq!(session.menu(MenuId::Row).popover().rendered().len(), 4);
    }

    #[test]
    fn test_pump_settles_predicates() {
        let mut session = session();
        session.apply(TableAction::ToggleHeadings);
        session.toggle(MenuId::Tunes);

        assert!(!session.pump());
        assert!(session.menu(MenuId::Tunes).popover().rendered()[0].active);
    }
}
