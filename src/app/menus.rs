//! Menu definitions for the row, column and block-tunes togglers

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::future;

use super::actions::{MenuId, TableAction};
use crate::menu::{MenuItem, MenuToggler, PredicateError};
use crate::settings::AppSettings;
use crate::table::{CellPos, TableModel};

/// State the menu predicates read when they are evaluated
#[derive(Clone)]
pub struct MenuContext {
    pub table: Rc<RefCell<TableModel>>,
    pub selection: Rc<Cell<Option<CellPos>>>,
}

impl MenuContext {
    pub fn new(table: TableModel) -> Self {
        Self {
            table: Rc::new(RefCell::new(table)),
            selection: Rc::new(Cell::new(None)),
        }
    }
}

/// Read the table for a predicate, failing instead of panicking if it is mutably borrowed
fn read_table<T>(
    table: &RefCell<TableModel>,
    read: impl FnOnce(&TableModel) -> T,
) -> Result<T, PredicateError> {
    table
        .try_borrow()
        .map(|table| read(&table))
        .map_err(|e| PredicateError::Unavailable(e.to_string()))
}

fn delete_item(label: &str, action: TableAction, confirm: bool) -> MenuItem<TableAction> {
    let item = MenuItem::new(label, action).with_icon("\u{2715}");
    if confirm {
        item.with_confirmation()
    } else {
        item
    }
}

/// Row toggler. Its extra item only applies while a data source is selected.
pub fn row_menu(ctx: &MenuContext, settings: &AppSettings) -> MenuToggler<TableAction> {
    let last_row = Rc::clone(&ctx.table);
    let items = vec![
        MenuItem::new("Add row above", TableAction::InsertRowAbove).with_icon("\u{2191}"),
        MenuItem::new("Add row below", TableAction::InsertRowBelow).with_icon("\u{2193}"),
        delete_item("Delete row", TableAction::DeleteRow, settings.confirm_destructive)
            .hide_if(move || future::ready(read_table(&last_row, |t| t.rows() <= 1))),
    ];

    let table = Rc::clone(&ctx.table);
    let mut toggler = MenuToggler::new(
        items,
        TableAction::MenuOpened(MenuId::Row),
        TableAction::MenuClosed(MenuId::Row),
        move || table.try_borrow().is_ok_and(|t| t.iteratable().is_some()),
    );
    toggler.set_extra_items(row_extra_items(ctx));
    toggler
}

/// "Repeat for each <source>" for the currently selected data source, if any
pub fn row_extra_items(ctx: &MenuContext) -> Vec<MenuItem<TableAction>> {
    let source = match read_table(&ctx.table, |t| t.iteratable().map(str::to_owned)) {
        Ok(Some(source)) => source,
        Ok(None) => return Vec::new(),
        Err(e) => {
            log::warn!("Could not build row extra items: {}", e);
            return Vec::new();
        }
    };

    let table = Rc::clone(&ctx.table);
    let selection = Rc::clone(&ctx.selection);
    vec![
        MenuItem::new(format!("Repeat for each {}", source), TableAction::ToggleIteratedRow)
            .with_icon("\u{21BB}")
            .active_if(move || {
                let row = selection.get().map(|cell| cell.row);
                let table = Rc::clone(&table);
                async move { read_table(&table, |t| row.is_some() && t.iterated_row() == row) }
            }),
    ]
}

/// Column toggler
pub fn col_menu(ctx: &MenuContext, settings: &AppSettings) -> MenuToggler<TableAction> {
    let last_col = Rc::clone(&ctx.table);
    let items = vec![
        MenuItem::new("Add column to the left", TableAction::InsertColLeft).with_icon("\u{2190}"),
        MenuItem::new("Add column to the right", TableAction::InsertColRight)
            .with_icon("\u{2192}"),
        delete_item("Delete column", TableAction::DeleteCol, settings.confirm_destructive)
            .hide_if(move || future::ready(read_table(&last_col, |t| t.cols() <= 1))),
    ];

    MenuToggler::new(
        items,
        TableAction::MenuOpened(MenuId::Col),
        TableAction::MenuClosed(MenuId::Col),
        || false,
    )
}

/// Block tunes: headings switch plus one entry per configured data source
pub fn tunes_menu(ctx: &MenuContext, settings: &AppSettings) -> MenuToggler<TableAction> {
    let headings = Rc::clone(&ctx.table);
    let mut items = vec![MenuItem::new("Headings", TableAction::ToggleHeadings)
        .with_icon("H")
        .active_if(move || future::ready(read_table(&headings, |t| t.with_headings)))];

    for name in settings.iteratable_names() {
        let table = Rc::clone(&ctx.table);
        let source = name.to_owned();
        items.push(
            MenuItem::new(
                format!("Iterate {}", name),
                TableAction::SelectIteratable(name.to_owned()),
            )
            .active_if(move || {
                future::ready(read_table(&table, |t| t.iteratable() == Some(source.as_str())))
            }),
        );
    }

    MenuToggler::new(
        items,
        TableAction::MenuOpened(MenuId::Tunes),
        TableAction::MenuClosed(MenuId::Tunes),
        || false,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::ClickTarget;

    fn context() -> MenuContext {
        MenuContext::new(TableModel::new(3, 3))
    }

    fn labels(toggler: &MenuToggler<TableAction>) -> Vec<String> {
        toggler
            .popover()
            .view()
            .visible_items()
            .map(|r| r.label.clone())
            .collect()
    }

    #[test]
    fn test_row_menu_without_source_has_no_extra_items() {
        let ctx = context();
        let mut menu = row_menu(&ctx, &AppSettings::default());

        menu.toggle();
        pollster::block_on(menu.popover_mut().settle());

        assert_eq!(labels(&menu), ["Add row above", "Add row below", "Delete row"]);
    }

    #[test]
    fn test_row_menu_with_source_shows_repeat_item() {
        let ctx = context();
        ctx.table.borrow_mut().set_iteratable(Some("patients".into()));
        ctx.table.borrow_mut().toggle_iterated_row(2);
        ctx.selection.set(Some(CellPos::new(2, 0)));
        let mut menu = row_menu(&ctx, &AppSettings::default());

        menu.toggle();
        pollster::block_on(menu.popover_mut().settle());

        let rendered = menu.popover().rendered();
        assert_eq!(rendered[3].label, "Repeat for each patients");
        assert!(rendered[3].active);
        assert_eq!(
            menu.click(ClickTarget::Item(3)).into_action(),
            Some(TableAction::ToggleIteratedRow)
        );
    }

    #[test]
    fn test_delete_hidden_for_last_row() {
        let ctx = MenuContext::new(TableModel::new(1, 2));
        let mut menu = row_menu(&ctx, &AppSettings::default());

        menu.toggle();
        pollster::block_on(menu.popover_mut().settle());

        assert_eq!(labels(&menu), ["Add row above", "Add row below"]);
    }

    #[test]
    fn test_delete_confirmation_follows_settings() {
        let ctx = context();
        let settings = AppSettings {
            confirm_destructive: false,
            ..AppSettings::default()
        };
        let mut menu = col_menu(&ctx, &settings);
        menu.toggle();

        assert_eq!(
            menu.click(ClickTarget::Item(2)).into_action(),
            Some(TableAction::DeleteCol)
        );
    }

    #[test]
    fn test_busy_table_leaves_items_unchanged() {
        let ctx = context();
        let mut menu = tunes_menu(&ctx, &AppSettings::default());
        ctx.table.borrow_mut().with_headings = true;

        let guard = ctx.table.borrow_mut();
        menu.toggle();
        pollster::block_on(menu.popover_mut().settle());
        drop(guard);

        assert!(!menu.popover().rendered()[0].active);
    }

    #[test]
    fn test_tunes_reflect_table_state() {
        let ctx = context();
        ctx.table.borrow_mut().with_headings = true;
        ctx.table.borrow_mut().set_iteratable(Some("patients".into()));
        let mut menu = tunes_menu(&ctx, &AppSettings::default());

        menu.toggle();
        pollster::block_on(menu.popover_mut().settle());

        let active: Vec<_> = menu
            .popover()
            .rendered()
            .iter()
            .filter(|r| r.active)
            .map(|r| r.label.as_str())
            .collect();
        assert_eq!(active, ["Headings", "Iterate patients"]);
    }
}
