//! Messages produced by the table menus

/// Which toggler a message came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuId {
    /// Row actions, anchored left of the selected row
    Row,
    /// Column actions, anchored above the selected column
    Col,
    /// Block-level settings (headings, data source)
    Tunes,
}

impl MenuId {
    pub const ALL: [MenuId; 3] = [MenuId::Row, MenuId::Col, MenuId::Tunes];

    /// Glyph drawn on the toggle control
    pub fn icon(self) -> &'static str {
        match self {
            MenuId::Row | MenuId::Col => "\u{22EF}",
            MenuId::Tunes => "\u{2699}",
        }
    }
}

/// Action returned by a menu item or toggler, applied after the UI pass
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableAction {
    InsertRowAbove,
    InsertRowBelow,
    DeleteRow,
    InsertColLeft,
    InsertColRight,
    DeleteCol,
    /// Bind the selected row to the current data source (or unbind it)
    ToggleIteratedRow,
    ToggleHeadings,
    /// Select a data source, or clear it when it is already selected
    SelectIteratable(String),
    MenuOpened(MenuId),
    MenuClosed(MenuId),
}

impl TableAction {
    /// Whether this came from an item rather than from a toggle control
    pub fn is_item_action(&self) -> bool {
        !matches!(self, TableAction::MenuOpened(_) | TableAction::MenuClosed(_))
    }
}
