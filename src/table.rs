//! Table content model driven by the menu actions

use crate::settings::AppSettings;

/// Position of a cell in the table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Content matrix plus the data-binding state the menus toggle
#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    /// Cell text, row-major. Every row has `cols()` cells.
    content: Vec<Vec<String>>,

    /// Whether the first row is rendered as headings
    pub with_headings: bool,

    /// Data source the table iterates over, if any
    iteratable: Option<String>,

    /// Row repeated once per element of `iteratable`
    iterated_row: Option<usize>,
}

impl TableModel {
    /// Create an empty table of the given size
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            content: vec![vec![String::new(); cols]; rows],
            with_headings: false,
            iteratable: None,
            iterated_row: None,
        }
    }

    /// Create a table from the configured defaults
    pub fn from_settings(settings: &AppSettings) -> Self {
        let mut table = Self::new(settings.default_rows, settings.default_cols);
        table.with_headings = settings.with_headings;
        table
    }

    pub fn rows(&self) -> usize {
        self.content.len()
    }

    pub fn cols(&self) -> usize {
        self.content.first().map_or(0, Vec::len)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.content.get(row)?.get(col).map(String::as_str)
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut String> {
        self.content.get_mut(row)?.get_mut(col)
    }

    /// Insert an empty row so it ends up at `index` (clamped to the end)
    pub fn insert_row(&mut self, index: usize) {
        let index = index.min(self.rows());
        self.content.insert(index, vec![String::new(); self.cols()]);
        if let Some(row) = self.iterated_row.as_mut() {
            if *row >= index {
                *row += 1;
            }
        }
    }

    /// Delete a row. The last remaining row cannot be deleted.
    #[must_use = "returns whether the row was removed"]
    pub fn delete_row(&mut self, index: usize) -> bool {
        if index >= self.rows() || self.rows() == 1 {
            return false;
        }
        self.content.remove(index);
        self.iterated_row = match self.iterated_row {
            Some(row) if row == index => None,
            Some(row) if row > index => Some(row - 1),
            other => other,
        };
        true
    }

    /// Insert an empty column so it ends up at `index` (clamped to the end)
    pub fn insert_col(&mut self, index: usize) {
        let index = index.min(self.cols());
        for row in &mut self.content {
            row.insert(index, String::new());
        }
    }

    /// Delete a column. The last remaining column cannot be deleted.
    #[must_use = "returns whether the column was removed"]
    pub fn delete_col(&mut self, index: usize) -> bool {
        if index >= self.cols() || self.cols() == 1 {
            return false;
        }
        for row in &mut self.content {
            row.remove(index);
        }
        true
    }

    /// Select the data source rows can be bound to. Selecting a different source
    /// drops the current binding.
    pub fn set_iteratable(&mut self, source: Option<String>) {
        if self.iteratable != source {
            self.iterated_row = None;
        }
        self.iteratable = source;
    }

    pub fn iteratable(&self) -> Option<&str> {
        self.iteratable.as_deref()
    }

    /// Bind `row` to the current data source, or unbind it if it already is
    pub fn toggle_iterated_row(&mut self, row: usize) {
        if self.iteratable.is_none() || row >= self.rows() {
            return;
        }
        self.iterated_row = if self.iterated_row == Some(row) {
            None
        } else {
            Some(row)
        };
    }

    pub fn iterated_row(&self) -> Option<usize> {
        self.iterated_row
    }

    /// Move `pos` back inside the table after rows or columns were removed
    pub fn clamp(&self, pos: CellPos) -> CellPos {
        CellPos {
            row: pos.row.min(self.rows().saturating_sub(1)),
            col: pos.col.min(self.cols().saturating_sub(1)),
        }
    }
}
