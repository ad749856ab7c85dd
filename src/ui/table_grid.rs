//! Editable table grid

use eframe::egui::{self, RichText};

use crate::app::GridGeometry;
use crate::table::{CellPos, TableModel};

/// Width of a cell editor
const CELL_WIDTH: f32 = 140.0;

/// Result of drawing the grid for one frame
pub struct GridResponse {
    /// Screen rect covered by the grid
    pub rect: egui::Rect,
    /// Row and column centers relative to `rect.min`
    pub geometry: GridGeometry,
    /// Cell that holds keyboard focus, if any
    pub focused: Option<CellPos>,
}

/// Show the table as a grid of single-line editors
pub fn show(
    ui: &mut egui::Ui,
    table: &mut TableModel,
    selection: Option<CellPos>,
) -> GridResponse {
    let rows = table.rows();
    let cols = table.cols();
    let with_headings = table.with_headings;
    let iterated_row = table.iterated_row();
    let source = table.iteratable().map(str::to_owned);

    let mut row_rects: Vec<Option<egui::Rect>> = vec![None; rows];
    let mut col_rects: Vec<Option<egui::Rect>> = vec![None; cols];
    let mut focused = None;

    let grid = egui::Grid::new("table_grid")
        .spacing([4.0, 4.0])
        .show(ui, |ui| {
            for row in 0..rows {
                for col in 0..cols {
                    let Some(cell) = table.cell_mut(row, col) else {
                        continue;
                    };
                    let mut editor = egui::TextEdit::singleline(cell).desired_width(CELL_WIDTH);
                    if with_headings && row == 0 {
                        editor = editor.font(egui::TextStyle::Heading);
                    }
                    let response = ui.add(editor);

                    if response.has_focus() {
                        focused = Some(CellPos::new(row, col));
                    }
                    if selection == Some(CellPos::new(row, col)) {
                        ui.painter().rect_stroke(
                            response.rect.expand(1.0),
                            2.0,
                            ui.visuals().selection.stroke,
                        );
                    }
                    let rect = response.rect;
                    row_rects[row] = Some(row_rects[row].map_or(rect, |r| r.union(rect)));
                    col_rects[col] = Some(col_rects[col].map_or(rect, |r| r.union(rect)));
                }

                if iterated_row == Some(row) {
                    if let Some(source) = &source {
                        ui.label(
                            RichText::new(format!("\u{21BB} each {}", source))
                                .small()
                                .color(egui::Color32::GRAY),
                        );
                    }
                }
                ui.end_row();
            }
        });

    let rect = grid.response.rect;
    let geometry = GridGeometry {
        row_centers: row_rects
            .iter()
            .map(|r| r.map_or(0.0, |r| r.center().y - rect.top()))
            .collect(),
        col_centers: col_rects
            .iter()
            .map(|r| r.map_or(0.0, |r| r.center().x - rect.left()))
            .collect(),
    };

    GridResponse {
        rect,
        geometry,
        focused,
    }
}
