//! Draws a toggler and its popover from the menu render tree

use eframe::egui::{self, RichText};

use crate::menu::{ClickTarget, PopoverView, RenderedItem, StyleMap, TogglerElement};

/// Minimum popover width in logical pixels
const POPOVER_MIN_WIDTH: f32 = 180.0;

/// Size of the square toggle control
const TOGGLER_SIZE: f32 = 22.0;

/// Gap between the toggle control and the popover
const POPOVER_GAP: f32 = 4.0;

/// What the user did with a toggler this frame
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TogglerResponse {
    /// The toggle control was clicked
    pub toggled: bool,
    /// A click landed inside the popover
    pub click: Option<ClickTarget>,
}

/// Parse a CSS-like pixel length (`"12px"`, `"-8"`)
fn parse_px(value: &str) -> Option<f32> {
    let value = value.trim();
    value.strip_suffix("px").unwrap_or(value).trim().parse().ok()
}

/// Resolve `top`/`left`/`right`/`bottom` style entries against `bounds`.
/// Unknown properties and unparsable values are ignored.
pub fn style_position(style: &StyleMap, bounds: egui::Rect) -> egui::Pos2 {
    let px = |name: &str| style.get(name).and_then(|v| parse_px(v));

    let x = match (px("left"), px("right")) {
        (Some(left), _) => bounds.left() + left,
        (None, Some(right)) => bounds.right() - right - TOGGLER_SIZE,
        (None, None) => bounds.left(),
    };
    let y = match (px("top"), px("bottom")) {
        (Some(top), _) => bounds.top() + top,
        (None, Some(bottom)) => bounds.bottom() - bottom - TOGGLER_SIZE,
        (None, None) => bounds.top(),
    };
    egui::pos2(x, y - TOGGLER_SIZE / 2.0)
}

/// Show a toggler anchored inside `bounds` (the table area)
pub fn show_toggler<A: Clone>(
    ctx: &egui::Context,
    id: egui::Id,
    element: TogglerElement<'_, A>,
    bounds: egui::Rect,
    icon: &str,
) -> TogglerResponse {
    let mut response = TogglerResponse::default();
    if !element.shown {
        return response;
    }

    let pos = style_position(element.style, bounds);
    egui::Area::new(id)
        .fixed_pos(pos)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            let toggle = ui.add_sized(
                [TOGGLER_SIZE, TOGGLER_SIZE],
                egui::SelectableLabel::new(element.popover.is_opened(), icon),
            );
            if toggle.clicked() {
                response.toggled = true;
            }

            let view = element.popover.view();
            if view.opened {
                ui.add_space(POPOVER_GAP);
                response.click = show_popover(ui, view);
            }
        });

    response
}

/// Draw the open popover. Clicks are reported by row position, or as `Root` when
/// they land on the panel but not on a row.
fn show_popover(ui: &mut egui::Ui, view: PopoverView<'_>) -> Option<ClickTarget> {
    let mut clicked_item = None;

    let frame = egui::Frame::popup(ui.style()).show(ui, |ui| {
        ui.set_min_width(POPOVER_MIN_WIDTH);
        for item in view.visible_items() {
            if item_row(ui, item).clicked() {
                clicked_item = Some(ClickTarget::Item(item.index));
            }
        }
    });

    if clicked_item.is_some() {
        return clicked_item;
    }
    let root = frame.response.interact(egui::Sense::click());
    root.clicked().then_some(ClickTarget::Root)
}

fn item_row(ui: &mut egui::Ui, item: &RenderedItem) -> egui::Response {
    let text = match &item.icon {
        Some(icon) => format!("{}  {}", icon, item.label),
        None => item.label.clone(),
    };

    let text = if item.confirming {
        RichText::new(text).color(egui::Color32::from_rgb(230, 90, 90))
    } else {
        RichText::new(text)
    };

    let row = ui.add_sized(
        [ui.available_width(), 0.0],
        egui::SelectableLabel::new(item.active, text),
    );
    if item.confirming {
        row.on_hover_text("Click again to confirm")
    } else {
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(300.0, 200.0))
    }

    #[test]
    fn test_parse_px() {
        assert_eq!(parse_px("12px"), Some(12.0));
        assert_eq!(parse_px(" -8 "), Some(-8.0));
        assert_eq!(parse_px("auto"), None);
    }

    #[test]
    fn test_position_from_top_left() {
        let style = StyleMap::from([
            ("top".to_string(), "40px".to_string()),
            ("left".to_string(), "-28px".to_string()),
        ]);
        let pos = style_position(&style, bounds());
        assert_eq!(pos, egui::pos2(72.0, 90.0 - TOGGLER_SIZE / 2.0));
    }

    #[test]
    fn test_position_from_right_and_unknown_props() {
        let style = StyleMap::from([
            ("right".to_string(), "0px".to_string()),
            ("z-index".to_string(), "3".to_string()),
        ]);
        let pos = style_position(&style, bounds());
        assert_eq!(pos.x, 400.0 - TOGGLER_SIZE);
        assert_eq!(pos.y, 50.0 - TOGGLER_SIZE / 2.0);
    }
}
