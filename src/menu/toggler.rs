//! Toggle control that opens and closes a popover

use std::collections::BTreeMap;

use super::item::MenuItem;
use super::popover::PopoverMenu;
use super::view::{ClickOutcome, ClickTarget};

/// Inline style properties applied to the toggler root (e.g. `top` -> `"42px"`)
pub type StyleMap = BTreeMap<String, String>;

/// Composed root: toggle control plus its popover
pub struct TogglerElement<'a, A> {
    pub shown: bool,
    pub style: &'a StyleMap,
    pub popover: &'a PopoverMenu<A>,
}

/// Always-visible control owning one [`PopoverMenu`].
///
/// Before every open the toggler asks `has_extra_items` whether its retained extra
/// items apply right now, so the caller can change eligibility between openings
/// without rebuilding the widget.
pub struct MenuToggler<A> {
    popover: PopoverMenu<A>,

    /// Extra items handed to the popover when `has_extra_items` says so
    extra_items: Vec<MenuItem<A>>,

    on_open: A,
    on_close: A,
    has_extra_items: Box<dyn Fn() -> bool>,

    shown: bool,
    style: StyleMap,
}

impl<A: Clone> MenuToggler<A> {
    pub fn new(
        items: Vec<MenuItem<A>>,
        on_open: A,
        on_close: A,
        has_extra_items: impl Fn() -> bool + 'static,
    ) -> Self {
        Self {
            popover: PopoverMenu::new(items),
            extra_items: Vec::new(),
            on_open,
            on_close,
            has_extra_items: Box::new(has_extra_items),
            shown: false,
            style: StyleMap::new(),
        }
    }

    pub fn element(&self) -> TogglerElement<'_, A> {
        TogglerElement {
            shown: self.shown,
            style: &self.style,
            popover: &self.popover,
        }
    }

    /// Apply the caller's position verbatim and make the toggler visible
    pub fn show(&mut self, compute_position: impl FnOnce() -> StyleMap) {
        self.style.extend(compute_position());
        self.shown = true;
    }

    /// Close the popover and hide the toggler
    pub fn hide(&mut self) {
        self.popover.close();
        self.shown = false;
    }

    /// Toggle-control click. Returns `on_open` or `on_close` for the caller to apply.
    pub fn toggle(&mut self) -> A {
        if self.popover.is_opened() {
            self.popover.close();
            return self.on_close.clone();
        }

        self.popover.set_extra_items(Vec::new());
        if (self.has_extra_items)() {
            self.popover.set_extra_items(self.extra_items.clone());
        }
        self.popover.open();
        self.on_open.clone()
    }

    /// Replace the retained extra items used by later openings
    pub fn set_extra_items(&mut self, extra_items: Vec<MenuItem<A>>) {
        self.extra_items = extra_items;
    }

    pub fn extra_items(&self) -> &[MenuItem<A>] {
        &self.extra_items
    }

    /// Forward a click inside the popover
    pub fn click(&mut self, target: ClickTarget) -> ClickOutcome<A> {
        self.popover.click(target)
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn is_opened(&self) -> bool {
        self.popover.is_opened()
    }

    pub fn style(&self) -> &StyleMap {
        &self.style
    }

    pub fn popover(&self) -> &PopoverMenu<A> {
        &self.popover
    }

    pub fn popover_mut(&mut self) -> &mut PopoverMenu<A> {
        &mut self.popover
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Debug, PartialEq)]
    enum Msg {
        Opened,
        Closed,
        Item(&'static str),
    }

    fn toggler(has_extra: Rc<Cell<bool>>) -> MenuToggler<Msg> {
        let mut toggler = MenuToggler::new(
            vec![MenuItem::new("Delete row", Msg::Item("delete")).with_confirmation()],
            Msg::Opened,
            Msg::Closed,
            move || has_extra.get(),
        );
        toggler.set_extra_items(vec![MenuItem::new("Insert col", Msg::Item("insert"))]);
        toggler
    }

    #[test]
    fn test_extra_items_included_when_eligible() {
        let mut toggler = toggler(Rc::new(Cell::new(true)));

        assert_eq!(toggler.toggle(), Msg::Opened);

        let labels: Vec<_> = toggler
            .popover()
            .rendered()
            .iter()
            .map(|r| r.label.as_str())
            .collect();
        assert_eq!(labels, ["Delete row", "Insert col"]);
        assert_eq!(
            toggler.click(ClickTarget::Item(1)),
            ClickOutcome::Invoked(Msg::Item("insert"))
        );
    }

    #[test]
    fn test_extra_items_excluded_when_not_eligible() {
        let mut toggler = toggler(Rc::new(Cell::new(false)));

        toggler.toggle();

        assert_eq!(toggler.popover().rendered().len(), 1);
        assert!(toggler.popover().extra_items().is_empty());
        assert_eq!(toggler.extra_items().len(), 1);
    }

    #[test]
    fn test_eligibility_is_checked_on_every_open() {
        let has_extra = Rc::new(Cell::new(true));
        let mut toggler = toggler(Rc::clone(&has_extra));

        toggler.toggle();
        assert_eq!(toggler.popover().rendered().len(), 2);
        toggler.toggle();

        has_extra.set(false);
        toggler.toggle();
        assert_eq!(toggler.popover().rendered().len(), 1);
    }

    #[test]
    fn test_toggle_open_close_cycle() {
        let mut toggler = toggler(Rc::new(Cell::new(false)));

        assert_eq!(toggler.toggle(), Msg::Opened);
        assert!(toggler.is_opened());
        assert_eq!(toggler.click(ClickTarget::Item(0)), ClickOutcome::ConfirmationPending);

        assert_eq!(toggler.toggle(), Msg::Closed);
        assert!(!toggler.is_opened());
        assert!(!toggler.popover().rendered()[0].confirming);
    }

    #[test]
    fn test_show_merges_style() {
        let mut toggler = toggler(Rc::new(Cell::new(false)));

        toggler.show(|| StyleMap::from([("top".to_string(), "10px".to_string())]));
        toggler.show(|| {
            StyleMap::from([
                ("top".to_string(), "24px".to_string()),
                ("left".to_string(), "-8px".to_string()),
            ])
        });

        assert!(toggler.is_shown());
        assert_eq!(toggler.style().get("top").map(String::as_str), Some("24px"));
        assert_eq!(toggler.style().get("left").map(String::as_str), Some("-8px"));
    }

    #[test]
    fn test_hide_closes_popover() {
        let mut toggler = toggler(Rc::new(Cell::new(false)));
        toggler.show(StyleMap::new);
        toggler.toggle();
        toggler.click(ClickTarget::Item(0));

        toggler.hide();

        let element = toggler.element();
        assert!(!element.shown);
        assert!(!element.popover.is_opened());
        assert!(!element.popover.rendered()[0].confirming);
    }
}
