//! Render tree produced by the popover, and the click protocol the UI feeds back

use super::item::{ItemKey, MenuItem};

/// One rendered row. Visual state is derived only from these flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
    pub key: ItemKey,
    /// Position in `items ++ extra_items` at render time
    pub index: usize,
    pub label: String,
    pub icon: Option<String>,
    pub hidden: bool,
    pub active: bool,
    /// Waiting for the second click of a confirmation-gated item
    pub confirming: bool,
}

impl RenderedItem {
    pub(super) fn from_item<A>(index: usize, item: &MenuItem<A>) -> Self {
        Self {
            key: item.key(),
            index,
            label: item.label().to_owned(),
            icon: item.icon().map(str::to_owned),
            hidden: false,
            active: false,
            confirming: false,
        }
    }
}

/// Borrowed snapshot of a popover for the UI layer
#[derive(Debug, Clone, Copy)]
pub struct PopoverView<'a> {
    pub opened: bool,
    pub generation: u64,
    pub items: &'a [RenderedItem],
}

impl PopoverView<'_> {
    /// Rows that should currently be drawn
    pub fn visible_items(&self) -> impl Iterator<Item = &RenderedItem> {
        self.items.iter().filter(|item| !item.hidden)
    }
}

/// Where a click inside the popover landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Inside the popover but outside any row (padding, gaps)
    Root,
    /// The row rendered at this position
    Item(usize),
}

/// Result of dispatching a click
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome<A> {
    /// Nothing resolved; no state changed
    Ignored,
    /// First click on a confirmation-gated item
    ConfirmationPending,
    /// The item's action, to be applied by the caller exactly once
    Invoked(A),
}

impl<A> ClickOutcome<A> {
    pub fn into_action(self) -> Option<A> {
        match self {
            ClickOutcome::Invoked(action) => Some(action),
            _ => None,
        }
    }
}
