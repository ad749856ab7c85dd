//! Menu item definitions supplied by the caller

use std::fmt;
use std::future::Future;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::{self, FutureExt};

use super::predicate::{Predicate, PredicateError};

/// Next key handed out by [`ItemKey::next`]
static NEXT_ITEM_KEY: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a menu item, assigned when the item is built
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(u64);

impl ItemKey {
    fn next() -> Self {
        Self(NEXT_ITEM_KEY.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value (for egui ids and log output)
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One selectable action in a popover menu.
///
/// `A` is the caller's message type. Clicking a confirmed item hands a clone of
/// `on_click` back to the caller instead of running a closure, so the caller can
/// apply it after the UI pass without fighting the borrow checker.
///
/// Items are immutable once built. Clones share the same [`ItemKey`].
#[derive(Clone)]
pub struct MenuItem<A> {
    key: ItemKey,
    label: String,
    icon: Option<String>,
    confirmation_required: bool,
    hide_if: Option<Predicate>,
    active_if: Option<Predicate>,
    on_click: A,
}

impl<A> MenuItem<A> {
    /// Create an item with a label and the action returned when it is clicked
    pub fn new(label: impl Into<String>, on_click: A) -> Self {
        Self {
            key: ItemKey::next(),
            label: label.into(),
            icon: None,
            confirmation_required: false,
            hide_if: None,
            active_if: None,
            on_click,
        }
    }

    /// Attach an icon reference (passed through to the renderer untouched)
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Require a second click before the action fires
    pub fn with_confirmation(mut self) -> Self {
        self.confirmation_required = true;
        self
    }

    /// Hide the item while the predicate resolves to `true`
    pub fn hide_if<F, Fut>(mut self, predicate: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<bool, PredicateError>> + 'static,
    {
        self.hide_if = Some(Rc::new(move || predicate().boxed_local()));
        self
    }

    /// Mark the item active while the predicate resolves to `true`
    pub fn active_if<F, Fut>(mut self, predicate: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<bool, PredicateError>> + 'static,
    {
        self.active_if = Some(Rc::new(move || predicate().boxed_local()));
        self
    }

    /// Synchronous shorthand for [`MenuItem::hide_if`]
    pub fn hide_when(self, predicate: impl Fn() -> bool + 'static) -> Self {
        self.hide_if(move || future::ready(Ok(predicate())))
    }

    /// Synchronous shorthand for [`MenuItem::active_if`]
    pub fn active_when(self, predicate: impl Fn() -> bool + 'static) -> Self {
        self.active_if(move || future::ready(Ok(predicate())))
    }

    pub fn key(&self) -> ItemKey {
        self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn confirmation_required(&self) -> bool {
        self.confirmation_required
    }

    pub(super) fn hide_predicate(&self) -> Option<&Predicate> {
        self.hide_if.as_ref()
    }

    pub(super) fn active_predicate(&self) -> Option<&Predicate> {
        self.active_if.as_ref()
    }

    /// The action handed back on a confirmed click
    pub fn action(&self) -> &A {
        &self.on_click
    }
}

impl<A: fmt::Debug> fmt::Debug for MenuItem<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("confirmation_required", &self.confirmation_required)
            .field("hide_if", &self.hide_if.is_some())
            .field("active_if", &self.active_if.is_some())
            .field("on_click", &self.on_click)
            .finish()
    }
}
