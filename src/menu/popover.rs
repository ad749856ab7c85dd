//! Popover menu: item rendering, async predicate state, and click dispatch

use std::task::{Context, Poll};

use futures::future::LocalBoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};

use super::diagnostics::{DiagnosticsHook, MenuDiagnostic};
use super::item::{ItemKey, MenuItem};
use super::predicate::{self, PredicateKind, Resolution};
use super::view::{ClickOutcome, ClickTarget, PopoverView, RenderedItem};

/// Overlay panel listing menu actions.
///
/// ## Rendering
///
/// Every render pass throws away the previous [`RenderedItem`]s and rebuilds them
/// from `items ++ extra_items`, bumping `generation`. There is no diffing.
///
/// ## Predicates
///
/// `open()` starts every `hide_if`/`active_if` predicate and parks the futures here.
/// Nothing resolves until the owner drives them with [`PopoverMenu::pump`],
/// [`PopoverMenu::poll_predicates`] or [`PopoverMenu::settle`]. Each result carries
/// the generation it was started under. A render pass drops every evaluation that
/// has not resolved yet, so only the current generation is ever in flight.
///
/// ## Dispatch
///
/// A click names a rendered position. The position is mapped to the item key it had
/// at render time and the key is looked up in the current item list, so a list that
/// changed without a re-render can never route a click to the wrong item.
pub struct PopoverMenu<A> {
    /// Base items, fixed at construction
    items: Vec<MenuItem<A>>,

    /// Conditional items appended after `items`, replaced wholesale
    extra_items: Vec<MenuItem<A>>,

    opened: bool,

    /// Incremented by every render pass
    generation: u64,

    /// Rows from the last render pass, index-aligned with `items ++ extra_items`
    rendered: Vec<RenderedItem>,

    /// In-flight predicate evaluations
    pending: FuturesUnordered<LocalBoxFuture<'static, Resolution>>,

    diagnostics: Option<DiagnosticsHook>,
}

impl<A: Clone> PopoverMenu<A> {
    /// Build a closed menu and run the first render pass
    pub fn new(items: Vec<MenuItem<A>>) -> Self {
        let mut menu = Self {
            items,
            extra_items: Vec::new(),
            opened: false,
            generation: 0,
            rendered: Vec::new(),
            pending: FuturesUnordered::new(),
            diagnostics: None,
        };
        menu.render_items();
        menu
    }

    /// Report swallowed failures to `hook` in addition to the log
    pub fn set_diagnostics_hook(&mut self, hook: impl FnMut(&MenuDiagnostic) + 'static) {
        self.diagnostics = Some(Box::new(hook));
    }

    /// Rebuild all rows from the current `items ++ extra_items`.
    /// Evaluations still in flight from the previous pass are dropped.
    pub fn render_items(&mut self) {
        let previous = self.generation;
        self.generation += 1;
        let dropped = std::mem::take(&mut self.pending).len();
        if dropped > 0 {
            log::debug!(
                "Dropping {} unresolved predicate(s) from generation {}",
                dropped,
                previous
            );
            self.report(MenuDiagnostic::StalePredicates {
                generation: previous,
                dropped,
            });
        }
        self.rendered = self
            .items
            .iter()
            .chain(self.extra_items.iter())
            .enumerate()
            .map(|(index, item)| RenderedItem::from_item(index, item))
            .collect();
        log::trace!(
            "Rendered {} popover item(s), generation {}",
            self.rendered.len(),
            self.generation
        );
    }

    /// Re-render, start item predicates, and mark the menu opened
    pub fn open(&mut self) {
        self.render_items();

        let generation = self.generation;
        for (index, item) in self.items.iter().chain(self.extra_items.iter()).enumerate() {
            if let Some(hide_if) = item.hide_predicate() {
                self.pending.push(predicate::start(
                    hide_if,
                    generation,
                    index,
                    item.key(),
                    PredicateKind::Hidden,
                ));
            }
            if let Some(active_if) = item.active_predicate() {
                self.pending.push(predicate::start(
                    active_if,
                    generation,
                    index,
                    item.key(),
                    PredicateKind::Active,
                ));
            }
        }

        self.opened = true;
        log::debug!(
            "Popover opened with {} item(s), {} predicate(s) in flight",
            self.rendered.len(),
            self.pending.len()
        );
    }

    /// Mark the menu closed and drop every pending confirmation
    pub fn close(&mut self) {
        self.opened = false;
        for item in &mut self.rendered {
            item.confirming = false;
        }
        log::debug!("Popover closed");
    }

    pub fn is_opened(&self) -> bool {
        self.opened
    }

    /// Handle a click delegated from the popover root
    pub fn click(&mut self, target: ClickTarget) -> ClickOutcome<A> {
        let index = match target {
            ClickTarget::Root => return ClickOutcome::Ignored,
            ClickTarget::Item(index) => index,
        };

        match self.rendered.get(index) {
            Some(rendered) => {
                let key = rendered.key;
                self.dispatch(index, key)
            }
            None => {
                log::debug!("Ignoring click on unknown popover position {}", index);
                self.report(MenuDiagnostic::UnknownPosition { index });
                ClickOutcome::Ignored
            }
        }
    }

    /// Handle a click on the item identified by `key`. When the same item is
    /// rendered more than once, the first row carrying `key` receives the click.
    pub fn click_key(&mut self, key: ItemKey) -> ClickOutcome<A> {
        let Some(index) = self.rendered.iter().position(|r| r.key == key) else {
            log::debug!("Ignoring click on item {} that was never rendered", key);
            self.report(MenuDiagnostic::UnknownKey { key });
            return ClickOutcome::Ignored;
        };
        self.dispatch(index, key)
    }

    /// Gate the row at `index` on confirmation, then hand out the item's action
    fn dispatch(&mut self, index: usize, key: ItemKey) -> ClickOutcome<A> {
        let Some(item) = self.find_item(key) else {
            log::debug!("Ignoring click on item {} that is no longer listed", key);
            self.report(MenuDiagnostic::UnknownKey { key });
            return ClickOutcome::Ignored;
        };
        let confirmation_required = item.confirmation_required();
        let action = item.action().clone();

        let Some(rendered) = self.rendered.get_mut(index) else {
            return ClickOutcome::Ignored;
        };

        if confirmation_required && !rendered.confirming {
            rendered.confirming = true;
            log::debug!("Item '{}' awaiting confirmation", rendered.label);
            return ClickOutcome::ConfirmationPending;
        }

        log::debug!("Invoking item '{}'", rendered.label);
        ClickOutcome::Invoked(action)
    }

    /// Replace the extra items. Takes effect on the next render pass.
    pub fn set_extra_items(&mut self, extra_items: Vec<MenuItem<A>>) {
        self.extra_items = extra_items;
    }

    pub fn items(&self) -> &[MenuItem<A>] {
        &self.items
    }

    pub fn extra_items(&self) -> &[MenuItem<A>] {
        &self.extra_items
    }

    /// Rows from the last render pass
    pub fn rendered(&self) -> &[RenderedItem] {
        &self.rendered
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn view(&self) -> PopoverView<'_> {
        PopoverView {
            opened: self.opened,
            generation: self.generation,
            items: &self.rendered,
        }
    }

    pub fn has_pending_predicates(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Apply every predicate result that is ready. Returns how many changed a row.
    pub fn poll_predicates(&mut self, cx: &mut Context<'_>) -> usize {
        let mut applied = 0;
        while let Poll::Ready(Some(resolution)) = self.pending.poll_next_unpin(cx) {
            if self.apply(resolution) {
                applied += 1;
            }
        }
        applied
    }

    /// [`PopoverMenu::poll_predicates`] without a waker, for once-per-frame polling
    pub fn pump(&mut self) -> usize {
        let mut cx = Context::from_waker(futures::task::noop_waker_ref());
        self.poll_predicates(&mut cx)
    }

    /// Wait for every in-flight predicate and apply the results
    pub async fn settle(&mut self) {
        while let Some(resolution) = self.pending.next().await {
            self.apply(resolution);
        }
    }

    fn find_item(&self, key: ItemKey) -> Option<&MenuItem<A>> {
        self.items
            .iter()
            .chain(self.extra_items.iter())
            .find(|item| item.key() == key)
    }

    fn apply(&mut self, resolution: Resolution) -> bool {
        let Resolution {
            generation,
            index,
            key,
            kind,
            result,
        } = resolution;

        if generation != self.generation {
            log::debug!(
                "Discarding {} result for item {} from generation {} (current {})",
                kind,
                key,
                generation,
                self.generation
            );
            return false;
        }

        let value = match result {
            Ok(value) => value,
            Err(error) => {
                log::warn!("{} predicate for item {} failed: {}", kind, key, error);
                self.report(MenuDiagnostic::PredicateFailed { key, kind, error });
                return false;
            }
        };

        let Some(item) = self.rendered.get_mut(index).filter(|item| item.key == key) else {
            return false;
        };
        match kind {
            PredicateKind::Hidden => item.hidden = value,
            PredicateKind::Active => item.active = value,
        }
        true
    }

    fn report(&mut self, diagnostic: MenuDiagnostic) {
        if let Some(hook) = self.diagnostics.as_mut() {
            hook(&diagnostic);
        }
    }
}
