//! Non-fatal events reported by the popover (never shown to the end user)

use super::item::ItemKey;
use super::predicate::{PredicateError, PredicateKind};

/// Something the menu swallowed instead of failing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuDiagnostic {
    /// A click named a position the last render pass never produced
    UnknownPosition { index: usize },
    /// The clicked item is no longer part of `items ++ extra_items`
    UnknownKey { key: ItemKey },
    /// A predicate errored; the item keeps its current visual state
    PredicateFailed {
        key: ItemKey,
        kind: PredicateKind,
        error: PredicateError,
    },
    /// A render pass replaced the rows before these evaluations finished.
    /// They were dropped and their results will never be applied.
    StalePredicates { generation: u64, dropped: usize },
}

/// Callback invoked for each [`MenuDiagnostic`]
pub type DiagnosticsHook = Box<dyn FnMut(&MenuDiagnostic)>;
