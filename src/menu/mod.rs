//! Popover menu and toggler widgets
//!
//! The widgets keep explicit state and expose it as a render tree
//! ([`PopoverView`], [`TogglerElement`]); drawing lives in `ui`.

mod diagnostics;
mod item;
mod popover;
mod predicate;
mod toggler;
mod view;

pub use diagnostics::{DiagnosticsHook, MenuDiagnostic};
pub use item::{ItemKey, MenuItem};
pub use popover::PopoverMenu;
pub use predicate::{Predicate, PredicateError, PredicateKind};
pub use toggler::{MenuToggler, StyleMap, TogglerElement};
pub use view::{ClickOutcome, ClickTarget, PopoverView, RenderedItem};
