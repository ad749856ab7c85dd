//! Asynchronous item predicates (`hide_if` / `active_if`)

use std::fmt;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use thiserror::Error;

use super::item::ItemKey;

/// A no-argument predicate whose answer may not be available until a later poll
pub type Predicate = Rc<dyn Fn() -> LocalBoxFuture<'static, Result<bool, PredicateError>>>;

/// Why a predicate could not produce an answer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredicateError {
    #[error("predicate failed: {0}")]
    Failed(String),

    /// The state the predicate reads from could not be accessed
    #[error("predicate source unavailable: {0}")]
    Unavailable(String),

    #[error("predicate result channel was dropped")]
    Cancelled,
}

impl From<oneshot::Canceled> for PredicateError {
    fn from(_: oneshot::Canceled) -> Self {
        PredicateError::Cancelled
    }
}

/// Which visual flag a predicate drives
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PredicateKind {
    Hidden,
    Active,
}

impl fmt::Display for PredicateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateKind::Hidden => f.write_str("hide_if"),
            PredicateKind::Active => f.write_str("active_if"),
        }
    }
}

/// A finished predicate, tagged with the render pass it was started under
#[derive(Debug)]
pub(super) struct Resolution {
    pub generation: u64,
    pub index: usize,
    pub key: ItemKey,
    pub kind: PredicateKind,
    pub result: Result<bool, PredicateError>,
}

/// Start `predicate` and wrap its future so the answer comes back tagged
pub(super) fn start(
    predicate: &Predicate,
    generation: u64,
    index: usize,
    key: ItemKey,
    kind: PredicateKind,
) -> LocalBoxFuture<'static, Resolution> {
    let pending = predicate();
    Box::pin(async move {
        let result = pending.await;
        Resolution {
            generation,
            index,
            key,
            kind,
            result,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[test]
    fn test_canceled_channel_maps_to_cancelled() {
        let (tx, rx) = oneshot::channel::<bool>();
        drop(tx);
        let err: PredicateError = pollster::block_on(rx).unwrap_err().into();
        assert_eq!(err, PredicateError::Cancelled);
    }

    #[test]
    fn test_start_tags_resolution() {
        let predicate: Predicate = Rc::new(|| async { Ok(true) }.boxed_local());
        let key = crate::menu::MenuItem::new("x", ()).key();

        let resolution = pollster::block_on(start(&predicate, 3, 1, key, PredicateKind::Active));

        assert_eq!(resolution.generation, 3);
        assert_eq!(resolution.index, 1);
        assert_eq!(resolution.key, key);
        assert_eq!(resolution.kind, PredicateKind::Active);
        assert_eq!(resolution.result, Ok(true));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PredicateError::Unavailable("table busy".into()).to_string(),
            "predicate source unavailable: table busy"
        );
        assert_eq!(PredicateKind::Hidden.to_string(), "hide_if");
    }
}
