//! Per-invocation dispatch cursor.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Tracks the furthest stage dispatched during one invocation.
///
/// Stores `index + 1` of the last dispatched stage so that zero means
/// nothing has run yet.
#[derive(Debug, Default)]
pub(crate) struct Cursor {
    consumed: AtomicUsize,
}

impl Cursor {
    /// Claims `index`. Returns false if it, or a later stage, already ran.
    pub(crate) fn advance(&self, index: usize) -> bool {
        let target = index + 1;
        self.consumed
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |seen| {
                (target > seen).then_some(target)
            })
            .is_ok()
    }

    /// Returns the last dispatched stage, if any.
    pub(crate) fn position(&self) -> Option<usize> {
        self.consumed.load(Ordering::SeqCst).checked_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_cursor() {
        let cursor = Cursor::default();
        assert_eq!(cursor.position(), None);
    }

    #[test]
    fn test_advance_forward() {
        let cursor = Cursor::default();
        assert!(cursor.advance(0));
        assert!(cursor.advance(1));
        assert!(cursor.advance(2));
        assert_eq!(cursor.position(), Some(2));
    }

    #[test]
    fn test_advance_same_index_twice() {
        let cursor = Cursor::default();
        assert!(cursor.advance(0));
        assert!(cursor.advance(1));
        assert!(!cursor.advance(1));
        assert_eq!(cursor.position(), Some(1));
    }

    #[test]
    fn test_advance_backwards() {
        let cursor = Cursor::default();
        assert!(cursor.advance(3));
        assert!(!cursor.advance(2));
    }
}
