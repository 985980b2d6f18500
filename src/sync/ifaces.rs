use std::fmt;
use std::sync::Arc;

use super::locked::LockedStack;
use super::treiber::{LockFreeStack, RetryPolicy};

///
/// Value returned by [ConcurrentStack::pop] and [ConcurrentStack::peek] when the stack is empty.
///
/// Pushed values share the `i64` domain with this marker, so a pushed `-1` is
/// indistinguishable from emptiness when it is read back.
pub const EMPTY: i64 = -1;

///
/// Uniform capability of the concurrent integer stacks.
///
/// Every call has an individually atomic effect on the shared stack, no matter
/// how many threads race on it. Operating on an empty stack is not an error,
/// it yields [EMPTY].
pub trait ConcurrentStack: Send + Sync {
    /// Push a value on top of the stack. Always succeeds.
    fn push(&self, value: i64);

    /// Remove and return the top value, or [EMPTY].
    fn pop(&self) -> i64;

    /// Return the top value without removing it, or [EMPTY].
    fn peek(&self) -> i64;

    ///
    /// Optional view over [ConcurrentStack::pop].
    ///
    /// Built on top of the sentinel, so it reports `None` for a popped `-1` as well.
    fn try_pop(&self) -> Option<i64> {
        Some(self.pop()).filter(|v| *v != EMPTY)
    }

    ///
    /// Optional view over [ConcurrentStack::peek]. Same caveat as [ConcurrentStack::try_pop].
    fn try_peek(&self) -> Option<i64> {
        Some(self.peek()).filter(|v| *v != EMPTY)
    }
}

///
/// Selects one of the stack implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackKind {
    /// [LockFreeStack], optimistic CAS retries
    LockFree,
    /// [LockedStack], pessimistic reader/writer lock
    Locked,
}

impl StackKind {
    /// Both kinds, lock-free first.
    pub const ALL: [StackKind; 2] = [StackKind::LockFree, StackKind::Locked];

    ///
    /// Build an empty stack of this kind behind the uniform interface.
    ///
    /// `retry` only applies to the lock-free stack.
    pub fn build(self, retry: RetryPolicy) -> Arc<dyn ConcurrentStack> {
        match self {
            StackKind::LockFree => Arc::new(LockFreeStack::with_retry(retry)),
            StackKind::Locked => Arc::new(LockedStack::new()),
        }
    }
}

impl fmt::Display for StackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackKind::LockFree => f.write_str("OCC"),
            StackKind::Locked => f.write_str("Locking"),
        }
    }
}
