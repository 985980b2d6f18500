use super::ifaces::{ConcurrentStack, EMPTY};
use crossbeam_epoch::{self as epoch, Atomic, Owned};
use crossbeam_utils::Backoff;
use std::fmt;
use std::sync::atomic::Ordering;

///
/// What a CAS loop does after losing a race on the head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetryPolicy {
    /// Retry immediately with a fresh load.
    Spin,
    /// Spin with exponential backoff between attempts, yielding once contention persists.
    Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::Spin
    }
}

impl fmt::Display for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryPolicy::Spin => f.write_str("spin"),
            RetryPolicy::Backoff => f.write_str("backoff"),
        }
    }
}

struct Node {
    value: i64,
    // Only written while the pushing thread still owns the node exclusively.
    next: Atomic<Node>,
}

///
/// Lock-free Treiber stack of integers.
///
/// The head is swung with compare-and-swap and a lost race is retried from a fresh
/// load. Popped nodes are handed to the epoch collector instead of being freed in
/// place: a node stays allocated until every thread that was pinned when it got
/// unlinked has unpinned. No address can be recycled while a stale snapshot of it
/// is still in flight, which keeps the head CAS free of ABA.
pub struct LockFreeStack {
    head: Atomic<Node>,
    retry: RetryPolicy,
}

impl LockFreeStack {
    ///
    /// Create an empty stack that retries lost races immediately.
    pub fn new() -> Self {
        Self::with_retry(RetryPolicy::default())
    }

    ///
    /// Create an empty stack with the given lost-race behavior.
    pub fn with_retry(retry: RetryPolicy) -> Self {
        Self {
            head: Atomic::null(),
            retry,
        }
    }

    /// Lost-race behavior this stack was built with.
    #[inline]
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    #[inline]
    fn contended(&self, backoff: &Backoff) {
        if let RetryPolicy::Backoff = self.retry {
            backoff.snooze();
        }
    }
}

impl Default for LockFreeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ConcurrentStack for LockFreeStack {
    fn push(&self, value: i64) {
        let guard = &epoch::pin();
        let backoff = Backoff::new();
        let mut node = Owned::new(Node {
            value,
            next: Atomic::null(),
        });

        loop {
            // synchronization point
            let head = self.head.load(Ordering::Acquire, guard);
            node.next.store(head, Ordering::Relaxed);

            match self
                .head
                .compare_exchange(head, node, Ordering::Release, Ordering::Relaxed, guard)
            {
                Ok(_) => return,
                Err(lost) => {
                    // Still unlinked, so it is safe to reuse on the next attempt.
                    node = lost.new;
                    self.contended(&backoff);
                }
            }
        }
    }

    fn pop(&self) -> i64 {
        let guard = &epoch::pin();
        let backoff = Backoff::new();

        loop {
            // synchronization point
            let head = self.head.load(Ordering::Acquire, guard);

            // SAFETY: the guard keeps any node reachable from `head` alive.
            let node = match unsafe { head.as_ref() } {
                Some(node) => node,
                None => return EMPTY,
            };

            let value = node.value;
            let next = node.next.load(Ordering::Relaxed, guard);

            if self
                .head
                .compare_exchange(head, next, Ordering::AcqRel, Ordering::Relaxed, guard)
                .is_ok()
            {
                // SAFETY: the node is unlinked and only threads pinned right now can still see it.
                unsafe { guard.defer_destroy(head) };
                return value;
            }

            self.contended(&backoff);
        }
    }

    fn peek(&self) -> i64 {
        let guard = &epoch::pin();
        let head = self.head.load(Ordering::Acquire, guard);

        // SAFETY: protected by the guard.
        unsafe { head.as_ref() }.map_or(EMPTY, |node| node.value)
    }
}

impl Drop for LockFreeStack {
    fn drop(&mut self) {
        // SAFETY: `&mut self` rules out concurrent access, nodes can be freed directly.
        unsafe {
            let guard = epoch::unprotected();
            let mut cur = self.head.load(Ordering::Relaxed, guard);
            while !cur.is_null() {
                let next = cur.deref().next.load(Ordering::Relaxed, guard);
                drop(cur.into_owned());
                cur = next;
            }
        }
    }
}

impl fmt::Debug for LockFreeStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockFreeStack")
            .field("top", &self.peek())
            .field("retry", &self.retry)
            .finish()
    }
}

#[cfg(test)]
mod treiber_tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn treiber_push_pop() {
        let stack = LockFreeStack::new();
        stack.push(1);
        stack.push(2);

        assert_eq!(stack.peek(), 2);
        assert_eq!(stack.pop(), 2);
        assert_eq!(stack.pop(), 1);
        assert_eq!(stack.pop(), EMPTY);
        assert_eq!(stack.peek(), EMPTY);
    }

    #[test]
    fn treiber_default_policy_is_spin() {
        assert_eq!(LockFreeStack::new().retry_policy(), RetryPolicy::Spin);
        assert_eq!(
            LockFreeStack::with_retry(RetryPolicy::Backoff).retry_policy(),
            RetryPolicy::Backoff
        );
    }

    #[test]
    fn treiber_deep_drop() {
        let stack = LockFreeStack::new();
        for i in 0..100_000 {
            stack.push(i);
        }
        drop(stack);
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn treiber_threaded_contention() {
        for policy in [RetryPolicy::Spin, RetryPolicy::Backoff].iter() {
            let stack = Arc::new(LockFreeStack::with_retry(*policy));
            let thread_num = 8;
            let per_thread = 2_000;
            let barrier = Arc::new(Barrier::new(thread_num));
            let mut guards = Vec::new();

            for t in 0..thread_num {
                let b = Arc::clone(&barrier);
                let stack = stack.clone();
                guards.push(thread::spawn(move || {
                    b.wait();
                    let mut popped = Vec::new();
                    for j in 0..per_thread {
                        stack.push((t * per_thread + j) as i64);
                        if j % 2 == 1 {
                            popped.push(stack.pop());
                        }
                    }
                    popped
                }));
            }

            let mut seen = HashSet::new();
            for g in guards {
                for v in g.join().unwrap() {
                    assert_ne!(v, EMPTY);
                    assert!(seen.insert(v), "value {} popped twice", v);
                }
            }

            loop {
                let v = stack.pop();
                if v == EMPTY {
                    break;
                }
                assert!(seen.insert(v), "value {} popped twice", v);
            }

            assert_eq!(seen.len(), thread_num * per_thread);
        }
    }
}
