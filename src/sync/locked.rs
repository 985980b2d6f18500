use super::ifaces::{ConcurrentStack, EMPTY};
use parking_lot::RwLock;
use std::fmt;

struct Node {
    value: i64,
    next: Option<Box<Node>>,
}

///
/// Stack of integers guarded by a single reader/writer lock.
///
/// [push](ConcurrentStack::push) and [pop](ConcurrentStack::pop) take the lock exclusively,
/// [peek](ConcurrentStack::peek) takes it shared. The lock is task-fair: once a writer is
/// waiting, incoming readers queue behind it, so a stream of peeks can't starve writers.
pub struct LockedStack {
    head: RwLock<Option<Box<Node>>>,
}

impl LockedStack {
    ///
    /// Create an empty stack.
    pub fn new() -> Self {
        Self {
            head: RwLock::new(None),
        }
    }
}

impl Default for LockedStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ConcurrentStack for LockedStack {
    #[inline]
    fn push(&self, value: i64) {
        let mut head = self.head.write();
        let next = head.take();
        *head = Some(Box::new(Node { value, next }));
    }

    #[inline]
    fn pop(&self) -> i64 {
        let mut head = self.head.write();
        match head.take() {
            Some(node) => {
                let Node { value, next } = *node;
                *head = next;
                value
            }
            None => EMPTY,
        }
    }

    #[inline]
    fn peek(&self) -> i64 {
        self.head.read().as_ref().map_or(EMPTY, |node| node.value)
    }
}

impl Drop for LockedStack {
    fn drop(&mut self) {
        // Unlink iteratively, the default drop would recurse once per node.
        let mut cur = self.head.get_mut().take();
        while let Some(mut node) = cur {
            cur = node.next.take();
        }
    }
}

impl fmt::Debug for LockedStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockedStack")
            .field("top", &self.peek())
            .finish()
    }
}

#[cfg(test)]
mod locked_stack_tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn locked_push_pop() {
        let stack = LockedStack::new();
        stack.push(1);

        assert_eq!(stack.pop(), 1);
        assert_eq!(stack.pop(), EMPTY);
    }

    #[test]
    fn locked_empty_is_stable() {
        let stack = LockedStack::new();

        assert_eq!(stack.peek(), EMPTY);
        assert_eq!(stack.pop(), EMPTY);
        assert_eq!(stack.peek(), EMPTY);

        stack.push(10);
        assert_eq!(stack.peek(), 10);
    }

    #[test]
    fn locked_deep_drop() {
        let stack = LockedStack::new();
        for i in 0..100_000 {
            stack.push(i);
        }
        drop(stack);
    }

    #[test]
    fn locked_readers_share_the_lock() {
        let stack = LockedStack::new();
        stack.push(3);

        let r1 = stack.head.read();
        let r2 = stack.head.try_read();

        assert!(r2.is_some());
        assert!(stack.head.try_write().is_none());

        drop(r1);
        drop(r2);

        assert!(stack.head.try_write().is_some());
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn locked_threaded_contention() {
        let stack = Arc::new(LockedStack::new());
        let thread_num = 8;
        let barrier = Arc::new(Barrier::new(thread_num));
        let mut guards = Vec::new();

        for t in 0..thread_num {
            let b = Arc::clone(&barrier);
            let stack = stack.clone();
            guards.push(thread::spawn(move || {
                b.wait();
                for j in 0..1000 {
                    stack.push((t * 1000 + j) as i64);
                }
            }));
        }

        for g in guards {
            g.join().unwrap();
        }

        let mut popped = 0;
        while stack.pop() != EMPTY {
            popped += 1;
        }
        assert_eq!(popped, thread_num * 1000);
    }
}
