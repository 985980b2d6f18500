//! Concurrent integer stacks and a harness to race them.
//!
//! Two stacks share one [ConcurrentStack](sync::ifaces::ConcurrentStack) contract:
//!
//! * [LockedStack](sync::locked::LockedStack) serializes writers behind a reader/writer lock.
//! * [LockFreeStack](sync::treiber::LockFreeStack) swings its head with compare-and-swap and
//!   defers freeing popped nodes to epoch-based reclamation.
//!
//! The [bench] module drives either of them from many threads with a configurable
//! read/write mix and reports aggregate throughput.
//!
//! ```
//! use stackbench::prelude::*;
//!
//! let stack = StackKind::LockFree.build(RetryPolicy::Spin);
//! stack.push(1);
//! stack.push(2);
//! assert_eq!(stack.pop(), 2);
//! assert_eq!(stack.peek(), 1);
//! ```

/// Benchmark driver over the stacks
pub mod bench;
/// Synchronization primitives: the concurrent stacks
pub mod sync;

///
/// Prelude of the whole crate
pub mod prelude {
    pub use crate::bench::prelude::*;
    pub use crate::sync::prelude::*;
}
