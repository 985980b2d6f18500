/// Uniform interface over the concurrent stacks
pub mod ifaces;

/// Reader/writer lock guarded stack
pub mod locked;
/// Basic treiber stack
pub mod treiber;

///
/// Prelude for the synchronization primitives
pub mod prelude {
    pub use super::ifaces::*;
    pub use super::locked::*;
    pub use super::treiber::*;
}
