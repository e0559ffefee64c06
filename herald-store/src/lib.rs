//! Status store for the herald delivery service
//!
//! The delivery engine reads and writes [`herald_common::StatusRecord`]s
//! through the narrow [`StatusStore`] interface. The store's atomic
//! insert is the single enforcement point for per-key uniqueness; all
//! coordination between concurrent deliveries of the same message
//! funnels through it.

pub mod error;
pub mod memory;
pub mod r#trait;

pub use error::{Result, StoreError};
pub use memory::MemoryStatusStore;
pub use r#trait::StatusStore;
