//! Durable slot backends.
//!
//! A slot is a single named entry holding the serialized collection.
//! Reading an absent slot yields `None`, not an error. Writes replace
//! the whole payload; no reader observes a half-written value.

mod file;
mod memory;

pub use file::FileSlot;
pub use memory::MemorySlot;

use crate::error::Result;

/// A single durable key-value entry.
pub trait DurableSlot: Send + Sync {
    /// Read the stored bytes, or `None` if nothing has been written.
    fn read(&self) -> Result<Option<Vec<u8>>>;

    /// Replace the stored bytes.
    fn write(&self, bytes: &[u8]) -> Result<()>;
}
