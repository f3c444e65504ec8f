//! In-memory slot, for embedding and tests.

use super::DurableSlot;
use crate::error::{CatalogError, Result};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Slot held in process memory.
#[derive(Default)]
pub struct MemorySlot {
    bytes: RwLock<Option<Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-populated with a payload.
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: RwLock::new(Some(bytes.into())),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make subsequent writes fail (simulates a full or read-only medium).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current payload, if any.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.bytes.read().clone()
    }
}

impl DurableSlot for MemorySlot {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.bytes.read().clone())
    }

    fn write(&self, bytes: &[u8]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CatalogError::PersistFailure("slot is read-only".into()));
        }
        *self.bytes.write() = Some(bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_slot_roundtrip() {
        let slot = MemorySlot::new();
        assert!(slot.read().unwrap().is_none());
        slot.write(b"[]").unwrap();
        assert_eq!(slot.contents().unwrap(), b"[]");
    }

    #[test]
    fn test_failing_writes_keep_previous_payload() {
        let slot = MemorySlot::with_bytes("[1]");
        slot.set_fail_writes(true);
        assert!(slot.write(b"[2]").is_err());
        assert_eq!(slot.read().unwrap().unwrap(), b"[1]");
    }
}
