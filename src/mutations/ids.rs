//! Fresh-id assignment.

use crate::types::{ItemId, Timestamp, MAX_ITEM_ID};
use parking_lot::Mutex;
use std::ops::Range;

/// Lowest and highest ids known to be in use.
#[derive(Debug, Clone, Copy)]
struct Span {
    low: i64,
    high: i64,
}

impl Span {
    fn widen(span: Option<Span>, low: i64, high: i64) -> Span {
        match span {
            Some(s) => Span {
                low: s.low.min(low),
                high: s.high.max(high),
            },
            None => Span { low, high },
        }
    }
}

/// Issues item ids from the wall clock, strictly increasing within a process.
///
/// Each batch starts at `max(now_millis, highest_used + 1)` and takes
/// consecutive values, so ids never collide even when many are issued in
/// the same millisecond. Ids stay within `±MAX_ITEM_ID`; once the top of
/// that range is reached, batches are taken just below the lowest id in use.
#[derive(Debug, Default)]
pub struct IdAllocator {
    span: Mutex<Option<Span>>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator that will never issue any of `used`.
    pub fn seeded(used: impl IntoIterator<Item = ItemId>) -> Self {
        let alloc = Self::new();
        for id in used {
            alloc.observe(id);
        }
        alloc
    }

    /// Record `id` as in use.
    pub fn observe(&self, id: ItemId) {
        let mut span = self.span.lock();
        *span = Some(Span::widen(*span, id.0, id.0));
    }

    pub fn next_id(&self) -> ItemId {
        ItemId(self.next_range(1).start)
    }

    /// Reserve `count` consecutive ids.
    pub fn next_batch(&self, count: usize) -> Vec<ItemId> {
        self.next_range(count).map(ItemId).collect()
    }

    fn next_range(&self, count: usize) -> Range<i64> {
        let count = i64::try_from(count).unwrap_or(i64::MAX);
        let now = i64::try_from(Timestamp::now().0)
            .unwrap_or(MAX_ITEM_ID)
            .min(MAX_ITEM_ID);

        let mut span = self.span.lock();
        let base = match *span {
            Some(s) => now.max(s.high.saturating_add(1)),
            None => now,
        };

        let range = match base.checked_add(count) {
            Some(end) if end - 1 <= MAX_ITEM_ID => base..end,
            _ => {
                let top = span.map_or(base, |s| s.low);
                top.saturating_sub(count).max(-MAX_ITEM_ID)..top
            }
        };

        if !range.is_empty() {
            *span = Some(Span::widen(*span, range.start, range.end - 1));
        }
        range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_strictly_increase() {
        let alloc = IdAllocator::new();
        let a = alloc.next_id();
        let b = alloc.next_id();
        let batch = alloc.next_batch(5);

        assert!(b > a);
        assert!(batch[0] > b);
        assert!(batch.windows(2).all(|w| w[1].0 == w[0].0 + 1));
    }

    #[test]
    fn test_seeded_floor_from_the_future() {
        let far = ItemId(Timestamp::now().0 as i64 + 1_000_000);
        let alloc = IdAllocator::seeded([far]);
        assert_eq!(alloc.next_id(), ItemId(far.0 + 1));
    }

    #[test]
    fn test_empty_batch_reserves_nothing() {
        let floor = ItemId(MAX_ITEM_ID / 2);
        let alloc = IdAllocator::seeded([floor]);
        assert!(alloc.next_batch(0).is_empty());
        assert_eq!(alloc.next_id(), ItemId(floor.0 + 1));
    }

    #[test]
    fn test_exhausted_top_counts_down_below_lowest() {
        let alloc = IdAllocator::seeded([ItemId(-3), ItemId(MAX_ITEM_ID)]);

        assert_eq!(alloc.next_id(), ItemId(-4));
        assert_eq!(alloc.next_batch(3), vec![ItemId(-7), ItemId(-6), ItemId(-5)]);
    }

    #[test]
    fn test_batch_crossing_the_top_goes_below() {
        let alloc = IdAllocator::seeded([ItemId(10), ItemId(MAX_ITEM_ID - 1)]);

        assert_eq!(alloc.next_id(), ItemId(MAX_ITEM_ID));
        let batch = alloc.next_batch(2);
        assert_eq!(batch, vec![ItemId(8), ItemId(9)]);
    }
}
