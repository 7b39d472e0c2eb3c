//! Fixed-capacity event buffers.
//!
//! Input backends and other event producers run inside callbacks that
//! cannot meaningfully handle a synchronous failure, so the buffers used
//! for event capture absorb overflow locally: pushing into a full buffer
//! silently drops the new item. Retained items keep submission order.

/// A bounded FIFO event queue of capacity `N`.
///
/// Capacity is fixed at compile time; the backing storage is allocated
/// once and never grows. Overflow policy: the overflowing item is dropped,
/// never the buffered ones, and the producer is not failed — [`push`]
/// reports the drop through its return value for callers that care.
///
/// [`push`]: EventBuffer::push
#[derive(Debug, Clone)]
pub struct EventBuffer<T, const N: usize> {
    items: Vec<T>,
}

impl<T, const N: usize> EventBuffer<T, N> {
    /// Creates an empty buffer with its full capacity reserved.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::with_capacity(N),
        }
    }

    /// Appends an event, dropping it silently when the buffer is full.
    ///
    /// Returns `false` if the event was dropped.
    pub fn push(&mut self, item: T) -> bool {
        if self.items.len() >= N {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Iterates the buffered events in submission order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Removes and yields all buffered events in submission order.
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.items.drain(..)
    }

    /// Discards all buffered events.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the number of buffered events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when no events are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` when the next push would be dropped.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.len() >= N
    }

    /// Returns the fixed capacity `N`.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<T, const N: usize> Default for EventBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_drain_keep_order() {
        let mut buf: EventBuffer<u32, 8> = EventBuffer::new();
        assert!(buf.push(1));
        assert!(buf.push(2));
        assert!(buf.push(3));
        assert_eq!(buf.len(), 3);

        let drained: Vec<u32> = buf.drain().collect();
        assert_eq!(drained, vec![1, 2, 3]);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_overflow_drops_newest_silently() {
        let mut buf: EventBuffer<u32, 4> = EventBuffer::new();
        for i in 0..4 {
            assert!(buf.push(i));
        }
        assert!(buf.is_full());

        // The fifth push is dropped; the first four survive in order.
        assert!(!buf.push(99));
        assert_eq!(buf.len(), 4);
        let kept: Vec<u32> = buf.iter().copied().collect();
        assert_eq!(kept, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_clear() {
        let mut buf: EventBuffer<u32, 2> = EventBuffer::new();
        buf.push(7);
        buf.clear();
        assert!(buf.is_empty());
        assert!(buf.push(8));
    }

    #[test]
    fn test_capacity_reports_const() {
        let buf: EventBuffer<u8, 128> = EventBuffer::new();
        assert_eq!(buf.capacity(), 128);
    }
}
