//! The append-only byte accumulator used while packing.

use crate::ctx::Align;
use tracing::trace;

const MIN_GROWTH: usize = 16;

/// A growable byte buffer with alignment-aware appends.
///
/// The backing store may be over-allocated; only the first `next` bytes are ever observable.
#[derive(Debug, Default)]
pub(crate) struct PackBuffer {
    bytes: Vec<u8>,
    next: usize,
    started: bool,
    align: Option<Align>,
}

impl PackBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Requests that the next append be aligned.
    pub(crate) fn align_next(&mut self, align: Align) {
        self.align = Some(align);
    }

    pub(crate) fn has_pending_align(&self) -> bool {
        self.align.is_some()
    }

    /// Appends `group`, applying and clearing any pending alignment first.
    pub(crate) fn append(&mut self, group: Vec<u8>) {
        let pending = self.align.take();

        if !self.started {
            // offset 0 satisfies every alignment
            self.started = true;
            self.next = group.len();
            self.bytes = group;
            return;
        }

        if let Some(align) = pending {
            self.next = align.apply(self.next, group.len());
        }

        let end = self.next + group.len();
        if end > self.bytes.len() {
            let capacity = self.next.max(MIN_GROWTH) * 2 + group.len();
            trace!(from = self.bytes.len(), to = capacity, "growing pack buffer");
            self.bytes.resize(capacity, 0);
        }
        self.bytes[self.next..end].copy_from_slice(&group);
        self.next = end;
    }

    /// Logical length of the packed data.
    pub(crate) fn len(&self) -> usize {
        self.next
    }

    /// Returns the packed bytes, trimmed to the logical length.
    pub(crate) fn finish(mut self) -> Vec<u8> {
        self.bytes.truncate(self.next);
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_append_is_adopted() {
        let mut buffer = PackBuffer::new();
        buffer.align_next(Align::ToBoundary(4));
        buffer.append(vec![1, 2, 3]);
        assert!(!buffer.has_pending_align());
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.finish(), vec![1, 2, 3]);
    }

    #[test]
    fn field_size_alignment_pads_with_zeros() {
        let mut buffer = PackBuffer::new();
        buffer.append(vec![0x7b, 0x00]);
        buffer.align_next(Align::ToFieldSize);
        buffer.append(vec![0x78, 0x56, 0x34, 0x12]);
        assert_eq!(
            buffer.finish(),
            vec![0x7b, 0x00, 0x00, 0x00, 0x78, 0x56, 0x34, 0x12]
        );
    }

    #[test]
    fn alignment_applies_to_one_append_only() {
        let mut buffer = PackBuffer::new();
        buffer.append(vec![1]);
        buffer.align_next(Align::ToBoundary(4));
        buffer.append(vec![2]);
        buffer.append(vec![3]);
        assert_eq!(buffer.finish(), vec![1, 0, 0, 0, 2, 3]);
    }

    #[test]
    fn growth_never_leaks_capacity() {
        let mut buffer = PackBuffer::new();
        for i in 0..100u8 {
            buffer.append(vec![i]);
        }
        let bytes = buffer.finish();
        assert_eq!(bytes.len(), 100);
        assert!(bytes.iter().copied().eq(0..100u8));
    }

    #[test]
    fn empty_buffer_finishes_empty() {
        assert!(PackBuffer::new().finish().is_empty());
    }
}
