//! Types that give context to packers and unpackers.

/// The byte order strategy used to store multi-byte primitives.
///
/// There are only two strategies: storing bytes in host order unchanged (`Copy`), and reversing
/// them (`Swap`). The named selectors [`NATIVE`], [`LITTLE_ENDIAN`] and [`BIG_ENDIAN`] resolve
/// to one of these two depending on the byte order of the target architecture.
///
/// # Example
///
/// ```
/// use dataconv::ctx::{BIG_ENDIAN, LITTLE_ENDIAN};
///
/// assert_eq!(BIG_ENDIAN.get_bytes(0x1234_u16), [0x12, 0x34]);
/// assert_eq!(LITTLE_ENDIAN.get_bytes(0x1234_u16), [0x34, 0x12]);
/// assert_ne!(BIG_ENDIAN, LITTLE_ENDIAN);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Bytes are stored in host order.
    Copy,
    /// Bytes are stored in the reverse of host order.
    Swap,
}

impl ByteOrder {
    /// The native byte order of the target architecture.
    ///
    /// **Warning** - Native-order data should not be shared between machines, since their byte
    /// orders may differ.
    pub const fn native() -> Self {
        Self::Copy
    }

    /// Little-endian (least-significant-byte first).
    pub const fn little_endian() -> Self {
        #[cfg(target_endian = "big")]
        let order = Self::Swap;

        #[cfg(target_endian = "little")]
        let order = Self::Copy;

        order
    }

    /// Big-endian (most-significant-byte first), also known as network order.
    pub const fn big_endian() -> Self {
        #[cfg(target_endian = "big")]
        let order = Self::Copy;

        #[cfg(target_endian = "little")]
        let order = Self::Swap;

        order
    }

    /// Returns `true` if this strategy reverses bytes relative to host order.
    pub const fn is_swapped(self) -> bool {
        matches!(self, Self::Swap)
    }
}

impl Default for ByteOrder {
    /// Native order, which every format string starts in.
    fn default() -> Self {
        Self::native()
    }
}

/// Host byte order.
pub const NATIVE: ByteOrder = ByteOrder::native();

/// Little-endian byte order.
pub const LITTLE_ENDIAN: ByteOrder = ByteOrder::little_endian();

/// Big-endian byte order.
pub const BIG_ENDIAN: ByteOrder = ByteOrder::big_endian();

/// Where a pending alignment request moves the next field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Align {
    /// Align to a multiple of the next field's own width.
    ToFieldSize,
    /// Align to a multiple of a fixed number of bytes.
    ToBoundary(usize),
}

impl Align {
    /// Rounds `offset` up to satisfy this alignment for a field `width` bytes wide.
    ///
    /// Zero-sized targets leave the offset unchanged.
    pub fn apply(self, offset: usize, width: usize) -> usize {
        let boundary = match self {
            Self::ToFieldSize => width,
            Self::ToBoundary(n) => n,
        };
        if boundary == 0 {
            return offset;
        }
        match offset % boundary {
            0 => offset,
            rem => offset + (boundary - rem),
        }
    }
}
