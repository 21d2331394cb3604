//! Fixed-width primitive accessors for each byte order strategy.

use crate::ctx::ByteOrder;
use crate::Error;
use std::mem;

mod private {
    pub trait Sealed {}
}

/// A fixed-width numeric type that can be read from and written to a byte buffer.
///
/// Implemented for `i16`, `u16`, `i32`, `u32`, `i64`, `u64`, `f32` and `f64`.
pub trait Primitive: private::Sealed + Copy {
    /// Number of bytes occupied by the type.
    const WIDTH: usize;

    /// Reads a value at `index` of `buffer` using the given byte order.
    fn read(order: ByteOrder, buffer: &[u8], index: usize) -> Result<Self, Error>;

    /// Writes `self` at `index` of `dest` using the given byte order.
    fn write(self, order: ByteOrder, dest: &mut [u8], index: usize) -> Result<(), Error>;

    /// Returns the `WIDTH` bytes of `self` in the given byte order.
    fn encode(self, order: ByteOrder) -> Vec<u8>;
}

fn window(len: usize, index: usize, width: usize) -> Result<std::ops::Range<usize>, Error> {
    match index.checked_add(width) {
        Some(end) if end <= len => Ok(index..end),
        _ => Err(Error::out_of_range(index, width, len)),
    }
}

macro_rules! impl_primitive {
    ($($t:ty)*) => {$(
        impl private::Sealed for $t {}

        impl Primitive for $t {
            const WIDTH: usize = mem::size_of::<$t>();

            fn read(order: ByteOrder, buffer: &[u8], index: usize) -> Result<Self, Error> {
                let range = window(buffer.len(), index, Self::WIDTH)?;
                let mut bytes = [0u8; mem::size_of::<$t>()];
                bytes.copy_from_slice(&buffer[range]);
                if order.is_swapped() {
                    bytes.reverse();
                }
                Ok(Self::from_ne_bytes(bytes))
            }

            fn write(self, order: ByteOrder, dest: &mut [u8], index: usize) -> Result<(), Error> {
                let range = window(dest.len(), index, Self::WIDTH)?;
                dest[range].copy_from_slice(&self.encode(order));
                Ok(())
            }

            fn encode(self, order: ByteOrder) -> Vec<u8> {
                let mut bytes = self.to_ne_bytes();
                if order.is_swapped() {
                    bytes.reverse();
                }
                bytes.to_vec()
            }
        }
    )*}
}

impl_primitive! {
    i16 u16 i32 u32 i64 u64 f32 f64
}

macro_rules! accessors {
    ($(($name:ident: $t:ty),)*) => {
        impl ByteOrder {
            $(
                #[doc = concat!("Reads a `", stringify!($t), "` at `index` of `buffer`.")]
                ///
                /// Fails with [`ErrorKind::OutOfRange`](crate::ErrorKind::OutOfRange) if the
                /// buffer is too short.
                pub fn $name(self, buffer: &[u8], index: usize) -> Result<$t, Error> {
                    <$t as Primitive>::read(self, buffer, index)
                }
            )*
        }
    };
}

accessors! {
    (get_i16: i16),
    (get_u16: u16),
    (get_i32: i32),
    (get_u32: u32),
    (get_i64: i64),
    (get_u64: u64),
    (get_f32: f32),
    (get_f64: f64),
}

impl ByteOrder {
    /// Writes `value` at `index` of `dest`.
    ///
    /// # Example
    ///
    /// ```
    /// use dataconv::ctx::BIG_ENDIAN;
    ///
    /// let mut dest = [0u8; 6];
    /// BIG_ENDIAN.put_bytes(&mut dest, 2, 0xdeadbeef_u32).unwrap();
    /// assert_eq!(dest, [0, 0, 0xde, 0xad, 0xbe, 0xef]);
    ///
    /// assert!(BIG_ENDIAN.put_bytes(&mut dest, 3, 0xdeadbeef_u32).is_err());
    /// ```
    pub fn put_bytes<T>(self, dest: &mut [u8], index: usize, value: T) -> Result<(), Error>
    where
        T: Primitive,
    {
        value.write(self, dest, index)
    }

    /// Allocates a buffer of exactly `T::WIDTH` bytes holding `value`.
    pub fn get_bytes<T>(self, value: T) -> Vec<u8>
    where
        T: Primitive,
    {
        value.encode(self)
    }
}
