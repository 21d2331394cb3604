//! Byte-order aware binary packing driven by compact format strings.
//!
//! A format string describes a flat record: a sequence of numeric and string fields, with
//! byte-order switches, alignment and repeat counts mixed in. [`pack`] turns a list of
//! [`Value`]s into bytes following such a description, and [`unpack`] reads them back.
//!
//! ```
//! use dataconv::{pack, unpack, Value};
//!
//! let args = [Value::I16(0x7b), Value::I32(0x12345678), Value::from("hi")];
//! let bytes = pack("_s!iz8", &args).unwrap();
//! assert_eq!(bytes, b"\x7b\x00\x00\x00\x78\x56\x34\x12hi\x00");
//!
//! let values = unpack("_s!iz8", &bytes, 0).unwrap();
//! assert_eq!(values, args);
//! ```
//!
//! # Format strings
//!
//! | Directive | Meaning |
//! |---|---|
//! | `^` `_` `%` | switch subsequent fields to big-endian, little-endian, native order |
//! | `!` | align the next field to its own width (strings: 4 bytes) |
//! | `x` | emit or skip one zero byte |
//! | `i` `I` | `i32`, `u32` |
//! | `s` `S` | `i16`, `u16` |
//! | `l` `L` | `i64`, `u64` |
//! | `f` `d` | `f32`, `f64` |
//! | `b` `C` `c` | `u8`, `u8`, `i8` |
//! | `1`-`9`, `[N]` | repeat the next field N times |
//! | `*` | repeat the next field until the arguments or the buffer run out |
//! | `$`*e*, `z`*e* | string in encoding *e*; `z` adds a zero terminator |
//!
//! String encodings are `8` (UTF-8), `6` (UTF-16LE), `7` (UTF-7), `b` (UTF-16BE),
//! `3` (UTF-32LE) and `4` (UTF-32BE). Fields start in native byte order.

#![warn(missing_docs)]

pub mod ctx;
pub mod derive;
pub mod format;
pub mod primitive;
pub mod text;

mod buffer;
mod error;
mod macros;
mod pack;
mod unpack;
mod value;

pub use self::error::{Error, ErrorKind};
pub use self::pack::{pack, pack_iter};
pub use self::unpack::unpack;
pub use self::value::{FromValue, IntoValue, Value};

#[cfg(feature = "derive")]
pub use dataconv_derive::{Pack, Unpack};

/// A record that packs itself according to a fixed format string.
pub trait Pack {
    /// Packs `&self` into a new byte vector.
    fn pack(&self) -> Result<Vec<u8>, Error>;
}

/// A record that can be rebuilt from bytes according to a fixed format string.
pub trait Unpack: Sized {
    /// Unpacks a record from `buffer`, starting at byte `start`.
    fn unpack(buffer: &[u8], start: usize) -> Result<Self, Error>;
}

#[doc(hidden)]
pub mod export {
    use crate::{Error, ErrorKind, FromValue, Value};

    pub fn next_field<T, I>(values: &mut I, name: &str) -> Result<T, Error>
    where
        T: FromValue,
        I: Iterator<Item = Value>,
    {
        match values.next() {
            Some(value) => T::from_value(value)
                .map_err(|e| Error::with_context(format!("error unpacking field {}", name), e)),
            None => Err(Error::new(
                ErrorKind::Missing,
                format!("no value left for field {}", name),
            )),
        }
    }
}
