//! Derive macros.
//!
//! **Note:** The macros themselves are not contained in this module; they are at the top level of
//! the crate. This module is used to document them.
//!
//! The `Pack` and `Unpack` macros generate implementations of their respective traits for
//! structs. The struct's fields are fed to [`pack`](crate::pack) in the order they are declared,
//! and the values produced by [`unpack`](crate::unpack) are assigned back to the fields in the
//! same order. Field types convert through [`IntoValue`](crate::IntoValue) and
//! [`FromValue`](crate::FromValue), so any coercion the format asks for applies here too.
//!
//! ```
//! use dataconv::{Pack, Unpack};
//!
//! #[derive(Debug, PartialEq, Pack, Unpack)]
//! #[dataconv(format = "^S!Iz8")]
//! struct Header {
//!     tag: u16,
//!     length: u32,
//!     name: String,
//! }
//!
//! let header = Header { tag: 7, length: 0x0102, name: "data".into() };
//! let bytes = header.pack().unwrap();
//! assert_eq!(bytes, b"\x00\x07\x00\x00\x00\x00\x01\x02data\x00");
//! assert_eq!(Header::unpack(&bytes, 0).unwrap(), header);
//! ```
//!
//! # Attributes
//!
//! ## Container Attributes
//!
//! - **`format`** (Required) - The format string describing the record.
//!
//! - **`crate_path`** - Specify a custom path to the `dataconv` crate. If you use the `dataconv`
//! crate under a different name, this must be set to that path for the `derive` to successfully
//! compile.
//!
//! ## Field Attributes
//!
//! - **`skip`** - The field is not packed, and is set to `Default::default()` when unpacking.
//!
//! ```
//! use dataconv::{Pack, Unpack};
//!
//! #[derive(Debug, PartialEq, Pack, Unpack)]
//! #[dataconv(format = "_2s")]
//! struct Point(i16, i16, #[dataconv(skip)] Option<String>);
//!
//! let bytes = Point(1, -1, Some("cached".into())).pack().unwrap();
//! assert_eq!(bytes, [0x01, 0x00, 0xff, 0xff]);
//! assert_eq!(Point::unpack(&bytes, 0).unwrap(), Point(1, -1, None));
//! ```
//!
//! Unpacking fails with [`ErrorKind::Missing`](crate::ErrorKind::Missing) if the buffer runs out
//! before every field is filled. Extra values are ignored.
