//! Dynamically-typed arguments and results.

use crate::{Error, ErrorKind};
use std::convert::TryFrom;
use std::fmt;

/// A single packed argument or unpacked result.
///
/// Packing coerces each value to the type its directive names, the way a numeric conversion
/// would: integers are range checked, floats are rounded half-to-even before becoming integers,
/// and strings are parsed.
///
/// # Example
///
/// ```
/// use dataconv::{ErrorKind, Value};
///
/// assert_eq!(Value::F64(2.5).to_i16().unwrap(), 2);
/// assert_eq!(Value::from(" 42 ").to_u8().unwrap(), 42);
/// assert_eq!(Value::I32(300).to_u8().unwrap_err().kind(), ErrorKind::TypeConversion);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `c`
    I8(i8),
    /// `b` and `C`
    U8(u8),
    /// `s`
    I16(i16),
    /// `S`
    U16(u16),
    /// `i`
    I32(i32),
    /// `I`
    U32(u32),
    /// `l`
    I64(i64),
    /// `L`
    U64(u64),
    /// `f`
    F32(f32),
    /// `d`
    F64(f64),
    /// `$` and `z`
    Str(String),
}

impl Value {
    /// The name of the stored type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::I8(_) => "i8",
            Self::U8(_) => "u8",
            Self::I16(_) => "i16",
            Self::U16(_) => "u16",
            Self::I32(_) => "i32",
            Self::U32(_) => "u32",
            Self::I64(_) => "i64",
            Self::U64(_) => "u64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::Str(_) => "string",
        }
    }

    /// Returns the contained string, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    fn to_integer(&self) -> Result<i128, Error> {
        match self {
            Self::I8(v) => Ok((*v).into()),
            Self::U8(v) => Ok((*v).into()),
            Self::I16(v) => Ok((*v).into()),
            Self::U16(v) => Ok((*v).into()),
            Self::I32(v) => Ok((*v).into()),
            Self::U32(v) => Ok((*v).into()),
            Self::I64(v) => Ok((*v).into()),
            Self::U64(v) => Ok((*v).into()),
            Self::F32(v) => float_to_integer((*v).into()),
            Self::F64(v) => float_to_integer(*v),
            Self::Str(s) => Ok(s.trim().parse::<i128>()?),
        }
    }

    /// Coerces to `f64`.
    pub fn to_f64(&self) -> Result<f64, Error> {
        match self {
            Self::I8(v) => Ok((*v).into()),
            Self::U8(v) => Ok((*v).into()),
            Self::I16(v) => Ok((*v).into()),
            Self::U16(v) => Ok((*v).into()),
            Self::I32(v) => Ok((*v).into()),
            Self::U32(v) => Ok((*v).into()),
            Self::I64(v) => Ok(*v as f64),
            Self::U64(v) => Ok(*v as f64),
            Self::F32(v) => Ok((*v).into()),
            Self::F64(v) => Ok(*v),
            Self::Str(s) => Ok(s.trim().parse::<f64>()?),
        }
    }

    /// Coerces to `f32`.
    pub fn to_f32(&self) -> Result<f32, Error> {
        match self {
            Self::F32(v) => Ok(*v),
            Self::Str(s) => Ok(s.trim().parse::<f32>()?),
            other => other.to_f64().map(|v| v as f32),
        }
    }
}

/// Rounds half-to-even, then truncates into the integer domain.
fn float_to_integer(value: f64) -> Result<i128, Error> {
    let rounded = if (value - value.trunc()).abs() == 0.5 {
        2.0 * (value / 2.0).round()
    } else {
        value.round()
    };
    // comfortably wider than any 64-bit target, and exactly representable
    if rounded.is_finite() && rounded.abs() < 1e38 {
        Ok(rounded as i128)
    } else {
        Err(Error::new(
            ErrorKind::TypeConversion,
            format!("{} is out of range for an integer", value),
        ))
    }
}

macro_rules! integer_coercions {
    ($(($name:ident: $t:ty),)*) => {
        impl Value {
            $(
                #[doc = concat!("Coerces to `", stringify!($t), "`, failing if the value is out of range.")]
                pub fn $name(&self) -> Result<$t, Error> {
                    let wide = self.to_integer()?;
                    <$t>::try_from(wide).map_err(|_| {
                        Error::new(
                            ErrorKind::TypeConversion,
                            format!("{} is out of range for {}", self, stringify!($t)),
                        )
                    })
                }
            )*
        }
    };
}

integer_coercions! {
    (to_i8: i8),
    (to_u8: u8),
    (to_i16: i16),
    (to_u16: u16),
    (to_i32: i32),
    (to_u32: u32),
    (to_i64: i64),
    (to_u64: u64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::I8(v) => write!(f, "{}", v),
            Self::U8(v) => write!(f, "{}", v),
            Self::I16(v) => write!(f, "{}", v),
            Self::U16(v) => write!(f, "{}", v),
            Self::I32(v) => write!(f, "{}", v),
            Self::U32(v) => write!(f, "{}", v),
            Self::I64(v) => write!(f, "{}", v),
            Self::U64(v) => write!(f, "{}", v),
            Self::F32(v) => write!(f, "{}", v),
            Self::F64(v) => write!(f, "{}", v),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// A type that can be turned into a packing argument.
pub trait IntoValue {
    /// Converts `&self` into a [`Value`].
    fn to_value(&self) -> Value;
}

/// A type that can be built from an unpacked value.
pub trait FromValue: Sized {
    /// Converts an unpacked value, coercing numerics the same way packing does.
    fn from_value(value: Value) -> Result<Self, Error>;
}

impl<T> IntoValue for &T
where
    T: IntoValue + ?Sized,
{
    fn to_value(&self) -> Value {
        (*self).to_value()
    }
}

macro_rules! impl_value {
    ($(($t:ty, $variant:ident, $coerce:ident),)*) => {$(
        impl From<$t> for Value {
            fn from(value: $t) -> Self {
                Self::$variant(value)
            }
        }

        impl IntoValue for $t {
            fn to_value(&self) -> Value {
                Value::$variant(*self)
            }
        }

        impl FromValue for $t {
            fn from_value(value: Value) -> Result<Self, Error> {
                value.$coerce()
            }
        }
    )*}
}

impl_value! {
    (i8, I8, to_i8),
    (u8, U8, to_u8),
    (i16, I16, to_i16),
    (u16, U16, to_u16),
    (i32, I32, to_i32),
    (u32, U32, to_u32),
    (i64, I64, to_i64),
    (u64, U64, to_u64),
    (f32, F32, to_f32),
    (f64, F64, to_f64),
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl IntoValue for str {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl IntoValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl IntoValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Str(s) => Ok(s),
            other => Ok(other.to_string()),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, Error> {
        Ok(value)
    }
}
