//! The format string grammar.
//!
//! Format strings are scanned lazily, one directive at a time, so a malformed directive is only
//! reported once packing or unpacking actually reaches it.

use crate::ctx::{ByteOrder, BIG_ENDIAN, LITTLE_ENDIAN, NATIVE};
use crate::text::Encoding;
use crate::{Error, ErrorKind};
use std::str::CharIndices;

/// A fixed-width scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `s`
    I16,
    /// `S`
    U16,
    /// `i`
    I32,
    /// `I`
    U32,
    /// `l`
    I64,
    /// `L`
    U64,
    /// `f`
    F32,
    /// `d`
    F64,
    /// `b` or `C`
    U8,
    /// `c`
    I8,
}

impl Kind {
    /// Looks up the kind named by a directive character.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            's' => Some(Self::I16),
            'S' => Some(Self::U16),
            'i' => Some(Self::I32),
            'I' => Some(Self::U32),
            'l' => Some(Self::I64),
            'L' => Some(Self::U64),
            'f' => Some(Self::F32),
            'd' => Some(Self::F64),
            'b' | 'C' => Some(Self::U8),
            'c' => Some(Self::I8),
            _ => None,
        }
    }

    /// Encoded width in bytes.
    pub fn width(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
        }
    }
}

/// How many times the next field is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repeat {
    /// A fixed count, from `1`-`9` or `[N]`.
    Count(usize),
    /// `*`: until the arguments or the buffer run out.
    UntilExhausted,
}

/// One parsed unit of a format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    /// `^`, `_` or `%`.
    SetByteOrder(ByteOrder),
    /// `!`: align the next field.
    AlignNext,
    /// `x`: one zero byte.
    NullByte,
    /// `1`-`9`, `[N]` or `*`.
    Repeat(Repeat),
    /// A scalar field.
    Numeric(Kind),
    /// `$` or `z` followed by an encoding selector.
    Text {
        /// Character encoding of the field.
        encoding: Encoding,
        /// Whether a zero terminator follows the text (`z`).
        terminated: bool,
    },
}

/// Iterator over the directives of a format string, paired with their byte positions.
///
/// ```
/// use dataconv::format::{Directive, Kind, Repeat, Scanner};
///
/// let directives: Vec<_> = Scanner::new("[12]S").map(Result::unwrap).collect();
/// assert_eq!(
///     directives,
///     [
///         (0, Directive::Repeat(Repeat::Count(12))),
///         (4, Directive::Numeric(Kind::U16)),
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    chars: CharIndices<'a>,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner positioned at the start of `format`.
    pub fn new(format: &'a str) -> Self {
        Self {
            chars: format.char_indices(),
        }
    }

    fn count(&mut self, open: usize) -> Result<Directive, Error> {
        let mut count: Option<usize> = None;
        for (position, c) in &mut self.chars {
            let digit = match c {
                ']' => {
                    return count.map(|n| Directive::Repeat(Repeat::Count(n))).ok_or_else(|| {
                        Error::new(
                            ErrorKind::InvalidFormat,
                            format!("empty repeat count at position {}", open),
                        )
                    })
                }
                '0'..='9' => c as usize - '0' as usize,
                other => return Err(Error::invalid_format(other, position)),
            };
            count = count
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|n| n.checked_add(digit))
                .map(Some)
                .ok_or_else(|| {
                    Error::new(
                        ErrorKind::InvalidFormat,
                        format!("repeat count at position {} is too large", open),
                    )
                })?;
        }
        Err(Error::new(
            ErrorKind::InvalidFormat,
            format!("unterminated repeat count at position {}", open),
        ))
    }

    fn text(&mut self, position: usize, terminated: bool) -> Result<Directive, Error> {
        match self.chars.next() {
            Some((at, selector)) => match Encoding::from_selector(selector) {
                Some(encoding) => Ok(Directive::Text {
                    encoding,
                    terminated,
                }),
                None => Err(Error::invalid_format(selector, at)),
            },
            None => Err(Error::new(
                ErrorKind::InvalidFormat,
                format!("string field at position {} needs an encoding", position),
            )),
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<(usize, Directive), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let (position, c) = self.chars.next()?;
        let directive = match c {
            '^' => Ok(Directive::SetByteOrder(BIG_ENDIAN)),
            '_' => Ok(Directive::SetByteOrder(LITTLE_ENDIAN)),
            '%' => Ok(Directive::SetByteOrder(NATIVE)),
            '!' => Ok(Directive::AlignNext),
            'x' => Ok(Directive::NullByte),
            '1'..='9' => Ok(Directive::Repeat(Repeat::Count(c as usize - '0' as usize))),
            '*' => Ok(Directive::Repeat(Repeat::UntilExhausted)),
            '[' => self.count(position),
            '$' => self.text(position, false),
            'z' => self.text(position, true),
            other => Kind::from_code(other)
                .map(Directive::Numeric)
                .ok_or_else(|| Error::invalid_format(other, position)),
        };
        Some(directive.map(|directive| (position, directive)))
    }
}
