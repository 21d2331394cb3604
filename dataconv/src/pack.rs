use crate::buffer::PackBuffer;
use crate::ctx::{Align, ByteOrder};
use crate::format::{Directive, Kind, Repeat, Scanner};
use crate::text::Encoding;
use crate::{Error, Value};
use std::borrow::Borrow;
use std::iter::Peekable;
use tracing::{debug, trace, trace_span};

/// Strings aligned by `!` land on this boundary instead of their own width.
const STRING_ALIGNMENT: usize = 4;

/// Packs `args` into a byte vector laid out by `format`.
///
/// Arguments are consumed left to right, one per field. Running out of arguments while a repeat
/// is pending ends packing early; outside a repeat, a missing argument packs as zero (or as an
/// empty string).
///
/// A repeat count before `x` writes that many zero bytes and is then used up; it does not carry
/// over to the following field. `*x` writes a single zero byte. A repeated `x` with no arguments
/// left ends packing, like any other repeated field.
///
/// # Examples
///
/// ```
/// use dataconv::{pack, Value};
///
/// let bytes = pack("_s!i", &[Value::I32(0x7b), Value::I32(0x12345678)]).unwrap();
/// assert_eq!(bytes, [0x7b, 0x00, 0x00, 0x00, 0x78, 0x56, 0x34, 0x12]);
///
/// let bytes = pack("^*S", &[Value::U16(1), Value::U16(2)]).unwrap();
/// assert_eq!(bytes, [0x00, 0x01, 0x00, 0x02]);
/// ```
pub fn pack(format: &str, args: &[Value]) -> Result<Vec<u8>, Error> {
    pack_iter(format, args)
}

/// Packs arguments pulled lazily from an iterator.
///
/// Behaves exactly like [`pack`]; arguments beyond what the format consumes are never pulled.
///
/// ```
/// use dataconv::{pack_iter, Value};
///
/// let bytes = pack_iter("3b", (1..).map(Value::I32)).unwrap();
/// assert_eq!(bytes, [1, 2, 3]);
/// ```
pub fn pack_iter<I>(format: &str, args: I) -> Result<Vec<u8>, Error>
where
    I: IntoIterator,
    I::Item: Borrow<Value>,
{
    let span = trace_span!("pack", format);
    let _enter = span.enter();

    let mut packer = Packer {
        args: args.into_iter().peekable(),
        consumed: 0,
        order: ByteOrder::default(),
        repeat: None,
        buffer: PackBuffer::new(),
    };

    for directive in Scanner::new(format) {
        let (position, directive) = directive?;
        match directive {
            Directive::SetByteOrder(order) => packer.order = order,
            Directive::AlignNext => packer.buffer.align_next(Align::ToFieldSize),
            Directive::Repeat(repeat) => packer.repeat = Some(repeat),
            field => {
                if !packer.field(position, field)? {
                    trace!(position, "arguments exhausted, stopping");
                    break;
                }
            }
        }
    }

    debug!(len = packer.buffer.len(), args = packer.consumed, "packed");
    Ok(packer.buffer.finish())
}

fn as_value<T>(arg: &T) -> &Value
where
    T: Borrow<Value>,
{
    arg.borrow()
}

struct Packer<I>
where
    I: Iterator,
{
    args: Peekable<I>,
    consumed: usize,
    order: ByteOrder,
    repeat: Option<Repeat>,
    buffer: PackBuffer,
}

impl<I> Packer<I>
where
    I: Iterator,
    I::Item: Borrow<Value>,
{
    /// Applies a field directive, honoring any pending repeat.
    ///
    /// Returns `false` once a repeat has drained the arguments.
    fn field(&mut self, position: usize, directive: Directive) -> Result<bool, Error> {
        let repeat = self.repeat.take();

        if let Directive::NullByte = directive {
            if repeat.is_some() && self.args.peek().is_none() {
                return Ok(false);
            }
            let count = match repeat {
                Some(Repeat::Count(n)) => n,
                _ => 1,
            };
            for _ in 0..count {
                self.buffer.append(vec![0]);
            }
            return Ok(true);
        }

        match repeat {
            None => {
                let arg = self.next_arg();
                self.emit(position, directive, arg.as_ref().map(as_value::<I::Item>))?;
                Ok(true)
            }
            Some(Repeat::Count(n)) => {
                for _ in 0..n {
                    match self.next_arg() {
                        Some(arg) => self.emit(position, directive, Some(as_value(&arg)))?,
                        None => return Ok(false),
                    }
                }
                Ok(true)
            }
            Some(Repeat::UntilExhausted) => {
                while let Some(arg) = self.next_arg() {
                    self.emit(position, directive, Some(as_value(&arg)))?;
                }
                Ok(false)
            }
        }
    }

    fn next_arg(&mut self) -> Option<I::Item> {
        let arg = self.args.next();
        if arg.is_some() {
            self.consumed += 1;
        }
        arg
    }

    fn emit(&mut self, position: usize, directive: Directive, arg: Option<&Value>) -> Result<(), Error> {
        match directive {
            Directive::Numeric(kind) => {
                let bytes = self.encode_numeric(kind, arg).map_err(|e| {
                    Error::with_context(
                        format!(
                            "cannot pack argument {} as {:?} at format position {}: {}",
                            self.consumed, kind, position, e
                        ),
                        e,
                    )
                })?;
                self.buffer.append(bytes);
            }
            Directive::Text {
                encoding,
                terminated,
            } => self.emit_text(encoding, terminated, arg),
            other => unreachable!("{:?} is not a field directive", other),
        }
        Ok(())
    }

    fn encode_numeric(&self, kind: Kind, arg: Option<&Value>) -> Result<Vec<u8>, Error> {
        let order = self.order;
        let arg = match arg {
            Some(arg) => arg,
            None => return Ok(vec![0; kind.width()]),
        };
        Ok(match kind {
            Kind::I16 => order.get_bytes(arg.to_i16()?),
            Kind::U16 => order.get_bytes(arg.to_u16()?),
            Kind::I32 => order.get_bytes(arg.to_i32()?),
            Kind::U32 => order.get_bytes(arg.to_u32()?),
            Kind::I64 => order.get_bytes(arg.to_i64()?),
            Kind::U64 => order.get_bytes(arg.to_u64()?),
            Kind::F32 => order.get_bytes(arg.to_f32()?),
            Kind::F64 => order.get_bytes(arg.to_f64()?),
            Kind::U8 => vec![arg.to_u8()?],
            Kind::I8 => arg.to_i8()?.to_ne_bytes().to_vec(),
        })
    }

    fn emit_text(&mut self, encoding: Encoding, terminated: bool, arg: Option<&Value>) {
        if self.buffer.has_pending_align() {
            self.buffer.align_next(Align::ToBoundary(STRING_ALIGNMENT));
        }
        let text = arg.map(Value::to_string).unwrap_or_default();
        self.buffer.append(encoding.encode(&text));
        if terminated {
            self.buffer.append(vec![0; encoding.unit_width()]);
        }
    }
}
