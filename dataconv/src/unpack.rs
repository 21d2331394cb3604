use crate::ctx::{Align, ByteOrder};
use crate::format::{Directive, Kind, Repeat, Scanner};
use crate::text::Encoding;
use crate::{Error, Value};
use tracing::{debug, trace, trace_span};

/// Strings aligned by `!` start on this boundary.
const STRING_ALIGNMENT: usize = 4;

/// Decodes the fields described by `format` from `buffer`, starting at byte `start`.
///
/// Decoding stops without error as soon as the buffer is exhausted, so a repeat may yield fewer
/// values than it asked for. Repeated fields produce one value each, in order.
///
/// # Examples
///
/// ```
/// use dataconv::{unpack, Value};
///
/// let values = unpack("_s!i", &[0x7b, 0x00, 0x00, 0x00, 0x78, 0x56, 0x34, 0x12], 0).unwrap();
/// assert_eq!(values, [Value::I16(0x7b), Value::I32(0x12345678)]);
///
/// // only one of the ten requested fields fits
/// let values = unpack("^[10]I", &[0xde, 0xad, 0xbe, 0xef], 0).unwrap();
/// assert_eq!(values, [Value::U32(0xdeadbeef)]);
/// ```
pub fn unpack(format: &str, buffer: &[u8], start: usize) -> Result<Vec<Value>, Error> {
    let span = trace_span!("unpack", format, len = buffer.len(), start);
    let _enter = span.enter();

    let mut unpacker = Unpacker {
        buffer,
        cursor: start,
        order: ByteOrder::default(),
        align: false,
        repeat: None,
        values: Vec::new(),
    };

    let mut directives = Scanner::new(format);
    while !unpacker.exhausted() {
        let (position, directive) = match directives.next() {
            Some(directive) => directive?,
            None => break,
        };
        match directive {
            Directive::SetByteOrder(order) => unpacker.order = order,
            Directive::AlignNext => unpacker.align = true,
            Directive::Repeat(repeat) => unpacker.repeat = Some(repeat),
            field => unpacker.field(position, field),
        }
    }

    debug!(values = unpacker.values.len(), cursor = unpacker.cursor, "unpacked");
    Ok(unpacker.values)
}

struct Unpacker<'a> {
    buffer: &'a [u8],
    cursor: usize,
    order: ByteOrder,
    align: bool,
    repeat: Option<Repeat>,
    values: Vec<Value>,
}

impl<'a> Unpacker<'a> {
    fn exhausted(&self) -> bool {
        self.cursor >= self.buffer.len()
    }

    /// Applies a field directive, honoring any pending repeat.
    fn field(&mut self, position: usize, directive: Directive) {
        let count = match (self.repeat.take(), directive) {
            (Some(Repeat::Count(n)), _) => n,
            // `*x` skips a single byte, as packing writes one
            (Some(Repeat::UntilExhausted), Directive::NullByte) | (None, _) => 1,
            (Some(Repeat::UntilExhausted), _) => usize::MAX,
        };
        for _ in 0..count {
            if self.exhausted() {
                trace!(position, "buffer exhausted, stopping");
                break;
            }
            match directive {
                Directive::NullByte => {
                    // a one-byte field consumes the alignment request without padding
                    self.align = false;
                    self.cursor += 1;
                }
                Directive::Numeric(kind) => self.numeric(kind),
                Directive::Text { encoding, .. } => self.text(encoding),
                other => unreachable!("{:?} is not a field directive", other),
            }
        }
    }

    /// Applies pending alignment, then checks that `width` bytes remain.
    ///
    /// A field that does not fit moves the cursor to the end of the buffer.
    fn prepare(&mut self, align: Align, width: usize) -> bool {
        if self.align {
            self.cursor = align.apply(self.cursor, width);
            self.align = false;
        }
        match self.cursor.checked_add(width) {
            Some(end) if end <= self.buffer.len() => true,
            _ => {
                self.cursor = self.buffer.len();
                false
            }
        }
    }

    fn numeric(&mut self, kind: Kind) {
        let width = kind.width();
        if !self.prepare(Align::ToFieldSize, width) {
            return;
        }
        let (order, buffer, at) = (self.order, self.buffer, self.cursor);
        // prepare() guarantees the field fits, so the accessors cannot fail
        let value = match kind {
            Kind::I16 => order.get_i16(buffer, at).map(Value::I16),
            Kind::U16 => order.get_u16(buffer, at).map(Value::U16),
            Kind::I32 => order.get_i32(buffer, at).map(Value::I32),
            Kind::U32 => order.get_u32(buffer, at).map(Value::U32),
            Kind::I64 => order.get_i64(buffer, at).map(Value::I64),
            Kind::U64 => order.get_u64(buffer, at).map(Value::U64),
            Kind::F32 => order.get_f32(buffer, at).map(Value::F32),
            Kind::F64 => order.get_f64(buffer, at).map(Value::F64),
            Kind::U8 => Ok(Value::U8(buffer[at])),
            Kind::I8 => Ok(Value::I8(i8::from_ne_bytes([buffer[at]]))),
        };
        if let Ok(value) = value {
            self.values.push(value);
        }
        self.cursor += width;
    }

    fn text(&mut self, encoding: Encoding) {
        if !self.prepare(Align::ToBoundary(STRING_ALIGNMENT), 1) {
            return;
        }
        let rest = &self.buffer[self.cursor..];
        let (text, consumed) = match encoding.find_terminator(rest) {
            Some(end) => (encoding.decode(&rest[..end]), end + encoding.unit_width()),
            None => (encoding.decode(rest), rest.len()),
        };
        self.values.push(Value::Str(text));
        self.cursor += consumed;
    }
}
