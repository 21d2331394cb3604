//! Character encodings for string fields.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use std::char::REPLACEMENT_CHARACTER;

/// The text encoding of a `$` or `z` string field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// UTF-8, selector `8`.
    Utf8,
    /// UTF-16 little-endian, selector `6`.
    Utf16Le,
    /// UTF-7 (RFC 2152), selector `7`.
    Utf7,
    /// UTF-16 big-endian, selector `b`.
    Utf16Be,
    /// UTF-32 little-endian, selector `3`.
    Utf32Le,
    /// UTF-32 big-endian, selector `4`.
    Utf32Be,
}

impl Encoding {
    /// Looks up the encoding named by a format selector character.
    pub fn from_selector(selector: char) -> Option<Self> {
        match selector {
            '8' => Some(Self::Utf8),
            '6' => Some(Self::Utf16Le),
            '7' => Some(Self::Utf7),
            'b' => Some(Self::Utf16Be),
            '3' => Some(Self::Utf32Le),
            '4' => Some(Self::Utf32Be),
            _ => None,
        }
    }

    /// Width in bytes of one code unit, which is also the width of the null terminator.
    pub fn unit_width(self) -> usize {
        match self {
            Self::Utf8 | Self::Utf7 => 1,
            Self::Utf16Le | Self::Utf16Be => 2,
            Self::Utf32Le | Self::Utf32Be => 4,
        }
    }

    /// Encodes `text`, without a terminator.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Utf7 => utf7::encode(text),
            Self::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            Self::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            Self::Utf32Le => text.chars().flat_map(|c| u32::from(c).to_le_bytes()).collect(),
            Self::Utf32Be => text.chars().flat_map(|c| u32::from(c).to_be_bytes()).collect(),
        }
    }

    /// Decodes `bytes`, replacing malformed sequences with U+FFFD.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Utf7 => utf7::decode(bytes),
            Self::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
            Self::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
            Self::Utf32Le => decode_utf32(bytes, u32::from_le_bytes),
            Self::Utf32Be => decode_utf32(bytes, u32::from_be_bytes),
        }
    }

    /// Finds the offset of the first all-zero code unit in `bytes`.
    ///
    /// Code units are counted from the start of `bytes`; a trailing partial unit never matches.
    pub fn find_terminator(self, bytes: &[u8]) -> Option<usize> {
        let width = self.unit_width();
        bytes
            .chunks_exact(width)
            .position(|unit| unit.iter().all(|&b| b == 0))
            .map(|index| index * width)
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    let mut text: String = char::decode_utf16(units)
        .map(|c| c.unwrap_or(REPLACEMENT_CHARACTER))
        .collect();
    if bytes.len() % 2 != 0 {
        text.push(REPLACEMENT_CHARACTER);
    }
    text
}

fn decode_utf32(bytes: &[u8], unit: fn([u8; 4]) -> u32) -> String {
    let mut text: String = bytes
        .chunks_exact(4)
        .map(|quad| unit([quad[0], quad[1], quad[2], quad[3]]))
        .map(|code| std::char::from_u32(code).unwrap_or(REPLACEMENT_CHARACTER))
        .collect();
    if bytes.len() % 4 != 0 {
        text.push(REPLACEMENT_CHARACTER);
    }
    text
}

mod utf7 {
    use super::*;

    /// Modified base64 used inside shifted sequences: standard alphabet, never padded.
    const SHIFTED: GeneralPurpose = GeneralPurpose::new(
        &alphabet::STANDARD,
        GeneralPurposeConfig::new()
            .with_encode_padding(false)
            .with_decode_allow_trailing_bits(true)
            .with_decode_padding_mode(DecodePaddingMode::RequireNone),
    );

    fn is_direct(c: char) -> bool {
        c.is_ascii_alphanumeric() || "'(),-./:? \t\r\n".contains(c)
    }

    fn is_base64(b: u8) -> bool {
        b.is_ascii_alphanumeric() || b == b'+' || b == b'/'
    }

    pub(super) fn encode(text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len());
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            if is_direct(c) {
                out.push(c as u8);
                continue;
            }
            if c == '+' {
                out.extend_from_slice(b"+-");
                continue;
            }

            let mut units = Vec::new();
            let mut buf = [0u16; 2];
            units.extend(c.encode_utf16(&mut buf).iter().flat_map(|u| u.to_be_bytes()));
            while let Some(&next) = chars.peek() {
                if is_direct(next) {
                    break;
                }
                units.extend(next.encode_utf16(&mut buf).iter().flat_map(|u| u.to_be_bytes()));
                chars.next();
            }

            out.push(b'+');
            out.extend_from_slice(SHIFTED.encode(&units).as_bytes());
            match chars.peek() {
                Some(&next) if next == '-' || (next.is_ascii() && is_base64(next as u8)) => {
                    out.push(b'-')
                }
                _ => {}
            }
        }
        out
    }

    pub(super) fn decode(bytes: &[u8]) -> String {
        let mut text = String::with_capacity(bytes.len());
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            i += 1;
            if b != b'+' {
                text.push(if b.is_ascii() { b as char } else { REPLACEMENT_CHARACTER });
                continue;
            }
            if bytes.get(i) == Some(&b'-') {
                text.push('+');
                i += 1;
                continue;
            }

            let start = i;
            while i < bytes.len() && is_base64(bytes[i]) {
                i += 1;
            }
            match SHIFTED.decode(&bytes[start..i]) {
                Ok(raw) => {
                    let units = raw.chunks_exact(2).map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
                    text.extend(char::decode_utf16(units).map(|c| c.unwrap_or(REPLACEMENT_CHARACTER)));
                }
                Err(_) => text.push(REPLACEMENT_CHARACTER),
            }
            // an explicit '-' only closes the shifted sequence
            if bytes.get(i) == Some(&b'-') {
                i += 1;
            }
        }
        text
    }
}
