//! Incremental transcoding of the input byte stream to code points.
//!
//! The first bytes of the stream are sniffed for a byte order mark: UTF-8
//! (`EF BB BF`), UTF-16 BE (`FE FF`), UTF-16 LE (`FF FE`), UTF-32 BE
//! (`00 00 FE FF`), or UTF-32 LE (`FF FE 00 00`). Absent a BOM the input is
//! UTF-8. The BOM itself is consumed silently and never reaches the
//! grammar.
//!
//! Decoding is strict: every ill-formed sequence (overlong UTF-8, stray
//! continuation bytes, lone surrogates, out-of-range code points) is
//! replaced by U+FFFD and lowers the decoder's `well_formed` flag. The
//! grammar layer decides whether a replacement character is an error in the
//! position it appears.

use smallvec::SmallVec;

use crate::error::Error;

pub(crate) const REPLACEMENT: char = '\u{FFFD}';

/// Code points produced by feeding a single byte. Once an encoding is
/// established a byte yields at most two code points; replaying the sniff
/// buffer of a failed BOM match can briefly yield up to four.
pub(crate) type Decoded = SmallVec<[char; 4]>;

/// The encodings the decoder can detect.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Encoding {
    Utf8,
    Utf16Be,
    Utf16Le,
    Utf32Be,
    Utf32Le,
}

/// The classic Hoehrmann UTF-8 automaton: the first 256 entries map bytes to
/// character classes, the remainder maps (state, class) pairs to states.
#[rustfmt::skip]
const UTF8_DFA: [u8; 364] = [
     0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,  0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
     0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,  0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
     0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,  0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
     0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,  0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,
     1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,  9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,9,
     7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,  7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,7,
     8,8,2,2,2,2,2,2,2,2,2,2,2,2,2,2,  2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,
    10,3,3,3,3,3,3,3,3,3,3,3,3,4,3,3, 11,6,6,6,5,8,8,8,8,8,8,8,8,8,8,8,

     0,12,24,36,60,96,84,12,12,12,48,72, 12,12,12,12,12,12,12,12,12,12,12,12,
    12, 0,12,12,12,12,12, 0,12, 0,12,12, 12,24,12,12,12,12,12,24,12,24,12,12,
    12,12,12,12,12,12,12,24,12,12,12,12, 12,24,12,12,12,12,12,12,12,24,12,12,
    12,12,12,12,12,12,12,36,12,36,12,12, 12,36,12,12,12,12,12,36,12,36,12,12,
    12,36,12,12,12,12,12,12,12,12,12,12,
];

const UTF8_ACCEPT: u8 = 0;
const UTF8_REJECT: u8 = 12;

/// Byte-at-a-time UTF-8 to code point decoder.
#[derive(Debug)]
pub(crate) struct Utf8Decoder {
    state: u8,
    code_point: u32,
    well_formed: bool,
}

impl Utf8Decoder {
    fn new() -> Self {
        Utf8Decoder {
            state: UTF8_ACCEPT,
            code_point: 0,
            well_formed: true,
        }
    }

    fn feed(&mut self, byte: u8) -> Option<char> {
        let class = UTF8_DFA[usize::from(byte)];
        self.code_point = if self.state != UTF8_ACCEPT {
            (u32::from(byte) & 0x3F) | (self.code_point << 6)
        } else {
            (0xFF >> class) & u32::from(byte)
        };
        self.state = UTF8_DFA[256 + usize::from(self.state) + usize::from(class)];
        match self.state {
            UTF8_ACCEPT => Some(char::from_u32(self.code_point).unwrap_or(REPLACEMENT)),
            UTF8_REJECT => {
                self.well_formed = false;
                self.state = UTF8_ACCEPT;
                Some(REPLACEMENT)
            }
            _ => None,
        }
    }

    /// Flush a trailing partial sequence.
    fn end(&mut self) -> Option<char> {
        if self.state != UTF8_ACCEPT {
            self.state = UTF8_ACCEPT;
            self.well_formed = false;
            return Some(REPLACEMENT);
        }
        None
    }
}

/// Byte-at-a-time UTF-16 decoder with surrogate pairing.
#[derive(Debug)]
pub(crate) struct Utf16Decoder {
    big_endian: bool,
    /// The first byte of a code unit, waiting for its partner.
    half: Option<u8>,
    /// A high surrogate waiting for its low counterpart.
    high: Option<u16>,
    well_formed: bool,
}

impl Utf16Decoder {
    fn new(big_endian: bool) -> Self {
        Utf16Decoder {
            big_endian,
            half: None,
            high: None,
            well_formed: true,
        }
    }

    fn feed(&mut self, byte: u8, out: &mut Decoded) {
        let Some(first) = self.half.take() else {
            self.half = Some(byte);
            return;
        };
        let unit = if self.big_endian {
            u16::from_be_bytes([first, byte])
        } else {
            u16::from_le_bytes([first, byte])
        };
        self.push_unit(unit, out);
    }

    fn push_unit(&mut self, unit: u16, out: &mut Decoded) {
        if let Some(high) = self.high.take() {
            if (0xDC00..=0xDFFF).contains(&unit) {
                let cp = 0x10000
                    + ((u32::from(high) - 0xD800) << 10)
                    + (u32::from(unit) - 0xDC00);
                out.push(char::from_u32(cp).unwrap_or(REPLACEMENT));
                return;
            }
            // The pending high surrogate had no low partner.
            self.well_formed = false;
            out.push(REPLACEMENT);
            // fall through: the current unit still needs handling
        }
        match unit {
            0xD800..=0xDBFF => self.high = Some(unit),
            0xDC00..=0xDFFF => {
                self.well_formed = false;
                out.push(REPLACEMENT);
            }
            _ => out.push(char::from_u32(u32::from(unit)).unwrap_or(REPLACEMENT)),
        }
    }

    fn end(&mut self) -> Option<char> {
        if self.half.take().is_some() || self.high.take().is_some() {
            self.well_formed = false;
            return Some(REPLACEMENT);
        }
        None
    }
}

/// Byte-at-a-time UTF-32 decoder.
#[derive(Debug)]
pub(crate) struct Utf32Decoder {
    big_endian: bool,
    bytes: [u8; 4],
    have: usize,
    well_formed: bool,
}

impl Utf32Decoder {
    fn new(big_endian: bool) -> Self {
        Utf32Decoder {
            big_endian,
            bytes: [0; 4],
            have: 0,
            well_formed: true,
        }
    }

    fn feed(&mut self, byte: u8) -> Option<char> {
        self.bytes[self.have] = byte;
        self.have += 1;
        if self.have < 4 {
            return None;
        }
        self.have = 0;
        let cp = if self.big_endian {
            u32::from_be_bytes(self.bytes)
        } else {
            u32::from_le_bytes(self.bytes)
        };
        Some(char::from_u32(cp).unwrap_or_else(|| {
            // Surrogate values and code points beyond U+10FFFF.
            self.well_formed = false;
            REPLACEMENT
        }))
    }

    fn end(&mut self) -> Option<char> {
        if self.have != 0 {
            self.have = 0;
            self.well_formed = false;
            return Some(REPLACEMENT);
        }
        None
    }
}

enum State {
    /// Collecting the first bytes of the stream until a BOM is matched or
    /// ruled out.
    Sniff(SmallVec<[u8; 4]>),
    Utf8(Utf8Decoder),
    Utf16(Utf16Decoder),
    Utf32(Utf32Decoder),
}

/// Turns the raw input byte stream into code points, detecting the encoding
/// from an optional leading byte order mark.
pub(crate) struct ByteDecoder {
    state: State,
}

impl ByteDecoder {
    pub(crate) fn new() -> Self {
        ByteDecoder {
            state: State::Sniff(SmallVec::new()),
        }
    }

    /// Feed one byte; returns the code points it completed.
    pub(crate) fn feed(&mut self, byte: u8) -> Decoded {
        let mut out = Decoded::new();
        match &mut self.state {
            State::Sniff(buf) => {
                buf.push(byte);
                let buf = std::mem::take(buf);
                self.sniff(&buf, &mut out);
            }
            State::Utf8(d) => out.extend(d.feed(byte)),
            State::Utf16(d) => d.feed(byte, &mut out),
            State::Utf32(d) => {
                if let Some(c) = d.feed(byte) {
                    out.push(c);
                }
            }
        }
        out
    }

    /// Signal the end of the input. A partial code point (or an unresolved
    /// BOM prefix) is flushed as replacement characters.
    pub(crate) fn end(&mut self) -> Decoded {
        let mut out = Decoded::new();
        if let State::Sniff(buf) = &mut self.state {
            // The whole input was shorter than the longest BOM. A prefix
            // that is itself a complete UTF-16 mark commits to that
            // encoding; anything else was UTF-8 data all along.
            let buf = std::mem::take(buf);
            match *buf {
                [0xFF, 0xFE] => self.establish(Encoding::Utf16Le, true, &[], &mut out),
                [0xFF, 0xFE, 0x00] => self.establish(Encoding::Utf16Le, true, &[0x00], &mut out),
                _ => self.establish(Encoding::Utf8, false, &buf, &mut out),
            }
        }
        match &mut self.state {
            State::Utf8(d) => out.extend(d.end()),
            State::Utf16(d) => out.extend(d.end()),
            State::Utf32(d) => out.extend(d.end()),
            State::Sniff(_) => {}
        }
        out
    }

    /// True unless an ill-formed sequence has been replaced.
    pub(crate) fn well_formed(&self) -> bool {
        match &self.state {
            State::Sniff(_) => true,
            State::Utf8(d) => d.well_formed,
            State::Utf16(d) => d.well_formed,
            State::Utf32(d) => d.well_formed,
        }
    }

    /// Decide what the sniff buffer means. Either keep waiting, or commit to
    /// an encoding and replay the bytes that were not part of a BOM.
    fn sniff(&mut self, buf: &[u8], out: &mut Decoded) {
        match *buf {
            // Unambiguous BOM prefixes: keep collecting.
            [0xEF] | [0xEF, 0xBB] | [0xFE] | [0xFF] | [0xFF, 0xFE] | [0xFF, 0xFE, 0x00]
            | [0x00] | [0x00, 0x00] | [0x00, 0x00, 0xFE] => {
                self.state = State::Sniff(SmallVec::from_slice(buf));
            }

            [0xEF, 0xBB, 0xBF] => self.establish(Encoding::Utf8, true, &[], out),
            [0xFE, 0xFF] => self.establish(Encoding::Utf16Be, true, &[], out),
            [0xFF, 0xFE, 0x00, 0x00] => self.establish(Encoding::Utf32Le, true, &[], out),
            // A UTF-16 LE BOM whose next code unit begins with 0x00.
            [0xFF, 0xFE, 0x00, b] => self.establish(Encoding::Utf16Le, true, &[0x00, b], out),
            [0xFF, 0xFE, b] => self.establish(Encoding::Utf16Le, true, &[b], out),
            [0x00, 0x00, 0xFE, 0xFF] => self.establish(Encoding::Utf32Be, true, &[], out),

            // No BOM: the stream is UTF-8 and every buffered byte is data.
            _ => self.establish(Encoding::Utf8, false, buf, out),
        }
    }

    fn establish(&mut self, encoding: Encoding, bom: bool, replay: &[u8], out: &mut Decoded) {
        log::debug!("input encoding {encoding:?} (byte order mark: {bom})");
        self.state = match encoding {
            Encoding::Utf8 => State::Utf8(Utf8Decoder::new()),
            Encoding::Utf16Be => State::Utf16(Utf16Decoder::new(true)),
            Encoding::Utf16Le => State::Utf16(Utf16Decoder::new(false)),
            Encoding::Utf32Be => State::Utf32(Utf32Decoder::new(true)),
            Encoding::Utf32Le => State::Utf32(Utf32Decoder::new(false)),
        };
        for &b in replay {
            match &mut self.state {
                State::Utf8(d) => out.extend(d.feed(b)),
                State::Utf16(d) => d.feed(b, out),
                State::Utf32(d) => {
                    if let Some(c) = d.feed(b) {
                        out.push(c);
                    }
                }
                State::Sniff(_) => unreachable!("sniffing just completed"),
            }
        }
    }
}

/// Reassembles code points from the UTF-16 code units written with `\uXXXX`
/// escapes in strings and identifiers. A high surrogate is held until its
/// low partner arrives in a following escape.
#[derive(Debug, Default)]
pub(crate) struct Utf16Assembler {
    high: Option<u16>,
}

impl Utf16Assembler {
    /// True while a high surrogate is waiting for its low counterpart.
    pub(crate) fn pending(&self) -> bool {
        self.high.is_some()
    }

    /// Add one UTF-16 code unit. `Ok(Some(_))` yields a completed code
    /// point, `Ok(None)` stores a high surrogate, and an improperly
    /// sequenced surrogate is an error.
    pub(crate) fn push(&mut self, unit: u16) -> Result<Option<char>, Error> {
        match unit {
            0xD800..=0xDBFF => {
                if self.high.replace(unit).is_some() {
                    return Err(Error::BadUnicodeCodePoint);
                }
                Ok(None)
            }
            0xDC00..=0xDFFF => {
                let Some(high) = self.high.take() else {
                    return Err(Error::BadUnicodeCodePoint);
                };
                let cp = 0x10000
                    + ((u32::from(high) - 0xD800) << 10)
                    + (u32::from(unit) - 0xDC00);
                char::from_u32(cp)
                    .map(Some)
                    .ok_or(Error::BadUnicodeCodePoint)
            }
            _ => {
                if self.high.is_some() {
                    return Err(Error::BadUnicodeCodePoint);
                }
                char::from_u32(u32::from(unit))
                    .map(Some)
                    .ok_or(Error::BadUnicodeCodePoint)
            }
        }
    }
}
