//! Character sets reached by name when no built-in mode matches.
//!
//! IANA names are tried first. A handful of them mean something different in
//! the WHATWG label set that `encoding_rs` implements (`ISO-8859-1` and
//! `US-ASCII` both alias windows-1252 there), and some are not in it at all,
//! so those are converted here. Everything else goes through `encoding_rs`.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};

use crate::error::{RingError, Result};
use crate::types::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endian {
    Big,
    Little,
}

impl Endian {
    fn read_u16(self, b: &[u8]) -> u16 {
        let bytes = [b[0], b[1]];
        match self {
            Endian::Big => u16::from_be_bytes(bytes),
            Endian::Little => u16::from_le_bytes(bytes),
        }
    }

    fn read_u32(self, b: &[u8]) -> u32 {
        let bytes = [b[0], b[1], b[2], b[3]];
        match self {
            Endian::Big => u32::from_be_bytes(bytes),
            Endian::Little => u32::from_le_bytes(bytes),
        }
    }

    fn u16_bytes(self, v: u16) -> [u8; 2] {
        match self {
            Endian::Big => v.to_be_bytes(),
            Endian::Little => v.to_le_bytes(),
        }
    }

    fn u32_bytes(self, v: u32) -> [u8; 4] {
        match self {
            Endian::Big => v.to_be_bytes(),
            Endian::Little => v.to_le_bytes(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Codec {
    Latin1,
    Ascii,
    CodePage437,
    /// `bom` means a leading byte order mark is honoured on decode and
    /// written on encode; big endian otherwise.
    Utf16 { endian: Endian, bom: bool },
    Utf32 { endian: Endian, bom: bool },
    Whatwg(&'static Encoding),
}

/// Lowercase aliases, canonical name, converter.
const IANA_CHARSETS: &[(&[&str], &str, Codec)] = &[
    (
        &[
            "iso-8859-1",
            "iso_8859-1:1987",
            "iso_8859-1",
            "iso-ir-100",
            "latin1",
            "l1",
            "ibm819",
            "cp819",
            "csisolatin1",
        ],
        "ISO-8859-1",
        Codec::Latin1,
    ),
    (
        &[
            "us-ascii",
            "ascii",
            "iso-ir-6",
            "ansi_x3.4-1968",
            "ansi_x3.4-1986",
            "iso_646.irv:1991",
            "iso646-us",
            "us",
            "ibm367",
            "cp367",
            "csascii",
        ],
        "US-ASCII",
        Codec::Ascii,
    ),
    (
        &["ibm437", "cp437", "437", "cspc8codepage437"],
        "IBM437",
        Codec::CodePage437,
    ),
    (
        &["utf-16", "csutf16"],
        "UTF-16",
        Codec::Utf16 { endian: Endian::Big, bom: true },
    ),
    (
        &["utf-16be", "csutf16be"],
        "UTF-16BE",
        Codec::Utf16 { endian: Endian::Big, bom: false },
    ),
    (
        &["utf-16le", "csutf16le"],
        "UTF-16LE",
        Codec::Utf16 { endian: Endian::Little, bom: false },
    ),
    (
        &["utf-32", "csutf32"],
        "UTF-32",
        Codec::Utf32 { endian: Endian::Big, bom: true },
    ),
    (
        &["utf-32be", "csutf32be"],
        "UTF-32BE",
        Codec::Utf32 { endian: Endian::Big, bom: false },
    ),
    (
        &["utf-32le", "csutf32le"],
        "UTF-32LE",
        Codec::Utf32 { endian: Endian::Little, bom: false },
    ),
];

/// Code page 437 bytes 0x80..=0xFF; the lower half is ASCII.
const CP437_HIGH: [char; 128] = [
    '\u{00C7}', '\u{00FC}', '\u{00E9}', '\u{00E2}', '\u{00E4}', '\u{00E0}', '\u{00E5}', '\u{00E7}',
    '\u{00EA}', '\u{00EB}', '\u{00E8}', '\u{00EF}', '\u{00EE}', '\u{00EC}', '\u{00C4}', '\u{00C5}',
    '\u{00C9}', '\u{00E6}', '\u{00C6}', '\u{00F4}', '\u{00F6}', '\u{00F2}', '\u{00FB}', '\u{00F9}',
    '\u{00FF}', '\u{00D6}', '\u{00DC}', '\u{00A2}', '\u{00A3}', '\u{00A5}', '\u{20A7}', '\u{0192}',
    '\u{00E1}', '\u{00ED}', '\u{00F3}', '\u{00FA}', '\u{00F1}', '\u{00D1}', '\u{00AA}', '\u{00BA}',
    '\u{00BF}', '\u{2310}', '\u{00AC}', '\u{00BD}', '\u{00BC}', '\u{00A1}', '\u{00AB}', '\u{00BB}',
    '\u{2591}', '\u{2592}', '\u{2593}', '\u{2502}', '\u{2524}', '\u{2561}', '\u{2562}', '\u{2556}',
    '\u{2555}', '\u{2563}', '\u{2551}', '\u{2557}', '\u{255D}', '\u{255C}', '\u{255B}', '\u{2510}',
    '\u{2514}', '\u{2534}', '\u{252C}', '\u{251C}', '\u{2500}', '\u{253C}', '\u{255E}', '\u{255F}',
    '\u{255A}', '\u{2554}', '\u{2569}', '\u{2566}', '\u{2560}', '\u{2550}', '\u{256C}', '\u{2567}',
    '\u{2568}', '\u{2564}', '\u{2565}', '\u{2559}', '\u{2558}', '\u{2552}', '\u{2553}', '\u{256B}',
    '\u{256A}', '\u{2518}', '\u{250C}', '\u{2588}', '\u{2584}', '\u{258C}', '\u{2590}', '\u{2580}',
    '\u{03B1}', '\u{00DF}', '\u{0393}', '\u{03C0}', '\u{03A3}', '\u{03C3}', '\u{00B5}', '\u{03C4}',
    '\u{03A6}', '\u{0398}', '\u{03A9}', '\u{03B4}', '\u{221E}', '\u{03C6}', '\u{03B5}', '\u{2229}',
    '\u{2261}', '\u{00B1}', '\u{2265}', '\u{2264}', '\u{2320}', '\u{2321}', '\u{00F7}', '\u{2248}',
    '\u{00B0}', '\u{2219}', '\u{00B7}', '\u{221A}', '\u{207F}', '\u{00B2}', '\u{25A0}', '\u{00A0}',
];

fn cp437_char(b: u8) -> char {
    if b.is_ascii() {
        b as char
    } else {
        CP437_HIGH[(b - 0x80) as usize]
    }
}

fn cp437_byte(c: char) -> Option<u8> {
    if c.is_ascii() {
        return Some(c as u8);
    }
    CP437_HIGH.iter().position(|&h| h == c).map(|idx| 0x80 + idx as u8)
}

/// Strips a byte order mark if present and reports the byte order to use.
fn sniff_bom<'a>(input: &'a [u8], big: &[u8], little: &[u8]) -> (Endian, &'a [u8]) {
    if let Some(rest) = input.strip_prefix(big) {
        (Endian::Big, rest)
    } else if let Some(rest) = input.strip_prefix(little) {
        (Endian::Little, rest)
    } else {
        (Endian::Big, input)
    }
}

fn decode_utf16(input: &[u8], endian: Endian, bom: bool) -> String {
    let (endian, body) = if bom {
        sniff_bom(input, &[0xFE, 0xFF], &[0xFF, 0xFE])
    } else {
        (endian, input)
    };
    let units = body.chunks_exact(2).map(|pair| endian.read_u16(pair));
    let mut text: String = char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    if body.len() % 2 != 0 {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}

fn decode_utf32(input: &[u8], endian: Endian, bom: bool) -> String {
    let (endian, body) = if bom {
        sniff_bom(input, &[0x00, 0x00, 0xFE, 0xFF], &[0xFF, 0xFE, 0x00, 0x00])
    } else {
        (endian, input)
    };
    let mut text: String = body
        .chunks_exact(4)
        .map(|quad| char::from_u32(endian.read_u32(quad)).unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect();
    if body.len() % 4 != 0 {
        text.push(char::REPLACEMENT_CHARACTER);
    }
    text
}

#[derive(Clone, Copy)]
pub struct Charset {
    codec: Codec,
    name: &'static str,
    direction: Direction,
}

impl Charset {
    /// Names match case-insensitively. The `replacement` pseudo-encoding is
    /// never returned.
    pub fn for_label(label: &str, direction: Direction) -> Option<Self> {
        let label = label.trim();
        let lowered = label.to_ascii_lowercase();
        if let Some(&(_, name, codec)) = IANA_CHARSETS
            .iter()
            .find(|(aliases, _, _)| aliases.contains(&lowered.as_str()))
        {
            return Some(Self { codec, name, direction });
        }

        let encoding = Encoding::for_label_no_replacement(label.as_bytes())?;
        let codec = if encoding == UTF_16LE {
            Codec::Utf16 { endian: Endian::Little, bom: false }
        } else if encoding == UTF_16BE {
            Codec::Utf16 { endian: Endian::Big, bom: false }
        } else {
            Codec::Whatwg(encoding)
        };
        Some(Self {
            codec,
            name: encoding.name(),
            direction,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn apply(&self, input: &[u8]) -> Result<Vec<u8>> {
        match self.direction {
            Direction::Decode => Ok(self.decode(input).into_bytes()),
            Direction::Encode => self.encode(input),
        }
    }

    /// Malformed or unmapped input becomes U+FFFD.
    fn decode(&self, input: &[u8]) -> String {
        match self.codec {
            Codec::Latin1 => input.iter().map(|&b| b as char).collect(),
            Codec::Ascii => input
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
                .collect(),
            Codec::CodePage437 => input.iter().map(|&b| cp437_char(b)).collect(),
            Codec::Utf16 { endian, bom } => decode_utf16(input, endian, bom),
            Codec::Utf32 { endian, bom } => decode_utf32(input, endian, bom),
            Codec::Whatwg(encoding) => {
                let (text, had_errors) = encoding.decode_without_bom_handling(input);
                if had_errors {
                    log::debug!("{}: malformed sequences replaced with U+FFFD", self.name);
                }
                text.into_owned()
            }
        }
    }

    fn unmappable(&self, c: char) -> RingError {
        RingError::invalid_input(format!(
            "character U+{:04X} not representable in {}",
            c as u32, self.name
        ))
    }

    fn encode_single_byte(&self, text: &str, map: impl Fn(char) -> Option<u8>) -> Result<Vec<u8>> {
        text.chars().map(|c| map(c).ok_or_else(|| self.unmappable(c))).collect()
    }

    fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let text = std::str::from_utf8(input).map_err(|e| {
            RingError::invalid_input(format!("{} encoder needs UTF-8 input: {}", self.name, e))
        })?;

        match self.codec {
            Codec::Latin1 => self.encode_single_byte(text, |c| u8::try_from(c).ok()),
            Codec::Ascii => self.encode_single_byte(text, |c| c.is_ascii().then_some(c as u8)),
            Codec::CodePage437 => self.encode_single_byte(text, cp437_byte),
            Codec::Utf16 { endian, bom } => {
                let mut out = Vec::with_capacity(text.len() * 2 + 2);
                if bom {
                    out.extend_from_slice(&endian.u16_bytes(0xFEFF));
                }
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&endian.u16_bytes(unit));
                }
                Ok(out)
            }
            Codec::Utf32 { endian, bom } => {
                let mut out = Vec::with_capacity(text.len() * 4 + 4);
                if bom {
                    out.extend_from_slice(&endian.u32_bytes(0xFEFF));
                }
                for c in text.chars() {
                    out.extend_from_slice(&endian.u32_bytes(c as u32));
                }
                Ok(out)
            }
            Codec::Whatwg(encoding) => {
                let (bytes, used, had_errors) = encoding.encode(text);
                if had_errors {
                    let bad = text.chars().find(|c| {
                        let mut buf = [0u8; 4];
                        let (_, _, unmappable) = used.encode(c.encode_utf8(&mut buf));
                        unmappable
                    });
                    return Err(match bad {
                        Some(c) => self.unmappable(c),
                        None => RingError::invalid_input(format!("text not representable in {}", self.name)),
                    });
                }
                Ok(bytes.into_owned())
            }
        }
    }
}

impl std::fmt::Debug for Charset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Charset")
            .field("name", &self.name)
            .field("direction", &self.direction)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder(label: &str) -> Charset {
        Charset::for_label(label, Direction::Decode).unwrap()
    }

    fn encoder(label: &str) -> Charset {
        Charset::for_label(label, Direction::Encode).unwrap()
    }

    #[test]
    fn test_label_lookup_case_insensitive() {
        assert!(Charset::for_label("ISO-8859-1", Direction::Decode).is_some());
        assert!(Charset::for_label("iso-8859-1", Direction::Decode).is_some());
        assert!(Charset::for_label(" Shift_JIS ", Direction::Encode).is_some());
        assert!(Charset::for_label("hex", Direction::Decode).is_none());
        assert!(Charset::for_label("replacement", Direction::Decode).is_none());
    }

    #[test]
    fn test_iana_latin1_is_not_windows_1252() {
        for label in ["ISO-8859-1", "latin1", "ISO_8859-1:1987", "l1", "CP819"] {
            let dec = decoder(label);
            assert_eq!(dec.name(), "ISO-8859-1");
            assert_eq!(dec.apply(b"\x80\xff").unwrap(), "\u{80}\u{FF}".as_bytes(), "{}", label);
        }
        assert_eq!(decoder("windows-1252").apply(b"\x80").unwrap(), "€".as_bytes());
    }

    #[test]
    fn test_latin1_roundtrip() {
        let encoded = encoder("latin1").apply("café\u{80}".as_bytes()).unwrap();
        assert_eq!(encoded, b"caf\xe9\x80");
        assert_eq!(decoder("latin1").apply(&encoded).unwrap(), "café\u{80}".as_bytes());
    }

    #[test]
    fn test_latin1_encode_unmappable_fails() {
        let err = encoder("latin1").apply("€".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("U+20AC"), "{}", err);
        let err = encoder("latin1").apply("日本".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("U+65E5"), "{}", err);
    }

    #[test]
    fn test_us_ascii() {
        for label in ["US-ASCII", "ascii", "ANSI_X3.4-1968", "csASCII"] {
            assert_eq!(decoder(label).name(), "US-ASCII");
        }
        assert_eq!(decoder("US-ASCII").apply(b"a\x80b").unwrap(), "a\u{FFFD}b".as_bytes());
        assert_eq!(encoder("US-ASCII").apply(b"plain").unwrap(), b"plain");
        assert!(encoder("US-ASCII").apply("é".as_bytes()).is_err());
    }

    #[test]
    fn test_ibm437() {
        assert_eq!(decoder("IBM437").apply(b"\x82\xdb\xe3").unwrap(), "é█π".as_bytes());
        assert_eq!(encoder("cp437").apply("é█π".as_bytes()).unwrap(), b"\x82\xdb\xe3");
        assert!(encoder("IBM437").apply("€".as_bytes()).is_err());
    }

    #[test]
    fn test_encode_rejects_invalid_utf8() {
        assert!(encoder("latin1").apply(b"\xff\xfe").is_err());
        assert!(encoder("shift_jis").apply(b"\xff").is_err());
    }

    #[test]
    fn test_utf16_without_bom() {
        assert_eq!(encoder("utf-16le").apply(b"Hi").unwrap(), b"H\0i\0");
        assert_eq!(encoder("utf-16be").apply(b"Hi").unwrap(), b"\0H\0i");
        assert_eq!(decoder("utf-16le").apply(b"H\0i\0").unwrap(), b"Hi");
        assert_eq!(decoder("UTF-16BE").apply(b"\0H\0").unwrap(), "H\u{FFFD}".as_bytes());
    }

    #[test]
    fn test_utf16_with_bom() {
        assert_eq!(encoder("UTF-16").apply(b"H").unwrap(), b"\xfe\xff\0H");
        assert_eq!(decoder("UTF-16").apply(b"\xff\xfeH\0").unwrap(), b"H");
        assert_eq!(decoder("UTF-16").apply(b"\0H").unwrap(), b"H");
    }

    #[test]
    fn test_whatwg_utf16_labels_encode_utf16() {
        assert_eq!(encoder("unicodefffe").apply(b"A").unwrap(), b"\0A");
    }

    #[test]
    fn test_utf32() {
        assert_eq!(encoder("UTF-32").apply(b"A").unwrap(), b"\0\0\xfe\xff\0\0\0A");
        assert_eq!(encoder("utf-32le").apply("😀".as_bytes()).unwrap(), b"\x00\xf6\x01\x00");
        assert_eq!(decoder("UTF-32").apply(b"\xff\xfe\0\0A\0\0\0").unwrap(), b"A");
        assert_eq!(decoder("UTF-32BE").apply(b"\0\x11\0\0\0\0\0A").unwrap(), "\u{FFFD}A".as_bytes());
        assert_eq!(decoder("UTF-32LE").apply(b"A\0\0").unwrap(), "\u{FFFD}".as_bytes());
    }

    #[test]
    fn test_decode_malformed_replaced() {
        assert_eq!(decoder("utf-8").apply(b"a\xffb").unwrap(), "a\u{FFFD}b".as_bytes());
    }
}
