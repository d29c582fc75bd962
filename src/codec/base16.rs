use data_encoding::{DecodeKind, HEXLOWER, HEXLOWER_PERMISSIVE};

use super::util;
use crate::error::{LengthConstraint, RingError, Result};

const BYTES_PER_LINE: usize = 16;

pub fn encode(input: &[u8]) -> Result<Vec<u8>> {
    Ok(HEXLOWER.encode(input).into_bytes())
}

/// Either case is accepted.
pub fn decode(input: &[u8]) -> Result<Vec<u8>> {
    if let Some(position) = input.iter().position(|&b| util::hex_value(b).is_none()) {
        return Err(RingError::invalid_byte(input[position], position));
    }
    if input.len() % 2 != 0 {
        return Err(RingError::invalid_length(LengthConstraint::MultipleOf(2), input.len()));
    }

    HEXLOWER_PERMISSIVE.decode(input).map_err(|e| match e.kind {
        DecodeKind::Symbol => RingError::invalid_byte(input[e.position], e.position),
        _ => RingError::invalid_input(e.to_string()),
    })
}

/// At least eight hex digits; larger offsets widen the column.
fn offset_column(offset: usize) -> String {
    format!("{:08x}  ", offset)
}

/// Canonical hex dump: offset, sixteen bytes split in two groups of eight,
/// then the printable-ASCII gutter.
pub fn dump(input: &[u8]) -> Result<Vec<u8>> {
    let mut out = String::with_capacity(input.len().div_ceil(BYTES_PER_LINE) * 79);

    for (line, chunk) in input.chunks(BYTES_PER_LINE).enumerate() {
        out.push_str(&offset_column(line * BYTES_PER_LINE));

        for col in 0..BYTES_PER_LINE {
            match chunk.get(col) {
                Some(byte) => out.push_str(&format!("{:02x} ", byte)),
                None => out.push_str("   "),
            }
            if col == 7 {
                out.push(' ');
            } else if col == BYTES_PER_LINE - 1 {
                out.push_str(" |");
            }
        }

        out.extend(chunk.iter().map(|&b| {
            if (0x20..=0x7e).contains(&b) {
                b as char
            } else {
                '.'
            }
        }));
        out.push_str("|\n");
    }

    Ok(out.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_encode() {
        assert_eq!(encode(b"AB").unwrap(), b"4142");
        assert_eq!(encode(b"Hello").unwrap(), b"48656c6c6f");
    }

    #[test]
    fn test_hex_decode() {
        assert_eq!(decode(b"4142").unwrap(), b"AB");
        assert_eq!(decode(b"48656C6C6F").unwrap(), b"Hello");
    }

    #[test]
    fn test_hex_roundtrip() {
        let data: Vec<u8> = (0..=255).collect();
        assert_eq!(decode(&encode(&data).unwrap()).unwrap(), data);
    }

    #[test]
    fn test_hex_odd_length() {
        assert!(matches!(decode(b"414"), Err(RingError::InvalidLength { actual: 3, .. })));
    }

    #[test]
    fn test_hex_invalid_byte() {
        match decode(b"41zz") {
            Err(RingError::InvalidByte { byte, position }) => {
                assert_eq!(byte, b'z');
                assert_eq!(position, 2);
            }
            other => panic!("expected InvalidByte, got {:?}", other),
        }
        assert!(decode(b"41 42").is_err());
    }

    #[test]
    fn test_hex_empty() {
        assert_eq!(encode(b"").unwrap(), b"");
        assert_eq!(decode(b"").unwrap(), Vec::<u8>::new());
        assert_eq!(dump(b"").unwrap(), b"");
    }

    #[test]
    fn test_dump_partial_line() {
        let out = String::from_utf8(dump(b"Hello world\n").unwrap()).unwrap();
        assert_eq!(
            out,
            "00000000  48 65 6c 6c 6f 20 77 6f  72 6c 64 0a              |Hello world.|\n"
        );
    }

    #[test]
    fn test_dump_full_and_short_lines() {
        let data: Vec<u8> = (0x41..0x41 + 20).collect();
        let out = String::from_utf8(dump(&data).unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "00000000  41 42 43 44 45 46 47 48  49 4a 4b 4c 4d 4e 4f 50  |ABCDEFGHIJKLMNOP|"
        );
        assert_eq!(
            lines[1],
            "00000010  51 52 53 54                                       |QRST|"
        );
        assert!(out.ends_with("|\n"));
    }

    #[test]
    fn test_dump_gutter_lines_up() {
        for len in 1..=16 {
            let data = vec![0u8; len];
            let out = String::from_utf8(dump(&data).unwrap()).unwrap();
            assert_eq!(out.find('|'), Some(60), "gutter misaligned for {} bytes", len);
        }
    }

    #[test]
    fn test_dump_offset_column() {
        assert_eq!(offset_column(0x10), "00000010  ");
        assert_eq!(offset_column(0xffff_fff0), "fffffff0  ");
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_dump_offset_past_4gib_not_truncated() {
        assert_eq!(offset_column(0x1_0000_0000), "100000000  ");
        assert_eq!(offset_column(0x12_3456_7890), "1234567890  ");
    }

    #[test]
    fn test_dump_non_printable() {
        let out = String::from_utf8(dump(&[0x00, 0x7f, 0x80, b'~']).unwrap()).unwrap();
        assert!(out.ends_with("|...~|\n"));
    }
}
