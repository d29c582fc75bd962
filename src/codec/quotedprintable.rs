use super::util;
use crate::error::{RingError, Result};

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";
const LINE_MAX_LEN: usize = 76;

fn is_whitespace(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

fn is_literal(b: u8) -> bool {
    (b'!'..=b'~').contains(&b) && b != b'='
}

/// Text-mode encoder state: the pending line and whether the last byte was
/// a `\r` already turned into a line break.
struct LineWriter {
    out: Vec<u8>,
    line: Vec<u8>,
    cr: bool,
}

impl LineWriter {
    fn new(capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
            line: Vec::with_capacity(LINE_MAX_LEN + 2),
            cr: false,
        }
    }

    fn write(&mut self, b: u8) {
        if b == b'\n' || b == b'\r' {
            if self.cr && b == b'\n' {
                self.cr = false;
                return;
            }
            self.cr = b == b'\r';
            self.escape_trailing_whitespace();
            self.hard_break();
            return;
        }
        if self.line.len() == LINE_MAX_LEN - 1 {
            self.soft_break();
        }
        self.line.push(b);
        self.cr = false;
    }

    fn escape(&mut self, b: u8) {
        if LINE_MAX_LEN - 1 - self.line.len() < 3 {
            self.soft_break();
        }
        self.line
            .extend_from_slice(&[b'=', HEX_UPPER[(b >> 4) as usize], HEX_UPPER[(b & 0x0F) as usize]]);
    }

    /// Whitespace may not end a line; it would be stripped in transit.
    fn escape_trailing_whitespace(&mut self) {
        if let Some(&last) = self.line.last() {
            if is_whitespace(last) {
                self.line.pop();
                self.escape(last);
            }
        }
    }

    fn soft_break(&mut self) {
        self.line.push(b'=');
        self.hard_break();
    }

    fn hard_break(&mut self) {
        self.line.extend_from_slice(b"\r\n");
        self.flush();
    }

    fn flush(&mut self) {
        self.out.append(&mut self.line);
    }

    fn finish(mut self) -> Vec<u8> {
        self.escape_trailing_whitespace();
        self.flush();
        self.out
    }
}

pub fn encode(input: &[u8]) -> Result<Vec<u8>> {
    let mut writer = LineWriter::new(input.len() + input.len() / 3);
    for &b in input {
        if is_literal(b) || is_whitespace(b) || b == b'\n' || b == b'\r' {
            writer.write(b);
        } else {
            writer.escape(b);
        }
    }
    Ok(writer.finish())
}

fn is_discard_whitespace(b: u8) -> bool {
    matches!(b, b'\n' | b'\r' | b' ' | b'\t')
}

/// Splits after each `\n`, keeping the terminator with its line.
fn lines(input: &[u8]) -> impl Iterator<Item = &[u8]> {
    input.split_inclusive(|&b| b == b'\n')
}

fn decode_line(line: &[u8], out: &mut Vec<u8>) -> Result<()> {
    let mut i = 0;
    while i < line.len() {
        let b = line[i];
        match b {
            b'=' => {
                let escaped = line
                    .get(i + 1..i + 3)
                    .and_then(|h| Some((util::hex_value(h[0])?, util::hex_value(h[1])?)));
                match escaped {
                    Some((hi, lo)) => {
                        out.push(hi << 4 | lo);
                        i += 3;
                        continue;
                    }
                    // a stray '=' before ordinary text is kept as is
                    None if line.len() - i >= 2 && line[i + 1] != b'\r' && line[i + 1] != b'\n' => {
                        out.push(b'=');
                    }
                    None => {
                        let bad = line.get(i + 1).copied().unwrap_or(b'=');
                        return Err(RingError::invalid_input(format!(
                            "quoted-printable: invalid hex byte {:#04x}",
                            bad
                        )));
                    }
                }
            }
            b'\t' | b'\r' | b'\n' => out.push(b),
            0x80..=0xff => out.push(b),
            _ if !(b' '..=b'~').contains(&b) => {
                return Err(RingError::invalid_input(format!(
                    "quoted-printable: invalid unescaped byte {:#04x} in body",
                    b
                )));
            }
            _ => out.push(b),
        }
        i += 1;
    }
    Ok(())
}

pub fn decode(input: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len());
    let mut lines = lines(input).peekable();

    while let Some(whole) = lines.next() {
        let at_eof = lines.peek().is_none();
        let has_lf = whole.ends_with(b"\n");
        let has_crlf = whole.ends_with(b"\r\n");

        let kept = whole
            .iter()
            .rposition(|&b| !is_discard_whitespace(b))
            .map_or(0, |p| p + 1);
        let (body, stripped) = whole.split_at(kept);

        if let Some(content) = body.strip_suffix(b"=") {
            decode_line(content, &mut out)?;
            let soft_break = stripped.starts_with(b"\n")
                || stripped.starts_with(b"\r\n")
                || (stripped.is_empty() && !content.is_empty() && at_eof);
            if !soft_break {
                return Err(RingError::invalid_input(format!(
                    "quoted-printable: invalid bytes after =: {:?}",
                    String::from_utf8_lossy(stripped)
                )));
            }
        } else {
            decode_line(body, &mut out)?;
            if has_crlf {
                out.extend_from_slice(b"\r\n");
            } else if has_lf {
                out.push(b'\n');
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enc(input: &[u8]) -> String {
        String::from_utf8(encode(input).unwrap()).unwrap()
    }

    #[test]
    fn test_qp_empty() {
        assert_eq!(enc(b""), "");
        assert_eq!(decode(b"").unwrap(), b"");
    }

    #[test]
    fn test_qp_keeps_inner_whitespace() {
        assert_eq!(enc(b"Hello World"), "Hello World");
        assert_eq!(decode(b"Hello World").unwrap(), b"Hello World");
    }

    #[test]
    fn test_qp_escapes() {
        assert_eq!(enc(b"a=b"), "a=3Db");
        assert_eq!(enc("café".as_bytes()), "caf=C3=A9");
        assert_eq!(enc(b"\x00\x7f"), "=00=7F");
    }

    #[test]
    fn test_qp_trailing_whitespace_escaped() {
        assert_eq!(enc(b"end "), "end=20");
        assert_eq!(enc(b"tab\t\nnext"), "tab=09\r\nnext");
    }

    #[test]
    fn test_qp_line_breaks_become_crlf() {
        assert_eq!(enc(b"a\nb\r\nc\rd"), "a\r\nb\r\nc\r\nd");
    }

    #[test]
    fn test_qp_soft_breaks() {
        let input = vec![b'x'; 100];
        let encoded = enc(&input);
        assert_eq!(encoded, format!("{}=\r\n{}", "x".repeat(75), "x".repeat(25)));
        for line in encoded.split("\r\n") {
            assert!(line.len() <= LINE_MAX_LEN);
        }
        assert_eq!(decode(encoded.as_bytes()).unwrap(), input);
    }

    #[test]
    fn test_qp_escape_does_not_straddle_break() {
        let mut input = vec![b'x'; 74];
        input.push(0xff);
        let encoded = enc(&input);
        assert_eq!(encoded, format!("{}=\r\n=FF", "x".repeat(74)));
    }

    #[test]
    fn test_qp_decode_soft_breaks() {
        assert_eq!(decode(b"Hello=\r\nWorld").unwrap(), b"HelloWorld");
        assert_eq!(decode(b"Hello=\nWorld").unwrap(), b"HelloWorld");
        assert_eq!(decode(b"Hello=").unwrap(), b"Hello");
    }

    #[test]
    fn test_qp_decode_strips_transport_padding() {
        assert_eq!(decode(b"a  \r\nb\t\n").unwrap(), b"a\r\nb\n");
    }

    #[test]
    fn test_qp_decode_case_insensitive() {
        assert_eq!(decode(b"=c3=a9").unwrap(), decode(b"=C3=A9").unwrap());
    }

    #[test]
    fn test_qp_decode_stray_equals_passed_through() {
        assert_eq!(decode(b"a=zzb").unwrap(), b"a=zzb");
        assert_eq!(decode(b"a= b").unwrap(), b"a= b");
    }

    #[test]
    fn test_qp_decode_errors() {
        assert!(decode(b"Hello=  \nWorld").is_err());
        assert!(decode(b"foo=\rbar").is_err());
        assert!(decode(b"a\x01b").is_err());
        assert!(decode(b"=").is_err());
    }

    #[test]
    fn test_qp_decode_accepts_high_bytes() {
        assert_eq!(decode(b"caf\xe9").unwrap(), b"caf\xe9");
    }

    #[test]
    fn test_qp_roundtrip() {
        let inputs = [
            b"Hello, World!".to_vec(),
            b"\x00\x01\x02 trailing ".to_vec(),
            (0..=255).filter(|&b| b != b'\r' && b != b'\n').collect::<Vec<u8>>(),
            "naïve résumé\r\nsecond line\t\r\n".as_bytes().to_vec(),
        ];
        for input in inputs {
            let encoded = encode(&input).unwrap();
            assert_eq!(decode(&encoded).unwrap(), input, "roundtrip of {:?}", input);
        }
    }
}
