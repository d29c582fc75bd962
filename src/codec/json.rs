use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;

use super::util;
use crate::error::Result;

/// Compact formatter that additionally escapes the characters browsers treat
/// specially inside `<script>` blocks.
struct HtmlSafeFormatter;

impl Formatter for HtmlSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            let escaped = match c {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..i].as_bytes())?;
            writer.write_all(escaped.as_bytes())?;
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

fn quote_fragment(fragment: &str, out: &mut Vec<u8>) -> Result<()> {
    let mut quoted = Vec::with_capacity(fragment.len() + 2);
    let mut serializer = serde_json::Serializer::with_formatter(&mut quoted, HtmlSafeFormatter);
    fragment.serialize(&mut serializer)?;
    out.extend_from_slice(&quoted[1..quoted.len() - 1]);
    Ok(())
}

/// Each invalid UTF-8 byte becomes the escape `\ufffd`.
pub fn encode(input: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len() + 2);
    out.push(b'"');
    for chunk in input.utf8_chunks() {
        quote_fragment(chunk.valid(), &mut out)?;
        for _ in chunk.invalid() {
            out.extend_from_slice(b"\\ufffd");
        }
    }
    out.push(b'"');
    Ok(out)
}

/// Input that does not start with a quote is taken as the body of a string.
pub fn wrap_bare(input: &[u8]) -> Vec<u8> {
    match input.first() {
        Some(b'"') | None => input.to_vec(),
        Some(_) => {
            let mut wrapped = Vec::with_capacity(input.len() + 2);
            wrapped.push(b'"');
            wrapped.extend_from_slice(input);
            wrapped.push(b'"');
            wrapped
        }
    }
}

pub fn decode(input: &[u8]) -> Result<Vec<u8>> {
    let text = util::string_lossy(&wrap_bare(input));
    let value: String = serde_json::from_str(&text)?;
    Ok(value.into_bytes())
}
