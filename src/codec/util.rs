/// Decode UTF-8, turning every byte of an invalid sequence into U+FFFD.
///
/// `String::from_utf8_lossy` collapses a maximal invalid subpart into one
/// replacement character; the transforms here count invalid bytes instead.
pub fn chars_lossy(input: &[u8]) -> Vec<char> {
    let mut out = Vec::with_capacity(input.len());
    for chunk in input.utf8_chunks() {
        out.extend(chunk.valid().chars());
        out.extend(std::iter::repeat(char::REPLACEMENT_CHARACTER).take(chunk.invalid().len()));
    }
    out
}

pub fn string_lossy(input: &[u8]) -> String {
    chars_lossy(input).into_iter().collect()
}

/// Line breaks are ignored by the base32 and base64 decoders.
pub fn strip_line_breaks(input: &[u8]) -> Vec<u8> {
    input.iter().copied().filter(|&b| b != b'\r' && b != b'\n').collect()
}

pub fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}
