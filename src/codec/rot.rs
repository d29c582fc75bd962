use crate::error::Result;

/// ROT13 over ASCII letters; every other byte passes through. Self-inverse.
pub fn rot13(input: &[u8]) -> Result<Vec<u8>> {
    Ok(input
        .iter()
        .map(|&b| match b {
            b'A'..=b'Z' => ((b - b'A') + 13) % 26 + b'A',
            b'a'..=b'z' => ((b - b'a') + 13) % 26 + b'a',
            _ => b,
        })
        .collect())
}
