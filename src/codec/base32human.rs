use data_encoding::Encoding;
use std::sync::OnceLock;

use super::base32::{decode_with, make_encoding};

const CROCKFORD_ALPHABET: &str = "0123456789ABCDEFGHJKMNPQRSTVWXYZ";

static CROCKFORD_ENCODING: OnceLock<Encoding> = OnceLock::new();

fn get_crockford() -> &'static Encoding {
    CROCKFORD_ENCODING.get_or_init(|| make_encoding(CROCKFORD_ALPHABET))
}

/// Uppercase, fold the confusables onto their digits, drop every `-`, and
/// restore any missing padding.
fn normalize(input: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = input
        .iter()
        .filter(|&&b| b != b'-')
        .map(|b| match b.to_ascii_uppercase() {
            b'I' | b'L' => b'1',
            b'O' => b'0',
            other => other,
        })
        .collect();

    let symbols = out.iter().filter(|&&b| b != b'\r' && b != b'\n').count();
    if !out.contains(&b'=') && symbols % 8 != 0 {
        out.resize(out.len() + 8 - symbols % 8, b'=');
    }
    out
}

pub fn encode(input: &[u8]) -> crate::error::Result<Vec<u8>> {
    Ok(get_crockford().encode(input).into_bytes())
}

/// Unpadded input is padded before decoding, so `ZW` and `ZW======` are the
/// same value. A strictly padded decoder would reject the short form.
pub fn decode(input: &[u8]) -> crate::error::Result<Vec<u8>> {
    decode_with(get_crockford(), &normalize(input))
}
