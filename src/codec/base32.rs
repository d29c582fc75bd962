use data_encoding::{DecodeError, DecodeKind, Encoding, Specification};
use std::sync::OnceLock;

use super::util;
use crate::error::{LengthConstraint, RingError, Result};

const RFC4648_UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const HEX_UPPER: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUV";

/// Padded encoding over `alphabet`. Trailing bits are not checked on decode.
pub(crate) fn make_encoding(alphabet: &str) -> Encoding {
    let mut spec = Specification::new();
    spec.symbols.push_str(alphabet);
    spec.padding = Some('=');
    spec.check_trailing_bits = false;
    spec.encoding()
        .unwrap_or_else(|e| panic!("invalid base32 alphabet {:?}: {}", alphabet, e))
}

static BASE32_STD: OnceLock<Encoding> = OnceLock::new();
static BASE32_HEX: OnceLock<Encoding> = OnceLock::new();

fn get_base32_std() -> &'static Encoding {
    BASE32_STD.get_or_init(|| make_encoding(RFC4648_UPPER))
}
fn get_base32_hex() -> &'static Encoding {
    BASE32_HEX.get_or_init(|| make_encoding(HEX_UPPER))
}

pub(crate) fn map_decode_error(input: &[u8], e: DecodeError) -> RingError {
    match e.kind {
        DecodeKind::Symbol | DecodeKind::Padding | DecodeKind::Trailing => input
            .get(e.position)
            .map(|&b| RingError::invalid_byte(b, e.position))
            .unwrap_or_else(|| RingError::invalid_input(e.to_string())),
        DecodeKind::Length => RingError::invalid_length(LengthConstraint::MultipleOf(8), input.len()),
        _ => RingError::invalid_input(e.to_string()),
    }
}

pub(crate) fn decode_with(enc: &Encoding, input: &[u8]) -> Result<Vec<u8>> {
    let cleaned = util::strip_line_breaks(input);
    enc.decode(&cleaned).map_err(|e| map_decode_error(&cleaned, e))
}

pub fn encode_std(input: &[u8]) -> Result<Vec<u8>> {
    Ok(get_base32_std().encode(input).into_bytes())
}

pub fn decode_std(input: &[u8]) -> Result<Vec<u8>> {
    decode_with(get_base32_std(), input)
}

pub fn encode_hex(input: &[u8]) -> Result<Vec<u8>> {
    Ok(get_base32_hex().encode(input).into_bytes())
}

pub fn decode_hex(input: &[u8]) -> Result<Vec<u8>> {
    decode_with(get_base32_hex(), input)
}
