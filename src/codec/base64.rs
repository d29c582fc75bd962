use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::{DecodeError, Engine};

use super::util;
use crate::error::{LengthConstraint, RingError, Result};

/// Padding is emitted and required; non-zero trailing bits are tolerated.
const PADDED_LENIENT_BITS: GeneralPurposeConfig = GeneralPurposeConfig::new()
    .with_encode_padding(true)
    .with_decode_padding_mode(DecodePaddingMode::RequireCanonical)
    .with_decode_allow_trailing_bits(true);

const STANDARD: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, PADDED_LENIENT_BITS);
const URL_SAFE: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, PADDED_LENIENT_BITS);

fn map_decode_error(input: &[u8], e: DecodeError) -> RingError {
    match e {
        DecodeError::InvalidByte(position, byte) => RingError::invalid_byte(byte, position),
        DecodeError::InvalidLastSymbol(position, byte) => RingError::invalid_byte(byte, position),
        DecodeError::InvalidLength(_) => {
            RingError::invalid_length(LengthConstraint::MultipleOf(4), input.len())
        }
        DecodeError::InvalidPadding => RingError::invalid_input("invalid base64 padding"),
    }
}

fn decode_with(engine: &GeneralPurpose, input: &[u8]) -> Result<Vec<u8>> {
    let cleaned = util::strip_line_breaks(input);
    engine
        .decode(&cleaned)
        .map_err(|e| map_decode_error(&cleaned, e))
}

pub fn encode_std(input: &[u8]) -> Result<Vec<u8>> {
    Ok(STANDARD.encode(input).into_bytes())
}

pub fn decode_std(input: &[u8]) -> Result<Vec<u8>> {
    decode_with(&STANDARD, input)
}

pub fn encode_url(input: &[u8]) -> Result<Vec<u8>> {
    Ok(URL_SAFE.encode(input).into_bytes())
}

pub fn decode_url(input: &[u8]) -> Result<Vec<u8>> {
    decode_with(&URL_SAFE, input)
}
