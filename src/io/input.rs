use std::io::Read;

use decoder_ring::error::Result;

/// Slurps the whole source; transforms never see partial input.
pub fn read_input<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    log::debug!("read {} bytes of input", buf.len());
    Ok(buf)
}
