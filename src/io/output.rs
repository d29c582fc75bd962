use std::io::Write;

use decoder_ring::error::Result;

/// Writes the transformed bytes and an optional trailer in one go, then
/// flushes so write errors surface here rather than at exit.
pub fn write_output<W: Write>(mut writer: W, data: &[u8], trailer: Option<u8>) -> Result<()> {
    writer.write_all(data)?;
    if let Some(b) = trailer {
        writer.write_all(&[b])?;
    }
    writer.flush()?;
    log::debug!("wrote {} bytes of output", data.len() + trailer.map_or(0, |_| 1));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_output_with_trailer() {
        let mut out = Vec::new();
        write_output(&mut out, b"4142", Some(b'\n')).unwrap();
        assert_eq!(out, b"4142\n");
    }

    #[test]
    fn test_write_output_without_trailer() {
        let mut out = Vec::new();
        write_output(&mut out, b"raw", None).unwrap();
        assert_eq!(out, b"raw");
    }
}
