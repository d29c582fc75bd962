use std::io::{Read, Write};

use crate::io::{read_input, write_output};
use decoder_ring::error::Result;
use decoder_ring::types::{Context, Direction, PipelineOptions};

/// Modes whose output already ends the way it should.
const RAW_OUTPUT_MODES: &[&str] = &["hex-extended"];

pub fn run_transcode<R: Read, W: Write>(
    ctx: &Context,
    mode: &str,
    direction: Direction,
    options: PipelineOptions,
    input: R,
    output: W,
) -> Result<()> {
    let transform = ctx.registry.resolve(mode, direction)?;

    let mut data = read_input(input)?;
    if options.strip_newline && data.last() == Some(&b'\n') {
        data.pop();
    }

    let transformed = transform.apply(&data)?;
    log::debug!(
        "{} {}d {} bytes into {} bytes",
        transform.name(),
        direction,
        data.len(),
        transformed.len()
    );

    let emit = options.emit_newline && !RAW_OUTPUT_MODES.contains(&transform.name());
    write_output(output, &transformed, emit.then_some(b'\n'))
}
