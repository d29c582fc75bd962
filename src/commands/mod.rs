mod transcode;

use std::io;

use transcode::run_transcode;

use decoder_ring::error::Result;
use decoder_ring::types::{Context, Direction, PipelineOptions};

pub trait CommandHandler {
    fn execute(&self, ctx: &Context) -> Result<()>;
}

/// One stdin to stdout pass through a single mode.
pub struct TranscodeCommand {
    pub mode: String,
    pub direction: Direction,
    pub options: PipelineOptions,
}

impl CommandHandler for TranscodeCommand {
    fn execute(&self, ctx: &Context) -> Result<()> {
        run_transcode(
            ctx,
            &self.mode,
            self.direction,
            self.options,
            io::stdin().lock(),
            io::stdout().lock(),
        )
    }
}
