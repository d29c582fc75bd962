mod cli;
mod commands;
mod io;

use std::ffi::OsString;
use std::process::ExitCode;

use commands::{CommandHandler, TranscodeCommand};
use decoder_ring::{error, Context, Invocation};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let args: Vec<OsString> = std::env::args_os().collect();
    let invocation = Invocation::from_program_name(args.first().map(OsString::as_os_str));
    let ctx = Context::default();

    let cli = match cli::parse(args, ctx.registry) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    match run(&cli, invocation, &ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_usage() => {
            log::debug!("usage error: {:?}", e);
            eprintln!("{}\n", e);
            eprint!("{}", cli::command(ctx.registry).render_help());
            e.exit_code().into()
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code().into()
        }
    }
}

fn run(cli: &cli::Cli, invocation: Invocation, ctx: &Context) -> error::Result<()> {
    let handler = TranscodeCommand {
        mode: cli.mode()?.to_string(),
        direction: cli.direction(invocation),
        options: cli.pipeline_options(),
    };
    handler.execute(ctx)
}
