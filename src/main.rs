mod args;
mod cli;
mod module;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use output::{Invocation, ModuleOutput};
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity; stdout is reserved for the result
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();

    let overrides = module::Overrides {
        check_mode: cli.check,
        executable: cli.executable,
    };

    let output = match args::read_input(cli.args_file.as_deref()) {
        Ok(input) => module::run(&input, &overrides),
        Err(e) => {
            log::error!("{e:#}");
            ModuleOutput::failure(format!("{e:#}"), 1, Invocation::default())
        }
    };

    output.write_to(&mut io::stdout().lock())?;
    std::process::exit(output.exit_code());
}
