use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    let cli = threadsheet::cli::Cli::parse();
    threadsheet::logging::init(cli.verbose).context("init logging")?;
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        threadsheet::cli::Command::Build(args) => {
            threadsheet::build::run(args).context("build")?;
        }
        threadsheet::cli::Command::Align(args) => {
            threadsheet::build::align(args).context("align")?;
        }
    }

    Ok(())
}
