use std::process::ExitCode;

use clap::Parser;
use storyboard_frames::config::{RunConfig, setup_logging};

fn main() -> ExitCode {
    let cli = storyboard_frames::cli::CliOptions::parse();

    let _ = setup_logging(cli.debug);

    let config = RunConfig::from_cli(cli);
    let mut stdout = std::io::stdout().lock();

    match storyboard_frames::runner::run(&config, &mut stdout) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
