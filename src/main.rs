use clap::Parser;
use dirsort::cli::{Cli, run};
use dirsort::logging::Logger;
use dirsort::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let logger = Logger::new(&cli.log_config());

    // Fatal errors are already logged by `run`.
    match run(&cli, &logger) {
        Ok(report) => {
            OutputFormatter::report(&report);
            ExitCode::SUCCESS
        }
        Err(_) => ExitCode::FAILURE,
    }
}
