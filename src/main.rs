use std::process::ExitCode;

use clap::Parser;
use plotis::app;
use plotis::cli::Cli;

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();
    match app::run(cli, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("{err:?}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
