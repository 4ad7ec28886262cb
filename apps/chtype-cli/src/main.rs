mod cli;

use std::process::ExitCode;

use clap::Parser;

// Entry point for the CLI application
fn main() -> ExitCode {
    let cli_result = cli::Cli::parse();

    let settings = match cli::settings::read_settings(cli_result.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to read settings: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = cli::logger::setup_logging(&settings.logger, cli_result.debug) {
        eprintln!("{e}");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli::top_command_handler(&settings, &cli_result.command, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::from(1)
        }
    }
}
