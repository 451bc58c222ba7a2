//! pdfforge - PDF toolbox command line.
//!
//! Parses one subcommand into an operation request, submits it to the
//! task runner, and renders progress and the terminal outcome.

use clap::Parser;
use std::process;

use pdfforge::cli::{Cli, Command};
use pdfforge::config::{self, OverwriteMode};
use pdfforge::error::ForgeError;
use pdfforge::inspect;
use pdfforge::output::{OutputFormatter, ProgressBar};
use pdfforge::runner::TaskRunner;

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), ForgeError> {
    let formatter = OutputFormatter::new(cli.quiet, cli.verbose);

    // Inspection is synchronous; everything else goes through the runner.
    if let Command::Info { input, json } = &cli.command {
        let info = inspect::inspect(input).await?;
        if *json {
            println!("{}", info.to_json()?);
        } else {
            for (key, value) in info.summary_lines() {
                println!("{key}: {value}");
            }
        }
        return Ok(());
    }

    let request = cli.to_request()?;

    // Overwrite protection for single-output commands, before any work.
    if let Some(output) = cli.single_output() {
        let mode = if cli.force {
            OverwriteMode::Force
        } else {
            OverwriteMode::Prompt
        };
        config::check_overwrite(output, mode)?;
    }

    formatter.info(&format!("Running {}...", request.name()));

    let mut bar = if cli.quiet || !formatter.should_print() {
        ProgressBar::disabled()
    } else {
        ProgressBar::new()
    };
    bar.set_message(request.name());

    let runner = TaskRunner::new();
    let result = runner.run(request, |percent| bar.update(percent)).await;

    match result {
        Ok(message) => {
            bar.finish();
            formatter.success(&message);
            Ok(())
        }
        Err(err) => {
            bar.clear();
            Err(err)
        }
    }
}
