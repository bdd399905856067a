//! Command line front end for scenario-match.
//!
//! Exit status is `0` when the documents match (or a template resolved),
//! `1` when they differ and `2` when the command could not run.

mod cli;
mod logging;
mod output;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;

use crate::cli::{Cli, Outcome};
use crate::logging::init_logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let mut stdout = io::stdout().lock();
    let mut stdin = io::stdin().lock();
    match cli.run(&mut stdout, &mut stdin) {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::Mismatch) => ExitCode::from(1),
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            // Nothing useful remains to be done if stderr is gone.
            let _ = writeln!(io::stderr(), "error: {err:?}");
            ExitCode::from(2)
        }
    }
}
