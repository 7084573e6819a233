//! CLI entrypoint for `cargo-optbuilder`.

use std::io::{self, Write};
use std::process::ExitCode;

use cargo_optbuilder::{CargoCli, Outcome};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();
    let CargoCli::Optbuilder(args) = CargoCli::parse();
    let status = match cargo_optbuilder::run(&args) {
        Ok(outcome) => report(&outcome).map(|()| {
            if outcome.has_errors() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }),
        Err(err) => writeln!(io::stderr(), "error: {err}").map(|()| ExitCode::FAILURE),
    };
    status.unwrap_or(ExitCode::FAILURE)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn report(outcome: &Outcome) -> io::Result<()> {
    let mut stderr = io::stderr().lock();
    for diagnostic in &outcome.diagnostics {
        writeln!(stderr, "{diagnostic}")?;
    }
    for path in &outcome.written {
        tracing::info!(%path, "wrote builder");
    }
    Ok(())
}
