use clap::Parser;
use rask_logger::app::{self, Cli};

fn main() -> anyhow::Result<()> {
    if let Err(e) = app::setup_diagnostics() {
        eprintln!("Warning: {e}, continuing without diagnostics");
    }
    app::run(Cli::parse())
}
