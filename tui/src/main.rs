//! flint-dash: live dashboard for a training process's metric reporter.
//!
//! Usage: `flint-dash [--plain] [config.json]`

use anyhow::Result;

mod app;
mod state;
mod ui;

fn main() -> Result<()> {
    let args = app::Args::parse(std::env::args().skip(1))?;
    if args.plain {
        app::plain::run(&args)
    } else {
        app::run::run(&args)
    }
}
