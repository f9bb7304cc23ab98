//! This crate contains the source code for the binary for the game sokotuine.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]
#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use clap::Parser as _;
use color_eyre::{eyre::Result, install};
use sokotuine::{init_logging, App, Config};

fn main() -> Result<()> {
    install()?;

    let config = Config::parse();
    init_logging(&config.log_file)?;
    let mut app = App::new(&config)?;

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    result
}
