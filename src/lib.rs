//! This crate contains the library behind the box-pushing puzzle game sokotuine.
//!
//! Levels are plain text grids of digits read from `level*.txt` files. The [`Grid`] and [`Level`]
//! types hold the puzzle rules and can be driven without a terminal, while
//! [`App`] wraps them in a Ratatui interface with a main menu, player history and level
//! statistics persisted to flat files.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

mod app;
mod cell;
mod config;
mod events;
mod file_loader;
mod grid;
mod level;
mod level_source;
mod logging;
mod session;
mod store;
mod types;
mod ui;

pub use app::App;
pub use cell::{Cell, Floor, Occupant};
pub use config::Config;
pub use grid::{Direction, Grid, LoadError, Position};
pub use level::{Level, MoveOutcome, Stopwatch};
pub use logging::{init as init_logging, LOG_ENV};
pub use store::{CompletionRecord, History, PlayerRecord, RecordError};
