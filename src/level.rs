//! Level state engine.
//!
//! A [`Level`] owns the live grid of one level together with the denormalized hero position, the
//! step counter and the level clock. Move resolution keeps two facts apart on every cell: the
//! floor type never changes, only occupants travel between cells.

use std::time::{Duration, Instant};

use crate::{
    cell::{Cell, Occupant},
    grid::{Direction, Grid, LoadError, Position},
};

/// Result of asking the hero to move one step.
///
/// This enumeration tells the caller whether the move counted as a step and, if so, whether a box
/// was pushed along the way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The hero stepped onto a vacant cell.
    Walked,
    /// The hero pushed a box one cell and stepped into its place.
    Pushed,
    /// Nothing changed: a wall, the grid edge or a blocked box was in the way.
    Rejected,
}

impl MoveOutcome {
    /// Whether the move changed the grid and counted as a step.
    pub const fn is_accepted(self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

/// Monotonic clock that can be frozen once.
///
/// This structure measures the time spent on a level. It starts running when the level is built
/// and keeps its first reading once stopped, whether the level was solved or abandoned.
#[derive(Clone, Copy, Debug)]
pub struct Stopwatch {
    /// Instant the clock started.
    started: Instant,
    /// Elapsed time captured when the clock was stopped.
    stopped: Option<Duration>,
}

impl Stopwatch {
    /// Starts a new clock now.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            stopped: None,
        }
    }

    /// Freezes the clock. Stopping an already stopped clock keeps the first reading.
    pub fn stop(&mut self) {
        if self.stopped.is_none() {
            self.stopped = Some(self.started.elapsed());
        }
    }

    /// Whether the clock is still running.
    pub const fn is_running(&self) -> bool {
        self.stopped.is_none()
    }

    /// Time since the start, or the frozen reading once stopped.
    pub fn elapsed(&self) -> Duration {
        self.stopped.unwrap_or_else(|| self.started.elapsed())
    }
}

/// Live state of the level being played.
///
/// This structure owns the grid of one level together with the hero position, the step counter and
/// the level clock. A new one is built every time a level starts, so nothing carries over between
/// attempts.
#[derive(Clone, Debug)]
pub struct Level {
    /// The grid, mutated only through move resolution.
    ///
    /// This field holds the cells as they currently stand, with occupants moved by every accepted
    /// step.
    grid: Grid,
    /// Position of the single hero cell.
    ///
    /// This field mirrors the location of the hero in the grid so that moves need not search for
    /// it; it is updated together with the grid on every accepted step.
    hero: Position,
    /// Number of accepted moves.
    steps: u32,
    /// Clock started when the level was built.
    clock: Stopwatch,
}

impl Level {
    /// Builds a level from a loaded grid, locating the hero and starting the clock.
    ///
    /// This function scans the grid in row-major order and requires exactly one hero cell. The
    /// step counter starts at zero.
    ///
    /// # Errors
    ///
    /// - [`LoadError::MissingHero`] when no cell holds the hero.
    /// - [`LoadError::ExtraHero`] when a second cell holds the hero.
    pub fn new(grid: Grid) -> Result<Self, LoadError> {
        let hero = locate_hero(&grid)?;

        Ok(Self {
            grid,
            hero,
            steps: 0,
            clock: Stopwatch::start(),
        })
    }

    /// Attempts to move the hero one step, pushing a box if one is in the way.
    ///
    /// This function rejects steps off the grid and into walls. A box is pushed only when the cell
    /// behind it is on the grid and vacant, goal or not; otherwise the whole move is rejected.
    ///
    /// A rejected move leaves every cell, the step counter and the clock untouched. An accepted
    /// move that solves the level stops the clock.
    pub fn attempt_move(&mut self, direction: Direction) -> MoveOutcome {
        let Some(target) = self.grid.step(self.hero, direction) else {
            log::trace!("rejected {direction:?}: grid edge");
            return MoveOutcome::Rejected;
        };
        let Some(target_cell) = self.grid.get(target) else {
            return MoveOutcome::Rejected;
        };
        if target_cell.is_wall() {
            log::trace!("rejected {direction:?}: wall at {target:?}");
            return MoveOutcome::Rejected;
        }

        let outcome = if target_cell.has_box() {
            let Some(box_target) = self.grid.step(target, direction) else {
                log::trace!("rejected {direction:?}: box at {target:?} against grid edge");
                return MoveOutcome::Rejected;
            };
            if !self.grid.get(box_target).is_some_and(Cell::is_vacant) {
                log::trace!("rejected {direction:?}: box at {target:?} blocked");
                return MoveOutcome::Rejected;
            }

            self.relocate(target, box_target, Occupant::Box);
            MoveOutcome::Pushed
        } else {
            MoveOutcome::Walked
        };

        self.relocate(self.hero, target, Occupant::Hero);
        self.hero = target;
        self.steps = self.steps.saturating_add(1);

        if self.is_solved() {
            self.clock.stop();
        }
        log::debug!("{outcome:?} {direction:?} to {target:?}, step {}", self.steps);

        outcome
    }

    /// Whether no uncovered goal remains.
    ///
    /// Only bare goals count against a solution; a hero standing on a goal covers it as much as a
    /// box does.
    pub fn is_solved(&self) -> bool {
        !self.grid.cells().any(|(_, cell)| cell.is_bare_goal())
    }

    /// Stops the clock without the level being solved.
    pub fn abandon(&mut self) {
        self.clock.stop();
    }

    /// Stops the clock after the level has been solved.
    pub fn finish(&mut self) {
        self.clock.stop();
    }

    /// Current hero position.
    pub const fn hero(&self) -> Position {
        self.hero
    }

    /// Number of accepted moves so far.
    pub const fn steps(&self) -> u32 {
        self.steps
    }

    /// Time spent on the level.
    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    /// Whether the level clock is still running.
    pub const fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Read-only view of the grid.
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of grid columns.
    pub const fn width(&self) -> usize {
        self.grid.width()
    }

    /// Number of grid rows.
    pub const fn height(&self) -> usize {
        self.grid.height()
    }

    /// Cell at `position`, or `None` outside the grid.
    pub fn cell(&self, position: Position) -> Option<Cell> {
        self.grid.get(position)
    }

    /// Moves `occupant` from one cell to another, leaving both floor types as they were.
    fn relocate(&mut self, from: Position, to: Position, occupant: Occupant) {
        if let Some(cell) = self.grid.get(from) {
            self.grid.set(from, cell.with_occupant(Occupant::Vacant));
        }
        if let Some(cell) = self.grid.get(to) {
            self.grid.set(to, cell.with_occupant(occupant));
        }
    }
}

/// Finds the single hero cell, scanning in row-major order.
fn locate_hero(grid: &Grid) -> Result<Position, LoadError> {
    let mut heroes = grid
        .cells()
        .filter(|(_, cell)| cell.has_hero())
        .map(|(position, _)| position);

    let hero = heroes.next().ok_or(LoadError::MissingHero)?;
    if let Some(extra) = heroes.next() {
        return Err(LoadError::ExtraHero {
            row: extra.y,
            column: extra.x,
        });
    }

    Ok(hero)
}
