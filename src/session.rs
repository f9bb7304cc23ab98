//! One player's run through the level sequence.

use chrono::{DateTime, Local};

use crate::{
    grid::LoadError,
    level::Level,
    level_source::LevelSource,
    store::CompletionRecord,
};

/// Progress of a single run.
///
/// A run visits every discovered level once, in order. Levels that fail to load or that the player
/// abandons are skipped; only solved levels count towards the player's total.
#[derive(Debug)]
pub(crate) struct Session {
    /// Name the player entered.
    pub player: String,
    /// Level sources in play order.
    pub levels: Vec<LevelSource>,
    /// Index of the current level in [`levels`](Session::levels).
    pub index: usize,
    /// The level being played, if it loaded.
    pub level: Option<Level>,
    /// Levels solved so far in this run.
    pub solved: u32,
}

impl Session {
    /// Starts a run at the first level. The level itself is built by [`Session::start_level`].
    pub(crate) const fn new(player: String, levels: Vec<LevelSource>) -> Self {
        Self {
            player,
            levels,
            index: 0,
            level: None,
            solved: 0,
        }
    }

    /// Builds a fresh level from the current source, replacing any previous one.
    ///
    /// Returns `Ok(false)` when the run has no level left at the current index, in which case no
    /// level is loaded.
    ///
    /// # Errors
    ///
    /// The [`LoadError`] of a malformed source.
    pub(crate) fn start_level(&mut self) -> Result<bool, LoadError> {
        self.level = None;
        let Some(source) = self.levels.get(self.index) else {
            return Ok(false);
        };
        let level = source.load()?;
        log::info!(
            "{} started level {} ({})",
            self.player,
            self.level_number(),
            source.key
        );
        self.level = Some(level);

        Ok(true)
    }

    /// Moves on to the next level, returning `false` once the sequence is exhausted.
    pub(crate) fn advance(&mut self) -> bool {
        self.level = None;
        self.index = self.index.saturating_add(1);

        self.index < self.levels.len()
    }

    /// One-based number of the current level.
    pub(crate) fn level_number(&self) -> u32 {
        u32::try_from(self.index.saturating_add(1)).unwrap_or(u32::MAX)
    }

    /// Number of levels in the run.
    pub(crate) fn total(&self) -> usize {
        self.levels.len()
    }

    /// Key of the current level source.
    pub(crate) fn level_key(&self) -> Option<&str> {
        self.levels.get(self.index).map(|source| source.key.as_str())
    }

    /// Counts the current level as solved, stops its clock and returns its completion record.
    ///
    /// Returns `None` when no level is loaded or the level is not solved.
    pub(crate) fn complete_level(&mut self, when: DateTime<Local>) -> Option<CompletionRecord> {
        let level_number = self.level_number();
        let level = self.level.as_mut().filter(|level| level.is_solved())?;
        level.finish();
        self.solved = self.solved.saturating_add(1);

        Some(CompletionRecord {
            player: self.player.clone(),
            level: level_number,
            steps: level.steps(),
            elapsed: level.elapsed(),
            completed_at: when,
        })
    }

    /// Abandons the current level if its clock is still running.
    pub(crate) fn abandon_level(&mut self) {
        if let Some(level) = self.level.as_mut().filter(|level| level.is_running()) {
            level.abandon();
            log::info!(
                "{} abandoned level {} after {} steps",
                self.player,
                self.index.saturating_add(1),
                level.steps()
            );
        }
    }
}
