//! Flat-file history of players and completed levels.
//!
//! Records are stored one per line as `|`-separated fields. The history is an ordinary value owned
//! by the caller; nothing here is global. Loading tolerates missing files and skips malformed
//! lines.

use std::{
    fmt, fs,
    num::ParseIntError,
    path::{Path, PathBuf},
    str::{self, FromStr},
    time::Duration,
};

use chrono::{DateTime, Local};
use color_eyre::eyre::Result;
use thiserror::Error;

/// File holding one [`PlayerRecord`] per line.
pub(crate) const PLAYER_HISTORY_FILE: &str = "player_history.txt";
/// File holding one [`CompletionRecord`] per line.
pub(crate) const LEVEL_STATS_FILE: &str = "stats_level.txt";
/// Field separator within a record line.
const SEPARATOR: char = '|';
/// Name recorded for players who did not enter one.
pub(crate) const ANONYMOUS: &str = "Anonymous";

/// Reasons a stored line cannot be read back as a record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The line has fewer fields than the record needs.
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    /// A numeric field does not hold an unsigned integer.
    #[error("field `{field}` is not a number: {source}")]
    InvalidNumber {
        /// Name of the field.
        field: &'static str,
        /// Underlying parse failure.
        source: ParseIntError,
    },
    /// A timestamp field is not RFC 3339.
    #[error("field `{field}` is not a timestamp: {source}")]
    InvalidTimestamp {
        /// Name of the field.
        field: &'static str,
        /// Underlying parse failure.
        source: chrono::ParseError,
    },
}

/// One solved level, as shown in the level statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionRecord {
    /// Name of the player who solved the level.
    pub player: String,
    /// One-based position of the level in the sequence.
    pub level: u32,
    /// Accepted moves used.
    pub steps: u32,
    /// Time spent on the level.
    pub elapsed: Duration,
    /// When the level was solved.
    pub completed_at: DateTime<Local>,
}

/// Best result and last visit of one player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerRecord {
    /// Player name; compared case-insensitively.
    pub name: String,
    /// Highest number of levels solved in a single run.
    pub levels_completed: u32,
    /// When the player last finished a run.
    pub last_played: DateTime<Local>,
}

impl fmt::Display for CompletionRecord {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
            self.player,
            self.level,
            self.steps,
            self.elapsed.as_millis(),
            self.completed_at.to_rfc3339()
        )
    }
}

impl FromStr for CompletionRecord {
    type Err = RecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.split(SEPARATOR);

        Ok(Self {
            player: field(&mut fields, "player")?.to_owned(),
            level: number(field(&mut fields, "level")?, "level")?,
            steps: number(field(&mut fields, "steps")?, "steps")?,
            elapsed: Duration::from_millis(number(field(&mut fields, "elapsed")?, "elapsed")?),
            completed_at: timestamp(field(&mut fields, "completed_at")?, "completed_at")?,
        })
    }
}

impl fmt::Display for PlayerRecord {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.name,
            self.levels_completed,
            self.last_played.to_rfc3339()
        )
    }
}

impl FromStr for PlayerRecord {
    type Err = RecordError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.split(SEPARATOR);

        Ok(Self {
            name: field(&mut fields, "name")?.to_owned(),
            levels_completed: number(
                field(&mut fields, "levels_completed")?,
                "levels_completed",
            )?,
            last_played: timestamp(field(&mut fields, "last_played")?, "last_played")?,
        })
    }
}

/// Takes the next field of a record line.
fn field<'line, I>(fields: &mut I, name: &'static str) -> Result<&'line str, RecordError>
where
    I: Iterator<Item = &'line str>,
{
    fields.next().ok_or(RecordError::MissingField(name))
}

/// Parses an unsigned integer field.
fn number<T: FromStr<Err = ParseIntError>>(
    value: &str,
    field: &'static str,
) -> Result<T, RecordError> {
    value
        .trim()
        .parse()
        .map_err(|source| RecordError::InvalidNumber { field, source })
}

/// Parses an RFC 3339 timestamp field into local time.
fn timestamp(value: &str, field: &'static str) -> Result<DateTime<Local>, RecordError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|parsed| parsed.with_timezone(&Local))
        .map_err(|source| RecordError::InvalidTimestamp { field, source })
}

/// Makes a typed player name safe to store.
///
/// Surrounding whitespace is trimmed, separators and control characters become `_`, and an empty
/// name becomes [`ANONYMOUS`].
pub(crate) fn sanitize_name(raw: &str) -> String {
    let name: String = raw
        .trim()
        .chars()
        .map(|character| {
            if character == SEPARATOR || character.is_control() {
                '_'
            } else {
                character
            }
        })
        .collect();

    if name.is_empty() {
        ANONYMOUS.to_owned()
    } else {
        name
    }
}

/// Player and level history backed by two files in a data directory.
#[derive(Debug)]
pub struct History {
    /// Directory holding both history files.
    dir: PathBuf,
    /// Known players, in the order they first appeared.
    players: Vec<PlayerRecord>,
    /// Completed levels, oldest first.
    completions: Vec<CompletionRecord>,
}

impl History {
    /// Loads the history stored in `dir`.
    ///
    /// Missing files yield an empty history and malformed lines are skipped with a warning.
    ///
    /// # Errors
    ///
    /// This function returns an error if an existing history file cannot be read.
    pub fn load(dir: &Path) -> Result<Self> {
        let players = read_records(&dir.join(PLAYER_HISTORY_FILE))?;
        let completions = read_records(&dir.join(LEVEL_STATS_FILE))?;
        log::info!(
            "loaded {} players and {} level completions from {}",
            players.len(),
            completions.len(),
            dir.display()
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            players,
            completions,
        })
    }

    /// Known players.
    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    /// Completed levels, oldest first.
    pub fn completions(&self) -> &[CompletionRecord] {
        &self.completions
    }

    /// Adds a completed level and rewrites the level statistics file.
    ///
    /// # Errors
    ///
    /// This function returns an error if the statistics file cannot be written. The record is
    /// kept in memory regardless.
    pub fn record_completion(&mut self, mut record: CompletionRecord) -> Result<()> {
        record.player = sanitize_name(&record.player);
        log::info!(
            "{} solved level {} in {} steps",
            record.player,
            record.level,
            record.steps
        );
        self.completions.push(record);

        write_records(&self.dir, LEVEL_STATS_FILE, &self.completions)
    }

    /// Records the end of a run and rewrites the player history file.
    ///
    /// A player already known under any letter case keeps the higher of the stored and the new
    /// levels-completed count; the last-played time is always refreshed.
    ///
    /// # Errors
    ///
    /// This function returns an error if the player history file cannot be written. The update
    /// is kept in memory regardless.
    pub fn record_player(
        &mut self,
        name: &str,
        levels_completed: u32,
        when: DateTime<Local>,
    ) -> Result<()> {
        let name = sanitize_name(name);
        let key = name.to_lowercase();

        if let Some(existing) = self
            .players
            .iter_mut()
            .find(|player| player.name.to_lowercase() == key)
        {
            existing.levels_completed = existing.levels_completed.max(levels_completed);
            existing.last_played = when;
        } else {
            self.players.push(PlayerRecord {
                name,
                levels_completed,
                last_played: when,
            });
        }

        write_records(&self.dir, PLAYER_HISTORY_FILE, &self.players)
    }
}

/// Reads one record per non-blank line, skipping lines that do not parse.
///
/// Lines are decoded one at a time, so a line holding invalid UTF-8 is skipped like any other
/// malformed record instead of failing the whole file.
fn read_records<T>(path: &Path) -> Result<Vec<T>>
where
    T: FromStr<Err = RecordError>,
{
    if !path.exists() {
        return Ok(Vec::new());
    }

    let contents = fs::read(path)?;
    let mut records = Vec::new();
    for (index, bytes) in contents.split(|byte| *byte == b'\n').enumerate() {
        let Ok(line) = str::from_utf8(bytes) else {
            log::warn!("{}:{}: skipping record: invalid UTF-8", path.display(), index + 1);
            continue;
        };
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }
        match line.parse() {
            Ok(record) => records.push(record),
            Err(err) => log::warn!("{}:{}: skipping record: {err}", path.display(), index + 1),
        }
    }

    Ok(records)
}

/// Rewrites a history file with every record, one per line.
fn write_records<T: fmt::Display>(dir: &Path, file: &str, records: &[T]) -> Result<()> {
    fs::create_dir_all(dir)?;

    let mut contents = String::new();
    for record in records {
        contents.push_str(&record.to_string());
        contents.push('\n');
    }
    fs::write(dir.join(file), contents)?;

    Ok(())
}
