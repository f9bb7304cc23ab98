//! Raw level sources discovered on disk.
//!
//! This module contains the `LevelSource` struct, which pairs the display key of a level file with
//! its rows as read from disk. Sources are only turned into playable levels when the level starts,
//! so a malformed file is reported when the player reaches it rather than when it is discovered.

use std::ffi::OsString;

use color_eyre::eyre::{OptionExt as _, Result};

use crate::{
    grid::{Grid, LoadError},
    level::Level,
};

/// Extension shared by every level file.
pub(crate) const LEVEL_EXTENSION: &str = ".txt";
/// Byte-order mark some editors write at the start of text files.
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Level file contents indexed by file name.
///
/// This structure represents the custom type employed for indexing into files and retrieving the
/// rows of a level. It is used within a vector to get an ordered sequence of levels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LevelSource {
    /// File name without the `.txt` extension.
    pub key: String,
    /// Level rows as read from the file.
    pub data: Vec<String>,
}

impl LevelSource {
    /// Builds a level source from a file name and its multiline contents.
    ///
    /// This function splits the contents into rows, dropping a leading byte-order mark, and
    /// extracts the display key by removing the ".txt" extension from the file name.
    ///
    /// # Errors
    ///
    /// This function may return errors if:
    /// - The `OsString` cannot be converted to a string slice
    /// - The file name doesn't end in the ".txt" extension
    pub(crate) fn new(key: OsString, data: &str) -> Result<Self> {
        let file_name = key
            .to_str()
            .ok_or_eyre("failed to convert osstring to string slice")?;
        let key = file_name
            .strip_suffix(LEVEL_EXTENSION)
            .ok_or_eyre("failed to find extension in file name")?
            .to_owned();

        let data = data.strip_prefix(BYTE_ORDER_MARK).unwrap_or(data);

        Ok(Self {
            key,
            data: data.lines().map(str::to_owned).collect(),
        })
    }

    /// Parses the rows into a fresh level with its clock started.
    ///
    /// # Errors
    ///
    /// Any [`LoadError`] raised by the grid parser or by hero placement.
    pub(crate) fn load(&self) -> Result<Level, LoadError> {
        Level::new(Grid::parse(&self.data)?)
    }
}
