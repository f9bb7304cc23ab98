//! Discovery of level files in the levels directory.

use std::{fs, path::Path};

use color_eyre::eyre::Result;

use crate::level_source::{LevelSource, LEVEL_EXTENSION};

/// File name prefix shared by every level file.
pub(crate) const LEVEL_PREFIX: &str = "level";

/// Scans `dir` for `level*.txt` files and loads them in file name order.
///
/// Directories and other files are ignored, and so are names that are not valid UTF-8. A level
/// file that cannot be read is skipped with a warning so the rest of the sequence stays playable;
/// its contents are only validated once the level is started. The order compares whole file
/// names, extension included.
///
/// # Errors
///
/// This function returns an error if the directory itself cannot be listed.
pub(crate) fn fetch_levels(dir: &Path) -> Result<Vec<LevelSource>> {
    let mut levels = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }

        let file_name = entry.file_name();
        let Some(name) = file_name.to_str().map(str::to_owned) else {
            log::warn!("skipping file with a non UTF-8 name: {}", entry.path().display());
            continue;
        };
        if !(name.starts_with(LEVEL_PREFIX) && name.ends_with(LEVEL_EXTENSION)) {
            continue;
        }

        match fs::read_to_string(entry.path()) {
            Ok(contents) => levels.push((name, LevelSource::new(file_name, &contents)?)),
            Err(err) => log::warn!("skipping level file {}: {err}", entry.path().display()),
        }
    }

    levels.sort_by(|left, right| left.0.cmp(&right.0));
    log::info!("found {} level files in {}", levels.len(), dir.display());

    Ok(levels.into_iter().map(|(_, level)| level).collect())
}
