//! Type definitions and enums for the application state and navigation.

use crate::grid::Direction;

/// Enumeration of available application screens.
///
/// This enumeration holds information about the current screen of the game. This is used to
/// determine which screen to render and what actions to take based on user input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Screen {
    /// Main menu screen of the game.
    MainMenu(MainMenuItem),
    /// Player name prompt shown before a run starts.
    NameEntry,
    /// In-game screen where the current level is played.
    InGame,
    /// Summary shown after a level has been solved.
    LevelComplete,
    /// Report shown when the current level file could not be loaded.
    ///
    /// The variant holds the error message presented to the player.
    LevelFailed(String),
    /// Summary shown after the last level of a run.
    RunComplete,
    /// Scrollable list of player records.
    PlayerHistory,
    /// Scrollable list of level completion records.
    LevelStats,
    /// Message screen dismissed with any key.
    Notice(String),
}

/// Main menu navigation options.
///
/// This enumeration holds the different items in the main menu. It is used to determine which items
/// can the user select in the main menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MainMenuItem {
    /// "New Game" menu option.
    NewGame,
    /// "Player History" menu option.
    PlayerHistory,
    /// "Level Stats" menu option.
    LevelStats,
    /// "Quit" menu option.
    Quit,
}

impl MainMenuItem {
    /// Every menu item, top to bottom.
    pub(crate) const ALL: [Self; 4] = [
        Self::NewGame,
        Self::PlayerHistory,
        Self::LevelStats,
        Self::Quit,
    ];

    /// Returns the label rendered for the menu item.
    pub(crate) const fn repr(self) -> &'static str {
        match self {
            Self::NewGame => "New Game",
            Self::PlayerHistory => "Player History",
            Self::LevelStats => "Level Stats",
            Self::Quit => "Quit",
        }
    }

    /// Returns the item below this one, staying put at the bottom.
    pub(crate) const fn next(self) -> Self {
        match self {
            Self::NewGame => Self::PlayerHistory,
            Self::PlayerHistory => Self::LevelStats,
            Self::LevelStats | Self::Quit => Self::Quit,
        }
    }

    /// Returns the item above this one, staying put at the top.
    pub(crate) const fn previous(self) -> Self {
        match self {
            Self::NewGame | Self::PlayerHistory => Self::NewGame,
            Self::LevelStats => Self::PlayerHistory,
            Self::Quit => Self::LevelStats,
        }
    }
}

/// Commands the player can issue while a level is in play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// Move the hero one step.
    Move(Direction),
    /// Give up the current level and continue with the next one.
    Abandon,
    /// End the whole run and return to the main menu.
    EndRun,
}
