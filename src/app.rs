//! Core application state and logic for the puzzle game.

use std::path::PathBuf;

use chrono::Local;
use color_eyre::eyre::Result;
use ratatui::DefaultTerminal;

use crate::{
    config::Config,
    events, file_loader,
    session::Session,
    store::History,
    types::{MainMenuItem, Screen},
    ui,
};

/// Longest player name accepted at the name prompt.
pub(crate) const MAX_NAME_LEN: usize = 24;

/// Application state container for the puzzle game.
///
/// This structure holds the state of the application, which is to say the structure from which
/// Ratatui will render the game and Crossterm events will help writing to.
pub struct App {
    /// Application exit flag.
    ///
    /// This field indicates whether the application should exit. It is set to `true` when the user
    /// wants to quit the game but it starts off `false`.
    pub(crate) exit: bool,
    /// Current screen being displayed to the user.
    ///
    /// This field holds the current screen of the game. It is used to determine which screen to
    /// render and what actions to take based on user input.
    pub(crate) screen: Screen,
    /// Directory scanned for level files when a run starts.
    pub(crate) levels_dir: PathBuf,
    /// Player and level history, loaded at startup and saved after every record.
    pub(crate) history: History,
    /// The run in progress, if any.
    pub(crate) session: Option<Session>,
    /// Name typed so far at the name prompt.
    pub(crate) name_input: String,
    /// Scrolling offset for the history and statistics lists.
    pub(crate) viewport_offset: usize,
    /// Height of the list rendering area during the last redraw.
    pub(crate) viewport_height: usize,
    /// Last storage failure, shown until the next run starts.
    pub(crate) warning: Option<String>,
}

impl App {
    /// Creates the application from the command-line configuration.
    ///
    /// # Errors
    ///
    /// This function returns an error if an existing history file cannot be read.
    pub fn new(config: &Config) -> Result<Self> {
        let history = History::load(&config.data_dir)?;

        Ok(Self::with_history(config.levels_dir.clone(), history))
    }

    /// Creates the application around an already loaded history.
    pub(crate) const fn with_history(levels_dir: PathBuf, history: History) -> Self {
        Self {
            exit: false,
            screen: Screen::MainMenu(MainMenuItem::NewGame),
            levels_dir,
            history,
            session: None,
            name_input: String::new(),
            viewport_offset: 0,
            viewport_height: 0,
            warning: None,
        }
    }

    /// Runs the main loop of the application.
    ///
    /// This function handles user input and updates the application state. The loop continues until
    /// the exit condition is `true`, after which the function returns to the call site.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.exit {
            let _ = terminal.try_draw(|frame| {
                ui::draw(self, frame).map_err(std::io::Error::other)
            })?;
            events::handle_events(self)?;
        }

        Ok(())
    }

    /// Leaves the main menu for the name prompt, or for a notice when no level files exist.
    pub(crate) fn begin_run(&mut self) {
        self.warning = None;

        match file_loader::fetch_levels(&self.levels_dir) {
            Ok(levels) if levels.is_empty() => {
                self.screen = Screen::Notice(format!(
                    "No level files (level*.txt) found in {}",
                    self.levels_dir.display()
                ));
            }
            Ok(levels) => {
                self.name_input.clear();
                self.session = Some(Session::new(String::new(), levels));
                self.screen = Screen::NameEntry;
            }
            Err(err) => {
                log::error!("failed to list levels: {err}");
                self.screen = Screen::Notice(format!(
                    "Cannot read levels from {}: {err}",
                    self.levels_dir.display()
                ));
            }
        }
    }

    /// Confirms the typed player name and starts the first level.
    pub(crate) fn confirm_name(&mut self) {
        let player = crate::store::sanitize_name(&self.name_input);
        if let Some(session) = self.session.as_mut() {
            session.player = player;
        }
        self.enter_level();
    }

    /// Loads the current level of the run and switches to the matching screen.
    ///
    /// A run whose level sequence is already exhausted is finished instead.
    pub(crate) fn enter_level(&mut self) {
        let Some(session) = self.session.as_mut() else {
            self.screen = Screen::MainMenu(MainMenuItem::NewGame);
            return;
        };

        match session.start_level() {
            Ok(true) => self.screen = Screen::InGame,
            Ok(false) => self.finish_run(),
            Err(err) => {
                log::warn!(
                    "level {} ({}) failed to load: {err}",
                    session.level_number(),
                    session.level_key().unwrap_or_default()
                );
                self.screen = Screen::LevelFailed(format!(
                    "Error loading level {}: {err}",
                    session.level_number()
                ));
            }
        }
    }

    /// Saves the solved level and shows the level summary.
    pub(crate) fn complete_level(&mut self) {
        let Some(record) = self
            .session
            .as_mut()
            .and_then(|session| session.complete_level(Local::now()))
        else {
            return;
        };

        if let Err(err) = self.history.record_completion(record) {
            log::error!("failed to save level statistics: {err}");
            self.warning = Some(format!("Could not save level statistics: {err}"));
        }
        self.screen = Screen::LevelComplete;
    }

    /// Continues with the next level, or ends the run after the last one.
    pub(crate) fn next_level(&mut self) {
        let has_next = self.session.as_mut().is_some_and(Session::advance);

        if has_next {
            self.enter_level();
        } else {
            self.finish_run();
        }
    }

    /// Records the player's result and shows the run summary.
    pub(crate) fn finish_run(&mut self) {
        let Some(session) = self.session.as_mut() else {
            self.screen = Screen::MainMenu(MainMenuItem::NewGame);
            return;
        };
        session.abandon_level();
        log::info!(
            "{} finished a run with {} of {} levels solved",
            session.player,
            session.solved,
            session.total()
        );

        if let Err(err) = self
            .history
            .record_player(&session.player, session.solved, Local::now())
        {
            log::error!("failed to save player history: {err}");
            self.warning = Some(format!("Could not save player history: {err}"));
        }
        self.screen = Screen::RunComplete;
    }

    /// Drops the finished run and returns to the main menu.
    pub(crate) fn return_to_menu(&mut self) {
        self.session = None;
        self.viewport_offset = 0;
        self.screen = Screen::MainMenu(MainMenuItem::NewGame);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::grid::Direction;
    use std::fs;

    /// Builds an app whose levels and history live in fresh temporary directories.
    pub(crate) fn test_app(levels: &[(&str, &str)]) -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        for (name, contents) in levels {
            fs::write(dir.path().join(name), contents).expect("failed to write level");
        }
        let history = History::load(&dir.path().join("data")).expect("history should load");

        (App::with_history(dir.path().to_path_buf(), history), dir)
    }

    #[test]
    fn test_begin_run_without_levels() {
        let (mut app, _dir) = test_app(&[]);

        app.begin_run();

        assert!(matches!(app.screen, Screen::Notice(_)));
        assert!(app.session.is_none());
    }

    #[test]
    fn test_full_run_records_history() {
        let (mut app, _dir) = test_app(&[
            ("level1.txt", "11111\n14231\n11111"),
            ("level2.txt", "00\n0"),
            ("level3.txt", "4030"),
        ]);

        app.begin_run();
        assert_eq!(app.screen, Screen::NameEntry);
        app.name_input = "Ada".to_owned();
        app.confirm_name();
        assert_eq!(app.screen, Screen::InGame);

        let level = app
            .session
            .as_mut()
            .and_then(|session| session.level.as_mut())
            .expect("level should be loaded");
        assert!(level.attempt_move(Direction::Right).is_accepted());
        app.complete_level();
        assert_eq!(app.screen, Screen::LevelComplete);
        assert_eq!(app.history.completions().len(), 1);

        app.next_level();
        assert!(matches!(app.screen, Screen::LevelFailed(_)));

        app.next_level();
        assert_eq!(app.screen, Screen::InGame);

        app.next_level();
        assert_eq!(app.screen, Screen::RunComplete);
        let player = app.history.players().first().expect("player should be saved");
        assert_eq!(player.name, "Ada");
        assert_eq!(player.levels_completed, 1);

        app.return_to_menu();
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::NewGame));
        assert!(app.session.is_none());
    }

    #[test]
    fn test_enter_level_past_last_finishes_run() {
        let (mut app, _dir) = test_app(&[("level1.txt", "40")]);
        app.begin_run();
        app.confirm_name();
        if let Some(session) = app.session.as_mut() {
            session.index = 1;
        }

        app.enter_level();

        assert_eq!(app.screen, Screen::RunComplete);
        assert_eq!(app.history.players().len(), 1);
    }

    #[test]
    fn test_anonymous_player() {
        let (mut app, _dir) = test_app(&[("level1.txt", "40")]);

        app.begin_run();
        app.confirm_name();

        let player = app
            .session
            .as_ref()
            .map(|session| session.player.clone());
        assert_eq!(player.as_deref(), Some(crate::store::ANONYMOUS));
    }
}
