//! Event handling functions for user input and application state updates.

use std::time::Duration;

use color_eyre::eyre::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::{
    app::MAX_NAME_LEN,
    grid::Direction,
    types::{Command, MainMenuItem, Screen},
    App,
};

/// Handles input events and updates the application state accordingly.
///
/// This function polls for keyboard events and dispatches them to the handler of the current
/// screen. It uses a timeout to avoid blocking the UI, which also keeps the level clock ticking on
/// screen while no key is pressed.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    if event::poll(Duration::from_millis(100))? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(app, key.code);
            }
        }
    }

    Ok(())
}

/// Dispatches a single key press based on the current screen.
pub(crate) fn handle_key(app: &mut App, code: KeyCode) {
    match app.screen {
        Screen::MainMenu(item) => handle_main_menu(app, item, code),
        Screen::NameEntry => handle_name_entry(app, code),
        Screen::InGame => handle_in_game(app, code),
        Screen::LevelComplete | Screen::LevelFailed(_) => app.next_level(),
        Screen::RunComplete | Screen::Notice(_) => app.return_to_menu(),
        Screen::PlayerHistory | Screen::LevelStats => handle_list(app, code),
    }
}

/// Maps a key to an in-game command.
///
/// Arrow keys and `h`/`j`/`k`/`l` move the hero, Esc abandons the level and `q` ends the run.
pub(crate) const fn command_for(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(Command::Move(Direction::Up)),
        KeyCode::Down | KeyCode::Char('j') => Some(Command::Move(Direction::Down)),
        KeyCode::Left | KeyCode::Char('h') => Some(Command::Move(Direction::Left)),
        KeyCode::Right | KeyCode::Char('l') => Some(Command::Move(Direction::Right)),
        KeyCode::Esc => Some(Command::Abandon),
        KeyCode::Char('q') => Some(Command::EndRun),
        _ => None,
    }
}

/// Handles key presses on the main menu.
///
/// `j`/`k` and the arrow keys move the cursor, `l` or Enter selects the highlighted item and `q`
/// quits the application.
pub(crate) fn handle_main_menu(app: &mut App, item: MainMenuItem, code: KeyCode) {
    match code {
        KeyCode::Char('j') | KeyCode::Down => app.screen = Screen::MainMenu(item.next()),
        KeyCode::Char('k') | KeyCode::Up => app.screen = Screen::MainMenu(item.previous()),
        KeyCode::Char('l') | KeyCode::Enter => match item {
            MainMenuItem::NewGame => app.begin_run(),
            MainMenuItem::PlayerHistory => {
                app.viewport_offset = 0;
                app.screen = Screen::PlayerHistory;
            }
            MainMenuItem::LevelStats => {
                app.viewport_offset = 0;
                app.screen = Screen::LevelStats;
            }
            MainMenuItem::Quit => app.exit = true,
        },
        KeyCode::Char('q') => app.exit = true,
        _ => {}
    }
}

/// Handles key presses at the player name prompt.
pub(crate) fn handle_name_entry(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Enter => app.confirm_name(),
        KeyCode::Esc => app.return_to_menu(),
        KeyCode::Backspace => {
            let _ = app.name_input.pop();
        }
        KeyCode::Char(character)
            if !character.is_control() && app.name_input.chars().count() < MAX_NAME_LEN =>
        {
            app.name_input.push(character);
        }
        _ => {}
    }
}

/// Handles key presses while a level is in play.
///
/// The win check runs after every move attempt, accepted or not.
pub(crate) fn handle_in_game(app: &mut App, code: KeyCode) {
    let Some(command) = command_for(code) else {
        return;
    };

    match command {
        Command::Move(direction) => {
            let solved = app
                .session
                .as_mut()
                .and_then(|session| session.level.as_mut())
                .is_some_and(|level| {
                    let _ = level.attempt_move(direction);
                    level.is_solved()
                });
            if solved {
                app.complete_level();
            }
        }
        Command::Abandon => {
            if let Some(session) = app.session.as_mut() {
                session.abandon_level();
            }
            app.next_level();
        }
        Command::EndRun => app.finish_run(),
    }
}

/// Handles key presses on the player history and level statistics lists.
pub(crate) fn handle_list(app: &mut App, code: KeyCode) {
    let (len, origin) = if app.screen == Screen::PlayerHistory {
        (app.history.players().len(), MainMenuItem::PlayerHistory)
    } else {
        (app.history.completions().len(), MainMenuItem::LevelStats)
    };

    match code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.viewport_offset.saturating_add(app.viewport_height) < len {
                app.viewport_offset += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.viewport_offset = app.viewport_offset.saturating_sub(1);
        }
        KeyCode::Char('h' | 'q') | KeyCode::Left | KeyCode::Esc => {
            app.viewport_offset = 0;
            app.screen = Screen::MainMenu(origin);
        }
        _ => {}
    }
}
