//! User interface rendering functions for all application screens.

use std::{rc::Rc, time::Duration};

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::{
    cell::Cell,
    level::Level,
    types::{MainMenuItem, Screen},
    App,
};

/// Format used for record timestamps in the history lists.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Updates the application UI based on the persistent state.
///
/// This function renders different screens based on the current state stored in the [`App`]
/// structure, dispatching to the appropriate rendering function for each screen type.
///
/// # Errors
///
/// This function may return errors from drawing operations or data conversion failures.
pub(crate) fn draw(app: &mut App, frame: &mut Frame) -> Result<()> {
    match &app.screen {
        Screen::MainMenu(item) => main_menu(frame, *item),
        Screen::NameEntry => name_entry(app, frame),
        Screen::InGame => in_game(app, frame)?,
        Screen::LevelComplete => level_complete(app, frame)?,
        Screen::LevelFailed(message) => message_box(frame, "Level Error", dismissable(message)),
        Screen::RunComplete => run_complete(app, frame)?,
        Screen::PlayerHistory => player_history(app, frame),
        Screen::LevelStats => level_stats(app, frame),
        Screen::Notice(message) => message_box(frame, "Notice", dismissable(message)),
    }

    Ok(())
}

/// Builds the lines of a message that any key dismisses.
fn dismissable(message: &str) -> Vec<Line<'_>> {
    vec![
        Line::raw(message),
        Line::raw(""),
        Line::raw("Press any key to continue..."),
    ]
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
///
/// This function renders a clear widget over the entire area of the frame to prepare for
/// rendering new content without artifacts from previous buffers rendered on the same frame.
pub(crate) fn clear(frame: &mut Frame) {
    let clear = Clear;
    frame.render_widget(clear, frame.area());
}

/// Formats a duration as minutes and seconds.
pub(crate) fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Returns the glyph and style used to draw a cell.
pub(crate) fn glyph(cell: Cell) -> Span<'static> {
    match cell {
        Cell::Floor => Span::raw(" "),
        Cell::Wall => Span::styled("\u{2588}", Style::default().fg(Color::White)),
        Cell::Box => Span::styled("0", Style::default().fg(Color::Yellow)),
        Cell::BoxOnGoal => Span::styled("0", Style::default().fg(Color::Green)),
        Cell::Goal => Span::styled("#", Style::default().fg(Color::Red)),
        Cell::Hero | Cell::HeroOnGoal => Span::styled("X", Style::default().fg(Color::Cyan)),
    }
}

/// Renders the generic layout structure for the main menu.
///
/// This function creates the centered positioning and border styling of the menu, returning one
/// area per menu item for the caller to fill in.
#[expect(
    clippy::indexing_slicing,
    reason = "The collection is created in-place with few, known elements; there is no risk of bad indexing."
)]
pub(crate) fn init_menu(frame: &mut Frame, title: &str, items: u16) -> Rc<[Rect]> {
    let space = Layout::vertical([
        Constraint::Percentage(35),
        Constraint::Percentage(30),
        Constraint::Percentage(35),
    ])
    .split(frame.area())[1];
    let space = Layout::horizontal([
        Constraint::Percentage(35),
        Constraint::Percentage(30),
        Constraint::Percentage(35),
    ])
    .split(space)[1];

    let layout = Layout::vertical([Constraint::Max(items + 2)])
        .flex(Flex::Center)
        .split(space)[0];

    let block = Block::bordered()
        .title(title)
        .title_bottom("(j) down / (k) up / (l) select")
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);

    let inner_space = block.inner(layout);

    frame.render_widget(block, layout);

    Layout::vertical(vec![Constraint::Max(1); items.into()]).split(inner_space)
}

/// Renders the main menu screen with navigation options.
///
/// This function displays every [`MainMenuItem`] and highlights the currently selected one.
pub(crate) fn main_menu(frame: &mut Frame, item: MainMenuItem) {
    clear(frame);

    let inner_layout = init_menu(frame, "Sokotuine", 4);

    let content_style = Style::default().fg(Color::Green);
    let active_content_style = Style::default().fg(Color::White).bg(Color::Green);

    for (option, area) in MainMenuItem::ALL.into_iter().zip(inner_layout.iter()) {
        let style = if option == item {
            active_content_style
        } else {
            content_style
        };
        frame.render_widget(Line::styled(option.repr(), style).centered(), *area);
    }
}

/// Renders a centered, bordered box holding a few lines of text.
fn message_box(frame: &mut Frame, title: &str, lines: Vec<Line<'_>>) {
    clear(frame);

    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let space = Layout::horizontal([Constraint::Percentage(60)])
        .flex(Flex::Center)
        .split(frame.area());
    let Some(space) = space.first() else {
        return;
    };
    let layout = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(*space);
    let Some(layout) = layout.first() else {
        return;
    };

    let block = Block::bordered()
        .title(title)
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        *layout,
    );
}

/// Renders the player name prompt shown before a run starts.
pub(crate) fn name_entry(app: &App, frame: &mut Frame) {
    let lines = vec![
        Line::raw("Enter your name:"),
        Line::styled(
            format!("{}_", app.name_input),
            Style::default().fg(Color::White),
        ),
        Line::raw(""),
        Line::raw("(enter) start / (esc) back"),
    ];

    message_box(frame, "New Game", lines);
}

/// Renders the in-game screen with the level grid and the progress counters.
///
/// The grid is drawn one terminal cell per grid cell, centered in the frame, with the step count
/// and the level clock on the line below.
///
/// # Errors
///
/// This function returns an error if no level is loaded or the grid does not fit the coordinate
/// range of the terminal.
pub(crate) fn in_game(app: &App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let session = app.session.as_ref().ok_or_eyre("no run in progress")?;
    let level = session
        .level
        .as_ref()
        .ok_or_eyre("no level loaded in the current run")?;

    let grid_rows = u16::try_from(level.height())?;
    let grid_columns = u16::try_from(level.width())?;

    // Create overall layout: grid area + stats line + tooltip at bottom
    let overall_layout = Layout::vertical([
        Constraint::Min(1),    // Grid and padding area
        Constraint::Length(1), // Stats line
        Constraint::Length(3), // Tooltip block
    ])
    .split(frame.area());

    let grid_content_area = *overall_layout
        .first()
        .ok_or_eyre("failed to get grid content area from layout")?;
    let stats_area = *overall_layout
        .get(1)
        .ok_or_eyre("failed to get stats area from layout")?;
    let tooltip_area = *overall_layout
        .last()
        .ok_or_eyre("failed to get tooltip area from layout")?;

    let grid_area = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(grid_rows),
        Constraint::Min(1),
    ])
    .split(grid_content_area)
    .get(1)
    .copied()
    .ok_or_eyre("failed to get grid area from layout")?;
    let grid_area = Layout::horizontal([
        Constraint::Min(1),
        Constraint::Length(grid_columns),
        Constraint::Min(1),
    ])
    .split(grid_area)
    .get(1)
    .copied()
    .ok_or_eyre("failed to get grid space from horizontal layout")?;

    frame.render_widget(Paragraph::new(grid_lines(level)), grid_area);

    let stats = format!(
        "Level {}/{} | Steps: {} | Time: {}",
        session.level_number(),
        session.total(),
        level.steps(),
        format_duration(level.elapsed())
    );
    frame.render_widget(
        Line::styled(stats, Style::default().fg(Color::Green)).centered(),
        stats_area,
    );

    let tooltip_block = Block::bordered()
        .title("(arrows / hjkl) move / (esc) skip level / (q) end run")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .border_type(BorderType::Plain)
        .borders(Borders::TOP);

    frame.render_widget(tooltip_block, tooltip_area);

    Ok(())
}

/// Builds one styled line per grid row.
fn grid_lines(level: &Level) -> Vec<Line<'static>> {
    level
        .grid()
        .rows()
        .map(|row| Line::from(row.iter().copied().map(glyph).collect::<Vec<_>>()))
        .collect()
}

/// Renders the summary of a solved level.
///
/// # Errors
///
/// This function returns an error if no solved level is loaded.
pub(crate) fn level_complete(app: &App, frame: &mut Frame) -> Result<()> {
    let session = app.session.as_ref().ok_or_eyre("no run in progress")?;
    let level = session
        .level
        .as_ref()
        .ok_or_eyre("no level loaded in the current run")?;

    let mut lines = vec![
        Line::raw(format!("Level {} complete!", session.level_number())),
        Line::raw(format!(
            "Steps: {}, Time: {}",
            level.steps(),
            format_duration(level.elapsed())
        )),
    ];
    push_warning(app, &mut lines);
    lines.push(Line::raw(""));
    lines.push(Line::raw("Press any key to continue..."));

    message_box(frame, "Level Complete", lines);

    Ok(())
}

/// Renders the summary shown at the end of a run.
///
/// # Errors
///
/// This function returns an error if no run is in progress.
pub(crate) fn run_complete(app: &App, frame: &mut Frame) -> Result<()> {
    let session = app.session.as_ref().ok_or_eyre("no run in progress")?;

    let mut lines = vec![
        Line::raw(format!("Well played, {}!", session.player)),
        Line::raw(format!(
            "Levels solved: {} of {}",
            session.solved,
            session.total()
        )),
    ];
    push_warning(app, &mut lines);
    lines.push(Line::raw(""));
    lines.push(Line::raw("Press any key to return to the menu..."));

    message_box(frame, "Game Over", lines);

    Ok(())
}

/// Appends the pending storage warning, if any, to a message.
fn push_warning(app: &App, lines: &mut Vec<Line<'_>>) {
    if let Some(warning) = &app.warning {
        lines.push(Line::styled(warning.clone(), Style::default().fg(Color::Red)));
    }
}

/// Renders the list of known players.
pub(crate) fn player_history(app: &mut App, frame: &mut Frame) {
    let entries: Vec<String> = app
        .history
        .players()
        .iter()
        .map(|player| {
            format!(
                "Player: {}, Levels completed: {}, Last played: {}",
                player.name,
                player.levels_completed,
                player.last_played.format(TIMESTAMP_FORMAT)
            )
        })
        .collect();

    list_screen(
        app,
        frame,
        "Player History",
        "No player history found.",
        &entries,
    );
}

/// Renders the list of completed levels.
pub(crate) fn level_stats(app: &mut App, frame: &mut Frame) {
    let entries: Vec<String> = app
        .history
        .completions()
        .iter()
        .map(|record| {
            format!(
                "Player: {}, Level: {}, Steps: {}, Time: {}, Completed: {}",
                record.player,
                record.level,
                record.steps,
                format_duration(record.elapsed),
                record.completed_at.format(TIMESTAMP_FORMAT)
            )
        })
        .collect();

    list_screen(
        app,
        frame,
        "Level Stats",
        "No level statistics found.",
        &entries,
    );
}

/// Renders a scrollable list inside a bordered block.
///
/// This function records the height of the list area in the [`App`] so that scrolling can stop
/// once the last entry is visible.
fn list_screen(app: &mut App, frame: &mut Frame, title: &str, empty: &str, entries: &[String]) {
    clear(frame);

    let space = Layout::vertical([Constraint::Percentage(80)])
        .flex(Flex::Center)
        .split(frame.area());
    let Some(space) = space.first() else {
        return;
    };
    let space = Layout::horizontal([Constraint::Percentage(90)])
        .flex(Flex::Center)
        .split(*space);
    let Some(layout) = space.first() else {
        return;
    };

    let block = Block::bordered()
        .title_top(title)
        .title_bottom("(j) down / (k) up / (h) return")
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);

    let inner_space = block.inner(*layout);
    frame.render_widget(block, *layout);

    app.viewport_height = inner_space.height.into();

    let lines: Vec<Line<'_>> = if entries.is_empty() {
        vec![Line::raw(empty)]
    } else {
        entries
            .iter()
            .skip(app.viewport_offset)
            .take(app.viewport_height)
            .map(|entry| Line::raw(entry.as_str()))
            .collect()
    };

    frame.render_widget(Paragraph::new(lines), inner_space);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app::tests::test_app, grid::Direction};
    use ratatui::{backend::TestBackend, Terminal};

    /// Creates a test terminal with known dimensions for UI testing.
    fn create_test_terminal() -> Terminal<TestBackend> {
        let backend = TestBackend::new(80, 24);
        Terminal::new(backend).expect("failed to create test terminal")
    }

    /// Concatenates every symbol of the last drawn frame.
    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    /// Draws the current screen of `app`, panicking on rendering errors.
    fn draw_app(app: &mut App, terminal: &mut Terminal<TestBackend>) {
        let result = terminal.draw(|frame| {
            draw(app, frame).expect("drawing should succeed in test");
        });

        assert!(result.is_ok(), "drawing should succeed");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(999)), "00:00");
        assert_eq!(format_duration(Duration::from_secs(75)), "01:15");
        assert_eq!(format_duration(Duration::from_secs(3_600)), "60:00");
    }

    #[test]
    fn test_glyphs() {
        assert_eq!(glyph(Cell::Floor).content, " ");
        assert_eq!(glyph(Cell::Wall).content, "\u{2588}");
        assert_eq!(glyph(Cell::Box).content, glyph(Cell::BoxOnGoal).content);
        assert_eq!(glyph(Cell::Hero).content, glyph(Cell::HeroOnGoal).content);
        assert_eq!(glyph(Cell::Goal).content, "#");
    }

    #[test]
    fn test_draw_main_menu() {
        let (mut app, _dir) = test_app(&[]);
        let mut terminal = create_test_terminal();

        draw_app(&mut app, &mut terminal);

        let text = screen_text(&terminal);
        for item in MainMenuItem::ALL {
            assert!(text.contains(item.repr()), "{item:?} should be listed");
        }
    }

    #[test]
    fn test_init_menu_main_menu() {
        let mut terminal = create_test_terminal();

        let result = terminal.draw(|frame| {
            let layout = init_menu(frame, "Sokotuine", 4);
            assert_eq!(layout.len(), 4, "main menu should have 4 items");
        });

        assert!(result.is_ok(), "initializing main menu should succeed");
    }

    #[test]
    fn test_draw_name_entry() {
        let (mut app, _dir) = test_app(&[]);
        let mut terminal = create_test_terminal();
        app.screen = Screen::NameEntry;
        app.name_input = "Ada".to_owned();

        draw_app(&mut app, &mut terminal);

        assert!(screen_text(&terminal).contains("Ada_"));
    }

    #[test]
    fn test_draw_in_game() {
        let (mut app, _dir) = test_app(&[("level1.txt", "111111\n140231\n111111")]);
        let mut terminal = create_test_terminal();
        app.begin_run();
        app.confirm_name();
        assert_eq!(app.screen, Screen::InGame);

        draw_app(&mut app, &mut terminal);
        let text = screen_text(&terminal);
        assert!(text.contains("X 0#"), "grid row should be drawn");
        assert!(text.contains("Level 1/1 | Steps: 0 | Time: 00:00"));

        let level = app
            .session
            .as_mut()
            .and_then(|session| session.level.as_mut())
            .expect("level should be loaded");
        assert!(level.attempt_move(Direction::Right).is_accepted());

        draw_app(&mut app, &mut terminal);
        let text = screen_text(&terminal);
        assert!(text.contains(" X0#"), "hero should have moved");
        assert!(text.contains("Steps: 1"));
    }

    #[test]
    fn test_in_game_without_level_fails() {
        let (mut app, _dir) = test_app(&[]);
        let mut terminal = create_test_terminal();

        let result = terminal.draw(|frame| {
            let game_result = in_game(&app, frame);
            assert!(
                game_result.is_err(),
                "in-game should fail without a loaded level"
            );
        });

        assert!(
            result.is_ok(),
            "terminal drawing should succeed even if in_game fails"
        );
        app.return_to_menu();
    }

    #[test]
    fn test_draw_level_complete_and_run_complete() {
        let (mut app, _dir) = test_app(&[("level1.txt", "11111\n14231\n11111")]);
        let mut terminal = create_test_terminal();
        app.begin_run();
        app.name_input = "Ada".to_owned();
        app.confirm_name();
        let level = app
            .session
            .as_mut()
            .and_then(|session| session.level.as_mut())
            .expect("level should be loaded");
        assert!(level.attempt_move(Direction::Right).is_accepted());
        app.complete_level();

        draw_app(&mut app, &mut terminal);
        let text = screen_text(&terminal);
        assert!(text.contains("Level 1 complete!"));
        assert!(text.contains("Steps: 1"));

        app.next_level();
        draw_app(&mut app, &mut terminal);
        let text = screen_text(&terminal);
        assert!(text.contains("Levels solved: 1 of 1"));
    }

    #[test]
    fn test_draw_level_failed_and_notice() {
        let (mut app, _dir) = test_app(&[]);
        let mut terminal = create_test_terminal();

        app.screen = Screen::LevelFailed("Error loading level 2".to_owned());
        draw_app(&mut app, &mut terminal);
        assert!(screen_text(&terminal).contains("Error loading level 2"));

        app.screen = Screen::Notice("No level files".to_owned());
        draw_app(&mut app, &mut terminal);
        assert!(screen_text(&terminal).contains("No level files"));
    }

    #[test]
    fn test_draw_empty_lists() {
        let (mut app, _dir) = test_app(&[]);
        let mut terminal = create_test_terminal();

        app.screen = Screen::PlayerHistory;
        draw_app(&mut app, &mut terminal);
        assert!(screen_text(&terminal).contains("No player history found."));
        assert!(app.viewport_height > 0);

        app.screen = Screen::LevelStats;
        draw_app(&mut app, &mut terminal);
        assert!(screen_text(&terminal).contains("No level statistics found."));
    }

    #[test]
    fn test_draw_player_history_entries() {
        let (mut app, _dir) = test_app(&[]);
        let mut terminal = create_test_terminal();
        app.history
            .record_player("Grace", 4, chrono::Local::now())
            .expect("saving should succeed");
        app.screen = Screen::PlayerHistory;

        draw_app(&mut app, &mut terminal);

        assert!(screen_text(&terminal).contains("Player: Grace, Levels completed: 4"));
    }
}
