use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::db::Database;
use crate::ui::app::{App, InputMode, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(db: &mut Database) -> Result<()> {
    let mut app = App::new();
    app.refresh_all(db)?;
    if app.overview.stale_months > 0 {
        app.set_status(format!(
            "{} month(s) have a stale running total. Run :reconcile",
            app.overview.stale_months
        ));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    tracing::info!("tui started");

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "tui exited with error");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // tab + status + command bars, table border and header
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, db)?,
                InputMode::Command => handle_command_input(key, app, db)?,
                InputMode::Confirm => handle_confirm_input(key, app, db)?,
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('c') if ctrl => app.running = false,
        KeyCode::Char('d') if ctrl => {
            for _ in 0..app.visible_rows / 2 {
                move_down(app);
            }
        }
        KeyCode::Char('u') if ctrl => {
            for _ in 0..app.visible_rows / 2 {
                move_up(app);
            }
        }
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('j') | KeyCode::Down => move_down(app),
        KeyCode::Char('k') | KeyCode::Up => move_up(app),
        KeyCode::Char('g') => goto_top(app),
        KeyCode::Char('G') => goto_bottom(app),
        KeyCode::Char('1') => switch_screen(app, db, Screen::Dashboard)?,
        KeyCode::Char('2') => switch_screen(app, db, Screen::Budget)?,
        KeyCode::Char('3') => switch_screen(app, db, Screen::Savings)?,
        KeyCode::Tab => cycle_screen(app, db, 1)?,
        KeyCode::BackTab => cycle_screen(app, db, -1)?,
        KeyCode::Char('D') => match app.screen {
            Screen::Budget => commands::handle_command("delete", app, db)?,
            Screen::Savings => commands::handle_command("delete-month", app, db)?,
            Screen::Dashboard => {}
        },
        KeyCode::Char('f') if app.screen == Screen::Budget => {
            if let Some(category) = app.selected_line().map(|l| l.category.clone()) {
                commands::handle_command(&format!("filter {category}"), app, db)?;
            }
        }
        KeyCode::Esc => {
            if app.category_filter.is_some() {
                commands::handle_command("filter", app, db)?;
            } else {
                app.status_message.clear();
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => app.command_input.push(c),
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => commands::confirm_pending(app, db)?,
        // Any other key cancels
        _ => commands::cancel_pending(app),
    }
    Ok(())
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, db: &mut Database, screen: Screen) -> Result<()> {
    app.screen = screen;
    app.refresh_all(db)
}

fn cycle_screen(app: &mut App, db: &mut Database, step: isize) -> Result<()> {
    let screens = Screen::all();
    let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0) as isize;
    let next = (idx + step).rem_euclid(screens.len() as isize) as usize;
    switch_screen(app, db, screens[next])
}

fn move_down(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Budget => {
            let len = app.visible_lines().len();
            scroll_down(&mut app.line_index, &mut app.line_scroll, len, page);
        }
        Screen::Savings => {
            let len = app.overview.savings.len();
            scroll_down(&mut app.month_index, &mut app.month_scroll, len, page);
        }
        Screen::Dashboard => {}
    }
}

fn move_up(app: &mut App) {
    match app.screen {
        Screen::Budget => scroll_up(&mut app.line_index, &mut app.line_scroll),
        Screen::Savings => scroll_up(&mut app.month_index, &mut app.month_scroll),
        Screen::Dashboard => {}
    }
}

fn goto_top(app: &mut App) {
    match app.screen {
        Screen::Budget => scroll_to_top(&mut app.line_index, &mut app.line_scroll),
        Screen::Savings => scroll_to_top(&mut app.month_index, &mut app.month_scroll),
        Screen::Dashboard => {}
    }
}

fn goto_bottom(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Budget => {
            let len = app.visible_lines().len();
            scroll_to_bottom(&mut app.line_index, &mut app.line_scroll, len, page);
        }
        Screen::Savings => {
            let len = app.overview.savings.len();
            scroll_to_bottom(&mut app.month_index, &mut app.month_scroll, len, page);
        }
        Screen::Dashboard => {}
    }
}
