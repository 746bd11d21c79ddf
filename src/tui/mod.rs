mod controller;
mod state;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::time::interval;

use crate::app::Action;

pub use controller::AppController;
pub use state::{App, FocusArea};

pub async fn run(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let mut reader = EventStream::new();
    let mut ticker = interval(Duration::from_millis(200));

    loop {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        tokio::select! {
            _ = ticker.tick() => {
                app.tick = app.tick.wrapping_add(1);
            },
            maybe_event = reader.next() => {
                if let Some(Ok(event)) = maybe_event {
                    handle_event(&mut app, event);
                }
            }
            Some(message) = app.msg_rx.recv() => {
                app.handle_message(message);
            }
        }

        if app.should_quit {
            break;
        }
    }

    terminal.show_cursor()?;
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    Ok(())
}

fn handle_event(app: &mut App, event: Event) {
    if let Event::Key(key_event) = event {
        if key_event.kind != KeyEventKind::Release {
            handle_key_event(app, key_event);
        }
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => app.should_quit = true,
        KeyCode::Char('q') if app.focus != FocusArea::Input => app.should_quit = true,
        KeyCode::F(1) => app.trigger(Action::Recipe),
        KeyCode::Char('r') if ctrl => app.trigger(Action::Recipe),
        KeyCode::F(2) => app.trigger(Action::Images),
        KeyCode::Char('g') if ctrl => app.trigger(Action::Images),
        KeyCode::F(3) => app.trigger(Action::Videos),
        KeyCode::Char('y') if ctrl => app.trigger(Action::Videos),
        KeyCode::F(5) => app.reset(),
        KeyCode::Char('x') if ctrl => app.reset(),
        KeyCode::Tab => app.next_focus(),
        KeyCode::BackTab => app.previous_focus(),
        KeyCode::Esc => {
            if app.focus == FocusArea::Input {
                app.dish_input.clear();
            } else {
                app.focus = FocusArea::Input;
            }
        }
        _ => match app.focus {
            FocusArea::Input => handle_input_keys(app, key),
            FocusArea::Recipe => handle_recipe_keys(app, key),
            FocusArea::Videos => handle_video_keys(app, key),
            FocusArea::Logs => {}
        },
    }
}

fn handle_input_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.trigger(Action::Recipe),
        KeyCode::Backspace => {
            app.dish_input.pop();
        }
        KeyCode::Char(ch) => {
            if !key.modifiers.contains(KeyModifiers::ALT)
                && !key.modifiers.contains(KeyModifiers::CONTROL)
            {
                app.dish_input.push(ch);
            }
        }
        _ => {}
    }
}

fn handle_recipe_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up => app.scroll_recipe(-1),
        KeyCode::Down => app.scroll_recipe(1),
        KeyCode::PageUp => app.scroll_recipe(-10),
        KeyCode::PageDown => app.scroll_recipe(10),
        KeyCode::Home => app.recipe_scroll = 0,
        _ => {}
    }
}

fn handle_video_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up => app.move_video_selection(-1),
        KeyCode::Down => app.move_video_selection(1),
        _ => {}
    }
}
