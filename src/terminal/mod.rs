pub mod clipboard;
pub mod events;
pub mod state;
pub mod ui;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use log::{debug, info};
use ratatui::DefaultTerminal;
use std::sync::mpsc;
use std::time::Duration;

use crate::api::client::ApiClient;
use crate::fetcher::{FetchOutcome, spawn_fetch};
use crate::terminal::clipboard::TerminalClipboard;
use crate::terminal::events::{KeyAction, handle_key};
use crate::terminal::state::AppState;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Runs the UI loop until the user quits. All state changes happen on this thread;
/// workers report back over a channel drained between input polls.
pub fn run_tui(client: ApiClient, base_url: String) -> Result<()> {
    let mut state = AppState::new(base_url);

    let terminal = ratatui::init();
    let result = run(terminal, &mut state, &client);
    ratatui::restore();

    info!("ui loop exited");
    result
}

fn run(mut terminal: DefaultTerminal, state: &mut AppState, client: &ApiClient) -> Result<()> {
    let mut clipboard = TerminalClipboard::new(std::io::stdout());
    let (tx, rx) = mpsc::channel::<FetchOutcome>();

    loop {
        while let Ok(outcome) = rx.try_recv() {
            state.apply(outcome);
        }
        terminal.draw(|f| ui::render(f, state))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match handle_key(key, state, &mut clipboard) {
            KeyAction::Quit => return Ok(()),
            KeyAction::Fetch(req) => {
                debug!("starting {:?} request {}", req.kind, req.id);
                spawn_fetch(client.clone(), req, tx.clone());
            }
            KeyAction::None => {}
        }
    }
}
