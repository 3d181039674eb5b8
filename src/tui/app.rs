use crate::api::{AdminClient, ApiError};
use crate::config::Config;
use crate::selection::models::{Member, SelectionSet};
use crate::selection::sync::Synchronizer;
use crate::tui::notify::{Notice, Notifier, build_notifier};
use crate::tui::search::SearchState;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;
use std::time::Instant;

const MSG_SAVED: &str = "Changes saved successfully";
const MSG_REJECTED: &str = "Failed to save changes";
const MSG_TRANSPORT: &str = "Could not connect to the server";
const MSG_FORBIDDEN: &str = "You do not have permission to modify this system";

pub struct App {
    pub system_id: u64,
    pub sync: Synchronizer,
    pub cursor: usize,
    pub scroll_offset: usize,
    pub should_quit: bool,
    pub help_mode: bool,
    pub search: SearchState,
    pub notifier: Box<dyn Notifier>,
    pub config: Config,
    /// Set when the notifier ends the view; printed after the terminal is
    /// restored.
    pub exit_notice: Option<Notice>,
    client: AdminClient,
    outcome_tx: Sender<Result<(), ApiError>>,
    outcome_rx: Receiver<Result<(), ApiError>>,
}

impl App {
    pub fn new(system_id: u64, members: Vec<Member>, client: AdminClient, config: Config) -> Self {
        let (outcome_tx, outcome_rx) = channel();
        let notifier = build_notifier(config.notifier);

        Self {
            system_id,
            sync: Synchronizer::new(SelectionSet::new(members)),
            cursor: 0,
            scroll_offset: 0,
            should_quit: false,
            help_mode: false,
            search: SearchState::new(),
            notifier,
            config,
            exit_notice: None,
            client,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> Result<()> {
        if self.notifier.is_blocking() {
            // Acknowledgement popup swallows the keypress.
            self.notifier.dismiss();
            Ok(())
        } else if self.help_mode {
            self.handle_help_mode_key(key_event)
        } else if self.search.search_mode {
            self.handle_search_mode_key(key_event)
        } else {
            self.handle_normal_mode_key(key_event)
        }
    }

    fn handle_normal_mode_key(&mut self, key_event: KeyEvent) -> Result<()> {
        match key_event.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                self.search.cancel_search();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_cursor_up();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_cursor_down();
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.sync.toggle_member(self.cursor);
            }
            KeyCode::Char('a') => {
                self.sync.toggle_aggregate();
            }
            KeyCode::Char('s') => {
                self.submit();
            }
            KeyCode::Char('/') => {
                self.search.enter_search_mode();
            }
            KeyCode::Char('n') => {
                if let Some(index) = self.search.next_match() {
                    self.jump_to(index);
                }
            }
            KeyCode::Char('N') => {
                if let Some(index) = self.search.previous_match() {
                    self.jump_to(index);
                }
            }
            KeyCode::Char('c') => {
                self.toggle_compact();
            }
            KeyCode::Char('?') => {
                self.help_mode = true;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_help_mode_key(&mut self, key_event: KeyEvent) -> Result<()> {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Char('?') => {
                self.help_mode = false;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_search_mode_key(&mut self, key_event: KeyEvent) -> Result<()> {
        match key_event.code {
            KeyCode::Esc => {
                self.search.cancel_search();
            }
            KeyCode::Enter => {
                if let Some(index) = self.search.confirm_search() {
                    self.jump_to(index);
                }
            }
            KeyCode::Backspace => {
                self.search.backspace(self.sync.members());
            }
            KeyCode::Char(c) => {
                self.search.insert_char(c, self.sync.members());
            }
            _ => {}
        }
        Ok(())
    }

    /// Fire-and-forget submission of the full selection snapshot. The
    /// request runs on its own thread and reports back over the channel;
    /// the view stays interactive in the meantime. There is no in-flight
    /// guard, so concurrent submits are possible.
    pub fn submit(&mut self) {
        let payload = self.sync.payload();
        let client = self.client.clone();
        let system_id = self.system_id;
        let tx = self.outcome_tx.clone();

        thread::spawn(move || {
            let result = client.save_system_users(system_id, &payload);
            // Receiver gone means the view is shutting down; drop the result.
            let _ = tx.send(result);
        });
    }

    /// Called on every loop tick: drains finished submissions and advances
    /// time-based notifier state.
    pub fn on_tick(&mut self) {
        while let Ok(result) = self.outcome_rx.try_recv() {
            self.apply_submit_outcome(result);
        }

        self.notifier.tick(Instant::now());

        if let Some(notice) = self.notifier.exit_notice() {
            self.exit_notice = Some(notice.clone());
            self.should_quit = true;
        }
    }

    pub fn apply_submit_outcome(&mut self, result: std::result::Result<(), ApiError>) {
        match result {
            Ok(()) => {
                tracing::info!(system_id = self.system_id, "assignments saved");
                self.notifier.success(MSG_SAVED);
            }
            Err(err) => {
                tracing::warn!(system_id = self.system_id, error = %err, "assignment save failed");
                self.notifier.failure(failure_message(&err));
            }
        }
    }

    fn move_cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.update_scroll();
        }
    }

    fn move_cursor_down(&mut self) {
        if self.cursor < self.sync.len().saturating_sub(1) {
            self.cursor += 1;
            self.update_scroll();
        }
    }

    fn jump_to(&mut self, index: usize) {
        if index < self.sync.len() {
            self.cursor = index;
            self.update_scroll();
        }
    }

    fn update_scroll(&mut self) {
        // Keep the cursor visible; the list widget handles exact heights.
        const VISIBLE_ITEMS: usize = 20;

        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + VISIBLE_ITEMS {
            self.scroll_offset = self.cursor.saturating_sub(VISIBLE_ITEMS - 1);
        }
    }

    fn toggle_compact(&mut self) {
        self.config.compact = !self.config.compact;
        if let Err(e) = self.config.save() {
            tracing::warn!(error = %e, "failed to persist compact preference");
        }
    }
}

fn failure_message(err: &ApiError) -> &'static str {
    match err {
        ApiError::Forbidden => MSG_FORBIDDEN,
        ApiError::Rejected(_) => MSG_REJECTED,
        ApiError::Transport(_) => MSG_TRANSPORT,
    }
}
