//! Terminal keyboard quit source
//!
//! Puts the terminal in raw mode so keys arrive without Enter, drains pending
//! key events once per frame, and raises a `QuitSignal` on q, Esc or Ctrl-C.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use super::input::{InputSource, QuitSignal};

/// Keys that end the match
pub fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        // Raw mode swallows SIGINT, so Ctrl-C shows up as a key
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

pub struct TerminalKeys {
    signal: QuitSignal,
    raw_mode: bool,
}

impl TerminalKeys {
    /// Without a usable terminal the keyboard is ignored and only `signal`
    /// can end the match
    pub fn new(signal: QuitSignal) -> Self {
        let raw_mode = match terminal::enable_raw_mode() {
            Ok(()) => true,
            Err(e) => {
                log::warn!("No raw terminal, quit keys disabled: {}", e);
                false
            }
        };
        Self { signal, raw_mode }
    }

    fn drain_events(&mut self) -> std::io::Result<()> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if is_quit_key(&key) {
                    self.signal.trigger();
                }
            }
        }
        Ok(())
    }

    fn restore_terminal(&mut self) {
        if self.raw_mode {
            if let Err(e) = terminal::disable_raw_mode() {
                log::warn!("Could not restore terminal mode: {}", e);
            }
            self.raw_mode = false;
        }
    }
}

impl InputSource for TerminalKeys {
    fn poll_quit_requested(&mut self) -> bool {
        if self.raw_mode && !self.signal.is_triggered() {
            if let Err(e) = self.drain_events() {
                log::warn!("Keyboard read failed, quit keys disabled: {}", e);
                self.restore_terminal();
            }
        }
        self.signal.is_triggered()
    }
}

impl Drop for TerminalKeys {
    fn drop(&mut self) {
        self.restore_terminal();
    }
}
