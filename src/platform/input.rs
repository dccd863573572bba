//! Input sources
//!
//! The only input the game consumes is a request to quit.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Polled once per frame by the loop
pub trait InputSource {
    fn poll_quit_requested(&mut self) -> bool;
}

/// Never asks to quit; the match runs until someone wins
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverQuit;

impl InputSource for NeverQuit {
    fn poll_quit_requested(&mut self) -> bool {
        false
    }
}

/// Requests a quit once a fixed number of frames has been polled
#[derive(Debug, Clone)]
pub struct FrameBudget {
    remaining: u64,
}

impl FrameBudget {
    pub fn new(frames: u64) -> Self {
        Self { remaining: frames }
    }
}

impl InputSource for FrameBudget {
    fn poll_quit_requested(&mut self) -> bool {
        if self.remaining == 0 {
            return true;
        }
        self.remaining -= 1;
        false
    }
}

/// `None` means no limit
impl InputSource for Option<FrameBudget> {
    fn poll_quit_requested(&mut self) -> bool {
        self.as_mut().is_some_and(FrameBudget::poll_quit_requested)
    }
}

/// Shared quit flag; any clone can raise it and it stays raised
#[derive(Debug, Clone, Default)]
pub struct QuitSignal {
    flag: Arc<AtomicBool>,
}

impl QuitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

impl InputSource for QuitSignal {
    fn poll_quit_requested(&mut self) -> bool {
        self.is_triggered()
    }
}

/// Quits when either source does. Both are polled every frame so a frame
/// budget keeps counting alongside a keyboard source.
impl<A: InputSource, B: InputSource> InputSource for (A, B) {
    fn poll_quit_requested(&mut self) -> bool {
        let first = self.0.poll_quit_requested();
        let second = self.1.poll_quit_requested();
        first || second
    }
}
