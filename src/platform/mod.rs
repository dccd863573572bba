//! Platform abstraction layer
//!
//! Everything the frame loop needs from the outside world:
//! - Time/ticks and frame pacing
//! - The quit signal (frame budget, shared flag, terminal keys)
//! - A surface to draw on

pub mod input;
pub mod keyboard;
pub mod surface;
pub mod time;

pub use input::{FrameBudget, InputSource, NeverQuit, QuitSignal};
pub use keyboard::TerminalKeys;
pub use surface::{Stroke, Surface};
pub use time::{Clock, ManualClock, SystemClock};
