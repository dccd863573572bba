//! Blade Balls entry point
//!
//! Loads settings, sets up logging and runs one match either live in the
//! terminal or headless as fast as possible.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use blade_balls::platform::{FrameBudget, ManualClock, QuitSignal, SystemClock, TerminalKeys};
use blade_balls::renderer::{DrawList, TerminalSurface};
use blade_balls::{RunSummary, Runner, Settings};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
    log::info!("Seed {}", seed);

    let rng = Pcg32::seed_from_u64(seed);
    let budget = settings.max_frames.map(FrameBudget::new);

    if settings.headless {
        let mut runner = Runner::new(ManualClock::new(), DrawList::new(), budget, rng)
            .show_hud(settings.show_hud);
        let summary = runner.run();
        print_summary(&summary);
    } else {
        let surface = TerminalSurface::new(settings.terminal_columns, settings.terminal_rows);
        log::info!("Press q or Esc to quit");
        let input = (TerminalKeys::new(QuitSignal::new()), budget);
        let mut runner =
            Runner::new(SystemClock::new(), surface, input, rng).show_hud(settings.show_hud);
        let summary = runner.run();
        // Leave raw mode before anything else reaches the terminal
        drop(runner);
        log::info!("{:?}", summary);
    }
}

fn print_summary(summary: &RunSummary) {
    match serde_json::to_string_pretty(summary) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Could not serialize run summary: {}", e),
    }
}
