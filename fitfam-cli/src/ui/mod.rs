// Plain-text views printed by the commands

pub mod card;
pub mod comparison;

use indicatif::ProgressBar;
use std::time::Duration;

pub use card::{render_card, render_profile, CardView};
pub use comparison::render_comparison;

/// Spinner shown while partner statistics load
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
