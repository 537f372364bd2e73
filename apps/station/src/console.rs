//! Terminal feedback renderer.
//!
//! Maps the engine's feedback calls onto what a terminal can do: colored
//! status lines, the bell in place of the scanner tone, and a prompt reset
//! in place of refocusing an input field. Haptics have no terminal
//! equivalent and are dropped.

use std::io::Write;

use chrono::Local;

use festa_core::SubmissionResult;
use festa_scan::FeedbackSink;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

pub struct ConsoleFeedback;

impl ConsoleFeedback {
    fn timestamp() -> String {
        Local::now().format("%H:%M:%S").to_string()
    }
}

impl FeedbackSink for ConsoleFeedback {
    fn result(&self, result: &SubmissionResult) {
        let (color, tag) = if result.ok {
            (GREEN, " OK ")
        } else {
            (RED, "FAIL")
        };
        println!(
            "{color}[{}] {tag} {}{RESET}",
            Self::timestamp(),
            result.message
        );
        if let Some(item) = &result.item {
            if !item.flavor.is_empty() || !item.price.is_empty() {
                println!(
                    "{DIM}           {} {} {}{RESET}",
                    item.id, item.flavor, item.price
                );
            }
        }
    }

    fn neutral(&self, message: &str) {
        println!("{YELLOW}[{}]      {}{RESET}", Self::timestamp(), message);
    }

    fn hint(&self, message: &str) {
        println!("{DIM}[{}]      {}{RESET}", Self::timestamp(), message);
    }

    fn tone(&self, ok: bool) {
        // One bell for success, two for failure; the terminal has no pitch
        let bells = if ok { "\x07" } else { "\x07\x07" };
        print!("{bells}");
        let _ = std::io::stdout().flush();
    }

    fn haptic(&self, _ok: bool) {}

    fn input_reset(&self) {
        print!("> ");
        let _ = std::io::stdout().flush();
    }
}
