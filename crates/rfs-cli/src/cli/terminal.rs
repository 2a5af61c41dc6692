//! Terminal rendition of the progress indicator: one line per update, throttled.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use rfs_core::indicator::{IndicatorIcon, IndicatorProgress};
use rfs_core::{IndicatorId, IndicatorState, ProgressIndicator};

struct Entry {
    state: IndicatorState,
    last_print: Option<Instant>,
}

/// Prints indicator state to stdout. Updates closer together than `interval`
/// are folded into the next printed line; terminal states always print.
pub struct TerminalIndicator {
    interval: Duration,
    entries: Mutex<HashMap<IndicatorId, Entry>>,
}

impl TerminalIndicator {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<IndicatorId, Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// One status line for `state`.
pub fn render_line(state: &IndicatorState) -> String {
    let marker = match state.icon {
        IndicatorIcon::Downloading => "..",
        IndicatorIcon::Done => "ok",
        IndicatorIcon::Error => "!!",
    };
    let percent = match state.progress {
        IndicatorProgress::Determinate { current, max } if max > 0 => {
            format!(" ({:.1}%)", current as f64 * 100.0 / max as f64)
        }
        _ => String::new(),
    };
    if state.text.is_empty() {
        format!("[{}] {}", marker, state.title)
    } else {
        format!("[{}] {}: {}{}", marker, state.title, state.text, percent)
    }
}

impl ProgressIndicator for TerminalIndicator {
    fn create(&self, id: IndicatorId, state: IndicatorState) {
        println!("{}", render_line(&state));
        self.entries().insert(
            id,
            Entry {
                state,
                last_print: Some(Instant::now()),
            },
        );
    }

    fn update(&self, id: IndicatorId, mutate: &dyn Fn(&mut IndicatorState)) {
        let mut entries = self.entries();
        let entry = entries.entry(id).or_insert_with(|| Entry {
            state: IndicatorState::default(),
            last_print: None,
        });
        mutate(&mut entry.state);

        let now = Instant::now();
        let due = entry
            .last_print
            .map_or(true, |t| now.duration_since(t) >= self.interval);
        if due {
            println!("{}", render_line(&entry.state));
            entry.last_print = Some(now);
        }
    }

    fn finalize(&self, id: IndicatorId, state: IndicatorState) -> IndicatorId {
        self.entries().remove(&id);
        println!("{}", render_line(&state));
        for action in &state.actions {
            println!("  {}: {}", action.label, action.command);
        }
        id
    }
}
