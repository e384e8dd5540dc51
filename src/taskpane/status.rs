//! The single status line shown under the search box.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use super::Pane;

/// Everything the task pane ever reports to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    LoadFailed,
    Searching,
    Found(usize),
    SearchFailed,
    Fetching,
    Inserting,
    Inserted,
    Error(String),
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoadFailed => f.write_str("Could not load slides."),
            Self::Searching => f.write_str("Searching..."),
            Self::Found(1) => f.write_str("1 slide found"),
            Self::Found(n) => write!(f, "{n} slides found"),
            Self::SearchFailed => f.write_str("Search failed."),
            Self::Fetching => f.write_str("Fetching template..."),
            Self::Inserting => f.write_str("Inserting slide..."),
            Self::Inserted => f.write_str("Slide inserted!"),
            Self::Error(msg) => write!(f, "Error: {msg}"),
        }
    }
}

struct Current {
    generation: u64,
    text: String,
}

/// Writes status text to the pane and remembers what is showing, so a delayed
/// clear only removes the message it was scheduled for.
pub struct StatusLine {
    pane: Arc<dyn Pane>,
    current: Mutex<Current>,
}

impl StatusLine {
    pub fn new(pane: Arc<dyn Pane>) -> Self {
        Self {
            pane,
            current: Mutex::new(Current {
                generation: 0,
                text: String::new(),
            }),
        }
    }

    /// Show `status`; returns the generation of this message.
    pub fn set(&self, status: Status) -> u64 {
        self.write(status.to_string())
    }

    pub fn clear(&self) -> u64 {
        self.write(String::new())
    }

    pub fn text(&self) -> String {
        self.lock().text.clone()
    }

    /// Clear the line after `delay` unless a newer message was written since.
    pub fn clear_after(self: &Arc<Self>, generation: u64, delay: Duration) -> JoinHandle<()> {
        let line = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut current = line.lock();
            if current.generation == generation {
                current.generation += 1;
                current.text.clear();
                line.pane.set_status("");
            }
        })
    }

    fn write(&self, text: String) -> u64 {
        let mut current = self.lock();
        current.generation += 1;
        self.pane.set_status(&text);
        current.text = text;
        current.generation
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Current> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}
