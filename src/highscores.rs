//! Best score tracking
//!
//! Lives only as long as the process; nothing is written to storage.

use serde::{Deserialize, Serialize};

/// Best score across the runs of this process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScore {
    best: u32,
    /// Finished runs recorded so far
    runs: u32,
}

impl BestScore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished run. Returns true if it set a new best.
    pub fn record(&mut self, score: u32) -> bool {
        self.runs += 1;
        if score > self.best {
            self.best = score;
            return true;
        }
        false
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }
}
