//! Plot-chain completion tracking (`nc`).
//!
//! The backend reports which plot points of the current scene have fired as a
//! list of `[entry, completed]` pairs. Entries are matched against the authored
//! chain text by exact string equality: no trimming, no case folding.

use serde::{Deserialize, Serialize};

/// One `[entry, completed]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainMark(pub String, pub bool);

impl ChainMark {
    pub fn new(entry: impl Into<String>, completed: bool) -> Self {
        Self(entry.into(), completed)
    }

    pub fn entry(&self) -> &str {
        &self.0
    }

    pub fn completed(&self) -> bool {
        self.1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainProgress(Vec<ChainMark>);

impl ChainProgress {
    pub fn new(marks: Vec<ChainMark>) -> Self {
        Self(marks)
    }

    /// True iff some pair is exactly `(entry, true)`.
    pub fn is_completed(&self, entry: &str) -> bool {
        self.0.iter().any(|mark| mark.completed() && mark.entry() == entry)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
