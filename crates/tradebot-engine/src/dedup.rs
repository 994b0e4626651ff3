//! Duplicate-cycle suppression.

use tradebot_core::types::Bar;

/// Per-bot detector suppressing repeated signal evaluation of one bar.
///
/// Holds the last processed current bar. Each check compares the new bar
/// field for field against the stored one, then overwrites the stored bar
/// whenever a current bar is present. Inactive in periodic/index mode,
/// where monotonic indices already guarantee advancement.
#[derive(Debug, Default)]
pub struct DuplicateDetector {
    last_bar: Option<Bar>,
}

impl DuplicateDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `current` repeats the previously processed bar. State is
    /// left untouched when no current bar exists.
    pub fn check(&mut self, current: Option<&Bar>) -> bool {
        let Some(bar) = current else {
            return false;
        };
        let duplicate = self.last_bar.as_ref() == Some(bar);
        self.last_bar = Some(*bar);
        duplicate
    }

    /// The last processed bar, if any.
    pub fn last_bar(&self) -> Option<&Bar> {
        self.last_bar.as_ref()
    }
}
