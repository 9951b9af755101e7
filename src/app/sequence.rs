//! Ordering for overlapping background loads.

/// Stamps loads and decides which completions may be applied.
///
/// A completion is applied only if it carries the most recently issued
/// stamp and is newer than whatever was applied last.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadSequencer {
    issued: u64,
    applied: u64,
}

impl LoadSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a new load.
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Whether the completion stamped `sequence` should be applied.
    pub fn accept(&mut self, sequence: u64) -> bool {
        if sequence == self.issued && sequence > self.applied {
            self.applied = sequence;
            true
        } else {
            false
        }
    }

    pub fn latest_issued(&self) -> u64 {
        self.issued
    }

    /// True while the latest issued load has not completed.
    pub fn in_flight(&self) -> bool {
        self.issued > self.applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_completion_is_rejected() {
        let mut seq = LoadSequencer::new();
        let first = seq.issue();
        let second = seq.issue();
        assert!(seq.in_flight());

        assert!(seq.accept(second));
        assert!(!seq.accept(first));
        assert!(!seq.in_flight());
    }

    #[test]
    fn older_load_finishing_first_is_still_stale() {
        let mut seq = LoadSequencer::new();
        let first = seq.issue();
        let second = seq.issue();

        assert!(!seq.accept(first));
        assert!(seq.in_flight());
        assert!(seq.accept(second));
    }

    #[test]
    fn duplicate_completion_is_ignored() {
        let mut seq = LoadSequencer::new();
        let only = seq.issue();
        assert!(seq.accept(only));
        assert!(!seq.accept(only));
        assert_eq!(seq.latest_issued(), 1);
    }
}
