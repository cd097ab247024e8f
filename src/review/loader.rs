//! Guard against re-fetch races. A screen refocus can start a new card fetch
//! while an earlier one is still in flight; without cancellation, the slower
//! stale response could overwrite the newer one. Tag each fetch with a
//! generation and drop completions from superseded generations.

#[derive(Debug, Default)]
pub struct LoadGuard {
    current: u64,
}

impl LoadGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new load, superseding all earlier ones. Returns its generation.
    pub fn begin(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    /// True when a completion for `generation` is still the latest and its
    /// result should be applied.
    #[must_use]
    pub fn accept(&self, generation: u64) -> bool {
        generation == self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_generation_is_accepted() {
        let mut guard = LoadGuard::new();
        let generation = guard.begin();
        assert!(guard.accept(generation));
    }

    #[test]
    fn superseded_generation_is_discarded() {
        let mut guard = LoadGuard::new();
        let first = guard.begin();
        let second = guard.begin();

        // The slower first response arrives after the refocus fetch.
        assert!(!guard.accept(first));
        assert!(guard.accept(second));
    }

    #[test]
    fn completions_do_not_close_the_window() {
        let mut guard = LoadGuard::new();
        let generation = guard.begin();
        assert!(guard.accept(generation));
        // Accept is idempotent until a new load begins.
        assert!(guard.accept(generation));
    }
}
