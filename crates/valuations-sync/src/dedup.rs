//! In-run memory of external property IDs already offered to the reconciler.
//!
//! Upstream pagination can repeat a record on consecutive pages. The guard
//! lets only the first sighting through, whatever its outcome. It lives for
//! one run and is dropped with it.

use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct DedupGuard {
    seen: HashSet<u64>,
}

impl DedupGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` as seen. Returns `true` only the first time.
    pub fn first_sighting(&mut self, id: u64) -> bool {
        self.seen.insert(id)
    }

    /// Distinct IDs seen so far.
    pub(crate) fn len(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sighting_only_once() {
        let mut guard = DedupGuard::new();
        assert_eq!(guard.len(), 0);

        assert!(guard.first_sighting(10));
        assert!(guard.first_sighting(11));
        assert!(!guard.first_sighting(10));

        assert_eq!(guard.len(), 2);
    }
}
