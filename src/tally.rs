//! Result accounting.
//!
//! `DirTally` is scoped to one directory's direct candidate files and is
//! dropped after that directory reports; subdirectory results never feed
//! an ancestor's numbers. `ScanStats` carries run-level counts for the
//! end-of-run diagnostics only.

/// Success/failure counters for one directory's direct candidate files.
#[derive(Debug, Clone, Default)]
pub struct DirTally {
    passed: usize,
    failed: usize,
}

impl DirTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_pass(&mut self) {
        self.passed += 1;
    }

    pub fn record_fail(&mut self) {
        self.failed += 1;
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }
}

/// Run-level counters across all reported directories.
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    pub directories: usize,
    pub files: usize,
    pub passed: usize,
    pub failed: usize,
}

impl ScanStats {
    /// Fold one finished directory tally into the run totals.
    pub fn absorb(&mut self, tally: &DirTally) {
        self.directories += 1;
        self.files += tally.total();
        self.passed += tally.passed();
        self.failed += tally.failed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_tally_new() {
        let tally = DirTally::new();
        assert_eq!(tally.passed(), 0);
        assert_eq!(tally.failed(), 0);
        assert_eq!(tally.total(), 0);
    }

    #[test]
    fn test_dir_tally_record_pass() {
        let mut tally = DirTally::new();
        tally.record_pass();
        assert_eq!(tally.passed(), 1);
        assert_eq!(tally.failed(), 0);
        assert_eq!(tally.total(), 1);
    }

    #[test]
    fn test_dir_tally_record_fail() {
        let mut tally = DirTally::new();
        tally.record_fail();
        assert_eq!(tally.passed(), 0);
        assert_eq!(tally.failed(), 1);
        assert_eq!(tally.total(), 1);
    }

    #[test]
    fn test_dir_tally_mixed() {
        let mut tally = DirTally::new();
        tally.record_pass();
        tally.record_pass();
        tally.record_fail();
        assert_eq!(tally.passed(), 2);
        assert_eq!(tally.failed(), 1);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_fresh_tally_per_directory_does_not_inherit() {
        let mut first = DirTally::new();
        first.record_pass();
        first.record_fail();

        let second = DirTally::new();
        assert_eq!(second.total(), 0, "a new directory starts from zero");
        assert_eq!(first.total(), 2);
    }

    #[test]
    fn test_scan_stats_absorb() {
        let mut a = DirTally::new();
        a.record_pass();
        a.record_fail();
        let mut b = DirTally::new();
        b.record_pass();

        let mut stats = ScanStats::default();
        stats.absorb(&a);
        stats.absorb(&b);

        assert_eq!(stats.directories, 2);
        assert_eq!(stats.files, 3);
        assert_eq!(stats.passed, 2);
        assert_eq!(stats.failed, 1);
    }
}
