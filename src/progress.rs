//! Running product count with elapsed / remaining time estimates.

use chrono::{DateTime, Local};
use log::info;

/// Elapsed time below this counts as zero for the remaining-time estimate.
const MIN_ELAPSED_SECS: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub processed: u64,
    pub estimated_total: u64,
    pub elapsed_secs: f64,
    /// `None` until some measurable time has passed.
    pub remaining_secs: Option<f64>,
}

impl std::fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} products | {:.2} sec elapsed | ",
            self.processed, self.estimated_total, self.elapsed_secs
        )?;
        match self.remaining_secs {
            Some(secs) => write!(f, "{secs:.2} sec remaining"),
            None => write!(f, "? sec remaining"),
        }
    }
}

#[derive(Debug)]
pub struct ProgressReporter {
    processed: u64,
    estimated_total: u64,
    started: DateTime<Local>,
}

impl ProgressReporter {
    pub fn new(estimated_total: u64) -> Self {
        Self::starting_at(estimated_total, Local::now())
    }

    pub fn starting_at(estimated_total: u64, started: DateTime<Local>) -> Self {
        Self {
            processed: 0,
            estimated_total,
            started,
        }
    }

    pub fn record_processed(&mut self) {
        self.processed += 1;
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Logs the current snapshot.
    pub fn report(&self) -> ProgressSnapshot {
        let snapshot = self.snapshot_at(Local::now());
        info!("{snapshot}");
        snapshot
    }

    /// remaining = (estimated_total - processed) * (processed / elapsed)
    pub fn snapshot_at(&self, now: DateTime<Local>) -> ProgressSnapshot {
        let elapsed_secs = (now - self.started)
            .num_microseconds()
            .map(|n| n as f64 / 1_000_000.0)
            .unwrap_or(0.0)
            .max(0.0);

        let remaining_secs = (elapsed_secs >= MIN_ELAPSED_SECS).then(|| {
            let left = self.estimated_total.saturating_sub(self.processed) as f64;
            left * (self.processed as f64 / elapsed_secs)
        });

        ProgressSnapshot {
            processed: self.processed,
            estimated_total: self.estimated_total,
            elapsed_secs,
            remaining_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_zero_elapsed_has_no_estimate() {
        let start = Local::now();
        let mut progress = ProgressReporter::starting_at(100, start);
        progress.record_processed();

        let snap = progress.snapshot_at(start);
        assert_eq!(snap.processed, 1);
        assert_eq!(snap.elapsed_secs, 0.0);
        assert_eq!(snap.remaining_secs, None);
        assert!(snap.to_string().ends_with("? sec remaining"));
    }

    #[test]
    fn test_estimate() {
        let start = Local::now();
        let mut progress = ProgressReporter::starting_at(100, start);
        for _ in 0..20 {
            progress.record_processed();
        }

        let snap = progress.snapshot_at(start + Duration::seconds(10));
        assert_eq!(snap.elapsed_secs, 10.0);
        assert_eq!(snap.remaining_secs, Some(80.0 * 2.0));
        assert_eq!(
            snap.to_string(),
            "20/100 products | 10.00 sec elapsed | 160.00 sec remaining"
        );
    }

    #[test]
    fn test_overshooting_estimate() {
        let start = Local::now();
        let mut progress = ProgressReporter::starting_at(1, start);
        progress.record_processed();
        progress.record_processed();

        let snap = progress.snapshot_at(start + Duration::seconds(1));
        assert_eq!(snap.remaining_secs, Some(0.0));
    }
}
