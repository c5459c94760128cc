//! Statistics collection and reporting
//!
//! Counts what a run attempted, what succeeded and why the rest failed.

use crate::facility::AccessError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Attempt and success counts for one operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OperationCounts {
    /// Number of calls
    pub attempts: usize,
    /// Number of calls that returned `Ok`
    pub successes: usize,
}

impl OperationCounts {
    /// Calls that returned an error
    pub fn failures(&self) -> usize {
        self.attempts - self.successes
    }
}

/// Statistics for one drill or handover run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStatistics {
    /// Steps executed
    pub steps: usize,
    /// Per-operation counts, keyed by operation name
    pub operations: BTreeMap<&'static str, OperationCounts>,
    /// Failure counts keyed by error label
    pub failures_by_error: BTreeMap<&'static str, usize>,
    /// Failure counts keyed by error category
    pub failures_by_category: BTreeMap<String, usize>,
    /// Successful entries
    pub entries: usize,
    /// Successful exits
    pub exits: usize,
    /// Guard seats that changed hands
    pub seats_handed_over: usize,
    /// Invariant checks that passed
    pub invariant_checks: usize,
    /// Highest occupancy observed
    pub peak_occupancy: usize,
    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl RunStatistics {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one operation
    pub fn record<T>(&mut self, operation: &'static str, outcome: &Result<T, AccessError>) {
        let counts = self.operations.entry(operation).or_default();
        counts.attempts += 1;

        match outcome {
            Ok(_) => counts.successes += 1,
            Err(error) => {
                *self.failures_by_error.entry(error.label()).or_default() += 1;
                *self.failures_by_category.entry(error.category().to_string()).or_default() += 1;
            }
        }
    }

    /// Counts for one operation
    pub fn operation(&self, operation: &str) -> OperationCounts {
        self.operations.get(operation).copied().unwrap_or_default()
    }

    /// Update the occupancy high-water mark
    pub fn observe_occupancy(&mut self, occupancy: usize) {
        self.peak_occupancy = self.peak_occupancy.max(occupancy);
    }

    /// Total calls made
    pub fn total_attempts(&self) -> usize {
        self.operations.values().map(|c| c.attempts).sum()
    }

    /// Total calls that succeeded
    pub fn total_successes(&self) -> usize {
        self.operations.values().map(|c| c.successes).sum()
    }

    /// Total calls that failed
    pub fn total_failures(&self) -> usize {
        self.total_attempts() - self.total_successes()
    }

    /// Percentage of calls that succeeded
    pub fn success_percentage(&self) -> f64 {
        let total = self.total_attempts();
        if total > 0 {
            (self.total_successes() as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        format!(
            "Run Summary: {} steps | {} calls | Success: {} ({:.1}%) | Failures: {} | Entries: {} | Exits: {} | Seats handed over: {}",
            self.steps,
            self.total_attempts(),
            self.total_successes(),
            self.success_percentage(),
            self.total_failures(),
            self.entries,
            self.exits,
            self.seats_handed_over
        )
    }

    /// Multi-line breakdown by operation and failure reason
    pub fn detailed_breakdown(&self) -> String {
        let mut breakdown = String::new();
        breakdown.push_str("=== Operation Breakdown ===\n");
        for (name, counts) in &self.operations {
            breakdown.push_str(&format!(
                "  {:<24} {:>6} calls  {:>6} ok  {:>6} failed\n",
                name,
                counts.attempts,
                counts.successes,
                counts.failures()
            ));
        }

        if !self.failures_by_error.is_empty() {
            breakdown.push_str("\n=== Failure Reasons ===\n");
            for (label, count) in &self.failures_by_error {
                breakdown.push_str(&format!("  {:<24} {:>6}\n", label, count));
            }

            breakdown.push_str("\n=== Failure Categories ===\n");
            for (category, count) in &self.failures_by_category {
                breakdown.push_str(&format!("  {:<24} {:>6}\n", category, count));
            }
        }

        breakdown.push_str(&format!(
            "\nPeak occupancy: {} | Invariant checks passed: {} | Duration: {:.2?}\n",
            self.peak_occupancy, self.invariant_checks, self.duration
        ));

        breakdown
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
