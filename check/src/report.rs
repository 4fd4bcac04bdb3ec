//! Run report: every divergence found across one replayed range.

use std::fmt;

use chaindiff_types::{FeeViolation, OutPoint};
use chaindiff_utils::format_duration;

use crate::ConsistencyError;

/// Which of the two nodes a finding is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeSide {
    Release,
    Test,
}

impl fmt::Display for NodeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeSide::Release => write!(f, "release"),
            NodeSide::Test => write!(f, "test"),
        }
    }
}

/// One divergence discovered during a run.
///
/// Consistency findings involve both nodes at once; fee, missing-output
/// and supply findings belong to one node's ledger replay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    Consistency(ConsistencyError),
    Fee {
        node: NodeSide,
        violation: FeeViolation,
    },
    MissingOutput {
        node: NodeSide,
        outpoint: OutPoint,
        order: u64,
        hash: String,
    },
    SupplyMismatch {
        node: NodeSide,
        total_unspent: u64,
        expected: u64,
        blocks_verified: u64,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Consistency(err) => write!(f, "{err}"),
            Violation::Fee { node, violation } => write!(f, "[{node}] {violation}"),
            Violation::MissingOutput {
                node,
                outpoint,
                order,
                hash,
            } => write!(
                f,
                "[{node}] missing output {outpoint} referenced at order={order} hash={hash}"
            ),
            Violation::SupplyMismatch {
                node,
                total_unspent,
                expected,
                blocks_verified,
            } => write!(
                f,
                "[{node}] supply mismatch after {blocks_verified} blocks: \
                 unspent total={total_unspent}, expected={expected}"
            ),
        }
    }
}

/// Outcome of one full verification run.
#[derive(Clone, Debug, Default)]
pub struct VerificationReport {
    pub release_version: String,
    pub test_version: String,
    pub start_order: u64,
    pub blocks_verified: u64,
    /// Order of the last pair that went through the checks, whether or
    /// not they passed.
    pub last_order: u64,
    pub elapsed_secs: u64,
    pub violations: Vec<Violation>,
}

impl VerificationReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Multi-line human-readable summary, one line per finding.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "verified {} blocks from order {} in {} (release={}, test={}): {}",
            self.blocks_verified,
            self.start_order,
            format_duration(self.elapsed_secs),
            self.release_version,
            self.test_version,
            if self.is_clean() {
                "no divergence".to_string()
            } else {
                format!("{} violation(s)", self.violations.len())
            }
        );
        for violation in &self.violations {
            out.push('\n');
            out.push_str(&violation.to_string());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_report_summary_is_one_line() {
        let report = VerificationReport {
            release_version: "0.10.1".into(),
            test_version: "0.10.2-dev".into(),
            start_order: 0,
            blocks_verified: 100,
            last_order: 99,
            elapsed_secs: 90,
            violations: vec![],
        };
        assert!(report.is_clean());
        let summary = report.summary();
        assert_eq!(summary.lines().count(), 1);
        assert!(summary.contains("100 blocks"));
        assert!(summary.contains("no divergence"));
    }

    #[test]
    fn summary_lists_each_violation() {
        let report = VerificationReport {
            blocks_verified: 10,
            violations: vec![
                Violation::Consistency(ConsistencyError::ColorMismatch {
                    order: 4,
                    release: 1,
                    test: 0,
                }),
                Violation::Fee {
                    node: NodeSide::Test,
                    violation: FeeViolation {
                        block_hash: "h7".into(),
                        block_order: 7,
                        reported_coinbase: 5,
                        computed_fee: 9,
                    },
                },
            ],
            ..Default::default()
        };
        let summary = report.summary();
        assert_eq!(summary.lines().count(), 3);
        assert!(summary.contains("isBlue mismatch at order 4"));
        assert!(summary.contains("[test] wrong fee at block order=7"));
    }
}
