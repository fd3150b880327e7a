//! Aggregate counts for one validation pass.

use serde::Serialize;

use crate::validate::IssuePolicy;

/// How many issues one required column contributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnIssues {
    /// Required column name.
    pub column: &'static str,
    /// Issues attributed to it under the run's policy.
    pub missing: usize,
}

/// Counts produced once per run.
///
/// `valid_rows` and `invalid_rows` are policy-independent: a row is valid
/// when every required column is present and non-empty. `issue_count` and
/// `rows_written` depend on the policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Policy the counts were produced under.
    pub policy: IssuePolicy,
    /// Data rows parsed from the source (header excluded).
    pub rows_read: usize,
    /// Rows with every required column present and non-empty.
    pub valid_rows: usize,
    /// Rows with at least one missing or empty required column.
    pub invalid_rows: usize,
    /// Validation issues, counted per the policy.
    pub issue_count: usize,
    /// Rows emitted to the curated output.
    pub rows_written: usize,
    /// Per-column issue attribution, in required-column order, zero entries omitted.
    pub missing_by_column: Vec<ColumnIssues>,
}

impl ValidationReport {
    /// An empty report for `policy`.
    pub fn new(policy: IssuePolicy) -> Self {
        Self {
            policy,
            rows_read: 0,
            valid_rows: 0,
            invalid_rows: 0,
            issue_count: 0,
            rows_written: 0,
            missing_by_column: Vec::new(),
        }
    }

    /// The "total rows processed" figure shown to operators.
    ///
    /// Count-all reports the number of rows written. Reject-first reports
    /// kept rows plus issues, which equals rows read because each rejected
    /// row carries exactly one issue.
    pub fn total_processed(&self) -> usize {
        match self.policy {
            IssuePolicy::CountAll => self.rows_written,
            IssuePolicy::RejectFirst => self.rows_written + self.issue_count,
        }
    }

    pub(crate) fn attribute(&mut self, column: &'static str) {
        match self
            .missing_by_column
            .iter_mut()
            .find(|entry| entry.column == column)
        {
            Some(entry) => entry.missing += 1,
            None => self.missing_by_column.push(ColumnIssues { column, missing: 1 }),
        }
    }

    pub(crate) fn sort_columns(&mut self, order: &[&'static str]) {
        self.missing_by_column
            .sort_by_key(|entry| order.iter().position(|c| *c == entry.column));
    }
}
