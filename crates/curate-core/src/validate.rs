//! # Row Validator/Filter
//!
//! Presence validation of required columns, under one of two issue
//! policies. The policies disagree on both counting and filtering and are
//! not interchangeable:
//!
//! | Policy | Checks per row | Issues per invalid row | Invalid rows in output |
//! |--------|----------------|------------------------|------------------------|
//! | [`IssuePolicy::CountAll`] | every required column | one per missing column | kept |
//! | [`IssuePolicy::RejectFirst`] | stops at first missing | exactly one | dropped |
//!
//! A required column is *missing* when the header does not declare it, the
//! row is too short to reach it, or its cell is exactly the empty string.
//! Whitespace-only cells are present.
//!
//! Row-level problems are never errors: they are counted, attributed to a
//! column, and logged at `debug`.

use serde::Serialize;

use crate::columns::RequiredColumns;
use crate::report::ValidationReport;
use crate::table::{Header, Row, Table};

/// How validation issues are counted and whether invalid rows survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssuePolicy {
    /// Count every missing required column; keep every row.
    CountAll,
    /// Count one issue per invalid row and drop it.
    #[default]
    RejectFirst,
}

impl IssuePolicy {
    /// Stable name, as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CountAll => "count-all",
            Self::RejectFirst => "reject-first",
        }
    }

    /// Whether invalid rows are removed from the output.
    pub fn drops_invalid(&self) -> bool {
        matches!(self, Self::RejectFirst)
    }
}

impl std::fmt::Display for IssuePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of checking one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowVerdict {
    missing: Vec<&'static str>,
}

impl RowVerdict {
    /// True when no required column was found missing.
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }

    /// Issues this row contributes to the run's count.
    pub fn issues(&self) -> usize {
        self.missing.len()
    }

    /// Missing columns observed. Under reject-first this holds at most one.
    pub fn missing(&self) -> &[&'static str] {
        &self.missing
    }
}

/// Check a single row against the required columns.
pub fn check_row(
    header: &Header,
    row: &Row,
    columns: &RequiredColumns,
    policy: IssuePolicy,
) -> RowVerdict {
    let mut missing = Vec::new();
    for &name in columns.names() {
        if matches!(header.value(row, name), None | Some("")) {
            missing.push(name);
            if policy == IssuePolicy::RejectFirst {
                break;
            }
        }
    }
    RowVerdict { missing }
}

/// A validated table and its counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curated {
    /// Output table: the source header and the surviving rows, in order.
    pub table: Table,
    /// Counts for the pass.
    pub report: ValidationReport,
}

/// Validate every row of `table` and apply the policy's filtering.
pub fn validate(table: Table, columns: &RequiredColumns, policy: IssuePolicy) -> Curated {
    let (header, rows) = table.into_parts();

    let undeclared = columns.absent_from(&header);
    if !undeclared.is_empty() {
        tracing::warn!(
            columns = ?undeclared,
            "header lacks required columns; every row will fail validation"
        );
    }

    let mut report = ValidationReport::new(policy);
    let mut kept = Vec::with_capacity(rows.len());

    for row in rows {
        report.rows_read += 1;
        let verdict = check_row(&header, &row, columns, policy);

        if verdict.is_valid() {
            report.valid_rows += 1;
        } else {
            report.invalid_rows += 1;
            report.issue_count += verdict.issues();
            for &column in verdict.missing() {
                report.attribute(column);
            }
            tracing::debug!(
                line = row.line(),
                missing = ?verdict.missing(),
                "row failed required-column check"
            );
        }

        if verdict.is_valid() || !policy.drops_invalid() {
            kept.push(row);
        }
    }

    report.rows_written = kept.len();
    report.sort_columns(columns.names());

    debug_assert_eq!(report.rows_read, report.valid_rows + report.invalid_rows);
    debug_assert!(
        policy != IssuePolicy::RejectFirst
            || report.rows_written + report.issue_count == report.rows_read
    );

    Curated {
        table: Table::new(header, kept),
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::ORDER_COLUMNS;

    const HEADER: &str =
        "order_id,order_date,customer_id,product_name,quantity,unit_price,order_status,created_at";

    fn full_row(id: &str) -> String {
        format!("{id},2024-01-05,C-9,Widget,2,9.99,SHIPPED,2024-01-05T10:00:00Z")
    }

    fn table(rows: &[&str]) -> Table {
        let mut text = String::from(HEADER);
        text.push('\n');
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        Table::parse(&text).unwrap()
    }

    fn ids(table: &Table) -> Vec<&str> {
        table
            .rows()
            .iter()
            .map(|r| table.header().value(r, "order_id").unwrap_or(""))
            .collect()
    }

    #[test]
    fn default_policy_is_reject_first() {
        assert_eq!(IssuePolicy::default(), IssuePolicy::RejectFirst);
    }

    #[test]
    fn policy_names() {
        assert_eq!(IssuePolicy::CountAll.to_string(), "count-all");
        assert_eq!(IssuePolicy::RejectFirst.to_string(), "reject-first");
    }

    #[test]
    fn check_row_full_row_is_valid() {
        let t = table(&[&full_row("1")]);
        let v = check_row(
            t.header(),
            &t.rows()[0],
            &RequiredColumns::orders(),
            IssuePolicy::CountAll,
        );
        assert!(v.is_valid());
        assert_eq!(v.issues(), 0);
    }

    #[test]
    fn check_row_count_all_sees_every_missing_column() {
        let t = table(&["3,,C-9,,2,9.99,,x"]);
        let v = check_row(
            t.header(),
            &t.rows()[0],
            &RequiredColumns::orders(),
            IssuePolicy::CountAll,
        );
        assert_eq!(v.missing(), ["order_date", "product_name", "order_status"]);
        assert_eq!(v.issues(), 3);
    }

    #[test]
    fn check_row_reject_first_stops_at_first_missing() {
        let t = table(&["3,,C-9,,2,9.99,,x"]);
        let v = check_row(
            t.header(),
            &t.rows()[0],
            &RequiredColumns::orders(),
            IssuePolicy::RejectFirst,
        );
        assert_eq!(v.missing(), ["order_date"]);
        assert_eq!(v.issues(), 1);
    }

    #[test]
    fn short_row_counts_absent_cells_as_missing() {
        let t = table(&["4,2024-01-05,C-9"]);
        let v = check_row(
            t.header(),
            &t.rows()[0],
            &RequiredColumns::orders(),
            IssuePolicy::CountAll,
        );
        assert_eq!(v.issues(), 5);
    }

    #[test]
    fn whitespace_is_present() {
        let t = table(&[" , , , , , , , "]);
        let v = check_row(
            t.header(),
            &t.rows()[0],
            &RequiredColumns::orders(),
            IssuePolicy::CountAll,
        );
        assert!(v.is_valid());
    }

    #[test]
    fn reject_first_scenario() {
        let missing_date = "2,,C-9,Widget,2,9.99,SHIPPED,2024-01-05T10:00:00Z";
        let curated = validate(
            table(&[&full_row("1"), missing_date]),
            &RequiredColumns::orders(),
            IssuePolicy::RejectFirst,
        );
        assert_eq!(ids(&curated.table), ["1"]);
        assert_eq!(curated.report.issue_count, 1);
        assert_eq!(curated.report.total_processed(), 2);
        assert_eq!(curated.report.valid_rows, 1);
        assert_eq!(curated.report.invalid_rows, 1);
    }

    #[test]
    fn count_all_scenario() {
        let missing_date = "2,,C-9,Widget,2,9.99,SHIPPED,2024-01-05T10:00:00Z";
        let curated = validate(
            table(&[&full_row("1"), missing_date]),
            &RequiredColumns::orders(),
            IssuePolicy::CountAll,
        );
        assert_eq!(ids(&curated.table), ["1", "2"]);
        assert_eq!(curated.report.issue_count, 1);
        assert_eq!(curated.report.total_processed(), 2);
    }

    #[test]
    fn count_all_sums_missing_cells_across_rows() {
        let curated = validate(
            table(&["1,,,P,1,1,S,T", "2,D,C,P,,,,T", &full_row("3")]),
            &RequiredColumns::orders(),
            IssuePolicy::CountAll,
        );
        assert_eq!(curated.report.issue_count, 5);
        assert_eq!(curated.report.invalid_rows, 2);
        assert_eq!(curated.report.rows_written, 3);
    }

    #[test]
    fn reject_first_caps_issues_per_row() {
        let curated = validate(
            table(&["1,,,P,1,1,S,T", "2,D,C,P,,,,T", &full_row("3")]),
            &RequiredColumns::orders(),
            IssuePolicy::RejectFirst,
        );
        assert_eq!(curated.report.issue_count, 2);
        assert_eq!(ids(&curated.table), ["3"]);
    }

    #[test]
    fn missing_by_column_follows_required_order() {
        let curated = validate(
            table(&["1,D,C,P,1,1,S,", ",D,C,P,1,1,S,T", "2,D,C,P,1,1,S,"]),
            &RequiredColumns::orders(),
            IssuePolicy::CountAll,
        );
        let attributed: Vec<_> = curated
            .report
            .missing_by_column
            .iter()
            .map(|e| (e.column, e.missing))
            .collect();
        assert_eq!(attributed, [("order_id", 1), ("created_at", 2)]);
    }

    #[test]
    fn header_without_required_column_fails_every_row() {
        let t = Table::parse("order_id,other\n1,x\n2,y\n").unwrap();
        let curated = validate(t, &RequiredColumns::orders(), IssuePolicy::RejectFirst);
        assert_eq!(curated.report.rows_written, 0);
        assert_eq!(curated.report.issue_count, 2);
        assert_eq!(curated.table.header().columns(), ["order_id", "other"]);
    }

    #[test]
    fn header_only_input() {
        for policy in [IssuePolicy::CountAll, IssuePolicy::RejectFirst] {
            let curated = validate(table(&[]), &RequiredColumns::orders(), policy);
            assert_eq!(curated.report.rows_read, 0);
            assert_eq!(curated.report.issue_count, 0);
            assert_eq!(curated.report.total_processed(), 0);
            assert_eq!(curated.table.header().len(), ORDER_COLUMNS.len());
        }
    }

    #[test]
    fn custom_column_set() {
        let t = Table::parse("sku,qty\nA,\nB,2\n").unwrap();
        let curated = validate(
            t,
            &RequiredColumns::new(["sku", "qty"]),
            IssuePolicy::RejectFirst,
        );
        assert_eq!(curated.report.rows_written, 1);
    }
}
