use std::fmt;

use crate::error::RowError;

/// Outcome of one import: counts plus one error line per failed row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub filename: String,
    pub success_count: usize,
    pub failure_count: usize,
    /// In row order.
    pub errors: Vec<String>,
}

impl RunResult {
    /// Rows offered to the accumulator, failed or not.
    pub fn total(&self) -> usize {
        self.success_count + self.failure_count
    }

    /// The text delivered to the operator.
    ///
    /// ```text
    /// Results for items.csv:
    /// Error finding Barcode B999 in row 3: HTTP 404 Not Found
    /// 2 barcodes updated.
    /// 1 barcodes not updated. (See errors above.)
    /// ```
    pub fn to_report(&self) -> String {
        let mut report = format!("Results for {}:\n", self.filename);
        for line in &self.errors {
            report.push_str(line);
            report.push('\n');
        }
        report.push_str(&format!("{} barcodes updated.\n", self.success_count));
        report.push_str(&format!("{} barcodes not updated.", self.failure_count));
        if self.failure_count > 0 {
            report.push_str(" (See errors above.)");
        }
        report
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_report())
    }
}

/// Counts row outcomes as they arrive and keeps the error lines.
///
/// Consumed by [`RunAccumulator::finalize`], so no result can be taken while
/// rows are still being offered.
#[derive(Debug)]
pub struct RunAccumulator {
    filename: String,
    success_count: usize,
    failure_count: usize,
    errors: Vec<String>,
}

impl RunAccumulator {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            success_count: 0,
            failure_count: 0,
            errors: Vec::new(),
        }
    }

    pub fn offer(&mut self, row_number: usize, barcode: &str, outcome: Result<(), RowError>) {
        match outcome {
            Ok(()) => self.success_count += 1,
            Err(error) => {
                self.failure_count += 1;
                self.errors.push(error_line(row_number, barcode, &error));
            }
        }
    }

    pub fn finalize(self) -> RunResult {
        RunResult {
            filename: self.filename,
            success_count: self.success_count,
            failure_count: self.failure_count,
            errors: self.errors,
        }
    }
}

fn error_line(row_number: usize, barcode: &str, error: &RowError) -> String {
    if barcode.is_empty() {
        format!("Error {} row {}: {}", error.action(), row_number, error)
    } else {
        format!(
            "Error {} Barcode {} in row {}: {}",
            error.action(),
            barcode,
            row_number,
            error
        )
    }
}
