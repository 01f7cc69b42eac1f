use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Terminator};
use std::{
    cell::RefCell,
    io::{Chain, Read},
};

use crate::{
    core::item::{ItemReader, ItemReaderResult, RejectedRow, Row},
    error::RowError,
};

/// Reads `(barcode, value)` rows from comma-delimited text.
///
/// Rows come out in file order and each is read exactly once. A line that
/// cannot become a [`Row`] is returned as a [`RejectedRow`] and reading
/// carries on with the next line. Blank lines are skipped without a trace
/// but still count when numbering, as do header lines.
///
/// A quoted value may span several lines; it is still one row.
///
/// # Examples
///
/// ```
/// use alma_batch_rs::item::csv::csv_reader::RowReaderBuilder;
/// use alma_batch_rs::core::item::ItemReader;
///
/// let reader = RowReaderBuilder::new().from_reader("B001,note A\nBADROW\n".as_bytes());
///
/// let first = reader.read().unwrap().unwrap();
/// assert_eq!((first.number, first.barcode.as_str()), (1, "B001"));
///
/// let rejected = reader.read().unwrap().unwrap_err();
/// assert_eq!(rejected.number, 2);
///
/// assert!(reader.read().is_none());
/// ```
pub struct RowReader<R> {
    records: RefCell<StringRecordsIntoIter<Chain<R, &'static [u8]>>>,
    numbering: RefCell<Numbering>,
}

/// Spreadsheet row numbering over physical lines.
///
/// Every record is terminated by a consumed `\n`, so the lines the reader
/// moved past while reading a record are the blank lines before it, the
/// line breaks inside its quoted fields and its own terminator.
#[derive(Debug)]
struct Numbering {
    /// Number of the last row handed out.
    row: usize,
    /// Reader line after the last record.
    line: u64,
}

impl Default for Numbering {
    fn default() -> Self {
        Self { row: 0, line: 1 }
    }
}

impl Numbering {
    fn next(&mut self, reader_line: u64, line_breaks: u64) -> usize {
        let consumed = reader_line.saturating_sub(self.line);
        self.line = reader_line;
        self.row += consumed.saturating_sub(line_breaks).max(1) as usize;
        self.row
    }
}

impl<R: Read> ItemReader<Row> for RowReader<R> {
    fn read(&self) -> ItemReaderResult<Row> {
        loop {
            let mut records = self.records.borrow_mut();
            let result = records.next()?;
            let reader_line = records.reader().position().line();
            drop(records);

            match result {
                Ok(record) => {
                    let number = self
                        .numbering
                        .borrow_mut()
                        .next(reader_line, line_breaks(&record));
                    if record.len() == 1 && record[0].trim().is_empty() {
                        continue;
                    }
                    return Some(to_row(number, &record));
                }
                Err(error) => {
                    let number = self.numbering.borrow_mut().next(reader_line, 0);
                    return Some(Err(RejectedRow {
                        number,
                        barcode: String::new(),
                        error: RowError::Parse(error.to_string()),
                    }));
                }
            }
        }
    }
}

/// Line breaks inside quoted fields.
fn line_breaks(record: &StringRecord) -> u64 {
    record
        .iter()
        .map(|field| field.matches('\n').count() as u64)
        .sum()
}

fn to_row(number: usize, record: &StringRecord) -> Result<Row, RejectedRow> {
    let barcode = record.get(0).unwrap_or_default().trim().to_string();

    if record.len() < 2 {
        return Err(RejectedRow {
            number,
            barcode,
            error: RowError::Parse(format!("expected 2 columns, found {}", record.len())),
        });
    }

    if barcode.is_empty() {
        return Err(RejectedRow {
            number,
            barcode,
            error: RowError::Parse("empty barcode".to_string()),
        });
    }

    Ok(Row {
        number,
        barcode,
        value: record.get(1).unwrap_or_default().trim().to_string(),
    })
}

/// A builder for configuring row reading.
///
/// Defaults: comma delimiter, no header line.
pub struct RowReaderBuilder {
    delimiter: u8,
    has_headers: bool,
}

impl Default for RowReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RowReaderBuilder {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            has_headers: false,
        }
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Skips the first line. Uploaded tables normally have no header.
    pub fn has_headers(mut self, yes: bool) -> Self {
        self.has_headers = yes;
        self
    }

    pub fn from_reader<R: Read>(self, rdr: R) -> RowReader<R> {
        // fields are trimmed in to_row, after line breaks are counted;
        // the extra newline terminates a last line that has none
        let rdr = ReaderBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .delimiter(self.delimiter)
            .has_headers(self.has_headers)
            // rows of any width reach to_row, which reports short ones
            .flexible(true)
            .from_reader(rdr.chain(&b"\n"[..]));

        RowReader {
            records: RefCell::new(rdr.into_records()),
            numbering: RefCell::new(Numbering::default()),
        }
    }
}
