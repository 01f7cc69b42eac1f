/// CSV support for the uploaded two-column table.
///
/// Column 1 holds the item barcode, column 2 the replacement value for the
/// field being edited. There is no header line and no schema beyond those two
/// positions.
///
/// The reader works on text that has already been decoded, see
/// [`crate::item::encoding`].
///
/// # Example
///
/// ```
/// use alma_batch_rs::item::csv::csv_reader::RowReaderBuilder;
/// use alma_batch_rs::core::item::ItemReader;
///
/// let csv = "B001,new note A\nB002,new note B\n";
/// let reader = RowReaderBuilder::new().delimiter(b',').from_reader(csv.as_bytes());
///
/// let mut barcodes = Vec::new();
/// while let Some(Ok(row)) = reader.read() {
///     barcodes.push(row.barcode);
/// }
///
/// assert_eq!(barcodes, vec!["B001", "B002"]);
/// ```

/// A module providing facilities for reading rows.
pub mod csv_reader;
