//! # CSV Table Codec
//!
//! Parses the source object into a [`Table`] (header + positional rows) and
//! re-encodes a table as CSV.
//!
//! ## Input dialect
//!
//! Comma delimiter, `"` quoting with doubled-quote escaping, first record is
//! the header. Rows may be shorter or longer than the header; blank lines are
//! skipped but still counted when rows record their source line. Quoting is
//! lenient in the way of the `csv` reader: stray quotes are dropped and an
//! unterminated quote runs to the end of the text. A leading UTF-8 byte-order mark is ignored so that spreadsheet
//! exports do not turn `order_id` into an unknown column.
//!
//! ## Output dialect
//!
//! The header line is always written, even for an empty table. Each row is
//! written with exactly the header's width: absent trailing cells become
//! empty fields, cells beyond the header are dropped. Fields are quoted only
//! when they contain the delimiter, a quote, or a line break. Records end in
//! CRLF. Encoding is deterministic, so the same table always yields the same
//! bytes.

use std::collections::HashMap;

use csv::{ReaderBuilder, Terminator, WriterBuilder};

use crate::error::CurateError;

const BOM: char = '\u{feff}';

/// Ordered column names taken from the first line of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl Header {
    /// Build a header. When a name repeats, lookups resolve to its last
    /// occurrence.
    pub fn new(columns: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(columns.len());
        for (pos, name) in columns.iter().enumerate() {
            index.insert(name.clone(), pos);
        }
        Self { columns, index }
    }

    /// Column names in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when the header declares no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of `name`, if the header declares it.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// The cell of `row` under column `name`.
    ///
    /// `None` when the header lacks the column or the row is too short to
    /// reach it. An empty cell is `Some("")`.
    pub fn value<'r>(&self, row: &'r Row, name: &str) -> Option<&'r str> {
        self.position(name).and_then(|pos| row.cell(pos))
    }
}

/// One data record, positionally aligned with the [`Header`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    line: u64,
    cells: Vec<String>,
}

impl Row {
    /// Build a row read from source line `line` (1-based; 0 if synthetic).
    pub fn new(line: u64, cells: Vec<String>) -> Self {
        Self { line, cells }
    }

    /// Source line the record started on.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Cells as read, without padding or truncation.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// The cell at `pos`, or `None` past the end of the record.
    pub fn cell(&self, pos: usize) -> Option<&str> {
        self.cells.get(pos).map(String::as_str)
    }
}

/// A header and its rows, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    header: Header,
    rows: Vec<Row>,
}

impl Table {
    /// Assemble a table from parts.
    pub fn new(header: Header, rows: Vec<Row>) -> Self {
        Self { header, rows }
    }

    /// Parse CSV text.
    ///
    /// # Errors
    ///
    /// [`CurateError::MissingHeader`] when the text holds no records at all.
    /// Quoting is lenient: an unterminated quote runs to the end of the text
    /// and a stray quote inside a field is dropped, so in-memory text does
    /// not normally produce [`CurateError::MalformedCsv`].
    pub fn parse(text: &str) -> Result<Self, CurateError> {
        let text = text.strip_prefix(BOM).unwrap_or(text);
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let header = reader.headers().map_err(malformed)?.clone();
        if header.is_empty() {
            return Err(CurateError::MissingHeader);
        }
        let header = Header::new(header.iter().map(str::to_string).collect());

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(malformed)?;
            let line = record
                .position()
                .map(|p| line_at(text, p.byte()))
                .unwrap_or(0);
            rows.push(Row::new(line, record.iter().map(str::to_string).collect()));
        }

        tracing::debug!(
            columns = header.len(),
            rows = rows.len(),
            "parsed source table"
        );

        Ok(Self { header, rows })
    }

    /// The header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Rows in source order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Split into header and rows.
    pub fn into_parts(self) -> (Header, Vec<Row>) {
        (self.header, self.rows)
    }

    /// Encode as CSV using the header's column order.
    pub fn to_csv(&self) -> Result<Vec<u8>, CurateError> {
        let width = self.header.len();
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .from_writer(Vec::new());

        writer
            .write_record(self.header.columns())
            .map_err(|e| CurateError::Serialize(e.to_string()))?;

        for row in &self.rows {
            if row.cells.len() > width {
                tracing::warn!(
                    line = row.line,
                    extra = row.cells.len() - width,
                    "dropping cells beyond the header"
                );
            }
            writer
                .write_record((0..width).map(|pos| row.cell(pos).unwrap_or("")))
                .map_err(|e| CurateError::Serialize(e.to_string()))?;
        }

        writer
            .into_inner()
            .map_err(|e| CurateError::Serialize(e.to_string()))
    }
}

/// Physical 1-based line of the record whose scan starts at `byte`.
///
/// The reader reports a record's position before it skips blank lines, and
/// its own line counter ignores them, so the line is recounted from the text.
fn line_at(text: &str, byte: u64) -> u64 {
    let bytes = text.as_bytes();
    let mut start = usize::try_from(byte).map_or(bytes.len(), |b| b.min(bytes.len()));
    while matches!(bytes.get(start), Some(b'\r' | b'\n')) {
        start += 1;
    }
    bytes[..start].iter().filter(|&&b| b == b'\n').count() as u64 + 1
}

fn malformed(err: csv::Error) -> CurateError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    CurateError::MalformedCsv { line, source: err }
}
