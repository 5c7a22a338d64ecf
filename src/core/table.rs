//! Comma-delimited data tables.
//!
//! The first line holds the headers. Fields may be wrapped in double quotes to
//! carry commas; a doubled quote inside a quoted field is a literal quote.
//! Whitespace outside quotes is trimmed, quoted content is kept verbatim.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{ChartError, ChartResult};

/// One table row keyed by column name, in the requested column order.
pub type Record = IndexMap<String, String>;

/// Column addressed by header name or by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef<'a> {
    Name(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for ColumnRef<'a> {
    fn from(value: &'a str) -> Self {
        ColumnRef::Name(value)
    }
}

impl From<usize> for ColumnRef<'_> {
    fn from(value: usize) -> Self {
        ColumnRef::Index(value)
    }
}

impl fmt::Display for ColumnRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Name(name) => f.write_str(name),
            ColumnRef::Index(index) => write!(f, "#{index}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn parse(raw: &str) -> ChartResult<Self> {
        let mut lines = raw.trim().lines().map(|line| line.trim_end_matches('\r'));
        let header_line = match lines.next() {
            Some(line) if !line.trim().is_empty() => line,
            _ => return Err(ChartError::EmptyTable),
        };
        let headers = split_line(header_line);
        let rows = lines.map(split_line).collect::<Vec<_>>();
        Ok(Self { headers, rows })
    }

    pub fn from_path(path: impl AsRef<Path>) -> ChartResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ChartError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::parse(&raw)?;
        debug!(path = %path.display(), rows = table.row_count(), "loaded data table");
        Ok(table)
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Looks up the named headers, in the given order. An empty `names` returns every header.
    pub fn headers_named(&self, names: &[&str]) -> ChartResult<Vec<&str>> {
        if names.is_empty() {
            return Ok(self.headers.iter().map(String::as_str).collect());
        }
        names
            .iter()
            .map(|name| {
                self.column_index(ColumnRef::Name(name))
                    .map(|index| self.headers[index].as_str())
            })
            .collect()
    }

    /// Cell at `row` in `column`; a negative row counts back from the end (`-1` is the last row).
    pub fn get(&self, row: isize, column: &str) -> ChartResult<&str> {
        let row_values = self.row(row)?;
        let index = self.column_index(ColumnRef::Name(column))?;
        cell(row_values, index)
    }

    pub fn get_num(&self, row: isize, column: &str) -> ChartResult<f64> {
        parse_number(self.get(row, column)?)
    }

    pub fn column<'a>(&self, column: impl Into<ColumnRef<'a>>) -> ChartResult<Vec<&str>> {
        let index = self.column_index(column.into())?;
        self.rows.iter().map(|row| cell(row, index)).collect()
    }

    /// Column parsed as numbers; any non-numeric cell is an error.
    pub fn column_nums<'a>(&self, column: impl Into<ColumnRef<'a>>) -> ChartResult<Vec<f64>> {
        self.column(column)?.into_iter().map(parse_number).collect()
    }

    /// Every row as a record of the named columns.
    pub fn rows(&self, columns: &[&str]) -> ChartResult<Vec<Record>> {
        let indices = columns
            .iter()
            .map(|name| self.column_index(ColumnRef::Name(name)).map(|index| (*name, index)))
            .collect::<ChartResult<Vec<_>>>()?;

        self.rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|(name, index)| {
                        cell(row, *index).map(|value| ((*name).to_owned(), value.to_owned()))
                    })
                    .collect::<ChartResult<Record>>()
            })
            .collect()
    }

    /// Reads wide-format data where the first column labels each row.
    ///
    /// Produces one record per remaining header column, keyed by the selected
    /// row labels (all labels when `labels` is empty).
    pub fn rows_transposed(&self, labels: &[&str]) -> ChartResult<Vec<Record>> {
        let all_labels = self.column(ColumnRef::Index(0))?;
        let selected: Vec<&str> = if labels.is_empty() {
            all_labels.clone()
        } else {
            labels.to_vec()
        };

        let label_rows = selected
            .iter()
            .map(|label| {
                all_labels
                    .iter()
                    .position(|candidate| candidate == label)
                    .map(|row| (*label, row))
                    .ok_or_else(|| ChartError::MissingColumn((*label).to_owned()))
            })
            .collect::<ChartResult<Vec<_>>>()?;

        (1..self.headers.len())
            .map(|column| {
                label_rows
                    .iter()
                    .map(|(label, row)| {
                        cell(&self.rows[*row], column)
                            .map(|value| ((*label).to_owned(), value.to_owned()))
                    })
                    .collect::<ChartResult<Record>>()
            })
            .collect()
    }

    fn row(&self, row: isize) -> ChartResult<&[String]> {
        let len = self.rows.len();
        let resolved = if row < 0 {
            len.checked_sub(row.unsigned_abs())
        } else {
            Some(row.unsigned_abs()).filter(|index| *index < len)
        };
        resolved
            .map(|index| self.rows[index].as_slice())
            .ok_or(ChartError::RowOutOfBounds { index: row, len })
    }

    fn column_index(&self, column: ColumnRef<'_>) -> ChartResult<usize> {
        match column {
            ColumnRef::Name(name) => self
                .headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| ChartError::MissingColumn(name.to_owned())),
            ColumnRef::Index(index) if index < self.headers.len() => Ok(index),
            ColumnRef::Index(_) => Err(ChartError::MissingColumn(column.to_string())),
        }
    }
}

impl FromStr for CsvTable {
    type Err = ChartError;

    fn from_str(raw: &str) -> ChartResult<Self> {
        Self::parse(raw)
    }
}

fn cell(row: &[String], index: usize) -> ChartResult<&str> {
    row.get(index).map(String::as_str).ok_or_else(|| {
        ChartError::InvalidData(format!(
            "row has {} field(s), column {index} is out of bounds",
            row.len()
        ))
    })
}

/// Numeric value of `column` in a record built by [`CsvTable::rows`].
pub fn record_num(record: &Record, column: &str) -> ChartResult<f64> {
    let value = record
        .get(column)
        .ok_or_else(|| ChartError::MissingColumn(column.to_owned()))?;
    parse_number(value)
}

fn parse_number(value: &str) -> ChartResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| !number.is_nan())
        .ok_or_else(|| ChartError::NonNumeric {
            value: value.to_owned(),
        })
}

fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    // Length of `field` that came from inside quotes and must survive trimming.
    let mut protected = 0;
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
                protected = field.len();
            }
            '"' => {
                if !in_quotes && protected == 0 {
                    field.clear();
                }
                in_quotes = !in_quotes;
                protected = field.len();
            }
            ',' if !in_quotes => {
                fields.push(finish_field(&mut field, protected));
                protected = 0;
            }
            _ => {
                field.push(ch);
                if in_quotes {
                    protected = field.len();
                }
            }
        }
    }
    fields.push(finish_field(&mut field, protected));
    fields
}

fn finish_field(field: &mut String, protected: usize) -> String {
    let value = std::mem::take(field);
    if protected == 0 {
        return value.trim().to_owned();
    }
    let (kept, tail) = value.split_at(protected);
    format!("{kept}{}", tail.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "year,pay_gap,label\n1997,17.5, a \n1998,17.2,\"b, c\"\n1999,16.9,\"say \"\"hi\"\"\"\n";

    #[test]
    fn splits_quoted_fields() {
        assert_eq!(split_line("a,\"b, c\",d"), ["a", "b, c", "d"]);
        assert_eq!(split_line("\"a\"\"b\""), ["a\"b"]);
        assert_eq!(split_line(" x , \" padded \" ,y "), ["x", " padded ", "y"]);
    }

    #[test]
    fn addresses_rows_from_either_end() {
        let table = CsvTable::parse(SAMPLE).expect("table");
        assert_eq!(table.get_num(0, "year").expect("first"), 1997.0);
        assert_eq!(table.get_num(-1, "year").expect("last"), 1999.0);
        assert_eq!(table.get(1, "label").expect("quoted"), "b, c");
        assert_eq!(table.get(2, "label").expect("escaped"), "say \"hi\"");
        assert!(matches!(
            table.get(3, "year"),
            Err(ChartError::RowOutOfBounds { index: 3, len: 3 })
        ));
        assert!(matches!(
            table.get(-4, "year"),
            Err(ChartError::RowOutOfBounds { .. })
        ));
    }

    #[test]
    fn non_numeric_cells_are_errors() {
        let table = CsvTable::parse(SAMPLE).expect("table");
        assert!(matches!(
            table.get_num(0, "label"),
            Err(ChartError::NonNumeric { .. })
        ));
        assert!(matches!(
            table.column("missing"),
            Err(ChartError::MissingColumn(_))
        ));
    }

    #[test]
    fn rows_keep_requested_column_order() {
        let table = CsvTable::parse(SAMPLE).expect("table");
        let rows = table.rows(&["pay_gap", "year"]).expect("rows");
        let keys: Vec<_> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys, ["pay_gap", "year"]);
        assert_eq!(rows[2]["pay_gap"], "16.9");
        assert_eq!(table.headers_named(&[]).expect("all").len(), 3);
        assert_eq!(table.headers_named(&["label"]).expect("one"), ["label"]);
    }

    #[test]
    fn transposes_wide_tables() {
        let table = CsvTable::parse("race,Google,Apple\nwhite,56,54\nasian,35,21\n").expect("table");
        let records = table.rows_transposed(&["asian", "white"]).expect("transposed");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["asian"], "35");
        assert_eq!(records[1]["white"], "54");
        assert!(table.rows_transposed(&["latino"]).is_err());
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(CsvTable::parse("  \n "), Err(ChartError::EmptyTable)));
    }
}
