//! Delimited text tables and the inner join between them

use crate::error::{FitTrackError, Result};
use std::collections::HashMap;

/// A parsed delimited table with a header row.
///
/// Cells are kept as text; numeric coercion happens per column when records
/// are built, so errors can name the offending column and file line.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    source_name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    /// 1-based line in the source text of each row
    line_numbers: Vec<usize>,
}

impl Table {
    /// Parse delimited text whose first non-blank line is the header.
    ///
    /// A leading UTF-8 byte order mark is ignored. Blank lines are skipped
    /// but still counted, so reported line numbers match the file.
    pub fn parse(source_name: impl Into<String>, text: &str, delimiter: char) -> Result<Self> {
        let source_name = source_name.into();
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line))
            .filter(|(_, line)| !line.trim().is_empty());

        let headers: Vec<String> = match lines.next() {
            Some((_, header)) => split_line(header, delimiter),
            None => return Err(FitTrackError::unavailable(source_name, "file is empty")),
        };

        let mut rows = Vec::new();
        let mut line_numbers = Vec::new();
        for (line_number, line) in lines {
            let cells = split_line(line, delimiter);
            if cells.len() != headers.len() {
                return Err(FitTrackError::unavailable(
                    source_name,
                    format!(
                        "line {} has {} fields, header has {}",
                        line_number,
                        cells.len(),
                        headers.len()
                    ),
                ));
            }
            rows.push(cells);
            line_numbers.push(line_number);
        }

        if rows.is_empty() {
            return Err(FitTrackError::unavailable(source_name, "no data rows"));
        }

        Ok(Self {
            source_name,
            headers,
            rows,
            line_numbers,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a named column
    pub fn column(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| {
                FitTrackError::unavailable(
                    self.source_name.clone(),
                    format!("missing required column `{}`", name),
                )
            })
    }

    /// Fail unless every named column is present
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        for name in names {
            self.column(name)?;
        }
        Ok(())
    }

    /// Raw text of a cell
    pub fn cell(&self, row: usize, column: usize) -> &str {
        &self.rows[row][column]
    }

    /// Parse a cell as a finite number.
    pub fn number(&self, row: usize, column: usize) -> Result<f64> {
        let raw = self.cell(row, column);
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(self.mismatch(row, column)),
        }
    }

    /// Parse a cell as a non-negative whole number.
    pub fn whole_number(&self, row: usize, column: usize) -> Result<u32> {
        let value = self.number(row, column)?;
        if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
            return Err(self.mismatch(row, column));
        }
        Ok(value as u32)
    }

    fn mismatch(&self, row: usize, column: usize) -> FitTrackError {
        FitTrackError::SchemaMismatch {
            source_name: self.source_name.clone(),
            column: self.headers[column].clone(),
            line: self.line_numbers[row],
            value: self.cell(row, column).to_string(),
        }
    }

    /// Inner join on a key column present in both tables.
    ///
    /// Returns `(left_row, right_row)` index pairs in left-table order. Keys
    /// found in only one table are dropped; a key repeated on either side
    /// yields one pair per combination.
    pub fn inner_join(&self, right: &Table, key: &str) -> Result<Vec<(usize, usize)>> {
        let left_key = self.column(key)?;
        let right_key = right.column(key)?;

        let mut right_index: HashMap<&str, Vec<usize>> = HashMap::new();
        for (row, cells) in right.rows.iter().enumerate() {
            right_index.entry(cells[right_key].as_str()).or_default().push(row);
        }

        let mut pairs = Vec::new();
        for (row, cells) in self.rows.iter().enumerate() {
            if let Some(matches) = right_index.get(cells[left_key].as_str()) {
                pairs.extend(matches.iter().map(|&right_row| (row, right_row)));
            }
        }

        Ok(pairs)
    }
}

/// Split one line, trimming whitespace and surrounding double quotes.
fn split_line(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter)
        .map(|cell| {
            let cell = cell.trim();
            cell.strip_prefix('"')
                .and_then(|c| c.strip_suffix('"'))
                .unwrap_or(cell)
                .to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table() {
        let table = Table::parse("t.csv", "User_ID,Calories\r\n1,231.0\r\n\"2\", 66\r\n\r\n", ',').unwrap();

        assert_eq!(table.column("User_ID").unwrap(), 0);
        assert_eq!(table.column("Calories").unwrap(), 1);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, 0), "2");
        assert_eq!(table.number(1, 1).unwrap(), 66.0);
    }

    #[test]
    fn test_custom_delimiter() {
        let table = Table::parse("t.tsv", "a;b\n1;2\n", ';').unwrap();
        assert_eq!(table.number(0, 1).unwrap(), 2.0);
    }

    #[test]
    fn test_empty_sources_are_unavailable() {
        assert!(matches!(
            Table::parse("t.csv", "", ','),
            Err(FitTrackError::DataUnavailable { .. })
        ));
        assert!(matches!(
            Table::parse("t.csv", "User_ID,Calories\n", ','),
            Err(FitTrackError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn test_ragged_row_is_rejected() {
        let err = Table::parse("t.csv", "a,b\n1,2\n3\n", ',').unwrap_err();
        assert!(err.to_string().contains("line 3 has 1 fields"));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let table = Table::parse("t.csv", "\u{feff}User_ID,Calories\n1,231\n", ',').unwrap();

        assert_eq!(table.column("User_ID").unwrap(), 0);
        assert_eq!(table.cell(0, 0), "1");
    }

    #[test]
    fn test_errors_report_file_lines() {
        let table = Table::parse("t.csv", "Age,Height\n\n30,170\n\n31,tall\n", ',').unwrap();

        assert!(matches!(
            table.number(1, 1),
            Err(FitTrackError::SchemaMismatch { line: 5, .. })
        ));

        let err = Table::parse("t.csv", "a,b\n\n1\n", ',').unwrap_err();
        assert!(err.to_string().contains("line 3 has 1 fields"));
    }

    #[test]
    fn test_missing_column() {
        let table = Table::parse("t.csv", "a,b\n1,2\n", ',').unwrap();
        assert!(table.require_columns(&["a", "b"]).is_ok());
        assert!(matches!(
            table.require_columns(&["a", "Calories"]),
            Err(FitTrackError::DataUnavailable { .. })
        ));
    }

    #[test]
    fn test_number_coercion() {
        let table = Table::parse("t.csv", "Age,Height\nthirty,170\n30.5,NaN\n", ',').unwrap();

        assert_eq!(
            table.number(0, 0),
            Err(FitTrackError::SchemaMismatch {
                source_name: "t.csv".to_string(),
                column: "Age".to_string(),
                line: 2,
                value: "thirty".to_string(),
            })
        );
        assert!(table.number(1, 1).is_err());
        assert!(table.whole_number(1, 0).is_err());
        assert_eq!(table.whole_number(0, 1).unwrap(), 170);
    }

    #[test]
    fn test_inner_join_partial_overlap() {
        let left = Table::parse("left", "User_ID,x\n1,a\n2,b\n3,c\n4,d\n", ',').unwrap();
        let right = Table::parse("right", "User_ID,y\n3,p\n9,q\n1,r\n5,s\n", ',').unwrap();

        let pairs = left.inner_join(&right, "User_ID").unwrap();

        // Keys 1 and 3 are shared; 2, 4, 5 and 9 are one-sided
        assert_eq!(pairs, vec![(0, 2), (2, 0)]);
    }

    #[test]
    fn test_inner_join_duplicate_keys() {
        let left = Table::parse("left", "User_ID\n1\n1\n", ',').unwrap();
        let right = Table::parse("right", "User_ID\n1\n1\n1\n", ',').unwrap();

        assert_eq!(left.inner_join(&right, "User_ID").unwrap().len(), 6);
    }

    #[test]
    fn test_inner_join_requires_key() {
        let left = Table::parse("left", "id\n1\n", ',').unwrap();
        let right = Table::parse("right", "User_ID\n1\n", ',').unwrap();
        assert!(left.inner_join(&right, "User_ID").is_err());
    }
}
