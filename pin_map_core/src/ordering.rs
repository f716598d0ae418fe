use crate::error::Result;
use regex::{Captures, Regex};

/// Numeric-aware row ordering on one column.
///
/// Every run of digits directly after an `anchor` match is zero-padded to the widest such run in
/// the table, so `J2` sorts before `J10`. The sort is stable.
#[derive(Debug, Clone)]
pub struct NaturalOrder {
    column: usize,
    pattern: Regex,
}

impl NaturalOrder {
    pub fn new(column: usize, anchor: &str) -> Result<Self> {
        Ok(NaturalOrder {
            column,
            pattern: Regex::new(&format!(r"(?P<anchor>{anchor})(?P<digits>\d+)"))?,
        })
    }

    pub fn sort(&self, rows: &mut [Vec<String>]) {
        let width = rows
            .iter()
            .flat_map(|row| {
                self.pattern
                    .captures_iter(self.cell(row))
                    .map(|c| c["digits"].len())
            })
            .max()
            .unwrap_or(0);
        rows.sort_by_cached_key(|row| self.key(self.cell(row), width));
    }

    fn cell<'a>(&self, row: &'a [String]) -> &'a str {
        row.get(self.column).map(String::as_str).unwrap_or_default()
    }

    fn key(&self, value: &str, width: usize) -> String {
        self.pattern
            .replace_all(value, |c: &Captures<'_>| {
                format!("{}{:0>width$}", &c["anchor"], &c["digits"])
            })
            .into_owned()
    }
}
