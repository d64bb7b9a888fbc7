//! core::table
//!
//! In-memory tabular data.
//!
//! # Design
//!
//! A [`Table`] is a header row plus rows of string cells. Cells are kept
//! exactly as they appeared in the source file; no type inference is done.
//! Every row has exactly as many cells as there are columns.
//!
//! # Example
//!
//! ```
//! use datastudio::core::table::Table;
//!
//! let mut table = Table::new(["id", "price"]).unwrap();
//! table.push_row(["1", "100"]).unwrap();
//! table.push_row(["2", "250"]).unwrap();
//!
//! let prices = table.select(&["price"]).unwrap();
//! assert_eq!(prices.n_cols(), 1);
//! assert_eq!(prices.n_rows(), 2);
//! ```

use std::collections::HashSet;

use thiserror::Error;

/// Errors from table construction and projection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("row has {found} cells, expected {expected}")]
    RowWidth { expected: usize, found: usize },

    #[error("cannot concatenate tables with different columns")]
    ColumnMismatch,
}

/// A header plus string-cell rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given column names.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::DuplicateColumn`] if a name repeats.
    pub fn new<I, S>(columns: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.as_str()) {
                return Err(TableError::DuplicateColumn(col.clone()));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Append a row.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::RowWidth`] if the row width does not match the
    /// number of columns.
    pub fn push_row<I, S>(&mut self, row: I) -> Result<(), TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = row.into_iter().map(Into::into).collect();
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in order.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows (excluding the header).
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All cells of one column.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }

    /// Project the table onto a subset of columns.
    ///
    /// The result keeps the table's own column order, not the order of
    /// `names`. Repeated names are selected once.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownColumn`] for the first name not present.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Table, TableError> {
        let mut wanted = HashSet::new();
        for name in names {
            let name = name.as_ref();
            if self.column_index(name).is_none() {
                return Err(TableError::UnknownColumn(name.to_string()));
            }
            wanted.insert(name);
        }

        let keep: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| wanted.contains(c.as_str()))
            .map(|(i, _)| i)
            .collect();

        Ok(Table {
            columns: keep.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| keep.iter().map(|&i| r[i].clone()).collect())
                .collect(),
        })
    }

    /// Append the rows of another table with identical columns.
    pub fn extend(&mut self, other: &Table) -> Result<(), TableError> {
        if self.columns != other.columns {
            return Err(TableError::ColumnMismatch);
        }
        self.rows.extend(other.rows.iter().cloned());
        Ok(())
    }

    /// A copy of the first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &self.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let line = |f: &mut std::fmt::Formatter<'_>, cells: &[String]| -> std::fmt::Result {
            let padded: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:<width$}", c, width = *w))
                .collect();
            writeln!(f, "{}", padded.join("  ").trim_end())
        };

        line(f, &self.columns)?;
        for row in &self.rows {
            line(f, row)?;
        }
        Ok(())
    }
}
