//! Row-major probability tables.
//!
//! Transition and emission probabilities are kept in a dense table whose flat
//! index `row * cols + col` matches the order in which the corresponding graph
//! edges were created. The graph stays purely structural; the numbers live here.

use std::ops::{Index, IndexMut};

use crate::engine::errors::ModelError;

/// Default tolerance used when checking that a distribution sums to one.
pub const DEFAULT_CHECK_TOLERANCE: f64 = 1e-6;

/// A dense `rows × cols` table of probabilities, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ProbabilityMatrix {
    /// A table filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { rows, cols, data: vec![0.0; rows * cols] }
    }

    /// Builds a table from nested rows.
    ///
    /// # Errors
    ///
    /// * `ModelError::DimensionMismatch` - rows have differing lengths
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, ModelError> {
        let cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut m = Self::zeros(rows.len(), cols);
        m.assign_rows(rows, "matrix")?;
        Ok(m)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn flat_index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[self.flat_index(row, col)])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut f64> {
        if row < self.rows && col < self.cols {
            let idx = self.flat_index(row, col);
            Some(&mut self.data[idx])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row < self.rows {
            Some(&self.data[row * self.cols..(row + 1) * self.cols])
        } else {
            None
        }
    }

    /// Copies the table out as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.data.chunks(self.cols).map(|r| r.to_vec()).collect()
    }

    /// Overwrites every cell from nested rows of exactly matching shape.
    ///
    /// Nothing is written unless the whole input matches.
    ///
    /// # Errors
    ///
    /// * `ModelError::DimensionMismatch` - wrong number of rows or columns
    pub fn assign_rows<R: AsRef<[f64]>>(
        &mut self,
        rows: &[R],
        what: &'static str,
    ) -> Result<(), ModelError> {
        if rows.len() != self.rows {
            return Err(ModelError::dimension(what, self.rows, rows.len()));
        }
        if let Some(bad) = rows.iter().find(|r| r.as_ref().len() != self.cols) {
            return Err(ModelError::dimension(what, self.cols, bad.as_ref().len()));
        }
        for (i, row) in rows.iter().enumerate() {
            let start = i * self.cols;
            self.data[start..start + self.cols].copy_from_slice(row.as_ref());
        }
        Ok(())
    }
}

impl Index<(usize, usize)> for ProbabilityMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for ProbabilityMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[row * self.cols + col]
    }
}

/// Sums `values` and reports whether the total is within `tolerance` of one.
///
/// Summation stops early once the running total exceeds `1 + tolerance`.
/// Returns the (possibly partial) sum on failure.
pub fn sums_to_one(values: impl IntoIterator<Item = f64>, tolerance: f64) -> Result<(), f64> {
    let mut sum = 0.0;
    for v in values {
        sum += v;
        if sum > 1.0 + tolerance {
            break;
        }
    }
    if (sum - 1.0).abs() <= tolerance {
        Ok(())
    } else {
        Err(sum)
    }
}
