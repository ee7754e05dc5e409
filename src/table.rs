use crate::Error;
use nalgebra::DMatrix;
use num_traits::ToPrimitive;
use std::ops::Index;

/// A non-empty two-dimensional table of finite `f64` values.
///
/// Rows are observations and columns are dimensions.  The shape `(N, D)` is
/// validated on construction, so every `Table` has `N >= 1` and `D >= 1`.
///
/// # Example
///
/// ```rust
/// # fn main() -> Result<(), bbox_noise::Error> {
/// use bbox_noise::Table;
///
/// let table = Table::from_rows(&[[0, 0], [1, 1], [2, 2]])?;
/// assert_eq!(table.shape(), (3, 2));
/// assert_eq!(table[(2, 1)], 2.0);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    data: DMatrix<f64>,
}

fn check_shape(nrows: usize, ncols: usize) -> Result<(), Error> {
    if nrows == 0 {
        return Err(Error::EmptyTable);
    }
    if ncols == 0 {
        return Err(Error::NoColumns);
    }
    Ok(())
}

fn to_finite<T: ToPrimitive>(value: &T, row: usize, column: usize) -> Result<f64, Error> {
    value
        .to_f64()
        .filter(|v| v.is_finite())
        .ok_or(Error::NonFinite { row, column })
}

impl Table {
    /// Build a table from a list of rows.
    ///
    /// # Errors
    ///
    /// Fails if there are no rows, if rows are empty or do not all have the
    /// same length, or if a value is not a finite number.
    pub fn from_rows<T, R>(rows: &[R]) -> Result<Self, Error>
    where
        T: ToPrimitive,
        R: AsRef<[T]>,
    {
        let ncols = rows.first().map_or(0, |row| row.as_ref().len());
        check_shape(rows.len(), ncols)?;

        let mut values = Vec::with_capacity(rows.len() * ncols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != ncols {
                return Err(Error::RaggedRow {
                    row: i,
                    expected: ncols,
                    actual: row.len(),
                });
            }
            for (j, value) in row.iter().enumerate() {
                values.push(to_finite(value, i, j)?);
            }
        }

        Ok(Self {
            data: DMatrix::from_row_slice(rows.len(), ncols, &values),
        })
    }

    /// Build a table from a row-major buffer of `nrows * ncols` values.
    ///
    /// # Errors
    ///
    /// Fails if the shape is empty, if the buffer length does not match the
    /// shape, or if a value is not a finite number.
    pub fn from_row_slice<T>(nrows: usize, ncols: usize, values: &[T]) -> Result<Self, Error>
    where
        T: ToPrimitive,
    {
        check_shape(nrows, ncols)?;
        let expected = nrows.saturating_mul(ncols);
        if values.len() != expected {
            return Err(Error::BufferLenMismatch {
                expected,
                actual: values.len(),
            });
        }

        let values = values
            .iter()
            .enumerate()
            .map(|(idx, value)| to_finite(value, idx / ncols, idx % ncols))
            .collect::<Result<Vec<f64>, Error>>()?;

        Ok(Self {
            data: DMatrix::from_row_slice(nrows, ncols, &values),
        })
    }

    /// Wrap an existing matrix, checking it is a valid table.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Table::from_rows`].
    pub fn from_matrix(data: DMatrix<f64>) -> Result<Self, Error> {
        check_shape(data.nrows(), data.ncols())?;
        for i in 0..data.nrows() {
            for j in 0..data.ncols() {
                to_finite(&data[(i, j)], i, j)?;
            }
        }
        Ok(Self { data })
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    /// `(N, D)`, the number of rows and the number of columns.
    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.data.get((row, column)).copied()
    }

    /// Values of the given row, or `None` if it is out of bounds.
    pub fn row(&self, i: usize) -> Option<Vec<f64>> {
        (i < self.nrows()).then(|| (0..self.ncols()).map(|j| self.data[(i, j)]).collect())
    }

    /// Iterate over the values of the given column.
    ///
    /// # Panics
    ///
    /// Panics if `j` is not lower than [`Table::ncols`].
    pub fn column(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        assert!(j < self.ncols(), "column {j} out of bounds");
        (0..self.nrows()).map(move |i| self.data[(i, j)])
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.nrows())
            .map(|i| (0..self.ncols()).map(|j| self.data[(i, j)]).collect())
            .collect()
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    pub fn into_matrix(self) -> DMatrix<f64> {
        self.data
    }

    /// A new table made of `self` followed by the rows of `tail`, a row-major
    /// buffer whose length is a multiple of [`Table::ncols`].
    pub(crate) fn with_appended_rows(&self, tail: &[f64]) -> Table {
        let (nrows, ncols) = self.shape();
        debug_assert_eq!(tail.len() % ncols, 0);
        let added = tail.len() / ncols;
        let data = DMatrix::from_fn(nrows + added, ncols, |i, j| {
            if i < nrows {
                self.data[(i, j)]
            } else {
                tail[(i - nrows) * ncols + j]
            }
        });
        Table { data }
    }
}

impl Index<(usize, usize)> for Table {
    type Output = f64;

    fn index(&self, (row, column): (usize, usize)) -> &f64 {
        &self.data[(row, column)]
    }
}
