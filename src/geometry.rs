//! Axis-aligned bounding boxes of tables.

use crate::Error;
use crate::Table;
use itertools::Itertools as _;
use itertools::MinMaxResult::{MinMax, NoElements, OneElement};
use nalgebra::DVector;
use num_traits::ToPrimitive;

/// The smallest axis-aligned hyper-rectangle `[mins, maxs]` containing every
/// row of a table.
///
/// Bounds are the literal column-wise extrema: each of them is attained by at
/// least one row.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundingBox {
    p_min: DVector<f64>,
    p_max: DVector<f64>,
}

impl BoundingBox {
    pub fn mins(&self) -> &DVector<f64> {
        &self.p_min
    }

    pub fn maxs(&self) -> &DVector<f64> {
        &self.p_max
    }

    pub fn into_parts(self) -> (DVector<f64>, DVector<f64>) {
        (self.p_min, self.p_max)
    }

    /// Number of dimensions, `D`.
    pub fn dimension(&self) -> usize {
        self.p_min.len()
    }

    /// Width of the box along dimension `d`.
    ///
    /// # Panics
    ///
    /// Panics if `d` is not lower than [`BoundingBox::dimension`].
    pub fn extent(&self, d: usize) -> f64 {
        self.p_max[d] - self.p_min[d]
    }

    pub fn center(&self) -> DVector<f64> {
        self.p_min
            .iter()
            .zip(self.p_max.iter())
            .map(|(min, max)| (min + max) / 2.0)
            .collect::<Vec<f64>>()
            .into()
    }

    /// Product of all extents.  Zero when any dimension is degenerate.
    pub fn volume(&self) -> f64 {
        (0..self.dimension()).map(|d| self.extent(d)).product()
    }

    /// Whether the point lies within the closed box.  Points that do not have
    /// exactly [`BoundingBox::dimension`] coordinates are never contained.
    pub fn contains(&self, point: &[f64]) -> bool {
        point.len() == self.dimension()
            && point
                .iter()
                .zip(self.p_min.iter().zip(self.p_max.iter()))
                .all(|(x, (min, max))| min <= x && x <= max)
    }
}

/// Compute the per-dimension minimum and maximum of the given table.
///
/// # Errors
///
/// `Table`s are non-empty two-dimensional arrays by construction, so this only
/// fails if that invariant is somehow broken.  Use
/// [`uniform_bounds_of_rows`] to validate raw rows on the way.
///
/// # Example
///
/// ```rust
/// # fn main() -> Result<(), bbox_noise::Error> {
/// use bbox_noise::Table;
///
/// let table = Table::from_rows(&[[0.0, 5.0], [1.0, -1.0], [2.0, 2.0]])?;
/// let bb = bbox_noise::uniform_bounds(&table)?;
///
/// assert_eq!(bb.mins().as_slice(), &[0.0, -1.0]);
/// assert_eq!(bb.maxs().as_slice(), &[2.0, 5.0]);
/// # Ok(())
/// # }
/// ```
pub fn uniform_bounds(table: &Table) -> Result<BoundingBox, Error> {
    let (p_min, p_max): (Vec<f64>, Vec<f64>) = (0..table.ncols())
        .map(|j| match table.column(j).minmax() {
            NoElements => Err(Error::EmptyTable),
            OneElement(x) => Ok((x, x)),
            MinMax(min, max) => Ok((min, max)),
        })
        .collect::<Result<Vec<_>, Error>>()?
        .into_iter()
        .unzip();
    if p_min.is_empty() {
        return Err(Error::NoColumns);
    }

    Ok(BoundingBox {
        p_min: p_min.into(),
        p_max: p_max.into(),
    })
}

/// Same as [`uniform_bounds`], for rows that have not been validated yet.
///
/// # Errors
///
/// See [`Table::from_rows`].
pub fn uniform_bounds_of_rows<T, R>(rows: &[R]) -> Result<BoundingBox, Error>
where
    T: ToPrimitive,
    R: AsRef<[T]>,
{
    uniform_bounds(&Table::from_rows(rows)?)
}
