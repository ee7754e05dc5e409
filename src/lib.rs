//! Augment a tabular dataset with points sampled uniformly from its
//! axis-aligned bounding box.
//!
//! # Crate Layout
//!
//! Data is held in a [`Table`], a non-empty two-dimensional array of `f64`
//! whose shape is checked on construction.  Two operations work on it:
//!
//! - [`uniform_bounds`] computes the [`BoundingBox`] of the table, that is the
//!   minimum and the maximum of each column;
//! - [`add_uniform_noise`] draws new points independently and uniformly from
//!   that box and appends them to a copy of the table.
//!
//! The number of points to add is an [`AddCount`], either a fraction of the
//! row count or an absolute number.  Points are drawn from a
//! [`UniformSource`], which is either seeded for reproducible experiments or
//! wraps a generator owned by the caller.
//!
//! [`UniformNoise`] bundles a count and a generator and implements the
//! [`Augment`] trait.
//!
//! # Example
//!
//! ```rust
//! # fn main() -> Result<(), bbox_noise::Error> {
//! use bbox_noise::{AddCount, Table, UniformSource};
//!
//! let table = Table::from_rows(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]])?;
//! let mut source = UniformSource::from_seed(42);
//!
//! let augmented = bbox_noise::add_uniform_noise(&table, AddCount::Fraction(1.0), &mut source)?;
//! let bb = bbox_noise::uniform_bounds(&table)?;
//!
//! assert_eq!(augmented.new_indices(), 3..6);
//! for row in augmented.new_rows() {
//!     assert!(bb.contains(&row));
//! }
//! # Ok(())
//! # }
//! ```

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    rust_2018_idioms
)]

mod error;
mod geometry;
mod noise;
mod source;
mod table;


pub use crate::error::Error;
pub use crate::error::ErrorKind;
pub use crate::geometry::uniform_bounds;
pub use crate::geometry::uniform_bounds_of_rows;
pub use crate::geometry::BoundingBox;
pub use crate::noise::add_uniform_noise;
pub use crate::noise::AddCount;
pub use crate::noise::Augmented;
pub use crate::noise::UniformNoise;
pub use crate::source::UniformSource;
pub use crate::table::Table;

pub use nalgebra;
pub use rand;

/// The `Augment` trait allows for adding synthetic data to a dataset.
///
/// The generic argument `M` defines the input of the augmentation (e.g. a
/// reference to a [`Table`]).  The input is never modified; augmented data is
/// returned as a new value.
pub trait Augment<M> {
    /// The augmented data.
    type Output;

    /// Error details, should the augmentation fail.
    type Error;

    /// Augment the given data, leaving it untouched.
    fn augment(&mut self, data: M) -> Result<Self::Output, Self::Error>;
}
