use crate::geometry::uniform_bounds;
use crate::Error;
use crate::Table;
use crate::UniformSource;
use rand::Rng as _;
use rand::RngCore;
use std::ops::Range;

/// How many points to add to a table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AddCount {
    /// A fraction in `[0, 1]` of the table's row count.
    ///
    /// The number of points is `p * N` rounded to the nearest integer, ties
    /// going to the even one (e.g. `0.5 * 5` gives 2 and `0.5 * 3` gives 2).
    Fraction(f64),

    /// An exact number of points.
    Absolute(u64),
}

impl Default for AddCount {
    fn default() -> Self {
        AddCount::Fraction(0.0)
    }
}

impl AddCount {
    /// # Errors
    ///
    /// Fails if `p` is not within `[0, 1]`.
    pub fn fraction(p: f64) -> Result<Self, Error> {
        if !(0.0..=1.0).contains(&p) {
            return Err(Error::FractionOutOfRange(p));
        }
        Ok(AddCount::Fraction(p))
    }

    /// # Errors
    ///
    /// Fails if `n` is negative.
    pub fn absolute(n: i64) -> Result<Self, Error> {
        u64::try_from(n)
            .map(AddCount::Absolute)
            .map_err(|_| Error::NegativeCount(n))
    }

    /// Build a count from a fraction `p` and an absolute count `n`, exactly
    /// one of which must be given.
    ///
    /// # Errors
    ///
    /// Fails if both or none of `p` and `n` are given, or if the given one is
    /// invalid.
    pub fn from_options(p: Option<f64>, n: Option<i64>) -> Result<Self, Error> {
        match (p, n) {
            (Some(_), Some(_)) => Err(Error::ConflictingCounts),
            (None, None) => Err(Error::MissingCount),
            (Some(p), None) => AddCount::fraction(p),
            (None, Some(n)) => AddCount::absolute(n),
        }
    }

    /// The number of points to add to a table of `nrows` rows.
    ///
    /// # Errors
    ///
    /// Fails if the fraction is not within `[0, 1]` or if the count cannot be
    /// addressed on this platform.
    pub fn resolve(self, nrows: usize) -> Result<usize, Error> {
        match self {
            AddCount::Fraction(p) => {
                if !(0.0..=1.0).contains(&p) {
                    return Err(Error::FractionOutOfRange(p));
                }
                Ok((p * nrows as f64).round_ties_even() as usize)
            }
            AddCount::Absolute(n) => usize::try_from(n).map_err(|_| Error::CountTooLarge(n)),
        }
    }
}

/// A table with new points appended after its original rows.
#[derive(Clone, Debug, PartialEq)]
pub struct Augmented {
    table: Table,
    original_len: usize,
}

impl Augmented {
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    /// The augmented table and the indices of its new rows.
    pub fn into_parts(self) -> (Table, Range<usize>) {
        let new_indices = self.new_indices();
        (self.table, new_indices)
    }

    /// Indices of the new rows, always `N..N + k`.
    pub fn new_indices(&self) -> Range<usize> {
        self.original_len..self.table.nrows()
    }

    pub fn original_len(&self) -> usize {
        self.original_len
    }

    pub fn new_len(&self) -> usize {
        self.table.nrows() - self.original_len
    }

    pub fn new_rows(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
        self.new_indices().filter_map(|i| self.table.row(i))
    }
}

/// Map `u` in `[0, 1)` onto `[min, max]`.
///
/// `max - min` may overflow even when both bounds are finite, so bounds are
/// weighted separately.  Rounding may step one ulp outside the box.
fn lerp(min: f64, max: f64, u: f64) -> f64 {
    f64::clamp(min * (1.0 - u) + max * u, min, max)
}

/// Add new points sampled uniformly over the table's bounding box.
///
/// Each coordinate of a new point is drawn independently from
/// `U[mins[d], maxs[d])`, where `[mins, maxs]` is given by
/// [`uniform_bounds`](crate::uniform_bounds).  Draws are made row by row, so a
/// given seed always yields the same points.  New points are appended after
/// the original rows, which are left unchanged.
///
/// When there is no point to add, a copy of the table is returned and the
/// generator is not used.
///
/// # Errors
///
/// Fails if the count is invalid.  Nothing is drawn from `source` in that case.
///
/// # Example
///
/// ```rust
/// # fn main() -> Result<(), bbox_noise::Error> {
/// use bbox_noise::{AddCount, Table, UniformSource};
///
/// let table = Table::from_rows(&[[0, 0], [1, 1], [2, 2]])?;
/// let mut source = UniformSource::from_seed(42);
///
/// let augmented = bbox_noise::add_uniform_noise(&table, AddCount::Absolute(2), &mut source)?;
///
/// assert_eq!(augmented.table().shape(), (5, 2));
/// assert_eq!(augmented.new_indices(), 3..5);
/// # Ok(())
/// # }
/// ```
pub fn add_uniform_noise<R>(
    table: &Table,
    count: AddCount,
    source: &mut UniformSource<R>,
) -> Result<Augmented, Error>
where
    R: RngCore,
{
    let (nrows, ncols) = table.shape();
    let span = tracing::info_span!("add_uniform_noise", nrows, ncols);
    let _enter = span.enter();

    let added = count.resolve(nrows).map_err(|err| {
        tracing::debug!(%err, "rejected point count");
        err
    })?;
    tracing::debug!(?count, added, "resolved point count");

    if added == 0 {
        return Ok(Augmented {
            table: table.clone(),
            original_len: nrows,
        });
    }

    let too_large = Error::CountTooLarge(added as u64);
    let value_count = added
        .checked_mul(ncols)
        .filter(|_| nrows.checked_add(added).is_some())
        .ok_or(too_large)?;
    let mut noise = Vec::<f64>::new();
    noise
        .try_reserve_exact(value_count)
        .map_err(|_| too_large)?;

    let bb = uniform_bounds(table)?;
    tracing::debug!(
        mins = ?bb.mins().as_slice(),
        maxs = ?bb.maxs().as_slice(),
        "sampling box"
    );

    for _ in 0..added {
        for (&min, &max) in bb.mins().iter().zip(bb.maxs().iter()) {
            noise.push(lerp(min, max, source.gen()));
        }
    }

    Ok(Augmented {
        table: table.with_appended_rows(&noise),
        original_len: nrows,
    })
}

/// # Uniform bounding-box noise
///
/// Reusable form of [`add_uniform_noise`]: appends `count` points drawn with
/// `rng` to each table it is given.
///
/// # Example
///
/// ```rust
/// # fn main() -> Result<(), bbox_noise::Error> {
/// use bbox_noise::Augment as _;
/// use bbox_noise::{AddCount, Table, UniformNoise};
/// use rand::SeedableRng as _;
///
/// let table = Table::from_rows(&[[0.0, 1.0], [4.0, 3.0]])?;
/// let mut noise = UniformNoise {
///     count: AddCount::Fraction(1.0),
///     rng: rand::rngs::StdRng::seed_from_u64(0),
/// };
///
/// let augmented = noise.augment(&table)?;
/// assert_eq!(augmented.new_len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformNoise<R> {
    pub count: AddCount,
    pub rng: R,
}

impl<'a, R> crate::Augment<&'a Table> for UniformNoise<R>
where
    R: RngCore,
{
    type Output = Augmented;
    type Error = Error;

    fn augment(&mut self, table: &'a Table) -> Result<Self::Output, Self::Error> {
        let mut source = UniformSource::wrap_existing(&mut self.rng);
        add_uniform_noise(table, self.count, &mut source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Augment as _;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::Rng as _;
    use rand::RngCore;
    use rand::SeedableRng as _;

    fn diagonal() -> Table {
        Table::from_rows(&[[0, 0], [1, 1], [2, 2]]).unwrap()
    }

    #[test]
    fn test_count_from_options() {
        assert_eq!(
            AddCount::from_options(Some(0.5), None),
            Ok(AddCount::Fraction(0.5))
        );
        assert_eq!(
            AddCount::from_options(None, Some(3)),
            Ok(AddCount::Absolute(3))
        );
        assert_eq!(
            AddCount::from_options(Some(0.5), Some(3)),
            Err(Error::ConflictingCounts)
        );
        assert_eq!(AddCount::from_options(None, None), Err(Error::MissingCount));
        assert_eq!(
            AddCount::from_options(None, Some(-1)),
            Err(Error::NegativeCount(-1))
        );
        assert_eq!(
            AddCount::from_options(Some(1.5), None),
            Err(Error::FractionOutOfRange(1.5))
        );
    }

    #[test]
    fn test_fraction_bounds_are_inclusive() {
        assert_eq!(AddCount::fraction(0.0), Ok(AddCount::Fraction(0.0)));
        assert_eq!(AddCount::fraction(1.0), Ok(AddCount::Fraction(1.0)));
        assert!(AddCount::fraction(-0.1).is_err());
        assert!(AddCount::fraction(f64::NAN).is_err());
    }

    #[test]
    fn test_resolve_rounds_half_to_even() {
        assert_eq!(AddCount::Fraction(0.5).resolve(5), Ok(2));
        assert_eq!(AddCount::Fraction(0.5).resolve(3), Ok(2));
        assert_eq!(AddCount::Fraction(0.5).resolve(7), Ok(4));
        assert_eq!(AddCount::Fraction(0.5).resolve(1), Ok(0));
        assert_eq!(AddCount::Fraction(0.3).resolve(10), Ok(3));
        assert_eq!(AddCount::Fraction(1.0).resolve(10), Ok(10));
        assert_eq!(AddCount::Absolute(4).resolve(1), Ok(4));
    }

    #[test]
    fn test_absolute_count() {
        let table = diagonal();
        let mut source = UniformSource::from_seed(42);
        let augmented = add_uniform_noise(&table, AddCount::Absolute(2), &mut source).unwrap();

        assert_eq!(augmented.table().shape(), (5, 2));
        assert_eq!(augmented.new_indices().collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(augmented.original_len(), 3);
        assert_eq!(augmented.new_len(), 2);
        for i in 0..3 {
            assert_eq!(augmented.table().row(i), table.row(i));
        }
        for row in augmented.new_rows() {
            for x in row {
                assert!((0.0..2.0).contains(&x), "{x} is out of [0, 2)");
            }
        }
    }

    #[test]
    fn test_fraction_count() {
        let table = Table::from_row_slice(5, 1, &[3.0, -1.0, 0.0, 7.5, 2.0]).unwrap();
        let mut source = UniformSource::from_seed(1);
        let augmented = add_uniform_noise(&table, AddCount::Fraction(0.5), &mut source).unwrap();

        assert_eq!(augmented.table().shape(), (7, 1));
        assert_eq!(augmented.new_indices(), 5..7);
    }

    #[test]
    fn test_nothing_to_add() {
        let table = diagonal();
        let mut rng = StdRng::seed_from_u64(9);
        let mut reference = StdRng::seed_from_u64(9);

        for count in [AddCount::Absolute(0), AddCount::Fraction(0.0), AddCount::Fraction(0.1)] {
            let mut source = UniformSource::wrap_existing(&mut rng);
            let augmented = add_uniform_noise(&table, count, &mut source).unwrap();
            assert_eq!(augmented.table(), &table);
            assert!(augmented.new_indices().is_empty());
        }

        assert_eq!(rng.next_u64(), reference.next_u64());
    }

    #[test]
    fn test_invalid_count_draws_nothing() {
        let table = diagonal();
        let mut rng = StdRng::seed_from_u64(9);
        let mut reference = StdRng::seed_from_u64(9);

        let mut source = UniformSource::wrap_existing(&mut rng);
        assert_eq!(
            add_uniform_noise(&table, AddCount::Fraction(1.5), &mut source),
            Err(Error::FractionOutOfRange(1.5))
        );

        assert_eq!(rng.next_u64(), reference.next_u64());
    }

    #[test]
    fn test_draws_are_row_major() {
        let table = Table::from_rows(&[[0.0, 10.0, 5.0], [1.0, 30.0, 5.0]]).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut source = UniformSource::wrap_existing(&mut rng);
        let augmented = add_uniform_noise(&table, AddCount::Absolute(3), &mut source).unwrap();

        let mut reference = StdRng::seed_from_u64(5);
        let mins = [0.0, 10.0, 5.0];
        let maxs = [1.0, 30.0, 5.0];
        for row in augmented.new_rows() {
            for d in 0..3 {
                let u: f64 = reference.gen();
                assert_eq!(row[d], lerp(mins[d], maxs[d], u));
            }
        }
        // The constant column stays constant.
        assert!(augmented.table().column(2).all(|x| x == 5.0));
    }

    #[test]
    fn test_huge_count_is_rejected() {
        let table = Table::from_rows(&[[0.0], [1.0]]).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let mut reference = StdRng::seed_from_u64(9);

        for n in [u64::MAX, usize::MAX as u64 / 4] {
            let mut source = UniformSource::wrap_existing(&mut rng);
            assert_eq!(
                add_uniform_noise(&table, AddCount::Absolute(n), &mut source),
                Err(Error::CountTooLarge(n))
            );
        }

        assert_eq!(rng.next_u64(), reference.next_u64());
    }

    #[test]
    fn test_box_spanning_most_of_f64() {
        let table = Table::from_rows(&[[-1e308, 0.0], [1e308, f64::MAX]]).unwrap();
        let mut source = UniformSource::from_seed(0);
        let augmented = add_uniform_noise(&table, AddCount::Absolute(64), &mut source).unwrap();

        let firsts: Vec<f64> = augmented.new_rows().map(|row| row[0]).collect();
        for row in augmented.new_rows() {
            assert!(row.iter().all(|x| x.is_finite()));
        }
        assert!(firsts.iter().all(|x| (-1e308..=1e308).contains(x)));
        assert!(firsts.iter().any(|&x| x < 0.0));
        assert!(firsts.iter().any(|&x| x > 0.0));
        assert!(firsts.iter().all(|&x| x != 1e308));
    }

    #[test]
    fn test_lerp_stays_in_box() {
        assert_eq!(lerp(-1e308, 1e308, 0.0), -1e308);
        assert_eq!(lerp(5.0, 5.0, 0.3), 5.0);
        assert_eq!(lerp(-f64::MAX, f64::MAX, 0.5), 0.0);
        let top = lerp(0.0, 2.0, 1.0 - f64::EPSILON / 2.0);
        assert!(top < 2.0);
    }

    #[test]
    fn test_same_seed_same_points() {
        let table = diagonal();
        let a = add_uniform_noise(&table, AddCount::Absolute(10), &mut UniformSource::from_seed(42));
        let b = add_uniform_noise(&table, AddCount::Absolute(10), &mut UniformSource::from_seed(42));
        assert_eq!(a, b);

        let c = add_uniform_noise(&table, AddCount::Absolute(10), &mut UniformSource::from_seed(43));
        assert_ne!(a, c);
    }

    #[test]
    fn test_wrapped_generator_advances() {
        let table = diagonal();
        let mut rng = StdRng::seed_from_u64(11);

        let first = {
            let mut source = UniformSource::wrap_existing(&mut rng);
            add_uniform_noise(&table, AddCount::Absolute(2), &mut source).unwrap()
        };
        let second = {
            let mut source = UniformSource::wrap_existing(&mut rng);
            add_uniform_noise(&table, AddCount::Absolute(2), &mut source).unwrap()
        };

        assert_ne!(
            first.new_rows().collect::<Vec<_>>(),
            second.new_rows().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_uniform_noise_struct() {
        let table = diagonal();
        let mut noise = UniformNoise {
            count: AddCount::Absolute(2),
            rng: StdRng::seed_from_u64(42),
        };
        let from_struct = noise.augment(&table).unwrap();
        let from_fn =
            add_uniform_noise(&table, AddCount::Absolute(2), &mut UniformSource::from_seed(42))
                .unwrap();
        assert_eq!(from_struct, from_fn);
    }

    proptest!(
        #[test]
        fn test_augmented_rows_stay_in_box(
            (ncols, values) in (1..5_usize, 1..30_usize).prop_flat_map(|(ncols, nrows)| {
                (Just(ncols), prop::collection::vec(-1e3..1e3_f64, ncols * nrows))
            }),
            added in 0..50_u64,
            seed in any::<u64>(),
        ) {
            let nrows = values.len() / ncols;
            let table = Table::from_row_slice(nrows, ncols, &values).unwrap();
            let bb = uniform_bounds(&table).unwrap();

            let mut source = UniformSource::from_seed(seed);
            let augmented = add_uniform_noise(&table, AddCount::Absolute(added), &mut source).unwrap();

            prop_assert_eq!(augmented.table().shape(), (nrows + added as usize, ncols));
            prop_assert_eq!(augmented.new_indices(), nrows..nrows + added as usize);
            for i in 0..nrows {
                prop_assert_eq!(augmented.table().row(i), table.row(i));
            }
            for row in augmented.new_rows() {
                prop_assert!(bb.contains(&row));
            }
        }

        #[test]
        fn test_fraction_resolves_to_rounded_count(
            nrows in 1..200_usize,
            p in 0.0..=1.0_f64,
        ) {
            let k = AddCount::Fraction(p).resolve(nrows).unwrap();
            let exact = p * nrows as f64;
            prop_assert!((k as f64 - exact).abs() <= 0.5);
            prop_assert!(k <= nrows);
        }
    );
}
