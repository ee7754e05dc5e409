use std::fmt;

/// Category of an [`Error`].
///
/// Every failure of this crate is an argument-validation failure detected
/// before any randomness is consumed, hence a single kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    InvalidInput,
}

/// Errors returned when the given table or count is not valid.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The table has no rows.
    EmptyTable,

    /// The table has rows but no columns.
    NoColumns,

    /// A row does not have the same length as the first one, so the input is
    /// not a two-dimensional table.
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A flat buffer does not hold `nrows * ncols` values.
    BufferLenMismatch { expected: usize, actual: usize },

    /// A value is NaN, infinite, or cannot be represented as an `f64`.
    NonFinite { row: usize, column: usize },

    /// The fraction of points to add is outside of `[0, 1]`.
    FractionOutOfRange(f64),

    /// The number of points to add is negative.
    NegativeCount(i64),

    /// Both a fraction and an absolute count were given.
    ConflictingCounts,

    /// Neither a fraction nor an absolute count was given.
    MissingCount,

    /// The number of points to add does not fit in memory indices.
    CountTooLarge(u64),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidInput => write!(f, "invalid input"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.kind())?;
        match self {
            Error::EmptyTable => write!(f, "table must have at least one row"),
            Error::NoColumns => write!(f, "table must have at least one column"),
            Error::RaggedRow {
                row,
                expected,
                actual,
            } => write!(
                f,
                "table must be two-dimensional (row {row} has {actual} values, expected {expected})",
            ),
            Error::BufferLenMismatch { expected, actual } => write!(
                f,
                "buffer does not match the table shape (expected {expected} values, got {actual})",
            ),
            Error::NonFinite { row, column } => {
                write!(f, "value at row {row}, column {column} is not a finite number")
            }
            Error::FractionOutOfRange(p) => write!(f, "p must be within [0, 1], got {p}"),
            Error::NegativeCount(n) => write!(f, "n must be a non-negative integer, got {n}"),
            Error::ConflictingCounts | Error::MissingCount => {
                write!(f, "specify exactly one of p or n")
            }
            Error::CountTooLarge(n) => write!(f, "cannot add {n} points"),
        }
    }
}

impl std::error::Error for Error {}
