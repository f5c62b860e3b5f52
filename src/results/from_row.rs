use crate::error::Result;

use super::Row;

/// Conversion from a fetched [`Row`] into a caller-facing value.
///
/// Implemented for [`Row`] itself and, through the mapper, for every entity.
pub trait FromRow: Sized {
    /// # Errors
    /// Returns an error if the row cannot be represented as `Self`.
    fn from_row(row: Row) -> Result<Self>;
}

impl FromRow for Row {
    fn from_row(row: Row) -> Result<Self> {
        Ok(row)
    }
}
