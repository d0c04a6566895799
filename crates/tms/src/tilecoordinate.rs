use std::fmt;

/// Address of a single tile within the grid of a [`crate::TileSet`].
///
/// Columns grow eastwards and rows grow northwards from the tile set origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoordinate {
    pub column: i32,
    pub row: i32,
}

impl TileCoordinate {
    pub const fn new(column: i32, row: i32) -> Self {
        TileCoordinate { column, row }
    }

    /// Number of coordinates in the block spanned by `lower_left` and `upper_right`, `None` if it does not fit a `u64`
    pub fn range_size(lower_left: TileCoordinate, upper_right: TileCoordinate) -> Option<u64> {
        let columns = i64::from(upper_right.column) - i64::from(lower_left.column) + 1;
        let rows = i64::from(upper_right.row) - i64::from(lower_left.row) + 1;

        if columns <= 0 || rows <= 0 {
            return Some(0);
        }

        (columns as u64).checked_mul(rows as u64)
    }

    /// All coordinates in the block spanned by `lower_left` and `upper_right`, both corners included.
    ///
    /// The block is empty when `upper_right` lies left of or below `lower_left`.
    /// No particular order of the coordinates is guaranteed.
    /// The whole block is materialized, check [`TileCoordinate::range_size`] first for unbounded input.
    pub fn range(lower_left: TileCoordinate, upper_right: TileCoordinate) -> Vec<TileCoordinate> {
        let size = Self::range_size(lower_left, upper_right).and_then(|size| usize::try_from(size).ok());

        let mut coordinates = Vec::new();
        match size {
            Some(0) => return coordinates,
            Some(size) => {
                // a refused reservation is not an error, the coordinates are pushed one by one
                let _ = coordinates.try_reserve_exact(size);
            }
            None => {}
        }

        for column in lower_left.column..=upper_right.column {
            for row in lower_left.row..=upper_right.row {
                coordinates.push(TileCoordinate { column, row });
            }
        }
        coordinates
    }
}

impl fmt::Display for TileCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.column, self.row)
    }
}

impl From<(i32, i32)> for TileCoordinate {
    fn from((column, row): (i32, i32)) -> Self {
        TileCoordinate::new(column, row)
    }
}
