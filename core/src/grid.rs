//! Immutable tile grid shared by every simulation and rendering component.
//!
//! Tiles are stored row-major in a square `size × size` array. A tile value of
//! zero is open floor; any other value names the wall material occupying the
//! cell. Queries never fail: coordinates outside the grid behave like solid
//! wall so runaway rays and entities always terminate against something.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Position;

/// Smallest grid that still has an open interior inside its border.
pub const MIN_GRID_SIZE: u32 = 3;

/// Number of interpolated samples used by line-of-sight checks.
pub const LINE_OF_SIGHT_SAMPLES: u32 = 50;

/// Minimum distance kept between generated building footprints and the border.
const MIN_BUILDING_OFFSET: u32 = 3;

/// Identifier of the material that fills a tile.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct MaterialId(u8);

impl MaterialId {
    /// Open floor.
    pub const EMPTY: Self = Self(0);

    /// Material reported for queries that fall outside the grid.
    pub const FALLBACK: Self = Self(1);

    /// Creates a new material identifier.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the material.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Reports whether the material blocks movement and rays.
    #[must_use]
    pub const fn is_solid(&self) -> bool {
        self.0 != 0
    }
}

/// Named rectangular building region used to keep spawns out of interiors.
///
/// Bounds are expressed in tile indices. A tile counts as inside the building
/// only when it lies strictly between the start and end bounds on both axes,
/// which excludes the building's own walls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    name: String,
    column_start: u32,
    column_end: u32,
    row_start: u32,
    row_end: u32,
}

impl Footprint {
    /// Creates a footprint covering the provided tile ranges.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        column_start: u32,
        column_end: u32,
        row_start: u32,
        row_end: u32,
    ) -> Self {
        Self {
            name: name.into(),
            column_start,
            column_end,
            row_start,
            row_end,
        }
    }

    /// Computes the five building footprints laid out on a compound map.
    ///
    /// The layout scales with the grid size: four corner buildings and one
    /// central structure, each kept at least a margin away from the border.
    #[must_use]
    pub fn compound_layout(size: u32) -> Vec<Self> {
        let margin = MIN_BUILDING_OFFSET.max(scaled(size, 0.1));
        let span = |from: f64, to: f64| {
            let start = margin.max(scaled(size, from));
            let end = (start + 2).max(scaled(size, to).min(size.saturating_sub(1)));
            (start, end)
        };

        let (b1_rows, b1_columns) = (span(0.15, 0.3), span(0.15, 0.4));
        let (b2_rows, b2_columns) = (span(0.15, 0.25), span(0.7, 0.9));
        let (b3_rows, b3_columns) = (span(0.7, 0.95), span(0.15, 0.35));
        let corner = span(0.75, 0.95);
        let center = span(0.45, 0.55);

        vec![
            Self::new("north-west", b1_columns.0, b1_columns.1, b1_rows.0, b1_rows.1),
            Self::new("north-east", b2_columns.0, b2_columns.1, b2_rows.0, b2_rows.1),
            Self::new("south-west", b3_columns.0, b3_columns.1, b3_rows.0, b3_rows.1),
            Self::new("south-east", corner.0, corner.1, corner.0, corner.1),
            Self::new("center", center.0, center.1, center.0, center.1),
        ]
    }

    /// Human readable label of the building.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reports whether the tile lies strictly inside the footprint.
    #[must_use]
    pub const fn contains_interior(&self, column: u32, row: u32) -> bool {
        self.column_start < column
            && column < self.column_end
            && self.row_start < row
            && row < self.row_end
    }

    const fn fits_within(&self, size: u32) -> bool {
        self.column_start < self.column_end
            && self.row_start < self.row_end
            && self.column_end <= size
            && self.row_end <= size
    }
}

fn scaled(size: u32, factor: f64) -> u32 {
    (f64::from(size) * factor) as u32
}

/// Errors raised while constructing a [`GridMap`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// The grid must be at least [`MIN_GRID_SIZE`] tiles wide.
    #[error("grid size {size} is smaller than the minimum of {MIN_GRID_SIZE}")]
    TooSmall {
        /// Size that failed validation.
        size: u32,
    },
    /// Every row must contain exactly `size` tiles.
    #[error("row {row} has {found} tiles but the grid is {expected} tiles wide")]
    Ragged {
        /// Index of the offending row.
        row: u32,
        /// Number of tiles found on the row.
        found: u32,
        /// Number of tiles expected on every row.
        expected: u32,
    },
    /// Border tiles must be solid so nothing escapes the map.
    #[error("border tile ({column}, {row}) must be solid")]
    OpenBorder {
        /// Column of the open border tile.
        column: u32,
        /// Row of the open border tile.
        row: u32,
    },
    /// Footprints must be well-formed and lie inside the grid.
    #[error("footprint `{name}` does not fit inside the {size}x{size} grid")]
    FootprintOutOfBounds {
        /// Name of the rejected footprint.
        name: String,
        /// Size of the grid the footprint was checked against.
        size: u32,
    },
}

/// Square tile grid describing the walls of a level.
#[derive(Clone, Debug, PartialEq)]
pub struct GridMap {
    size: u32,
    tiles: Vec<MaterialId>,
    footprints: Vec<Footprint>,
}

impl GridMap {
    /// Builds a grid from explicit rows of material ids.
    ///
    /// The rows must form a square whose border is entirely solid.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, GridError> {
        let size = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        if size < MIN_GRID_SIZE {
            return Err(GridError::TooSmall { size });
        }

        let mut tiles = Vec::with_capacity(rows.len() * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let found = u32::try_from(row.len()).unwrap_or(u32::MAX);
            if found != size {
                return Err(GridError::Ragged {
                    row: row_index as u32,
                    found,
                    expected: size,
                });
            }
            tiles.extend(row.iter().copied().map(MaterialId::new));
        }

        let grid = Self {
            size,
            tiles,
            footprints: Vec::new(),
        };
        grid.validate_border()?;
        Ok(grid)
    }

    /// Creates an open arena surrounded by a solid border of the fallback material.
    ///
    /// Sizes below [`MIN_GRID_SIZE`] are raised to the minimum.
    #[must_use]
    pub fn bordered(size: u32) -> Self {
        let size = size.max(MIN_GRID_SIZE);
        let width = size as usize;
        let mut tiles = vec![MaterialId::EMPTY; width * width];
        for row in 0..width {
            for column in 0..width {
                if row == 0 || column == 0 || row == width - 1 || column == width - 1 {
                    tiles[row * width + column] = MaterialId::FALLBACK;
                }
            }
        }

        Self {
            size,
            tiles,
            footprints: Vec::new(),
        }
    }

    /// Returns the grid with a solid tile placed at the provided cell.
    ///
    /// Cells outside the grid and empty materials are ignored so the border
    /// always stays solid.
    #[must_use]
    pub fn with_wall(mut self, column: u32, row: u32, material: MaterialId) -> Self {
        if material.is_solid() {
            if let Some(index) = self.index(i64::from(column), i64::from(row)) {
                self.tiles[index] = material;
            }
        }
        self
    }

    /// Attaches building footprints to the grid.
    pub fn with_footprints(mut self, footprints: Vec<Footprint>) -> Result<Self, GridError> {
        if let Some(invalid) = footprints.iter().find(|footprint| !footprint.fits_within(self.size)) {
            return Err(GridError::FootprintOutOfBounds {
                name: invalid.name.clone(),
                size: self.size,
            });
        }
        self.footprints = footprints;
        Ok(self)
    }

    fn validate_border(&self) -> Result<(), GridError> {
        let last = self.size - 1;
        for row in 0..self.size {
            for column in 0..self.size {
                let on_border = row == 0 || column == 0 || row == last || column == last;
                if on_border && !self.tile(i64::from(column), i64::from(row)).is_solid() {
                    return Err(GridError::OpenBorder { column, row });
                }
            }
        }
        Ok(())
    }

    /// Number of tiles along each edge of the grid.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Building footprints attached to the grid.
    #[must_use]
    pub fn footprints(&self) -> &[Footprint] {
        &self.footprints
    }

    /// Iterator over the rows of the grid from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[MaterialId]> {
        self.tiles.chunks(self.size as usize)
    }

    /// Material stored at the provided tile index.
    ///
    /// Indices outside the grid yield [`MaterialId::FALLBACK`].
    #[must_use]
    pub fn tile(&self, column: i64, row: i64) -> MaterialId {
        self.index(column, row)
            .map_or(MaterialId::FALLBACK, |index| self.tiles[index])
    }

    /// Reports whether the tile at the provided index blocks movement.
    #[must_use]
    pub fn is_wall_tile(&self, column: i64, row: i64) -> bool {
        self.tile(column, row).is_solid()
    }

    /// Reports whether the world-space coordinate lies inside a wall.
    ///
    /// Coordinates are floored to tile indices. Positions outside the grid or
    /// non-finite coordinates are treated as solid.
    #[must_use]
    pub fn is_wall(&self, x: f64, y: f64) -> bool {
        self.material_at(x, y).is_solid()
    }

    /// Material occupying the world-space coordinate.
    #[must_use]
    pub fn material_at(&self, x: f64, y: f64) -> MaterialId {
        match tile_index(x, y) {
            Some((column, row)) => self.tile(column, row),
            None => MaterialId::FALLBACK,
        }
    }

    /// Reports whether the world-space coordinate lies inside a building.
    ///
    /// Only open tiles count, so standing on a building's wall is not inside it.
    #[must_use]
    pub fn is_inside_building(&self, x: f64, y: f64) -> bool {
        let Some((column, row)) = tile_index(x, y) else {
            return false;
        };
        if self.index(column, row).is_none() || self.is_wall_tile(column, row) {
            return false;
        }

        let (column, row) = (column as u32, row as u32);
        self.footprints
            .iter()
            .any(|footprint| footprint.contains_interior(column, row))
    }

    /// Approximates visibility between two points by sampling the segment.
    ///
    /// `samples` evenly spaced interior points are tested; any sample inside a
    /// wall breaks the line of sight. The endpoints themselves are not tested.
    #[must_use]
    pub fn has_line_of_sight(&self, from: Position, to: Position, samples: u32) -> bool {
        let steps = f64::from(samples) + 1.0;
        (1..=samples).all(|step| {
            let t = f64::from(step) / steps;
            let x = from.x() + (to.x() - from.x()) * t;
            let y = from.y() + (to.y() - from.y()) * t;
            !self.is_wall(x, y)
        })
    }

    fn index(&self, column: i64, row: i64) -> Option<usize> {
        let size = i64::from(self.size);
        if (0..size).contains(&column) && (0..size).contains(&row) {
            usize::try_from(row * size + column).ok()
        } else {
            None
        }
    }
}

fn tile_index(x: f64, y: f64) -> Option<(i64, i64)> {
    if x.is_finite() && y.is_finite() {
        Some((x.floor() as i64, y.floor() as i64))
    } else {
        None
    }
}
