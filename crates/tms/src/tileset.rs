use geo::{BoundingBox, GeoTransform, Point};

use crate::{Error, Result, TileCoordinate};

/// Maps between map coordinates and the tile grid of one resolution level.
///
/// The grid starts at `origin`, columns grow in the x direction and rows in the y direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSetCoordinateSpace {
    origin: Point,
    bounding_box: BoundingBox,
    tile_width: u32,
    tile_height: u32,
    units_per_pixel: f64,
}

impl TileSetCoordinateSpace {
    pub fn new(origin: Point, bounding_box: BoundingBox, tile_width: u32, tile_height: u32, units_per_pixel: f64) -> Result<Self> {
        if tile_width == 0 || tile_height == 0 {
            return Err(Error::InvalidArgument(format!(
                "Tile dimensions must be strictly positive ({tile_width}x{tile_height})"
            )));
        }

        if !units_per_pixel.is_finite() || units_per_pixel <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "Resolution must be strictly positive ({units_per_pixel} units per pixel)"
            )));
        }

        Ok(TileSetCoordinateSpace {
            origin,
            bounding_box,
            tile_width,
            tile_height,
            units_per_pixel,
        })
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    pub fn units_per_pixel(&self) -> f64 {
        self.units_per_pixel
    }

    /// Width of a tile in map units
    pub fn tile_map_width(&self) -> f64 {
        self.units_per_pixel * self.tile_width as f64
    }

    /// Height of a tile in map units
    pub fn tile_map_height(&self) -> f64 {
        self.units_per_pixel * self.tile_height as f64
    }

    /// The coordinate of the tile containing `point`.
    ///
    /// A point on a tile border belongs to the tile right of or above the border.
    /// For an upper bound (`lower_bound == false`) the tile left of or below the border is returned instead,
    /// so an upper right query corner touching a tile never selects that tile.
    pub fn tile_index(&self, point: Point, lower_bound: bool) -> TileCoordinate {
        TileCoordinate {
            column: grid_index(point.x() - self.origin.x(), self.tile_map_width(), lower_bound),
            row: grid_index(point.y() - self.origin.y(), self.tile_map_height(), lower_bound),
        }
    }

    /// The extent of a tile in map coordinates
    pub fn tile_bounding_box(&self, coord: TileCoordinate) -> BoundingBox {
        let min_x = self.origin.x() + coord.column as f64 * self.tile_map_width();
        let min_y = self.origin.y() + coord.row as f64 * self.tile_map_height();

        BoundingBox::new(min_x, min_y, min_x + self.tile_map_width(), min_y + self.tile_map_height())
    }

    /// Pixel to map coordinate transformation for the image of a tile, pixel (0, 0) is the top left corner
    pub fn tile_geo_transform(&self, coord: TileCoordinate) -> GeoTransform {
        GeoTransform::from_top_left_and_pixel_size(
            self.tile_bounding_box(coord).upper_left(),
            self.units_per_pixel,
            self.units_per_pixel,
        )
    }
}

fn grid_index(offset: f64, cell_size: f64, lower_bound: bool) -> i32 {
    let cells = offset / cell_size;
    let index = cells.floor();

    if !lower_bound && cells == index {
        index as i32 - 1
    } else {
        index as i32
    }
}

/// A single resolution level of a tile map.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSet {
    order: u32,
    href: String,
    coordinate_space: TileSetCoordinateSpace,
}

impl TileSet {
    pub fn new(order: u32, href: impl Into<String>, coordinate_space: TileSetCoordinateSpace) -> Self {
        TileSet {
            order,
            href: href.into(),
            coordinate_space,
        }
    }

    /// Position of this level in the pyramid, 0 is the coarsest level
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Base location of the tiles of this level (a directory or an url)
    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn units_per_pixel(&self) -> f64 {
        self.coordinate_space.units_per_pixel()
    }

    pub fn tile_width(&self) -> u32 {
        self.coordinate_space.tile_width()
    }

    pub fn tile_height(&self) -> u32 {
        self.coordinate_space.tile_height()
    }

    pub fn origin(&self) -> Point {
        self.coordinate_space.origin()
    }

    pub fn coordinate_space(&self) -> &TileSetCoordinateSpace {
        &self.coordinate_space
    }

    pub fn point_index(&self, point: Point, lower_bound: bool) -> TileCoordinate {
        self.coordinate_space.tile_index(point, lower_bound)
    }
}
