use std::hash::{Hash, Hasher};
use std::sync::Arc;

use geo::{BoundingBox, GeoTransform, Point};

use crate::{Result, TileCoordinate, TileImageSource, TileSetCoordinateSpace};

/// A tile of a tile set: where to find its image and where to place it on the map.
///
/// Two tiles are equal when they share the coordinate and the image location.
#[derive(Debug, Clone)]
pub struct Tile {
    source: Arc<dyn TileImageSource>,
    coordinate: TileCoordinate,
    coordinate_space: TileSetCoordinateSpace,
}

impl Tile {
    pub fn new(source: Arc<dyn TileImageSource>, coordinate: TileCoordinate, coordinate_space: TileSetCoordinateSpace) -> Self {
        Tile {
            source,
            coordinate,
            coordinate_space,
        }
    }

    pub fn source(&self) -> &dyn TileImageSource {
        self.source.as_ref()
    }

    pub fn coordinate(&self) -> TileCoordinate {
        self.coordinate
    }

    pub fn coordinate_space(&self) -> &TileSetCoordinateSpace {
        &self.coordinate_space
    }

    /// The map extent covered by the tile image
    pub fn bounding_box(&self) -> BoundingBox {
        self.coordinate_space.tile_bounding_box(self.coordinate)
    }

    /// Pixel to map transformation of the tile image
    pub fn geo_transform(&self) -> GeoTransform {
        self.coordinate_space.tile_geo_transform(self.coordinate)
    }

    /// Pixel position (column, row) of a map coordinate in the tile image, `None` if the point is not on the tile
    pub fn pixel_offset(&self, point: Point) -> Result<Option<(u32, u32)>> {
        if !self.bounding_box().contains_point(point) {
            return Ok(None);
        }

        let pixel = self.geo_transform().invert()?.apply(point.x(), point.y());
        let col = (pixel.x().floor() as u32).min(self.coordinate_space.tile_width() - 1);
        let row = (pixel.y().floor() as u32).min(self.coordinate_space.tile_height() - 1);
        Ok(Some((col, row)))
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.coordinate == other.coordinate && self.source.location() == other.source.location()
    }
}

impl Eq for Tile {}

impl Hash for Tile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coordinate.hash(state);
        self.source.location().hash(state);
    }
}
