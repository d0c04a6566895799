use std::collections::HashSet;
use std::fmt;

use geo::{BoundingBox, Point, Srs};

use crate::{Error, ImageFormat, Result, Tile, TileCoordinate, TileFormat, TileImageSourceFactory, TileSet, TileSetCoordinateSpace};

/// How to pick a tile set when no level matches the requested resolution exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionStrategy {
    /// The coarsest level that is at least as detailed as requested
    PreferHigher,
    /// The most detailed level that is at most as detailed as requested
    #[default]
    PreferLower,
    /// The level with the resolution closest to the requested one
    Closest,
}

/// A tile pyramid: an ordered collection of tile sets covering the same extent.
pub struct TileMap {
    title: String,
    srs: Srs,
    max_bounding_box: BoundingBox,
    origin: Point,
    tile_format: TileFormat,
    tile_sets: Vec<TileSet>,
    service_url: Option<String>,
    tile_image_source_factory: Box<dyn TileImageSourceFactory>,
}

impl TileMap {
    /// Creates a tile map, all tile sets must share the origin and bounding box of the tile map
    pub fn new(
        title: impl Into<String>,
        srs: Srs,
        max_bounding_box: BoundingBox,
        origin: Point,
        tile_format: TileFormat,
        tile_sets: Vec<TileSet>,
        tile_image_source_factory: Box<dyn TileImageSourceFactory>,
    ) -> Result<Self> {
        let title = title.into();

        for set in &tile_sets {
            let space = set.coordinate_space();
            if space.origin() != origin || space.bounding_box() != max_bounding_box {
                return Err(Error::InvalidArgument(format!(
                    "Tile set {} of tile map '{title}' does not share the tile map origin and bounding box",
                    set.order()
                )));
            }

            if !tile_indices_fit(space) {
                return Err(Error::InvalidArgument(format!(
                    "Tile set {} of tile map '{title}' has more tiles than can be addressed",
                    set.order()
                )));
            }
        }

        Ok(TileMap {
            title,
            srs,
            max_bounding_box,
            origin,
            tile_format,
            tile_sets,
            service_url: None,
            tile_image_source_factory,
        })
    }

    pub fn with_service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = Some(url.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn srs(&self) -> &Srs {
        &self.srs
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.max_bounding_box
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn tile_format(&self) -> &TileFormat {
        &self.tile_format
    }

    pub fn service_url(&self) -> Option<&str> {
        self.service_url.as_deref()
    }

    /// The tile sets in descriptor order
    pub fn tile_sets(&self) -> &[TileSet] {
        &self.tile_sets
    }

    pub fn tile_image_format(&self) -> ImageFormat {
        self.tile_format.image_format()
    }

    /// The tile set with the given order (zoom level)
    pub fn tile_set(&self, order: u32) -> Option<&TileSet> {
        self.tile_sets.iter().find(|set| set.order() == order)
    }

    /// Selects the tile set to use for rendering at `units_per_pixel`
    pub fn tile_set_for_resolution(&self, units_per_pixel: f64, strategy: ResolutionStrategy) -> Option<&TileSet> {
        let finest = self.tile_sets.iter().min_by(|a, b| a.units_per_pixel().total_cmp(&b.units_per_pixel()));
        let coarsest = self.tile_sets.iter().max_by(|a, b| a.units_per_pixel().total_cmp(&b.units_per_pixel()));

        match strategy {
            ResolutionStrategy::PreferHigher => self
                .tile_sets
                .iter()
                .filter(|set| set.units_per_pixel() <= units_per_pixel)
                .max_by(|a, b| a.units_per_pixel().total_cmp(&b.units_per_pixel()))
                .or(finest),
            ResolutionStrategy::PreferLower => self
                .tile_sets
                .iter()
                .filter(|set| set.units_per_pixel() >= units_per_pixel)
                .min_by(|a, b| a.units_per_pixel().total_cmp(&b.units_per_pixel()))
                .or(coarsest),
            ResolutionStrategy::Closest => self.tile_sets.iter().min_by(|a, b| {
                (a.units_per_pixel() - units_per_pixel)
                    .abs()
                    .total_cmp(&(b.units_per_pixel() - units_per_pixel).abs())
            }),
        }
    }

    /// True when `bbox` extends beyond the maximum bounding box, touching the border is allowed.
    /// A box with NaN or infinite coordinates is always outside.
    pub fn outside_max_bounding_box(&self, bbox: &BoundingBox) -> bool {
        !bbox.is_finite()
            || bbox.min_x() < self.max_bounding_box.min_x()
            || bbox.min_y() < self.max_bounding_box.min_y()
            || bbox.max_x() > self.max_bounding_box.max_x()
            || bbox.max_y() > self.max_bounding_box.max_y()
    }

    /// The part of `bbox` within the maximum bounding box
    pub fn clip_to_max_bounding_box(&self, bbox: &BoundingBox) -> BoundingBox {
        self.max_bounding_box.intersect(bbox)
    }

    /// The tiles of `tile_set` that overlap `bbox`.
    ///
    /// Tiles that only touch the upper or right border of `bbox` are not part of the result.
    pub fn tiles_for(&self, tile_set: &TileSet, bbox: &BoundingBox) -> Result<HashSet<Tile>> {
        if self.outside_max_bounding_box(bbox) {
            return Err(Error::OutOfBounds {
                bbox: *bbox,
                max: self.max_bounding_box,
            });
        }

        let lower_left = tile_set.point_index(bbox.lower_left(), true);
        let upper_right = tile_set.point_index(bbox.upper_right(), false);

        log::debug!(
            "[{}] tiles {} to {} of level {} for {}",
            self.title,
            lower_left,
            upper_right,
            tile_set.order(),
            bbox
        );

        if TileCoordinate::range_size(lower_left, upper_right).is_none_or(|size| usize::try_from(size).is_err()) {
            return Err(Error::InvalidArgument(format!(
                "[{}] request {} covers too many tiles of level {}",
                self.title,
                bbox,
                tile_set.order()
            )));
        }

        Ok(TileCoordinate::range(lower_left, upper_right)
            .into_iter()
            .map(|coord| self.make_tile(tile_set, coord))
            .collect())
    }

    pub fn make_tile(&self, tile_set: &TileSet, coord: TileCoordinate) -> Tile {
        let source = self
            .tile_image_source_factory
            .create(tile_set, coord, &self.tile_format.extension);
        Tile::new(source, coord, *tile_set.coordinate_space())
    }
}

/// The tile indices of every point of the bounding box must be representable as `i32`
fn tile_indices_fit(space: &TileSetCoordinateSpace) -> bool {
    let bbox = space.bounding_box();
    let origin = space.origin();
    let fits = |offset: f64, tile_size: f64| (offset / tile_size).abs() < i32::MAX as f64;

    fits(bbox.min_x() - origin.x(), space.tile_map_width())
        && fits(bbox.max_x() - origin.x(), space.tile_map_width())
        && fits(bbox.min_y() - origin.y(), space.tile_map_height())
        && fits(bbox.max_y() - origin.y(), space.tile_map_height())
}

impl fmt::Debug for TileMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileMap")
            .field("title", &self.title)
            .field("srs", &self.srs)
            .field("max_bounding_box", &self.max_bounding_box)
            .field("origin", &self.origin)
            .field("tile_format", &self.tile_format)
            .field("tile_sets", &self.tile_sets.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UrlTileImageSourceFactory;
    use geo::crs;

    // 4 by 4 tiles at level 0
    fn max_bbox() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 1024.0, 1024.0)
    }

    fn tile_map_with_format(mime_type: &str) -> TileMap {
        let origin = Point::new(0.0, 0.0);
        let tile_sets = [1.0, 0.5, 0.25]
            .iter()
            .enumerate()
            .map(|(order, upp)| {
                let space = TileSetCoordinateSpace::new(origin, max_bbox(), 256, 256, *upp).expect("valid coordinate space");
                TileSet::new(order as u32, format!("http://tms.example.com/basemap/{order}"), space)
            })
            .collect();

        TileMap::new(
            "basemap",
            Srs::from(crs::epsg::BELGIAN_LAMBERT72),
            max_bbox(),
            origin,
            TileFormat::new(256, 256, mime_type, "png"),
            tile_sets,
            Box::new(UrlTileImageSourceFactory),
        )
        .expect("valid tile map")
    }

    fn tile_map() -> TileMap {
        tile_map_with_format("image/png")
    }

    fn coordinates(tiles: &HashSet<Tile>) -> HashSet<TileCoordinate> {
        tiles.iter().map(|t| t.coordinate()).collect()
    }

    fn coordinate_set(coords: &[(i32, i32)]) -> HashSet<TileCoordinate> {
        coords.iter().copied().map(TileCoordinate::from).collect()
    }

    #[test]
    fn tiles_for_bbox() -> Result<()> {
        let map = tile_map();
        let set = &map.tile_sets()[0];

        let tiles = map.tiles_for(set, &BoundingBox::new(100.0, 100.0, 300.0, 300.0))?;
        assert_eq!(tiles.len(), 4);
        assert_eq!(coordinates(&tiles), coordinate_set(&[(0, 0), (0, 1), (1, 0), (1, 1)]));
        Ok(())
    }

    #[test]
    fn touching_tiles_are_excluded() -> Result<()> {
        let map = tile_map();
        let set = &map.tile_sets()[0];

        let tiles = map.tiles_for(set, &BoundingBox::new(100.0, 100.0, 256.0, 256.0))?;
        assert_eq!(coordinates(&tiles), coordinate_set(&[(0, 0)]));

        let tiles = map.tiles_for(set, &BoundingBox::new(256.0, 0.0, 512.0, 256.0))?;
        assert_eq!(coordinates(&tiles), coordinate_set(&[(1, 0)]));
        Ok(())
    }

    #[test]
    fn tiles_for_full_extent() -> Result<()> {
        let map = tile_map();

        assert_eq!(map.tiles_for(&map.tile_sets()[0], &max_bbox())?.len(), 16);
        assert_eq!(map.tiles_for(&map.tile_sets()[1], &max_bbox())?.len(), 64);
        Ok(())
    }

    #[test]
    fn tiles_for_degenerate_bbox() -> Result<()> {
        let map = tile_map();
        let set = &map.tile_sets()[0];

        // a line on a tile border collapses the range
        assert!(map.tiles_for(set, &BoundingBox::new(256.0, 100.0, 256.0, 200.0))?.is_empty());
        // a point inside a tile selects that tile
        let tiles = map.tiles_for(set, &BoundingBox::new(300.0, 300.0, 300.0, 300.0))?;
        assert_eq!(coordinates(&tiles), coordinate_set(&[(1, 1)]));
        Ok(())
    }

    #[test]
    fn tiles_have_sources() -> Result<()> {
        let map = tile_map();
        let set = &map.tile_sets()[2];

        let tiles = map.tiles_for(set, &BoundingBox::new(0.0, 0.0, 10.0, 10.0))?;
        let tile = tiles.iter().next().expect("one tile");
        assert_eq!(tile.source().location(), "http://tms.example.com/basemap/2/0/0.png");
        assert_eq!(tile.bounding_box(), BoundingBox::new(0.0, 0.0, 64.0, 64.0));
        Ok(())
    }

    #[test]
    fn out_of_bounds_request() {
        let map = tile_map();
        let set = &map.tile_sets()[0];

        for bbox in [
            BoundingBox::new(-0.5, 0.0, 1024.0, 1024.0),
            BoundingBox::new(0.0, -0.5, 1024.0, 1024.0),
            BoundingBox::new(0.0, 0.0, 1024.5, 1024.0),
            BoundingBox::new(0.0, 0.0, 1024.0, 1024.5),
            BoundingBox::new(-10.0, -10.0, 2000.0, 2000.0),
        ] {
            assert!(map.outside_max_bounding_box(&bbox));
            assert!(matches!(map.tiles_for(set, &bbox), Err(Error::OutOfBounds { .. })));
        }
    }

    #[test]
    fn max_bounding_box_is_not_outside() {
        let map = tile_map();

        assert!(!map.outside_max_bounding_box(&map.bounding_box()));
        assert!(!map.outside_max_bounding_box(&BoundingBox::new(1.0, 1.0, 2.0, 2.0)));
        assert!(!map.outside_max_bounding_box(&BoundingBox::new(0.0, 500.0, 1024.0, 1024.0)));
    }

    #[test]
    fn clip_to_max_bounding_box() {
        let map = tile_map();

        for bbox in [
            BoundingBox::new(-100.0, -100.0, 500.0, 500.0),
            BoundingBox::new(100.0, 100.0, 200.0, 200.0),
            BoundingBox::new(-5000.0, -5000.0, 5000.0, 5000.0),
            BoundingBox::new(2000.0, 2000.0, 3000.0, 3000.0),
            BoundingBox::new(-300.0, 200.0, -100.0, 400.0),
        ] {
            let clipped = map.clip_to_max_bounding_box(&bbox);
            assert!(map.bounding_box().contains(&clipped));
            assert!(!map.outside_max_bounding_box(&clipped));
            assert_eq!(map.clip_to_max_bounding_box(&clipped), clipped);
        }

        assert_eq!(
            map.clip_to_max_bounding_box(&BoundingBox::new(-100.0, -100.0, 500.0, 500.0)),
            BoundingBox::new(0.0, 0.0, 500.0, 500.0)
        );
    }

    #[test]
    fn tile_image_format() {
        assert_eq!(tile_map_with_format("image/jpeg").tile_image_format(), ImageFormat::Jpeg);
        assert_eq!(tile_map_with_format("IMAGE/JPEG").tile_image_format(), ImageFormat::Jpeg);
        assert_eq!(tile_map_with_format("image/png").tile_image_format(), ImageFormat::Png);
        assert_eq!(tile_map_with_format("").tile_image_format(), ImageFormat::Png);
        assert_eq!(tile_map_with_format("foo/bar").tile_image_format(), ImageFormat::Png);
    }

    #[test]
    fn tile_set_lookup() {
        let map = tile_map();

        assert_eq!(map.tile_sets().iter().map(|s| s.order()).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(map.tile_set(1).map(|s| s.units_per_pixel()), Some(0.5));
        assert!(map.tile_set(7).is_none());
    }

    #[test]
    fn tile_set_for_resolution() {
        let map = tile_map();
        let order = |upp: f64, strategy| map.tile_set_for_resolution(upp, strategy).map(|s| s.order());

        assert_eq!(order(0.5, ResolutionStrategy::PreferLower), Some(1));
        assert_eq!(order(0.4, ResolutionStrategy::PreferLower), Some(1));
        assert_eq!(order(0.4, ResolutionStrategy::PreferHigher), Some(2));
        assert_eq!(order(0.3, ResolutionStrategy::Closest), Some(2));
        assert_eq!(order(0.45, ResolutionStrategy::Closest), Some(1));
        assert_eq!(order(10.0, ResolutionStrategy::PreferLower), Some(0));
        assert_eq!(order(10.0, ResolutionStrategy::PreferHigher), Some(0));
        assert_eq!(order(0.01, ResolutionStrategy::PreferLower), Some(2));
        assert_eq!(order(0.01, ResolutionStrategy::PreferHigher), Some(2));
    }

    #[test]
    fn tile_sets_must_share_origin() {
        let space = TileSetCoordinateSpace::new(Point::new(10.0, 0.0), max_bbox(), 256, 256, 1.0).expect("valid coordinate space");

        let result = TileMap::new(
            "shifted",
            Srs::from(crs::epsg::WGS84),
            max_bbox(),
            Point::new(0.0, 0.0),
            TileFormat::new(256, 256, "image/png", "png"),
            vec![TileSet::new(0, "tiles/0", space)],
            Box::new(UrlTileImageSourceFactory),
        );
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn non_finite_request_is_outside() {
        let map = tile_map();
        let set = &map.tile_sets()[0];

        for bbox in [
            BoundingBox::new(f64::NAN, 0.0, 100.0, 100.0),
            BoundingBox::new(0.0, 0.0, 100.0, f64::NAN),
            BoundingBox::new(0.0, f64::NEG_INFINITY, 100.0, 100.0),
        ] {
            assert!(map.outside_max_bounding_box(&bbox));
            assert!(matches!(map.tiles_for(set, &bbox), Err(Error::OutOfBounds { .. })));
        }
    }

    #[test]
    fn tile_grid_must_be_addressable() {
        let bbox = BoundingBox::new(-1e300, -1e300, 1e300, 1e300);
        let space = TileSetCoordinateSpace::new(Point::new(0.0, 0.0), bbox, 256, 256, 1e-300).expect("valid coordinate space");

        let result = TileMap::new(
            "endless",
            Srs::from(crs::epsg::WGS84),
            bbox,
            Point::new(0.0, 0.0),
            TileFormat::new(256, 256, "image/png", "png"),
            vec![TileSet::new(0, "tiles/0", space)],
            Box::new(UrlTileImageSourceFactory),
        );
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }
}
