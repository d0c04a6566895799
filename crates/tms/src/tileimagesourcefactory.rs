use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::tileimagesource::{FileTileImageSource, TileImageSource, UrlTileImageSource};
use crate::{Error, Result, TileCoordinate, TileSet};

/// Creates the image sources for the tiles of a tile map.
///
/// Implementations must not perform any I/O when creating a source.
pub trait TileImageSourceFactory: Send + Sync {
    fn create(&self, tile_set: &TileSet, coord: TileCoordinate, extension: &str) -> Arc<dyn TileImageSource>;
}

/// Resolves tiles in a `<href>/<column>/<row>.<extension>` directory layout.
/// Relative hrefs are resolved against the base directory when one is configured.
#[derive(Debug, Clone, Default)]
pub struct FileTileImageSourceFactory {
    base_dir: Option<PathBuf>,
}

impl FileTileImageSourceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        FileTileImageSourceFactory {
            base_dir: Some(base_dir.into()),
        }
    }
}

impl TileImageSourceFactory for FileTileImageSourceFactory {
    fn create(&self, tile_set: &TileSet, coord: TileCoordinate, extension: &str) -> Arc<dyn TileImageSource> {
        let href = tile_set.href();
        let tile_set_dir = PathBuf::from(href.strip_prefix("file://").unwrap_or(href));

        let mut path = match &self.base_dir {
            Some(base_dir) => base_dir.join(tile_set_dir),
            None => tile_set_dir,
        };
        path.push(coord.column.to_string());
        path.push(format!("{}.{}", coord.row, extension));

        Arc::new(FileTileImageSource::new(path))
    }
}

/// Resolves tiles as `<href>/<column>/<row>.<extension>` urls
#[derive(Debug, Clone, Default)]
pub struct UrlTileImageSourceFactory;

impl TileImageSourceFactory for UrlTileImageSourceFactory {
    fn create(&self, tile_set: &TileSet, coord: TileCoordinate, extension: &str) -> Arc<dyn TileImageSource> {
        Arc::new(UrlTileImageSource::new(format!(
            "{}/{}/{}.{}",
            tile_set.href().trim_end_matches('/'),
            coord.column,
            coord.row,
            extension
        )))
    }
}

pub type FactoryConstructor = Box<dyn Fn() -> Result<Box<dyn TileImageSourceFactory>> + Send + Sync>;

pub const FILE_FACTORY: &str = "file";
pub const URL_FACTORY: &str = "url";

/// Lookup table from configuration identifiers to tile image source factory constructors.
///
/// Identifiers are case insensitive. A missing identifier and a failing constructor are reported
/// as different errors so configuration mistakes can be told apart from broken factories.
pub struct FactoryResolver {
    constructors: HashMap<String, FactoryConstructor>,
}

impl FactoryResolver {
    /// Resolver without any registered factories
    pub fn empty() -> Self {
        FactoryResolver {
            constructors: HashMap::new(),
        }
    }

    /// Resolver with the `file` and `url` factories
    pub fn with_builtin_factories() -> Self {
        let mut resolver = Self::empty();
        resolver.register(FILE_FACTORY, || Ok(Box::new(FileTileImageSourceFactory::new())));
        resolver.register(URL_FACTORY, || Ok(Box::new(UrlTileImageSourceFactory)));
        resolver
    }

    /// Registers a constructor, replacing any constructor registered under the same identifier
    pub fn register<F>(&mut self, id: &str, constructor: F)
    where
        F: Fn() -> Result<Box<dyn TileImageSourceFactory>> + Send + Sync + 'static,
    {
        self.constructors.insert(id.to_lowercase(), Box::new(constructor));
    }

    pub fn resolve(&self, id: &str) -> Result<Box<dyn TileImageSourceFactory>> {
        let constructor = self
            .constructors
            .get(&id.to_lowercase())
            .ok_or_else(|| Error::UnknownFactory(id.to_string()))?;

        constructor().map_err(|err| Error::FactoryConstruction {
            name: id.to_string(),
            reason: err.to_string(),
        })
    }
}

impl Default for FactoryResolver {
    fn default() -> Self {
        Self::with_builtin_factories()
    }
}
