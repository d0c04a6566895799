use std::collections::HashMap;
use std::fmt;

use log::Level;

use crate::configuration::{Configuration, ResourceType, TileMapConfig};
use crate::{Error, FactoryResolver, Result, TileMap, TileMapBuilder};

/// The tile maps served by a tile map service, indexed by title.
///
/// The registry is built once from the configuration and is read-only afterwards.
#[derive(Debug, Default)]
pub struct TileMapRegistry {
    tile_maps: HashMap<String, TileMap>,
}

impl TileMapRegistry {
    /// Creates a tile map for every configured entry.
    ///
    /// Entries that fail to build are reported as warnings on `logger` and skipped.
    /// When several entries produce a tile map with the same title the last one is kept.
    /// An unsupported resource type is returned as an error and aborts the configuration.
    pub fn configure(config: &Configuration, resolver: &FactoryResolver, logger: &dyn log::Log) -> Result<Self> {
        let mut tile_maps = HashMap::new();

        for entry in config.tile_maps() {
            match create_tile_map(config, entry, resolver) {
                Ok(tile_map) => {
                    log_to(
                        logger,
                        Level::Info,
                        format_args!(
                            "Serving tile map \"{}\" [{}] ({} tile sets)",
                            tile_map.title(),
                            tile_map.srs(),
                            tile_map.tile_sets().len()
                        ),
                    );

                    let title = tile_map.title().to_string();
                    if tile_maps.insert(title.clone(), tile_map).is_some() {
                        log_to(
                            logger,
                            Level::Debug,
                            format_args!("Tile map \"{}\" replaces a previously configured tile map with the same title", title),
                        );
                    }
                }
                Err(err) if err.is_recoverable() => {
                    let err = Error::TileMapCreation {
                        name: entry.name.clone(),
                        source: Box::new(err),
                    };
                    log_to(logger, Level::Warn, format_args!("{err}"));
                }
                Err(err) => return Err(err),
            }
        }

        Ok(TileMapRegistry { tile_maps })
    }

    /// Configures the registry with the builtin factories, failures are reported on the global logger
    pub fn configure_default(config: &Configuration) -> Result<Self> {
        Self::configure(config, &FactoryResolver::default(), log::logger())
    }

    /// The titles of the registered tile maps, sorted
    pub fn tile_map_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tile_maps.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn tile_map(&self, name: &str) -> Option<&TileMap> {
        self.tile_maps.get(name)
    }

    pub fn len(&self) -> usize {
        self.tile_maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tile_maps.is_empty()
    }
}

fn create_tile_map(config: &Configuration, entry: &TileMapConfig, resolver: &FactoryResolver) -> Result<TileMap> {
    // an unsupported resource type is never hidden behind the recoverable faults of the entry
    let resource_type = entry.resource_type()?;
    let factory_id = entry.tile_image_source_factory()?;
    let path = entry.path()?;

    let factory = resolver.resolve(factory_id)?;
    let builder = match resource_type {
        ResourceType::File => TileMapBuilder::from_path(&config.descriptor_path(entry)?)?,
        ResourceType::Url => TileMapBuilder::from_url(path)?,
    };

    builder.build_tile_map(factory)
}

fn log_to(logger: &dyn log::Log, level: Level, args: fmt::Arguments) {
    logger.log(
        &log::Record::builder()
            .args(args)
            .level(level)
            .target(module_path!())
            .module_path_static(Some(module_path!()))
            .file_static(Some(file!()))
            .build(),
    );
}
