#![warn(clippy::unwrap_used)]

//! Lookup engine for TMS tile pyramids.
//!
//! A [`TileMapRegistry`] is configured from a list of tile map descriptors. Each [`TileMap`] answers
//! which tiles of one of its [`TileSet`]s cover a requested bounding box, the location of every tile
//! image is produced by the [`TileImageSourceFactory`] the tile map was configured with.

pub type Result<T = ()> = std::result::Result<T, Error>;

pub mod configuration;
mod error;
mod tile;
mod tilecoordinate;
mod tileformat;
mod tileimagesource;
pub mod tileimagesourcefactory;
mod tilemap;
mod tilemapbuilder;
mod tilemapregistry;
mod tileset;

#[cfg(test)]
mod testutils;

#[doc(inline)]
pub use configuration::{Configuration, ResourceType, TileMapConfig};
#[doc(inline)]
pub use error::Error;
pub use tile::Tile;
pub use tilecoordinate::TileCoordinate;
pub use tileformat::{ImageFormat, TileFormat};
pub use tileimagesource::{FileTileImageSource, TileImageSource, UrlTileImageSource};
#[doc(inline)]
pub use tileimagesourcefactory::{FactoryResolver, FileTileImageSourceFactory, TileImageSourceFactory, UrlTileImageSourceFactory};
pub use tilemap::{ResolutionStrategy, TileMap};
pub use tilemapbuilder::TileMapBuilder;
pub use tilemapregistry::TileMapRegistry;
pub use tileset::{TileSet, TileSetCoordinateSpace};
