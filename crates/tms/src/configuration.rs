//! Tile map service configuration.
//!
//! ```json
//! {
//!     "tilemaps": [
//!         { "name": "world", "factory": "url", "path": "descriptors/world.xml", "type": "FILE" },
//!         { "name": "osm", "factory": "url", "path": "http://tms.example.com/1.0.0/osm", "type": "URL" }
//!     ]
//! }
//! ```
//!
//! Relative `FILE` paths are resolved against the directory of the configuration file.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Where a tile map descriptor is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    File,
    Url,
}

impl FromStr for ResourceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("FILE") {
            Ok(ResourceType::File)
        } else if s.eq_ignore_ascii_case("URL") {
            Ok(ResourceType::Url)
        } else {
            Err(Error::UnsupportedResourceType(s.to_string()))
        }
    }
}

/// A single declared tile map, fields are validated when the tile map is created
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileMapConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
}

impl TileMapConfig {
    pub fn tile_image_source_factory(&self) -> Result<&str> {
        self.factory
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .ok_or_else(|| Error::Configuration(format!("No tile image source factory configured for '{}'", self.name)))
    }

    pub fn path(&self) -> Result<&str> {
        self.path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| Error::Configuration(format!("No descriptor path configured for '{}'", self.name)))
    }

    /// A missing type is a configuration error, an unknown type is reported as `UnsupportedResourceType`
    pub fn resource_type(&self) -> Result<ResourceType> {
        self.resource_type
            .as_deref()
            .ok_or_else(|| Error::Configuration(format!("No resource type configured for '{}'", self.name)))?
            .trim()
            .parse()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    tilemaps: Vec<TileMapConfig>,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl Configuration {
    pub fn new(tilemaps: Vec<TileMapConfig>) -> Self {
        Configuration { tilemaps, base_dir: None }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_json(&contents)?;
        config.base_dir = path.parent().map(Path::to_path_buf);

        log::debug!(
            "Loaded configuration {} ({} tile maps)",
            path.to_string_lossy(),
            config.tilemaps.len()
        );

        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// The declared tile maps in declaration order
    pub fn tile_maps(&self) -> &[TileMapConfig] {
        &self.tilemaps
    }

    pub fn tile_map_names(&self) -> Vec<&str> {
        self.tilemaps.iter().map(|tm| tm.name.as_str()).collect()
    }

    /// The first declared tile map with the given name
    pub fn tile_map(&self, name: &str) -> Result<&TileMapConfig> {
        self.tilemaps
            .iter()
            .find(|tm| tm.name == name)
            .ok_or_else(|| Error::Configuration(format!("No tile map named '{name}' configured")))
    }

    /// Location of the descriptor of a `FILE` tile map, relative paths are relative to the configuration file
    pub fn descriptor_path(&self, tile_map: &TileMapConfig) -> Result<PathBuf> {
        let path = PathBuf::from(tile_map.path()?);
        Ok(match &self.base_dir {
            Some(base_dir) if path.is_relative() => base_dir.join(path),
            _ => path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "tilemaps": [
            { "name": "world", "factory": "url", "path": "world.xml", "type": "FILE" },
            { "name": "remote", "factory": "file", "path": "http://tms.example.com/1.0.0/remote", "type": "url" },
            { "name": "incomplete" },
            { "name": "odd", "factory": "url", "path": "odd.xml", "type": "FTP" }
        ]
    }"#;

    #[test]
    fn parse_configuration() -> Result<()> {
        let config = Configuration::from_json(CONFIG)?;

        assert_eq!(config.tile_map_names(), vec!["world", "remote", "incomplete", "odd"]);

        let world = config.tile_map("world")?;
        assert_eq!(world.tile_image_source_factory()?, "url");
        assert_eq!(world.path()?, "world.xml");
        assert_eq!(world.resource_type()?, ResourceType::File);

        assert_eq!(config.tile_map("remote")?.resource_type()?, ResourceType::Url);
        assert!(matches!(config.tile_map("missing"), Err(Error::Configuration(_))));
        Ok(())
    }

    #[test]
    fn missing_values_are_configuration_errors() -> Result<()> {
        let config = Configuration::from_json(CONFIG)?;
        let incomplete = config.tile_map("incomplete")?;

        assert!(matches!(incomplete.tile_image_source_factory(), Err(Error::Configuration(_))));
        assert!(matches!(incomplete.path(), Err(Error::Configuration(_))));
        assert!(matches!(incomplete.resource_type(), Err(Error::Configuration(_))));
        Ok(())
    }

    #[test]
    fn unknown_resource_type() -> Result<()> {
        let config = Configuration::from_json(CONFIG)?;
        assert!(matches!(
            config.tile_map("odd")?.resource_type(),
            Err(Error::UnsupportedResourceType(tag)) if tag == "FTP"
        ));
        Ok(())
    }

    #[test]
    fn descriptor_path_relative_to_base_dir() -> Result<()> {
        let config = Configuration::from_json(CONFIG)?.with_base_dir("/etc/tms");
        assert_eq!(config.descriptor_path(config.tile_map("world")?)?, PathBuf::from("/etc/tms/world.xml"));

        let config = Configuration::new(vec![TileMapConfig {
            name: "abs".to_string(),
            path: Some("/data/abs.xml".to_string()),
            ..Default::default()
        }])
        .with_base_dir("/etc/tms");
        assert_eq!(config.descriptor_path(config.tile_map("abs")?)?, PathBuf::from("/data/abs.xml"));
        Ok(())
    }

    #[test]
    fn invalid_json() {
        assert!(matches!(Configuration::from_json("{ \"tilemaps\": 5 }"), Err(Error::JsonError(_))));
    }
}
