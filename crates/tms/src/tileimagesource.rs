use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// Lazy reference to the image of a single tile.
///
/// Creating a source never touches the underlying storage, reading the image is left to the consumer.
pub trait TileImageSource: Debug + Send + Sync {
    /// Human readable location of the image (file path or url)
    fn location(&self) -> String;

    fn path(&self) -> Option<&Path> {
        None
    }

    fn url(&self) -> Option<&str> {
        None
    }
}

/// Tile image stored on the local filesystem
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileTileImageSource {
    path: PathBuf,
}

impl FileTileImageSource {
    pub fn new(path: PathBuf) -> Self {
        FileTileImageSource { path }
    }
}

impl TileImageSource for FileTileImageSource {
    fn location(&self) -> String {
        self.path.to_string_lossy().to_string()
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// Tile image available at a remote url
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UrlTileImageSource {
    url: String,
}

impl UrlTileImageSource {
    pub fn new(url: String) -> Self {
        UrlTileImageSource { url }
    }
}

impl TileImageSource for UrlTileImageSource {
    fn location(&self) -> String {
        self.url.clone()
    }

    fn url(&self) -> Option<&str> {
        Some(&self.url)
    }
}
