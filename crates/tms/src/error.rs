use thiserror::Error;

use geo::BoundingBox;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Can't locate source factory {0}")]
    UnknownFactory(String),
    #[error("Can't instantiate source factory {name}: {reason}")]
    FactoryConstruction { name: String, reason: String },
    #[error("Invalid tile map descriptor: {0}")]
    Descriptor(String),
    #[error("Failed to create tile map \"{name}\": {source}")]
    TileMapCreation {
        name: String,
        #[source]
        source: Box<Error>,
    },
    #[error("Request bounding box: {bbox} exceeds maximum bounding box: {max}")]
    OutOfBounds { bbox: BoundingBox, max: BoundingBox },
    #[error("Unsupported resource type: {0}")]
    UnsupportedResourceType(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Geo error: {0}")]
    GeoError(#[from] geo::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl Error {
    /// Faults that only affect a single configured tile map, the registry skips the entry and continues
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::UnsupportedResourceType(_))
    }
}
