#![warn(clippy::unwrap_used)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Geometry primitives used to describe tile pyramids: points, bounding boxes,
//! spatial reference identifiers and affine pixel to map transforms.

pub type Result<T = ()> = std::result::Result<T, Error>;

mod boundingbox;
pub mod crs;
mod error;
mod geotransform;

#[doc(inline)]
pub use boundingbox::BoundingBox;
#[doc(inline)]
pub use crs::Epsg;
#[doc(inline)]
pub use crs::Srs;
#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use geotransform::GeoTransform;

pub type Point<T = f64> = geo_types::Point<T>;
