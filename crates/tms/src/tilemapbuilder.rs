//! Builds tile maps from TMS `TileMap` resource documents.
//!
//! ```xml
//! <TileMap version="1.0.0" tilemapservice="http://tms.osgeo.org/1.0.0/">
//!   <Title>World</Title>
//!   <SRS>EPSG:4326</SRS>
//!   <BoundingBox minx="-180" miny="-90" maxx="180" maxy="90" />
//!   <Origin x="-180" y="-90" />
//!   <TileFormat width="256" height="256" mime-type="image/jpeg" extension="jpg" />
//!   <TileSets profile="global-geodetic">
//!     <TileSet href="http://tms.osgeo.org/1.0.0/world/0" units-per-pixel="0.703125" order="0" />
//!   </TileSets>
//! </TileMap>
//! ```

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use geo::{BoundingBox, Point, Srs};
use reqwest::Url;
use xml::attribute::OwnedAttribute;
use xml::reader::{EventReader, XmlEvent};

use crate::{Error, Result, TileFormat, TileImageSourceFactory, TileMap, TileSet, TileSetCoordinateSpace};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
struct TileSetDescriptor {
    href: String,
    units_per_pixel: f64,
    order: u32,
}

/// The parsed content of a tile map document, turned into a [`TileMap`] once the tile image source factory is known.
#[derive(Debug, Clone, Default)]
pub struct TileMapBuilder {
    title: Option<String>,
    description: Option<String>,
    service_url: Option<String>,
    srs: Option<Srs>,
    bounding_box: Option<BoundingBox>,
    origin: Option<Point>,
    tile_format: Option<TileFormat>,
    tile_sets: Vec<TileSetDescriptor>,
}

impl TileMapBuilder {
    /// Reads the descriptor from a local file, relative tile set locations are resolved against the directory of the file
    pub fn from_path(path: &Path) -> Result<Self> {
        let xml = std::fs::read_to_string(path)
            .map_err(|e| Error::Descriptor(format!("Can't read tile map descriptor {}: {e}", path.to_string_lossy())))?;

        let mut builder = Self::from_xml(&xml)?;
        if let Some(base_dir) = path.parent() {
            for set in &mut builder.tile_sets {
                if !is_url(&set.href) && Path::new(&set.href).is_relative() {
                    set.href = base_dir.join(&set.href).to_string_lossy().to_string();
                }
            }
        }

        Ok(builder)
    }

    /// Downloads the descriptor, relative tile set locations are resolved against the descriptor url
    pub fn from_url(url: &str) -> Result<Self> {
        log::debug!("Fetching tile map descriptor: {url}");

        let descriptor_url = Url::parse(url).map_err(|e| Error::Descriptor(format!("Invalid descriptor url {url}: {e}")))?;
        let client = reqwest::blocking::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        let response = client
            .get(descriptor_url.clone())
            .send()
            .map_err(|e| Error::Descriptor(format!("Request for {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Descriptor(format!("HTTP {} from {url}", response.status())));
        }

        let xml = response
            .text()
            .map_err(|e| Error::Descriptor(format!("Failed to read response from {url}: {e}")))?;

        let mut builder = Self::from_xml(&xml)?;
        for set in &mut builder.tile_sets {
            set.href = resolve_href(&descriptor_url, &set.href)?;
        }

        Ok(builder)
    }

    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut builder = TileMapBuilder::default();
        let mut root_seen = false;
        let mut text = String::new();

        for event in EventReader::from_str(xml) {
            match event {
                Ok(XmlEvent::StartElement { name, attributes, .. }) => {
                    text.clear();
                    let element = name.local_name.as_str();

                    if !root_seen {
                        if element != "TileMap" {
                            return Err(Error::Descriptor(format!("Expected a TileMap document, found <{element}>")));
                        }
                        root_seen = true;
                        builder.service_url = attribute(&attributes, "tilemapservice").map(str::to_string);
                        continue;
                    }

                    match element {
                        "BoundingBox" => {
                            builder.bounding_box = Some(BoundingBox::new(
                                parse_attribute(&attributes, element, "minx")?,
                                parse_attribute(&attributes, element, "miny")?,
                                parse_attribute(&attributes, element, "maxx")?,
                                parse_attribute(&attributes, element, "maxy")?,
                            ));
                        }
                        "Origin" => {
                            builder.origin = Some(Point::new(
                                parse_attribute(&attributes, element, "x")?,
                                parse_attribute(&attributes, element, "y")?,
                            ));
                        }
                        "TileFormat" => {
                            builder.tile_format = Some(TileFormat::new(
                                parse_attribute(&attributes, element, "width")?,
                                parse_attribute(&attributes, element, "height")?,
                                required_attribute(&attributes, element, "mime-type")?,
                                required_attribute(&attributes, element, "extension")?,
                            ));
                        }
                        "TileSet" => {
                            builder.tile_sets.push(TileSetDescriptor {
                                href: required_attribute(&attributes, element, "href")?.to_string(),
                                units_per_pixel: parse_attribute(&attributes, element, "units-per-pixel")?,
                                order: parse_attribute(&attributes, element, "order")?,
                            });
                        }
                        _ => {}
                    }
                }
                Ok(XmlEvent::Characters(data)) | Ok(XmlEvent::CData(data)) => {
                    text.push_str(&data);
                }
                Ok(XmlEvent::EndElement { name }) => {
                    match name.local_name.as_str() {
                        "Title" => builder.title = Some(text.trim().to_string()),
                        "Abstract" => builder.description = Some(text.trim().to_string()),
                        "SRS" => builder.srs = Some(Srs::from_str(text.trim())?),
                        _ => {}
                    }
                    text.clear();
                }
                Err(e) => {
                    return Err(Error::Descriptor(format!("XML parse error: {e}")));
                }
                _ => {}
            }
        }

        if !root_seen {
            return Err(Error::Descriptor("Empty tile map document".to_string()));
        }

        Ok(builder)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Creates the tile map, the factory provides the image sources of its tiles
    pub fn build_tile_map(self, factory: Box<dyn TileImageSourceFactory>) -> Result<TileMap> {
        let title = required(self.title, "Title")?;
        let srs = required(self.srs, "SRS")?;
        let bounding_box = required(self.bounding_box, "BoundingBox")?;
        let origin = required(self.origin, "Origin")?;
        let tile_format = required(self.tile_format, "TileFormat")?;

        if self.tile_sets.is_empty() {
            return Err(Error::Descriptor(format!("Tile map '{title}' has no tile sets")));
        }

        let tile_sets = self
            .tile_sets
            .into_iter()
            .map(|set| {
                let space =
                    TileSetCoordinateSpace::new(origin, bounding_box, tile_format.width, tile_format.height, set.units_per_pixel)
                        .map_err(|e| Error::Descriptor(format!("Tile set {} of '{title}': {e}", set.order)))?;
                Ok(TileSet::new(set.order, set.href, space))
            })
            .collect::<Result<Vec<TileSet>>>()?;

        let tile_map = TileMap::new(title, srs, bounding_box, origin, tile_format, tile_sets, factory)?;
        Ok(match self.service_url {
            Some(url) => tile_map.with_service_url(url),
            None => tile_map,
        })
    }
}

fn is_url(href: &str) -> bool {
    href.contains("://")
}

fn resolve_href(base: &Url, href: &str) -> Result<String> {
    base.join(href)
        .map(String::from)
        .map_err(|e| Error::Descriptor(format!("Invalid tile set href '{href}' for {base}: {e}")))
}

fn required<T>(value: Option<T>, element: &str) -> Result<T> {
    value.ok_or_else(|| Error::Descriptor(format!("Missing <{element}> element")))
}

fn attribute<'a>(attributes: &'a [OwnedAttribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|attr| attr.name.local_name == name)
        .map(|attr| attr.value.as_str())
}

fn required_attribute<'a>(attributes: &'a [OwnedAttribute], element: &str, name: &str) -> Result<&'a str> {
    attribute(attributes, name).ok_or_else(|| Error::Descriptor(format!("Missing attribute '{name}' on <{element}>")))
}

fn parse_attribute<T: FromStr>(attributes: &[OwnedAttribute], element: &str, name: &str) -> Result<T> {
    let value = required_attribute(attributes, element, name)?;
    value
        .trim()
        .parse::<T>()
        .map_err(|_| Error::Descriptor(format!("Invalid value '{value}' for attribute '{name}' on <{element}>")))
}
