//! Coordinate reference system identifiers.

use std::fmt;
use std::str::FromStr;

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Epsg(u32);

impl Epsg {
    pub const fn new(code: u32) -> Self {
        Epsg(code)
    }

    pub fn code(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Epsg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

impl From<u32> for Epsg {
    fn from(code: u32) -> Self {
        Epsg::new(code)
    }
}

pub mod epsg {
    use super::Epsg;

    pub const WGS84: Epsg = Epsg::new(4326);
    pub const WGS84_WEB_MERCATOR: Epsg = Epsg::new(3857);
    pub const BELGIAN_LAMBERT72: Epsg = Epsg::new(31370);
}

/// Opaque spatial reference system identifier of the form `AUTHORITY:CODE` (e.g. `EPSG:4326`).
///
/// The authority is stored upper case, identifiers compare equal regardless of the authority casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Srs {
    authority: String,
    code: u32,
}

impl Srs {
    pub fn new(authority: &str, code: u32) -> Self {
        Srs {
            authority: authority.trim().to_uppercase(),
            code,
        }
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    /// The EPSG code if this identifier uses the EPSG authority
    pub fn epsg(&self) -> Option<Epsg> {
        (self.authority == "EPSG").then_some(Epsg::new(self.code))
    }
}

impl From<Epsg> for Srs {
    fn from(epsg: Epsg) -> Self {
        Srs::new("EPSG", epsg.code())
    }
}

impl fmt::Display for Srs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.authority, self.code)
    }
}

impl FromStr for Srs {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (authority, code) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| Error::InvalidSrs(format!("Expected AUTHORITY:CODE, got '{s}'")))?;

        if authority.trim().is_empty() {
            return Err(Error::InvalidSrs(format!("Missing authority in '{s}'")));
        }

        let code = code
            .trim()
            .parse::<u32>()
            .map_err(|e| Error::InvalidSrs(format!("Invalid code in '{s}': {e}")))?;

        Ok(Srs::new(authority, code))
    }
}
