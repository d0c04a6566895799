use core::fmt;

/// Image format of the tiles served by a tile map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    Jpeg,
    #[default]
    Png,
}

impl ImageFormat {
    /// Only `image/jpeg` (ignoring case) is recognized as jpeg, everything else is treated as png
    pub fn from_mime_type(mime_type: &str) -> Self {
        if mime_type.eq_ignore_ascii_case("image/jpeg") {
            ImageFormat::Jpeg
        } else {
            ImageFormat::Png
        }
    }

    pub fn mime_type(&self) -> &str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ImageFormat::Jpeg => "jpeg",
                ImageFormat::Png => "png",
            }
        )
    }
}

/// Tile format as declared in a tile map descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileFormat {
    pub width: u32,
    pub height: u32,
    pub mime_type: String,
    pub extension: String,
}

impl TileFormat {
    pub fn new(width: u32, height: u32, mime_type: impl Into<String>, extension: impl Into<String>) -> Self {
        TileFormat {
            width,
            height,
            mime_type: mime_type.into(),
            extension: extension.into(),
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        ImageFormat::from_mime_type(&self.mime_type)
    }
}

impl fmt::Display for TileFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({}x{}, .{})", self.mime_type, self.width, self.height, self.extension)
    }
}
