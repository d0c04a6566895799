use std::fmt::Debug;

use approx::{AbsDiffEq, RelativeEq};

use crate::{Error, Point, Result};

/// Affine transformation from pixel space (column, row) to map coordinates.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct GeoTransform([f64; 6]);

impl GeoTransform {
    /// Creates a new `GeoTransform` from the provided coefficients.
    ///
    /// The coefficients are in the order: [top left x, pixel width, rotation (0 if north is up), top left y, rotation (0 if north is up), pixel height].
    pub const fn new(coefficients: [f64; 6]) -> Self {
        GeoTransform(coefficients)
    }

    /// North up transform, the pixel height is negative because rows grow southwards
    pub fn from_top_left_and_pixel_size(top_left: Point, pixel_width: f64, pixel_height: f64) -> Self {
        Self::new([top_left.x(), pixel_width, 0.0, top_left.y(), 0.0, -pixel_height])
    }

    /// Translates a pixel position to a map coordinate.
    /// Pixel (0, 0) is the top left corner.
    pub fn apply(&self, col: f64, row: f64) -> Point<f64> {
        let x = self.0[0] + self.0[1] * col + self.0[2] * row;
        let y = self.0[3] + self.0[4] * col + self.0[5] * row;
        Point::new(x, y)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.0[0], self.0[3])
    }

    /// The horizontal pixel size
    pub fn pixel_size_x(&self) -> f64 {
        self.0[1]
    }

    /// The vertical pixel size
    pub fn pixel_size_y(&self) -> f64 {
        self.0[5]
    }

    pub fn coefficients(&self) -> [f64; 6] {
        self.0
    }

    /// The map to pixel transformation.
    ///
    /// Only north up transforms can be inverted, a rotated transform or a zero pixel size is an error.
    pub fn invert(&self) -> Result<Self> {
        let [left, pixel_width, row_rotation, top, column_rotation, pixel_height] = self.0;

        if row_rotation != 0.0 || column_rotation != 0.0 {
            return Err(Error::InvalidArgument(format!("Can't invert rotated transform {self:?}")));
        }

        if pixel_width == 0.0 || pixel_height == 0.0 {
            return Err(Error::InvalidArgument(format!("Can't invert transform with zero pixel size {self:?}")));
        }

        Ok(GeoTransform([
            -left / pixel_width,
            1.0 / pixel_width,
            0.0,
            -top / pixel_height,
            0.0,
            1.0 / pixel_height,
        ]))
    }
}

impl From<[f64; 6]> for GeoTransform {
    fn from(coefficients: [f64; 6]) -> Self {
        GeoTransform(coefficients)
    }
}

impl From<GeoTransform> for [f64; 6] {
    fn from(geo_trans: GeoTransform) -> [f64; 6] {
        geo_trans.0
    }
}

impl Debug for GeoTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GeoTransform(topleft: ({}, {}), pixel_width: {}, pixel_height: {})",
            self.0[0],
            self.0[3],
            self.pixel_size_x(),
            self.pixel_size_y()
        )
    }
}

impl AbsDiffEq for GeoTransform {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.0.abs_diff_eq(&other.0, epsilon)
    }
}

impl RelativeEq for GeoTransform {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.0.relative_eq(&other.0, epsilon, max_relative)
    }
}
