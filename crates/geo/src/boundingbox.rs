//! Axis aligned bounding boxes in map units.

use std::fmt;
use std::str::FromStr;

use approx::{AbsDiffEq, RelativeEq};

use crate::{Error, Point};

/// An axis aligned rectangle described by its lower left and upper right corner.
///
/// The y axis points north, so the lower left corner holds the minimum x and y values.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    lower_left: Point,
    upper_right: Point,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::from_points(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    /// Creates the smallest bounding box containing both points, the points can be any two opposite corners.
    pub fn from_points(p1: Point, p2: Point) -> Self {
        let lower_left = Point::new(min(p1.x(), p2.x()), min(p1.y(), p2.y()));
        let upper_right = Point::new(max(p1.x(), p2.x()), max(p1.y(), p2.y()));

        BoundingBox { lower_left, upper_right }
    }

    pub fn min_x(&self) -> f64 {
        self.lower_left.x()
    }

    pub fn min_y(&self) -> f64 {
        self.lower_left.y()
    }

    pub fn max_x(&self) -> f64 {
        self.upper_right.x()
    }

    pub fn max_y(&self) -> f64 {
        self.upper_right.y()
    }

    pub fn lower_left(&self) -> Point {
        self.lower_left
    }

    pub fn upper_right(&self) -> Point {
        self.upper_right
    }

    pub fn upper_left(&self) -> Point {
        Point::new(self.min_x(), self.max_y())
    }

    pub fn lower_right(&self) -> Point {
        Point::new(self.max_x(), self.min_y())
    }

    pub fn width(&self) -> f64 {
        self.max_x() - self.min_x()
    }

    pub fn height(&self) -> f64 {
        self.max_y() - self.min_y()
    }

    /// A bounding box without area (a line or a point) is empty
    pub fn is_empty(&self) -> bool {
        self.width() == 0.0 || self.height() == 0.0
    }

    /// False when any of the corner coordinates is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.min_x().is_finite() && self.min_y().is_finite() && self.max_x().is_finite() && self.max_y().is_finite()
    }

    /// True if `other` lies within this box, touching edges included
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.min_x() >= self.min_x()
            && other.min_y() >= self.min_y()
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    pub fn contains_point(&self, point: Point) -> bool {
        point.x() >= self.min_x() && point.x() <= self.max_x() && point.y() >= self.min_y() && point.y() <= self.max_y()
    }

    /// True if the interiors of both boxes overlap, adjacent boxes do not intersect
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x() < other.max_x()
            && self.max_x() > other.min_x()
            && self.min_y() < other.max_y()
            && self.max_y() > other.min_y()
    }

    /// Intersection of this box with `other`.
    ///
    /// The result always lies within `self`. When the boxes do not overlap the result is an
    /// empty box on the border of `self` closest to `other`.
    pub fn intersect(&self, other: &BoundingBox) -> BoundingBox {
        let min_x = clamp(other.min_x(), self.min_x(), self.max_x());
        let min_y = clamp(other.min_y(), self.min_y(), self.max_y());
        let max_x = clamp(other.max_x(), min_x, self.max_x());
        let max_y = clamp(other.max_y(), min_y, self.max_y());

        BoundingBox {
            lower_left: Point::new(min_x, min_y),
            upper_right: Point::new(max_x, max_y),
        }
    }
}

fn min(a: f64, b: f64) -> f64 {
    if a < b { a } else { b }
}

fn max(a: f64, b: f64) -> f64 {
    if b > a { b } else { a }
}

fn clamp(val: f64, lower: f64, upper: f64) -> f64 {
    max(lower, min(val, upper))
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BOX({} {}, {} {})",
            self.min_x(),
            self.min_y(),
            self.max_x(),
            self.max_y()
        )
    }
}

/// Parses a `minx,miny,maxx,maxy` string as used in tile requests
impl FromStr for BoundingBox {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()?;

        match values.as_slice() {
            [min_x, min_y, max_x, max_y] => Ok(BoundingBox::new(*min_x, *min_y, *max_x, *max_y)),
            _ => Err(Error::InvalidArgument(format!(
                "Bounding box requires 4 values (minx,miny,maxx,maxy), got: {s}"
            ))),
        }
    }
}

impl From<BoundingBox> for geo_types::Rect<f64> {
    fn from(bbox: BoundingBox) -> geo_types::Rect<f64> {
        geo_types::Rect::new(bbox.lower_left.0, bbox.upper_right.0)
    }
}

impl AbsDiffEq for BoundingBox {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.lower_left.abs_diff_eq(&other.lower_left, epsilon) && self.upper_right.abs_diff_eq(&other.upper_right, epsilon)
    }
}

impl RelativeEq for BoundingBox {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: Self::Epsilon, max_relative: Self::Epsilon) -> bool {
        self.lower_left.relative_eq(&other.lower_left, epsilon, max_relative)
            && self.upper_right.relative_eq(&other.upper_right, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite() {
        assert!(BoundingBox::new(-180.0, -90.0, 180.0, 90.0).is_finite());
        assert!(!BoundingBox::new(f64::NAN, 0.0, 10.0, 10.0).is_finite());
        assert!(!BoundingBox::new(0.0, 0.0, 10.0, f64::NAN).is_finite());
        assert!(!BoundingBox::new(0.0, f64::NEG_INFINITY, 10.0, 10.0).is_finite());
    }

    #[test]
    fn from_points_normalizes_corners() {
        let bbox = BoundingBox::from_points(Point::new(10.0, 0.0), Point::new(0.0, 10.0));

        assert_eq!(bbox.lower_left(), Point::new(0.0, 0.0));
        assert_eq!(bbox.upper_right(), Point::new(10.0, 10.0));
        assert_eq!(bbox.upper_left(), Point::new(0.0, 10.0));
        assert_eq!(bbox.lower_right(), Point::new(10.0, 0.0));
    }

    #[test]
    fn bounding_box_intersection() {
        let b1 = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b2 = BoundingBox::new(4.0, 4.0, 15.0, 5.0);

        let intersection = b1.intersect(&b2);
        assert_eq!(intersection, BoundingBox::new(4.0, 4.0, 10.0, 5.0));
        assert!(b1.intersects(&b2));
    }

    #[test]
    fn bounding_box_self_intersection() {
        let b1 = BoundingBox::new(-30.000_000_763_788_11, 29.999999619212282, 60.000000763788094, 71.999_998_473_439_09);
        assert_eq!(b1.intersect(&b1), b1);
    }

    #[test]
    fn disjoint_intersection_is_empty_and_inside() {
        let b1 = BoundingBox::new(22000.0, 153000.0, 259000.0, 245000.0);
        let b2 = BoundingBox::new(300000.0, 95800.0, 310000.0, 95900.0);

        let intersection = b1.intersect(&b2);
        assert!(!b1.intersects(&b2));
        assert!(intersection.is_empty());
        assert!(b1.contains(&intersection));
        assert_eq!(intersection.lower_left(), Point::new(259000.0, 153000.0));
    }

    #[test]
    fn adjacent_boxes_do_not_intersect() {
        let b1 = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b2 = BoundingBox::new(10.0, 0.0, 20.0, 10.0);

        assert!(!b1.intersects(&b2));
        assert!(b1.intersect(&b2).is_empty());
    }

    #[test]
    fn contains_includes_edges() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);

        assert!(bbox.contains(&bbox));
        assert!(bbox.contains(&BoundingBox::new(0.0, 2.0, 10.0, 3.0)));
        assert!(!bbox.contains(&BoundingBox::new(-0.1, 2.0, 10.0, 3.0)));
        assert!(bbox.contains_point(Point::new(10.0, 0.0)));
        assert!(!bbox.contains_point(Point::new(10.0, 10.5)));
    }

    #[test]
    fn parse_bounding_box() {
        let bbox: BoundingBox = "-180, -90,180,90".parse().expect("valid bounding box");
        assert_eq!(bbox, BoundingBox::new(-180.0, -90.0, 180.0, 90.0));

        assert!("1,2,3".parse::<BoundingBox>().is_err());
        assert!("1,2,3,a".parse::<BoundingBox>().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(BoundingBox::new(0.0, 1.5, 2.0, 3.0).to_string(), "BOX(0 1.5, 2 3)");
    }
}
