//! Pixel-space geometry for takeoff measurements.

use crate::error::Error;

/// Representation of a 2D point in plan-image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Calculates the Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Total length of the path through `points`, summing consecutive segment
/// lengths. Fewer than two points yields 0.0. Traversal direction does not
/// affect the result.
pub fn line_length(points: &[Point]) -> f64 {
    points.windows(2).map(|seg| distance(seg[0], seg[1])).sum()
}

/// Calculates the area of a simple polygon using the shoelace formula.
///
/// The ring closes implicitly (the last vertex wraps back to the first), so
/// callers need not repeat the first point. Fewer than three vertices yields
/// 0.0 and the result is non-negative regardless of winding order.
pub fn polygon_area(vertices: &[Point]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..vertices.len() {
        let j = (i + 1) % vertices.len();
        sum += vertices[i].x * vertices[j].y - vertices[j].x * vertices[i].y;
    }
    sum.abs() * 0.5
}

/// Shortest distance from `p` to the segment between `a` and `b`.
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return distance(p, a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    distance(p, Point::new(a.x + t * dx, a.y + t * dy))
}

/// Tests whether `p` lies inside the polygon using ray casting.
pub fn point_in_polygon(p: Point, vertices: &[Point]) -> bool {
    if vertices.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > p.y) != (vj.y > p.y)
            && p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Converts a flat `[x0, y0, x1, y1, ...]` list into points, preserving order.
pub fn points_from_flat(flat: &[f64]) -> Result<Vec<Point>, Error> {
    if flat.len() % 2 != 0 {
        return Err(Error::OddCoordinateList(flat.len()));
    }
    Ok(flat.chunks(2).map(|c| Point::new(c[0], c[1])).collect())
}

/// Flattens points back into the `[x0, y0, x1, y1, ...]` wire layout.
pub fn points_to_flat(points: &[Point]) -> Vec<f64> {
    let mut flat = Vec::with_capacity(points.len() * 2);
    for p in points {
        flat.push(p.x);
        flat.push(p.y);
    }
    flat
}

/// Serde adapter storing a point list as a flat numeric array on the wire.
pub mod flat {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Point;

    pub fn serialize<S: Serializer>(points: &Vec<Point>, s: S) -> Result<S::Ok, S::Error> {
        super::points_to_flat(points).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Point>, D::Error> {
        let flat = Vec::<f64>::deserialize(d)?;
        super::points_from_flat(&flat).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter storing a single anchor point as a flat `[x, y]` array.
pub mod flat_point {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Point;

    pub fn serialize<S: Serializer>(p: &Point, s: S) -> Result<S::Ok, S::Error> {
        [p.x, p.y].serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Point, D::Error> {
        let pair = <[f64; 2]>::deserialize(d)?;
        Ok(Point::new(pair[0], pair[1]))
    }
}
