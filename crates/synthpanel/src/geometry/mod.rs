use kurbo::{Line, Point, Rect, Vec2};

pub mod curve;
pub mod ids;
pub mod region;

// Re-export public types
pub use curve::SketchCurve;
pub use ids::{BodyId, CurveId, DimensionId, PointId, SketchId};
pub use region::Region;

/// Distance below which two sketch positions are treated as the same point.
pub const TOLERANCE: f64 = 1e-6;

/// Midpoint of a line, optionally pushed `offset` along its left normal.
///
/// Used to place dimension labels beside the geometry they measure.
pub fn line_midpoint(line: Line, offset: f64) -> Point {
    let mid = line.p0.midpoint(line.p1);
    if offset == 0.0 {
        return mid;
    }
    mid + left_normal(line) * offset
}

/// Unit normal pointing to the left of the direction of travel.
pub fn left_normal(line: Line) -> Vec2 {
    let d = line.p1 - line.p0;
    let len = d.hypot();
    if len < TOLERANCE {
        return Vec2::ZERO;
    }
    Vec2::new(-d.y, d.x) / len
}

pub fn points_coincide(a: Point, b: Point) -> bool {
    (a - b).hypot() < TOLERANCE
}

/// Parameter of `pt` along the segment when it lies on the segment, else `None`.
pub fn segment_parameter(line: Line, pt: Point) -> Option<f64> {
    let d = line.p1 - line.p0;
    let len_sq = d.hypot2();
    if len_sq < TOLERANCE * TOLERANCE {
        return None;
    }
    let t = (pt - line.p0).dot(d) / len_sq;
    let foot = line.p0 + d * t;
    if (pt - foot).hypot() > TOLERANCE {
        return None;
    }
    let slack = TOLERANCE / len_sq.sqrt();
    (-slack..=1.0 + slack).contains(&t).then_some(t)
}

/// Distance from `pt` to the infinite line through `line`.
pub fn distance_to_line(line: Line, pt: Point) -> f64 {
    let d = line.p1 - line.p0;
    let len = d.hypot();
    if len < TOLERANCE {
        return (pt - line.p0).hypot();
    }
    d.cross(pt - line.p0).abs() / len
}

/// Compare two rectangles edge by edge within [`TOLERANCE`].
pub fn rects_match(a: Rect, b: Rect) -> bool {
    [
        (a.x0, b.x0),
        (a.y0, b.y0),
        (a.x1, b.x1),
        (a.y1, b.y1),
    ]
    .iter()
    .all(|(p, q)| (p - q).abs() < TOLERANCE * 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_midpoint_offset() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(2.0, 0.0));
        assert_eq!(line_midpoint(line, 0.0), Point::new(1.0, 0.0));
        assert_eq!(line_midpoint(line, 0.5), Point::new(1.0, 0.5));
        assert_eq!(line_midpoint(line, -0.5), Point::new(1.0, -0.5));
    }

    #[test]
    fn test_segment_parameter() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(0.0, 4.0));
        assert_eq!(segment_parameter(line, Point::new(0.0, 1.0)), Some(0.25));
        assert_eq!(segment_parameter(line, Point::new(0.1, 1.0)), None);
        assert_eq!(segment_parameter(line, Point::new(0.0, 5.0)), None);
    }

    #[test]
    fn test_distance_to_line() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        assert!((distance_to_line(line, Point::new(5.0, 3.0)) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_rects_match() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        assert!(rects_match(a, Rect::new(0.0, 0.0, 1.0 + 1e-9, 1.0)));
        assert!(!rects_match(a, Rect::new(0.0, 0.0, 1.1, 1.0)));
    }
}
