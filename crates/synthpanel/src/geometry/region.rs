use kurbo::{BezPath, Point, Rect, Shape as KurboShape};

use super::curve::SketchCurve;

/// A closed area of a sketch: one outer boundary plus zero or more holes.
#[derive(Debug, Clone)]
pub struct Region {
    /// Outer boundary, counterclockwise.
    pub outer: BezPath,
    /// Hole boundaries, clockwise.
    pub holes: Vec<BezPath>,
    area: f64,
}

impl Region {
    /// Build a region from chained boundary loops.
    pub fn from_loops(outer: &[SketchCurve], holes: &[Vec<SketchCurve>]) -> Self {
        let area = loop_area(outer).abs() - holes.iter().map(|h| loop_area(h).abs()).sum::<f64>();
        Self {
            outer: loop_path(outer),
            holes: holes.iter().map(|h| loop_path(h)).collect(),
            area,
        }
    }

    /// Enclosed area with holes subtracted.
    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn bounds(&self) -> Rect {
        self.outer.bounding_box()
    }

    pub fn hole_count(&self) -> usize {
        self.holes.len()
    }

    /// Check whether a point lies inside the region and outside every hole.
    pub fn contains(&self, pt: Point) -> bool {
        self.outer.winding(pt) != 0 && self.holes.iter().all(|hole| hole.winding(pt) == 0)
    }
}

/// Signed area of a closed chain of curves, positive when counterclockwise.
pub fn loop_area(curves: &[SketchCurve]) -> f64 {
    curves.iter().map(SketchCurve::signed_area_contribution).sum()
}

fn loop_path(curves: &[SketchCurve]) -> BezPath {
    let mut path = BezPath::new();
    if let Some(first) = curves.first() {
        path.move_to(first.start());
        for curve in curves {
            curve.append_to(&mut path);
        }
        path.close_path();
    }
    path
}
