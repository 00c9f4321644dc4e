use kurbo::{Arc, BezPath, Line, Point, Rect, Shape as KurboShape, Vec2};

use super::TOLERANCE;

/// Tolerance used when approximating arcs with cubic Béziers.
const ARC_FLATTEN_TOLERANCE: f64 = 1e-5;

/// A drawable sketch curve: a straight segment or a circular arc.
///
/// Arcs are circular (`radii.x == radii.y`) and unrotated; positive sweep is
/// counterclockwise in the y-up sketch plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SketchCurve {
    /// A straight line segment.
    Line(Line),
    /// A circular arc.
    Arc(Arc),
}

impl SketchCurve {
    /// Build a circular arc from its center, start point and signed sweep.
    pub fn arc_from_center_start(center: Point, start: Point, sweep: f64) -> Self {
        let offset = start - center;
        SketchCurve::Arc(Arc::new(
            center,
            Vec2::new(offset.hypot(), offset.hypot()),
            offset.atan2(),
            sweep,
            0.0,
        ))
    }

    pub fn start(&self) -> Point {
        match self {
            SketchCurve::Line(line) => line.p0,
            SketchCurve::Arc(arc) => point_on_arc(arc, arc.start_angle),
        }
    }

    pub fn end(&self) -> Point {
        match self {
            SketchCurve::Line(line) => line.p1,
            SketchCurve::Arc(arc) => point_on_arc(arc, arc.start_angle + arc.sweep_angle),
        }
    }

    /// Unit direction of travel leaving the start point.
    pub fn start_tangent(&self) -> Vec2 {
        match self {
            SketchCurve::Line(line) => unit(line.p1 - line.p0),
            SketchCurve::Arc(arc) => arc_tangent(arc, arc.start_angle),
        }
    }

    /// Unit direction of travel arriving at the end point.
    pub fn end_tangent(&self) -> Vec2 {
        match self {
            SketchCurve::Line(line) => unit(line.p1 - line.p0),
            SketchCurve::Arc(arc) => arc_tangent(arc, arc.start_angle + arc.sweep_angle),
        }
    }

    /// The same curve traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        match self {
            SketchCurve::Line(line) => SketchCurve::Line(Line::new(line.p1, line.p0)),
            SketchCurve::Arc(arc) => SketchCurve::Arc(Arc::new(
                arc.center,
                arc.radii,
                arc.start_angle + arc.sweep_angle,
                -arc.sweep_angle,
                0.0,
            )),
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            SketchCurve::Line(line) => (line.p1 - line.p0).hypot(),
            SketchCurve::Arc(arc) => arc.radii.x * arc.sweep_angle.abs(),
        }
    }

    pub fn bounding_box(&self) -> Rect {
        match self {
            SketchCurve::Line(line) => line.bounding_box(),
            SketchCurve::Arc(arc) => arc.bounding_box(),
        }
    }

    /// Zero-length lines and zero-radius or zero-sweep arcs.
    pub fn is_degenerate(&self) -> bool {
        self.length() < TOLERANCE
    }

    /// Contribution of this curve to the signed area of a closed loop
    /// (Green's theorem, positive for counterclockwise loops).
    pub fn signed_area_contribution(&self) -> f64 {
        match self {
            SketchCurve::Line(line) => 0.5 * (line.p0.x * line.p1.y - line.p1.x * line.p0.y),
            SketchCurve::Arc(arc) => {
                let r = arc.radii.x;
                let a0 = arc.start_angle;
                let a1 = a0 + arc.sweep_angle;
                let c = arc.center;
                0.5 * (r * r * arc.sweep_angle + r * c.x * (a1.sin() - a0.sin())
                    - r * c.y * (a1.cos() - a0.cos()))
            }
        }
    }

    /// Append the curve to a path whose current point is the curve start.
    pub fn append_to(&self, path: &mut BezPath) {
        match self {
            SketchCurve::Line(line) => path.line_to(line.p1),
            SketchCurve::Arc(arc) => {
                for el in arc.append_iter(ARC_FLATTEN_TOLERANCE) {
                    path.push(el);
                }
            }
        }
    }
}

fn point_on_arc(arc: &Arc, angle: f64) -> Point {
    arc.center + Vec2::from_angle(angle) * arc.radii.x
}

fn arc_tangent(arc: &Arc, angle: f64) -> Vec2 {
    let dir = Vec2::new(-angle.sin(), angle.cos());
    if arc.sweep_angle < 0.0 {
        -dir
    } else {
        dir
    }
}

fn unit(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len < TOLERANCE {
        Vec2::ZERO
    } else {
        v / len
    }
}
