use kurbo::{Line, Point, Vec2};
use std::collections::HashMap;
use tracing::{debug, trace};

use super::regions::{loop_bounds, Arrangement};
use super::{
    CoincidentTarget, Dimension, DimensionOrientation, Endpoint, ExtrudeOperation, ExtrudeRequest,
    FaceInfo, FaceSurface, GeometricConstraint, KernelError, ProfileInfo, SketchArc, SketchKernel,
    SketchLine, SketchPoint,
};
use crate::geometry::region::loop_area;
use crate::geometry::{
    distance_to_line, BodyId, CurveId, DimensionId, PointId, SketchCurve, SketchId, TOLERANCE,
};
use crate::units::LengthUnit;

/// Largest gap allowed between an expression and the geometry it drives, in
/// the kernel's display unit.
///
/// Covers the three-decimal rounding of normalized expressions.
const EXPRESSION_TOLERANCE: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
enum CurveKind {
    Line {
        start: PointId,
        end: PointId,
    },
    Arc {
        center: PointId,
        start: PointId,
        sweep: f64,
    },
}

#[derive(Debug, Clone)]
struct CurveRecord {
    id: CurveId,
    kind: CurveKind,
    construction: bool,
}

/// A dimension with its measured value and optional driving expression.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionRecord {
    pub id: DimensionId,
    pub dimension: Dimension,
    pub value: f64,
    pub expression: Option<String>,
}

/// Sketch state kept by [`MemoryKernel`].
#[derive(Debug, Clone)]
pub struct MemorySketch {
    name: String,
    origin: PointId,
    points: HashMap<PointId, Point>,
    curves: Vec<CurveRecord>,
    constraints: Vec<GeometricConstraint>,
    dimensions: Vec<DimensionRecord>,
}

impl MemorySketch {
    fn new() -> Self {
        let origin = PointId::new();
        let mut points = HashMap::new();
        points.insert(origin, Point::ZERO);
        Self {
            name: String::from("Sketch"),
            origin,
            points,
            curves: Vec::new(),
            constraints: Vec::new(),
            dimensions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn point(&self, id: PointId) -> Option<Point> {
        self.points.get(&id).copied()
    }

    /// Number of points, including the origin.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn curve(&self, id: CurveId) -> Option<SketchCurve> {
        let record = self.curves.iter().find(|c| c.id == id)?;
        self.resolve(record).ok()
    }

    pub fn is_construction(&self, id: CurveId) -> Option<bool> {
        self.curves
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.construction)
    }

    /// All curves in creation order with their construction flag.
    pub fn curves(&self) -> Vec<(CurveId, SketchCurve, bool)> {
        self.curves
            .iter()
            .filter_map(|c| Some((c.id, self.resolve(c).ok()?, c.construction)))
            .collect()
    }

    pub fn constraints(&self) -> &[GeometricConstraint] {
        &self.constraints
    }

    pub fn dimensions(&self) -> &[DimensionRecord] {
        &self.dimensions
    }

    pub fn dimension(&self, id: DimensionId) -> Option<&DimensionRecord> {
        self.dimensions.iter().find(|d| d.id == id)
    }

    fn position(&self, id: PointId) -> Result<Point, KernelError> {
        self.point(id).ok_or(KernelError::UnknownPoint(id))
    }

    fn record(&self, id: CurveId) -> Result<&CurveRecord, KernelError> {
        self.curves
            .iter()
            .find(|c| c.id == id)
            .ok_or(KernelError::UnknownCurve(id))
    }

    fn resolve(&self, record: &CurveRecord) -> Result<SketchCurve, KernelError> {
        Ok(match record.kind {
            CurveKind::Line { start, end } => {
                SketchCurve::Line(Line::new(self.position(start)?, self.position(end)?))
            }
            CurveKind::Arc {
                center,
                start,
                sweep,
            } => SketchCurve::arc_from_center_start(
                self.position(center)?,
                self.position(start)?,
                sweep,
            ),
        })
    }

    fn line(&self, id: CurveId) -> Result<Line, KernelError> {
        match self.resolve(self.record(id)?)? {
            SketchCurve::Line(line) => Ok(line),
            SketchCurve::Arc(_) => Err(KernelError::WrongCurveKind { expected: "a line" }),
        }
    }

    /// Center and radius of an arc.
    fn circle(&self, id: CurveId) -> Result<(Point, f64), KernelError> {
        match self.resolve(self.record(id)?)? {
            SketchCurve::Arc(arc) => Ok((arc.center, arc.radii.x)),
            SketchCurve::Line(_) => Err(KernelError::WrongCurveKind { expected: "an arc" }),
        }
    }

    fn profile_curves(&self) -> Result<Vec<SketchCurve>, KernelError> {
        self.curves
            .iter()
            .filter(|c| !c.construction)
            .map(|c| self.resolve(c))
            .collect()
    }

    fn place(&mut self, endpoint: Endpoint) -> Result<SketchPoint, KernelError> {
        match endpoint {
            Endpoint::At(position) => Ok(self.insert_point(position)),
            Endpoint::Existing(point) => Ok(SketchPoint {
                id: point.id,
                position: self.position(point.id)?,
            }),
        }
    }

    fn insert_point(&mut self, position: Point) -> SketchPoint {
        let id = PointId::new();
        self.points.insert(id, position);
        SketchPoint { id, position }
    }

    fn check(&self, constraint: &GeometricConstraint) -> Result<(), KernelError> {
        let violated = |detail: String| KernelError::ConstraintViolated {
            constraint: constraint.name(),
            detail,
        };
        match *constraint {
            GeometricConstraint::Horizontal(id) => {
                let line = self.line(id)?;
                let rise = line.p1.y - line.p0.y;
                if rise.abs() > TOLERANCE {
                    return Err(violated(format!("line rises by {rise}")));
                }
            }
            GeometricConstraint::Vertical(id) => {
                let line = self.line(id)?;
                let run = line.p1.x - line.p0.x;
                if run.abs() > TOLERANCE {
                    return Err(violated(format!("line runs by {run}")));
                }
            }
            GeometricConstraint::Coincident { point, target } => {
                let p = self.position(point)?;
                let gap = match target {
                    CoincidentTarget::Point(other) => (self.position(other)? - p).hypot(),
                    CoincidentTarget::Curve(curve) => match self.resolve(self.record(curve)?)? {
                        SketchCurve::Line(line) => distance_to_line(line, p),
                        SketchCurve::Arc(arc) => ((p - arc.center).hypot() - arc.radii.x).abs(),
                    },
                };
                if gap > TOLERANCE {
                    return Err(violated(format!("point is {gap} away")));
                }
            }
            GeometricConstraint::Parallel(a, b) => {
                let (a, b) = (self.line(a)?, self.line(b)?);
                if !parallel(a, b) {
                    return Err(violated(String::from("lines are not parallel")));
                }
            }
            GeometricConstraint::Tangent(a, b) => {
                let (line, arc) = match (self.line(a), self.line(b)) {
                    (Ok(line), Err(_)) => (line, self.circle(b)?),
                    (Err(_), Ok(line)) => (line, self.circle(a)?),
                    _ => {
                        return Err(KernelError::WrongCurveKind {
                            expected: "a line and an arc",
                        })
                    }
                };
                let (center, radius) = arc;
                let gap = (distance_to_line(line, center) - radius).abs();
                if gap > TOLERANCE {
                    return Err(violated(format!("line misses the arc by {gap}")));
                }
            }
            GeometricConstraint::MidPoint { point, line } => {
                let p = self.position(point)?;
                let line = self.line(line)?;
                let gap = (line.p0.midpoint(line.p1) - p).hypot();
                if gap > TOLERANCE {
                    return Err(violated(format!("point is {gap} from the midpoint")));
                }
            }
        }
        Ok(())
    }

    fn measure(&self, dimension: &Dimension) -> Result<f64, KernelError> {
        match *dimension {
            Dimension::Distance {
                from,
                to,
                orientation,
                ..
            } => {
                let d = self.position(to)? - self.position(from)?;
                Ok(match orientation {
                    DimensionOrientation::Horizontal => d.x.abs(),
                    DimensionOrientation::Vertical => d.y.abs(),
                    DimensionOrientation::Aligned => d.hypot(),
                })
            }
            Dimension::Offset {
                reference, target, ..
            } => {
                let (reference, target) = (self.line(reference)?, self.line(target)?);
                if !parallel(reference, target) {
                    return Err(KernelError::ConstraintViolated {
                        constraint: "offset",
                        detail: String::from("lines are not parallel"),
                    });
                }
                Ok(distance_to_line(reference, target.p0))
            }
            Dimension::Diameter { arc, .. } => Ok(2.0 * self.circle(arc)?.1),
        }
    }
}

fn parallel(a: Line, b: Line) -> bool {
    let (da, db) = (a.p1 - a.p0, b.p1 - b.p0);
    let scale = da.hypot() * db.hypot();
    scale > 0.0 && (da.cross(db) / scale).abs() < TOLERANCE
}

/// A solid produced by [`MemoryKernel::extrude`].
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryBody {
    pub name: String,
    pub faces: Vec<FaceSurface>,
    /// Names of the extrude features that built this body.
    pub features: Vec<String>,
}

/// Deterministic in-memory kernel.
///
/// Geometry is placed exactly where it is requested; constraints and
/// dimensions are verified against the placed coordinates and rejected when
/// they do not hold. Extruded bodies list their faces as outer side walls,
/// start cap, hole side walls, end cap. A join appends the new side walls
/// and end cap to the target body.
#[derive(Debug, Clone)]
pub struct MemoryKernel {
    unit: LengthUnit,
    sketches: HashMap<SketchId, MemorySketch>,
    bodies: HashMap<BodyId, MemoryBody>,
    body_order: Vec<BodyId>,
}

impl Default for MemoryKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryKernel {
    /// A kernel that writes expressions in millimetres.
    pub fn new() -> Self {
        Self::with_unit(LengthUnit::Millimeter)
    }

    pub fn with_unit(unit: LengthUnit) -> Self {
        Self {
            unit,
            sketches: HashMap::new(),
            bodies: HashMap::new(),
            body_order: Vec::new(),
        }
    }

    pub fn sketch(&self, id: SketchId) -> Option<&MemorySketch> {
        self.sketches.get(&id)
    }

    pub fn body(&self, id: BodyId) -> Option<&MemoryBody> {
        self.bodies.get(&id)
    }

    /// Bodies in creation order.
    pub fn bodies(&self) -> Vec<(BodyId, &MemoryBody)> {
        self.body_order
            .iter()
            .filter_map(|id| self.bodies.get(id).map(|body| (*id, body)))
            .collect()
    }

    fn sketch_mut(&mut self, id: SketchId) -> Result<&mut MemorySketch, KernelError> {
        self.sketches
            .get_mut(&id)
            .ok_or(KernelError::UnknownSketch(id))
    }

    fn sketch_ref(&self, id: SketchId) -> Result<&MemorySketch, KernelError> {
        self.sketches.get(&id).ok_or(KernelError::UnknownSketch(id))
    }

    fn evaluate(&self, expression: &str) -> Result<f64, KernelError> {
        self.unit
            .evaluate(expression)
            .ok_or_else(|| KernelError::InvalidExpression(expression.to_string()))
    }

    fn start_height(&self, request: &ExtrudeRequest) -> Result<f64, KernelError> {
        let Some(face) = request.start_face else {
            return Ok(0.0);
        };
        let body = self
            .bodies
            .get(&face.body)
            .ok_or(KernelError::UnknownBody(face.body))?;
        match body.faces.get(face.index) {
            Some(FaceSurface::Cap { z, .. }) => Ok(*z),
            Some(_) => Err(KernelError::StartFaceNotCap(face.index)),
            None => Err(KernelError::FaceIndexOutOfRange {
                index: face.index,
                count: body.faces.len(),
            }),
        }
    }
}

fn side_faces(curves: &[SketchCurve]) -> impl Iterator<Item = FaceSurface> + '_ {
    curves.iter().map(|curve| match curve {
        SketchCurve::Line(line) => {
            let d = line.p1 - line.p0;
            FaceSurface::Wall {
                edge: *line,
                outward: Vec2::new(d.y, -d.x) / d.hypot(),
            }
        }
        SketchCurve::Arc(arc) => FaceSurface::Cylinder {
            center: arc.center,
            radius: arc.radii.x,
        },
    })
}

/// Top-to-bottom, then left-to-right order for boundary loops.
fn loop_order(curves: &[SketchCurve]) -> (i64, i64) {
    let bounds = loop_bounds(curves);
    (
        (-bounds.y1 / TOLERANCE).round() as i64,
        (bounds.x0 / TOLERANCE).round() as i64,
    )
}

impl SketchKernel for MemoryKernel {
    fn default_length_unit(&self) -> LengthUnit {
        self.unit
    }

    fn create_sketch(&mut self) -> Result<SketchId, KernelError> {
        let id = SketchId::new();
        self.sketches.insert(id, MemorySketch::new());
        debug!(sketch = %id, "created sketch");
        Ok(id)
    }

    fn rename_sketch(&mut self, sketch: SketchId, name: &str) -> Result<(), KernelError> {
        self.sketch_mut(sketch)?.name = name.to_string();
        Ok(())
    }

    fn origin_point(&self, sketch: SketchId) -> Result<SketchPoint, KernelError> {
        let sketch = self.sketch_ref(sketch)?;
        Ok(SketchPoint {
            id: sketch.origin,
            position: Point::ZERO,
        })
    }

    fn add_point(&mut self, sketch: SketchId, position: Point) -> Result<SketchPoint, KernelError> {
        Ok(self.sketch_mut(sketch)?.insert_point(position))
    }

    fn add_line(
        &mut self,
        sketch: SketchId,
        start: Endpoint,
        end: Endpoint,
    ) -> Result<SketchLine, KernelError> {
        let sketch = self.sketch_mut(sketch)?;
        if (end.position() - start.position()).hypot() < TOLERANCE {
            return Err(KernelError::DegenerateCurve("line"));
        }
        let start = sketch.place(start)?;
        let end = sketch.place(end)?;
        let id = CurveId::new();
        sketch.curves.push(CurveRecord {
            id,
            kind: CurveKind::Line {
                start: start.id,
                end: end.id,
            },
            construction: false,
        });
        trace!(curve = %id, ?start, ?end, "added line");
        Ok(SketchLine { id, start, end })
    }

    fn add_arc(
        &mut self,
        sketch: SketchId,
        center: Endpoint,
        start: Endpoint,
        sweep: f64,
    ) -> Result<SketchArc, KernelError> {
        let sketch = self.sketch_mut(sketch)?;
        if (start.position() - center.position()).hypot() < TOLERANCE || sweep.abs() < TOLERANCE {
            return Err(KernelError::DegenerateCurve("arc"));
        }
        let center = sketch.place(center)?;
        let start = sketch.place(start)?;
        let curve = SketchCurve::arc_from_center_start(center.position, start.position, sweep);
        let end = sketch.insert_point(curve.end());
        let id = CurveId::new();
        sketch.curves.push(CurveRecord {
            id,
            kind: CurveKind::Arc {
                center: center.id,
                start: start.id,
                sweep,
            },
            construction: false,
        });
        trace!(curve = %id, ?center, sweep, "added arc");
        Ok(SketchArc {
            id,
            center,
            start,
            end,
            sweep,
        })
    }

    fn set_construction(
        &mut self,
        sketch: SketchId,
        curve: CurveId,
        construction: bool,
    ) -> Result<(), KernelError> {
        let sketch = self.sketch_mut(sketch)?;
        let record = sketch
            .curves
            .iter_mut()
            .find(|c| c.id == curve)
            .ok_or(KernelError::UnknownCurve(curve))?;
        record.construction = construction;
        Ok(())
    }

    fn add_constraint(
        &mut self,
        sketch: SketchId,
        constraint: GeometricConstraint,
    ) -> Result<(), KernelError> {
        let sketch = self.sketch_mut(sketch)?;
        sketch.check(&constraint)?;
        sketch.constraints.push(constraint);
        Ok(())
    }

    fn add_dimension(
        &mut self,
        sketch: SketchId,
        dimension: Dimension,
    ) -> Result<DimensionId, KernelError> {
        let sketch = self.sketch_mut(sketch)?;
        let value = sketch.measure(&dimension)?;
        let id = DimensionId::new();
        sketch.dimensions.push(DimensionRecord {
            id,
            dimension,
            value,
            expression: None,
        });
        trace!(dimension = %id, value, "added dimension");
        Ok(id)
    }

    fn set_dimension_expression(
        &mut self,
        sketch: SketchId,
        dimension: DimensionId,
        expression: &str,
    ) -> Result<(), KernelError> {
        let evaluated = self.evaluate(expression)?;
        let tolerance = self.unit.to_cm(EXPRESSION_TOLERANCE);
        let record = self
            .sketch_mut(sketch)?
            .dimensions
            .iter_mut()
            .find(|d| d.id == dimension)
            .ok_or(KernelError::UnknownDimension(dimension))?;
        if (evaluated - record.value).abs() > tolerance {
            return Err(KernelError::ExpressionMismatch {
                expression: expression.to_string(),
                evaluated,
                measured: record.value,
            });
        }
        record.expression = Some(expression.to_string());
        Ok(())
    }

    fn profiles(&self, sketch: SketchId) -> Result<Vec<ProfileInfo>, KernelError> {
        let arrangement = Arrangement::build(&self.sketch_ref(sketch)?.profile_curves()?);
        Ok(arrangement
            .faces()
            .iter()
            .enumerate()
            .map(|(index, face)| ProfileInfo {
                index,
                region: face.region.clone(),
            })
            .collect())
    }

    fn extrude(&mut self, request: &ExtrudeRequest) -> Result<BodyId, KernelError> {
        if request.profiles.is_empty() {
            return Err(KernelError::EmptyProfileSelection);
        }
        if request.distance.abs() < TOLERANCE {
            return Err(KernelError::ZeroExtrusion);
        }
        let evaluated = self.evaluate(&request.distance_expression)?;
        if evaluated.abs() < TOLERANCE {
            return Err(KernelError::ZeroExtrusion);
        }
        if (evaluated - request.distance).abs() > self.unit.to_cm(EXPRESSION_TOLERANCE) {
            return Err(KernelError::ExpressionMismatch {
                expression: request.distance_expression.clone(),
                evaluated,
                measured: request.distance,
            });
        }
        if let ExtrudeOperation::Join(target) = request.operation {
            if !self.bodies.contains_key(&target) {
                return Err(KernelError::UnknownBody(target));
            }
        }

        let arrangement = Arrangement::build(&self.sketch_ref(request.sketch)?.profile_curves()?);
        let count = arrangement.faces().len();
        if let Some(&index) = request.profiles.iter().find(|&&i| i >= count) {
            return Err(KernelError::ProfileIndexOutOfRange { index, count });
        }
        let z0 = self.start_height(request)?;

        let (mut outers, mut holes): (Vec<_>, Vec<_>) = arrangement
            .boundary_loops(&request.profiles)
            .into_iter()
            .partition(|curves| loop_area(curves) > 0.0);
        outers.sort_by_key(|curves| loop_order(curves));
        holes.sort_by_key(|curves| loop_order(curves));

        let mut faces: Vec<FaceSurface> = outers.iter().flat_map(|l| side_faces(l)).collect();
        let start_cap = faces.len();
        faces.push(FaceSurface::Cap {
            z: z0,
            facing_up: request.distance < 0.0,
        });
        faces.extend(holes.iter().flat_map(|l| side_faces(l)));
        faces.push(FaceSurface::Cap {
            z: z0 + request.distance,
            facing_up: request.distance > 0.0,
        });

        let id = match request.operation {
            ExtrudeOperation::NewBody => {
                let id = BodyId::new();
                self.bodies.insert(
                    id,
                    MemoryBody {
                        name: format!("Body{}", self.body_order.len() + 1),
                        faces,
                        features: vec![request.name.clone()],
                    },
                );
                self.body_order.push(id);
                id
            }
            ExtrudeOperation::Join(target) => {
                faces.remove(start_cap);
                let body = self
                    .bodies
                    .get_mut(&target)
                    .ok_or(KernelError::UnknownBody(target))?;
                body.faces.extend(faces);
                body.features.push(request.name.clone());
                target
            }
        };
        debug!(
            body = %id,
            feature = %request.name,
            profiles = ?request.profiles,
            z0,
            distance = request.distance,
            "extruded"
        );
        Ok(id)
    }

    fn faces(&self, body: BodyId) -> Result<Vec<FaceInfo>, KernelError> {
        let body = self.bodies.get(&body).ok_or(KernelError::UnknownBody(body))?;
        Ok(body
            .faces
            .iter()
            .enumerate()
            .map(|(index, surface)| FaceInfo {
                index,
                surface: *surface,
            })
            .collect())
    }

    fn rename_body(&mut self, body: BodyId, name: &str) -> Result<(), KernelError> {
        self.bodies
            .get_mut(&body)
            .ok_or(KernelError::UnknownBody(body))?
            .name = name.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::FaceRef;

    fn rectangle(kernel: &mut MemoryKernel, sketch: SketchId, w: f64, h: f64) -> Vec<SketchLine> {
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ];
        let mut lines: Vec<SketchLine> = Vec::new();
        for i in 0..4 {
            let start = match lines.last() {
                Some(prev) => Endpoint::Existing(prev.end),
                None => Endpoint::At(corners[0]),
            };
            let end = if i == 3 {
                Endpoint::Existing(lines[0].start)
            } else {
                Endpoint::At(corners[i + 1])
            };
            lines.push(kernel.add_line(sketch, start, end).expect("line"));
        }
        lines
    }

    #[test]
    fn test_constraints_are_verified() {
        let mut kernel = MemoryKernel::new();
        let sketch = kernel.create_sketch().expect("sketch");
        let lines = rectangle(&mut kernel, sketch, 4.0, 2.0);

        kernel
            .add_constraint(sketch, GeometricConstraint::Horizontal(lines[0].id))
            .expect("bottom is horizontal");
        let err = kernel
            .add_constraint(sketch, GeometricConstraint::Horizontal(lines[1].id))
            .unwrap_err();
        assert!(matches!(
            err,
            KernelError::ConstraintViolated { constraint: "horizontal", .. }
        ));
        kernel
            .add_constraint(sketch, GeometricConstraint::Parallel(lines[0].id, lines[2].id))
            .expect("opposite sides are parallel");
        assert_eq!(kernel.sketch(sketch).expect("sketch").constraints().len(), 2);
    }

    #[test]
    fn test_dimension_expression_must_match() {
        let mut kernel = MemoryKernel::new();
        let sketch = kernel.create_sketch().expect("sketch");
        let lines = rectangle(&mut kernel, sketch, 3.048, 2.0);
        let width = kernel
            .add_dimension(
                sketch,
                Dimension::Distance {
                    from: lines[0].start.id,
                    to: lines[0].end.id,
                    orientation: DimensionOrientation::Horizontal,
                    label: Point::new(1.5, -0.2),
                    driving: true,
                },
            )
            .expect("dimension");
        kernel
            .set_dimension_expression(sketch, width, "6 * 5.08 mm")
            .expect("expression matches");
        let err = kernel
            .set_dimension_expression(sketch, width, "8 * 5.08 mm")
            .unwrap_err();
        assert!(matches!(err, KernelError::ExpressionMismatch { .. }));
        let record = kernel
            .sketch(sketch)
            .and_then(|s| s.dimension(width))
            .expect("record");
        assert_eq!(record.expression.as_deref(), Some("6 * 5.08 mm"));
    }

    #[test]
    fn test_extrude_and_join_face_order() {
        let mut kernel = MemoryKernel::new();
        let sketch = kernel.create_sketch().expect("sketch");
        rectangle(&mut kernel, sketch, 4.0, 2.0);
        assert_eq!(kernel.profiles(sketch).expect("profiles").len(), 1);

        let body = kernel
            .extrude(&ExtrudeRequest {
                sketch,
                profiles: vec![0],
                distance: -0.2,
                distance_expression: "-2 mm".into(),
                operation: ExtrudeOperation::NewBody,
                start_face: None,
                name: "Extrude Plate".into(),
            })
            .expect("extrude");
        let faces = kernel.faces(body).expect("faces");
        assert_eq!(faces.len(), 6);
        assert_eq!(
            faces[4].surface,
            FaceSurface::Cap {
                z: 0.0,
                facing_up: true
            }
        );
        assert!(matches!(faces[5].surface, FaceSurface::Cap { z, facing_up: false } if (z + 0.2).abs() < 1e-12));

        kernel
            .extrude(&ExtrudeRequest {
                sketch,
                profiles: vec![0],
                distance: -0.5,
                distance_expression: "-5 mm".into(),
                operation: ExtrudeOperation::Join(body),
                start_face: Some(FaceRef { body, index: 5 }),
                name: "Extrude Boss".into(),
            })
            .expect("join");
        let joined = kernel.body(body).expect("body");
        assert_eq!(joined.faces.len(), 11);
        assert!(matches!(joined.faces[10], FaceSurface::Cap { z, .. } if (z + 0.7).abs() < 1e-12));
        assert_eq!(joined.features, vec!["Extrude Plate", "Extrude Boss"]);
    }

    #[test]
    fn test_extrude_rejects_bad_requests() {
        let mut kernel = MemoryKernel::new();
        let sketch = kernel.create_sketch().expect("sketch");
        rectangle(&mut kernel, sketch, 1.0, 1.0);
        let request = ExtrudeRequest {
            sketch,
            profiles: vec![3],
            distance: -0.2,
            distance_expression: "-2 mm".into(),
            operation: ExtrudeOperation::NewBody,
            start_face: None,
            name: "Extrude".into(),
        };
        assert_eq!(
            kernel.extrude(&request),
            Err(KernelError::ProfileIndexOutOfRange { index: 3, count: 1 })
        );

        let mismatched = ExtrudeRequest {
            profiles: vec![0],
            distance_expression: "-3 mm".into(),
            ..request.clone()
        };
        assert!(matches!(
            kernel.extrude(&mismatched),
            Err(KernelError::ExpressionMismatch { .. })
        ));

        let body = kernel
            .extrude(&ExtrudeRequest {
                profiles: vec![0],
                ..request.clone()
            })
            .expect("extrude");
        let side_start = ExtrudeRequest {
            profiles: vec![0],
            start_face: Some(FaceRef { body, index: 0 }),
            ..request.clone()
        };
        assert_eq!(kernel.extrude(&side_start), Err(KernelError::StartFaceNotCap(0)));

        let rounded_away = ExtrudeRequest {
            profiles: vec![0],
            distance: -0.00004,
            distance_expression: "0 mm".into(),
            ..request
        };
        assert_eq!(kernel.extrude(&rounded_away), Err(KernelError::ZeroExtrusion));
    }

    #[test]
    fn test_construction_curves_form_no_profiles() {
        let mut kernel = MemoryKernel::new();
        let sketch = kernel.create_sketch().expect("sketch");
        let lines = rectangle(&mut kernel, sketch, 1.0, 1.0);
        kernel
            .set_construction(sketch, lines[2].id, true)
            .expect("construction");
        let s = kernel.sketch(sketch).expect("sketch");
        assert_eq!(s.is_construction(lines[2].id), Some(true));
        assert_eq!(s.is_construction(lines[0].id), Some(false));
        // four shared corners plus the origin
        assert_eq!(s.point_count(), 5);
        assert!(kernel.profiles(sketch).expect("profiles").is_empty());
    }

    #[test]
    fn test_aligned_distance_is_euclidean() {
        let mut kernel = MemoryKernel::new();
        let sketch = kernel.create_sketch().expect("sketch");
        let lines = rectangle(&mut kernel, sketch, 3.0, 4.0);
        let diagonal = kernel
            .add_dimension(
                sketch,
                Dimension::Distance {
                    from: lines[0].start.id,
                    to: lines[1].end.id,
                    orientation: DimensionOrientation::Aligned,
                    label: Point::new(1.5, 2.0),
                    driving: false,
                },
            )
            .expect("dimension");
        let value = kernel
            .sketch(sketch)
            .and_then(|s| s.dimension(diagonal))
            .map(|d| d.value);
        assert_eq!(value, Some(5.0));
    }

    #[test]
    fn test_arc_tangent_and_diameter() {
        let mut kernel = MemoryKernel::new();
        let sketch = kernel.create_sketch().expect("sketch");
        let line = kernel
            .add_line(
                sketch,
                Point::new(0.0, 1.0).into(),
                Point::new(2.0, 1.0).into(),
            )
            .expect("line");
        let arc = kernel
            .add_arc(
                sketch,
                Point::ZERO.into(),
                line.start.into(),
                std::f64::consts::PI,
            )
            .expect("arc");
        assert!((arc.end.position - Point::new(0.0, -1.0)).hypot() < 1e-12);
        kernel
            .add_constraint(sketch, GeometricConstraint::Tangent(line.id, arc.id))
            .expect("tangent");
        let diameter = kernel
            .add_dimension(
                sketch,
                Dimension::Diameter {
                    arc: arc.id,
                    label: Point::ZERO,
                },
            )
            .expect("diameter");
        let value = kernel
            .sketch(sketch)
            .and_then(|s| s.dimension(diameter))
            .map(|d| d.value);
        assert_eq!(value, Some(2.0));
    }
}
