use kurbo::{Line, Point, Vec2};
use thiserror::Error;

use crate::geometry::{BodyId, CurveId, DimensionId, PointId, Region, SketchCurve, SketchId};
use crate::units::LengthUnit;

pub mod memory;
mod regions;

pub use memory::{MemoryBody, MemoryKernel, MemorySketch};

/// A point placed in a sketch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SketchPoint {
    pub id: PointId,
    pub position: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SketchLine {
    pub id: CurveId,
    pub start: SketchPoint,
    pub end: SketchPoint,
}

impl SketchLine {
    pub fn line(&self) -> Line {
        Line::new(self.start.position, self.end.position)
    }
}

/// A circular arc given by center, start point and signed sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SketchArc {
    pub id: CurveId,
    pub center: SketchPoint,
    pub start: SketchPoint,
    pub end: SketchPoint,
    pub sweep: f64,
}

impl SketchArc {
    pub fn radius(&self) -> f64 {
        (self.start.position - self.center.position).hypot()
    }

    pub fn curve(&self) -> SketchCurve {
        SketchCurve::arc_from_center_start(self.center.position, self.start.position, self.sweep)
    }
}

/// Where a new curve starts or ends: a fresh position or an existing point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Endpoint {
    At(Point),
    Existing(SketchPoint),
}

impl Endpoint {
    pub fn position(&self) -> Point {
        match self {
            Endpoint::At(p) => *p,
            Endpoint::Existing(point) => point.position,
        }
    }
}

impl From<Point> for Endpoint {
    fn from(p: Point) -> Self {
        Endpoint::At(p)
    }
}

impl From<SketchPoint> for Endpoint {
    fn from(point: SketchPoint) -> Self {
        Endpoint::Existing(point)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoincidentTarget {
    Point(PointId),
    /// A line (anywhere on its infinite extension) or an arc's circle.
    Curve(CurveId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometricConstraint {
    Horizontal(CurveId),
    Vertical(CurveId),
    Coincident {
        point: PointId,
        target: CoincidentTarget,
    },
    Parallel(CurveId, CurveId),
    /// A line tangent to an arc.
    Tangent(CurveId, CurveId),
    MidPoint {
        point: PointId,
        line: CurveId,
    },
}

impl GeometricConstraint {
    pub fn name(&self) -> &'static str {
        match self {
            GeometricConstraint::Horizontal(_) => "horizontal",
            GeometricConstraint::Vertical(_) => "vertical",
            GeometricConstraint::Coincident { .. } => "coincident",
            GeometricConstraint::Parallel(..) => "parallel",
            GeometricConstraint::Tangent(..) => "tangent",
            GeometricConstraint::MidPoint { .. } => "midpoint",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionOrientation {
    Horizontal,
    Vertical,
    Aligned,
}

/// A dimensional constraint with the position of its label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    Distance {
        from: PointId,
        to: PointId,
        orientation: DimensionOrientation,
        label: Point,
        /// Non-driving dimensions only report a value.
        driving: bool,
    },
    /// Distance between two parallel lines.
    Offset {
        reference: CurveId,
        target: CurveId,
        label: Point,
    },
    Diameter {
        arc: CurveId,
        label: Point,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtrudeOperation {
    NewBody,
    Join(BodyId),
}

/// A face of a body, by index in the body's face list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRef {
    pub body: BodyId,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtrudeRequest {
    pub sketch: SketchId,
    pub profiles: Vec<usize>,
    /// Signed extent along +z, in centimetres.
    pub distance: f64,
    /// The same extent as a unit expression, e.g. `"-2 mm"`.
    pub distance_expression: String,
    pub operation: ExtrudeOperation,
    /// Face the extrusion starts from; the sketch plane when `None`.
    pub start_face: Option<FaceRef>,
    /// Feature name.
    pub name: String,
}

/// A closed sketch region available for extrusion.
#[derive(Debug, Clone)]
pub struct ProfileInfo {
    pub index: usize,
    pub region: Region,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FaceSurface {
    /// Planar face perpendicular to the extrusion axis.
    Cap { z: f64, facing_up: bool },
    /// Planar side wall swept from a straight profile edge.
    Wall { edge: Line, outward: Vec2 },
    /// Cylindrical side wall swept from an arc.
    Cylinder { center: Point, radius: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceInfo {
    pub index: usize,
    pub surface: FaceSurface,
}

/// Errors reported by a kernel when a request cannot be honored.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    #[error("unknown sketch {0}")]
    UnknownSketch(SketchId),
    #[error("unknown point {0}")]
    UnknownPoint(PointId),
    #[error("unknown curve {0}")]
    UnknownCurve(CurveId),
    #[error("unknown dimension {0}")]
    UnknownDimension(DimensionId),
    #[error("unknown body {0}")]
    UnknownBody(BodyId),
    #[error("degenerate {0}")]
    DegenerateCurve(&'static str),
    #[error("{constraint} constraint does not hold: {detail}")]
    ConstraintViolated {
        constraint: &'static str,
        detail: String,
    },
    #[error("cannot evaluate expression `{0}`")]
    InvalidExpression(String),
    #[error("expression `{expression}` evaluates to {evaluated} cm but the geometry measures {measured} cm")]
    ExpressionMismatch {
        expression: String,
        evaluated: f64,
        measured: f64,
    },
    #[error("profile index {index} out of range ({count} profiles)")]
    ProfileIndexOutOfRange { index: usize, count: usize },
    #[error("face index {index} out of range ({count} faces)")]
    FaceIndexOutOfRange { index: usize, count: usize },
    #[error("face {0} is not perpendicular to the extrusion axis")]
    StartFaceNotCap(usize),
    #[error("extrusion distance must be non-zero")]
    ZeroExtrusion,
    #[error("expected {expected}")]
    WrongCurveKind { expected: &'static str },
    #[error("no profiles selected")]
    EmptyProfileSelection,
}

/// Sketching, constraint and extrusion capability of a host CAD kernel.
///
/// Sketches lie on the XY plane; lengths are centimetres.
pub trait SketchKernel {
    /// Unit the host displays lengths in; expressions are written in it.
    fn default_length_unit(&self) -> LengthUnit;

    fn create_sketch(&mut self) -> Result<SketchId, KernelError>;

    fn rename_sketch(&mut self, sketch: SketchId, name: &str) -> Result<(), KernelError>;

    fn origin_point(&self, sketch: SketchId) -> Result<SketchPoint, KernelError>;

    fn add_point(&mut self, sketch: SketchId, position: Point) -> Result<SketchPoint, KernelError>;

    fn add_line(
        &mut self,
        sketch: SketchId,
        start: Endpoint,
        end: Endpoint,
    ) -> Result<SketchLine, KernelError>;

    fn add_arc(
        &mut self,
        sketch: SketchId,
        center: Endpoint,
        start: Endpoint,
        sweep: f64,
    ) -> Result<SketchArc, KernelError>;

    fn set_construction(
        &mut self,
        sketch: SketchId,
        curve: CurveId,
        construction: bool,
    ) -> Result<(), KernelError>;

    fn add_constraint(
        &mut self,
        sketch: SketchId,
        constraint: GeometricConstraint,
    ) -> Result<(), KernelError>;

    fn add_dimension(
        &mut self,
        sketch: SketchId,
        dimension: Dimension,
    ) -> Result<DimensionId, KernelError>;

    /// Drive a dimension by an expression in place of its measured value.
    fn set_dimension_expression(
        &mut self,
        sketch: SketchId,
        dimension: DimensionId,
        expression: &str,
    ) -> Result<(), KernelError>;

    /// Closed regions formed by the sketch's non-construction curves.
    fn profiles(&self, sketch: SketchId) -> Result<Vec<ProfileInfo>, KernelError>;

    fn extrude(&mut self, request: &ExtrudeRequest) -> Result<BodyId, KernelError>;

    fn faces(&self, body: BodyId) -> Result<Vec<FaceInfo>, KernelError>;

    fn rename_body(&mut self, body: BodyId, name: &str) -> Result<(), KernelError>;
}
