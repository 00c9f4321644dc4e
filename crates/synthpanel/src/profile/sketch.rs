use kurbo::{Point, Rect, Vec2};
use std::f64::consts::PI;

use crate::geometry::{left_normal, line_midpoint, points_coincide, DimensionId, SketchId};
use crate::kernel::{
    CoincidentTarget, Dimension, DimensionOrientation, Endpoint, GeometricConstraint, KernelError,
    SketchArc, SketchKernel, SketchLine, SketchPoint,
};
use crate::options::{Corner, Edge};

/// Four connected lines running counterclockwise from the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub bottom: SketchLine,
    pub right: SketchLine,
    pub top: SketchLine,
    pub left: SketchLine,
}

impl Rectangle {
    pub const EDGE_COUNT: usize = 4;

    pub fn corner(&self, corner: Corner) -> SketchPoint {
        match corner {
            Corner::TopLeft => self.top.end,
            Corner::TopRight => self.top.start,
            Corner::BottomLeft => self.bottom.start,
            Corner::BottomRight => self.bottom.end,
        }
    }

    pub fn edge(&self, edge: Edge) -> SketchLine {
        match edge {
            Edge::Bottom => self.bottom,
            Edge::Right => self.right,
            Edge::Top => self.top,
            Edge::Left => self.left,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.bottom.start.position, self.top.start.position)
    }
}

/// How one point was tied to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointPin {
    Coincident,
    Offset {
        horizontal: DimensionId,
        vertical: DimensionId,
    },
}

/// A rounded mounting slot around a construction centerline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotShape {
    pub centerline: SketchLine,
    /// Left then right of the centerline direction.
    pub sides: [SketchLine; 2],
    /// Around the centerline start, then its end.
    pub ends: [SketchArc; 2],
    pub diameter: DimensionId,
    pub length_pin: PointPin,
}

impl SlotShape {
    /// Side faces the slot cuts into an extruded body.
    pub fn wall_count(&self) -> usize {
        self.sides.len() + self.ends.len()
    }
}

/// Draw an axis-aligned rectangle from `start`, shrunk by `inset` on every side.
pub fn sketch_rectangle<K: SketchKernel + ?Sized>(
    kernel: &mut K,
    sketch: SketchId,
    start: Point,
    width: f64,
    length: f64,
    inset: f64,
) -> Result<Rectangle, KernelError> {
    let low = start + Vec2::new(inset, inset);
    let high = start + Vec2::new(width - inset, length - inset);

    let bottom = kernel.add_line(
        sketch,
        Endpoint::At(low),
        Endpoint::At(Point::new(high.x, low.y)),
    )?;
    let right = kernel.add_line(sketch, bottom.end.into(), Endpoint::At(high))?;
    let top = kernel.add_line(
        sketch,
        right.end.into(),
        Endpoint::At(Point::new(low.x, high.y)),
    )?;
    let left = kernel.add_line(sketch, top.end.into(), bottom.start.into())?;

    kernel.add_constraint(sketch, GeometricConstraint::Horizontal(bottom.id))?;
    kernel.add_constraint(sketch, GeometricConstraint::Vertical(right.id))?;
    kernel.add_constraint(sketch, GeometricConstraint::Horizontal(top.id))?;
    kernel.add_constraint(sketch, GeometricConstraint::Vertical(left.id))?;

    Ok(Rectangle {
        bottom,
        right,
        top,
        left,
    })
}

/// Dimension the bottom edge (width) and right edge (height).
pub fn constrain_rectangle_width_height<K: SketchKernel + ?Sized>(
    kernel: &mut K,
    sketch: SketchId,
    rectangle: &Rectangle,
    label_offset: f64,
) -> Result<(DimensionId, DimensionId), KernelError> {
    let width = kernel.add_dimension(
        sketch,
        Dimension::Distance {
            from: rectangle.bottom.start.id,
            to: rectangle.bottom.end.id,
            orientation: DimensionOrientation::Horizontal,
            label: line_midpoint(rectangle.bottom.line(), -label_offset),
            driving: true,
        },
    )?;
    let height = kernel.add_dimension(
        sketch,
        Dimension::Distance {
            from: rectangle.right.start.id,
            to: rectangle.right.end.id,
            orientation: DimensionOrientation::Vertical,
            label: line_midpoint(rectangle.right.line(), -label_offset),
            driving: true,
        },
    )?;
    Ok((width, height))
}

/// Horizontal line across the rectangle at `y`, its ends held on the left
/// and right edges.
pub fn sketch_horizontal_span<K: SketchKernel + ?Sized>(
    kernel: &mut K,
    sketch: SketchId,
    rectangle: &Rectangle,
    y: f64,
    construction: bool,
) -> Result<SketchLine, KernelError> {
    let line = kernel.add_line(
        sketch,
        Endpoint::At(Point::new(rectangle.left.start.position.x, y)),
        Endpoint::At(Point::new(rectangle.right.start.position.x, y)),
    )?;
    if construction {
        kernel.set_construction(sketch, line.id, true)?;
    }
    kernel.add_constraint(sketch, GeometricConstraint::Horizontal(line.id))?;
    kernel.add_constraint(
        sketch,
        GeometricConstraint::Coincident {
            point: line.start.id,
            target: CoincidentTarget::Curve(rectangle.left.id),
        },
    )?;
    kernel.add_constraint(
        sketch,
        GeometricConstraint::Coincident {
            point: line.end.id,
            target: CoincidentTarget::Curve(rectangle.right.id),
        },
    )?;
    Ok(line)
}

/// New point held at the midpoint of `line`.
pub fn sketch_line_midpoint<K: SketchKernel + ?Sized>(
    kernel: &mut K,
    sketch: SketchId,
    line: &SketchLine,
) -> Result<SketchPoint, KernelError> {
    let point = kernel.add_point(sketch, line_midpoint(line.line(), 0.0))?;
    kernel.add_constraint(
        sketch,
        GeometricConstraint::MidPoint {
            point: point.id,
            line: line.id,
        },
    )?;
    Ok(point)
}

/// Tie `point` to `reference`: coincident when they already meet, otherwise
/// a horizontal and a vertical distance.
pub fn constrain_point_to_point<K: SketchKernel + ?Sized>(
    kernel: &mut K,
    sketch: SketchId,
    point: SketchPoint,
    reference: SketchPoint,
) -> Result<PointPin, KernelError> {
    let p = point.position;
    let r = reference.position;
    if points_coincide(p, r) {
        kernel.add_constraint(
            sketch,
            GeometricConstraint::Coincident {
                point: reference.id,
                target: CoincidentTarget::Point(point.id),
            },
        )?;
        return Ok(PointPin::Coincident);
    }

    let horizontal = kernel.add_dimension(
        sketch,
        Dimension::Distance {
            from: reference.id,
            to: point.id,
            orientation: DimensionOrientation::Horizontal,
            label: Point::new(r.x, p.y).midpoint(p),
            driving: true,
        },
    )?;
    let vertical = kernel.add_dimension(
        sketch,
        Dimension::Distance {
            from: reference.id,
            to: point.id,
            orientation: DimensionOrientation::Vertical,
            label: Point::new(p.x, r.y).midpoint(p),
            driving: true,
        },
    )?;
    Ok(PointPin::Offset {
        horizontal,
        vertical,
    })
}

/// Sketch a rounded slot of `diameter` around the centerline `start`–`end`.
pub fn sketch_slot<K: SketchKernel + ?Sized>(
    kernel: &mut K,
    sketch: SketchId,
    start: Point,
    end: Point,
    diameter: f64,
) -> Result<SlotShape, KernelError> {
    let centerline = kernel.add_line(sketch, Endpoint::At(start), Endpoint::At(end))?;
    kernel.set_construction(sketch, centerline.id, true)?;
    let offset = left_normal(centerline.line()) * (diameter / 2.0);

    let left = kernel.add_line(
        sketch,
        Endpoint::At(start + offset),
        Endpoint::At(end + offset),
    )?;
    let right = kernel.add_line(
        sketch,
        Endpoint::At(start - offset),
        Endpoint::At(end - offset),
    )?;

    // Both arcs sweep counterclockwise: the first from the left side around
    // the start, the second from the right side around the end.
    let back = kernel.add_arc(sketch, centerline.start.into(), left.start.into(), PI)?;
    let front = kernel.add_arc(sketch, centerline.end.into(), right.end.into(), PI)?;

    kernel.add_constraint(sketch, GeometricConstraint::Parallel(left.id, right.id))?;
    kernel.add_constraint(
        sketch,
        GeometricConstraint::Coincident {
            point: back.end.id,
            target: CoincidentTarget::Point(right.start.id),
        },
    )?;
    kernel.add_constraint(
        sketch,
        GeometricConstraint::Coincident {
            point: front.end.id,
            target: CoincidentTarget::Point(left.end.id),
        },
    )?;
    for side in [left.id, right.id] {
        for arc in [back.id, front.id] {
            kernel.add_constraint(sketch, GeometricConstraint::Tangent(side, arc))?;
        }
    }

    let diameter = kernel.add_dimension(
        sketch,
        Dimension::Diameter {
            arc: back.id,
            label: back.end.position.midpoint(centerline.start.position),
        },
    )?;
    let length_pin = constrain_point_to_point(kernel, sketch, centerline.start, centerline.end)?;

    Ok(SlotShape {
        centerline,
        sides: [left, right],
        ends: [back, front],
        diameter,
        length_pin,
    })
}
