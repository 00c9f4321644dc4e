use kurbo::{Point, Rect, Vec2};
use tracing::debug;

use crate::error::{BuildStep, DuringStep, PanelError};
use crate::geometry::{line_midpoint, DimensionId, SketchId};
use crate::kernel::{
    Dimension, DimensionOrientation, GeometricConstraint, KernelError, SketchKernel, SketchLine,
    SketchPoint,
};
use crate::options::{AnchorTarget, Corner, PanelOptions, SupportType};

pub mod sketch;
pub mod slots;

pub use sketch::{
    constrain_point_to_point, constrain_rectangle_width_height, sketch_horizontal_span,
    sketch_line_midpoint, sketch_rectangle, sketch_slot, PointPin, Rectangle, SlotShape,
};
pub use slots::{active_placements, MountingSlot, SlotPlacement, SLOT_PLACEMENTS};

pub const SKETCH_NAME: &str = "Panel";

/// Distance from a measured edge to its dimension label.
const DIMENSION_LABEL_OFFSET: f64 = 0.2;

/// The point of the outline pinned to the sketch origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub target: AnchorTarget,
    pub point: SketchPoint,
    pub pin: PointPin,
    /// Construction line through the middle of the panel, for the center anchor.
    pub mid_line: Option<SketchLine>,
}

/// Horizontal lines bounding the PCB envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rails {
    pub top: SketchLine,
    pub bottom: SketchLine,
    pub top_offset: DimensionId,
    pub bottom_offset: DimensionId,
    /// Reference-only distance between the two rails.
    pub spacing: DimensionId,
    pub construction: bool,
}

/// Inner rectangle of a shell support, one wall thickness inside the rail band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shell {
    pub rectangle: Rectangle,
    /// Bottom, right, top, left.
    pub offsets: [DimensionId; 4],
}

/// Handles to everything the builder put in the sketch.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileGeometry {
    pub sketch: SketchId,
    pub outline: Rectangle,
    pub width_dimension: DimensionId,
    pub height_dimension: DimensionId,
    pub anchor: Anchor,
    pub rails: Rails,
    pub shell: Option<Shell>,
    pub slots: Vec<MountingSlot>,
}

impl ProfileGeometry {
    pub fn panel_bounds(&self) -> Rect {
        self.outline.bounds()
    }

    pub fn top_rail_bounds(&self) -> Rect {
        let panel = self.panel_bounds();
        Rect::new(panel.x0, self.top_rail_y(), panel.x1, panel.y1)
    }

    pub fn bottom_rail_bounds(&self) -> Rect {
        let panel = self.panel_bounds();
        Rect::new(panel.x0, panel.y0, panel.x1, self.bottom_rail_y())
    }

    /// Area between the rails.
    pub fn rail_band_bounds(&self) -> Rect {
        let panel = self.panel_bounds();
        Rect::new(panel.x0, self.bottom_rail_y(), panel.x1, self.top_rail_y())
    }

    pub fn shell_bounds(&self) -> Option<Rect> {
        self.shell.map(|shell| shell.rectangle.bounds())
    }

    pub fn corner(&self, corner: Corner) -> Point {
        self.outline.corner(corner).position
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn top_slot_count(&self) -> usize {
        self.slots.iter().filter(|s| s.placement.is_top()).count()
    }

    pub fn bottom_slot_count(&self) -> usize {
        self.slot_count() - self.top_slot_count()
    }

    /// Index of the far cap of the body extruded from the whole panel.
    pub fn support_start_face_index(&self) -> usize {
        join_face_index(self.slots.iter().map(|s| s.shape.wall_count()).sum())
    }

    fn top_rail_y(&self) -> f64 {
        self.rails.top.start.position.y
    }

    fn bottom_rail_y(&self) -> f64 {
        self.rails.bottom.start.position.y
    }
}

/// Far cap of a panel body whose holes cut `slot_walls` side faces: the four
/// outline walls, the near cap, then the hole walls.
pub fn join_face_index(slot_walls: usize) -> usize {
    Rectangle::EDGE_COUNT + 1 + slot_walls
}

/// Emits the panel sketch for one set of options.
pub struct ProfileBuilder<'a, K: SketchKernel + ?Sized> {
    kernel: &'a mut K,
    options: &'a PanelOptions,
}

impl<'a, K: SketchKernel + ?Sized> ProfileBuilder<'a, K> {
    pub fn new(kernel: &'a mut K, options: &'a PanelOptions) -> Self {
        Self { kernel, options }
    }

    /// Outline, anchor, rails, optional shell, then slots. Stops at the first
    /// rejected request and reports the step it belonged to.
    pub fn build(mut self) -> Result<ProfileGeometry, PanelError> {
        let sketch = self.sketch().during(BuildStep::Sketch)?;
        let (outline, width_dimension, height_dimension) =
            self.outline(sketch).during(BuildStep::Outline)?;
        let anchor = self.anchor(sketch, &outline).during(BuildStep::Anchor)?;
        let rails = self.rails(sketch, &outline).during(BuildStep::Rails)?;
        let shell = match self.options.support_type {
            SupportType::Shell => Some(self.shell(sketch, &outline, &rails).during(BuildStep::Shell)?),
            SupportType::None | SupportType::Solid => None,
        };
        let slots = self.slots(sketch, &outline).during(BuildStep::Slots)?;

        Ok(ProfileGeometry {
            sketch,
            outline,
            width_dimension,
            height_dimension,
            anchor,
            rails,
            shell,
            slots,
        })
    }

    fn sketch(&mut self) -> Result<SketchId, KernelError> {
        let sketch = self.kernel.create_sketch()?;
        self.kernel.rename_sketch(sketch, SKETCH_NAME)?;
        Ok(sketch)
    }

    fn outline(
        &mut self,
        sketch: SketchId,
    ) -> Result<(Rectangle, DimensionId, DimensionId), KernelError> {
        let width = self.options.width();
        let length = self.options.panel_length();
        let start = self.options.anchor_point.panel_start(width, length);

        let rectangle = sketch_rectangle(&mut *self.kernel, sketch, start, width, length, 0.0)?;
        let (width_dimension, height_dimension) = constrain_rectangle_width_height(
            &mut *self.kernel,
            sketch,
            &rectangle,
            DIMENSION_LABEL_OFFSET,
        )?;
        let unit = self.kernel.default_length_unit();
        let expression = self.options.width_as_expression(unit);
        self.kernel
            .set_dimension_expression(sketch, width_dimension, &expression)?;

        debug!(width, length, %expression, "sketched outline");
        Ok((rectangle, width_dimension, height_dimension))
    }

    fn anchor(&mut self, sketch: SketchId, outline: &Rectangle) -> Result<Anchor, KernelError> {
        let target = self.options.anchor_point.target();
        let (point, mid_line) = match target {
            AnchorTarget::Corner(corner) => (outline.corner(corner), None),
            AnchorTarget::EdgeMidpoint(edge) => (
                sketch_line_midpoint(&mut *self.kernel, sketch, &outline.edge(edge))?,
                None,
            ),
            AnchorTarget::Center => {
                let y = outline.bounds().center().y;
                let line = sketch_horizontal_span(&mut *self.kernel, sketch, outline, y, true)?;
                self.kernel.add_constraint(
                    sketch,
                    GeometricConstraint::MidPoint {
                        point: line.start.id,
                        line: outline.left.id,
                    },
                )?;
                let point = sketch_line_midpoint(&mut *self.kernel, sketch, &line)?;
                (point, Some(line))
            }
        };

        let origin = self.kernel.origin_point(sketch)?;
        let pin = constrain_point_to_point(&mut *self.kernel, sketch, point, origin)?;
        debug!(anchor = ?target, pin = ?pin, "pinned anchor");
        Ok(Anchor {
            target,
            point,
            pin,
            mid_line,
        })
    }

    fn rails(&mut self, sketch: SketchId, outline: &Rectangle) -> Result<Rails, KernelError> {
        let rail = self.options.rail_length();
        let construction = self.options.support_type.rails_are_construction();
        let bounds = outline.bounds();

        let top =
            sketch_horizontal_span(&mut *self.kernel, sketch, outline, bounds.y1 - rail, construction)?;
        let bottom =
            sketch_horizontal_span(&mut *self.kernel, sketch, outline, bounds.y0 + rail, construction)?;
        let top_offset = self.rail_offset(sketch, &outline.top, &top)?;
        let bottom_offset = self.rail_offset(sketch, &outline.bottom, &bottom)?;

        let spacing = self.kernel.add_dimension(
            sketch,
            Dimension::Distance {
                from: bottom.start.id,
                to: top.start.id,
                orientation: DimensionOrientation::Vertical,
                label: bottom.start.position.midpoint(top.start.position)
                    + Vec2::new(-DIMENSION_LABEL_OFFSET, 0.0),
                driving: false,
            },
        )?;

        debug!(rail, construction, "sketched rails");
        Ok(Rails {
            top,
            bottom,
            top_offset,
            bottom_offset,
            spacing,
            construction,
        })
    }

    /// Vertical distance from a panel edge to its rail.
    fn rail_offset(
        &mut self,
        sketch: SketchId,
        panel_line: &SketchLine,
        rail: &SketchLine,
    ) -> Result<DimensionId, KernelError> {
        let from = panel_line.start.position;
        let to = rail.start.position;
        self.kernel.add_dimension(
            sketch,
            Dimension::Distance {
                from: panel_line.start.id,
                to: rail.start.id,
                orientation: DimensionOrientation::Vertical,
                label: Point::new(to.x - DIMENSION_LABEL_OFFSET, (from.y + to.y) / 2.0),
                driving: true,
            },
        )
    }

    fn shell(
        &mut self,
        sketch: SketchId,
        outline: &Rectangle,
        rails: &Rails,
    ) -> Result<Shell, KernelError> {
        let wall = self.options.support_shell_wall_thickness;
        let rectangle = sketch_rectangle(
            &mut *self.kernel,
            sketch,
            rails.bottom.start.position,
            self.options.width(),
            self.options.max_pcb_length(),
            wall,
        )?;

        let kernel = &mut *self.kernel;
        let mut offset = |reference: &SketchLine, target: &SketchLine| {
            kernel.add_dimension(
                sketch,
                Dimension::Offset {
                    reference: reference.id,
                    target: target.id,
                    label: line_midpoint(target.line(), -wall / 2.0),
                },
            )
        };
        let offsets = [
            offset(&rails.bottom, &rectangle.bottom)?,
            offset(&outline.right, &rectangle.right)?,
            offset(&rails.top, &rectangle.top)?,
            offset(&outline.left, &rectangle.left)?,
        ];

        debug!(wall, "sketched shell");
        Ok(Shell { rectangle, offsets })
    }

    fn slots(
        &mut self,
        sketch: SketchId,
        outline: &Rectangle,
    ) -> Result<Vec<MountingSlot>, KernelError> {
        let diameter = self.options.slot_diameter();
        let mut slots = Vec::with_capacity(SLOT_PLACEMENTS.len());
        for placement in active_placements(self.options) {
            let corner = outline.corner(placement.corner);
            let (start, end) = placement.centerline(corner.position, self.options);
            let shape = sketch_slot(&mut *self.kernel, sketch, start, end, diameter)?;
            let corner_pin =
                constrain_point_to_point(&mut *self.kernel, sketch, shape.centerline.start, corner)?;
            slots.push(MountingSlot {
                placement: *placement,
                shape,
                corner_pin,
            });
        }
        debug!(count = slots.len(), "placed mounting slots");
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::MemoryKernel;
    use crate::options::AnchorPoint;

    fn build(options: &PanelOptions) -> (MemoryKernel, ProfileGeometry) {
        let mut kernel = MemoryKernel::new();
        let geometry = ProfileBuilder::new(&mut kernel, options)
            .build()
            .expect("profile");
        (kernel, geometry)
    }

    #[test]
    fn test_default_profile() {
        let (kernel, geometry) = build(&PanelOptions::default());
        let bounds = geometry.panel_bounds();
        assert!((bounds.width() - 3.048).abs() < 1e-9);
        assert!((bounds.height() - 12.85).abs() < 1e-9);
        assert_eq!(geometry.corner(Corner::TopLeft), Point::ZERO);
        assert_eq!(geometry.anchor.pin, PointPin::Coincident);
        assert!(geometry.rails.construction);
        assert!(geometry.shell.is_none());
        assert_eq!(geometry.slot_count(), 4);
        assert_eq!(geometry.support_start_face_index(), 21);

        let sketch = kernel.sketch(geometry.sketch).expect("sketch");
        assert_eq!(sketch.name(), SKETCH_NAME);
        let width = sketch.dimension(geometry.width_dimension).expect("width");
        assert_eq!(width.expression.as_deref(), Some("6 * 5.08 mm"));
        let offset = sketch.dimension(geometry.rails.top_offset).expect("rail");
        assert!((offset.value - 0.925).abs() < 1e-9);
    }

    #[test]
    fn test_join_face_index_per_slot_count() {
        for (slots, walls, expected) in [(0, 0, 5), (2, 8, 13), (4, 16, 21)] {
            assert_eq!(join_face_index(walls), expected, "{slots} slots");
        }

        let (_, mut geometry) = build(&PanelOptions::default());
        assert_eq!(geometry.support_start_face_index(), 21);
        geometry.slots.truncate(2);
        assert_eq!(geometry.support_start_face_index(), 13);
        geometry.slots.clear();
        assert_eq!(geometry.support_start_face_index(), 5);
    }

    #[test]
    fn test_center_anchor_uses_mid_line() {
        let options = PanelOptions {
            anchor_point: AnchorPoint::MiddleCenter,
            ..Default::default()
        };
        let (_, geometry) = build(&options);
        let line = geometry.anchor.mid_line.expect("mid line");
        assert!(line.start.position.y.abs() < 1e-9);
        assert!(geometry.anchor.point.position.distance(Point::ZERO) < 1e-9);
        assert!(geometry.panel_bounds().center().distance(Point::ZERO) < 1e-9);
    }

    #[test]
    fn test_shell_sits_inside_rail_band() {
        let options = PanelOptions {
            support_type: SupportType::Shell,
            ..Default::default()
        };
        let (kernel, geometry) = build(&options);
        assert!(!geometry.rails.construction);
        let band = geometry.rail_band_bounds();
        let shell = geometry.shell_bounds().expect("shell");
        assert!((shell.x0 - band.x0 - 0.1).abs() < 1e-9);
        assert!((band.y1 - shell.y1 - 0.1).abs() < 1e-9);

        let sketch = kernel.sketch(geometry.sketch).expect("sketch");
        for id in geometry.shell.expect("shell").offsets {
            let dim = sketch.dimension(id).expect("offset");
            assert!((dim.value - 0.1).abs() < 1e-9);
        }
    }
}
