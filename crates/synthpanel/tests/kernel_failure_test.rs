use kurbo::Point;
use synthpanel::*;

/// The request a [`RefusingKernel`] turns down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Refusal {
    CreateSketch,
    Expression,
    OriginPoint,
    ReportedDimension,
    OffsetDimension,
    Arc,
    Extrude,
    RenameBody,
}

/// A memory kernel that rejects the first request of one kind.
struct RefusingKernel {
    inner: MemoryKernel,
    refusal: Refusal,
    refused: bool,
}

impl RefusingKernel {
    fn new(refusal: Refusal) -> Self {
        Self {
            inner: MemoryKernel::new(),
            refusal,
            refused: false,
        }
    }

    fn check(&mut self, request: Refusal) -> Result<(), KernelError> {
        if request == self.refusal && !self.refused {
            self.refused = true;
            return Err(KernelError::DegenerateCurve("refused request"));
        }
        Ok(())
    }
}

impl SketchKernel for RefusingKernel {
    fn default_length_unit(&self) -> LengthUnit {
        self.inner.default_length_unit()
    }

    fn create_sketch(&mut self) -> Result<SketchId, KernelError> {
        self.check(Refusal::CreateSketch)?;
        self.inner.create_sketch()
    }

    fn rename_sketch(&mut self, sketch: SketchId, name: &str) -> Result<(), KernelError> {
        self.inner.rename_sketch(sketch, name)
    }

    fn origin_point(&self, sketch: SketchId) -> Result<SketchPoint, KernelError> {
        if self.refusal == Refusal::OriginPoint {
            return Err(KernelError::UnknownSketch(sketch));
        }
        self.inner.origin_point(sketch)
    }

    fn add_point(&mut self, sketch: SketchId, position: Point) -> Result<SketchPoint, KernelError> {
        self.inner.add_point(sketch, position)
    }

    fn add_line(
        &mut self,
        sketch: SketchId,
        start: Endpoint,
        end: Endpoint,
    ) -> Result<SketchLine, KernelError> {
        self.inner.add_line(sketch, start, end)
    }

    fn add_arc(
        &mut self,
        sketch: SketchId,
        center: Endpoint,
        start: Endpoint,
        sweep: f64,
    ) -> Result<SketchArc, KernelError> {
        self.check(Refusal::Arc)?;
        self.inner.add_arc(sketch, center, start, sweep)
    }

    fn set_construction(
        &mut self,
        sketch: SketchId,
        curve: CurveId,
        construction: bool,
    ) -> Result<(), KernelError> {
        self.inner.set_construction(sketch, curve, construction)
    }

    fn add_constraint(
        &mut self,
        sketch: SketchId,
        constraint: GeometricConstraint,
    ) -> Result<(), KernelError> {
        self.inner.add_constraint(sketch, constraint)
    }

    fn add_dimension(
        &mut self,
        sketch: SketchId,
        dimension: Dimension,
    ) -> Result<DimensionId, KernelError> {
        match dimension {
            Dimension::Distance { driving: false, .. } => self.check(Refusal::ReportedDimension)?,
            Dimension::Offset { .. } => self.check(Refusal::OffsetDimension)?,
            _ => {}
        }
        self.inner.add_dimension(sketch, dimension)
    }

    fn set_dimension_expression(
        &mut self,
        sketch: SketchId,
        dimension: DimensionId,
        expression: &str,
    ) -> Result<(), KernelError> {
        self.check(Refusal::Expression)?;
        self.inner
            .set_dimension_expression(sketch, dimension, expression)
    }

    fn profiles(&self, sketch: SketchId) -> Result<Vec<ProfileInfo>, KernelError> {
        self.inner.profiles(sketch)
    }

    fn extrude(&mut self, request: &ExtrudeRequest) -> Result<BodyId, KernelError> {
        self.check(Refusal::Extrude)?;
        self.inner.extrude(request)
    }

    fn faces(&self, body: BodyId) -> Result<Vec<FaceInfo>, KernelError> {
        self.inner.faces(body)
    }

    fn rename_body(&mut self, body: BodyId, name: &str) -> Result<(), KernelError> {
        self.check(Refusal::RenameBody)?;
        self.inner.rename_body(body, name)
    }
}

fn refuse(refusal: Refusal, options: &PanelOptions) -> (RefusingKernel, PanelError) {
    let mut kernel = RefusingKernel::new(refusal);
    let err = generate_panel(&mut kernel, options).unwrap_err();
    assert!(kernel.refused || refusal == Refusal::OriginPoint);
    (kernel, err)
}

#[test]
fn test_sketch_steps_report_where_the_kernel_refused() {
    let shell = PanelOptions {
        support_type: SupportType::Shell,
        ..Default::default()
    };
    let cases = [
        (Refusal::CreateSketch, PanelOptions::default(), BuildStep::Sketch),
        (Refusal::Expression, PanelOptions::default(), BuildStep::Outline),
        (Refusal::OriginPoint, PanelOptions::default(), BuildStep::Anchor),
        (Refusal::ReportedDimension, PanelOptions::default(), BuildStep::Rails),
        (Refusal::OffsetDimension, shell, BuildStep::Shell),
        (Refusal::Arc, PanelOptions::default(), BuildStep::Slots),
        (Refusal::Arc, shell, BuildStep::Slots),
    ];

    for (refusal, options, step) in cases {
        let (kernel, err) = refuse(refusal, &options);
        assert_eq!(err.step(), Some(step), "{refusal:?}");
        assert!(
            matches!(
                &err,
                PanelError::GeometryConstruction {
                    source: ConstructionFault::Kernel(_),
                    ..
                }
            ),
            "{refusal:?}: {err}"
        );
        assert!(kernel.inner.bodies().is_empty(), "{refusal:?}");
    }
}

#[test]
fn test_refused_extrusion_leaves_no_body() {
    let options = PanelOptions {
        support_type: SupportType::Solid,
        ..Default::default()
    };
    let (kernel, err) = refuse(Refusal::Extrude, &options);
    assert_eq!(err.step(), Some(BuildStep::Extrusion(0)));
    assert!(kernel.inner.bodies().is_empty());
}

#[test]
fn test_refused_rename_keeps_the_unnamed_body() {
    let (kernel, err) = refuse(Refusal::RenameBody, &PanelOptions::default());
    assert_eq!(err.step(), Some(BuildStep::Finish));
    let bodies = kernel.inner.bodies();
    assert_eq!(bodies.len(), 1);
    assert_ne!(bodies[0].1.name, PANEL_BODY_NAME);
}
