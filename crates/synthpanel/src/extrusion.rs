use kurbo::Rect;
use std::fmt;
use tracing::{debug, info};

use crate::error::{BuildStep, ConstructionFault, DuringStep, PanelError};
use crate::geometry::{rects_match, BodyId};
use crate::kernel::{ExtrudeOperation, ExtrudeRequest, FaceRef, ProfileInfo, SketchKernel};
use crate::options::{PanelOptions, SupportType};
use crate::profile::ProfileGeometry;

/// Name given to the finished body.
pub const PANEL_BODY_NAME: &str = "Panel";

/// A closed region of the panel sketch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// The whole panel, used when the rails are construction lines.
    PanelOutline,
    TopRail,
    /// Everything between the rails of a solid panel.
    SupportBand,
    BottomRail,
    /// The ring between the rails and the shell pocket.
    ShellWall,
    ShellPocket,
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RegionKind::PanelOutline => "panel outline",
            RegionKind::TopRail => "top rail",
            RegionKind::SupportBand => "support band",
            RegionKind::BottomRail => "bottom rail",
            RegionKind::ShellWall => "shell wall",
            RegionKind::ShellPocket => "shell pocket",
        })
    }
}

impl RegionKind {
    /// Bounds and hole count the region has in `geometry`, or `None` when the
    /// sketch has no such region.
    pub fn signature(self, geometry: &ProfileGeometry) -> Option<(Rect, usize)> {
        match self {
            RegionKind::PanelOutline => Some((geometry.panel_bounds(), geometry.slot_count())),
            RegionKind::TopRail => Some((geometry.top_rail_bounds(), geometry.top_slot_count())),
            RegionKind::BottomRail => {
                Some((geometry.bottom_rail_bounds(), geometry.bottom_slot_count()))
            }
            RegionKind::SupportBand => match geometry.shell {
                None => Some((geometry.rail_band_bounds(), 0)),
                Some(_) => None,
            },
            RegionKind::ShellWall => geometry.shell.map(|_| (geometry.rail_band_bounds(), 1)),
            RegionKind::ShellPocket => geometry.shell_bounds().map(|bounds| (bounds, 0)),
        }
    }

    /// Index of the profile that is this region.
    pub fn locate(self, geometry: &ProfileGeometry, profiles: &[ProfileInfo]) -> Option<usize> {
        let (bounds, holes) = self.signature(geometry)?;
        profiles
            .iter()
            .find(|p| p.region.hole_count() == holes && rects_match(p.region.bounds(), bounds))
            .map(|p| p.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOperation {
    NewBody,
    /// Join onto the body made by an earlier step.
    Join { onto_step: usize },
}

/// A face of the body made by an earlier step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartFace {
    pub step: usize,
    pub face_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtrusionStep {
    pub name: &'static str,
    pub regions: Vec<RegionKind>,
    /// Signed depth along +z in centimetres; panels grow downward.
    pub depth: f64,
    pub operation: StepOperation,
    pub start_face: Option<StartFace>,
}

impl ExtrusionStep {
    pub fn feature_name(&self) -> String {
        format!("Extrude {}", self.name)
    }
}

/// Ordered extrusions for one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrusionPlan {
    pub steps: Vec<ExtrusionStep>,
}

impl ExtrusionPlan {
    pub fn for_panel(options: &PanelOptions, geometry: &ProfileGeometry) -> Self {
        let base = |regions: Vec<RegionKind>| ExtrusionStep {
            name: "Panel",
            regions,
            depth: -options.panel_height,
            operation: StepOperation::NewBody,
            start_face: None,
        };
        let support = |name, regions, height: f64| ExtrusionStep {
            name,
            regions,
            depth: -height,
            operation: StepOperation::Join { onto_step: 0 },
            start_face: Some(StartFace {
                step: 0,
                face_index: geometry.support_start_face_index(),
            }),
        };

        let steps = match options.support_type {
            SupportType::None => vec![base(vec![RegionKind::PanelOutline])],
            SupportType::Solid => vec![
                base(vec![
                    RegionKind::TopRail,
                    RegionKind::SupportBand,
                    RegionKind::BottomRail,
                ]),
                support(
                    "Support",
                    vec![RegionKind::SupportBand],
                    options.support_solid_height,
                ),
            ],
            SupportType::Shell => vec![
                base(vec![
                    RegionKind::TopRail,
                    RegionKind::ShellWall,
                    RegionKind::ShellPocket,
                    RegionKind::BottomRail,
                ]),
                support(
                    "Support Shell",
                    vec![RegionKind::ShellWall],
                    options.support_shell_height,
                ),
            ],
        };
        Self { steps }
    }

    /// Issue every step against `kernel` and name the result.
    pub fn execute<K: SketchKernel + ?Sized>(
        &self,
        kernel: &mut K,
        geometry: &ProfileGeometry,
    ) -> Result<BodyId, PanelError> {
        let unit = kernel.default_length_unit();
        let profiles = kernel
            .profiles(geometry.sketch)
            .during(BuildStep::Extrusion(0))?;
        debug!(count = profiles.len(), "found profiles");

        let mut bodies: Vec<BodyId> = Vec::with_capacity(self.steps.len());
        for (n, step) in self.steps.iter().enumerate() {
            let build_step = BuildStep::Extrusion(n);
            let body_of = |index: usize| {
                bodies.get(index).copied().ok_or_else(|| {
                    PanelError::construction(build_step, ConstructionFault::UnresolvedStep(index))
                })
            };

            let mut indices = Vec::with_capacity(step.regions.len());
            for &kind in &step.regions {
                let index = kind.locate(geometry, &profiles).ok_or_else(|| {
                    PanelError::construction(build_step, ConstructionFault::MissingProfile(kind))
                })?;
                indices.push(index);
            }
            let operation = match step.operation {
                StepOperation::NewBody => ExtrudeOperation::NewBody,
                StepOperation::Join { onto_step } => ExtrudeOperation::Join(body_of(onto_step)?),
            };
            let start_face = match step.start_face {
                Some(face) => Some(FaceRef {
                    body: body_of(face.step)?,
                    index: face.face_index,
                }),
                None => None,
            };

            let request = ExtrudeRequest {
                sketch: geometry.sketch,
                profiles: indices,
                distance: step.depth,
                distance_expression: unit.normalized_expression(step.depth),
                operation,
                start_face,
                name: step.feature_name(),
            };
            let body = kernel.extrude(&request).during(build_step)?;
            info!(
                step = n,
                feature = %request.name,
                profiles = ?request.profiles,
                depth = %request.distance_expression,
                "extruded"
            );
            bodies.push(body);
        }

        let body = bodies.last().copied().ok_or_else(|| {
            PanelError::construction(
                BuildStep::Finish,
                ConstructionFault::UnresolvedStep(self.steps.len()),
            )
        })?;
        kernel
            .rename_body(body, PANEL_BODY_NAME)
            .during(BuildStep::Finish)?;
        Ok(body)
    }
}
