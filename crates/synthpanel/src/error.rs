use std::fmt;
use thiserror::Error;

use crate::extrusion::RegionKind;
use crate::kernel::KernelError;

/// Which enumeration an unrecognized key was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumKind {
    Format,
    Anchor,
    SupportType,
}

impl fmt::Display for EnumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EnumKind::Format => "format",
            EnumKind::Anchor => "anchor point",
            EnumKind::SupportType => "support type",
        })
    }
}

/// Stage of panel construction, reported when the kernel rejects a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    Sketch,
    Outline,
    Anchor,
    Rails,
    Shell,
    Slots,
    /// Zero-based index into the extrusion plan.
    Extrusion(usize),
    Finish,
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStep::Sketch => f.write_str("sketch"),
            BuildStep::Outline => f.write_str("outline"),
            BuildStep::Anchor => f.write_str("anchor"),
            BuildStep::Rails => f.write_str("rails"),
            BuildStep::Shell => f.write_str("shell"),
            BuildStep::Slots => f.write_str("slots"),
            BuildStep::Extrusion(n) => write!(f, "extrusion-{n}"),
            BuildStep::Finish => f.write_str("finish"),
        }
    }
}

/// Underlying cause of a failed construction step.
#[derive(Debug, Error)]
pub enum ConstructionFault {
    #[error(transparent)]
    Kernel(#[from] KernelError),
    #[error("no closed profile matches the {0} region")]
    MissingProfile(RegionKind),
    #[error("extrusion step {0} has not produced a body")]
    UnresolvedStep(usize),
}

/// Errors raised while resolving options or generating a panel.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("unknown {kind} key `{key}`")]
    InvalidEnumValue { kind: EnumKind, key: String },

    #[error("invalid value for {field}: {reason}")]
    InvalidParameterRange { field: &'static str, reason: String },

    #[error("geometry construction failed during {step}: {source}")]
    GeometryConstruction {
        step: BuildStep,
        #[source]
        source: ConstructionFault,
    },
}

impl PanelError {
    pub fn range(field: &'static str, reason: impl Into<String>) -> Self {
        PanelError::InvalidParameterRange {
            field,
            reason: reason.into(),
        }
    }

    pub fn construction(step: BuildStep, fault: impl Into<ConstructionFault>) -> Self {
        PanelError::GeometryConstruction {
            step,
            source: fault.into(),
        }
    }

    /// The failing build step, for construction errors.
    pub fn step(&self) -> Option<BuildStep> {
        match self {
            PanelError::GeometryConstruction { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// Tag kernel failures with the build step that issued the request.
pub trait DuringStep<T> {
    fn during(self, step: BuildStep) -> Result<T, PanelError>;
}

impl<T> DuringStep<T> for Result<T, KernelError> {
    fn during(self, step: BuildStep) -> Result<T, PanelError> {
        self.map_err(|err| PanelError::construction(step, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_names() {
        assert_eq!(BuildStep::Extrusion(1).to_string(), "extrusion-1");
        assert_eq!(BuildStep::Slots.to_string(), "slots");
    }

    #[test]
    fn test_construction_error_message() {
        let err = PanelError::construction(
            BuildStep::Extrusion(0),
            ConstructionFault::MissingProfile(RegionKind::SupportBand),
        );
        assert_eq!(err.step(), Some(BuildStep::Extrusion(0)));
        assert_eq!(
            err.to_string(),
            "geometry construction failed during extrusion-0: no closed profile matches the support band region"
        );
    }

    #[test]
    fn test_enum_error_message() {
        let err = PanelError::InvalidEnumValue {
            kind: EnumKind::SupportType,
            key: "foam".into(),
        };
        assert_eq!(err.to_string(), "unknown support type key `foam`");
    }
}
