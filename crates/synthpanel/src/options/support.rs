use serde::{Deserialize, Serialize};

use super::keyed::KeyedEnum;
use crate::error::EnumKind;

/// Reinforcement extruded behind the panel between the rails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportType {
    None,
    Solid,
    Shell,
}

impl SupportType {
    /// Rails are real profile edges only when something is extruded between them.
    pub fn rails_are_construction(self) -> bool {
        self == SupportType::None
    }
}

impl KeyedEnum for SupportType {
    const KIND: EnumKind = EnumKind::SupportType;
    const ALL: &'static [Self] = &[SupportType::None, SupportType::Solid, SupportType::Shell];

    fn id(self) -> &'static str {
        match self {
            SupportType::None => "none",
            SupportType::Solid => "solid",
            SupportType::Shell => "shell",
        }
    }

    fn display_name(self) -> &'static str {
        match self {
            SupportType::None => "No reinforcements",
            SupportType::Solid => "Solid (good for larger blanks)",
            SupportType::Shell => "Shell (leaves space for components)",
        }
    }
}
