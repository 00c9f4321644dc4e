use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

pub mod anchor;
pub mod format;
pub mod keyed;
pub mod store;
pub mod support;

pub use anchor::{AnchorPoint, AnchorTarget, Corner, Edge, HorizontalAnchor, VerticalAnchor};
pub use format::{FormatField, FormatId, FormatRecord};
pub use keyed::KeyedEnum;
pub use store::DefaultsStore;
pub use support::SupportType;

use crate::error::PanelError;
use crate::units::LengthUnit;

/// Narrowest panel the generator accepts, in width units.
pub const MIN_WIDTH_UNITS: u32 = 2;

/// Panels at least this wide get a second pair of mounting slots on the right.
pub const MIN_UNITS_FOR_RIGHT_SLOTS: u32 = 6;

/// Panels this wide center their single slot pair horizontally.
pub const CENTERED_SLOT_WIDTH_UNITS: u32 = 2;

/// Shortest thickness an extrusion expression can carry: a thousandth of a
/// millimetre, in centimetres.
pub const MIN_LENGTH: f64 = 1e-4;

/// Parameters for one panel. Lengths are centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelOptions {
    pub format_id: FormatId,
    #[serde(rename = "widthInHp")]
    pub width_in_units: u32,
    /// Thickness of the panel plate.
    pub panel_height: f64,
    pub anchor_point: AnchorPoint,
    pub support_type: SupportType,
    pub support_solid_height: f64,
    pub support_shell_height: f64,
    pub support_shell_wall_thickness: f64,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            format_id: FormatId::Eurorack3U,
            width_in_units: 6,
            panel_height: 0.2,
            anchor_point: AnchorPoint::TopLeft,
            support_type: SupportType::None,
            support_solid_height: 0.2,
            support_shell_height: 0.9,
            support_shell_wall_thickness: 0.1,
        }
    }
}

impl PanelOptions {
    pub fn format(&self) -> &'static FormatRecord {
        self.format_id.record()
    }

    pub fn unit_width(&self) -> f64 {
        self.format().resolve(FormatField::UnitWidth)
    }

    pub fn width(&self) -> f64 {
        f64::from(self.width_in_units) * self.unit_width()
    }

    pub fn panel_length(&self) -> f64 {
        self.format().panel_length
    }

    pub fn max_pcb_length(&self) -> f64 {
        self.format().max_pcb_length
    }

    pub fn rail_length(&self) -> f64 {
        self.format().rail_length()
    }

    pub fn slot_diameter(&self) -> f64 {
        self.format().resolve(FormatField::SlotDiameter)
    }

    pub fn slot_length(&self) -> f64 {
        self.format().resolve(FormatField::SlotLength)
    }

    /// Horizontal offset from a corner to the near end of its slot.
    ///
    /// The narrowest panels center the slot instead of using the format offset.
    pub fn slot_offset_x(&self) -> f64 {
        if self.width_in_units == CENTERED_SLOT_WIDTH_UNITS {
            (self.width() - self.slot_length()) / 2.0
        } else {
            self.format().resolve(FormatField::SlotOffsetX)
        }
    }

    pub fn slot_offset_y(&self) -> f64 {
        self.format().resolve(FormatField::SlotOffsetY)
    }

    pub fn has_right_slots(&self) -> bool {
        self.width_in_units >= MIN_UNITS_FOR_RIGHT_SLOTS
    }

    /// Width as `"<units> * <unit width>"` so later edits to the pitch propagate.
    pub fn width_as_expression(&self, unit: LengthUnit) -> String {
        format!("{} * {}", self.width_in_units, unit.format_value(self.unit_width()))
    }

    pub fn format_name(&self) -> &'static str {
        self.format_id.display_name()
    }

    pub fn anchor_point_name(&self) -> &'static str {
        self.anchor_point.display_name()
    }

    pub fn support_type_name(&self) -> &'static str {
        self.support_type.display_name()
    }

    pub fn component_name(&self) -> String {
        format!("{} {} HP Panel", self.format_name(), self.width_in_units)
    }

    /// The thickness fields the current support type actually uses.
    pub fn meaningful_heights(&self) -> Vec<(&'static str, f64)> {
        let mut heights = vec![("panelHeight", self.panel_height)];
        match self.support_type {
            SupportType::None => {}
            SupportType::Solid => heights.push(("supportSolidHeight", self.support_solid_height)),
            SupportType::Shell => {
                heights.push(("supportShellHeight", self.support_shell_height));
                heights.push((
                    "supportShellWallThickness",
                    self.support_shell_wall_thickness,
                ));
            }
        }
        heights
    }

    /// Check every invariant the profile builder relies on.
    pub fn validate(&self) -> Result<(), PanelError> {
        if self.width_in_units < MIN_WIDTH_UNITS {
            return Err(PanelError::range(
                "widthInHp",
                format!("must be at least {MIN_WIDTH_UNITS}, got {}", self.width_in_units),
            ));
        }
        for (field, value) in self.meaningful_heights() {
            if !value.is_finite() || value < MIN_LENGTH {
                return Err(PanelError::range(
                    field,
                    format!("must be a positive length of at least {MIN_LENGTH} cm, got {value}"),
                ));
            }
        }

        let format = self.format();
        if format.max_pcb_length >= format.panel_length {
            return Err(PanelError::range(
                "formatId",
                format!(
                    "max PCB length {} must be less than panel length {}",
                    format.max_pcb_length, format.panel_length
                ),
            ));
        }

        if self.support_type == SupportType::Shell {
            let wall = self.support_shell_wall_thickness;
            if 2.0 * wall >= self.width() || 2.0 * wall >= self.max_pcb_length() {
                return Err(PanelError::range(
                    "supportShellWallThickness",
                    format!("wall {wall} leaves no room for the shell pocket"),
                ));
            }
        }

        self.validate_slots()
    }

    /// [`validate`](Self::validate), then check that no thickness rounds to
    /// zero when written as an expression in `unit`.
    pub fn validate_for_unit(&self, unit: LengthUnit) -> Result<(), PanelError> {
        self.validate()?;
        for (field, value) in self.meaningful_heights() {
            if unit.rounds_to_zero(value) {
                return Err(PanelError::range(
                    field,
                    format!("{value} cm rounds to zero in {unit}"),
                ));
            }
        }
        Ok(())
    }

    fn validate_slots(&self) -> Result<(), PanelError> {
        let radius = self.slot_diameter() / 2.0;
        let near = self.slot_offset_x() - radius;
        let far = self.slot_offset_x() + self.slot_length() + radius;
        let x_limit = if self.has_right_slots() {
            self.width() / 2.0
        } else {
            self.width()
        };
        if near <= 0.0 || far >= x_limit {
            return Err(PanelError::range(
                "widthInHp",
                format!(
                    "mounting slots do not fit across a {} HP panel",
                    self.width_in_units
                ),
            ));
        }

        let y_limit = if self.support_type.rails_are_construction() {
            self.panel_length() / 2.0
        } else {
            self.rail_length()
        };
        let top = self.slot_offset_y() - radius;
        let bottom = self.slot_offset_y() + radius;
        if top <= 0.0 || bottom >= y_limit {
            return Err(PanelError::range(
                "formatId",
                "mounting slots do not fit inside the rail band",
            ));
        }
        Ok(())
    }

    /// Resolve options from a persisted record, layered over the defaults.
    ///
    /// Unknown enum keys are repaired to their default with a warning.
    /// Numbers of the wrong type or range are errors.
    pub fn from_record(record: &Map<String, Value>) -> Result<Self, PanelError> {
        let mut options = Self::default();

        if let Some(value) = record.get("formatId") {
            options.format_id = repair_key("formatId", value, options.format_id);
        }
        if let Some(value) = record.get("anchorPoint") {
            options.anchor_point = repair_key("anchorPoint", value, options.anchor_point);
        }
        if let Some(value) = record.get("supportType") {
            options.support_type = repair_key("supportType", value, options.support_type);
        }

        if let Some(value) = record.get("widthInHp").or_else(|| record.get("widthInUnits")) {
            options.width_in_units = value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| {
                    PanelError::range("widthInHp", format!("expected a whole number, got {value}"))
                })?;
        }

        let lengths: [(&'static str, &mut f64); 4] = [
            ("panelHeight", &mut options.panel_height),
            ("supportSolidHeight", &mut options.support_solid_height),
            ("supportShellHeight", &mut options.support_shell_height),
            (
                "supportShellWallThickness",
                &mut options.support_shell_wall_thickness,
            ),
        ];
        for (field, slot) in lengths {
            if let Some(value) = record.get(field) {
                *slot = value.as_f64().ok_or_else(|| {
                    PanelError::range(field, format!("expected a number, got {value}"))
                })?;
            }
        }

        options.validate()?;
        Ok(options)
    }

    /// Flat key/value record with the persisted key names.
    pub fn to_record(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

fn repair_key<E: KeyedEnum>(field: &str, value: &Value, default: E) -> E {
    match value.as_str().map(E::from_id) {
        Some(Ok(parsed)) => parsed,
        _ => {
            warn!(
                field,
                %value,
                default = default.id(),
                "invalid {} key, restoring default",
                E::KIND
            );
            default
        }
    }
}
