use crate::error::{EnumKind, PanelError};

/// A closed set of options with a persisted id and a display name.
///
/// Forward lookups (`id`, `display_name`) are plain matches; reverse lookups
/// scan `ALL`, which never holds more than a handful of entries.
pub trait KeyedEnum: Copy + Eq + Sized + 'static {
    const KIND: EnumKind;
    const ALL: &'static [Self];

    fn id(self) -> &'static str;

    fn display_name(self) -> &'static str;

    fn from_id(id: &str) -> Result<Self, PanelError> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.id() == id)
            .ok_or_else(|| PanelError::InvalidEnumValue {
                kind: Self::KIND,
                key: id.to_string(),
            })
    }

    fn from_display_name(name: &str) -> Result<Self, PanelError> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.display_name() == name)
            .ok_or_else(|| PanelError::InvalidEnumValue {
                kind: Self::KIND,
                key: name.to_string(),
            })
    }

    /// Display names in declaration order, for populating pickers.
    fn display_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|v| v.display_name()).collect()
    }
}
