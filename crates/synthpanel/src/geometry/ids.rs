use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

macro_rules! ulid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Ulid);

        impl $name {
            /// Create a new id with a random ULID.
            pub fn new() -> Self {
                Self(Ulid::new())
            }

            /// Create an id from a ULID.
            pub fn from_ulid(ulid: Ulid) -> Self {
                Self(ulid)
            }

            /// Get the underlying ULID.
            pub fn ulid(&self) -> Ulid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

ulid_id!(
    /// Unique identifier for a sketch.
    SketchId
);
ulid_id!(
    /// Unique identifier for a sketch point.
    PointId
);
ulid_id!(
    /// Unique identifier for a sketch line or arc.
    CurveId
);
ulid_id!(
    /// Unique identifier for a sketch dimension.
    DimensionId
);
ulid_id!(
    /// Unique identifier for a solid body.
    BodyId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_id_creation() {
        let id1 = PointId::new();
        let id2 = PointId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_body_id_from_ulid() {
        let ulid = Ulid::new();
        let id = BodyId::from_ulid(ulid);
        assert_eq!(id.ulid(), ulid);
        assert_eq!(id.to_string(), ulid.to_string());
    }

    #[test]
    fn test_id_serialization() {
        let id = SketchId::new();
        let serialized = serde_json::to_string(&id).expect("serialize");
        let deserialized: SketchId = serde_json::from_str(&serialized).expect("deserialize");
        assert_eq!(id, deserialized);
    }
}
