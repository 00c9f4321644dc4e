use kurbo::Point;
use serde::{Deserialize, Serialize};

use super::keyed::KeyedEnum;
use crate::error::EnumKind;

/// The panel point pinned to the sketch origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorPoint {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalAnchor {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalAnchor {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Bottom,
    Right,
    Top,
    Left,
}

/// What kind of panel feature an anchor resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorTarget {
    Corner(Corner),
    EdgeMidpoint(Edge),
    Center,
}

impl VerticalAnchor {
    /// Y of the panel's bottom edge when this component sits at y = 0.
    pub fn panel_start_y(self, panel_length: f64) -> f64 {
        match self {
            VerticalAnchor::Top => -panel_length,
            VerticalAnchor::Middle => -panel_length / 2.0,
            VerticalAnchor::Bottom => 0.0,
        }
    }
}

impl HorizontalAnchor {
    /// X of the panel's left edge when this component sits at x = 0.
    pub fn panel_start_x(self, width: f64) -> f64 {
        match self {
            HorizontalAnchor::Left => 0.0,
            HorizontalAnchor::Center => -width / 2.0,
            HorizontalAnchor::Right => -width,
        }
    }
}

impl AnchorPoint {
    /// The four corner anchors offered by the older fixed-corner generator.
    pub const CORNERS: &'static [AnchorPoint] = &[
        AnchorPoint::TopLeft,
        AnchorPoint::TopRight,
        AnchorPoint::BottomLeft,
        AnchorPoint::BottomRight,
    ];

    pub fn new(vertical: VerticalAnchor, horizontal: HorizontalAnchor) -> Self {
        use HorizontalAnchor as H;
        use VerticalAnchor as V;
        match (vertical, horizontal) {
            (V::Top, H::Left) => AnchorPoint::TopLeft,
            (V::Top, H::Center) => AnchorPoint::TopCenter,
            (V::Top, H::Right) => AnchorPoint::TopRight,
            (V::Middle, H::Left) => AnchorPoint::MiddleLeft,
            (V::Middle, H::Center) => AnchorPoint::MiddleCenter,
            (V::Middle, H::Right) => AnchorPoint::MiddleRight,
            (V::Bottom, H::Left) => AnchorPoint::BottomLeft,
            (V::Bottom, H::Center) => AnchorPoint::BottomCenter,
            (V::Bottom, H::Right) => AnchorPoint::BottomRight,
        }
    }

    pub fn vertical(self) -> VerticalAnchor {
        match self {
            AnchorPoint::TopLeft | AnchorPoint::TopCenter | AnchorPoint::TopRight => {
                VerticalAnchor::Top
            }
            AnchorPoint::MiddleLeft | AnchorPoint::MiddleCenter | AnchorPoint::MiddleRight => {
                VerticalAnchor::Middle
            }
            AnchorPoint::BottomLeft | AnchorPoint::BottomCenter | AnchorPoint::BottomRight => {
                VerticalAnchor::Bottom
            }
        }
    }

    pub fn horizontal(self) -> HorizontalAnchor {
        match self {
            AnchorPoint::TopLeft | AnchorPoint::MiddleLeft | AnchorPoint::BottomLeft => {
                HorizontalAnchor::Left
            }
            AnchorPoint::TopCenter | AnchorPoint::MiddleCenter | AnchorPoint::BottomCenter => {
                HorizontalAnchor::Center
            }
            AnchorPoint::TopRight | AnchorPoint::MiddleRight | AnchorPoint::BottomRight => {
                HorizontalAnchor::Right
            }
        }
    }

    pub fn target(self) -> AnchorTarget {
        use HorizontalAnchor as H;
        use VerticalAnchor as V;
        match (self.vertical(), self.horizontal()) {
            (V::Top, H::Left) => AnchorTarget::Corner(Corner::TopLeft),
            (V::Top, H::Right) => AnchorTarget::Corner(Corner::TopRight),
            (V::Bottom, H::Left) => AnchorTarget::Corner(Corner::BottomLeft),
            (V::Bottom, H::Right) => AnchorTarget::Corner(Corner::BottomRight),
            (V::Top, H::Center) => AnchorTarget::EdgeMidpoint(Edge::Top),
            (V::Bottom, H::Center) => AnchorTarget::EdgeMidpoint(Edge::Bottom),
            (V::Middle, H::Left) => AnchorTarget::EdgeMidpoint(Edge::Left),
            (V::Middle, H::Right) => AnchorTarget::EdgeMidpoint(Edge::Right),
            (V::Middle, H::Center) => AnchorTarget::Center,
        }
    }

    /// Bottom-left corner of a `width` × `length` panel anchored here.
    pub fn panel_start(self, width: f64, length: f64) -> Point {
        Point::new(
            self.horizontal().panel_start_x(width),
            self.vertical().panel_start_y(length),
        )
    }
}

impl KeyedEnum for AnchorPoint {
    const KIND: EnumKind = EnumKind::Anchor;
    const ALL: &'static [Self] = &[
        AnchorPoint::TopLeft,
        AnchorPoint::TopCenter,
        AnchorPoint::TopRight,
        AnchorPoint::MiddleLeft,
        AnchorPoint::MiddleCenter,
        AnchorPoint::MiddleRight,
        AnchorPoint::BottomLeft,
        AnchorPoint::BottomCenter,
        AnchorPoint::BottomRight,
    ];

    fn id(self) -> &'static str {
        match self {
            AnchorPoint::TopLeft => "top-left",
            AnchorPoint::TopCenter => "top-center",
            AnchorPoint::TopRight => "top-right",
            AnchorPoint::MiddleLeft => "middle-left",
            AnchorPoint::MiddleCenter => "middle-center",
            AnchorPoint::MiddleRight => "middle-right",
            AnchorPoint::BottomLeft => "bottom-left",
            AnchorPoint::BottomCenter => "bottom-center",
            AnchorPoint::BottomRight => "bottom-right",
        }
    }

    fn display_name(self) -> &'static str {
        match self {
            AnchorPoint::TopLeft => "Top Left",
            AnchorPoint::TopCenter => "Top Center",
            AnchorPoint::TopRight => "Top Right",
            AnchorPoint::MiddleLeft => "Middle Left",
            AnchorPoint::MiddleCenter => "Center",
            AnchorPoint::MiddleRight => "Middle Right",
            AnchorPoint::BottomLeft => "Bottom Left",
            AnchorPoint::BottomCenter => "Bottom Center",
            AnchorPoint::BottomRight => "Bottom Right",
        }
    }
}
