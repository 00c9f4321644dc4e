use kurbo::{Point, Vec2};

use super::sketch::{PointPin, SlotShape};
use crate::options::{Corner, PanelOptions};

/// Where a mounting slot sits relative to its panel corner.
///
/// Signs point from the corner into the panel: top corners step down, right
/// corners step left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotPlacement {
    pub corner: Corner,
    pub vertical_sign: f64,
    pub horizontal_sign: f64,
}

/// Left pair first, then the right pair.
pub const SLOT_PLACEMENTS: [SlotPlacement; 4] = [
    SlotPlacement {
        corner: Corner::TopLeft,
        vertical_sign: -1.0,
        horizontal_sign: 1.0,
    },
    SlotPlacement {
        corner: Corner::BottomLeft,
        vertical_sign: 1.0,
        horizontal_sign: 1.0,
    },
    SlotPlacement {
        corner: Corner::TopRight,
        vertical_sign: -1.0,
        horizontal_sign: -1.0,
    },
    SlotPlacement {
        corner: Corner::BottomRight,
        vertical_sign: 1.0,
        horizontal_sign: -1.0,
    },
];

impl SlotPlacement {
    pub fn is_right(&self) -> bool {
        matches!(self.corner, Corner::TopRight | Corner::BottomRight)
    }

    pub fn is_top(&self) -> bool {
        matches!(self.corner, Corner::TopLeft | Corner::TopRight)
    }

    /// Centerline start and end for a slot at the corner located at `corner`.
    pub fn centerline(&self, corner: Point, options: &PanelOptions) -> (Point, Point) {
        let start = corner
            + Vec2::new(
                self.horizontal_sign * options.slot_offset_x(),
                self.vertical_sign * options.slot_offset_y(),
            );
        let end = start + Vec2::new(self.horizontal_sign * options.slot_length(), 0.0);
        (start, end)
    }
}

/// Placements used for a panel of this width; narrow panels drop the right pair.
pub fn active_placements(options: &PanelOptions) -> impl Iterator<Item = &'static SlotPlacement> {
    let right = options.has_right_slots();
    SLOT_PLACEMENTS.iter().filter(move |p| right || !p.is_right())
}

/// A slot as sketched, with the pin tying it to its corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MountingSlot {
    pub placement: SlotPlacement,
    pub shape: SlotShape,
    pub corner_pin: PointPin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_panels_keep_left_pair() {
        let narrow = PanelOptions {
            width_in_units: 4,
            ..Default::default()
        };
        let corners: Vec<Corner> = active_placements(&narrow).map(|p| p.corner).collect();
        assert_eq!(corners, vec![Corner::TopLeft, Corner::BottomLeft]);
        assert_eq!(active_placements(&PanelOptions::default()).count(), 4);
    }

    #[test]
    fn test_centerline_points_inward() {
        let options = PanelOptions::default();
        let top_right = Point::new(3.048, 0.0);
        let (start, end) = SLOT_PLACEMENTS[2].centerline(top_right, &options);
        assert!((start - Point::new(3.048 - 0.6, -0.3)).hypot() < 1e-12);
        assert!((end - Point::new(3.048 - 0.74, -0.3)).hypot() < 1e-12);
    }
}
