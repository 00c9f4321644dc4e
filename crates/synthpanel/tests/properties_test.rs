use kurbo::{Point, Vec2};
use proptest::prelude::*;
use synthpanel::*;

fn build(options: &PanelOptions) -> (MemoryKernel, PanelBody) {
    let mut kernel = MemoryKernel::new();
    let panel = generate_panel(&mut kernel, options).expect("panel");
    (kernel, panel)
}

fn close(a: Point, b: Point) -> bool {
    a.distance(b) < 1e-9
}

fn options_strategy() -> impl Strategy<Value = PanelOptions> {
    (
        prop::sample::select(FormatId::ALL),
        2u32..=42,
        prop::sample::select(AnchorPoint::ALL),
        prop::sample::select(SupportType::ALL),
        0.1f64..0.5,
    )
        .prop_map(|(format_id, width_in_units, anchor_point, support_type, panel_height)| {
            PanelOptions {
                format_id,
                width_in_units,
                anchor_point,
                support_type,
                panel_height,
                ..Default::default()
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn slot_count_follows_width(options in options_strategy()) {
        let (_, panel) = build(&options);
        let expected = if options.width_in_units >= 6 { 4 } else { 2 };
        prop_assert_eq!(panel.slot_count, expected);
        prop_assert!(options.rail_length() >= 0.0);
    }

    #[test]
    fn anchor_lands_on_origin(options in options_strategy()) {
        let (_, panel) = build(&options);
        prop_assert!(close(panel.geometry.anchor.point.position, Point::ZERO));
    }

    #[test]
    fn support_starts_behind_panel(options in options_strategy()) {
        let (kernel, panel) = build(&options);
        let index = panel.geometry.support_start_face_index();
        prop_assert_eq!(index, 5 + 4 * panel.slot_count);

        let faces = kernel.faces(panel.body).expect("faces");
        match faces[index].surface {
            FaceSurface::Cap { z, facing_up } => {
                prop_assert!((z + options.panel_height).abs() < 1e-9);
                prop_assert!(!facing_up);
            }
            other => prop_assert!(false, "face {} is {:?}", index, other),
        }
    }

    #[test]
    fn reanchoring_translates_rigidly(
        format_id in prop::sample::select(FormatId::ALL),
        width_in_units in 2u32..=20,
        anchor_point in prop::sample::select(AnchorPoint::ALL),
    ) {
        let base = PanelOptions { format_id, width_in_units, ..Default::default() };
        let moved = PanelOptions { anchor_point, ..base };
        let (_, a) = build(&base);
        let (_, b) = build(&moved);

        let shift: Vec2 = b.geometry.corner(Corner::TopLeft) - a.geometry.corner(Corner::TopLeft);
        for corner in [Corner::TopRight, Corner::BottomLeft, Corner::BottomRight] {
            prop_assert!(close(b.geometry.corner(corner), a.geometry.corner(corner) + shift));
        }
        prop_assert_eq!(a.geometry.slots.len(), b.geometry.slots.len());
        for (sa, sb) in a.geometry.slots.iter().zip(&b.geometry.slots) {
            let ca = sa.shape.centerline;
            let cb = sb.shape.centerline;
            prop_assert!(close(cb.start.position, ca.start.position + shift));
            prop_assert!(close(cb.end.position, ca.end.position + shift));
        }
        let ra = a.geometry.rail_band_bounds();
        let rb = b.geometry.rail_band_bounds();
        prop_assert!(close(rb.origin(), ra.origin() + shift));
        prop_assert!((ra.area() - rb.area()).abs() < 1e-9);
    }

    #[test]
    fn shell_walls_move_by_thickness(
        format_id in prop::sample::select(FormatId::ALL),
        width_in_units in 2u32..=30,
        wall in 0.05f64..0.3,
        delta in 0.01f64..0.1,
    ) {
        let thin = PanelOptions {
            format_id,
            width_in_units,
            support_type: SupportType::Shell,
            support_shell_wall_thickness: wall,
            ..Default::default()
        };
        let thick = PanelOptions { support_shell_wall_thickness: wall + delta, ..thin };
        let (_, a) = build(&thin);
        let (_, b) = build(&thick);

        let sa = a.geometry.shell_bounds().expect("shell");
        let sb = b.geometry.shell_bounds().expect("shell");
        prop_assert!((sb.x0 - sa.x0 - delta).abs() < 1e-9);
        prop_assert!((sb.y0 - sa.y0 - delta).abs() < 1e-9);
        prop_assert!((sa.x1 - sb.x1 - delta).abs() < 1e-9);
        prop_assert!((sa.y1 - sb.y1 - delta).abs() < 1e-9);
    }
}
