use serde_json::{json, Map, Value};
use synthpanel::*;

fn record(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

#[test]
fn test_plain_3u_panel() {
    let options = PanelOptions::default();
    let mut kernel = MemoryKernel::new();
    let panel = generate_panel(&mut kernel, &options).expect("panel");

    assert_eq!(kernel.bodies().len(), 1);
    assert_eq!(panel.component_name, "3U Eurorack 6 HP Panel");
    assert_eq!(panel.slot_count, 4);
    assert_eq!(panel.plan.steps.len(), 1);
    assert_eq!(panel.plan.steps[0].regions, vec![RegionKind::PanelOutline]);

    let bounds = panel.geometry.panel_bounds();
    assert!((bounds.width() - 3.048).abs() < 1e-9);
    assert!((bounds.height() - 12.85).abs() < 1e-9);
    assert!((options.rail_length() - 0.925).abs() < 1e-12);

    let body = kernel.body(panel.body).expect("body");
    assert_eq!(body.name, "Panel");
    assert_eq!(body.features, vec!["Extrude Panel"]);
    // 4 outline walls, 2 caps, 4 walls per slot
    assert_eq!(body.faces.len(), 22);
}

#[test]
fn test_narrow_panel_centers_left_slots() {
    let options = PanelOptions {
        width_in_units: 2,
        ..Default::default()
    };
    let mut kernel = MemoryKernel::new();
    let panel = generate_panel(&mut kernel, &options).expect("panel");

    assert_eq!(panel.slot_count, 2);
    assert!((options.slot_offset_x() - 0.438).abs() < 1e-9);
    for slot in &panel.geometry.slots {
        assert!(!slot.placement.is_right());
        let start = slot.shape.centerline.start.position;
        let end = slot.shape.centerline.end.position;
        let middle = (start.x + end.x) / 2.0;
        assert!((middle - panel.geometry.panel_bounds().center().x).abs() < 1e-9);
    }
}

#[test]
fn test_shell_panel_insets_walls() {
    let options = PanelOptions {
        support_type: SupportType::Shell,
        support_shell_wall_thickness: 0.1,
        ..Default::default()
    };
    let mut kernel = MemoryKernel::new();
    let panel = generate_panel(&mut kernel, &options).expect("panel");

    let band = panel.geometry.rail_band_bounds();
    let shell = panel.geometry.shell_bounds().expect("shell");
    assert!((shell.x0 - band.x0 - 0.1).abs() < 1e-9);
    assert!((shell.y0 - band.y0 - 0.1).abs() < 1e-9);
    assert!((band.x1 - shell.x1 - 0.1).abs() < 1e-9);
    assert!((band.y1 - shell.y1 - 0.1).abs() < 1e-9);

    let body = kernel.body(panel.body).expect("body");
    assert_eq!(body.features, vec!["Extrude Panel", "Extrude Support Shell"]);
    assert!(matches!(
        body.faces.last(),
        Some(FaceSurface::Cap { z, facing_up: false }) if (z + 1.1).abs() < 1e-9
    ));
}

#[test]
fn test_solid_support_joins_at_back_face() {
    for (hp, start_face) in [(2, 13), (6, 21)] {
        let options = PanelOptions {
            width_in_units: hp,
            support_type: SupportType::Solid,
            ..Default::default()
        };
        let mut kernel = MemoryKernel::new();
        let panel = generate_panel(&mut kernel, &options).expect("panel");
        let join = &panel.plan.steps[1];
        assert_eq!(join.operation, StepOperation::Join { onto_step: 0 });
        assert_eq!(join.start_face.map(|f| f.face_index), Some(start_face));
        assert_eq!(kernel.bodies().len(), 1);
    }
}

#[test]
fn test_each_format_generates() {
    for format in FormatId::ALL {
        for support in SupportType::ALL {
            let options = PanelOptions {
                format_id: *format,
                support_type: *support,
                ..Default::default()
            };
            let mut kernel = MemoryKernel::with_unit(LengthUnit::Inch);
            generate_panel(&mut kernel, &options)
                .unwrap_or_else(|e| panic!("{format:?} {support:?}: {e}"));
        }
    }
}

#[test]
fn test_invalid_format_key_falls_back() {
    let options = PanelOptions::from_record(&record(json!({
        "formatId": "5u_moog",
        "widthInHp": 8,
    })))
    .expect("repaired");
    assert_eq!(options.format_name(), "3U Eurorack");
    assert_eq!(options.width_in_units, 8);
}

#[test]
fn test_rejects_too_narrow_before_sketching() {
    let options = PanelOptions {
        width_in_units: 1,
        ..Default::default()
    };
    let mut kernel = MemoryKernel::new();
    let err = generate_panel(&mut kernel, &options).unwrap_err();
    assert!(matches!(
        err,
        PanelError::InvalidParameterRange {
            field: "widthInHp",
            ..
        }
    ));
    assert!(kernel.bodies().is_empty());
}

#[test]
fn test_rejects_height_that_rounds_to_zero() {
    let options = PanelOptions {
        panel_height: 0.00004,
        ..Default::default()
    };
    let mut kernel = MemoryKernel::new();
    let err = generate_panel(&mut kernel, &options).unwrap_err();
    assert!(matches!(
        err,
        PanelError::InvalidParameterRange {
            field: "panelHeight",
            ..
        }
    ));
    assert!(kernel.bodies().is_empty());
}
