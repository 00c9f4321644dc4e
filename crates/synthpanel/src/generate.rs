use tracing::{info, info_span};

use crate::error::PanelError;
use crate::extrusion::{ExtrusionPlan, PANEL_BODY_NAME};
use crate::geometry::{BodyId, SketchId};
use crate::kernel::SketchKernel;
use crate::options::{KeyedEnum, PanelOptions};
use crate::profile::{ProfileBuilder, ProfileGeometry};

/// Result of one generation request.
#[derive(Debug, Clone)]
pub struct PanelBody {
    pub body: BodyId,
    /// Suggested name for the component holding the panel.
    pub component_name: String,
    pub sketch: SketchId,
    pub slot_count: usize,
    pub plan: ExtrusionPlan,
    pub geometry: ProfileGeometry,
}

/// Validate `options` for the kernel's unit, sketch the panel profile and extrude it.
///
/// Geometry already sent to the kernel is left in place when a later step
/// fails.
pub fn generate_panel<K: SketchKernel + ?Sized>(
    kernel: &mut K,
    options: &PanelOptions,
) -> Result<PanelBody, PanelError> {
    options.validate_for_unit(kernel.default_length_unit())?;
    let component_name = options.component_name();
    let _span = info_span!(
        "generate_panel",
        format = options.format_id.id(),
        hp = options.width_in_units,
        support = options.support_type.id()
    )
    .entered();

    let geometry = ProfileBuilder::new(&mut *kernel, options).build()?;
    let plan = ExtrusionPlan::for_panel(options, &geometry);
    let body = plan.execute(kernel, &geometry)?;

    info!(
        component = %component_name,
        body = PANEL_BODY_NAME,
        slots = geometry.slot_count(),
        steps = plan.steps.len(),
        "generated panel"
    );
    Ok(PanelBody {
        body,
        component_name,
        sketch: geometry.sketch,
        slot_count: geometry.slot_count(),
        plan,
        geometry,
    })
}
