use anyhow::{bail, Context, Result};
use synthpanel::*;

fn main() -> Result<()> {
    init_logging()?;

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("generate");
    let rest = args.get(2..).unwrap_or(&[]);

    match command {
        "formats" => list_formats(),
        "anchors" => list_anchors(),
        "generate" => {
            let store = DefaultsStore::at_default_location()?;
            let options = apply_args(store.load_or_default(), rest)?;
            generate(&options)
        }
        "save-defaults" => {
            let store = DefaultsStore::at_default_location()?;
            let options = apply_args(store.load_or_default(), rest)?;
            store.save(&options)?;
            println!("Saved defaults to {}", store.path().display());
            Ok(())
        }
        "erase-defaults" => {
            let store = DefaultsStore::at_default_location()?;
            if store.erase()? {
                println!("Erased {}", store.path().display());
            } else {
                println!("No saved defaults at {}", store.path().display());
            }
            Ok(())
        }
        _ => {
            println!("Usage: synthpanel [formats|anchors|generate|save-defaults|erase-defaults] [FORMAT] [HP] [ANCHOR] [SUPPORT]");
            println!("  formats         - List panel formats");
            println!("  anchors         - List anchor points");
            println!("  generate        - Build a panel in the in-memory kernel (default)");
            println!("  save-defaults   - Store the given options as the new defaults");
            println!("  erase-defaults  - Remove stored defaults");
            Ok(())
        }
    }
}

/// Positional overrides: format key, width in HP, anchor key, support key.
fn apply_args(mut options: PanelOptions, args: &[String]) -> Result<PanelOptions> {
    if args.len() > 4 {
        bail!("expected at most 4 arguments, got {}", args.len());
    }
    if let Some(format) = args.first() {
        options.format_id = FormatId::from_id(format)?;
    }
    if let Some(hp) = args.get(1) {
        options.width_in_units = hp
            .parse()
            .with_context(|| format!("invalid width `{hp}`"))?;
    }
    if let Some(anchor) = args.get(2) {
        options.anchor_point = AnchorPoint::from_id(anchor)?;
    }
    if let Some(support) = args.get(3) {
        options.support_type = SupportType::from_id(support)?;
    }
    options.validate()?;
    Ok(options)
}

fn list_formats() -> Result<()> {
    for format in FormatId::ALL {
        let record = format.record();
        println!(
            "{:<14} {:<22} panel {} cm, rails {} cm",
            format.id(),
            record.name,
            record.panel_length,
            record.rail_length()
        );
    }
    Ok(())
}

fn list_anchors() -> Result<()> {
    for anchor in AnchorPoint::ALL {
        println!("{:<14} {}", anchor.id(), anchor.display_name());
    }
    Ok(())
}

fn generate(options: &PanelOptions) -> Result<()> {
    let mut kernel = MemoryKernel::new();
    let panel = generate_panel(&mut kernel, options)?;

    println!("{}", panel.component_name);
    println!(
        "  {} x {} cm, {} slot(s), support: {}",
        options.width(),
        options.panel_length(),
        panel.slot_count,
        options.support_type_name()
    );
    for (n, step) in panel.plan.steps.iter().enumerate() {
        println!(
            "  step {n}: {} {:?} depth {} cm",
            step.feature_name(),
            step.regions,
            step.depth
        );
    }
    for face in kernel.faces(panel.body)? {
        println!("  face {:>2}: {:?}", face.index, face.surface);
    }
    Ok(())
}
