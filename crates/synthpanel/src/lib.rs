mod error;
mod extrusion;
mod generate;
mod geometry;
mod kernel;
mod options;
mod profile;
mod units;

pub use error::*;
pub use extrusion::*;
pub use generate::*;
pub use geometry::*;
pub use kernel::*;
pub use options::*;
pub use profile::*;
pub use units::*;

/// Install a console subscriber filtered by `RUST_LOG`, at info by default.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))
}
