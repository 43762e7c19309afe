//! Turn raster descriptions of multi-layer drilled and etched panels into
//! per-layer vector cutting geometry.
//!
//! The pipeline has three stages:
//!
//! 1. [`decode`]: an animated GIF, one frame per layer, becomes a stack of
//!    [`Layer`] graphs of pins and channel links.
//! 2. [`trace`](mod@crate::trace): each layer's link set is traced into closed,
//!    fillet-cornered outline loops plus caps for unconnected pins.
//! 3. [`sink`]: the traced geometry is scaled by the grid pitch and written
//!    as one SVG per layer plus a composite overview.
//!
//! [`process`] runs all three against a [`Config`] describing the stack.

pub mod bbox;
pub mod config;
pub mod decode;
pub mod errors;
pub mod layer;
#[doc(hidden)]
pub mod log;
pub mod sink;
pub mod trace;
pub mod types;

use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, WrapErr};

pub use crate::bbox::BoundingBox;
pub use crate::config::{Config, LayerConfig};
pub use crate::errors::{ConfigError, DecodeError, GeometryError};
pub use crate::layer::Layer;
pub use crate::sink::{CutShape, SvgSink, ToPath, render_composite, render_layer};
pub use crate::trace::{
    CHANNEL_RADIUS, GeometrySink, HalfEdge, LoopPath, PinCap, TracedLayer, trace, trace_layer,
};
pub use crate::types::{Angle, Coordinate2, Direction, Vector2};

/// Decode a description GIF, trace every layer, and write the SVG outputs
/// into `out_dir`. Returns the paths written, composite last.
pub fn process(
    description: impl AsRef<Path>,
    config: &Config,
    out_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, miette::Report> {
    let out_dir = out_dir.as_ref();

    let layers = decode::load_gif(description, config)?;
    if layers.is_empty() {
        miette::bail!("the config lists no layers");
    }

    std::fs::create_dir_all(out_dir)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to create output directory {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(layers.len() + 1);
    let mut filenames = Vec::with_capacity(layers.len());

    for (index, layer) in layers.iter().enumerate() {
        let document = sink::render_layer(layer)?;
        let filename = format!(
            "layer{index}_{}_{}_{}mm.svg",
            layer.name, layer.material, layer.thickness,
        );
        let path = out_dir.join(&filename);
        svg::save(&path, &document)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;

        filenames.push(filename);
        written.push(path);
    }

    let composite = sink::render_composite(
        &filenames,
        layers[0].width,
        layers[0].height,
        config.grid,
    );
    let composite_path = out_dir.join("composite.svg");
    svg::save(&composite_path, &composite)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to write {}", composite_path.display()))?;
    written.push(composite_path);

    Ok(written)
}
