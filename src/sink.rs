//! SVG output.
//!
//! Collects traced geometry into cut shapes, scales them from grid units to
//! millimetres, and renders per-layer documents plus a composite overview.
//! Every per-layer document wraps its paths in a `<g id="root">` so the
//! composite can pull whole layers in with `<use href="file.svg#root">`.

use enum_dispatch::enum_dispatch;
use glam::DVec2;
use svg::Document;
use svg::node::element::{Definitions, Group, Path, Pattern, Rectangle, Use};

use crate::errors::GeometryError;
use crate::layer::Layer;
use crate::trace::{GeometrySink, LoopPath, PinCap, Primitive, trace_layer};

// ============================================================================
// Path data
// ============================================================================

/// Incremental `d` attribute builder.
struct PathData {
    commands: Vec<String>,
}

impl PathData {
    fn new() -> PathData {
        PathData {
            commands: Vec::new(),
        }
    }

    fn move_to(&mut self, p: DVec2) {
        self.commands.push(format!("M {},{}", p.x, p.y));
    }

    fn line_to(&mut self, p: DVec2) {
        self.commands.push(format!("L {},{}", p.x, p.y));
    }

    /// Circular arc to `p`, always the small sweep on the outline's inside.
    fn arc_to(&mut self, radius: f64, p: DVec2) {
        self.commands
            .push(format!("A {},{} 0 0,0 {},{}", radius, radius, p.x, p.y));
    }

    fn close(&mut self) {
        self.commands.push("Z".to_string());
    }

    fn finish(self) -> String {
        self.commands.join(" ")
    }
}

fn loop_data(path: &LoopPath, pitch: f64) -> String {
    let mut d = PathData::new();
    d.move_to(path.start * pitch);
    for segment in &path.segments {
        match *segment {
            Primitive::Line { to } => d.line_to(to * pitch),
            Primitive::Arc { to, radius, .. } => d.arc_to(radius * pitch, to * pitch),
        }
    }
    d.close();
    d.finish()
}

/// A full circle as four quarter arcs, starting below the centre.
fn cap_data(cap: &PinCap, pitch: f64) -> String {
    let center = cap.center.as_dvec2() * pitch;
    let radius = cap.radius * pitch;

    let bottom = center + DVec2::new(0.0, radius);
    let right = center + DVec2::new(radius, 0.0);
    let top = center - DVec2::new(0.0, radius);
    let left = center - DVec2::new(radius, 0.0);

    let mut d = PathData::new();
    d.move_to(bottom);
    d.arc_to(radius, right);
    d.arc_to(radius, top);
    d.arc_to(radius, left);
    d.arc_to(radius, bottom);
    d.close();
    d.finish()
}

// ============================================================================
// Cut shapes
// ============================================================================

/// Render a shape to an SVG path element, scaled by the grid pitch.
#[enum_dispatch]
pub trait ToPath {
    fn to_path(&self, pitch: f64) -> Path;
}

/// Anything the cutter follows: a channel outline or a pin cap.
#[enum_dispatch(ToPath)]
#[derive(Clone, Debug)]
pub enum CutShape {
    Outline(LoopPath),
    Cap(PinCap),
}

impl ToPath for LoopPath {
    fn to_path(&self, pitch: f64) -> Path {
        Path::new()
            .set("d", loop_data(self, pitch))
            .set("fill", "none")
            .set("stroke", "red")
            .set("stroke-width", 0.25)
    }
}

impl ToPath for PinCap {
    fn to_path(&self, pitch: f64) -> Path {
        Path::new()
            .set("d", cap_data(self, pitch))
            .set("fill", "none")
            .set("stroke", "black")
            .set("stroke-width", 0.25)
    }
}

/// Geometry sink that accumulates cut shapes at a fixed pitch.
pub struct SvgSink {
    pitch: f64,
    shapes: Vec<CutShape>,
}

impl SvgSink {
    pub fn new(pitch: f64) -> SvgSink {
        SvgSink {
            pitch,
            shapes: Vec::new(),
        }
    }
}

impl GeometrySink for SvgSink {
    fn channel_loop(&mut self, path: LoopPath) {
        self.shapes.push(CutShape::Outline(path));
    }

    fn pin_cap(&mut self, cap: PinCap) {
        self.shapes.push(CutShape::Cap(cap));
    }
}

// ============================================================================
// Documents
// ============================================================================

/// Trace a layer and render it to a standalone SVG document sized in
/// millimetres.
pub fn render_layer(layer: &Layer) -> Result<Document, GeometryError> {
    let mut sink = SvgSink::new(layer.pitch);
    trace_layer(layer, &mut sink)?;

    let mut root = Group::new().set("id", "root");
    for shape in &sink.shapes {
        root = root.add(shape.to_path(sink.pitch));
    }

    let width = layer.pitch * f64::from(layer.width);
    let height = layer.pitch * f64::from(layer.height);

    Ok(Document::new()
        .set("width", format!("{width}mm"))
        .set("height", format!("{height}mm"))
        .set("viewBox", (0, 0, width, height))
        .add(root))
}

/// Render an overview that overlays every layer file on a grid-dot pattern.
///
/// `filenames` are resolved by the viewer relative to the composite itself,
/// so they should be bare names, not paths.
pub fn render_composite(filenames: &[String], width: u32, height: u32, pitch: f64) -> Document {
    let phys_width = pitch * f64::from(width);
    let phys_height = pitch * f64::from(height);

    let pattern = Pattern::new()
        .set("id", "GridPattern")
        .set("patternUnits", "userSpaceOnUse")
        .set("x", pitch / 2.0)
        .set("y", pitch / 2.0)
        .set("width", pitch)
        .set("height", pitch)
        .add(
            Rectangle::new()
                .set("width", 1)
                .set("height", 1)
                .set("fill", "lightgrey"),
        );

    let mut document = Document::new()
        .set("width", format!("{phys_width}mm"))
        .set("height", format!("{phys_height}mm"))
        .set("viewBox", (0, 0, phys_width, phys_height))
        .add(Definitions::new().add(pattern))
        .add(
            Rectangle::new()
                .set("width", "100%")
                .set("height", "100%")
                .set("fill", "url(#GridPattern)"),
        );

    for filename in filenames {
        document = document.add(Use::new().set("href", format!("{filename}#root")));
    }

    document
}
