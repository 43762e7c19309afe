//! Error types with diagnostic codes using miette.
//!
//! Every failure here is a local, construction-time validation error: it is
//! detected eagerly at the point of data entry (graph mutation, half-edge
//! construction, decoding) and propagates to the caller, aborting the affected
//! layer. Nothing is retried.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::types::Coordinate2;

// ============================================================================
// Geometry Errors
// ============================================================================

/// Errors from the grid geometry core.
#[derive(Error, Diagnostic, Debug)]
pub enum GeometryError {
    #[error("bounding box bounds are out of order: l={l} b={b} r={r} t={t}")]
    #[diagnostic(
        code(lamina::geometry::invalid_bounding_box),
        help("left must not exceed right and bottom must not exceed top")
    )]
    InvalidBoundingBox { l: i32, b: i32, r: i32, t: i32 },

    #[error("cannot link {a} to {b}")]
    #[diagnostic(
        code(lamina::geometry::invalid_link),
        help("links must connect grid-adjacent coordinates along a single axis")
    )]
    InvalidLink { a: Coordinate2, b: Coordinate2 },

    #[error("half-edge endpoints {src} and {tgt} are not grid-adjacent")]
    #[diagnostic(
        code(lamina::geometry::invalid_adjacency),
        help("the layer graph is corrupted; links are validated on insertion, so this should never happen")
    )]
    InvalidAdjacency { src: Coordinate2, tgt: Coordinate2 },
}

// ============================================================================
// Decode Errors
// ============================================================================

/// Errors that occur while decoding a plate description.
#[derive(Error, Diagnostic, Debug)]
pub enum DecodeError {
    #[error("failed to open description file {path}")]
    #[diagnostic(code(lamina::decode::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode description image")]
    #[diagnostic(code(lamina::decode::image))]
    Image(#[from] image::ImageError),

    #[error("filled pixel at ({x}, {y}) is too close to the image border")]
    #[diagnostic(
        code(lamina::decode::out_of_bounds),
        help("keep a two-pixel margin between features and the edge of every frame")
    )]
    OutOfBounds { x: u32, y: u32 },

    #[error("description has {frames} frames but the config lists {layers} layers")]
    #[diagnostic(
        code(lamina::decode::missing_layers),
        help("every configured layer needs a matching frame in the description")
    )]
    MissingLayers { frames: usize, layers: usize },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Geometry(#[from] GeometryError),
}

// ============================================================================
// Config Errors
// ============================================================================

/// Errors loading the layer-stack configuration.
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    #[diagnostic(code(lamina::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    #[diagnostic(code(lamina::config::parse))]
    Parse(#[from] toml::de::Error),
}
