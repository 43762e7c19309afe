//! Per-layer connectivity graph: drilled pins and etched channel links.
//!
//! A layer is built once by the decoder and then treated as read-only input by
//! the tracer and the sink. Links are stored canonically, keyed by the
//! lower-valued endpoint on each axis, so every physical segment has exactly
//! one representation regardless of insertion order.

use std::collections::{BTreeMap, BTreeSet};

use crate::bbox::BoundingBox;
use crate::errors::GeometryError;
use crate::trace::CHANNEL_RADIUS;
use crate::types::{Coordinate2, Vector2};

/// One flat panel in the stack: identity metadata plus the pin/link graph.
///
/// The metadata (name, material, thickness, pitch, panel size) is consumed
/// only by the output stage; the tracer reads nothing but pins and links.
#[derive(Clone, Debug)]
pub struct Layer {
    pub name: String,
    pub material: String,
    /// Panel thickness in millimetres.
    pub thickness: f64,
    /// Physical spacing between adjacent grid coordinates, in millimetres.
    pub pitch: f64,
    /// Panel extent in grid units.
    pub width: u32,
    pub height: u32,
    /// Default cap radius for pins without an explicit one, in grid units.
    pub pin_radius: f64,

    /// Drilled points, with an optional per-pin capture radius.
    pins: BTreeMap<Coordinate2, Option<f64>>,
    /// Coordinates with a link to the coordinate on their right.
    x_links: BTreeSet<Coordinate2>,
    /// Coordinates with a link to the coordinate below (+y).
    y_links: BTreeSet<Coordinate2>,
}

impl Layer {
    pub fn new(
        name: impl Into<String>,
        material: impl Into<String>,
        thickness: f64,
        pitch: f64,
        width: u32,
        height: u32,
    ) -> Layer {
        Layer {
            name: name.into(),
            material: material.into(),
            thickness,
            pitch,
            width,
            height,
            pin_radius: CHANNEL_RADIUS,
            pins: BTreeMap::new(),
            x_links: BTreeSet::new(),
            y_links: BTreeSet::new(),
        }
    }

    /// Register a drilled point. Idempotent on repeated identical insertion.
    pub fn add_pin(&mut self, position: Coordinate2, radius: Option<f64>) {
        self.pins.insert(position, radius);
    }

    /// Add a single-step, horizontal or vertical link between two coordinates.
    ///
    /// The endpoints must be grid-adjacent along exactly one axis; anything
    /// else (diagonal, coincident, further apart) is an [`GeometryError::InvalidLink`].
    pub fn add_link(&mut self, a: Coordinate2, b: Coordinate2) -> Result<(), GeometryError> {
        let delta = b - a;

        match (delta.x, delta.y) {
            (1, 0) => {
                self.x_links.insert(a);
            }
            (-1, 0) => {
                self.x_links.insert(b);
            }
            (0, 1) => {
                self.y_links.insert(a);
            }
            (0, -1) => {
                self.y_links.insert(b);
            }
            _ => return Err(GeometryError::InvalidLink { a, b }),
        }

        Ok(())
    }

    /// The four grid-adjacent coordinates of a point, linked or not.
    pub fn neighbours(&self, position: Coordinate2) -> [Coordinate2; 4] {
        [
            position + Vector2::new(-1, 0),
            position + Vector2::new(0, -1),
            position + Vector2::new(1, 0),
            position + Vector2::new(0, 1),
        ]
    }

    /// The subset of `neighbours` actually linked to the point.
    pub fn connected(&self, position: Coordinate2) -> Vec<Coordinate2> {
        let mut connected = Vec::new();

        let left = position + Vector2::new(-1, 0);
        if self.x_links.contains(&left) {
            connected.push(left);
        }
        let above = position + Vector2::new(0, -1);
        if self.y_links.contains(&above) {
            connected.push(above);
        }
        if self.x_links.contains(&position) {
            connected.push(position + Vector2::new(1, 0));
        }
        if self.y_links.contains(&position) {
            connected.push(position + Vector2::new(0, 1));
        }

        connected
    }

    /// Iterate over the undirected links, one pair per stored canonical edge.
    pub fn links(&self) -> impl Iterator<Item = (Coordinate2, Coordinate2)> + '_ {
        let horizontal = self
            .x_links
            .iter()
            .map(|&origin| (origin, origin + Vector2::new(1, 0)));
        let vertical = self
            .y_links
            .iter()
            .map(|&origin| (origin, origin + Vector2::new(0, 1)));

        horizontal.chain(vertical)
    }

    /// Iterate over the registered pins in (x, y) order.
    pub fn pins(&self) -> impl Iterator<Item = (Coordinate2, Option<f64>)> + '_ {
        self.pins.iter().map(|(&position, &radius)| (position, radius))
    }

    /// The smallest box containing every pin and link endpoint, or `None`
    /// for an empty layer.
    pub fn extent(&self) -> Option<BoundingBox> {
        let pins = self.pins.keys().map(|&p| BoundingBox::at(p));
        let links = self
            .links()
            .map(|(a, b)| BoundingBox::at(a).merge(&BoundingBox::at(b)));

        pins.chain(links).reduce(|acc, b| acc.merge(&b))
    }
}
