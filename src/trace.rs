//! Half-edge boundary tracer.
//!
//! Converts a layer's unordered link set into closed, correctly wound outline
//! loops plus circular caps for pins no channel reaches. The walk is a wall
//! follower over directed half-edges:
//!
//! 1. Every undirected link contributes both directed half-edges, one per
//!    wall of the channel.
//! 2. Pairs of half-edges that face each other across a left-side corner
//!    (`turn_left` applied twice) are interior walls of channel areas wider
//!    than one grid unit and are removed up front. Plain reversal pairs are
//!    kept: a lone straight segment must still trace to a stadium outline.
//! 3. While half-edges remain, seed a loop from the lowest one and repeatedly
//!    take the first continuation present in the working set, in strict
//!    priority order: left, ahead, right, back. Each step emits a line and,
//!    for right turns and U-turns, an arc, all offset inward by the channel
//!    radius. The loop closes when no continuation remains.
//!
//! Half-edges are ephemeral: they exist only inside one tracer invocation and
//! are never stored on the layer. The tracer is a pure function of the layer's
//! link set, so independent layers can be traced in parallel.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use glam::{DVec2, dvec2};

use crate::errors::GeometryError;
use crate::layer::Layer;
use crate::log::debug;
use crate::types::{Angle, Coordinate2, Direction, Vector2};

/// Half the width of an etched channel, in grid units. Outlines are offset
/// inward by this much; it is also the corner fillet radius and the default
/// pin cap radius.
pub const CHANNEL_RADIUS: f64 = 0.5;

// ============================================================================
// Half-edges
// ============================================================================

/// One directed side of a link.
///
/// Identity is `(src, tgt)` only; the direction is derived from `tgt - src`
/// at construction and carried for convenience.
#[derive(Clone, Copy, Debug)]
pub struct HalfEdge {
    src: Coordinate2,
    tgt: Coordinate2,
    direction: Direction,
}

impl HalfEdge {
    /// Build a half-edge between two grid-adjacent coordinates.
    ///
    /// A non-unit or diagonal offset is an [`GeometryError::InvalidAdjacency`].
    /// The layer graph validates links on insertion, so seeing this error
    /// means an upstream invariant was already broken.
    pub fn new(src: Coordinate2, tgt: Coordinate2) -> Result<HalfEdge, GeometryError> {
        let direction = match tgt - src {
            Vector2 { x: 1, y: 0 } => Direction::Right,
            Vector2 { x: 0, y: -1 } => Direction::Down,
            Vector2 { x: -1, y: 0 } => Direction::Left,
            Vector2 { x: 0, y: 1 } => Direction::Up,
            _ => return Err(GeometryError::InvalidAdjacency { src, tgt }),
        };

        Ok(HalfEdge {
            src,
            tgt,
            direction,
        })
    }

    /// One unit step from `src`; adjacency holds by construction.
    fn step(src: Coordinate2, direction: Direction) -> HalfEdge {
        HalfEdge {
            src,
            tgt: src + Vector2::unit(direction),
            direction,
        }
    }

    pub fn src(&self) -> Coordinate2 {
        self.src
    }

    pub fn tgt(&self) -> Coordinate2 {
        self.tgt
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn turn_left(self) -> HalfEdge {
        HalfEdge::step(self.tgt, self.direction - Angle::R90)
    }

    fn turn_ahead(self) -> HalfEdge {
        HalfEdge::step(self.tgt, self.direction)
    }

    fn turn_right(self) -> HalfEdge {
        HalfEdge::step(self.tgt, self.direction + Angle::R90)
    }

    fn turn_back(self) -> HalfEdge {
        HalfEdge {
            src: self.tgt,
            tgt: self.src,
            direction: self.direction + Angle::R180,
        }
    }
}

impl PartialEq for HalfEdge {
    fn eq(&self, other: &HalfEdge) -> bool {
        self.src == other.src && self.tgt == other.tgt
    }
}

impl Eq for HalfEdge {}

impl Hash for HalfEdge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.src, self.tgt).hash(state);
    }
}

impl PartialOrd for HalfEdge {
    fn partial_cmp(&self, other: &HalfEdge) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HalfEdge {
    fn cmp(&self, other: &HalfEdge) -> Ordering {
        (self.src, self.tgt).cmp(&(other.src, other.tgt))
    }
}

// ============================================================================
// Emitted geometry
// ============================================================================

/// How far an arc sweeps. Corner fillets are quarter circles; dead-end
/// U-turns close with a half circle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArcKind {
    Quarter,
    Half,
}

/// One step of a traced outline, in grid units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    Line { to: DVec2 },
    Arc { to: DVec2, radius: f64, kind: ArcKind },
}

/// A closed outline loop: a start point and the primitives walking back to it.
#[derive(Clone, Debug, PartialEq)]
pub struct LoopPath {
    pub start: DVec2,
    pub segments: Vec<Primitive>,
}

impl LoopPath {
    /// Count the arcs of a given kind, mostly useful in tests.
    pub fn arcs(&self, kind: ArcKind) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, Primitive::Arc { kind: k, .. } if *k == kind))
            .count()
    }
}

/// A full circle capping an unconnected pin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinCap {
    pub center: Coordinate2,
    /// Radius in grid units.
    pub radius: f64,
}

/// Receiver for traced geometry, in grid units.
///
/// The tracer drives this once per layer: every closed loop, then every pin
/// cap in (x, y) order. The sink owns coordinate scaling and serialization.
pub trait GeometrySink {
    fn channel_loop(&mut self, path: LoopPath);
    fn pin_cap(&mut self, cap: PinCap);
}

/// A sink that just collects everything, for tests and for callers that want
/// the traced geometry as plain data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TracedLayer {
    pub loops: Vec<LoopPath>,
    pub caps: Vec<PinCap>,
}

impl GeometrySink for TracedLayer {
    fn channel_loop(&mut self, path: LoopPath) {
        self.loops.push(path);
    }

    fn pin_cap(&mut self, cap: PinCap) {
        self.caps.push(cap);
    }
}

// ============================================================================
// Tracing
// ============================================================================

/// Local frame of a half-edge: origin at its target, rotated so the edge
/// points up. All step geometry is expressed in this frame.
#[derive(Clone, Copy, Debug)]
struct Frame {
    origin: Coordinate2,
    rotation: Angle,
}

impl Frame {
    fn of(edge: HalfEdge) -> Frame {
        Frame {
            origin: edge.tgt(),
            rotation: edge.direction() - Direction::Up,
        }
    }

    fn point(&self, x: f64, y: f64) -> DVec2 {
        let (rx, ry) = match self.rotation {
            Angle::R0 => (x, y),
            Angle::R90 => (y, -x),
            Angle::R180 => (-x, -y),
            Angle::R270 => (-y, x),
        };

        dvec2(
            rx + f64::from(self.origin.x),
            ry + f64::from(self.origin.y),
        )
    }
}

/// Trace a layer into a [`TracedLayer`].
pub fn trace(layer: &Layer) -> Result<TracedLayer, GeometryError> {
    let mut traced = TracedLayer::default();
    trace_layer(layer, &mut traced)?;
    Ok(traced)
}

/// Trace a layer's link set into closed loops and pin caps, emitting each
/// piece of geometry into the sink.
pub fn trace_layer(layer: &Layer, sink: &mut dyn GeometrySink) -> Result<(), GeometryError> {
    let mut hedges: BTreeSet<HalfEdge> = BTreeSet::new();
    for (a, b) in layer.links() {
        hedges.insert(HalfEdge::new(a, b)?);
        hedges.insert(HalfEdge::new(b, a)?);
    }

    // Eliminate facing interior walls. turn_left is a 4-cycle, so applying it
    // twice is an involution: the pairing is symmetric and the outcome does
    // not depend on iteration order.
    let snapshot: Vec<HalfEdge> = hedges.iter().copied().collect();
    for hedge in snapshot {
        if !hedges.contains(&hedge) {
            continue;
        }
        let facing = hedge.turn_left().turn_left();
        if hedges.contains(&facing) {
            hedges.remove(&hedge);
            hedges.remove(&facing);
        }
    }

    debug!(
        "tracing layer {}: {} half-edges after elimination",
        layer.name,
        hedges.len(),
    );

    while let Some(&seed) = hedges.first() {
        sink.channel_loop(walk_loop(seed, &mut hedges));
        // The walk consumes the seed when the cycle closes through it; drop
        // it explicitly in case the graph was too degenerate for that.
        hedges.remove(&seed);
    }

    for (position, radius) in layer.pins() {
        if !layer.connected(position).is_empty() {
            // Already enclosed by a channel outline.
            continue;
        }
        sink.pin_cap(PinCap {
            center: position,
            radius: radius.unwrap_or(layer.pin_radius),
        });
    }

    Ok(())
}

/// Walk one closed loop starting from `seed`, removing every half-edge the
/// walk takes from the working set.
fn walk_loop(seed: HalfEdge, hedges: &mut BTreeSet<HalfEdge>) -> LoopPath {
    const R: f64 = CHANNEL_RADIUS;

    let mut nedge = seed;
    let start = Frame::of(nedge).point(-R, -0.5);
    let mut segments = Vec::new();

    loop {
        let frame = Frame::of(nedge);

        if hedges.contains(&nedge.turn_left()) {
            // Concave corner: the two walls meet in a sharp point.
            nedge = nedge.turn_left();
            segments.push(Primitive::Line {
                to: frame.point(-R, -R),
            });
        } else if hedges.contains(&nedge.turn_ahead()) {
            nedge = nedge.turn_ahead();
            segments.push(Primitive::Line {
                to: frame.point(-R, 0.0),
            });
        } else if hedges.contains(&nedge.turn_right()) {
            // Convex corner: filleted with a quarter circle.
            nedge = nedge.turn_right();
            segments.push(Primitive::Line {
                to: frame.point(-R, 0.0),
            });
            segments.push(Primitive::Arc {
                to: frame.point(0.0, R),
                radius: R,
                kind: ArcKind::Quarter,
            });
        } else if hedges.contains(&nedge.turn_back()) {
            // Dead end: close the channel with a U-turn.
            nedge = nedge.turn_back();
            segments.push(Primitive::Line {
                to: frame.point(-R, 0.0),
            });
            segments.push(Primitive::Arc {
                to: frame.point(R, 0.0),
                radius: R,
                kind: ArcKind::Half,
            });
        } else {
            // Back at the beginning.
            break;
        }

        hedges.remove(&nedge);
    }

    LoopPath { start, segments }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i32, y: i32) -> Coordinate2 {
        Coordinate2::new(x, y)
    }

    // ==================== HalfEdge tests ====================

    #[test]
    fn half_edge_derives_direction() {
        let e = HalfEdge::new(c(2, 2), c(3, 2)).unwrap();
        assert_eq!(e.direction(), Direction::Right);

        let e = HalfEdge::new(c(2, 2), c(2, 3)).unwrap();
        assert_eq!(e.direction(), Direction::Up);

        let e = HalfEdge::new(c(2, 2), c(2, 1)).unwrap();
        assert_eq!(e.direction(), Direction::Down);
    }

    #[test]
    fn half_edge_rejects_non_adjacent_endpoints() {
        assert!(matches!(
            HalfEdge::new(c(0, 0), c(1, 1)),
            Err(GeometryError::InvalidAdjacency { .. }),
        ));
        assert!(matches!(
            HalfEdge::new(c(0, 0), c(0, 0)),
            Err(GeometryError::InvalidAdjacency { .. }),
        ));
        assert!(matches!(
            HalfEdge::new(c(0, 0), c(3, 0)),
            Err(GeometryError::InvalidAdjacency { .. }),
        ));
    }

    #[test]
    fn turn_operators() {
        let e = HalfEdge::new(c(0, 0), c(1, 0)).unwrap();

        assert_eq!(e.turn_left(), HalfEdge::new(c(1, 0), c(1, 1)).unwrap());
        assert_eq!(e.turn_ahead(), HalfEdge::new(c(1, 0), c(2, 0)).unwrap());
        assert_eq!(e.turn_right(), HalfEdge::new(c(1, 0), c(1, -1)).unwrap());
        assert_eq!(e.turn_back(), HalfEdge::new(c(1, 0), c(0, 0)).unwrap());
    }

    #[test]
    fn four_left_turns_return_home() {
        let e = HalfEdge::new(c(4, 7), c(5, 7)).unwrap();
        assert_eq!(e.turn_left().turn_left().turn_left().turn_left(), e);
    }

    #[test]
    fn facing_wall_pairing_is_an_involution() {
        let e = HalfEdge::new(c(4, 7), c(5, 7)).unwrap();
        let facing = e.turn_left().turn_left();
        assert_ne!(facing, e);
        assert_eq!(facing.turn_left().turn_left(), e);
    }

    // ==================== Frame tests ====================

    #[test]
    fn frame_is_identity_for_upward_edges() {
        let e = HalfEdge::new(c(3, 3), c(3, 4)).unwrap();
        let frame = Frame::of(e);
        assert_eq!(frame.point(-0.5, 0.0), dvec2(2.5, 4.0));
        assert_eq!(frame.point(0.0, 0.5), dvec2(3.0, 4.5));
    }

    #[test]
    fn frame_rotates_with_edge_direction() {
        // A rightward edge rotates local coordinates a quarter turn.
        let e = HalfEdge::new(c(0, 0), c(1, 0)).unwrap();
        let frame = Frame::of(e);
        assert_eq!(frame.point(-0.5, 0.0), dvec2(1.0, 0.5));
        assert_eq!(frame.point(0.0, 0.5), dvec2(1.5, 0.0));
    }

    // ==================== Tracer tests ====================

    fn layer_with_links(links: &[(Coordinate2, Coordinate2)]) -> Layer {
        let mut layer = Layer::new("test", "acrylic", 2.0, 3.0, 16, 16);
        for &(a, b) in links {
            layer.add_link(a, b).unwrap();
        }
        layer
    }

    #[test]
    fn single_link_traces_to_stadium_outline() {
        let layer = layer_with_links(&[(c(0, 0), c(1, 0))]);
        let traced = trace(&layer).unwrap();

        assert_eq!(traced.loops.len(), 1);
        assert!(traced.caps.is_empty());

        let outline = &traced.loops[0];
        // Two straight walls, two half-circle ends.
        assert_eq!(outline.arcs(ArcKind::Half), 2);
        assert_eq!(outline.arcs(ArcKind::Quarter), 0);
        assert_eq!(outline.segments.len(), 4);
    }

    #[test]
    fn reversal_pairs_are_not_eliminated() {
        // A single link's two half-edges are each other's reversal; both must
        // survive elimination or the channel would vanish entirely.
        let layer = layer_with_links(&[(c(0, 0), c(1, 0))]);
        let traced = trace(&layer).unwrap();
        assert_eq!(traced.loops.len(), 1);
    }

    #[test]
    fn loop_geometry_of_single_link() {
        let layer = layer_with_links(&[(c(0, 0), c(1, 0))]);
        let traced = trace(&layer).unwrap();
        let outline = &traced.loops[0];

        assert_eq!(outline.start, dvec2(0.5, 0.5));
        assert_eq!(
            outline.segments,
            vec![
                Primitive::Line { to: dvec2(1.0, 0.5) },
                Primitive::Arc {
                    to: dvec2(1.0, -0.5),
                    radius: 0.5,
                    kind: ArcKind::Half,
                },
                Primitive::Line { to: dvec2(0.0, -0.5) },
                Primitive::Arc {
                    to: dvec2(0.0, 0.5),
                    radius: 0.5,
                    kind: ArcKind::Half,
                },
            ],
        );
    }

    #[test]
    fn unconnected_pin_gets_default_radius_cap() {
        let mut layer = layer_with_links(&[]);
        layer.add_pin(c(5, 5), None);

        let traced = trace(&layer).unwrap();
        assert!(traced.loops.is_empty());
        assert_eq!(
            traced.caps,
            vec![PinCap {
                center: c(5, 5),
                radius: CHANNEL_RADIUS,
            }],
        );
    }

    #[test]
    fn pin_radius_overrides_apply() {
        let mut layer = layer_with_links(&[]);
        layer.pin_radius = 0.75;
        layer.add_pin(c(1, 1), None);
        layer.add_pin(c(2, 1), Some(1.5));

        let traced = trace(&layer).unwrap();
        assert_eq!(traced.caps[0].radius, 0.75);
        assert_eq!(traced.caps[1].radius, 1.5);
    }

    #[test]
    fn caps_are_emitted_left_to_right_top_to_bottom() {
        let mut layer = layer_with_links(&[]);
        layer.add_pin(c(5, 5), None);
        layer.add_pin(c(1, 2), None);
        layer.add_pin(c(1, 1), None);

        let traced = trace(&layer).unwrap();
        let centers: Vec<_> = traced.caps.iter().map(|cap| cap.center).collect();
        assert_eq!(centers, vec![c(1, 1), c(1, 2), c(5, 5)]);
    }
}
