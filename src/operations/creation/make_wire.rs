use std::f64::consts::TAU;

use crate::error::{OperationError, Result};
use crate::geometry::curve::{Arc, Line};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::topology::{
    EdgeCurve, EdgeData, OrientedEdge, TopologyStore, VertexData, VertexId, WireData, WireId,
};

/// Endpoint below which two wire points are considered the same vertex.
const CLOSE_GAP: f64 = 1e-9;

/// One step of a wire path, ending at the contained point.
#[derive(Debug, Clone, Copy)]
pub enum WireSegment {
    /// Straight segment to the point.
    Line(Point3),
    /// Circular arc around `center`, turning counter-clockwise about
    /// `normal`, to `end`.
    Arc {
        center: Point3,
        normal: Vector3,
        end: Point3,
    },
}

impl WireSegment {
    fn end(&self) -> Point3 {
        match *self {
            Self::Line(end) | Self::Arc { end, .. } => end,
        }
    }
}

/// Creates a wire from a start point and a chain of segments.
pub struct MakeWire {
    start: Option<Point3>,
    segments: Vec<WireSegment>,
    close: bool,
}

impl MakeWire {
    /// Polyline wire through `points`. With `close`, a final segment back
    /// to the first point is added.
    #[must_use]
    pub fn new(points: Vec<Point3>, close: bool) -> Self {
        let mut iter = points.into_iter();
        let start = iter.next();
        Self {
            start,
            segments: iter.map(WireSegment::Line).collect(),
            close,
        }
    }

    /// Wire starting at `start` and following `segments`. With `close`, the
    /// last segment may end on `start` or a closing line is appended.
    #[must_use]
    pub fn from_segments(start: Point3, segments: Vec<WireSegment>, close: bool) -> Self {
        Self {
            start: Some(start),
            segments,
            close,
        }
    }

    /// Executes the operation, adding vertices, edges and the wire.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] for a wire without segments,
    /// a zero-length line, or an arc whose end is not at the start radius.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<WireId> {
        let Some(start) = self.start else {
            return Err(OperationError::InvalidInput("wire needs a start point".into()).into());
        };
        if self.segments.is_empty() {
            return Err(OperationError::InvalidInput("wire needs at least one segment".into()).into());
        }

        let mut segments = self.segments.clone();
        let ends_on_start = segments
            .last()
            .is_some_and(|s| (s.end() - start).norm() < CLOSE_GAP);
        if self.close && !ends_on_start {
            segments.push(WireSegment::Line(start));
        }

        let first = store.add_vertex(VertexData::new(start));
        let mut prev = (first, start);
        let mut edges = Vec::with_capacity(segments.len());
        let last = segments.len() - 1;
        for (i, segment) in segments.iter().enumerate() {
            let end_point = segment.end();
            let end = if self.close && i == last {
                first
            } else {
                store.add_vertex(VertexData::new(end_point))
            };
            let edge = build_edge(prev, (end, end_point), segment)?;
            edges.push(OrientedEdge::new(store.add_edge(edge), true));
            prev = (end, end_point);
        }

        Ok(store.add_wire(WireData {
            edges,
            is_closed: self.close,
        }))
    }
}

fn build_edge(
    (start, from): (VertexId, Point3),
    (end, to): (VertexId, Point3),
    segment: &WireSegment,
) -> Result<EdgeData> {
    match *segment {
        WireSegment::Line(_) => {
            let length = (to - from).norm();
            let line = Line::through(from, to).map_err(|_| {
                OperationError::InvalidInput("wire has a zero-length segment".into())
            })?;
            Ok(EdgeData {
                start,
                end,
                curve: EdgeCurve::Line(line),
                t_start: 0.0,
                t_end: length,
            })
        }
        WireSegment::Arc { center, normal, .. } => {
            let normal = normal
                .try_normalize(TOLERANCE)
                .ok_or_else(|| OperationError::InvalidInput("arc normal is zero".into()))?;
            let r0 = from - center;
            let r1 = to - center;
            if (r0.norm() - r1.norm()).abs() > 1e-6 * r0.norm().max(1.0) {
                return Err(OperationError::InvalidInput(
                    "arc end is not on the start radius".into(),
                )
                .into());
            }
            let mut sweep = r0.cross(&r1).dot(&normal).atan2(r0.dot(&r1)).rem_euclid(TAU);
            if sweep < 1e-12 {
                sweep = TAU;
            }
            let arc = Arc::from_start(center, normal, &from, sweep)?;
            Ok(EdgeData {
                start,
                end,
                curve: EdgeCurve::Arc(arc),
                t_start: 0.0,
                t_end: sweep,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn closed_triangle_reuses_first_vertex() {
        let mut store = TopologyStore::new();
        let wire = MakeWire::new(vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)], true)
            .execute(&mut store)
            .unwrap();
        let data = store.wire(wire).unwrap();
        assert_eq!(data.edges.len(), 3);
        assert!(data.is_closed);
        let last = store.edge(data.edges[2].edge).unwrap();
        let first = store.edge(data.edges[0].edge).unwrap();
        assert_eq!(last.end, first.start);
    }

    #[test]
    fn arc_segment_measures_sweep() {
        let mut store = TopologyStore::new();
        let wire = MakeWire::from_segments(
            p(1.0, 0.0, 0.0),
            vec![
                WireSegment::Arc {
                    center: Point3::origin(),
                    normal: Vector3::z(),
                    end: p(0.0, 1.0, 0.0),
                },
                WireSegment::Line(Point3::origin()),
            ],
            true,
        )
        .execute(&mut store)
        .unwrap();
        let data = store.wire(wire).unwrap();
        assert_eq!(data.edges.len(), 3);
        let arc = store.edge(data.edges[0].edge).unwrap();
        assert!((arc.length() - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn clockwise_arc_uses_flipped_normal() {
        let mut store = TopologyStore::new();
        let wire = MakeWire::from_segments(
            p(1.0, 0.0, 0.0),
            vec![WireSegment::Arc {
                center: Point3::origin(),
                normal: -Vector3::z(),
                end: p(0.0, 1.0, 0.0),
            }],
            false,
        )
        .execute(&mut store)
        .unwrap();
        let edge = store.edge(store.wire(wire).unwrap().edges[0].edge).unwrap();
        assert!((edge.t_end - 1.5 * PI).abs() < 1e-12);
        let mid = edge.point_at(0.5).unwrap();
        assert!(mid.y < 0.0);
    }

    #[test]
    fn off_radius_arc_rejected() {
        let mut store = TopologyStore::new();
        let r = MakeWire::from_segments(
            p(1.0, 0.0, 0.0),
            vec![WireSegment::Arc {
                center: Point3::origin(),
                normal: Vector3::z(),
                end: p(0.0, 2.0, 0.0),
            }],
            false,
        )
        .execute(&mut store);
        assert!(r.is_err());
    }

    #[test]
    fn single_point_rejected() {
        let mut store = TopologyStore::new();
        assert!(MakeWire::new(vec![p(0.0, 0.0, 0.0)], true).execute(&mut store).is_err());
        assert!(MakeWire::new(vec![], false).execute(&mut store).is_err());
    }
}
