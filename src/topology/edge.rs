use std::f64::consts::PI;

use crate::error::Result;
use crate::geometry::curve::{Arc, Curve, Line};
use crate::math::{Point3, RigidTransform, Vector3};

use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Handle of an edge in the [`super::TopologyStore`].
    pub struct EdgeId;
}

/// Angular step used when an arc edge is turned into a polyline.
const ARC_STEP: f64 = PI / 16.0;

/// Carrier curve of an edge.
#[derive(Debug, Clone)]
pub enum EdgeCurve {
    Line(Line),
    Arc(Arc),
}

impl EdgeCurve {
    /// Point at curve parameter `t`.
    ///
    /// # Errors
    ///
    /// Propagates curve evaluation errors.
    pub fn evaluate(&self, t: f64) -> Result<Point3> {
        match self {
            Self::Line(line) => line.evaluate(t),
            Self::Arc(arc) => arc.evaluate(t),
        }
    }

    /// Unit tangent at curve parameter `t`.
    ///
    /// # Errors
    ///
    /// Propagates curve evaluation errors.
    pub fn tangent(&self, t: f64) -> Result<Vector3> {
        match self {
            Self::Line(line) => line.tangent(t),
            Self::Arc(arc) => arc.tangent(t),
        }
    }

    #[must_use]
    pub fn transformed(&self, transform: &RigidTransform) -> Self {
        match self {
            Self::Line(line) => Self::Line(line.transformed(transform)),
            Self::Arc(arc) => Self::Arc(arc.transformed(transform)),
        }
    }
}

/// A bounded piece of a curve between two vertices.
///
/// `t_start` maps to `start` and `t_end` to `end`; for arcs `t_end` may be
/// smaller than `t_start` when the edge runs clockwise.
#[derive(Debug, Clone)]
pub struct EdgeData {
    pub start: VertexId,
    pub end: VertexId,
    pub curve: EdgeCurve,
    pub t_start: f64,
    pub t_end: f64,
}

impl EdgeData {
    /// Curve parameter at fraction `s` of the edge (`0` = start, `1` = end).
    #[must_use]
    pub fn parameter_at(&self, s: f64) -> f64 {
        self.t_start + (self.t_end - self.t_start) * s
    }

    /// Point at fraction `s` of the edge.
    ///
    /// # Errors
    ///
    /// Propagates curve evaluation errors.
    pub fn point_at(&self, s: f64) -> Result<Point3> {
        self.curve.evaluate(self.parameter_at(s))
    }

    /// Tangent at fraction `s`, oriented from start to end.
    ///
    /// # Errors
    ///
    /// Propagates curve evaluation errors.
    pub fn tangent_at(&self, s: f64) -> Result<Vector3> {
        let t = self.curve.tangent(self.parameter_at(s))?;
        Ok(if self.t_end < self.t_start { -t } else { t })
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        match &self.curve {
            EdgeCurve::Line(line) => line.length_between(self.t_start, self.t_end),
            EdgeCurve::Arc(arc) => arc.length_between(self.t_start, self.t_end),
        }
    }

    /// Number of straight segments used to approximate the edge.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        match &self.curve {
            EdgeCurve::Line(_) => 1,
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            EdgeCurve::Arc(_) => {
                ((self.t_end - self.t_start).abs() / ARC_STEP - 1e-9).ceil().max(1.0) as usize
            }
        }
    }

    #[must_use]
    pub fn is_curved(&self) -> bool {
        matches!(self.curve, EdgeCurve::Arc(_))
    }
}
