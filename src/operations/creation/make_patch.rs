use std::f64::consts::TAU;

use crate::error::{OperationError, Result};
use crate::topology::{FaceId, FaceSurface, TopologyStore};

use super::{MakeFace, MakeWire, WireSegment};

/// Creates a face covering a parameter rectangle of a cylinder or cone.
///
/// The boundary runs along `v = v_min` (arc), `u = u_max` (line),
/// `v = v_max` (arc, reversed) and `u = u_min` (line).
pub struct MakePatch {
    surface: FaceSurface,
    u_range: (f64, f64),
    v_range: (f64, f64),
}

impl MakePatch {
    #[must_use]
    pub fn new(surface: FaceSurface, u_range: (f64, f64), v_range: (f64, f64)) -> Self {
        Self {
            surface,
            u_range,
            v_range,
        }
    }

    /// Executes the operation, creating the bounded face.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::UnsupportedSurface`] for planes and
    /// [`OperationError::InvalidInput`] for an empty range, a full
    /// revolution, or a cone patch touching the apex.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<FaceId> {
        let (u0, u1) = self.u_range;
        let (v0, v1) = self.v_range;
        if !(u1 > u0 && u1 - u0 < TAU - 1e-9) {
            return Err(OperationError::InvalidInput(
                "patch angular span must be in (0, 2pi)".into(),
            )
            .into());
        }
        if v1 <= v0 {
            return Err(OperationError::InvalidInput("patch v range is empty".into()).into());
        }

        // Axis and the centers of the two boundary circles at v_min and v_max.
        let (axis, c0, c1) = match &self.surface {
            FaceSurface::Plane(_) => return Err(OperationError::UnsupportedSurface("patch").into()),
            FaceSurface::Cylinder(cyl) => {
                let (c, a) = (*cyl.center(), *cyl.axis());
                (a, c + a * v0, c + a * v1)
            }
            FaceSurface::Cone(cone) => {
                if v0 <= 0.0 {
                    return Err(
                        OperationError::InvalidInput("cone patch must avoid the apex".into()).into(),
                    );
                }
                let (apex, a, cos) = (*cone.apex(), *cone.axis(), cone.half_angle().cos());
                (a, apex + a * (v0 * cos), apex + a * (v1 * cos))
            }
        };

        let s = &self.surface;
        let (p00, p10) = (s.evaluate(u0, v0)?, s.evaluate(u1, v0)?);
        let (p11, p01) = (s.evaluate(u1, v1)?, s.evaluate(u0, v1)?);
        let wire = MakeWire::from_segments(
            p00,
            vec![
                WireSegment::Arc {
                    center: c0,
                    normal: axis,
                    end: p10,
                },
                WireSegment::Line(p11),
                WireSegment::Arc {
                    center: c1,
                    normal: -axis,
                    end: p01,
                },
                WireSegment::Line(p00),
            ],
            true,
        )
        .execute(store)?;

        MakeFace::new(wire, vec![])
            .with_surface(self.surface.clone())
            .execute(store)
    }
}
