use serde::Serialize;
use tracing::debug;

use crate::error::{KernelContext, Result};
use crate::kernel::{GeometryKernel, SurfaceKind};
use crate::math::{is_close, is_parallel, Point3, Vector3};

use super::{FaceRecord, SheetConfig};

/// A cylindrical through-hole in the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hole {
    /// Point on the axis, halfway through the sheet.
    pub position: Point3,
    pub diameter: f64,
    pub depth: f64,
    pub axis: Vector3,
}

impl Hole {
    fn same_bore(&self, other: &Self, config: &SheetConfig) -> bool {
        let offset = other.position - self.position;
        let off_axis = (offset - self.axis * offset.dot(&self.axis)).norm();
        is_close(self.diameter, other.diameter, config.hole_radius_tolerance)
            && is_parallel(&self.axis, &other.axis, config.angle_tolerance)
            && off_axis <= config.adjacency_tolerance
    }
}

/// Finds cylindrical faces that run straight through the sheet.
///
/// A cylinder counts as a hole when its axial extent equals the sheet
/// thickness within the configured relative tolerance. Kernels often split
/// a bore into two half cylinders; those are merged.
pub struct RecognizeHoles<'a> {
    thickness: f64,
    config: &'a SheetConfig,
}

impl<'a> RecognizeHoles<'a> {
    #[must_use]
    pub fn new(thickness: f64, config: &'a SheetConfig) -> Self {
        Self { thickness, config }
    }

    /// Executes the search over the classified faces of a solid.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SheetError::Kernel`] if a kernel query fails.
    pub fn execute<K: GeometryKernel>(
        &self,
        kernel: &K,
        records: &[FaceRecord<K::Face>],
    ) -> Result<Vec<Hole>> {
        let mut holes: Vec<Hole> = Vec::new();
        for record in records.iter().filter(|r| r.kind == SurfaceKind::Cylindrical) {
            let cylinder = kernel
                .cylinder_params(record.handle)
                .on_face(record.id, "cylinder_params")?;
            let uv = kernel.uv_bounds(record.handle).on_face(record.id, "uv_bounds")?;
            let depth = uv.v_max - uv.v_min;
            if !is_close(depth, self.thickness, self.config.hole_depth_tolerance) {
                continue;
            }
            let hole = Hole {
                position: cylinder.location + cylinder.axis * (0.5 * (uv.v_min + uv.v_max)),
                diameter: 2.0 * cylinder.radius,
                depth,
                axis: cylinder.axis,
            };
            if holes.iter().any(|h| h.same_bore(&hole, self.config)) {
                continue;
            }
            debug!(face = %record.id, diameter = hole.diameter, "hole");
            holes.push(hole);
        }
        Ok(holes)
    }
}
