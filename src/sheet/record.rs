use crate::error::{KernelContext, Result};
use crate::kernel::{GeometryKernel, SurfaceKind};
use crate::math::Vector3;
use crate::operations::query::Aabb;

use super::FaceNumber;

/// One classified face of the input solid.
#[derive(Debug, Clone, Copy)]
pub struct FaceRecord<F> {
    pub id: FaceNumber,
    pub handle: F,
    pub kind: SurfaceKind,
    pub area: f64,
    /// Plane normal for flat faces, cylinder axis for cylindrical faces and
    /// zero for anything else.
    pub normal: Vector3,
    pub bbox: Aabb,
}

impl<F: Copy> FaceRecord<F> {
    /// Queries the kernel for everything the pairing and hierarchy stages
    /// need to know about `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::SheetError::Kernel`] if a kernel query fails.
    pub fn classify<K>(kernel: &K, handle: F, id: FaceNumber) -> Result<Self>
    where
        K: GeometryKernel<Face = F>,
    {
        let kind = kernel.surface_kind(handle).on_face(id, "surface_kind")?;
        let normal = match kind {
            SurfaceKind::Flat => kernel.plane_params(handle).on_face(id, "plane_params")?.normal,
            SurfaceKind::Cylindrical => {
                kernel
                    .cylinder_params(handle)
                    .on_face(id, "cylinder_params")?
                    .axis
            }
            SurfaceKind::Unknown => Vector3::zeros(),
        };
        Ok(Self {
            id,
            handle,
            kind,
            area: kernel.area(handle).on_face(id, "area")?,
            normal,
            bbox: kernel.bounding_box(handle).on_face(id, "bounding_box")?,
        })
    }
}
