use crate::error::{OperationError, Result};
use crate::math::{Point3, TOLERANCE};
use crate::topology::{ShellData, SolidId, TopologyStore};

use super::{MakeFace, MakeSolid, MakeWire};

/// Creates an axis-aligned box solid from two corner points.
pub struct MakeBox {
    min_corner: Point3,
    max_corner: Point3,
}

impl MakeBox {
    #[must_use]
    pub fn new(min_corner: Point3, max_corner: Point3) -> Self {
        Self {
            min_corner,
            max_corner,
        }
    }

    /// Executes the operation, creating six planar faces with outward
    /// winding and the closed solid they bound.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] if any extent is not positive.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<SolidId> {
        let (lo, hi) = (self.min_corner, self.max_corner);
        let extent = hi - lo;
        if extent.min() < TOLERANCE {
            return Err(OperationError::InvalidInput("box extents must be positive".into()).into());
        }

        let c = |i: usize| {
            Point3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            )
        };
        // Corner index bits: x=1, y=2, z=4. Loops wind counter-clockwise
        // seen from outside.
        let loops: [[usize; 4]; 6] = [
            [0, 2, 3, 1], // bottom
            [4, 5, 7, 6], // top
            [0, 1, 5, 4], // front
            [2, 6, 7, 3], // back
            [0, 4, 6, 2], // left
            [1, 3, 7, 5], // right
        ];

        let mut faces = Vec::with_capacity(6);
        for corners in loops {
            let wire = MakeWire::new(corners.iter().map(|&i| c(i)).collect(), true).execute(store)?;
            faces.push(MakeFace::new(wire, vec![]).execute(store)?);
        }
        let shell = store.add_shell(ShellData {
            faces,
            is_closed: true,
        });
        MakeSolid::new(shell, vec![]).execute(store)
    }
}
