mod transform_face;

pub use crate::math::RigidTransform;
pub use transform_face::TransformFace;
