mod bounding_box;
mod face_area;
mod face_centroid;
mod face_distance;
mod face_edges;
mod sample_face;
mod uv_bounds;

pub use bounding_box::{Aabb, BoundingBox};
pub use face_area::FaceArea;
pub use face_centroid::FaceCentroid;
pub use face_distance::FaceDistance;
pub use face_edges::{EdgeInfo, FaceEdges};
pub use sample_face::SampleFace;
pub use uv_bounds::{covering_arc, unwrap_angle, UvBounds};
