use super::face::FaceId;

slotmap::new_key_type! {
    /// Handle of a shell in the [`super::TopologyStore`].
    pub struct ShellId;
}

/// A set of faces bounding (part of) a solid.
#[derive(Debug, Clone)]
pub struct ShellData {
    pub faces: Vec<FaceId>,
    pub is_closed: bool,
}
