use super::shell::ShellId;

slotmap::new_key_type! {
    /// Handle of a solid in the [`super::TopologyStore`].
    pub struct SolidId;
}

/// A bounded volume: one outer shell plus optional void shells.
#[derive(Debug, Clone)]
pub struct SolidData {
    pub outer_shell: ShellId,
    pub inner_shells: Vec<ShellId>,
}
