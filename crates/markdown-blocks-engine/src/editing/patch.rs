/// Result of applying a command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    /// The block sequence changed
    pub changed: bool,
    /// Block that became the active selection, if it changed
    pub selected: Option<String>,
    /// Block that should receive focus on the next render
    pub focus: Option<String>,
    /// Store version after the command
    pub version: u64,
    /// The key event's default handling must be suppressed
    pub prevent_default: bool,
}

impl Patch {
    pub fn none() -> Self {
        Self::default()
    }
}
