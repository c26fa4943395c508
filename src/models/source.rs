use serde::{Deserialize, Serialize};

/// One upstream job board
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Company name shown on every job from this board
    pub name: String,

    /// Board identifier used in the API path
    pub board_id: String,
}

impl SourceDescriptor {
    pub fn new(name: impl Into<String>, board_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            board_id: board_id.into(),
        }
    }
}
