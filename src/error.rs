use thiserror::Error;
use ulid::Ulid;

/// Failures reported by editor commands
///
/// None of these leave the session partially mutated: a command either
/// completes or changes nothing.
#[derive(Debug, Error)]
pub enum EditorError {
    // Precondition failures: the user can fix the input and retry
    #[error("Please enter {0}")]
    MissingText(&'static str),

    #[error("Please select both source and target nodes")]
    EndpointsNotSelected,

    #[error("Source and target nodes must be different")]
    SameEndpoints,

    #[error("Selected nodes not found")]
    EndpointNotFound(Ulid),

    #[error("No nodes to export. Please create some nodes first.")]
    NothingToExport,

    #[error("Invalid color {0:?}: expected #RRGGBB")]
    InvalidColor(String),

    // Environment failures: shown in the persistent banner
    #[error("{0}")]
    Environment(String),

    // Unexpected failures
    #[error("Failed to export to Excel: {0}")]
    Export(String),

    #[error("No more shape ids available in this session")]
    IdsExhausted,
}

impl EditorError {
    /// True for failures caused by missing or inconsistent user input
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            EditorError::MissingText(_)
                | EditorError::EndpointsNotSelected
                | EditorError::SameEndpoints
                | EditorError::EndpointNotFound(_)
                | EditorError::NothingToExport
                | EditorError::InvalidColor(_)
        )
    }

    pub fn is_environment(&self) -> bool {
        matches!(self, EditorError::Environment(_))
    }
}
