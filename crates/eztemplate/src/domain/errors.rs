//! Structural merge failures.

use thiserror::Error;

/// Ways a template/target pair can fail to line up structurally.
///
/// Each variant names the marker that could not be located, so callers can
/// pattern-match and error lines can name the offending area.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("template reference tag missing in template")]
    ReferenceMissingInTemplate,
    #[error("template reference tag missing in target")]
    ReferenceMissingInTarget,
    #[error("area \"{area}\" not found in template")]
    AreaMissingInTemplate { area: String },
    #[error("end tag for area \"{area}\" missing in template")]
    EndTagMissingInTemplate { area: String },
    #[error("end tag for area \"{area}\" missing in target")]
    EndTagMissingInTarget { area: String },
}

impl MergeError {
    /// The area name the failure refers to, when it refers to one.
    pub fn area(&self) -> Option<&str> {
        match self {
            MergeError::ReferenceMissingInTemplate | MergeError::ReferenceMissingInTarget => None,
            MergeError::AreaMissingInTemplate { area }
            | MergeError::EndTagMissingInTemplate { area }
            | MergeError::EndTagMissingInTarget { area } => Some(area),
        }
    }
}
