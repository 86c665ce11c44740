use thiserror::Error;

use crate::profile::SectionKey;

/// Why a section could not be extracted from a hero page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("{section} anchor `{id}` not found")]
    AnchorNotFound { section: SectionKey, id: String },

    #[error("{section}: {detail}")]
    StructureMismatch { section: SectionKey, detail: String },
}

impl ExtractError {
    pub fn structure(section: SectionKey, detail: impl Into<String>) -> Self {
        ExtractError::StructureMismatch {
            section,
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
