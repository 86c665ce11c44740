pub mod abilities;
pub mod gameplay;
pub mod items;
pub mod tips;

use scraper::Html;

use crate::error::Result;
use crate::profile::{LanguageProfile, SectionKey};

pub type Extractor = fn(&Html, &LanguageProfile) -> Result<String>;

/// Section extractors in the order their fragments are concatenated.
pub const SECTIONS: [(SectionKey, Extractor); 4] = [
    (SectionKey::Gameplay, gameplay::extract),
    (SectionKey::Tips, tips::extract),
    (SectionKey::Abilities, abilities::extract),
    (SectionKey::Items, items::extract),
];
