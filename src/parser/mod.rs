pub mod extract;
pub mod flatten;
pub mod locate;
pub mod markup;
pub mod text;

use scraper::Html;
use serde::Serialize;
use tracing::warn;

use crate::error::ExtractError;
use crate::profile::{LanguageProfile, SectionKey};

/// A section that was skipped while composing a hero record.
#[derive(Debug, Clone, Serialize)]
pub struct SectionFailure {
    pub section: SectionKey,
    pub reason: String,
}

/// Extracted guide content for one hero, keyed by its normalized alias.
#[derive(Debug, Clone, Serialize)]
pub struct HeroTips {
    pub alias: String,
    pub url: String,
    pub tips: String,
    pub failures: Vec<SectionFailure>,
}

/// Parse a guide page and compose its hero record.
pub fn process_page(alias: &str, url: &str, html: &str, profile: &LanguageProfile) -> HeroTips {
    let document = Html::parse_document(html);
    compose_hero(alias, url, &document, profile)
}

/// Run every section extractor in order and concatenate their fragments.
///
/// A failing section contributes nothing; the failure is logged and kept on
/// the record so the remaining sections still make it into the output.
pub fn compose_hero(
    alias: &str,
    url: &str,
    document: &Html,
    profile: &LanguageProfile,
) -> HeroTips {
    let mut tips = String::new();
    let mut failures = Vec::new();

    for (section, extractor) in extract::SECTIONS {
        match extractor(document, profile) {
            Ok(fragment) => tips.push_str(&fragment),
            Err(e) => {
                warn!(hero = alias, url, %section, lang = %profile.lang, "Skipping section: {}", e);
                failures.push(failure(section, &e));
            }
        }
    }

    HeroTips {
        alias: alias.to_string(),
        url: url.to_string(),
        tips,
        failures,
    }
}

fn failure(section: SectionKey, e: &ExtractError) -> SectionFailure {
    SectionFailure {
        section,
        reason: e.to_string(),
    }
}

// ── Tests ──
