use scraper::Html;

use crate::error::Result;
use crate::parser::flatten::flatten_list;
use crate::parser::locate::{has_tag, heading_of, is_list, section_anchor, section_body};
use crate::parser::markup::Markup;
use crate::parser::text::text_of;
use crate::profile::{LanguageProfile, SectionKey};

const SECTION: SectionKey = SectionKey::Items;

/// Item categories: each paragraph is a bold label, each list its items.
/// Images, tables and anything else between them are skipped.
pub fn extract(document: &Html, profile: &LanguageProfile) -> Result<String> {
    let anchor = section_anchor(document, profile, SECTION)?;
    let heading = heading_of(anchor, SECTION)?;

    let mut out = Markup::new();
    out.h2(&text_of(anchor));

    for (index, block) in section_body(heading).enumerate() {
        if has_tag(block, "p") {
            if index > 0 {
                out.br();
            }
            out.bold(&text_of(block));
        } else if is_list(block) {
            out.br().push(&flatten_list(block, true)).br();
        }
    }

    Ok(out.into_string())
}
