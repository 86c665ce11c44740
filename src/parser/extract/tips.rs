use scraper::Html;

use crate::error::{ExtractError, Result};
use crate::parser::flatten::flatten_list;
use crate::parser::locate::{
    find_anchor, find_in, heading_of, is_list, next_list_sibling, next_sibling, require_next,
};
use crate::parser::markup::Markup;
use crate::parser::text::text_of;
use crate::profile::{LanguageProfile, SectionKey};

const SECTION: SectionKey = SectionKey::Tips;

/// "Tips & Tactics" (or plain "Tips") with its optional "General" subsection.
///
/// Some pages open the section with an unlabeled list before "General";
/// others start straight with the "General" heading. Pages without a
/// "General" subsection end after the unlabeled list.
pub fn extract(document: &Html, profile: &LanguageProfile) -> Result<String> {
    let anchor = find_anchor(document, &profile.tips_tactics)
        .or_else(|| find_anchor(document, &profile.tips))
        .ok_or_else(|| ExtractError::AnchorNotFound {
            section: SectionKey::TipsTactics,
            id: anchor_ids(profile),
        })?;
    let heading = heading_of(anchor, SECTION)?;

    let mut out = Markup::new();
    out.h2(&text_of(anchor));

    let first_block = require_next(heading, SECTION, "tips content")?;
    let mut general = find_in(first_block, &profile.general);
    if general.is_none() {
        let unlabeled = next_list_sibling(heading, SECTION)?;
        out.push(&flatten_list(unlabeled, true)).br();
        general = next_sibling(unlabeled).and_then(|block| find_in(block, &profile.general));
    }

    if let Some(label) = general {
        out.h3(&text_of(label));
        let label_heading = heading_of(label, SectionKey::General)?;
        let body = require_next(label_heading, SectionKey::General, "general tips")?;
        if is_list(body) {
            out.push(&flatten_list(body, false));
        } else {
            out.push(&text_of(body));
        }
    }

    Ok(out.into_string())
}

fn anchor_ids(profile: &LanguageProfile) -> String {
    if profile.tips_tactics == profile.tips {
        profile.tips.clone()
    } else {
        format!("{} | {}", profile.tips_tactics, profile.tips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(body: &str) -> Result<String> {
        let doc = Html::parse_document(&format!("<div>{body}</div>"));
        extract(&doc, &LanguageProfile::english())
    }

    #[test]
    fn general_found_one_list_further_along() {
        let out = run(
            r#"<h2><span class="mw-headline" id="Tips_.26_Tactics">Tips &amp; Tactics</span></h2>
<ul><li>Dispel with shield.</li><li>Coil yourself.</li></ul>
<h3><span class="mw-headline" id="General">General</span></h3>
<ul><li>Buy an Urn.</li></ul>"#,
        )
        .unwrap();
        assert_eq!(
            out,
            "<h2>Tips & Tactics</h2><br/>Dispel with shield.<br/><br/>Coil yourself.<br/><br/>\
             <h3>General</h3>Buy an Urn.<br/>"
        );
    }

    #[test]
    fn unlabeled_list_after_intro_blocks() {
        let out = run(
            r#"<h2><span id="Tips_.26_Tactics">Tips</span></h2>
<div class="thumb">image</div>
<p>Intro.</p>
<ul><li>Tip.</li></ul>
<h3><span id="General">General</span></h3>
<p>Play safe.</p>"#,
        )
        .unwrap();
        assert_eq!(out, "<h2>Tips</h2><br/>Tip.<br/><br/><h3>General</h3>Play safe.");
    }

    #[test]
    fn general_directly_after_heading_with_plain_tips_anchor() {
        let out = run(
            r#"<h2><span id="Tips">Tips</span></h2>
<h3><span id="General">General</span></h3>
<ul><li>One.</li><li>Two.</li></ul>"#,
        )
        .unwrap();
        assert_eq!(out, "<h2>Tips</h2><h3>General</h3>One.<br/><br/>Two.<br/>");
    }

    #[test]
    fn general_is_optional() {
        let out = run(
            r#"<h2><span id="Tips">Tips</span></h2>
<ul><li>Only tip.</li></ul>
<h2><span id="Items">Items</span></h2>"#,
        )
        .unwrap();
        assert_eq!(out, "<h2>Tips</h2><br/>Only tip.<br/><br/>");

        let last =
            run(r#"<h2><span id="Tips">Tips</span></h2><ul><li>Only tip.</li></ul>"#).unwrap();
        assert_eq!(last, "<h2>Tips</h2><br/>Only tip.<br/><br/>");
    }

    #[test]
    fn no_list_and_no_general_is_a_structure_mismatch() {
        let err = run(r#"<h2><span id="Tips">Tips</span></h2><p>Nothing here.</p>"#).unwrap_err();
        assert!(matches!(err, ExtractError::StructureMismatch { section: SectionKey::Tips, .. }));
    }

    #[test]
    fn missing_anchor_names_both_ids() {
        let err = run("<p>no tips</p>").unwrap_err();
        assert_eq!(
            err,
            ExtractError::AnchorNotFound {
                section: SectionKey::TipsTactics,
                id: "Tips_.26_Tactics | Tips".into()
            }
        );
    }
}
