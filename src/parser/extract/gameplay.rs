use scraper::Html;

use crate::error::{ExtractError, Result};
use crate::parser::flatten::flatten_list;
use crate::parser::locate::{
    elements_by_tag, first_with_class, heading_of, outer_lists, parent, require_next,
    section_anchor,
};
use crate::parser::markup::Markup;
use crate::parser::text::text_of;
use crate::profile::{LanguageProfile, SectionKey};

const SECTION: SectionKey = SectionKey::Gameplay;
const HEADER_CLASS: &str = "header";
/// The info table always carries one "Pros" and one "Cons" column.
const PROS_CONS: usize = 2;

/// Play style, its description and the pros/cons columns.
///
/// Layout inside the info table following the heading: the element with class
/// `header` is the play style; the sibling after its parent is the
/// description; the next sibling holds the bold labels and the one after that
/// holds the two lists, in label order.
pub fn extract(document: &Html, profile: &LanguageProfile) -> Result<String> {
    let anchor = section_anchor(document, profile, SECTION)?;
    let heading = heading_of(anchor, SECTION)?;

    let mut out = Markup::new();
    out.h2(&text_of(anchor));

    let table = require_next(heading, SECTION, "gameplay info table")?;
    let play_style = first_with_class(table, HEADER_CLASS)
        .ok_or_else(|| ExtractError::structure(SECTION, "no play style header in info table"))?;
    out.h3(&text_of(play_style));

    let style_row = parent(play_style)
        .ok_or_else(|| ExtractError::structure(SECTION, "play style header has no parent"))?;
    let description = require_next(style_row, SECTION, "play style description")?;
    out.push(&text_of(description));

    let label_row = require_next(description, SECTION, "pros/cons labels")?;
    let list_row = require_next(label_row, SECTION, "pros/cons lists")?;
    let labels = elements_by_tag(label_row, "b");
    let lists = outer_lists(list_row);
    if labels.len() != PROS_CONS || lists.len() != PROS_CONS {
        return Err(ExtractError::structure(
            SECTION,
            format!(
                "expected {PROS_CONS} pros/cons labels and lists, found {} labels and {} lists",
                labels.len(),
                lists.len()
            ),
        ));
    }

    out.br();
    for (label, list) in labels.into_iter().zip(lists) {
        let cell = parent(label)
            .ok_or_else(|| ExtractError::structure(SECTION, "pros/cons label has no parent"))?;
        out.br()
            .push(&cell.inner_html())
            .br()
            .push(&flatten_list(list, true));
    }

    Ok(out.into_string())
}
