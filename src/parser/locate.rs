//! Section anchors and sibling navigation over a parsed page.
//!
//! Wiki headlines look like `<h2><span class="mw-headline" id="Items">Items</span></h2>`:
//! the anchor is the span, its parent is the heading element, and the
//! heading's next sibling is the first content block of the section. Every
//! extractor relies on that two-hop step.

use scraper::{ElementRef, Html};

use crate::error::{ExtractError, Result};
use crate::profile::{LanguageProfile, SectionKey};

const HEADING_WRAPPER: &str = "mw-heading";

/// First element (document order) whose `id` equals `id`.
pub fn find_anchor<'a>(document: &'a Html, id: &str) -> Option<ElementRef<'a>> {
    find_in(document.root_element(), id)
}

/// Like [`find_anchor`] but limited to `scope` and its descendants.
pub fn find_in<'a>(scope: ElementRef<'a>, id: &str) -> Option<ElementRef<'a>> {
    scope
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().id() == Some(id))
}

/// Anchor for `key` under the active profile, or `AnchorNotFound`.
pub fn section_anchor<'a>(
    document: &'a Html,
    profile: &LanguageProfile,
    key: SectionKey,
) -> Result<ElementRef<'a>> {
    let id = profile.anchor(key);
    find_anchor(document, id).ok_or_else(|| ExtractError::AnchorNotFound {
        section: key,
        id: id.to_string(),
    })
}

pub fn parent(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.parent().and_then(ElementRef::wrap)
}

/// Next element sibling; text and comment nodes in between are ignored.
pub fn next_sibling(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.next_siblings().find_map(ElementRef::wrap)
}

/// First element descendant (or `el` itself) carrying `class`.
pub fn first_with_class<'a>(el: ElementRef<'a>, class: &str) -> Option<ElementRef<'a>> {
    el.descendants()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().classes().any(|c| c == class))
}

/// All element descendants (including `el`) with tag `name`, document order.
pub fn elements_by_tag<'a>(el: ElementRef<'a>, name: &str) -> Vec<ElementRef<'a>> {
    el.descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == name)
        .collect()
}

/// Lists inside `el` that are not themselves nested in another list inside `el`.
pub fn outer_lists(el: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    el.descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| is_list(*e))
        .filter(|e| {
            !e.ancestors()
                .take_while(|a| a.id() != el.id())
                .filter_map(ElementRef::wrap)
                .any(is_list)
        })
        .collect()
}

pub fn has_tag(el: ElementRef<'_>, name: &str) -> bool {
    el.value().name() == name
}

pub fn is_list(el: ElementRef<'_>) -> bool {
    matches!(el.value().name(), "ul" | "ol")
}

pub fn heading_level(el: ElementRef<'_>) -> Option<u8> {
    match el.value().name() {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Heading element that wraps `anchor`.
pub fn heading_of<'a>(anchor: ElementRef<'a>, section: SectionKey) -> Result<ElementRef<'a>> {
    parent(anchor).ok_or_else(|| ExtractError::structure(section, "anchor has no parent heading"))
}

/// Next element sibling, or `StructureMismatch` naming what was expected.
pub fn require_next<'a>(
    el: ElementRef<'a>,
    section: SectionKey,
    what: &str,
) -> Result<ElementRef<'a>> {
    next_sibling(el).ok_or_else(|| ExtractError::structure(section, format!("missing {what}")))
}

/// Walk forward through `el`'s siblings until a list element turns up.
pub fn next_list_sibling(el: ElementRef<'_>, section: SectionKey) -> Result<ElementRef<'_>> {
    el.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|e| is_list(*e))
        .ok_or_else(|| ExtractError::structure(section, "no list follows"))
}

/// Level of a heading block: an `h1`..`h6` element, or a
/// `<div class="mw-heading">` wrapper around one.
pub fn block_level(el: ElementRef<'_>) -> Option<u8> {
    heading_level(el).or_else(|| {
        if !el.value().classes().any(|c| c == HEADING_WRAPPER) {
            return None;
        }
        el.descendants()
            .filter_map(ElementRef::wrap)
            .find_map(heading_level)
    })
}

/// Element siblings after `heading`, up to the next heading of the same or a
/// higher level (or the end of the parent).
pub fn section_body(heading: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    let level = block_level(heading);
    heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take_while(move |el| match (level, block_level(*el)) {
            (Some(own), Some(other)) => other > own,
            _ => true,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const S: SectionKey = SectionKey::Tips;

    fn tag(el: Option<ElementRef<'_>>) -> Option<&str> {
        el.map(|e| e.value().name())
    }

    #[test]
    fn anchor_found_by_exact_id() {
        let doc = Html::parse_document(
            r#"<h2><span id="Tips_.26_Tactics">Tips</span></h2><p id="Tips">x</p>"#,
        );
        let anchor = find_anchor(&doc, "Tips_.26_Tactics").unwrap();
        assert_eq!(anchor.value().name(), "span");
        assert_eq!(tag(parent(anchor)), Some("h2"));
        assert!(find_anchor(&doc, "tips").is_none());
    }

    #[test]
    fn section_anchor_reports_missing_id() {
        let doc = Html::parse_document("<p>nothing</p>");
        let err = section_anchor(&doc, &LanguageProfile::english(), SectionKey::Items).unwrap_err();
        assert_eq!(
            err,
            ExtractError::AnchorNotFound {
                section: SectionKey::Items,
                id: "Items".into()
            }
        );
    }

    #[test]
    fn next_sibling_skips_text_nodes() {
        let doc = Html::parse_document("<div><h2 id=a>A</h2>\n  text  \n<!-- c --><p>B</p></div>");
        let h2 = find_anchor(&doc, "a").unwrap();
        assert_eq!(tag(next_sibling(h2)), Some("p"));
    }

    #[test]
    fn next_list_sibling_adjacent() {
        let doc = Html::parse_document("<div><h2 id=a>A</h2><ul id=l><li>x</li></ul></div>");
        let h2 = find_anchor(&doc, "a").unwrap();
        let list = next_list_sibling(h2, S).unwrap();
        assert_eq!(list.value().id(), Some("l"));
    }

    #[test]
    fn next_list_sibling_skips_non_lists() {
        let doc = Html::parse_document(
            "<div><h2 id=a>A</h2><p>p</p><div>d</div><table><tr><td>t</td></tr></table>\
             <ul id=l><li>x</li></ul><ul><li>y</li></ul></div>",
        );
        let h2 = find_anchor(&doc, "a").unwrap();
        assert_eq!(next_list_sibling(h2, S).unwrap().value().id(), Some("l"));
    }

    #[test]
    fn next_list_sibling_fails_when_exhausted() {
        let doc =
            Html::parse_document("<div><h2 id=a>A</h2><p>p</p></div><ul><li>outside</li></ul>");
        let h2 = find_anchor(&doc, "a").unwrap();
        assert!(matches!(
            next_list_sibling(h2, S),
            Err(ExtractError::StructureMismatch { section: SectionKey::Tips, .. })
        ));
    }

    #[test]
    fn section_body_stops_at_same_level_heading() {
        let doc = Html::parse_document(
            "<div><h2 id=a>A</h2><p>1</p><h3>sub</h3><ul><li>2</li></ul><h2>B</h2><p>3</p></div>",
        );
        let h2 = find_anchor(&doc, "a").unwrap();
        let names: Vec<_> = section_body(h2).map(|e| e.value().name()).collect();
        assert_eq!(names, ["p", "h3", "ul"]);
    }

    #[test]
    fn section_body_stops_at_wrapped_heading() {
        let doc = Html::parse_document(
            r#"<div><div class="mw-heading mw-heading2"><h2 id=a>A</h2></div><p>1</p>
<div class="mw-heading mw-heading3"><h3>sub</h3></div><ul><li>2</li></ul>
<div class="thumb"><h2>caption</h2></div>
<div class="mw-heading mw-heading2"><h2>B</h2></div><p>3</p></div>"#,
        );
        let wrapper = parent(find_anchor(&doc, "a").unwrap()).unwrap();
        assert_eq!(block_level(wrapper), Some(2));
        let names: Vec<_> = section_body(wrapper).map(|e| e.value().name()).collect();
        assert_eq!(names, ["p", "div", "ul", "div"]);
    }

    #[test]
    fn outer_lists_ignore_nested() {
        let doc = Html::parse_document(
            "<div id=b><div><ul><li>a<ul><li>n</li></ul></li></ul></div><ol><li>c</li></ol></div>",
        );
        let block = find_anchor(&doc, "b").unwrap();
        let lists: Vec<_> = outer_lists(block).iter().map(|e| e.value().name()).collect();
        assert_eq!(lists, ["ul", "ol"]);
    }

    #[test]
    fn class_lookup_includes_descendants() {
        let doc = Html::parse_document(
            r#"<table id=t><tr><td><div class="x header">Carry</div></td></tr></table>"#,
        );
        let table = find_anchor(&doc, "t").unwrap();
        let header = first_with_class(table, "header").unwrap();
        assert_eq!(header.value().name(), "div");
        assert!(first_with_class(table, "head").is_none());
    }
}
