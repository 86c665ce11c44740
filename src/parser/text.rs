use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Node};

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const BLOCK_TAGS: &[&str] = &[
    "address", "blockquote", "dd", "div", "dl", "dt", "h1", "h2", "h3", "h4", "h5", "h6", "li",
    "ol", "p", "table", "tbody", "td", "th", "thead", "tr", "ul",
];

/// Whitespace-normalized text of an element and all its descendants.
pub fn text_of(el: ElementRef<'_>) -> String {
    collect(el, None)
}

/// Text of `el` with the subtree rooted at `excluded` left out.
///
/// Used for list items that carry a nested list: the item's own text must not
/// repeat what the nested list contributes.
pub fn text_without(el: ElementRef<'_>, excluded: ElementRef<'_>) -> String {
    collect(el, Some(excluded))
}

fn collect(el: ElementRef<'_>, excluded: Option<ElementRef<'_>>) -> String {
    let mut buf = String::new();
    push_text(el, excluded, &mut buf);
    normalize(&buf)
}

fn push_text(el: ElementRef<'_>, excluded: Option<ElementRef<'_>>, buf: &mut String) {
    for child in el.children() {
        if excluded.is_some_and(|ex| ex.id() == child.id()) {
            buf.push(' ');
            continue;
        }
        match child.value() {
            Node::Text(text) => buf.push_str(text),
            Node::Element(element) => {
                let name = element.name();
                let block = BLOCK_TAGS.contains(&name);
                if block || name == "br" {
                    buf.push(' ');
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    push_text(child_el, excluded, buf);
                }
                if block {
                    buf.push(' ');
                }
            }
            _ => {}
        }
    }
}

/// Collapse whitespace runs to a single space and trim.
pub fn normalize(s: &str) -> String {
    WS_RE.replace_all(s, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
        doc.select(&Selector::parse(css).unwrap()).next().unwrap()
    }

    #[test]
    fn collapses_whitespace() {
        let doc = Html::parse_fragment("<p>  Mist\n   Coil <i>heals</i>\tallies </p>");
        assert_eq!(text_of(first(&doc, "p")), "Mist Coil heals allies");
    }

    #[test]
    fn block_and_br_boundaries_are_spaces() {
        let doc = Html::parse_fragment("<div><div>one</div><div>two</div>three<br>four</div>");
        assert_eq!(text_of(first(&doc, "div")), "one two three four");
    }

    #[test]
    fn decodes_entities() {
        let doc = Html::parse_fragment("<span>Tips &amp; Tactics</span>");
        assert_eq!(text_of(first(&doc, "span")), "Tips & Tactics");
    }

    #[test]
    fn excluded_subtree_is_skipped() {
        let doc = Html::parse_fragment(
            "<ul><li>Outer <b>bold</b><ul><li>Inner</li></ul> tail</li></ul>",
        );
        let item = first(&doc, "li");
        let nested = first(&doc, "li ul");
        assert_eq!(text_without(item, nested), "Outer bold tail");
        assert_eq!(text_of(item), "Outer bold Inner tail");
    }
}
