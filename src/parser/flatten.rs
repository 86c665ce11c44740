use scraper::ElementRef;

use super::locate::is_list;
use super::markup::{Markup, BR};
use super::text::{text_of, text_without};

/// Flatten a (possibly nested) list into `<br/>`-delimited lines.
///
/// Every item becomes `<br/>text<br/>`. An item holding a nested list keeps
/// only its own text on its line and is followed by the nested lines.
/// `leading_break` controls whether the very first `<br/>` is kept; call sites
/// that glue the list straight onto a paragraph or heading drop it.
pub fn flatten_list(list: ElementRef<'_>, leading_break: bool) -> String {
    let mut out = Markup::new();
    for item in list.children().filter_map(ElementRef::wrap) {
        out.br();
        match nested_list(item) {
            Some(inner) => {
                out.push(&text_without(item, inner));
                out.push(&flatten_list(inner, true));
            }
            None => {
                out.push(&text_of(item));
            }
        }
        out.br();
    }

    let flat = out.into_string();
    if leading_break {
        flat
    } else {
        flat.strip_prefix(BR).map(str::to_string).unwrap_or(flat)
    }
}

fn nested_list(item: ElementRef<'_>) -> Option<ElementRef<'_>> {
    item.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|e| is_list(*e))
}
