use scraper::{ElementRef, Html};

use crate::error::{ExtractError, Result};
use crate::parser::flatten::flatten_list;
use crate::parser::locate::{has_tag, heading_of, is_list, require_next, section_anchor};
use crate::parser::markup::Markup;
use crate::parser::text::text_of;
use crate::profile::{LanguageProfile, SectionKey};

const SECTION: SectionKey = SectionKey::Abilities;
const ABILITY_COUNT: usize = 4;
const ABILITY_TAG: &str = "h4";

/// The four hero abilities, each as an `<h4>` name followed by its notes.
///
/// Ability blocks are `h4, ul` or `h4, p, ul`. The next ability is found two
/// siblings after the previous one; when that lands on the list of a block
/// with a paragraph, one more step reaches the heading. This assumes exactly
/// four abilities and at most one extra block per ability; pages that break
/// the assumption fail with `StructureMismatch`.
pub fn extract(document: &Html, profile: &LanguageProfile) -> Result<String> {
    let anchor = section_anchor(document, profile, SECTION)?;
    let heading = heading_of(anchor, SECTION)?;

    let mut out = Markup::new();
    out.h2(&text_of(anchor));

    let first = require_next(heading, SECTION, "first ability")?;
    let mut abilities = vec![expect_ability(first, 1)?];
    while abilities.len() < ABILITY_COUNT {
        let previous = abilities[abilities.len() - 1];
        let number = abilities.len() + 1;
        let skipped = require_next(previous, SECTION, "ability notes")?;
        let candidate = require_next(skipped, SECTION, "next ability")?;
        let ability = if has_tag(candidate, ABILITY_TAG) {
            candidate
        } else {
            require_next(candidate, SECTION, "next ability")?
        };
        abilities.push(expect_ability(ability, number)?);
    }

    for ability in abilities {
        render_ability(ability, &mut out)?;
    }
    Ok(out.into_string())
}

fn expect_ability(el: ElementRef<'_>, number: usize) -> Result<ElementRef<'_>> {
    if has_tag(el, ABILITY_TAG) {
        Ok(el)
    } else {
        Err(ExtractError::structure(
            SECTION,
            format!(
                "ability {number} resolved to <{}>, expected <{ABILITY_TAG}>",
                el.value().name()
            ),
        ))
    }
}

fn render_ability(ability: ElementRef<'_>, out: &mut Markup) -> Result<()> {
    let name = ability
        .children()
        .find_map(ElementRef::wrap)
        .ok_or_else(|| ExtractError::structure(SECTION, "ability heading is empty"))?;
    out.h4(&text_of(name));

    let next = require_next(ability, SECTION, "ability description")?;
    let list = if has_tag(next, "p") {
        out.push(&text_of(next));
        require_next(next, SECTION, "ability notes")?
    } else {
        next
    };
    if !is_list(list) {
        return Err(ExtractError::structure(
            SECTION,
            format!("ability notes are <{}>, expected a list", list.value().name()),
        ));
    }
    out.push(&flatten_list(list, false));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERLEAVED: &str = r#"<div>
<h2><span class="mw-headline" id="Abilities">Abilities</span></h2>
<h4><span class="mw-headline">Mist Coil</span></h4>
<p>Heals an ally or damages an enemy.</p>
<ul><li>Costs health.</li></ul>
<h4><span class="mw-headline">Aphotic Shield</span></h4>
<ul><li>Removes debuffs.</li><li>Absorbs damage.</li></ul>
<h4><span class="mw-headline">Curse of Avernus</span></h4>
<p>Slows enemies.</p>
<ul><li>Builds up a silence.</li></ul>
<h4><span class="mw-headline">Borrowed Time</span></h4>
<ul><li>Turns damage into healing.</li></ul>
</div>"#;

    #[test]
    fn four_abilities_in_order_regardless_of_interleaving() {
        let doc = Html::parse_document(INTERLEAVED);
        let out = extract(&doc, &LanguageProfile::english()).unwrap();
        assert_eq!(
            out,
            "<h2>Abilities</h2>\
             <h4>Mist Coil</h4>Heals an ally or damages an enemy.Costs health.<br/>\
             <h4>Aphotic Shield</h4>Removes debuffs.<br/><br/>Absorbs damage.<br/>\
             <h4>Curse of Avernus</h4>Slows enemies.Builds up a silence.<br/>\
             <h4>Borrowed Time</h4>Turns damage into healing.<br/>"
        );
    }

    #[test]
    fn leading_interleaving_on_every_ability() {
        let html = INTERLEAVED
            .replace(
                "<h4><span class=\"mw-headline\">Aphotic Shield</span></h4>",
                "<h4><span class=\"mw-headline\">Aphotic Shield</span></h4><p>Shield.</p>",
            )
            .replace(
                "<h4><span class=\"mw-headline\">Borrowed Time</span></h4>",
                "<h4><span class=\"mw-headline\">Borrowed Time</span></h4><p>Ultimate.</p>",
            );
        let doc = Html::parse_document(&html);
        let out = extract(&doc, &LanguageProfile::english()).unwrap();
        let names: Vec<_> = out.match_indices("<h4>").map(|(i, _)| &out[i + 4..]).collect();
        assert_eq!(names.len(), 4);
        assert!(names[1].starts_with("Aphotic Shield</h4>Shield.Removes"));
        assert!(names[3].starts_with("Borrowed Time</h4>Ultimate.Turns"));
    }

    #[test]
    fn three_abilities_is_a_structure_mismatch() {
        let html = INTERLEAVED.replace(
            "<h4><span class=\"mw-headline\">Borrowed Time</span></h4>\n<ul><li>Turns damage into healing.</li></ul>\n",
            "",
        );
        let doc = Html::parse_document(&html);
        let err = extract(&doc, &LanguageProfile::english()).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::StructureMismatch { section: SectionKey::Abilities, .. }
        ));
    }

    #[test]
    fn notes_must_be_a_list() {
        let html = INTERLEAVED.replace(
            "<ul><li>Costs health.</li></ul>",
            "<div>Costs health.</div>",
        );
        let doc = Html::parse_document(&html);
        assert!(extract(&doc, &LanguageProfile::english()).is_err());
    }
}
