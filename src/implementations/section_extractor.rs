use log::{ debug, warn };

use crate::errors::{ VizError, VizResult };
use crate::models::spec_triple::SpecTriple;

pub const STRUCTURE_MARKER: &str = "HTML_SPEC";
pub const STYLE_MARKER: &str = "CSS_SPEC";
pub const BEHAVIOR_MARKER: &str = "JS_SPEC";

const CONTEXT: &str = "specify stage";

/// Heading punctuation around a marker: `### HTML_SPEC:` or `**CSS_SPEC** -`
fn is_heading_punctuation(c: char) -> bool {
    matches!(c, '-' | ':' | '#' | '*') || c.is_whitespace()
}

/// Drop decoration left after the previous marker and, when another marker
/// follows, the decoration in front of it on its own line. The end of the
/// text is only trimmed of whitespace.
fn clean_section(raw: &str, before_marker: bool) -> String {
    let body = raw.trim_start_matches(is_heading_punctuation);
    let body = if before_marker {
        let line_start = body.rfind('\n').map_or(0, |i| i + 1);
        let kept = body[line_start..].trim_end_matches(is_heading_punctuation);
        &body[..line_start + kept.len()]
    } else {
        body
    };
    body.trim().to_string()
}

/// Split the specify stage's response into its three sections.
///
/// Each marker is located by its first occurrence. A section runs from the end
/// of its marker to the start of the next one; the behavior section runs to
/// the end of the text. Missing or out-of-order markers and empty sections
/// are `MalformedOutput`.
pub fn extract_specs(text: &str) -> VizResult<SpecTriple> {
    let find = |marker: &str| {
        text.find(marker).ok_or_else(|| {
            warn!("Oracle response is missing the {} section", marker);
            VizError::malformed(CONTEXT, format!("missing {} section", marker), text)
        })
    };

    let structure_start = find(STRUCTURE_MARKER)?;
    let style_start = find(STYLE_MARKER)?;
    let behavior_start = find(BEHAVIOR_MARKER)?;

    let structure_end = structure_start + STRUCTURE_MARKER.len();
    let style_end = style_start + STYLE_MARKER.len();
    let behavior_end = behavior_start + BEHAVIOR_MARKER.len();

    if style_start < structure_end || behavior_start < style_end {
        return Err(
            VizError::malformed(
                CONTEXT,
                format!(
                    "sections must appear in the order {}, {}, {}",
                    STRUCTURE_MARKER,
                    STYLE_MARKER,
                    BEHAVIOR_MARKER
                ),
                text
            )
        );
    }

    let specs = SpecTriple::new(
        clean_section(&text[structure_end..style_start], true),
        clean_section(&text[style_end..behavior_start], true),
        clean_section(&text[behavior_end..], false)
    );

    for (marker, section) in [
        (STRUCTURE_MARKER, &specs.structure),
        (STYLE_MARKER, &specs.style),
        (BEHAVIOR_MARKER, &specs.behavior),
    ] {
        if section.is_empty() {
            return Err(VizError::malformed(CONTEXT, format!("empty {} section", marker), text));
        }
    }

    debug!(
        "Extracted specs: structure {} / style {} / behavior {} characters",
        specs.structure.len(),
        specs.style.len(),
        specs.behavior.len()
    );
    Ok(specs)
}
