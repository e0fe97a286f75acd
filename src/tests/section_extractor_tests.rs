#[cfg(test)]
mod tests {
    use crate::errors::VizError;
    use crate::implementations::section_extractor::{
        extract_specs,
        BEHAVIOR_MARKER,
        STRUCTURE_MARKER,
        STYLE_MARKER,
    };
    use crate::tests::mocks::SPECIFY_RESPONSE;

    fn assert_malformed(text: &str, expected: &str) {
        match extract_specs(text) {
            Err(VizError::MalformedOutput { message, text: offending, .. }) => {
                assert!(message.contains(expected), "unexpected message: {}", message);
                assert_eq!(offending, text);
            }
            other => panic!("expected MalformedOutput, got {:?}", other),
        }
    }

    #[test]
    fn extracts_three_sections() {
        let specs = extract_specs(SPECIFY_RESPONSE).unwrap();
        assert_eq!(
            specs.structure,
            "A form with a textarea for the sentence, a submit button and a result section."
        );
        assert_eq!(specs.style, "Centered card, readable font, clear focus states.");
        assert_eq!(
            specs.behavior,
            "On submit, POST the text to the API and render the returned label."
        );
        assert!(specs.is_complete());
    }

    #[test]
    fn trims_heading_decoration() {
        let text = "Here is the spec.\n**HTML_SPEC**:\n- a form\n\n## CSS_SPEC -\ncards\n\nJS_SPEC:\n  fetch on submit  \n";
        let specs = extract_specs(text).unwrap();
        assert_eq!(specs.structure, "a form");
        assert_eq!(specs.style, "cards");
        assert_eq!(specs.behavior, "fetch on submit");
    }

    #[test]
    fn keeps_emphasis_inside_sections() {
        let text = "HTML_SPEC: a form with a **submit** button\n**CSS_SPEC**\nuse a **dark** theme\n### JS_SPEC\nshow the returned **label**";
        let specs = extract_specs(text).unwrap();
        assert_eq!(specs.structure, "a form with a **submit** button");
        assert_eq!(specs.style, "use a **dark** theme");
        assert_eq!(specs.behavior, "show the returned **label**");
    }

    #[test]
    fn sections_are_slices_of_the_response() {
        let text = "HTML_SPEC\nheader, form\nCSS_SPEC\ndark theme\nJS_SPEC\npost json";
        let specs = extract_specs(text).unwrap();

        let html_end = text.find(STRUCTURE_MARKER).unwrap() + STRUCTURE_MARKER.len();
        let css_start = text.find(STYLE_MARKER).unwrap();
        let css_end = css_start + STYLE_MARKER.len();
        let js_start = text.find(BEHAVIOR_MARKER).unwrap();
        let js_end = js_start + BEHAVIOR_MARKER.len();

        assert_eq!(specs.structure, text[html_end..css_start].trim());
        assert_eq!(specs.style, text[css_end..js_start].trim());
        assert_eq!(specs.behavior, text[js_end..].trim());
    }

    #[test]
    fn missing_marker_is_malformed() {
        assert_malformed("HTML_SPEC\na form\nJS_SPEC\nfetch", "CSS_SPEC");
        assert_malformed("no sections at all", "HTML_SPEC");
    }

    #[test]
    fn out_of_order_markers_are_malformed() {
        assert_malformed("CSS_SPEC\ncards\nHTML_SPEC\na form\nJS_SPEC\nfetch", "order");
    }

    #[test]
    fn empty_section_is_malformed() {
        assert_malformed("### HTML_SPEC\n\n### CSS_SPEC\ncards\n### JS_SPEC\nfetch", "empty HTML_SPEC");
        assert_malformed("HTML_SPEC\na form\nCSS_SPEC\ncards\nJS_SPEC\n---\n", "empty JS_SPEC");
    }
}
