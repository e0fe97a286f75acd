use std::fmt;

/// Placeholder substituted for both halves of the example when live verification fails
pub const SENTINEL: &str = "ERROR - UNKNOWN";

const FENCE: &str = "```";

/// The generated interface document as it moves between stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    html: String,
}

impl Artifact {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// Build an artifact from raw oracle text, dropping any wrapping code fence
    pub fn from_oracle_text(text: &str) -> Self {
        Self::new(strip_code_fences(text))
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn is_empty(&self) -> bool {
        self.html.trim().is_empty()
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.html)
    }
}

/// Component map, layout hierarchy and interaction flow, used only as prompt context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignDocument(pub String);

impl DesignDocument {
    pub fn text(&self) -> &str {
        &self.0
    }
}

/// A sample request and the prediction API's answer to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedExample {
    pub input: String,
    pub output: String,
}

impl VerifiedExample {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// The failure pair embedded when the API could not confirm a sample
    pub fn sentinel() -> Self {
        Self::new(SENTINEL, SENTINEL)
    }

    pub fn is_sentinel(&self) -> bool {
        self.input == SENTINEL && self.output == SENTINEL
    }
}

/// Remove code fences around the document.
///
/// When the text opens with a fence line (with or without a language tag),
/// only the content up to the matching closing fence line is kept, so any
/// commentary after the block is dropped. Nested wrappers and a stray closing
/// fence at the end are removed too. Text that is not fenced is only trimmed.
/// Applying it twice gives the same result.
pub fn strip_code_fences(text: &str) -> String {
    let mut current = text.trim();
    loop {
        if current.starts_with(FENCE) {
            current = match current.find('\n') {
                Some(newline) => current[newline + 1..].trim_start(),
                None => "",
            };
            if !current.starts_with(FENCE) {
                current = before_closing_fence(current);
            }
            current = current.trim();
        } else if current.ends_with(FENCE) {
            current = current.trim_end_matches('`').trim_end();
        } else {
            return current.to_string();
        }
    }
}

/// Content before the first line made only of backticks
fn before_closing_fence(body: &str) -> &str {
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        let marker = line.trim();
        if marker.starts_with(FENCE) && marker.chars().all(|c| c == '`') {
            return &body[..offset];
        }
        offset += line.len();
    }
    body
}
