/// The three free-text UI specifications extracted from the specify stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecTriple {
    /// What the markup must contain (HTML_SPEC)
    pub structure: String,
    /// How it should look (CSS_SPEC)
    pub style: String,
    /// What the script must do (JS_SPEC)
    pub behavior: String,
}

impl SpecTriple {
    pub fn new(
        structure: impl Into<String>,
        style: impl Into<String>,
        behavior: impl Into<String>
    ) -> Self {
        Self {
            structure: structure.into(),
            style: style.into(),
            behavior: behavior.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.structure.is_empty() && !self.style.is_empty() && !self.behavior.is_empty()
    }
}
