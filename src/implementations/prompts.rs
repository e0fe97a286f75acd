//! Prompt templates for every oracle call.
//!
//! Templates use `{{name}}` placeholders and are rendered in a single pass, so
//! inserted values (HTML, JSON, YAML) are never scanned for placeholders
//! themselves. Any template can be overridden by name from the config file.

use std::collections::HashMap;

use crate::config::PipelineVariant;
use crate::errors::{ VizError, VizResult };
use crate::models::artifact::{ Artifact, DesignDocument, VerifiedExample };
use crate::models::spec_triple::SpecTriple;
use crate::models::stage::PromptPair;
use crate::models::task::TaskDescription;

const SPECIFY_SYSTEM: &str = r#"You are an expert in both AI engineering and UI/UX design. You help build interactive user interfaces for machine learning models from task descriptions.

Each task comes as a `task.yaml` document that describes the goal, the model endpoint, its input/output data and the expected user interaction.

Analyze the task and write a UI specification that defines:
1. What the HTML structure must contain (forms, inputs, buttons, upload areas, result sections, ...).
2. What styling makes the interface clear, usable and pleasant.
3. What JavaScript logic makes it interactive (reading input, calling the model API, rendering results, handling errors).

Your answer must contain exactly three sections, in this order: HTML_SPEC, CSS_SPEC, JS_SPEC.
These specifications are handed to specialized code generators, so be precise and describe structure, styling intent and behavior only. Do not write code."#;

const SPECIFY_USER: &str = r#"Below is the `task.yaml` document for this task. Analyze it and write the UI specification as instructed.

{{task}}

Your response must contain three sections:

### HTML_SPEC
The required layout and elements: what each part of the interface is for, which inputs are needed and how the user interacts with them.

### CSS_SPEC
The styling of each component: layout, spacing, colors, typography, hover/focus states and responsiveness.

### JS_SPEC
The logic for handling user input, calling the model API, processing the response and updating the interface."#;

const DESIGN_SYSTEM: &str = r#"You are a senior product designer. You turn UI specifications into a compact design document that front-end engineers follow while building a single-page interface.

The design document must describe:
- Component map: every component, its purpose and the stable id it will carry.
- Layout hierarchy: how components nest and in which order they appear, on desktop and on mobile.
- Interaction flow: what happens, step by step, from the first user input to the rendered model result, including loading and error states.

Write plain prose and bullet lists. Do not write code."#;

const DESIGN_USER: &str = r#"Write the design document for the following UI specification.

### HTML_SPEC
{{structure_spec}}

### CSS_SPEC
{{style_spec}}

### JS_SPEC
{{behavior_spec}}"#;

const STRUCTURE_SYSTEM: &str = r#"You are a professional front-end engineer. Generate a clean, semantic and accessible HTML5 document from a UI specification.

The document must:
- Use proper tags such as <form>, <label>, <input>, <section>, <button>.
- Use semantic structure (<header>, <main>, <footer> where appropriate).
- Be readable, properly indented and commented.
- Give every interactive or dynamic element a stable, descriptive id and class names that later styling and scripting steps will reference.
- Be self-contained (<!DOCTYPE html>, <html>, <head>, <body>).

DO NOT include any CSS or JavaScript; styling and behavior are added by later steps.
{{layout_rules}}
Return only the HTML document."#;

const STRUCTURE_USER: &str = r#"Below is the UI specification (HTML_SPEC) describing what the interface must contain. Generate the complete HTML5 document.

{{structure_spec}}
{{design}}"#;

const BEHAVIOR_SYSTEM: &str = r#"You are a senior front-end developer. Add JavaScript functionality to the provided HTML document as described in the JS_SPEC.

Requirements:
- Read the HTML and the JS_SPEC carefully.
- Write one <script> block with all required interactivity and insert it at the end of <body>.
- Use clear, readable vanilla JavaScript (no frameworks).
- Select elements by the ids and classes already present in the HTML.
- Do not restructure the existing HTML; only append the logic.
- Handle errors and loading states so every interaction updates the interface.

Calls to the machine learning model must follow this contract:
API endpoint: {{api_url}}
Example of API input:
{{input_example}}
Example of API output:
{{output_example}}

Return the complete updated HTML document with the script embedded."#;

const BEHAVIOR_USER: &str = r#"Here is the HTML document:
{{html}}

And here is the JS_SPEC describing the logic to implement:

{{behavior_spec}}

Return the complete HTML document with the JavaScript inserted at the end of <body>."#;

const STYLE_SYSTEM: &str = r#"You are a UI/UX expert and Tailwind CSS specialist. Improve an existing HTML document by applying Tailwind CSS utility classes so it is visually appealing, easy to use and accessible.

Use Tailwind utility classes directly on the elements by adding or editing their `class=""` attribute instead of writing CSS.

1. Readability and usability
- Apply spacing, layout (flex/grid) and typography utilities for a clear structure.
- Style forms, buttons, inputs and result areas so they are easy to read and use.
- Add visual feedback (`hover:`, `focus:`, `disabled:`) where appropriate.
- Give headings, labels, buttons and containers a clear visual hierarchy.

2. Accessibility and responsiveness
- Use colors, contrast and sizes that remain accessible.
- Make the layout work on desktop and mobile.
- Keep interactive elements keyboard-friendly.

3. Technical rules
- Do not change the structure of the HTML or the embedded script.
- Do not add traditional CSS or <style> blocks.
- Include the Tailwind CDN script <script src="https://cdn.tailwindcss.com"></script> in the <head>.
{{layout_rules}}
Return the complete updated HTML document."#;

const STYLE_USER: &str = r#"Here is the HTML document:
{{html}}

And here is the CSS_SPEC describing the desired appearance:

{{style_spec}}
{{design}}
Return the complete HTML document with Tailwind classes applied to the elements. Make sure the Tailwind CDN script is in the <head>."#;

const LAYOUT_RULES: &str = r#"
Layout stability rules:
- Keep every existing element, id and class name; never rename or remove them.
- Keep the order and nesting of elements exactly as given.
- Reserve space for result and error areas so content does not jump when they fill in.
"#;

const SAMPLE_SYSTEM: &str = r#"You are a JSON input generator for machine learning APIs. You receive an `input_format` specification describing the structure of the API's JSON input and produce one valid sample input.

Guidelines:
- Return only the JSON value, compact, on a single line. No explanations, no markdown, no code fences.
- Fill every field with realistic, coherent dummy data based on its name and type.
- Match the required structure and types exactly.
- Never repeat the schema or format itself."#;

const SAMPLE_USER: &str = r#"Based on the following input_format schema, generate a valid JSON input:
{{input_format}}"#;

const FAKE_DATA_SYSTEM: &str = r#"You generate realistic sample request payloads for machine learning APIs. Answer with a single JSON value that matches the described input format and nothing else."#;

const FAKE_DATA_USER: &str = r#"Task: {{description}}

Input format:
{{input_format}}

Generate one plausible sample input."#;

const RISK_SCAN_SYSTEM: &str = r#"You are a senior front-end developer and technical code reviewer. You analyze HTML documents that embed JavaScript and CSS.

Your goal is to detect technical issues, especially in the JavaScript: syntax, variable handling, data structure misuse and logic errors.
Do NOT report security or UX concerns such as CORS, accessibility or general best practices. Concentrate strictly on programming mistakes that can cause runtime or logical errors.
Only list the possible risks, nothing else. If there are none, answer exactly: NONE"#;

const RISK_SCAN_USER: &str = r#"Below is a complete HTML document with embedded JavaScript and CSS.

Your task:
1. Analyze the code and identify potential JavaScript bugs or misuses.
2. Focus strictly on technical risks such as:
   - Syntax errors
   - Invalid variable usage or scoping problems
   - Assumptions about the API response structure
   - Logic bugs or missing conditions
   - Misuse of DOM APIs or event handling
   - Misuse of async/await or unhandled promises
3. Ignore security, styling, CORS, accessibility and general best-practice suggestions.

### Full HTML code:
```html
{{html}}
```"#;

const CONFIRM_SYSTEM: &str = r#"You are a senior front-end engineer and code reviewer. You analyze an HTML document with inline JavaScript and CSS, focusing on the JavaScript logic.

You receive a list of potential issues. Confirm whether each one is real, explain why, point to the exact code location and suggest a fix. If an issue is not real, explain why the code is safe in context."#;

const CONFIRM_USER: &str = r#"Below is a complete HTML document (with inline CSS and JavaScript) and a list of potential issues found in it.

Your task:
1. Confirm whether each potential issue is an actual issue.
2. For real issues:
   - Classify it (logic, syntax, runtime, bad practice)
   - Point to the specific code fragment
   - Explain the problem
   - Suggest a concrete fix
3. For non-issues, explain why the code is valid.

Return the results as a structured list.

### Project description:
{{description}}

### Model information (API endpoint):
{{model_information}}

### Example API input:
{{input_example}}

### Example API output:
{{output_example}}

### Potential issues:
{{risks}}

### Full code:
```html
{{html}}
```"#;

const PATCH_SYSTEM: &str = r#"You are a senior developer specialized in debugging and refactoring front-end code. You receive an HTML document (with inline JavaScript and CSS) and a list of confirmed issues.

Fix exactly the confirmed issues without changing code that is correct. The output must be one complete, fixed HTML document that works according to the project description."#;

const PATCH_USER: &str = r#"### Project description:
{{description}}

### Confirmed issues:
{{confirmed_issues}}

### Original code:
```html
{{html}}
```

Return the corrected complete HTML document."#;

/// Names of the built-in templates
pub const TEMPLATE_NAMES: [&str; 20] = [
    "specify.system",
    "specify.user",
    "design.system",
    "design.user",
    "structure.system",
    "structure.user",
    "behavior.system",
    "behavior.user",
    "style.system",
    "style.user",
    "sample.system",
    "sample.user",
    "fake_data.system",
    "fake_data.user",
    "risk_scan.system",
    "risk_scan.user",
    "confirm.system",
    "confirm.user",
    "patch.system",
    "patch.user",
];

/// The prompt library used by every stage
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    templates: HashMap<String, String>,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        let defaults = [
            SPECIFY_SYSTEM,
            SPECIFY_USER,
            DESIGN_SYSTEM,
            DESIGN_USER,
            STRUCTURE_SYSTEM,
            STRUCTURE_USER,
            BEHAVIOR_SYSTEM,
            BEHAVIOR_USER,
            STYLE_SYSTEM,
            STYLE_USER,
            SAMPLE_SYSTEM,
            SAMPLE_USER,
            FAKE_DATA_SYSTEM,
            FAKE_DATA_USER,
            RISK_SCAN_SYSTEM,
            RISK_SCAN_USER,
            CONFIRM_SYSTEM,
            CONFIRM_USER,
            PATCH_SYSTEM,
            PATCH_USER,
        ];
        let templates = TEMPLATE_NAMES.iter()
            .zip(defaults)
            .map(|(name, text)| (name.to_string(), text.to_string()))
            .collect();
        Self { templates }
    }
}

impl PromptTemplates {
    /// Built-in templates with `overrides` replacing entries of the same name
    pub fn with_overrides(overrides: &HashMap<String, String>) -> VizResult<Self> {
        let mut library = Self::default();
        for (name, text) in overrides {
            if !library.templates.contains_key(name) {
                return Err(VizError::Template(format!("Unknown template: {}", name)));
            }
            library.templates.insert(name.clone(), text.clone());
        }
        Ok(library)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }

    /// Render a template with the given parameters
    pub fn render(&self, name: &str, params: &[(&str, &str)]) -> VizResult<String> {
        let template = self
            .get(name)
            .ok_or_else(|| VizError::Template(format!("Template not found: {}", name)))?;
        render_placeholders(template, params).map_err(|placeholder|
            VizError::Template(format!("Unresolved placeholder {{{{{}}}}} in {}", placeholder, name))
        )
    }

    fn pair(&self, stage: &str, params: &[(&str, &str)]) -> VizResult<PromptPair> {
        Ok(
            PromptPair::new(
                self.render(&format!("{}.system", stage), params)?.trim(),
                self.render(&format!("{}.user", stage), params)?.trim()
            )
        )
    }

    pub fn specify(&self, task: &TaskDescription) -> VizResult<PromptPair> {
        let task_text = task.to_yaml_text();
        self.pair("specify", &[("task", task_text.as_str())])
    }

    pub fn design(&self, specs: &SpecTriple) -> VizResult<PromptPair> {
        self.pair(
            "design",
            &[
                ("structure_spec", specs.structure.as_str()),
                ("style_spec", specs.style.as_str()),
                ("behavior_spec", specs.behavior.as_str()),
            ]
        )
    }

    pub fn structure(
        &self,
        specs: &SpecTriple,
        design: Option<&DesignDocument>,
        variant: PipelineVariant
    ) -> VizResult<PromptPair> {
        let design = design_section(design);
        self.pair(
            "structure",
            &[
                ("structure_spec", specs.structure.as_str()),
                ("design", design.as_str()),
                ("layout_rules", layout_rules(variant)),
            ]
        )
    }

    pub fn behavior(
        &self,
        artifact: &Artifact,
        specs: &SpecTriple,
        api_url: &str,
        example: &VerifiedExample
    ) -> VizResult<PromptPair> {
        self.pair(
            "behavior",
            &[
                ("html", artifact.html()),
                ("behavior_spec", specs.behavior.as_str()),
                ("api_url", api_url),
                ("input_example", example.input.as_str()),
                ("output_example", example.output.as_str()),
            ]
        )
    }

    pub fn style(
        &self,
        artifact: &Artifact,
        specs: &SpecTriple,
        design: Option<&DesignDocument>,
        variant: PipelineVariant
    ) -> VizResult<PromptPair> {
        let design = design_section(design);
        self.pair(
            "style",
            &[
                ("html", artifact.html()),
                ("style_spec", specs.style.as_str()),
                ("design", design.as_str()),
                ("layout_rules", layout_rules(variant)),
            ]
        )
    }

    pub fn sample(&self, input_format: &str) -> VizResult<PromptPair> {
        self.pair("sample", &[("input_format", input_format)])
    }

    pub fn fake_data(&self, description: &str, input_format: &str) -> VizResult<PromptPair> {
        self.pair("fake_data", &[
            ("description", description),
            ("input_format", input_format),
        ])
    }

    pub fn risk_scan(&self, artifact: &Artifact) -> VizResult<PromptPair> {
        self.pair("risk_scan", &[("html", artifact.html())])
    }

    pub fn confirm(
        &self,
        artifact: &Artifact,
        risks: &str,
        description: &str,
        model_information: &str,
        example: &VerifiedExample
    ) -> VizResult<PromptPair> {
        self.pair(
            "confirm",
            &[
                ("html", artifact.html()),
                ("risks", risks),
                ("description", description),
                ("model_information", model_information),
                ("input_example", example.input.as_str()),
                ("output_example", example.output.as_str()),
            ]
        )
    }

    pub fn patch(
        &self,
        artifact: &Artifact,
        confirmed_issues: &str,
        description: &str
    ) -> VizResult<PromptPair> {
        self.pair(
            "patch",
            &[
                ("html", artifact.html()),
                ("confirmed_issues", confirmed_issues),
                ("description", description),
            ]
        )
    }
}

fn layout_rules(variant: PipelineVariant) -> &'static str {
    match variant {
        PipelineVariant::Extended => LAYOUT_RULES,
        PipelineVariant::Reduced => "",
    }
}

fn design_section(design: Option<&DesignDocument>) -> String {
    match design {
        Some(doc) => format!("\n### DESIGN DOCUMENT\n{}\n", doc.text()),
        None => String::new(),
    }
}

/// Replace every `{{name}}` in `template` in one left-to-right pass.
/// Returns the first placeholder name with no matching parameter.
fn render_placeholders(template: &str, params: &[(&str, &str)]) -> Result<String, String> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        output.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("}}") else {
            output.push_str(&rest[open..]);
            return Ok(output);
        };

        let name = after_open[..close].trim();
        match params.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => output.push_str(value),
            None => {
                return Err(name.to_string());
            }
        }
        rest = &after_open[close + 2..];
    }

    output.push_str(rest);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_all_placeholders() {
        let rendered = render_placeholders("a={{a}}, b={{ b }}", &[
            ("a", "1"),
            ("b", "2"),
        ]).unwrap();
        assert_eq!(rendered, "a=1, b=2");
    }

    #[test]
    fn inserted_values_are_not_rescanned() {
        let rendered = render_placeholders("{{html}} / {{url}}", &[
            ("html", "<p>{{url}}</p>"),
            ("url", "http://x"),
        ]).unwrap();
        assert_eq!(rendered, "<p>{{url}}</p> / http://x");
    }

    #[test]
    fn unresolved_placeholder_is_reported() {
        assert_eq!(render_placeholders("{{missing}}", &[]), Err("missing".to_string()));
    }

    #[test]
    fn unterminated_braces_are_kept() {
        assert_eq!(render_placeholders("x {{ y", &[]).unwrap(), "x {{ y");
    }

    #[test]
    fn every_builtin_template_is_present() {
        let library = PromptTemplates::default();
        for name in TEMPLATE_NAMES {
            assert!(library.get(name).is_some(), "missing {}", name);
        }
    }

    #[test]
    fn overrides_replace_by_name_and_reject_unknown_names() {
        let mut overrides = HashMap::new();
        overrides.insert("sample.user".to_string(), "Schema: {{input_format}}".to_string());
        let library = PromptTemplates::with_overrides(&overrides).unwrap();
        assert_eq!(library.sample("text: string").unwrap().user, "Schema: text: string");

        overrides.insert("nope".to_string(), "x".to_string());
        assert!(matches!(PromptTemplates::with_overrides(&overrides), Err(VizError::Template(_))));
    }

    #[test]
    fn layout_rules_only_in_extended_variant() {
        let library = PromptTemplates::default();
        let specs = SpecTriple::new("a form", "blue", "post it");
        let extended = library.structure(&specs, None, PipelineVariant::Extended).unwrap();
        let reduced = library.structure(&specs, None, PipelineVariant::Reduced).unwrap();
        assert!(extended.system.contains("Layout stability rules"));
        assert!(!reduced.system.contains("Layout stability rules"));
    }

    #[test]
    fn behavior_prompt_embeds_contract() {
        let library = PromptTemplates::default();
        let specs = SpecTriple::new("s", "c", "call the API on submit");
        let example = VerifiedExample::new("{\"text\": \"ok\"}", "{\"label\": \"positive\"}");
        let pair = library
            .behavior(&Artifact::new("<form id=\"f\"></form>"), &specs, "http://x/predict", &example)
            .unwrap();
        assert!(pair.system.contains("API endpoint: http://x/predict"));
        assert!(pair.system.contains("{\"label\": \"positive\"}"));
        assert!(pair.user.contains("<form id=\"f\"></form>"));
        assert!(pair.user.contains("call the API on submit"));
    }
}
