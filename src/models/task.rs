use std::fs;
use std::path::Path;

use log::{ debug, info };
use serde_yaml::Value;

use crate::errors::{ VizError, VizResult };

/// A parsed `task.yaml`: the goal, the model endpoint and its input/output formats.
///
/// The whole document is kept so that the specify stage can see every field,
/// while the accessors below expose the parts the later stages consume.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDescription {
    document: Value,
    description: String,
}

impl TaskDescription {
    /// Load and validate a task description from a YAML file
    pub fn from_path(path: &Path) -> VizResult<Self> {
        info!("Loading task description from {}", path.display());
        let contents = fs
            ::read_to_string(path)
            .map_err(|e|
                VizError::InvalidTask(format!("Failed to read {}: {}", path.display(), e))
            )?;
        Self::from_yaml_str(&contents)
    }

    /// Parse a task description from YAML text
    pub fn from_yaml_str(contents: &str) -> VizResult<Self> {
        let document: Value = serde_yaml
            ::from_str(contents)
            .map_err(|e| VizError::InvalidTask(format!("Malformed YAML: {}", e)))?;
        Self::from_value(document)
    }

    /// Build a task description from an already parsed YAML document
    pub fn from_value(document: Value) -> VizResult<Self> {
        if !document.is_mapping() {
            return Err(VizError::InvalidTask("Top level must be a mapping".to_string()));
        }

        let description = match lookup(&document, "task_description.description") {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => {
                return Err(
                    VizError::InvalidTask("Missing task_description.description".to_string())
                );
            }
            Some(other) => scalar_text(other),
        };

        debug!("Task description has {} characters", description.len());
        Ok(Self {
            document,
            description,
        })
    }

    /// `task_description.description`
    pub fn description(&self) -> &str {
        &self.description
    }

    /// `model_information.api_url`, if declared and non-empty
    pub fn api_url(&self) -> Option<&str> {
        self.extract_info("model_information.api_url")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn input_format(&self) -> Option<&Value> {
        self.extract_info("model_information.input_format")
    }

    /// The input format as prompt material
    pub fn input_format_text(&self) -> String {
        self.input_format().map(render_value).unwrap_or_default()
    }

    /// The whole `model_information` block as prompt material
    pub fn model_information_text(&self) -> String {
        self.extract_info("model_information").map(render_value).unwrap_or_default()
    }

    /// The full document rendered back to YAML
    pub fn to_yaml_text(&self) -> String {
        render_value(&self.document)
    }

    /// Look up a dotted path such as `model_information.input_format`.
    ///
    /// Numeric segments index into sequences. Any missing key, out-of-range
    /// index or step into a scalar yields `None`.
    pub fn extract_info(&self, field: &str) -> Option<&Value> {
        lookup(&self.document, field)
    }
}

fn lookup<'a>(document: &'a Value, field: &str) -> Option<&'a Value> {
    let mut current = document;
    for key in field.split('.') {
        current = match current {
            Value::Sequence(items) => items.get(key.parse::<usize>().ok()?)?,
            Value::Mapping(map) => map.get(key)?,
            _ => {
                return None;
            }
        };
    }
    Some(current)
}

/// Mappings and sequences become YAML text, scalars their plain string form
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Mapping(_) | Value::Sequence(_) | Value::Tagged(_) =>
            serde_yaml::to_string(value).unwrap_or_else(|_| format!("{:?}", value)),
        other => scalar_text(other),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other).unwrap_or_default().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TASK: &str = r#"
task_description:
  description: Classify sentiment
model_information:
  api_url: http://x/predict
  input_format:
    text: string
  output_format:
    label: string
examples:
  - name: first
  - name: second
"#;

    #[test]
    fn reads_consumed_fields() {
        let task = TaskDescription::from_yaml_str(TASK).unwrap();
        assert_eq!(task.description(), "Classify sentiment");
        assert_eq!(task.api_url(), Some("http://x/predict"));
        assert_eq!(task.input_format_text().trim(), "text: string");
        assert!(task.model_information_text().contains("label: string"));
    }

    #[test]
    fn dotted_lookup_indexes_sequences() {
        let task = TaskDescription::from_yaml_str(TASK).unwrap();
        assert_eq!(
            task.extract_info("examples.1.name").and_then(Value::as_str),
            Some("second")
        );
        assert!(task.extract_info("examples.7.name").is_none());
        assert!(task.extract_info("examples.x").is_none());
        assert!(task.extract_info("task_description.description.deeper").is_none());
    }

    #[test]
    fn scalar_format_is_rendered_verbatim() {
        let task = TaskDescription::from_yaml_str(
            "task_description:\n  description: d\nmodel_information:\n  input_format: an image file\n"
        ).unwrap();
        assert_eq!(task.input_format_text(), "an image file");
        assert!(task.extract_info("model_information.output_format").is_none());
        assert_eq!(task.api_url(), None);
    }

    #[test]
    fn rejects_missing_description() {
        let err = TaskDescription::from_yaml_str("model_information:\n  api_url: u\n").unwrap_err();
        assert!(matches!(err, VizError::InvalidTask(_)));
    }

    #[test]
    fn rejects_non_mapping_root() {
        let err = TaskDescription::from_yaml_str("- a\n- b\n").unwrap_err();
        assert!(matches!(err, VizError::InvalidTask(_)));
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = TaskDescription::from_yaml_str("task: [unclosed").unwrap_err();
        assert!(matches!(err, VizError::InvalidTask(_)));
    }
}
