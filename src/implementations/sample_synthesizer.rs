use std::io;
use std::sync::Arc;

use log::{ debug, info, warn };
use serde::Serialize;
use serde_json::ser::{ Formatter, Serializer };
use serde_json::{ json, Value };

use crate::errors::{ VizError, VizResult, SAMPLE_SYNTHESIS_CONTEXT };
use crate::implementations::prompts::PromptTemplates;
use crate::models::artifact::VerifiedExample;
use crate::models::task::TaskDescription;
use crate::traits::oracle::Oracle;
use crate::traits::prediction_api::PredictionApi;

/// Field used by `generate_fake_data` when the oracle's text is not JSON
pub const RAW_INPUT_FIELD: &str = "raw_input";

/// Produces realistic sample payloads for the task's prediction API
#[derive(Clone)]
pub struct SampleSynthesizer {
    oracle: Arc<dyn Oracle>,
    prediction_api: Arc<dyn PredictionApi>,
    prompts: Arc<PromptTemplates>,
}

impl SampleSynthesizer {
    pub fn new(
        oracle: Arc<dyn Oracle>,
        prediction_api: Arc<dyn PredictionApi>,
        prompts: Arc<PromptTemplates>
    ) -> Self {
        Self {
            oracle,
            prediction_api,
            prompts,
        }
    }

    /// Ask the oracle for a sample input, send it to the live API and return the
    /// verified (input, output) pair.
    ///
    /// A response that is not JSON is `MalformedOutput`; there is no retry and
    /// no repair. Any HTTP status other than 200 yields the sentinel pair.
    pub async fn get_model_output(&self, task: &TaskDescription) -> VizResult<VerifiedExample> {
        let api_url = task
            .api_url()
            .ok_or_else(||
                VizError::InvalidTask("model_information.api_url is required for verification".to_string())
            )?;

        let prompt = self.prompts.sample(&task.input_format_text())?;
        info!("Requesting sample input from {}", self.oracle.name());
        let text = self.oracle.generate(&prompt.system, &prompt.user).await?;

        let payload: Value = serde_json
            ::from_str(&text)
            .map_err(|e|
                VizError::malformed(
                    SAMPLE_SYNTHESIS_CONTEXT,
                    format!("sample input is not valid JSON: {}", e),
                    text.clone()
                )
            )?;
        let payload_text = to_single_line_json(&payload)?;
        debug!("Sample payload: {}", payload_text);

        let response = self.prediction_api.post_json(api_url, &payload).await?;
        if !response.is_ok() {
            warn!(
                "Prediction API verification failed: url={} payload={} status={}",
                api_url,
                payload_text,
                response.status
            );
            return Ok(VerifiedExample::sentinel());
        }

        let output_text = match serde_json::from_str::<Value>(&response.body) {
            Ok(body) => to_single_line_json(&body)?,
            Err(e) => {
                warn!("Prediction API returned a non-JSON body ({}), keeping raw text", e);
                response.body.trim().to_string()
            }
        };

        info!("Verified sample against {}", api_url);
        Ok(VerifiedExample::new(payload_text, output_text))
    }

    /// Ask the oracle for a plausible sample input without contacting the API.
    ///
    /// Unlike `get_model_output`, text that is not JSON is kept, wrapped as
    /// `{"raw_input": "<text>"}`.
    pub async fn generate_fake_data(&self, task: &TaskDescription) -> VizResult<Value> {
        let prompt = self.prompts.fake_data(task.description(), &task.input_format_text())?;
        let text = self.oracle.generate(&prompt.system, &prompt.user).await?;

        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                debug!("Fake data is not JSON ({}), wrapping raw text", e);
                Ok(json!({ RAW_INPUT_FIELD: text }))
            }
        }
    }
}

/// Single-line JSON with `", "` and `": "` separators, e.g. `{"text": "ok"}`
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
        where W: ?Sized + io::Write
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
        where W: ?Sized + io::Write
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
        where W: ?Sized + io::Write
    {
        writer.write_all(b": ")
    }
}

/// Render `value` on one line with spaced separators, keeping key order
pub fn to_single_line_json(value: &Value) -> VizResult<String> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, SpacedFormatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| VizError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
    String::from_utf8(buffer).map_err(|e| VizError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_json_uses_spaced_separators() {
        let value: Value = serde_json::from_str(r#"{"text":"ok","scores":[1,2],"meta":{"a":null}}"#).unwrap();
        assert_eq!(
            to_single_line_json(&value).unwrap(),
            r#"{"text": "ok", "scores": [1, 2], "meta": {"a": null}}"#
        );
    }

    #[test]
    fn single_line_json_keeps_key_order() {
        let value: Value = serde_json::from_str(r#"{"z":1,"a":2}"#).unwrap();
        assert_eq!(to_single_line_json(&value).unwrap(), r#"{"z": 1, "a": 2}"#);
    }

    #[test]
    fn scalars_and_empty_containers() {
        assert_eq!(to_single_line_json(&json!("x")).unwrap(), "\"x\"");
        assert_eq!(to_single_line_json(&json!([])).unwrap(), "[]");
        assert_eq!(to_single_line_json(&json!({})).unwrap(), "{}");
    }
}
