//! Scripted stand-ins for the oracle and the prediction API.

use std::sync::Mutex;

use async_trait::async_trait;
use log::{ debug, info };
use serde_json::Value;

use crate::errors::{ VizError, VizResult, PREDICTION_API_SERVICE };
use crate::models::stage::PromptPair;
use crate::models::task::TaskDescription;
use crate::traits::oracle::Oracle;
use crate::traits::prediction_api::{ PredictionApi, PredictionResponse };

// Fragments of the built-in system prompts, one per template
pub const SPECIFY: &str = "expert in both AI engineering and UI/UX design";
pub const DESIGN: &str = "senior product designer";
pub const STRUCTURE: &str = "professional front-end engineer";
pub const BEHAVIOR: &str = "Add JavaScript functionality";
pub const STYLE: &str = "Tailwind CSS specialist";
pub const SAMPLE: &str = "JSON input generator";
pub const FAKE_DATA: &str = "realistic sample request payloads";
pub const RISK_SCAN: &str = "technical code reviewer";
pub const CONFIRM: &str = "You receive a list of potential issues";
pub const PATCH: &str = "specialized in debugging";

pub const SENTIMENT_TASK: &str = r#"
task_description:
  description: Classify sentiment of a short English text.
  interaction: The user types a sentence and sees the predicted label.
model_information:
  api_url: http://localhost:9000/predict
  input_format:
    text: string
  output_format:
    label: string
"#;

pub const SPECIFY_RESPONSE: &str = "### HTML_SPEC\nA form with a textarea for the sentence, a submit button and a result section.\n\n### CSS_SPEC\nCentered card, readable font, clear focus states.\n\n### JS_SPEC\nOn submit, POST the text to the API and render the returned label.";

pub const STRUCTURE_RESPONSE: &str = "```html\n<!DOCTYPE html>\n<html><head><title>Sentiment</title></head><body><form id=\"sentiment-form\"><textarea id=\"text-input\"></textarea><button id=\"submit-btn\">Classify</button></form><section id=\"result\"></section></body></html>\n```";

pub const BEHAVIOR_RESPONSE: &str = "```html\n<!DOCTYPE html>\n<html><head><title>Sentiment</title></head><body><form id=\"sentiment-form\"><textarea id=\"text-input\"></textarea><button id=\"submit-btn\">Classify</button></form><section id=\"result\"></section><script>document.getElementById('sentiment-form').addEventListener('submit', async (e) => { e.preventDefault(); const res = await fetch('http://localhost:9000/predict', { method: 'POST', headers: { 'Content-Type': 'application/json' }, body: JSON.stringify({ text: document.getElementById('text-input').value }) }); const data = await res.json(); document.getElementById('result').textContent = data.label; });</script></body></html>\n```";

pub const STYLE_RESPONSE: &str = "```html\n<!DOCTYPE html>\n<html><head><title>Sentiment</title><script src=\"https://cdn.tailwindcss.com\"></script></head><body class=\"bg-gray-50 p-8\"><form id=\"sentiment-form\" class=\"max-w-md mx-auto space-y-4\"><textarea id=\"text-input\" class=\"w-full border rounded p-2\"></textarea><button id=\"submit-btn\" class=\"bg-blue-600 text-white px-4 py-2 rounded\">Classify</button></form><section id=\"result\" class=\"mt-4 text-lg\"></section><script>document.getElementById('sentiment-form').addEventListener('submit', async (e) => { e.preventDefault(); const res = await fetch('http://localhost:9000/predict', { method: 'POST', headers: { 'Content-Type': 'application/json' }, body: JSON.stringify({ text: document.getElementById('text-input').value }) }); const data = await res.json(); document.getElementById('result').textContent = data.label; });</script></body></html>\n```";

pub fn sentiment_task() -> TaskDescription {
    TaskDescription::from_yaml_str(SENTIMENT_TASK).unwrap()
}

enum Reply {
    Text(String),
    Failure(String),
}

/// Oracle whose answers are chosen by a fragment of the system prompt, so
/// concurrent stages get the right reply regardless of call order
pub struct MockOracle {
    routes: Vec<(String, Reply)>,
    calls: Mutex<Vec<PromptPair>>,
}

impl MockOracle {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every generation stage answered with the sentiment-task fixtures
    pub fn scripted_generation() -> Self {
        Self::new()
            .respond(SPECIFY, SPECIFY_RESPONSE)
            .respond(DESIGN, "Component map: sentiment-form, text-input, submit-btn, result.")
            .respond(STRUCTURE, STRUCTURE_RESPONSE)
            .respond(BEHAVIOR, BEHAVIOR_RESPONSE)
            .respond(STYLE, STYLE_RESPONSE)
            .respond(SAMPLE, "{\"text\":\"ok\"}")
            .respond(RISK_SCAN, "NONE")
    }

    pub fn respond(mut self, system_fragment: &str, text: &str) -> Self {
        self.routes.retain(|(fragment, _)| fragment != system_fragment);
        self.routes.push((system_fragment.to_string(), Reply::Text(text.to_string())));
        self
    }

    pub fn fail(mut self, system_fragment: &str, message: &str) -> Self {
        self.routes.retain(|(fragment, _)| fragment != system_fragment);
        self.routes.push((system_fragment.to_string(), Reply::Failure(message.to_string())));
        self
    }

    pub fn calls(&self) -> Vec<PromptPair> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Calls whose system prompt contains `system_fragment`
    pub fn calls_to(&self, system_fragment: &str) -> Vec<PromptPair> {
        self.calls()
            .into_iter()
            .filter(|call| call.system.contains(system_fragment))
            .collect()
    }
}

#[async_trait]
impl Oracle for MockOracle {
    async fn generate(&self, system: &str, user: &str) -> VizResult<String> {
        self.calls.lock().unwrap().push(PromptPair::new(system, user));

        let reply = self.routes.iter().find(|(fragment, _)| system.contains(fragment.as_str()));
        match reply {
            Some((fragment, Reply::Text(text))) => {
                debug!("Mock oracle answering '{}'", fragment);
                Ok(text.clone())
            }
            Some((_, Reply::Failure(message))) => Err(VizError::transport("LLM API", message.clone())),
            None => Err(VizError::transport("LLM API", "no scripted response for this prompt")),
        }
    }

    fn name(&self) -> String {
        "mock".to_string()
    }
}

/// Prediction API returning a fixed status and body, or failing to connect
pub struct MockPredictionApi {
    status: u16,
    body: String,
    unreachable: bool,
    requests: Mutex<Vec<(String, Value)>>,
}

impl MockPredictionApi {
    pub fn ok(body: &str) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            unreachable: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::with_status(0, "")
        }
    }

    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PredictionApi for MockPredictionApi {
    async fn post_json(&self, url: &str, payload: &Value) -> VizResult<PredictionResponse> {
        self.requests.lock().unwrap().push((url.to_string(), payload.clone()));
        if self.unreachable {
            info!("Mock prediction API refusing connection to {}", url);
            return Err(VizError::transport(PREDICTION_API_SERVICE, "connection refused"));
        }
        Ok(PredictionResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }
}
