//! Wire types for the backend endpoints, plus the action and event
//! enums the UI and the spawned tasks exchange.

use serde::{Deserialize, Serialize};

/// Interpreter mode forwarded to the backend
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Code,
    Script,
    Command,
    Vision,
    Chat,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Code,
        Mode::Script,
        Mode::Command,
        Mode::Vision,
        Mode::Chat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Code => "code",
            Mode::Script => "script",
            Mode::Command => "command",
            Mode::Vision => "vision",
            Mode::Chat => "chat",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Code => "Code",
            Mode::Script => "Script",
            Mode::Command => "Command",
            Mode::Vision => "Vision",
            Mode::Chat => "Chat",
        }
    }
}

/// Target language for generation and execution
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Language {
    Python,
    JavaScript,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Python, Language::JavaScript];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
        }
    }
}

/// One backend-bound action. Each has its own {idle, pending} flag;
/// a click while pending is a no-op.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ActionKind {
    Generate,
    Execute,
    Fix,
    Save,
    Install,
    LoadModels,
}

// ============================================================================
// REQUEST BODIES
// ============================================================================

#[derive(Serialize, Debug)]
pub struct GenerateRequest {
    pub prompt: String,
    pub mode: &'static str,
    pub model: String,
    pub language: &'static str,
    pub execute: bool,
}

#[derive(Serialize, Debug)]
pub struct ExecuteRequest {
    pub code: String,
    pub mode: &'static str,
    pub model: String,
    pub language: &'static str,
}

#[derive(Serialize, Debug)]
pub struct FixRequest {
    pub code: String,
}

#[derive(Serialize, Debug)]
pub struct SaveRequest {
    pub code: String,
}

#[derive(Serialize, Debug)]
pub struct InstallRequest {
    pub package: String,
    pub mode: &'static str,
    pub model: String,
    pub language: &'static str,
}

// ============================================================================
// RESPONSE BODIES
// ============================================================================
// A present `error` field is a failure regardless of HTTP status, so every
// conversion checks it before looking at the payload.

fn reject_error(error: Option<String>) -> Result<(), String> {
    match error {
        Some(message) => Err(message),
        None => Ok(()),
    }
}

/// Minimal body used to salvage a server-supplied message from non-2xx responses.
#[derive(Deserialize, Debug)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl GenerateResponse {
    pub fn into_code(self) -> Result<String, String> {
        reject_error(self.error)?;
        self.response
            .ok_or_else(|| "Generate response carried no code".to_string())
    }
}

#[derive(Deserialize, Debug)]
pub struct ExecuteResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub special_outputs: Vec<SpecialOutput>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ExecuteResponse {
    pub fn into_parts(self) -> Result<(String, Vec<SpecialOutput>), String> {
        reject_error(self.error)?;
        let result = self
            .result
            .ok_or_else(|| "Execute response carried no result".to_string())?;
        Ok((result, self.special_outputs))
    }
}

#[derive(Deserialize, Debug)]
pub struct FixResponse {
    #[serde(default)]
    pub fixed_code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl FixResponse {
    pub fn into_code(self) -> Result<String, String> {
        reject_error(self.error)?;
        self.fixed_code
            .ok_or_else(|| "Fix response carried no code".to_string())
    }
}

/// Shared shape of `/save_code` and `/install` responses.
#[derive(Deserialize, Debug)]
pub struct MessageResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl MessageResponse {
    pub fn into_message(self, fallback: &str) -> Result<String, String> {
        reject_error(self.error)?;
        Ok(self.result.unwrap_or_else(|| fallback.to_string()))
    }
}

#[derive(Deserialize, Debug)]
pub struct ModelsResponse {
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ModelsResponse {
    pub fn into_models(self) -> Result<Vec<String>, String> {
        reject_error(self.error)?;
        Ok(self.models)
    }
}

/// Auxiliary rendering item attached to an execute response
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SpecialOutput {
    Image { title: String, url: String },
    Html { title: String, content: String },
}

impl SpecialOutput {
    pub fn title(&self) -> &str {
        match self {
            SpecialOutput::Image { title, .. } => title,
            SpecialOutput::Html { title, .. } => title,
        }
    }
}

// ============================================================================
// EVENTS
// ============================================================================

/// What a completed action did to the session
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Generated { code: String, run_after: bool },
    Executed { result: String, special: Vec<SpecialOutput> },
    Fixed { code: String },
    Saved { message: String },
    Installed { message: String },
    Models { names: Vec<String> },
}

/// Completion events pushed from spawned tasks to the UI thread,
/// drained once per frame.
#[derive(Debug)]
pub enum BackendEvent {
    Action {
        kind: ActionKind,
        outcome: Result<Outcome, String>,
    },
    ImageLoaded {
        url: String,
        bytes: Vec<u8>,
    },
    ImageFailed {
        url: String,
        error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generate_request_serializes_every_field() {
        let body = GenerateRequest {
            prompt: "print hello".to_string(),
            mode: Mode::Code.as_str(),
            model: "m1".to_string(),
            language: Language::Python.as_str(),
            execute: false,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "prompt": "print hello",
                "mode": "code",
                "model": "m1",
                "language": "python",
                "execute": false,
            })
        );
    }

    #[test]
    fn execute_request_carries_selections() {
        let body = ExecuteRequest {
            code: "print('hello')".to_string(),
            mode: Mode::Script.as_str(),
            model: "m1".to_string(),
            language: Language::JavaScript.as_str(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "code": "print('hello')",
                "mode": "script",
                "model": "m1",
                "language": "javascript",
            })
        );
    }

    #[test]
    fn generate_response_prefers_error_over_payload() {
        let parsed: GenerateResponse =
            serde_json::from_value(json!({ "response": "x = 1", "error": "model not found" }))
                .unwrap();
        assert_eq!(parsed.into_code(), Err("model not found".to_string()));
    }

    #[test]
    fn generate_response_yields_code() {
        let parsed: GenerateResponse =
            serde_json::from_value(json!({ "response": "print('hello')" })).unwrap();
        assert_eq!(parsed.into_code(), Ok("print('hello')".to_string()));
    }

    #[test]
    fn execute_response_without_special_outputs_parses() {
        let parsed: ExecuteResponse =
            serde_json::from_value(json!({ "result": "hello\n" })).unwrap();
        let (result, special) = parsed.into_parts().unwrap();
        assert_eq!(result, "hello\n");
        assert!(special.is_empty());
    }

    #[test]
    fn special_outputs_parse_by_type_tag() {
        let parsed: ExecuteResponse = serde_json::from_value(json!({
            "result": "done",
            "special_outputs": [
                { "type": "image", "title": "Plot", "url": "/static/plot.png" },
                { "type": "html", "title": "Table", "content": "<table></table>" },
            ],
        }))
        .unwrap();
        let (_, special) = parsed.into_parts().unwrap();
        assert_eq!(
            special,
            vec![
                SpecialOutput::Image {
                    title: "Plot".to_string(),
                    url: "/static/plot.png".to_string(),
                },
                SpecialOutput::Html {
                    title: "Table".to_string(),
                    content: "<table></table>".to_string(),
                },
            ]
        );
    }

    #[test]
    fn message_response_falls_back_when_result_missing() {
        let parsed: MessageResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(
            parsed.into_message("Package numpy installed successfully"),
            Ok("Package numpy installed successfully".to_string())
        );
    }

    #[test]
    fn models_response_preserves_order() {
        let parsed: ModelsResponse =
            serde_json::from_value(json!({ "models": ["code-llama", "mistral-7b", "gpt-3.5-turbo"] }))
                .unwrap();
        assert_eq!(
            parsed.into_models().unwrap(),
            vec!["code-llama", "mistral-7b", "gpt-3.5-turbo"]
        );
    }
}
