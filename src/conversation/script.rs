//! Recorded conversation scripts.
//!
//! A script is NDJSON: one step per line, blank lines and `#` comments
//! skipped. Every step may carry a `delay_ms` applied before it runs.

use serde::{Deserialize, Serialize};

use super::{ConversationError, ConversationEvent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    #[serde(default)]
    pub delay_ms: u64,
    #[serde(flatten)]
    pub action: StepAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepAction {
    UserTranscript {
        text: String,
    },
    AgentResponse {
        text: String,
    },
    AgentResponseCorrection {
        original: String,
        corrected: String,
    },
    Latency {
        ms: u64,
    },
    /// Conversation ends normally. The id is generated when omitted.
    End {
        #[serde(default)]
        conversation_id: Option<String>,
    },
    /// Conversation ends with an error.
    Fail {
        kind: FailureKind,
        message: String,
    },
    /// Credential the client must have been constructed with.
    RequireApiKey {
        key: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Auth,
    Network,
    Audio,
    Backend,
}

impl FailureKind {
    pub fn into_error(self, message: String) -> ConversationError {
        match self {
            FailureKind::Auth => ConversationError::Auth(message),
            FailureKind::Network => ConversationError::Network(message),
            FailureKind::Audio => ConversationError::AudioDevice(message),
            FailureKind::Backend => ConversationError::Backend(message),
        }
    }
}

impl StepAction {
    /// The notification this step delivers, if any.
    pub fn event(&self) -> Option<ConversationEvent> {
        match self {
            StepAction::UserTranscript { text } => {
                Some(ConversationEvent::UserTranscript(text.clone()))
            }
            StepAction::AgentResponse { text } => {
                Some(ConversationEvent::AgentResponse(text.clone()))
            }
            StepAction::AgentResponseCorrection {
                original,
                corrected,
            } => Some(ConversationEvent::AgentResponseCorrection {
                original: original.clone(),
                corrected: corrected.clone(),
            }),
            StepAction::Latency { ms } => Some(ConversationEvent::LatencyMeasurement(*ms)),
            StepAction::End { .. } | StepAction::Fail { .. } | StepAction::RequireApiKey { .. } => {
                None
            }
        }
    }
}

/// Parse a single script line.
///
/// Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> serde_json::Result<Option<ScriptStep>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let step: ScriptStep = serde_json::from_str(line)?;
    Ok(Some(step))
}

/// Parse a whole script, reporting the first malformed line by number.
pub fn parse_script(contents: &str) -> Result<Vec<ScriptStep>, ConversationError> {
    let mut steps = Vec::new();
    for (i, line) in contents.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(step)) => steps.push(step),
            Ok(None) => {}
            Err(e) => {
                return Err(ConversationError::Backend(format!(
                    "conversation script line {}: {e}",
                    i + 1
                )));
            }
        }
    }
    Ok(steps)
}
