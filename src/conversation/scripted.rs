//! Conversation client that replays a recorded script.
//!
//! Sessions behave like live ones: `start_session` starts the audio interface
//! and a replay thread that drives the callbacks, `wait_for_session_end`
//! blocks until the script reaches its `end` or `fail` step.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use rand::prelude::*;

use super::script::{self, ScriptStep, StepAction};
use super::{
    AudioInterface, Callbacks, Conversation, ConversationClient, ConversationError,
    SessionOptions,
};

pub const DEFAULT_SCRIPT_PATH: &str = "conversation.jsonl";

/// Client that constructs sessions from a script file.
///
/// The script is re-read for every session so it can be edited between runs.
pub struct ScriptedClient {
    api_key: String,
    script_path: PathBuf,
}

impl ScriptedClient {
    pub fn new(api_key: impl Into<String>, script_path: impl Into<PathBuf>) -> Self {
        Self {
            api_key: api_key.into(),
            script_path: script_path.into(),
        }
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    fn load_steps(&self) -> Result<Vec<ScriptStep>, ConversationError> {
        let contents = std::fs::read_to_string(&self.script_path).map_err(|e| {
            ConversationError::Backend(format!(
                "failed to read conversation script {}: {e}",
                self.script_path.display()
            ))
        })?;
        script::parse_script(&contents)
    }

    fn check_credentials(
        &self,
        steps: &[ScriptStep],
        requires_auth: bool,
    ) -> Result<(), ConversationError> {
        for step in steps {
            if let StepAction::RequireApiKey { key } = &step.action {
                if !requires_auth {
                    return Err(ConversationError::Auth(
                        "agent requires an API key but none is configured".into(),
                    ));
                }
                if *key != self.api_key {
                    return Err(ConversationError::Auth("invalid API key".into()));
                }
            }
        }
        Ok(())
    }
}

impl ConversationClient for ScriptedClient {
    fn create_session(
        &self,
        options: SessionOptions,
    ) -> Result<Box<dyn Conversation>, ConversationError> {
        if options.agent_id.trim().is_empty() {
            return Err(ConversationError::Backend("agent id must not be empty".into()));
        }
        let steps = self.load_steps()?;
        self.check_credentials(&steps, options.requires_auth)?;
        tracing::debug!(
            agent_id = %options.agent_id,
            steps = steps.len(),
            script = %self.script_path.display(),
            "constructed scripted session"
        );
        Ok(Box::new(ScriptedConversation::new(
            steps,
            options.audio,
            options.callbacks,
        )))
    }
}

/// How a replayed script finished.
type ReplayResult = Result<String, ConversationError>;

pub struct ScriptedConversation {
    steps: Vec<ScriptStep>,
    audio: Box<dyn AudioInterface>,
    callbacks: Arc<Callbacks>,
    replay: Option<JoinHandle<ReplayResult>>,
}

impl ScriptedConversation {
    pub fn new(
        steps: Vec<ScriptStep>,
        audio: Box<dyn AudioInterface>,
        callbacks: Callbacks,
    ) -> Self {
        Self {
            steps,
            audio,
            callbacks: Arc::new(callbacks),
            replay: None,
        }
    }
}

impl Conversation for ScriptedConversation {
    fn start_session(&mut self) -> Result<(), ConversationError> {
        if self.replay.is_some() {
            return Err(ConversationError::Backend("session already started".into()));
        }
        self.audio.start()?;

        let steps = std::mem::take(&mut self.steps);
        let callbacks = Arc::clone(&self.callbacks);
        let handle = std::thread::Builder::new()
            .name("script-replay".into())
            .spawn(move || replay(&steps, &callbacks))
            .map_err(|e| {
                ConversationError::Backend(format!("failed to start replay thread: {e}"))
            });
        match handle {
            Ok(handle) => {
                self.replay = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.audio.stop();
                Err(e)
            }
        }
    }

    fn wait_for_session_end(&mut self) -> Result<String, ConversationError> {
        let handle = self
            .replay
            .take()
            .ok_or_else(|| ConversationError::Backend("session was never started".into()))?;
        let result = handle
            .join()
            .unwrap_or_else(|_| Err(ConversationError::Backend("replay thread panicked".into())));
        self.audio.stop();
        result
    }
}

fn replay(steps: &[ScriptStep], callbacks: &Callbacks) -> ReplayResult {
    for step in steps {
        if step.delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(step.delay_ms));
        }
        if let Some(event) = step.action.event() {
            callbacks.dispatch(event);
            continue;
        }
        match &step.action {
            StepAction::End { conversation_id } => {
                return Ok(conversation_id.clone().unwrap_or_else(generate_conversation_id));
            }
            StepAction::Fail { kind, message } => {
                return Err(kind.into_error(message.clone()));
            }
            _ => {}
        }
    }
    Err(ConversationError::Backend("script ended without an end step".into()))
}

fn generate_conversation_id() -> String {
    let mut rng = rand::rng();
    let n: u64 = rng.random_range(0..u64::MAX);
    format!("conv_{n:016x}")
}
