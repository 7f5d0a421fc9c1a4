//! Contract with the conversational-AI client.
//!
//! A client constructs [`Conversation`] sessions bound to an agent, an audio
//! interface, and four event callbacks. Session calls are blocking: a live
//! conversation can hold `wait_for_session_end` for minutes, so callers run
//! sessions off the UI thread.

pub mod audio;
pub mod callbacks;
pub mod script;
pub mod scripted;

use serde::{Deserialize, Serialize};

pub use audio::{AudioInterface, SilentAudio};
pub use callbacks::Callbacks;

/// Failure reported by the conversation client or one of its sessions.
///
/// Variants are kept distinct so the user can tell a bad credential from a
/// dropped connection or a missing microphone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ConversationError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("audio device unavailable: {0}")]
    AudioDevice(String),
    #[error("{0}")]
    Backend(String),
}

/// One notification produced by a running session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConversationEvent {
    AgentResponse(String),
    AgentResponseCorrection { original: String, corrected: String },
    UserTranscript(String),
    /// Round-trip latency in milliseconds.
    LatencyMeasurement(u64),
}

/// Everything a client needs to construct a session.
pub struct SessionOptions {
    pub agent_id: String,
    pub requires_auth: bool,
    pub audio: Box<dyn AudioInterface>,
    pub callbacks: Callbacks,
}

/// Factory for conversation sessions.
pub trait ConversationClient: Send + Sync {
    /// Construct a session. Fails on bad credentials, an unknown agent, or an
    /// unusable audio interface; no connection is held on failure.
    fn create_session(
        &self,
        options: SessionOptions,
    ) -> Result<Box<dyn Conversation>, ConversationError>;
}

/// A single live conversation.
pub trait Conversation: Send {
    /// Open the connection and audio pipeline. Blocks until the session is live.
    fn start_session(&mut self) -> Result<(), ConversationError>;

    /// Block until the conversation ends, returning its conversation id.
    fn wait_for_session_end(&mut self) -> Result<String, ConversationError>;
}
