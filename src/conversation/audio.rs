use super::ConversationError;

/// Microphone capture and speaker playback handed to a session.
///
/// The session owns the interface and brackets a conversation with
/// `start`/`stop`.
pub trait AudioInterface: Send {
    fn start(&mut self) -> Result<(), ConversationError>;
    fn stop(&mut self);
}

/// Audio interface that captures and plays nothing.
///
/// Used with replayed conversations, where transcripts arrive from the script
/// rather than a microphone.
#[derive(Debug, Default)]
pub struct SilentAudio {
    active: bool,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl AudioInterface for SilentAudio {
    fn start(&mut self) -> Result<(), ConversationError> {
        self.active = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.active = false;
    }
}
