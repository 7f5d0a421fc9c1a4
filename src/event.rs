use serde::{Deserialize, Serialize};

use crate::conversation::ConversationEvent;
use crate::session::state::SessionOutcome;

/// Unified application event consumed by the UI loop.
///
/// Everything produced off the UI thread (session callbacks, launcher and
/// runner reports) reaches the screen through this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    /// A notification from the running conversation.
    Conversation(ConversationEvent),
    /// A transient status message.
    Notice(Notice),
    /// The session runner has returned the lifecycle to idle.
    SessionEnded(SessionOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }
}

impl From<Notice> for AppEvent {
    fn from(notice: Notice) -> Self {
        AppEvent::Notice(notice)
    }
}
