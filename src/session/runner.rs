use tokio::sync::mpsc;

use super::state::{RunningGuard, SessionOutcome};
use crate::conversation::{Conversation, ConversationError};
use crate::event::{AppEvent, Notice};

/// Drive a session to completion on the current thread.
///
/// Blocks for the whole conversation. The outcome is reported exactly once,
/// then the guard returns the lifecycle to Idle whichever way the session
/// ended.
pub fn run(
    mut session: Box<dyn Conversation>,
    guard: RunningGuard,
    events: &mpsc::UnboundedSender<AppEvent>,
) -> SessionOutcome {
    let outcome = match drive(session.as_mut()) {
        Ok(conversation_id) => {
            tracing::info!(%conversation_id, "conversation ended");
            let _ = events.send(
                Notice::success(format!(
                    "Conversation ended. Conversation ID: {conversation_id}"
                ))
                .into(),
            );
            SessionOutcome::Ended { conversation_id }
        }
        Err(e) => {
            tracing::warn!(error = %e, "conversation failed");
            let _ = events.send(
                Notice::error(format!("An error occurred during the conversation: {e}")).into(),
            );
            SessionOutcome::Failed {
                error: e.to_string(),
            }
        }
    };

    guard.finish(outcome.clone());
    let _ = events.send(AppEvent::SessionEnded(outcome.clone()));
    outcome
}

fn drive(session: &mut dyn Conversation) -> Result<String, ConversationError> {
    session.start_session()?;
    session.wait_for_session_end()
}
