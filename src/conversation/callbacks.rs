use tokio::sync::mpsc;

use super::ConversationEvent;
use crate::event::AppEvent;

type TextSink = Box<dyn Fn(String) + Send + Sync>;
type CorrectionSink = Box<dyn Fn(String, String) + Send + Sync>;
type LatencySink = Box<dyn Fn(u64) + Send + Sync>;

/// The four notification sinks a session invokes.
///
/// Sinks are called from the client's own threads and must return promptly.
pub struct Callbacks {
    pub agent_response: TextSink,
    pub agent_response_correction: CorrectionSink,
    pub user_transcript: TextSink,
    pub latency_measurement: LatencySink,
}

impl Callbacks {
    /// Callbacks that forward every notification to the UI as an [`AppEvent`].
    ///
    /// Sends never block; events are dropped once the UI has gone away.
    pub fn forwarding(tx: &mpsc::UnboundedSender<AppEvent>) -> Self {
        let send = |tx: mpsc::UnboundedSender<AppEvent>| {
            move |event: ConversationEvent| {
                let _ = tx.send(AppEvent::Conversation(event));
            }
        };

        let agent = send(tx.clone());
        let correction = send(tx.clone());
        let user = send(tx.clone());
        let latency = send(tx.clone());

        Self {
            agent_response: Box::new(move |text| agent(ConversationEvent::AgentResponse(text))),
            agent_response_correction: Box::new(move |original, corrected| {
                correction(ConversationEvent::AgentResponseCorrection {
                    original,
                    corrected,
                });
            }),
            user_transcript: Box::new(move |text| user(ConversationEvent::UserTranscript(text))),
            latency_measurement: Box::new(move |ms| {
                latency(ConversationEvent::LatencyMeasurement(ms));
            }),
        }
    }

    /// Route an event to its sink.
    pub fn dispatch(&self, event: ConversationEvent) {
        match event {
            ConversationEvent::AgentResponse(text) => (self.agent_response)(text),
            ConversationEvent::AgentResponseCorrection {
                original,
                corrected,
            } => (self.agent_response_correction)(original, corrected),
            ConversationEvent::UserTranscript(text) => (self.user_transcript)(text),
            ConversationEvent::LatencyMeasurement(ms) => (self.latency_measurement)(ms),
        }
    }
}
