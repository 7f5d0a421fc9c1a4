use std::sync::Arc;

use tokio::sync::mpsc;

use super::runner;
use super::state::Lifecycle;
use crate::config::Config;
use crate::conversation::{
    AudioInterface, Callbacks, Conversation, ConversationClient, ConversationError,
    SessionOptions, SilentAudio,
};
use crate::event::{AppEvent, Notice};

pub const INITIALIZING: &str = "Initializing the voice assistant...";
pub const ALREADY_RUNNING: &str = "Conversation is already running. Please wait until it ends.";

/// Opens the audio interface for a new session. An unavailable device is a
/// construction error.
pub type AudioFactory =
    Box<dyn Fn() -> Result<Box<dyn AudioInterface>, ConversationError> + Send + Sync>;

fn silent_audio() -> Result<Box<dyn AudioInterface>, ConversationError> {
    Ok(Box::new(SilentAudio::new()))
}

/// What a call to [`Launcher::start`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchResult {
    /// A session was constructed and handed to a runner thread.
    Started,
    /// Another session is starting or running; nothing was constructed.
    AlreadyRunning,
    /// Construction failed; the lifecycle is back to Idle.
    Failed(ConversationError),
}

/// Constructs sessions on demand and hands them to a background runner.
pub struct Launcher {
    client: Arc<dyn ConversationClient>,
    agent_id: String,
    requires_auth: bool,
    audio: AudioFactory,
    lifecycle: Arc<Lifecycle>,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl Launcher {
    pub fn new(
        config: &Config,
        client: Arc<dyn ConversationClient>,
        lifecycle: Arc<Lifecycle>,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            client,
            agent_id: config.agent_id.clone(),
            requires_auth: config.requires_auth(),
            audio: Box::new(silent_audio),
            lifecycle,
            events,
        }
    }

    /// Replace the audio interface handed to each new session.
    pub fn with_audio<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn AudioInterface>, ConversationError> + Send + Sync + 'static,
    {
        self.audio = Box::new(factory);
        self
    }

    pub fn lifecycle(&self) -> &Arc<Lifecycle> {
        &self.lifecycle
    }

    fn notify(&self, notice: Notice) {
        let _ = self.events.send(notice.into());
    }

    fn construct(&self) -> Result<Box<dyn Conversation>, ConversationError> {
        let audio = (self.audio)()?;
        self.client.create_session(SessionOptions {
            agent_id: self.agent_id.clone(),
            requires_auth: self.requires_auth,
            audio,
            callbacks: Callbacks::forwarding(&self.events),
        })
    }

    /// Start a conversation unless one is already active.
    ///
    /// Never blocks on the conversation itself: construction happens here,
    /// everything after runs on the runner thread.
    pub fn start(&self) -> LaunchResult {
        let permit = match self.lifecycle.try_start() {
            Ok(permit) => permit,
            Err(active) => {
                tracing::info!(status = ?active.0, "start refused: session already active");
                self.notify(Notice::warning(ALREADY_RUNNING));
                return LaunchResult::AlreadyRunning;
            }
        };

        self.notify(Notice::info(INITIALIZING));
        let session = match self.construct() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "failed to construct conversation session");
                self.notify(Notice::error(format!(
                    "An error occurred while initializing the conversation: {e}"
                )));
                return LaunchResult::Failed(e);
            }
        };

        let guard = permit.promote();
        tracing::info!(agent_id = %self.agent_id, "conversation session started");

        let events = self.events.clone();
        let spawned = std::thread::Builder::new()
            .name("session-runner".into())
            .spawn(move || {
                runner::run(session, guard, &events);
            });
        if let Err(e) = spawned {
            // The closure (and the guard inside it) is dropped, returning the
            // lifecycle to Idle.
            tracing::error!(error = %e, "failed to spawn session runner");
            self.notify(Notice::error(format!(
                "An error occurred while initializing the conversation: {e}"
            )));
            return LaunchResult::Failed(ConversationError::Backend(e.to_string()));
        }
        LaunchResult::Started
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc as std_mpsc;

    use super::*;
    use crate::config;
    use crate::event::NoticeLevel;
    use crate::session::state::{SessionOutcome, SessionStatus};

    /// Session that blocks in `wait_for_session_end` until released.
    struct GatedConversation {
        release: std_mpsc::Receiver<Result<String, ConversationError>>,
    }

    impl Conversation for GatedConversation {
        fn start_session(&mut self) -> Result<(), ConversationError> {
            Ok(())
        }

        fn wait_for_session_end(&mut self) -> Result<String, ConversationError> {
            self.release
                .recv()
                .unwrap_or_else(|_| Err(ConversationError::Network("released".into())))
        }
    }

    #[derive(Default)]
    struct GatedClient {
        constructed: AtomicUsize,
        releases: Mutex<Vec<std_mpsc::Sender<Result<String, ConversationError>>>>,
        fail_with: Option<ConversationError>,
    }

    impl GatedClient {
        fn release(&self, result: Result<String, ConversationError>) {
            for tx in self.releases.lock().unwrap().drain(..) {
                tx.send(result.clone()).unwrap();
            }
        }
    }

    impl ConversationClient for GatedClient {
        fn create_session(
            &self,
            _options: SessionOptions,
        ) -> Result<Box<dyn Conversation>, ConversationError> {
            if let Some(e) = &self.fail_with {
                return Err(e.clone());
            }
            self.constructed.fetch_add(1, Ordering::SeqCst);
            let (tx, rx) = std_mpsc::channel();
            self.releases.lock().unwrap().push(tx);
            Ok(Box::new(GatedConversation { release: rx }))
        }
    }

    fn launcher(
        client: Arc<GatedClient>,
    ) -> (Launcher, mpsc::UnboundedReceiver<AppEvent>) {
        let config = config::parse("API_KEY: sk-test\nAGENT_ID: agent-1\n").unwrap();
        let (tx, rx) = mpsc::unbounded_channel();
        (Launcher::new(&config, client, Lifecycle::new(), tx), rx)
    }

    fn drain_until_ended(rx: &mut mpsc::UnboundedReceiver<AppEvent>) -> Vec<AppEvent> {
        let mut events = Vec::new();
        loop {
            let event = rx.blocking_recv().unwrap();
            let done = matches!(event, AppEvent::SessionEnded(_));
            events.push(event);
            if done {
                return events;
            }
        }
    }

    fn notices(events: &[AppEvent]) -> Vec<(NoticeLevel, String)> {
        events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Notice(n) => Some((n.level, n.text.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn start_while_running_only_warns() {
        let client = Arc::new(GatedClient::default());
        let (launcher, mut rx) = launcher(Arc::clone(&client));

        assert_eq!(launcher.start(), LaunchResult::Started);
        assert_eq!(launcher.lifecycle().status(), SessionStatus::Running);
        assert_eq!(launcher.start(), LaunchResult::AlreadyRunning);
        assert_eq!(launcher.start(), LaunchResult::AlreadyRunning);
        assert_eq!(client.constructed.load(Ordering::SeqCst), 1);
        assert_eq!(launcher.lifecycle().status(), SessionStatus::Running);

        client.release(Ok("abc123".into()));
        let events = drain_until_ended(&mut rx);
        let warnings = notices(&events)
            .into_iter()
            .filter(|(level, _)| *level == NoticeLevel::Warning)
            .count();
        assert_eq!(warnings, 2);
        assert_eq!(launcher.lifecycle().status(), SessionStatus::Idle);
    }

    #[test]
    fn success_reports_id_once_and_resets() {
        let client = Arc::new(GatedClient::default());
        let (launcher, mut rx) = launcher(Arc::clone(&client));

        assert_eq!(launcher.start(), LaunchResult::Started);
        client.release(Ok("abc123".into()));
        let events = drain_until_ended(&mut rx);

        let ended: Vec<_> = notices(&events)
            .into_iter()
            .filter(|(_, text)| text.contains("Conversation ID"))
            .collect();
        assert_eq!(
            ended,
            vec![(
                NoticeLevel::Success,
                "Conversation ended. Conversation ID: abc123".to_string()
            )]
        );
        assert_eq!(launcher.lifecycle().status(), SessionStatus::Idle);
        assert_eq!(
            launcher.lifecycle().last_outcome(),
            Some(SessionOutcome::Ended {
                conversation_id: "abc123".into()
            })
        );
    }

    #[test]
    fn runtime_failure_reports_error_once_and_resets() {
        let client = Arc::new(GatedClient::default());
        let (launcher, mut rx) = launcher(Arc::clone(&client));

        assert_eq!(launcher.start(), LaunchResult::Started);
        client.release(Err(ConversationError::Network("connection reset".into())));
        let events = drain_until_ended(&mut rx);

        let notices = notices(&events);
        let errors: Vec<_> = notices
            .iter()
            .filter(|(level, _)| *level == NoticeLevel::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].1,
            "An error occurred during the conversation: network error: connection reset"
        );
        assert!(!notices.iter().any(|(_, text)| text.contains("Conversation ID")));
        assert_eq!(launcher.lifecycle().status(), SessionStatus::Idle);

        // A new session can be launched afterwards.
        assert_eq!(launcher.start(), LaunchResult::Started);
        client.release(Ok("next".into()));
        drain_until_ended(&mut rx);
    }

    #[test]
    fn construction_failure_stays_idle() {
        let client = Arc::new(GatedClient {
            fail_with: Some(ConversationError::Auth("invalid API key".into())),
            ..Default::default()
        });
        let (launcher, mut rx) = launcher(client);

        assert_eq!(
            launcher.start(),
            LaunchResult::Failed(ConversationError::Auth("invalid API key".into()))
        );
        assert_eq!(launcher.lifecycle().status(), SessionStatus::Idle);
        assert_eq!(launcher.lifecycle().sessions_started(), 0);

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(
            notices(&events),
            vec![
                (NoticeLevel::Info, INITIALIZING.to_string()),
                (
                    NoticeLevel::Error,
                    "An error occurred while initializing the conversation: \
                     authentication failed: invalid API key"
                        .to_string()
                ),
            ]
        );
    }

    #[test]
    fn unavailable_audio_is_a_construction_failure() {
        let client = Arc::new(GatedClient::default());
        let (launcher, mut rx) = launcher(Arc::clone(&client));
        let launcher = launcher
            .with_audio(|| Err(ConversationError::AudioDevice("no input device".into())));

        assert_eq!(
            launcher.start(),
            LaunchResult::Failed(ConversationError::AudioDevice("no input device".into()))
        );
        assert_eq!(client.constructed.load(Ordering::SeqCst), 0);
        assert_eq!(launcher.lifecycle().status(), SessionStatus::Idle);
        assert_eq!(launcher.lifecycle().sessions_started(), 0);

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(
            notices(&events).last(),
            Some(&(
                NoticeLevel::Error,
                "An error occurred while initializing the conversation: \
                 audio device unavailable: no input device"
                    .to_string()
            ))
        );
    }
}
