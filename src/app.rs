use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::Event;
use crossterm::terminal;
use tokio::sync::mpsc;

use crate::config::{Config, PageConfig};
use crate::conversation::{AudioInterface, ConversationClient, ConversationError};
use crate::display::input::{self, InputAction};
use crate::display::renderer::Renderer;
use crate::event::AppEvent;
use crate::handle_app_event;
use crate::io::{Io, IoEvent};
use crate::session::launcher::Launcher;
use crate::session::state::Lifecycle;

/// Enables terminal raw mode for its lifetime (live terminals only).
pub struct RawModeGuard {
    enabled: bool,
}

impl RawModeGuard {
    pub fn acquire(live: bool) -> Result<Self> {
        if live {
            terminal::enable_raw_mode()?;
        }
        Ok(Self { enabled: live })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.enabled {
            terminal::disable_raw_mode().ok();
        }
    }
}

/// The voice assistant screen: page header, conversation lines, status.
pub struct App<W: Write> {
    page: PageConfig,
    launcher: Launcher,
    renderer: Renderer<W>,
}

impl<W: Write> App<W> {
    /// `events` must be the sending half of the channel the [`Io`] passed to
    /// [`App::run`] reads from.
    pub fn new(
        config: &Config,
        client: Arc<dyn ConversationClient>,
        events: mpsc::UnboundedSender<AppEvent>,
        writer: W,
    ) -> Self {
        Self {
            page: config.page.clone(),
            launcher: Launcher::new(config, client, Lifecycle::new(), events),
            renderer: Renderer::with_writer(writer),
        }
    }

    pub fn with_audio<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn AudioInterface>, ConversationError> + Send + Sync + 'static,
    {
        self.launcher = self.launcher.with_audio(factory);
        self
    }

    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        Arc::clone(self.launcher.lifecycle())
    }

    /// Run until the user quits or the terminal closes. Returns the plain
    /// text of everything shown.
    ///
    /// A session still running at quit is left to die with the process.
    pub async fn run(mut self, io: &mut Io, live: bool) -> Result<Vec<String>> {
        let _raw = RawModeGuard::acquire(live)?;
        self.renderer.render_page(&self.page);
        self.renderer.render_help();
        self.renderer.render_status(false);

        loop {
            match io.next_event().await {
                IoEvent::App(event) => {
                    handle_app_event(&event, &mut self.renderer, self.launcher.lifecycle());
                }
                IoEvent::Terminal(Event::Key(key)) => match input::handle_key(&key) {
                    InputAction::Start => {
                        self.launcher.start();
                    }
                    InputAction::Quit => break,
                    InputAction::None => {}
                },
                IoEvent::Terminal(_) => {}
                IoEvent::Tick => {
                    let active = self.launcher.lifecycle().is_active();
                    self.renderer.render_status(active);
                }
                IoEvent::Closed => break,
            }
        }

        for event in io.drain_app_events() {
            handle_app_event(&event, &mut self.renderer, self.launcher.lifecycle());
        }
        Ok(self.renderer.into_lines())
    }
}
