use std::io::Write;

use crossterm::queue;
use crossterm::style::{ContentStyle, Print};

use super::theme;
use crate::config::PageConfig;
use crate::conversation::ConversationEvent;
use crate::event::Notice;

pub const STATUS_RUNNING: &str = "Voice assistant is running...";
pub const STATUS_IDLE: &str = "Voice assistant is not running.";

/// Produces colored terminal output and keeps a plain-text copy of every
/// line written.
pub struct Renderer<W: Write> {
    /// Plain-text lines in the order they were printed.
    lines: Vec<String>,
    /// Status last shown, so polling only prints changes.
    last_status: Option<bool>,
    out: W,
}

impl<W: Write> Renderer<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            lines: Vec::new(),
            last_status: None,
            out: writer,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    // --- Page ---

    pub fn render_page(&mut self, page: &PageConfig) {
        self.write_line(&[(theme::title(), page.title.as_str())]);
        if let Some(ref caption) = page.caption {
            self.write_line(&[(theme::dim(), format!("[image: {caption}]").as_str())]);
        }
        self.blank_line();
        self.write_line(&[(ContentStyle::default(), page.description.as_str())]);
        self.blank_line();
    }

    pub fn render_help(&mut self) {
        let help = "Enter start voice conversation · q quit";
        self.write_line(&[(theme::dim(), help)]);
    }

    // --- Conversation ---

    pub fn render_conversation_event(&mut self, event: &ConversationEvent) {
        match event {
            ConversationEvent::UserTranscript(text) => {
                self.write_line(&[
                    (theme::user_label(), "You: "),
                    (ContentStyle::default(), text.as_str()),
                ]);
            }
            ConversationEvent::AgentResponse(text) => {
                self.write_line(&[
                    (theme::agent_label(), "Agent: "),
                    (ContentStyle::default(), text.as_str()),
                ]);
            }
            ConversationEvent::AgentResponseCorrection {
                original,
                corrected,
            } => {
                self.write_line(&[
                    (theme::meta_label(), "Correction: "),
                    (theme::dim(), original.as_str()),
                    (ContentStyle::default(), format!(" → {corrected}").as_str()),
                ]);
            }
            ConversationEvent::LatencyMeasurement(ms) => {
                self.write_line(&[
                    (theme::meta_label(), "Latency: "),
                    (theme::dim(), format!("{ms}ms").as_str()),
                ]);
            }
        }
    }

    // --- Status ---

    pub fn render_notice(&mut self, notice: &Notice) {
        self.write_line(&[(theme::notice(notice.level), notice.text.as_str())]);
    }

    /// Show the running/not-running status if it differs from the last one shown.
    pub fn render_status(&mut self, active: bool) {
        if self.last_status == Some(active) {
            return;
        }
        self.last_status = Some(active);
        let text = if active { STATUS_RUNNING } else { STATUS_IDLE };
        self.write_line(&[(theme::status(active), text)]);
    }

    // --- Output ---

    fn write_line(&mut self, segments: &[(ContentStyle, &str)]) {
        let mut plain = String::new();
        for (style, text) in segments {
            queue!(self.out, Print(style.apply(*text))).ok();
            plain.push_str(text);
        }
        queue!(self.out, Print("\r\n")).ok();
        self.out.flush().ok();
        self.lines.push(plain);
    }

    fn blank_line(&mut self) {
        queue!(self.out, Print("\r\n")).ok();
        self.out.flush().ok();
        self.lines.push(String::new());
    }
}
