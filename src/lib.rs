use std::io::Write;

use display::renderer::Renderer;
use event::AppEvent;
use session::state::Lifecycle;

pub mod app;
pub mod config;
pub mod conversation;
pub mod display;
pub mod event;
pub mod io;
pub mod logging;
pub mod session;

/// Render an app event produced off the UI thread.
pub fn handle_app_event<W: Write>(
    event: &AppEvent,
    renderer: &mut Renderer<W>,
    lifecycle: &Lifecycle,
) {
    match event {
        AppEvent::Conversation(conversation_event) => {
            renderer.render_conversation_event(conversation_event);
        }
        AppEvent::Notice(notice) => renderer.render_notice(notice),
        // The next session may already be starting by the time this arrives.
        AppEvent::SessionEnded(_) => renderer.render_status(lifecycle.is_active()),
    }
}
