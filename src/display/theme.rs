//! Terminal display styles.
//!
//! All styles use only named ANSI colors so that colors adapt to the user's
//! terminal theme. Use `Attribute::Dim` / `Attribute::Bold` for emphasis
//! rather than bright color variants.

use crossterm::style::{Attribute, Color, ContentStyle};

use crate::event::NoticeLevel;

pub fn dim() -> ContentStyle {
    ContentStyle {
        attributes: Attribute::Dim.into(),
        ..Default::default()
    }
}

pub fn title() -> ContentStyle {
    ContentStyle {
        attributes: Attribute::Bold.into(),
        ..Default::default()
    }
}

pub fn user_label() -> ContentStyle {
    ContentStyle {
        foreground_color: Some(Color::Cyan),
        attributes: Attribute::Bold.into(),
        ..Default::default()
    }
}

pub fn agent_label() -> ContentStyle {
    ContentStyle {
        foreground_color: Some(Color::Magenta),
        attributes: Attribute::Bold.into(),
        ..Default::default()
    }
}

pub fn meta_label() -> ContentStyle {
    ContentStyle {
        foreground_color: Some(Color::Yellow),
        attributes: Attribute::Dim.into(),
        ..Default::default()
    }
}

pub fn notice(level: NoticeLevel) -> ContentStyle {
    let color = match level {
        NoticeLevel::Info => Color::Blue,
        NoticeLevel::Warning => Color::Yellow,
        NoticeLevel::Error => Color::Red,
        NoticeLevel::Success => Color::Green,
    };
    ContentStyle {
        foreground_color: Some(color),
        ..Default::default()
    }
}

pub fn status(active: bool) -> ContentStyle {
    ContentStyle {
        foreground_color: Some(if active { Color::Blue } else { Color::Green }),
        attributes: Attribute::Bold.into(),
        ..Default::default()
    }
}
