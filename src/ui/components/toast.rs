use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use std::time::{Duration, Instant};

/// How long a notice stays on screen
pub const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
  Success,
  Error,
}

/// A transient success/failure notice
#[derive(Debug, Clone)]
pub struct Toast {
  pub level: ToastLevel,
  pub message: String,
  shown_at: Instant,
}

impl Toast {
  pub fn success(message: impl Into<String>) -> Self {
    Self::new(ToastLevel::Success, message.into())
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self::new(ToastLevel::Error, message.into())
  }

  fn new(level: ToastLevel, message: String) -> Self {
    Self {
      level,
      message,
      shown_at: Instant::now(),
    }
  }

  pub fn is_expired(&self, now: Instant) -> bool {
    now.duration_since(self.shown_at) >= TOAST_TTL
  }

  pub fn render(&self, frame: &mut Frame, area: Rect) {
    let (marker, color) = match self.level {
      ToastLevel::Success => ("✓", Color::Green),
      ToastLevel::Error => ("✗", Color::Red),
    };

    let line = Line::from(vec![
      Span::styled(format!(" {} ", marker), Style::default().fg(color).bold()),
      Span::styled(self.message.as_str(), Style::default().fg(color)),
    ]);
    frame.render_widget(
      Paragraph::new(line).style(Style::default().bg(Color::Black)),
      area,
    );
  }
}
