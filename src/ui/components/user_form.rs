use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::remote::UserDraft;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

const LABELS: [&str; 3] = ["Name", "Username", "Email"];

/// Events emitted by the user form that the parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFormEvent {
  /// Enter pressed on any field
  Submit,
  /// Escape pressed
  Cancel,
}

/// Three-field form editing a `UserDraft`
#[derive(Debug, Clone, Default)]
pub struct UserForm {
  fields: [TextInput; 3],
  focus: usize,
  error: Option<String>,
}

impl UserForm {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_draft(draft: &UserDraft) -> Self {
    Self {
      fields: [
        TextInput::with_value(&draft.name),
        TextInput::with_value(&draft.username),
        TextInput::with_value(&draft.email),
      ],
      focus: 0,
      error: None,
    }
  }

  /// Current values as a draft
  pub fn draft(&self) -> UserDraft {
    UserDraft {
      name: self.fields[0].value().to_string(),
      username: self.fields[1].value().to_string(),
      email: self.fields[2].value().to_string(),
    }
  }

  #[cfg(test)]
  pub fn focus(&self) -> usize {
    self.focus
  }

  /// Show a validation message under the fields until the next edit
  pub fn set_error(&mut self, message: impl Into<String>) {
    self.error = Some(message.into());
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<UserFormEvent> {
    match key.code {
      KeyCode::Tab | KeyCode::Down => {
        self.focus = (self.focus + 1) % self.fields.len();
        return KeyResult::Handled;
      }
      KeyCode::BackTab | KeyCode::Up => {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        return KeyResult::Handled;
      }
      _ => {}
    }

    match self.fields[self.focus].handle_key(key) {
      InputResult::Submitted(_) => KeyResult::Event(UserFormEvent::Submit),
      InputResult::Cancelled => KeyResult::Event(UserFormEvent::Cancel),
      InputResult::Consumed => {
        self.error = None;
        KeyResult::Handled
      }
      InputResult::NotHandled => KeyResult::NotHandled,
    }
  }

  /// Render the form as a centered overlay
  pub fn render_overlay(
    &self,
    frame: &mut Frame,
    area: Rect,
    title: &str,
    submit_label: &str,
    submitting: bool,
  ) {
    let width = (area.width * 60 / 100).clamp(30, 70).min(area.width);
    let height = 8u16.min(area.height);

    // Center the overlay
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(format!(" {} ", title));

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let mut lines: Vec<Line> = self
      .fields
      .iter()
      .zip(LABELS)
      .enumerate()
      .map(|(i, (field, label))| {
        let focused = i == self.focus && !submitting;
        let label_style = if focused {
          Style::default().fg(Color::Cyan).bold()
        } else {
          Style::default().fg(Color::DarkGray)
        };
        let (before, after) = field.split_at_cursor();

        let mut spans = vec![Span::styled(format!("{:<10}", label), label_style)];
        if focused {
          spans.push(Span::raw(before.to_string()));
          spans.push(Span::styled("_", Style::default().fg(Color::Yellow))); // Cursor
          spans.push(Span::raw(after.to_string()));
        } else {
          spans.push(Span::raw(field.value().to_string()));
        }
        Line::from(spans)
      })
      .collect();

    lines.push(Line::raw(""));

    let footer = if submitting {
      Line::styled("Saving...", Style::default().fg(Color::Yellow))
    } else if let Some(error) = &self.error {
      Line::styled(error.clone(), Style::default().fg(Color::Red))
    } else {
      Line::from(vec![
        Span::styled("<enter>", Style::default().fg(Color::Cyan)),
        Span::styled(
          format!(" {}  ", submit_label),
          Style::default().fg(Color::DarkGray),
        ),
        Span::styled("<tab>", Style::default().fg(Color::Cyan)),
        Span::styled(" next  ", Style::default().fg(Color::DarkGray)),
        Span::styled("<esc>", Style::default().fg(Color::Cyan)),
        Span::styled(" cancel", Style::default().fg(Color::DarkGray)),
      ])
    };
    lines.push(footer);

    frame.render_widget(Paragraph::new(lines), inner);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_tab_cycles_focus() {
    let mut form = UserForm::new();
    form.handle_key(key(KeyCode::Tab));
    form.handle_key(key(KeyCode::Tab));
    assert_eq!(form.focus(), 2);
    form.handle_key(key(KeyCode::Tab));
    assert_eq!(form.focus(), 0);
    form.handle_key(key(KeyCode::BackTab));
    assert_eq!(form.focus(), 2);
  }

  #[test]
  fn test_typing_goes_to_focused_field() {
    let mut form = UserForm::new();
    form.handle_key(key(KeyCode::Down));
    form.handle_key(key(KeyCode::Char('b')));
    assert_eq!(form.draft().username, "b");
    assert_eq!(form.draft().name, "");
  }

  #[test]
  fn test_enter_and_esc_emit_events() {
    let mut form = UserForm::new();
    assert_eq!(
      form.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(UserFormEvent::Submit)
    );
    assert_eq!(
      form.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(UserFormEvent::Cancel)
    );
  }

  #[test]
  fn test_from_draft_round_trips() {
    let draft = UserDraft {
      name: "Ann".to_string(),
      username: "ann".to_string(),
      email: "ann@x.io".to_string(),
    };
    assert_eq!(UserForm::from_draft(&draft).draft(), draft);
  }

  #[test]
  fn test_edit_clears_error() {
    let mut form = UserForm::new();
    form.set_error("Required: name");
    form.handle_key(key(KeyCode::Char('A')));
    assert!(form.error().is_none());
  }
}
