use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of handling a key event in an input component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
  /// Key was handled, continue input mode
  Consumed,
  /// Enter pressed, here's the submitted value
  Submitted(String),
  /// Escape pressed, input cancelled
  Cancelled,
  /// Key not handled, pass to next handler
  NotHandled,
}

/// Reusable single-line text input.
///
/// `cursor` is a byte offset that always sits on a char boundary.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
  buffer: String,
  cursor: usize,
}

impl TextInput {
  pub fn new() -> Self {
    Self::default()
  }

  /// Create an input pre-filled with `value`, cursor at the end
  pub fn with_value(value: &str) -> Self {
    Self {
      buffer: value.to_string(),
      cursor: value.len(),
    }
  }

  /// Get the current input value
  pub fn value(&self) -> &str {
    &self.buffer
  }

  /// Clear the input
  pub fn clear(&mut self) {
    self.buffer.clear();
    self.cursor = 0;
  }

  fn prev_boundary(&self) -> usize {
    self.buffer[..self.cursor]
      .char_indices()
      .next_back()
      .map(|(i, _)| i)
      .unwrap_or(0)
  }

  fn next_boundary(&self) -> usize {
    self.buffer[self.cursor..]
      .chars()
      .next()
      .map(|c| self.cursor + c.len_utf8())
      .unwrap_or(self.cursor)
  }

  /// Handle a key event, returning the result
  pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
    match key.code {
      KeyCode::Esc => InputResult::Cancelled,
      KeyCode::Enter => InputResult::Submitted(self.buffer.clone()),
      KeyCode::Backspace => {
        if self.cursor > 0 {
          let start = self.prev_boundary();
          self.buffer.replace_range(start..self.cursor, "");
          self.cursor = start;
        }
        InputResult::Consumed
      }
      KeyCode::Delete => {
        if self.cursor < self.buffer.len() {
          let end = self.next_boundary();
          self.buffer.replace_range(self.cursor..end, "");
        }
        InputResult::Consumed
      }
      KeyCode::Left => {
        self.cursor = self.prev_boundary();
        InputResult::Consumed
      }
      KeyCode::Right => {
        self.cursor = self.next_boundary();
        InputResult::Consumed
      }
      KeyCode::Home => {
        self.cursor = 0;
        InputResult::Consumed
      }
      KeyCode::End => {
        self.cursor = self.buffer.len();
        InputResult::Consumed
      }
      KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.cursor = 0;
        InputResult::Consumed
      }
      KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.cursor = self.buffer.len();
        InputResult::Consumed
      }
      KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        // Clear line before cursor
        self.buffer.replace_range(..self.cursor, "");
        self.cursor = 0;
        InputResult::Consumed
      }
      KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        // Delete word before cursor
        let before = self.buffer[..self.cursor].trim_end();
        let start = before.rfind(' ').map(|i| i + 1).unwrap_or(0);
        self.buffer.replace_range(start..self.cursor, "");
        self.cursor = start;
        InputResult::Consumed
      }
      KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => InputResult::NotHandled,
      KeyCode::Char(c) => {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        InputResult::Consumed
      }
      _ => InputResult::NotHandled,
    }
  }

  /// Text before and after the cursor, for rendering
  pub fn split_at_cursor(&self) -> (&str, &str) {
    self.buffer.split_at(self.cursor)
  }
}
