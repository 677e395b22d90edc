use crate::mirror::DataSource;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the footer bar with data source, counts and the active filter
pub fn draw_footer(
  frame: &mut Frame,
  area: Rect,
  source: DataSource,
  shown: usize,
  total: usize,
  filter: &str,
) {
  let mut spans = vec![Span::raw(" ")];

  let (label, style) = source_label(source);
  spans.push(Span::styled(label, style));
  spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));

  let count = if filter.is_empty() {
    format!("{} users", total)
  } else {
    format!("{}/{} users", shown, total)
  };
  spans.push(Span::styled(count, Style::default().fg(Color::White)));

  if !filter.is_empty() {
    spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
    spans.push(Span::styled(
      format!("/{}", filter),
      Style::default().fg(Color::Cyan),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}

fn source_label(source: DataSource) -> (String, Style) {
  match source {
    DataSource::Empty => ("not loaded".to_string(), Style::default().fg(Color::DarkGray)),
    DataSource::Network => ("live".to_string(), Style::default().fg(Color::Green).bold()),
    DataSource::Offline { saved_at } => (
      format!("offline (saved {})", saved_at.format("%Y-%m-%d %H:%M")),
      Style::default().fg(Color::Yellow).bold(),
    ),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{TimeZone, Utc};

  #[test]
  fn test_source_label_offline_shows_time() {
    let saved_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
    let (label, _) = source_label(DataSource::Offline { saved_at });
    assert_eq!(label, "offline (saved 2024-03-01 09:30)");
  }

  #[test]
  fn test_source_label_live() {
    assert_eq!(source_label(DataSource::Network).0, "live");
  }
}
