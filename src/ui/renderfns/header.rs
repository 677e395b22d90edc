use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar with logo, endpoint host, title and shortcuts
pub fn draw_header(frame: &mut Frame, area: Rect, endpoint: &str, title: &str) {
  let host = extract_host(endpoint);

  let header = Line::from(vec![
    Span::styled(" u9s ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", host), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", title), Style::default().fg(Color::Yellow).bold()),
    Span::raw("  "),
    // Keys highlighted, descriptions dimmed
    Span::styled("<a>", Style::default().fg(Color::Cyan)),
    Span::styled(" add", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("<e>", Style::default().fg(Color::Cyan)),
    Span::styled(" edit", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("<d>", Style::default().fg(Color::Cyan)),
    Span::styled(" delete", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("<r>", Style::default().fg(Color::Cyan)),
    Span::styled(" reload", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("</>", Style::default().fg(Color::Cyan)),
    Span::styled(" search", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("<:>", Style::default().fg(Color::Cyan)),
    Span::styled(" command", Style::default().fg(Color::DarkGray)),
    Span::raw("   "),
    Span::styled("<q>", Style::default().fg(Color::Cyan)),
    Span::styled(" quit", Style::default().fg(Color::DarkGray)),
  ]);

  let paragraph = Paragraph::new(header).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}

/// Host (and port) part of the collection URL
fn extract_host(url: &str) -> &str {
  url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url)
    .split('/')
    .next()
    .unwrap_or(url)
}
