use crate::remote::{User, UserId};
use crate::ui::renderfns::truncate;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

const NAME_WIDTH: usize = 24;
const USERNAME_WIDTH: usize = 16;
const EMAIL_WIDTH: usize = 32;

/// What the list title and empty state report
pub struct ListStatus<'a> {
  pub loading: bool,
  pub total: usize,
  pub filter: &'a str,
}

/// Draw the filtered users as a selectable list
pub fn draw_user_list(
  frame: &mut Frame,
  area: Rect,
  users: &[&User],
  selected: usize,
  status: ListStatus,
  is_deleting: impl Fn(&UserId) -> bool,
) {
  let title = if status.loading {
    " Users (loading...) ".to_string()
  } else if status.filter.is_empty() {
    format!(" Users ({}) ", status.total)
  } else {
    format!(" Users ({}/{}) ", users.len(), status.total)
  };

  let block = Block::default()
    .title(title)
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if users.is_empty() {
    let content = if status.loading {
      "Loading users..."
    } else if status.total > 0 {
      "No users match the search."
    } else {
      "No users. Press 'a' to add one or 'r' to reload."
    };
    let paragraph = Paragraph::new(content)
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = users
    .iter()
    .map(|user| {
      let deleting = is_deleting(&user.id);
      let text_style = if deleting {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
      } else {
        Style::default()
      };

      let line = Line::from(vec![
        Span::styled(
          format!("{:<width$}", truncate(&user.name, NAME_WIDTH), width = NAME_WIDTH),
          text_style.fg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(
          format!(
            "{:<width$}",
            truncate(&user.username, USERNAME_WIDTH),
            width = USERNAME_WIDTH
          ),
          text_style.fg(Color::Yellow),
        ),
        Span::raw(" "),
        Span::styled(truncate(&user.email, EMAIL_WIDTH), text_style),
      ]);
      ListItem::new(line)
    })
    .collect();

  let list = List::new(items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut state = ListState::default();
  state.select(Some(selected.min(users.len() - 1)));

  frame.render_stateful_widget(list, area, &mut state);
}
