pub mod components;
mod renderfns;
mod views;

use crate::app::App;
use ratatui::prelude::*;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // User list
      Constraint::Length(1), // Footer or notice
    ])
    .split(frame.area());

  renderfns::draw_header(frame, chunks[0], app.endpoint(), app.title());

  let users = app.visible_users();
  views::draw_user_list(
    frame,
    chunks[1],
    &users,
    app.selected(),
    views::ListStatus {
      loading: app.is_loading(),
      total: app.total_users(),
      filter: app.search().term(),
    },
    |id| app.is_deleting(id),
  );

  match app.toast() {
    Some(toast) => toast.render(frame, chunks[2]),
    None => renderfns::draw_footer(
      frame,
      chunks[2],
      app.source(),
      users.len(),
      app.total_users(),
      app.search().term(),
    ),
  }

  // Overlays, topmost last
  if let Some((mode, form, submitting)) = app.workflow().overlay() {
    form.render_overlay(
      frame,
      chunks[1],
      mode.title(),
      mode.submit_label(),
      submitting,
    );
  }
  if app.command().is_active() {
    app.command().render_overlay(frame, chunks[1]);
  }
  if app.search().is_active() {
    app.search().render_overlay(frame, chunks[1]);
  }
}
