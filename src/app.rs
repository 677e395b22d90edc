use crate::commands::Action;
use crate::config::Config;
use crate::event::{Event, EventHandler, RemoteEvent};
use crate::mirror::{DataSource, MirrorStorage, NoopMirror, SqliteMirror};
use crate::remote::{NetworkFailure, PendingId, User, UserClient, UserId};
use crate::store::{self, UserStore};
use crate::ui;
use crate::ui::components::{
  CommandEvent, CommandInput, KeyResult, SearchEvent, SearchInput, Toast, UserFormEvent,
};
use crate::workflow::{Rejected, RequestTag, Submission, Workflow};
use color_eyre::{Report, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::collections::HashSet;
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Main application state
pub struct App {
  /// Application configuration
  config: Config,

  /// Remote users collection
  client: UserClient,

  /// Record set and its mirror
  store: UserStore,

  /// Where the records on screen came from
  source: DataSource,

  /// Create/edit form state
  workflow: Workflow,

  /// Name filter (after pressing /)
  search: SearchInput,

  /// Command palette (after pressing :)
  command: CommandInput,

  /// Selected row in the filtered list
  selected: usize,

  /// Whether a list call is in flight
  loading: bool,

  /// Ids with a delete request in flight
  deleting: HashSet<UserId>,

  /// Whether any record set has been shown this session
  loaded: bool,

  /// Current notice, if any
  toast: Option<Toast>,

  /// Event sender for async tasks
  event_tx: mpsc::UnboundedSender<Event>,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(config: Config) -> Result<Self> {
    let client = UserClient::new(&config)?;
    let mirror: Box<dyn MirrorStorage> = if config.mirror.enabled {
      Box::new(SqliteMirror::open(
        config.mirror.path.as_deref(),
        &config.mirror.slot,
      )?)
    } else {
      Box::new(NoopMirror)
    };

    // Replaced by the event handler's sender in run()
    let (tx, _rx) = mpsc::unbounded_channel();

    Ok(Self::from_parts(config, client, mirror, tx))
  }

  pub fn from_parts(
    config: Config,
    client: UserClient,
    mirror: Box<dyn MirrorStorage>,
    event_tx: mpsc::UnboundedSender<Event>,
  ) -> Self {
    Self {
      config,
      client,
      store: UserStore::new(mirror),
      source: DataSource::Empty,
      workflow: Workflow::default(),
      search: SearchInput::new(),
      command: CommandInput::new(),
      selected: 0,
      loading: false,
      deleting: HashSet::new(),
      loaded: false,
      toast: None,
      event_tx,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut events = EventHandler::new(Duration::from_millis(250));
    self.event_tx = events.sender();

    let result = self.event_loop(&mut terminal, &mut events).await;

    // Cleanup terminal, even if the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(
    &mut self,
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    events: &mut EventHandler,
  ) -> Result<()> {
    // Initial data load
    self.reload();

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }

    Ok(())
  }

  pub fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {
        if self.toast.as_ref().is_some_and(|t| t.is_expired(Instant::now())) {
          self.toast = None;
        }
      }
      Event::Remote(remote) => self.handle_remote_event(remote),
    }
  }

  // ==========================================================================
  // Keys
  // ==========================================================================

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    if !self.workflow.is_idle() {
      self.handle_form_key(key);
      return;
    }

    let handled = self
      .handle_overlays(key)
      .or_else(|| self.handle_navigation(key))
      .or_else(|| self.handle_actions(key));
    if handled.is_none() {
      tracing::trace!(?key, "unhandled key");
    }
  }

  fn handle_form_key(&mut self, key: KeyEvent) {
    // Submitting holds no editable form
    let Some(form) = self.workflow.form_mut() else {
      return;
    };

    match form.handle_key(key) {
      KeyResult::Event(UserFormEvent::Submit) => self.submit_form(),
      KeyResult::Event(UserFormEvent::Cancel) => {
        if let Err(e) = self.workflow.cancel() {
          tracing::trace!(?e, "form cancel rejected");
        }
      }
      KeyResult::Handled | KeyResult::NotHandled => {}
    }
  }

  fn handle_overlays(&mut self, key: KeyEvent) -> Option<()> {
    // An open search owns every key, ':' included
    if self.search.is_active() {
      return self.handle_search_key(key);
    }

    match self.command.handle_key(key) {
      KeyResult::Handled => return Some(()),
      KeyResult::Event(CommandEvent::Run(action)) => {
        self.run_action(action);
        return Some(());
      }
      KeyResult::Event(CommandEvent::Unknown(input)) => {
        self.toast = Some(Toast::error(format!("Unknown command: {}", input)));
        return Some(());
      }
      KeyResult::Event(CommandEvent::Cancelled) => return Some(()),
      KeyResult::NotHandled => {}
    }

    self.handle_search_key(key)
  }

  fn handle_search_key(&mut self, key: KeyEvent) -> Option<()> {
    match self.search.handle_key(key) {
      KeyResult::Event(SearchEvent::Changed(_)) => {
        self.selected = 0;
        Some(())
      }
      KeyResult::Event(SearchEvent::Submitted) | KeyResult::Handled => Some(()),
      KeyResult::NotHandled => None,
    }
  }

  fn handle_navigation(&mut self, key: KeyEvent) -> Option<()> {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
      KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
      KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
      KeyCode::End | KeyCode::Char('G') => {
        self.selected = self.visible_users().len().saturating_sub(1)
      }
      _ => return None,
    }
    Some(())
  }

  fn handle_actions(&mut self, key: KeyEvent) -> Option<()> {
    let action = match key.code {
      KeyCode::Char('a') => Action::Add,
      KeyCode::Char('e') | KeyCode::Enter => Action::Edit,
      KeyCode::Char('d') => Action::Delete,
      KeyCode::Char('r') => Action::Reload,
      KeyCode::Char('q') => Action::Quit,
      _ => return None,
    };
    self.run_action(action);
    Some(())
  }

  fn move_selection(&mut self, delta: i32) {
    let len = self.visible_users().len();
    if len > 0 {
      self.selected = (self.selected as i32 + delta).rem_euclid(len as i32) as usize;
    }
  }

  fn run_action(&mut self, action: Action) {
    match action {
      Action::Add => {
        if let Err(e) = self.workflow.open_create() {
          tracing::trace!(?e, "add form not opened");
        }
      }
      Action::Edit => {
        if let Some(user) = self.selected_user().cloned() {
          if let Err(e) = self.workflow.open_edit(&user) {
            tracing::trace!(?e, "edit form not opened");
          }
        }
      }
      Action::Delete => {
        if let Some(user) = self.selected_user().cloned() {
          self.delete(user.id);
        }
      }
      Action::Reload => self.reload(),
      Action::Quit => self.should_quit = true,
    }
  }

  // ==========================================================================
  // Remote calls
  // ==========================================================================

  /// List the whole collection
  pub fn reload(&mut self) {
    if self.loading {
      return;
    }
    self.loading = true;

    let client = self.client.clone();
    let tx = self.event_tx.clone();
    tokio::spawn(async move {
      let result = client.list_all().await;
      let _ = tx.send(Event::Remote(RemoteEvent::Listed(result)));
    });
  }

  fn submit_form(&mut self) {
    match self.workflow.submit() {
      Ok(submission) => self.send_submission(submission),
      Err(Rejected::MissingFields(fields)) => {
        if let Some(form) = self.workflow.form_mut() {
          form.set_error(format!("Required: {}", fields.join(", ")));
        }
      }
      Err(Rejected::Busy) => {}
    }
  }

  fn send_submission(&self, submission: Submission) {
    let client = self.client.clone();
    let tx = self.event_tx.clone();

    match submission {
      Submission::Create { pending, draft } => {
        tracing::debug!(%pending, "submitting new user");
        tokio::spawn(async move {
          let result = client.create(&draft).await;
          let _ = tx.send(Event::Remote(RemoteEvent::Created { pending, result }));
        });
      }
      Submission::Update { id, draft } => {
        tracing::debug!(%id, "submitting user update");
        tokio::spawn(async move {
          let result = client.update(&id, &draft).await;
          let _ = tx.send(Event::Remote(RemoteEvent::Updated { id, result }));
        });
      }
    }
  }

  fn delete(&mut self, id: UserId) {
    if !self.deleting.insert(id.clone()) {
      return;
    }

    let client = self.client.clone();
    let tx = self.event_tx.clone();
    tokio::spawn(async move {
      let result = client.delete(&id).await;
      let _ = tx.send(Event::Remote(RemoteEvent::Deleted { id, result }));
    });
  }

  // ==========================================================================
  // Remote results: mutate, persist, then notify
  // ==========================================================================

  fn handle_remote_event(&mut self, event: RemoteEvent) {
    match event {
      RemoteEvent::Listed(result) => self.on_listed(result),
      RemoteEvent::Created { pending, result } => self.on_created(pending, result),
      RemoteEvent::Updated { id, result } => self.on_updated(id, result),
      RemoteEvent::Deleted { id, result } => self.on_deleted(id, result),
    }
    self.clamp_selection();
  }

  fn on_listed(&mut self, result: Result<Vec<User>, NetworkFailure>) {
    self.loading = false;

    match result {
      Ok(users) => {
        tracing::info!(count = users.len(), "loaded users");
        let saved = self.store.replace_all(users);
        self.source = DataSource::Network;
        self.loaded = true;
        if let Err(e) = saved {
          self.report_storage(e);
        }
      }
      Err(e) => {
        tracing::warn!("failed to fetch users: {}", e);
        if !self.loaded && self.config.mirror.startup_fallback {
          self.fall_back_to_mirror();
        } else {
          self.toast = Some(Toast::error("Failed to fetch users from API."));
        }
      }
    }
  }

  fn fall_back_to_mirror(&mut self) {
    match self.store.restore_from_mirror() {
      Ok(Some(snapshot)) => {
        tracing::info!(count = snapshot.users.len(), saved_at = %snapshot.saved_at, "serving mirror snapshot");
        self.source = DataSource::Offline {
          saved_at: snapshot.saved_at,
        };
        self.loaded = true;
        self.toast = Some(Toast::error(format!(
          "Failed to fetch users from API. Showing copy saved {}.",
          snapshot.saved_at.format("%Y-%m-%d %H:%M UTC")
        )));
      }
      Ok(None) => {
        self.toast = Some(Toast::error("Failed to fetch users from API."));
      }
      Err(e) => {
        tracing::error!("failed to read mirror: {:#}", e);
        self.toast = Some(Toast::error("Failed to fetch users from API."));
      }
    }
  }

  fn on_created(&mut self, pending: PendingId, result: Result<User, NetworkFailure>) {
    let tag = RequestTag::Create(pending);

    match result {
      Ok(user) => {
        tracing::info!(id = %user.id, %pending, "user created");
        let id = user.id.clone();
        let saved = self.store.apply_created(user);
        self.workflow.succeed(&tag);
        self.loaded = true;
        match saved {
          Ok(true) => self.toast = Some(Toast::success("User added successfully!")),
          Ok(false) => {
            self.toast = Some(Toast::error(format!(
              "Server returned existing id {}; that user was replaced.",
              id
            )))
          }
          Err(e) => self.report_storage(e),
        }
      }
      Err(e) => {
        tracing::warn!(%pending, "failed to add user: {}", e);
        self.workflow.fail(&tag);
        self.toast = Some(Toast::error("Failed to add user."));
      }
    }
  }

  fn on_updated(&mut self, id: UserId, result: Result<User, NetworkFailure>) {
    let tag = RequestTag::Update(id.clone());

    match result {
      Ok(user) => {
        tracing::info!(%id, "user updated");
        let saved = self.store.apply_updated(&id, user);
        self.workflow.succeed(&tag);
        match saved {
          Ok(true) => self.toast = Some(Toast::success("User updated successfully!")),
          Ok(false) => {
            tracing::warn!(%id, "updated user is no longer in the list");
            self.toast = Some(Toast::error(format!(
              "User {} was updated but is no longer in the list.",
              id
            )));
          }
          Err(e) => self.report_storage(e),
        }
      }
      Err(e) => {
        tracing::warn!(%id, "failed to update user: {}", e);
        self.workflow.fail(&tag);
        self.toast = Some(Toast::error("Failed to update user."));
      }
    }
  }

  fn on_deleted(&mut self, id: UserId, result: Result<(), NetworkFailure>) {
    self.deleting.remove(&id);

    match result {
      Ok(()) => {
        tracing::info!(%id, "user deleted");
        let saved = self.store.apply_deleted(&id);
        self.toast = Some(Toast::success("User deleted successfully!"));
        if let Err(e) = saved {
          self.report_storage(e);
        }
      }
      Err(e) => {
        tracing::warn!(%id, "failed to delete user: {}", e);
        self.toast = Some(Toast::error("Failed to delete user."));
      }
    }
  }

  /// A failed mirror write leaves memory as is; it only replaces the notice.
  fn report_storage(&mut self, e: Report) {
    tracing::error!("failed to write mirror: {:#}", e);
    self.toast = Some(Toast::error(format!("Failed to save local copy: {}", e)));
  }

  fn clamp_selection(&mut self) {
    let len = self.visible_users().len();
    if self.selected >= len {
      self.selected = len.saturating_sub(1);
    }
  }

  // ==========================================================================
  // Accessors for UI rendering
  // ==========================================================================

  /// Records matching the search term, in set order
  pub fn visible_users(&self) -> Vec<&User> {
    store::filter(self.store.users(), self.search.term())
  }

  pub fn selected_user(&self) -> Option<&User> {
    self.visible_users().get(self.selected).copied()
  }

  pub fn selected(&self) -> usize {
    self.selected
  }

  pub fn total_users(&self) -> usize {
    self.store.users().len()
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  pub fn is_deleting(&self, id: &UserId) -> bool {
    self.deleting.contains(id)
  }

  pub fn source(&self) -> DataSource {
    self.source
  }

  pub fn workflow(&self) -> &Workflow {
    &self.workflow
  }

  pub fn search(&self) -> &SearchInput {
    &self.search
  }

  pub fn command(&self) -> &CommandInput {
    &self.command
  }

  pub fn toast(&self) -> Option<&Toast> {
    self.toast.as_ref()
  }

  pub fn title(&self) -> &str {
    self.config.title()
  }

  pub fn endpoint(&self) -> &str {
    self.client.collection_url().as_str()
  }
}
