//! Create/edit workflow as an explicit state machine.
//!
//! ```text
//! Idle --add/edit--> FormOpen --submit--> Submitting --ok--> Idle
//!   ^                  |  ^                    |
//!   +------cancel------+  +-------failed-------+
//! ```

use crate::remote::{PendingId, User, UserDraft, UserId};
use crate::ui::components::UserForm;

/// What the form will do on submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
  Create,
  Edit(UserId),
}

impl FormMode {
  pub fn title(&self) -> &'static str {
    match self {
      FormMode::Create => "Add User",
      FormMode::Edit(_) => "Edit User",
    }
  }

  pub fn submit_label(&self) -> &'static str {
    match self {
      FormMode::Create => "Add",
      FormMode::Edit(_) => "Update",
    }
  }
}

/// Identifies the request a `Submitting` state waits for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestTag {
  Create(PendingId),
  Update(UserId),
}

/// A request the app must send after a successful submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
  Create {
    pending: PendingId,
    draft: UserDraft,
  },
  Update {
    id: UserId,
    draft: UserDraft,
  },
}

/// Reasons a transition was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejected {
  /// Transition not valid from the current state
  Busy,
  /// Required fields are empty
  MissingFields(Vec<&'static str>),
}

/// Form workflow state. `Submitting` always carries the form it submitted,
/// so a failed request can reopen it intact.
#[derive(Debug, Clone, Default)]
pub enum Workflow {
  #[default]
  Idle,
  FormOpen {
    mode: FormMode,
    form: UserForm,
  },
  Submitting {
    mode: FormMode,
    form: UserForm,
    request: RequestTag,
  },
}

impl Workflow {
  pub fn is_idle(&self) -> bool {
    matches!(self, Workflow::Idle)
  }

  pub fn is_submitting(&self) -> bool {
    matches!(self, Workflow::Submitting { .. })
  }

  /// Idle -> FormOpen(Create) with a blank draft
  pub fn open_create(&mut self) -> Result<(), Rejected> {
    if !self.is_idle() {
      return Err(Rejected::Busy);
    }
    *self = Workflow::FormOpen {
      mode: FormMode::Create,
      form: UserForm::new(),
    };
    Ok(())
  }

  /// Idle -> FormOpen(Edit) pre-filled with `user`
  pub fn open_edit(&mut self, user: &User) -> Result<(), Rejected> {
    if !self.is_idle() {
      return Err(Rejected::Busy);
    }
    *self = Workflow::FormOpen {
      mode: FormMode::Edit(user.id.clone()),
      form: UserForm::from_draft(&user.draft()),
    };
    Ok(())
  }

  /// FormOpen -> Idle. Refused while submitting.
  pub fn cancel(&mut self) -> Result<(), Rejected> {
    match self {
      Workflow::FormOpen { .. } => {
        *self = Workflow::Idle;
        Ok(())
      }
      Workflow::Idle => Ok(()),
      Workflow::Submitting { .. } => Err(Rejected::Busy),
    }
  }

  /// FormOpen -> Submitting, returning the request to send.
  pub fn submit(&mut self) -> Result<Submission, Rejected> {
    let Workflow::FormOpen { mode, form } = self else {
      return Err(Rejected::Busy);
    };

    let draft = form.draft();
    let missing = draft.missing_fields();
    if !missing.is_empty() {
      return Err(Rejected::MissingFields(missing));
    }

    let (request, submission) = match mode {
      FormMode::Create => {
        let pending = PendingId::new();
        (
          RequestTag::Create(pending),
          Submission::Create { pending, draft },
        )
      }
      FormMode::Edit(id) => (
        RequestTag::Update(id.clone()),
        Submission::Update {
          id: id.clone(),
          draft,
        },
      ),
    };

    let Workflow::FormOpen { mode, form } = std::mem::take(self) else {
      unreachable!("checked above");
    };
    *self = Workflow::Submitting {
      mode,
      form,
      request,
    };
    Ok(submission)
  }

  /// Submitting -> Idle when `tag` is the request in flight.
  /// Returns false for results of any other request.
  pub fn succeed(&mut self, tag: &RequestTag) -> bool {
    if !self.awaits(tag) {
      return false;
    }
    *self = Workflow::Idle;
    true
  }

  /// Submitting -> FormOpen with the draft intact when `tag` is the request
  /// in flight. Returns false for results of any other request.
  pub fn fail(&mut self, tag: &RequestTag) -> bool {
    if !self.awaits(tag) {
      return false;
    }
    let Workflow::Submitting { mode, form, .. } = std::mem::take(self) else {
      unreachable!("checked by awaits");
    };
    *self = Workflow::FormOpen { mode, form };
    true
  }

  fn awaits(&self, tag: &RequestTag) -> bool {
    matches!(self, Workflow::Submitting { request, .. } if request == tag)
  }

  /// The open form, for key handling. None unless FormOpen.
  pub fn form_mut(&mut self) -> Option<&mut UserForm> {
    match self {
      Workflow::FormOpen { form, .. } => Some(form),
      _ => None,
    }
  }

  /// Mode and form for rendering, with whether a request is in flight.
  pub fn overlay(&self) -> Option<(&FormMode, &UserForm, bool)> {
    match self {
      Workflow::Idle => None,
      Workflow::FormOpen { mode, form } => Some((mode, form, false)),
      Workflow::Submitting { mode, form, .. } => Some((mode, form, true)),
    }
  }
}
