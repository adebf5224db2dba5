//! Session state machine: browse / add / edit over a store-backed snapshot.
//!
//! Every action runs to completion against the store and the bridge before
//! [`Session::handle`] returns. Mutations reload the whole snapshot from the
//! store and re-run the filter, so the view can never drift from the store.

use crate::git::ConfigBridge;
use crate::model::types::{Identity, Scope, validate_pair};
use crate::search::FuzzyIndex;
use crate::storage::{IdentityStore, StoreError};
use crate::ui::data::{FormBuffers, FormField, Mode};
use crate::ui::shortcuts;
use tracing::{debug, warn};

pub const STATUS_READY: &str = "↑/↓ select, g=global, l=local, a=add, ?=help";
pub const STATUS_FILTERING: &str = "type to filter, enter to apply, esc to clear";
pub const STATUS_FILTER_APPLIED: &str = "filter applied";
pub const STATUS_FILTER_CLEARED: &str = "filter cleared";
pub const STATUS_ADDING: &str = "add user: enter to next/save, esc to cancel";
pub const STATUS_EDITING: &str = "edit user: enter cycles fields, esc cancels";
pub const STATUS_DELETED: &str = "deleted";
pub const STATUS_SAVED: &str = "saved";
pub const STATUS_CANCELLED: &str = "cancelled";
pub const ERROR_LOCAL_OUTSIDE_REPO: &str = "not inside a git repo (local set aborted)";

/// One user intent, already decoded from a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    StartFilter,
    FilterInput(char),
    FilterBackspace,
    CommitFilter,
    ClearFilter,
    MoveUp,
    MoveDown,
    MoveFirst,
    MoveLast,
    Add,
    Edit,
    Delete,
    Apply(Scope),
    Help,
    FormInput(char),
    FormBackspace,
    NextField,
    PrevField,
    /// Enter in a form: advance from name, submit from email.
    Confirm,
    Cancel,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything the view reads. Owned by the event loop.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    mode: Mode,
    index: FuzzyIndex,
    selection: Option<usize>,
    status: String,
    error: Option<String>,
}

impl SessionState {
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Full store-ordered snapshot.
    pub fn all_identities(&self) -> &[Identity] {
        self.index.corpus()
    }

    pub fn visible(&self) -> impl ExactSizeIterator<Item = &Identity> + '_ {
        self.index.visible()
    }

    pub fn visible_len(&self) -> usize {
        self.index.visible_len()
    }

    pub fn filter_query(&self) -> &str {
        self.index.query()
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn selected(&self) -> Option<&Identity> {
        self.selection.and_then(|pos| self.index.visible_at(pos))
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Clamp `preferred` into the view, or `None` when the view is empty.
    fn settle_selection(&mut self, preferred: Option<usize>) {
        let len = self.index.visible_len();
        self.selection = (len > 0).then(|| preferred.unwrap_or(0).min(len - 1));
    }
}

/// The interactive session: state plus the two ports it drives.
pub struct Session<S, B> {
    store: S,
    bridge: B,
    state: SessionState,
}

impl<S: IdentityStore, B: ConfigBridge> Session<S, B> {
    /// Load the snapshot and start in browse mode.
    pub fn new(store: S, bridge: B) -> Result<Self, StoreError> {
        let identities = store.list()?;
        let mut state = SessionState {
            index: FuzzyIndex::new(identities),
            status: STATUS_READY.to_string(),
            ..SessionState::default()
        };
        state.settle_selection(None);
        Ok(Self {
            store,
            bridge,
            state,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply one action. Any action not meaningful in the current mode is a
    /// no-op (apart from clearing the previous error).
    pub fn handle(&mut self, action: Action) -> Flow {
        if action == Action::Quit {
            return Flow::Quit;
        }
        self.state.error = None;
        if self.state.mode.is_browse() {
            self.handle_browse(action);
        } else {
            self.handle_form(action);
        }
        Flow::Continue
    }

    fn handle_browse(&mut self, action: Action) {
        let filtering = self.state.mode.is_filtering();
        match action {
            Action::StartFilter => {
                self.state.mode = Mode::Browse { filtering: true };
                self.state.status = STATUS_FILTERING.to_string();
            }
            Action::FilterInput(c) if filtering => {
                let mut query = self.state.index.query().to_string();
                query.push(c);
                self.refilter(&query);
            }
            Action::FilterBackspace if filtering => {
                let mut query = self.state.index.query().to_string();
                if query.pop().is_some() {
                    self.refilter(&query);
                }
            }
            Action::CommitFilter if filtering => {
                self.state.mode = Mode::Browse { filtering: false };
                self.state.status = STATUS_FILTER_APPLIED.to_string();
            }
            Action::ClearFilter => {
                let keep = self.state.selected().map(|i| i.id);
                self.state.index.apply("");
                let pos = keep.and_then(|id| self.state.index.position_of(id));
                self.state.settle_selection(pos);
                self.state.mode = Mode::Browse { filtering: false };
                self.state.status = STATUS_FILTER_CLEARED.to_string();
            }
            Action::MoveUp => {
                if let Some(pos) = self.state.selection {
                    self.state.selection = Some(pos.saturating_sub(1));
                }
            }
            Action::MoveDown => {
                if let Some(pos) = self.state.selection {
                    self.state.settle_selection(Some(pos + 1));
                }
            }
            Action::MoveFirst => self.state.settle_selection(Some(0)),
            Action::MoveLast => self.state.settle_selection(Some(usize::MAX)),
            Action::Add => {
                self.state.mode = Mode::AddForm {
                    form: FormBuffers::default(),
                };
                self.state.status = STATUS_ADDING.to_string();
            }
            Action::Edit => {
                if let Some(selected) = self.state.selected() {
                    let target = selected.id;
                    let form = FormBuffers::prefilled(selected);
                    self.state.mode = Mode::EditForm { form, target };
                    self.state.status = STATUS_EDITING.to_string();
                }
            }
            Action::Delete => self.delete_selected(),
            Action::Apply(scope) => self.apply_selected(scope),
            Action::Help => self.state.status = shortcuts::help_status(),
            _ => {}
        }
    }

    fn handle_form(&mut self, action: Action) {
        let Some(form) = self.state.mode.form_mut() else {
            return;
        };
        match action {
            Action::FormInput(c) => form.active_mut().push(c),
            Action::FormBackspace => {
                form.active_mut().pop();
            }
            Action::NextField | Action::PrevField => form.focus = form.focus.other(),
            Action::Confirm => {
                if form.focus == FormField::Name {
                    form.focus = FormField::Email;
                } else {
                    self.submit_form();
                }
            }
            Action::Cancel => {
                self.state.mode = Mode::Browse { filtering: false };
                self.state.status = STATUS_CANCELLED.to_string();
            }
            _ => {}
        }
    }

    fn refilter(&mut self, query: &str) {
        self.state.index.apply(query);
        self.state.settle_selection(None);
    }

    /// Replace the snapshot with the store's current contents.
    fn reload(&mut self) -> Result<(), StoreError> {
        let identities = self.store.list()?;
        self.state.index.set_source(identities);
        Ok(())
    }

    fn report(&mut self, what: &str, err: impl std::fmt::Display) {
        warn!(action = what, error = %err, "action failed");
        self.state.error = Some(err.to_string());
    }

    fn delete_selected(&mut self) {
        let Some((pos, id)) = self
            .state
            .selection
            .zip(self.state.selected().map(|i| i.id))
        else {
            return;
        };
        if let Err(err) = self.store.delete(id) {
            self.report("delete", err);
            return;
        }
        if let Err(err) = self.reload() {
            self.report("reload", err);
            return;
        }
        self.state.settle_selection(Some(pos));
        self.state.status = STATUS_DELETED.to_string();
    }

    fn apply_selected(&mut self, scope: Scope) {
        let Some(selected) = self.state.selected().cloned() else {
            return;
        };
        if scope == Scope::Local && !self.bridge.is_inside_tracked_workspace() {
            self.state.error = Some(ERROR_LOCAL_OUTSIDE_REPO.to_string());
            return;
        }
        match self
            .bridge
            .write_author(scope, &selected.name, &selected.email)
        {
            Ok(()) => {
                self.state.status = format!("set {scope}: {} <{}>", selected.name, selected.email);
            }
            Err(err) => self.report("apply", err),
        }
    }

    fn submit_form(&mut self) {
        let Some(form) = self.state.mode.form() else {
            return;
        };
        let (name, email) = match validate_pair(&form.name, &form.email) {
            Ok(pair) => pair,
            Err(err) => {
                debug!(error = %err, "form rejected");
                self.state.error = Some(err.to_string());
                return;
            }
        };

        let written = match self.state.mode.editing_target() {
            None => self.store.insert(&name, &email),
            Some(target) => self.store.replace(target, &name, &email),
        };
        if let Err(err) = written {
            self.report("save", err);
            return;
        }

        let previous = self.state.selection;
        if let Err(err) = self.reload() {
            // The write landed, so the form still closes.
            self.state.mode = Mode::Browse { filtering: false };
            self.state.settle_selection(previous);
            self.report("reload", err);
            return;
        }
        let pos = self
            .state
            .index
            .position_of_pair(&name, &email)
            .or(previous);
        self.state.settle_selection(pos);
        self.state.mode = Mode::Browse { filtering: false };
        self.state.status = STATUS_SAVED.to_string();
    }
}
