use crate::model::types::{Identity, IdentityId};

/// Which form buffer receives typed characters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Name,
    Email,
}

impl FormField {
    pub fn other(self) -> Self {
        match self {
            FormField::Name => FormField::Email,
            FormField::Email => FormField::Name,
        }
    }
}

/// Name and email buffers for the add/edit forms.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormBuffers {
    pub name: String,
    pub email: String,
    pub focus: FormField,
}

impl FormBuffers {
    pub fn prefilled(identity: &Identity) -> Self {
        Self {
            name: identity.name.clone(),
            email: identity.email.clone(),
            focus: FormField::Name,
        }
    }

    pub fn active_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
        }
    }
}

/// Interaction mode. Form buffers only exist while a form is open, and the
/// edit target only while editing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    /// `filtering` is the query-typing sub-mode of browse.
    Browse { filtering: bool },
    AddForm { form: FormBuffers },
    EditForm { form: FormBuffers, target: IdentityId },
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Browse { filtering: false }
    }
}

impl Mode {
    pub fn is_browse(&self) -> bool {
        matches!(self, Mode::Browse { .. })
    }

    pub fn is_filtering(&self) -> bool {
        matches!(self, Mode::Browse { filtering: true })
    }

    pub fn form(&self) -> Option<&FormBuffers> {
        match self {
            Mode::Browse { .. } => None,
            Mode::AddForm { form } | Mode::EditForm { form, .. } => Some(form),
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut FormBuffers> {
        match self {
            Mode::Browse { .. } => None,
            Mode::AddForm { form } | Mode::EditForm { form, .. } => Some(form),
        }
    }

    pub fn editing_target(&self) -> Option<IdentityId> {
        match self {
            Mode::EditForm { target, .. } => Some(*target),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Mode::Browse { .. } => "Git Users",
            Mode::AddForm { .. } => "Add User",
            Mode::EditForm { .. } => "Edit User",
        }
    }
}
