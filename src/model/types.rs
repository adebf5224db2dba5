//! Normalized entity structs.

use std::fmt;

/// Surrogate key assigned by the store. Stable until the row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityId(pub i64);

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A saved git author: name + email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: IdentityId,
    pub name: String,
    pub email: String,
}

impl Identity {
    /// Text the fuzzy filter matches against: `name <email>`.
    pub fn search_text(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// Whether this identity is the same (name, email) pair, after trimming.
    pub fn same_pair(&self, name: &str, email: &str) -> bool {
        self.name == name.trim() && self.email == email.trim()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Author configuration as read back from git (no id yet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl Author {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Which git configuration file an author is read from or written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Local,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Global => "global",
            Scope::Local => "local",
        }
    }

    /// The `git config` flag selecting this scope's file.
    pub fn git_flag(self) -> &'static str {
        match self {
            Scope::Global => "--global",
            Scope::Local => "--local",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Malformed name/email input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid name/email: name is empty")]
    EmptyName,
    #[error("invalid name/email: email is empty")]
    EmptyEmail,
    #[error("invalid name/email: email must contain '@'")]
    MissingAt,
}

/// Trim both fields and apply the minimal shape check used everywhere an
/// identity enters the store from user input or git.
pub fn validate_pair(name: &str, email: &str) -> Result<(String, String), ValidationError> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if email.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    if !email.contains('@') {
        return Err(ValidationError::MissingAt);
    }
    Ok((name.to_string(), email.to_string()))
}
