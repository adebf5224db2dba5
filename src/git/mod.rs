//! Bridge to git's author configuration.
//!
//! The session only ever talks to [`ConfigBridge`]; [`cli::GitCli`] is the
//! subprocess-backed implementation used by the binary.

pub mod cli;

use crate::model::types::{Author, Scope};
use std::time::Duration;
use thiserror::Error;

pub use cli::GitCli;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BridgeError {
    #[error("no {0} git user configured")]
    NotConfigured(Scope),
    #[error("not inside a git repo")]
    NotTrackedWorkspace,
    #[error("{0}")]
    ExternalTool(String),
    #[error("git timed out after {}ms", .after.as_millis())]
    Timeout { after: Duration },
}

/// Narrow synchronous port onto git's `user.name` / `user.email`.
pub trait ConfigBridge {
    /// True when the working directory is inside a git work tree.
    fn is_inside_tracked_workspace(&self) -> bool;

    /// Read the author for `scope`. `Local` requires a work tree; an unset
    /// name or email is [`BridgeError::NotConfigured`].
    fn read_author(&self, scope: Scope) -> Result<Author, BridgeError>;

    /// Set name then email for `scope`. The first failure is returned as is;
    /// a failed email write does not roll back the name.
    fn write_author(&self, scope: Scope, name: &str, email: &str) -> Result<(), BridgeError>;
}

impl<B: ConfigBridge + ?Sized> ConfigBridge for &B {
    fn is_inside_tracked_workspace(&self) -> bool {
        (**self).is_inside_tracked_workspace()
    }

    fn read_author(&self, scope: Scope) -> Result<Author, BridgeError> {
        (**self).read_author(scope)
    }

    fn write_author(&self, scope: Scope, name: &str, email: &str) -> Result<(), BridgeError> {
        (**self).write_author(scope, name, email)
    }
}
