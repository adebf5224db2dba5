//! Seed the store from whatever author git already has configured.

use crate::git::{BridgeError, ConfigBridge};
use crate::model::types::{Scope, validate_pair};
use crate::storage::IdentityStore;
use tracing::{debug, info, warn};

/// What a hydration pass found and stored.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HydrationReport {
    /// Scopes whose author was read, well-formed, and is now in the store.
    pub found: Vec<Scope>,
    /// Rows newly written (duplicates are not counted).
    pub inserted: usize,
}

/// Import the global author, then the local one when inside a work tree.
///
/// Unset or malformed configuration is expected and skipped. A store error
/// on one scope is logged and does not stop the other.
pub fn hydrate_from_git(store: &impl IdentityStore, bridge: &impl ConfigBridge) -> HydrationReport {
    let mut report = HydrationReport::default();

    let mut scopes = vec![Scope::Global];
    if bridge.is_inside_tracked_workspace() {
        scopes.push(Scope::Local);
    }

    for scope in scopes {
        let author = match bridge.read_author(scope) {
            Ok(author) => author,
            Err(BridgeError::NotConfigured(_)) | Err(BridgeError::NotTrackedWorkspace) => {
                debug!(%scope, "no author configured");
                continue;
            }
            Err(err) => {
                debug!(%scope, error = %err, "reading author failed");
                continue;
            }
        };
        let (name, email) = match validate_pair(&author.name, &author.email) {
            Ok(pair) => pair,
            Err(err) => {
                debug!(%scope, error = %err, "ignoring malformed author");
                continue;
            }
        };
        match store.insert(&name, &email) {
            Ok(inserted) => {
                report.found.push(scope);
                if inserted.is_some() {
                    report.inserted += 1;
                }
            }
            Err(err) => warn!(%scope, error = %err, "storing configured author failed"),
        }
    }

    info!(found = ?report.found, inserted = report.inserted, "hydration finished");
    report
}
