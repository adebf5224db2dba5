use git_user::git::{BridgeError, ConfigBridge};
use git_user::model::types::{Author, Scope};
use git_user::storage::{IdentityStore, SqliteStore};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Captures tracing output for tests.
#[allow(dead_code)]
pub struct TestTracing {
    buffer: std::sync::Arc<std::sync::Mutex<Vec<u8>>>,
}

#[allow(dead_code)]
impl TestTracing {
    pub fn new() -> Self {
        Self {
            buffer: std::sync::Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.buffer.clone();
        let make_writer = move || TestWriter(writer.clone());
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(make_writer)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn output(&self) -> String {
        let buf = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Assert that the captured log output contains the provided substring.
    pub fn assert_contains(&self, needle: &str) {
        let out = self.output();
        assert!(
            out.contains(needle),
            "expected logs to contain `{needle}`, got:\n{out}"
        );
    }
}

struct TestWriter(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut guard = self.0.lock().unwrap();
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[allow(dead_code)]
pub struct EnvGuard {
    key: String,
    prev: Option<String>,
}

#[allow(dead_code)]
impl EnvGuard {
    pub fn set(key: &str, val: impl AsRef<std::ffi::OsStr>) -> Self {
        let prev = std::env::var(key).ok();
        unsafe { std::env::set_var(key, val.as_ref()) };
        Self {
            key: key.to_string(),
            prev,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.prev {
            Some(v) => unsafe { std::env::set_var(&self.key, v) },
            None => unsafe { std::env::remove_var(&self.key) },
        }
    }
}

/// RAII guard for changing the current working directory.
#[allow(dead_code)]
pub struct CwdGuard {
    prev: PathBuf,
}

#[allow(dead_code)]
impl CwdGuard {
    pub fn change_to(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let prev = std::env::current_dir()?;
        std::env::set_current_dir(path.as_ref())?;
        Ok(Self { prev })
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.prev);
    }
}

/// In-memory stand-in for git's author config.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeBridge {
    pub inside: bool,
    pub authors: HashMap<Scope, Author>,
    pub fail_write: Option<String>,
    pub writes: RefCell<Vec<(Scope, String, String)>>,
}

#[allow(dead_code)]
impl FakeBridge {
    pub fn inside_repo() -> Self {
        Self {
            inside: true,
            ..Self::default()
        }
    }

    pub fn with_author(mut self, scope: Scope, name: &str, email: &str) -> Self {
        self.authors.insert(scope, Author::new(name, email));
        self
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }
}

impl ConfigBridge for FakeBridge {
    fn is_inside_tracked_workspace(&self) -> bool {
        self.inside
    }

    fn read_author(&self, scope: Scope) -> Result<Author, BridgeError> {
        if scope == Scope::Local && !self.inside {
            return Err(BridgeError::NotTrackedWorkspace);
        }
        self.authors
            .get(&scope)
            .cloned()
            .ok_or(BridgeError::NotConfigured(scope))
    }

    fn write_author(&self, scope: Scope, name: &str, email: &str) -> Result<(), BridgeError> {
        if let Some(detail) = &self.fail_write {
            return Err(BridgeError::ExternalTool(detail.clone()));
        }
        self.writes
            .borrow_mut()
            .push((scope, name.to_string(), email.to_string()));
        Ok(())
    }
}

#[allow(dead_code)]
pub fn memory_store(pairs: &[(&str, &str)]) -> SqliteStore {
    let store = SqliteStore::open_in_memory(Duration::from_secs(2)).expect("in-memory store");
    for (name, email) in pairs {
        store.insert(name, email).expect("seed insert");
    }
    store
}

/// True when a `git` binary can be spawned.
#[allow(dead_code)]
pub fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}
