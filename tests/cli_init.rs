mod util;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;
use util::git_available;

/// Binary invocation with every config/data/git location inside `root`.
fn base_cmd(root: &TempDir) -> Command {
    let home = root.path().join("home");
    let work = root.path().join("work");
    std::fs::create_dir_all(&home).unwrap();
    std::fs::create_dir_all(&work).unwrap();

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("git-user"));
    cmd.current_dir(&work)
        .env_remove("RUST_LOG")
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("XDG_DATA_HOME", home.join(".local/share"))
        .env("GIT_USER_CONFIG", root.path().join("config.toml"))
        .env("GIT_USER_DB", root.path().join("users.sqlite3"))
        .env("GIT_CONFIG_GLOBAL", root.path().join("gitconfig"))
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_CEILING_DIRECTORIES", root.path());
    cmd
}

#[test]
fn version_reports_build_timestamp() {
    let root = TempDir::new().unwrap();
    base_cmd(&root)
        .arg("--version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")))
        .stdout(contains("built"));
}

#[test]
fn init_without_git_creates_an_empty_store() {
    let root = TempDir::new().unwrap();
    base_cmd(&root)
        .env("GIT_USER_GIT", root.path().join("no-such-git"))
        .arg("--init")
        .assert()
        .success()
        .stdout(contains("0 identities stored (0 imported)"));
    assert!(root.path().join("users.sqlite3").exists());
}

#[test]
fn init_imports_global_author_once() {
    if !git_available() {
        eprintln!("git not available; skipping");
        return;
    }
    let root = TempDir::new().unwrap();
    std::fs::write(
        root.path().join("gitconfig"),
        "[user]\n\tname = Alice Smith\n\temail = alice@example.com\n",
    )
    .unwrap();

    base_cmd(&root)
        .arg("--init")
        .assert()
        .success()
        .stdout(contains("1 identities stored (1 imported)"));

    base_cmd(&root)
        .arg("--init")
        .assert()
        .success()
        .stdout(contains("1 identities stored (0 imported)"));
}

#[test]
fn corrupt_store_is_fatal() {
    let root = TempDir::new().unwrap();
    std::fs::write(root.path().join("users.sqlite3"), vec![b'x'; 4096]).unwrap();

    base_cmd(&root)
        .env("GIT_USER_GIT", root.path().join("no-such-git"))
        .arg("--init")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("opening identity store"));
}

#[test]
fn malformed_config_is_fatal() {
    let root = TempDir::new().unwrap();
    std::fs::write(root.path().join("config.toml"), "timeout_ms = [").unwrap();

    base_cmd(&root)
        .arg("--init")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("loading configuration").and(contains("config.toml")));
}

#[test]
fn unknown_flag_is_rejected() {
    let root = TempDir::new().unwrap();
    base_cmd(&root)
        .arg("--bogus")
        .assert()
        .failure()
        .stderr(contains("--bogus"));
}
