pub mod config;
pub mod git;
pub mod hydrate;
pub mod logging;
pub mod model;
pub mod search;
pub mod storage;
pub mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use config::Config;
use git::GitCli;
use storage::SqliteStore;
use ui::session::Session;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("VERGEN_BUILD_TIMESTAMP"),
    ")"
);

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "git-user",
    version,
    long_version = LONG_VERSION,
    about = "Pick, save and apply git author identities from a terminal UI"
)]
pub struct Cli {
    /// Create the store, import the configured git author(s) and exit
    #[arg(long, default_value_t = false)]
    pub init: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().context("loading configuration")?;

    let data_dir = default_data_dir();
    let log = logging::init(&data_dir, &config.log_level, cli.init)?;
    info!(log = %log.path().display(), db = %config.db_path.display(), "starting");

    let store = SqliteStore::open(&config.db_path, config.timeout())
        .with_context(|| format!("opening identity store {}", config.db_path.display()))?;
    let bridge = GitCli::new(&config.git_binary, config.timeout());

    if cli.init {
        let report = hydrate::hydrate_from_git(&store, &bridge);
        let stored = store.count().context("counting stored identities")?;
        println!("{stored} identities stored ({} imported)", report.inserted);
        return Ok(());
    }

    if config.hydrate_on_start {
        hydrate::hydrate_from_git(&store, &bridge);
    }
    let mut session = Session::new(&store, &bridge).context("loading saved identities")?;
    ui::tui::run_tui(&mut session, config.theme.palette())
}

pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "git-user", "git-user").map_or_else(
        || PathBuf::from(".git-user"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}
