//! Environment loading and the headless run loop.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use skiff_config::PreferencesStore;
use skiff_events::EventBus;
use skiff_telemetry::{GlobalContextGuard, LogFormat, LoggingConfig};
use skiff_torrent_core::memory::{MemoryEngine, TorrentSeed};
use skiff_torrent_core::{TorrentService, TorrentSnapshot};
use skiff_ui::torrents::TorrentListViewModel;
use skiff_ui::{DisposeBag, SectionModel};
use tokio::sync::watch;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::headless::{DismissingDialogs, LoggingNavigator};

/// Preference document location; preferences stay in memory when unset.
pub const PREFERENCES_ENV: &str = "SKIFF_PREFERENCES";
/// Log output format, `json` or `pretty`.
pub const LOG_FORMAT_ENV: &str = "SKIFF_LOG_FORMAT";
/// JSON array of torrent seeds loaded into the in-memory engine.
pub const SEED_ENV: &str = "SKIFF_SEED";

/// Settings the binary reads from its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Preference document path.
    pub preferences_path: Option<PathBuf>,
    /// Log output format.
    pub log_format: LogFormat,
    /// Seed fixture path.
    pub seed_path: Option<PathBuf>,
}

impl AppConfig {
    /// Read the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup. Blank values count as unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Self {
            preferences_path: read(PREFERENCES_ENV).map(PathBuf::from),
            log_format: read(LOG_FORMAT_ENV)
                .map_or_else(LogFormat::infer, |value| LogFormat::parse(&value)),
            seed_path: read(SEED_ENV).map(PathBuf::from),
        }
    }
}

/// Read a seed fixture.
///
/// # Errors
///
/// Returns an error when the file cannot be read or is not a JSON array of seeds.
pub async fn load_seeds(path: &Path) -> AppResult<Vec<TorrentSeed>> {
    let body = tokio::fs::read(path).await.map_err(|source| AppError::Io {
        operation: "seed.read",
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&body).map_err(|source| AppError::Fixture {
        path: path.to_path_buf(),
        source,
    })
}

/// Running headless wiring: engine, preferences, and the torrent list.
pub struct Session {
    engine: Arc<MemoryEngine>,
    preferences: PreferencesStore,
    list: TorrentListViewModel,
    reporter: DisposeBag,
}

impl Session {
    /// Load preferences and seeds, then start the list and its section reporter.
    ///
    /// # Errors
    ///
    /// Returns an error when the preference document or the seed fixture is invalid.
    pub async fn start(config: &AppConfig) -> AppResult<Self> {
        let preferences = match &config.preferences_path {
            Some(path) => PreferencesStore::load(path.clone())
                .map_err(|err| AppError::config("preferences.load", err))?,
            None => PreferencesStore::default(),
        };

        let engine = Arc::new(MemoryEngine::new(EventBus::new()));
        if let Some(path) = &config.seed_path {
            let seeds = load_seeds(path).await?;
            info!(count = seeds.len(), path = %path.display(), "seeding engine");
            for seed in seeds {
                engine.insert(seed);
            }
        }

        let list = TorrentListViewModel::new(
            Arc::clone(&engine) as Arc<dyn TorrentService>,
            &preferences,
            Arc::new(LoggingNavigator),
            Arc::new(DismissingDialogs),
        );
        let mut reporter = DisposeBag::new();
        reporter.spawn(report_sections(list.sections()));

        Ok(Self {
            engine,
            preferences,
            list,
            reporter,
        })
    }

    /// Engine backing the session.
    #[must_use]
    pub const fn engine(&self) -> &Arc<MemoryEngine> {
        &self.engine
    }

    /// Preference store backing the session.
    #[must_use]
    pub const fn preferences(&self) -> &PreferencesStore {
        &self.preferences
    }

    /// Torrent list view-model.
    #[must_use]
    pub const fn list(&self) -> &TorrentListViewModel {
        &self.list
    }

    /// Stop reporting and persist preferences when a document path is configured.
    ///
    /// # Errors
    ///
    /// Returns an error when the preference document cannot be written.
    pub fn shutdown(self) -> AppResult<()> {
        drop(self.reporter);
        self.preferences
            .save()
            .map_err(|err| AppError::config("preferences.save", err))
    }
}

/// Entry point for the Skiff boot sequence.
///
/// # Errors
///
/// Returns an error if telemetry, preferences, or seeding fail, or if Ctrl-C cannot be
/// awaited.
pub async fn run_app() -> AppResult<()> {
    run_app_with(AppConfig::from_env()).await
}

/// Boot sequence over an explicit config.
///
/// # Errors
///
/// See [`run_app`].
pub async fn run_app_with(config: AppConfig) -> AppResult<()> {
    let logging = LoggingConfig {
        format: config.log_format,
        ..LoggingConfig::default()
    };
    skiff_telemetry::init_logging(&logging)
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let _context = GlobalContextGuard::new("headless");

    info!("Skiff headless bootstrap starting");
    let session = Session::start(&config).await?;
    info!(title = session.list().title(), "torrent list ready; press Ctrl-C to exit");

    tokio::signal::ctrl_c()
        .await
        .map_err(|source| AppError::Signal { source })?;
    info!("shutdown requested");
    session.shutdown()
}

async fn report_sections(sections: watch::Receiver<Vec<SectionModel<TorrentSnapshot>>>) {
    let mut updates = WatchStream::new(sections);
    while let Some(sections) = updates.next().await {
        log_sections(&sections);
    }
}

fn log_sections(sections: &[SectionModel<TorrentSnapshot>]) {
    for section in sections {
        info!(
            section = %section.id,
            header = section.header.as_deref().unwrap_or_default(),
            rows = section.rows.len(),
            "section published"
        );
        for row in &section.rows {
            info!(
                info_hash = %row.info_hash,
                name = %row.name,
                state = %row.state,
                progress = row.progress,
                "torrent row"
            );
        }
    }
}
