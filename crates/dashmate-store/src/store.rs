//! Settings file load/save with migration and corruption recovery.
//!
//! The load path is: read `settings.json`, parse, run the document through
//! the migration engine, persist it back if the version advanced, return
//! the typed value. A file that cannot be parsed is copied into `backups/`
//! under a timestamped name and replaced with defaults; corrupt data never
//! reaches the migration engine and repair-in-place is never attempted.

use std::fs;
use std::io;

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use dashmate_settings::{
    MigrationEngine, MigrationError, MigrationOutcome, RegistryError, Settings, Version,
};

use crate::paths::AppPaths;
use crate::APP_VERSION;

/// Errors from the settings store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Settings file exists but could not be read.
    #[error("failed to read settings: {0}")]
    Read(#[source] io::Error),

    /// Settings file, backup, or data directory could not be written.
    #[error("failed to write settings: {0}")]
    Write(#[source] io::Error),

    /// The migration registry is inconsistent. A build defect, fatal at
    /// startup.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A migration step failed on this document. A registry defect; the
    /// load fails rather than risking silent corruption.
    #[error(transparent)]
    Migration(#[from] MigrationError),

    /// The document does not decode as the current schema.
    #[error("failed to decode settings: {0}")]
    Decode(#[from] serde_json::Error),
}

/// File-backed settings store.
///
/// The read-migrate-write sequence is serialized per store value; the store
/// assumes no concurrent writer on the same settings path.
pub struct SettingsStore {
    paths: AppPaths,
    engine: MigrationEngine,
}

impl SettingsStore {
    /// Open a store over the given layout, validating the shipped migration
    /// registry against this release's version.
    pub fn open(paths: AppPaths) -> Result<Self, StoreError> {
        let engine = MigrationEngine::shipped(Version::parse(APP_VERSION))?;
        Self::with_engine(paths, engine)
    }

    /// Open with an explicit engine. Lets tests supply their own registry.
    pub fn with_engine(paths: AppPaths, engine: MigrationEngine) -> Result<Self, StoreError> {
        paths.ensure().map_err(StoreError::Write)?;
        Ok(Self { paths, engine })
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    /// Load the settings document, migrating it if it predates the running
    /// release and resetting it if it cannot be parsed.
    pub fn load(&self) -> Result<Settings, StoreError> {
        let path = self.paths.settings_file();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no settings file; writing defaults");
                let defaults = Settings::default();
                self.save(&defaults)?;
                return Ok(defaults);
            }
            Err(err) => return Err(StoreError::Read(err)),
        };

        let doc = match serde_json::from_str::<Value>(&raw) {
            Ok(doc) if doc.is_object() => doc,
            _ => return self.reset_corrupt(&raw),
        };

        match self.engine.migrate(doc)? {
            MigrationOutcome::Current { settings } => Ok(serde_json::from_value(settings)?),
            MigrationOutcome::Migrated { settings, from, to } => {
                info!(%from, %to, "settings migrated; persisting the new version");
                self.write_document(&settings)?;
                Ok(serde_json::from_value(settings)?)
            }
            MigrationOutcome::NewerThanApp { settings, version } => {
                warn!(
                    %version,
                    app = APP_VERSION,
                    "settings were written by a newer release; some features may not work"
                );
                // Tolerant in-memory read; the file on disk stays as-is.
                Ok(serde_json::from_value(settings)?)
            }
        }
    }

    /// Persist a settings value as pretty-printed JSON.
    pub fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        let doc = serde_json::to_value(settings)?;
        self.write_document(&doc)
    }

    fn write_document(&self, doc: &Value) -> Result<(), StoreError> {
        let rendered = serde_json::to_string_pretty(doc)?;
        fs::write(self.paths.settings_file(), rendered).map_err(StoreError::Write)
    }

    /// Copy the unparsable file aside and start over with defaults.
    fn reset_corrupt(&self, raw: &str) -> Result<Settings, StoreError> {
        let backup = self
            .paths
            .backups_dir()
            .join(format!("settings-{}.json", Utc::now().format("%Y%m%d-%H%M%S")));
        warn!(
            backup = %backup.display(),
            "settings file is corrupted; backing it up and resetting to defaults"
        );
        fs::write(&backup, raw).map_err(StoreError::Write)?;
        let defaults = Settings::default();
        self.save(&defaults)?;
        Ok(defaults)
    }
}
