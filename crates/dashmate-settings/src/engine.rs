//! Registry validation and document migration.
//!
//! [`MigrationEngine`] is constructed once at startup from an explicit
//! registry and validated there; a rejected registry is a build defect and
//! fails the boot. Applying migrations is a pure fold over the document —
//! no shared state, no I/O. Persisting the result is the caller's job.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::registry::{default_registry, Migration};
use crate::schema::{CURRENT_SETTINGS_VERSION, INITIAL_VERSION};
use crate::version::Version;

/// A structurally invalid migration registry.
///
/// Every variant carries the offending versions so the failure is
/// diagnosable without extra logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Registry entries must be strictly ascending by target version.
    #[error("migrations must be in ascending order: {previous} is followed by {next}")]
    OutOfOrder { previous: Version, next: Version },

    /// The first migration must advance past the baseline version.
    #[error("first migration ({first}) must target a version above the initial version ({initial})")]
    BaselineNotAdvanced { first: Version, initial: Version },

    /// The current-version marker must match the last registered migration.
    #[error("current settings version ({current}) does not match the last migration ({last})")]
    CurrentMismatch { current: Version, last: Version },

    /// A migration may not outpace the application build that ships it.
    #[error("migration {target} is newer than the application itself ({app})")]
    AheadOfApp { target: Version, app: Version },
}

/// A migration step failed while transforming a document.
///
/// Transforms are total over well-formed documents, so this indicates a
/// registry bug rather than recoverable user data; callers log and re-raise
/// instead of attempting repair.
#[derive(Debug, Error)]
#[error("migration to {target} failed: {source}")]
pub struct MigrationError {
    pub target: Version,
    #[source]
    pub source: serde_json::Error,
}

/// Result of running a document through the engine.
#[derive(Debug)]
pub enum MigrationOutcome {
    /// Document was already at the latest applicable version.
    Current { settings: Value },
    /// One or more steps were applied; the caller should persist.
    Migrated {
        settings: Value,
        from: Version,
        to: Version,
    },
    /// Document was written by a newer release; returned untouched so no
    /// data is destroyed. Some features may not work until the app updates.
    NewerThanApp { settings: Value, version: Version },
}

impl MigrationOutcome {
    /// The (possibly migrated) document.
    pub fn settings(&self) -> &Value {
        match self {
            Self::Current { settings }
            | Self::Migrated { settings, .. }
            | Self::NewerThanApp { settings, .. } => settings,
        }
    }

    pub fn into_settings(self) -> Value {
        match self {
            Self::Current { settings }
            | Self::Migrated { settings, .. }
            | Self::NewerThanApp { settings, .. } => settings,
        }
    }

    /// True when the document's version advanced and should be written back.
    pub fn version_advanced(&self) -> bool {
        matches!(self, Self::Migrated { .. })
    }
}

/// Validates a migration registry at construction and folds its steps over
/// persisted documents.
#[derive(Debug)]
pub struct MigrationEngine {
    migrations: Vec<Migration>,
    initial_version: Version,
    current_version: Version,
    app_version: Version,
}

impl MigrationEngine {
    /// Build an engine over an explicit registry.
    ///
    /// Validation is a pure function of the arguments, so constructing the
    /// same engine twice re-derives the same result. An empty registry is
    /// accepted and migrates nothing.
    pub fn new(
        migrations: Vec<Migration>,
        initial_version: Version,
        current_version: Version,
        app_version: Version,
    ) -> Result<Self, RegistryError> {
        for pair in migrations.windows(2) {
            if pair[1].target() <= pair[0].target() {
                return Err(RegistryError::OutOfOrder {
                    previous: pair[0].target(),
                    next: pair[1].target(),
                });
            }
        }
        if let Some(first) = migrations.first() {
            if first.target() <= initial_version {
                return Err(RegistryError::BaselineNotAdvanced {
                    first: first.target(),
                    initial: initial_version,
                });
            }
        }
        if let Some(last) = migrations.last() {
            if last.target() != current_version {
                return Err(RegistryError::CurrentMismatch {
                    current: current_version,
                    last: last.target(),
                });
            }
        }
        if let Some(ahead) = migrations.iter().find(|m| m.target() > app_version) {
            return Err(RegistryError::AheadOfApp {
                target: ahead.target(),
                app: app_version,
            });
        }
        Ok(Self {
            migrations,
            initial_version,
            current_version,
            app_version,
        })
    }

    /// Engine over the shipped registry, for a given application release.
    pub fn shipped(app_version: Version) -> Result<Self, RegistryError> {
        Self::new(
            default_registry(),
            INITIAL_VERSION,
            CURRENT_SETTINGS_VERSION,
            app_version,
        )
    }

    pub fn initial_version(&self) -> Version {
        self.initial_version
    }

    pub fn current_version(&self) -> Version {
        self.current_version
    }

    pub fn app_version(&self) -> Version {
        self.app_version
    }

    /// Migrate a settings document to the newest version this application
    /// understands.
    ///
    /// A document without a `version` field is treated as the baseline
    /// version and stamped with it. A document from a newer release than
    /// the running one is returned untouched (see
    /// [`MigrationOutcome::NewerThanApp`]).
    pub fn migrate(&self, doc: Value) -> Result<MigrationOutcome, MigrationError> {
        let mut doc = doc;
        let from = match document_version(&doc) {
            Some(version) => version,
            None => {
                // Legacy document: stamp the baseline on the working copy.
                if let Some(fields) = doc.as_object_mut() {
                    fields.insert(
                        "version".to_string(),
                        Value::String(self.initial_version.to_string()),
                    );
                }
                self.initial_version
            }
        };

        if from > self.app_version {
            warn!(
                version = %from,
                app = %self.app_version,
                "settings were written by a newer release; leaving them untouched"
            );
            return Ok(MigrationOutcome::NewerThanApp {
                settings: doc,
                version: from,
            });
        }

        // Steps strictly above the document's version, bounded by the app
        // version rather than the current marker.
        let pending: Vec<&Migration> = self
            .migrations
            .iter()
            .filter(|m| m.target() > from && m.target() <= self.app_version)
            .collect();

        let Some(last) = pending.last() else {
            return Ok(MigrationOutcome::Current { settings: doc });
        };
        let to = last.target();

        info!(%from, %to, steps = pending.len(), "migrating settings");
        let mut settings = doc;
        for step in &pending {
            debug!(target_version = %step.target(), "applying settings migration");
            settings = step.apply(settings).map_err(|source| MigrationError {
                target: step.target(),
                source,
            })?;
        }

        Ok(MigrationOutcome::Migrated { settings, from, to })
    }
}

/// Read the declared schema version off a raw document.
fn document_version(doc: &Value) -> Option<Version> {
    doc.get("version").and_then(Value::as_str).map(Version::parse)
}
