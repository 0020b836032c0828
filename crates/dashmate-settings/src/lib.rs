//! dashmate-settings: settings schema versioning and migration.
//!
//! DashboardMate persists its configuration as a single JSON document. Each
//! release that changes the document's shape registers a migration step; on
//! load the engine walks a document forward through every step between its
//! declared version and the running release.
//!
//! # Design
//!
//! - [`Version`] is a tolerant `major.minor.patch` triple with a total
//!   order; documents carry it as a plain string.
//! - One struct per schema version ([`SettingsV1_2`] through [`Settings`]);
//!   the transform between adjacent versions is a `From` impl, so a new
//!   version without a wired transform fails to compile.
//! - [`MigrationEngine`] validates its registry when constructed and folds
//!   the applicable steps over a document with value semantics; it never
//!   mutates caller-owned data and never touches storage.
//! - A document written by a newer release is returned untouched rather
//!   than downgraded, so an app rollback cannot destroy data.

pub mod engine;
pub mod registry;
pub mod schema;
pub mod version;

pub use engine::*;
pub use registry::*;
pub use schema::*;
pub use version::*;
