//! dashmate-store: file-backed settings persistence for DashboardMate.
//!
//! Owns the application data directory (`~/.dashboardmate`), loads and
//! saves `settings.json`, and runs every loaded document through the
//! migration engine from `dashmate-settings`. A file that fails to parse is
//! copied into `backups/` and replaced with defaults; repair-in-place is
//! never attempted.

pub mod paths;
pub mod store;

pub use paths::*;
pub use store::*;

/// Release version of the running application, as compared against
/// migration targets and persisted document versions.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
