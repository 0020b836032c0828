//! The shipped migration registry.
//!
//! Migrations are declared in ascending target order, one entry per schema
//! version. Each step tolerantly reads the previous version's shape
//! (defaulting absent keys), converts through the typed `From` impl, and
//! re-serializes with its own target version stamped.

use serde_json::Value;

use crate::schema::{Settings, SettingsV1_2, SettingsV1_3};
use crate::version::Version;

/// A single migration step: a target version and a total transform from
/// the previous document shape to it.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    target: Version,
    migrate: fn(Value) -> Result<Value, serde_json::Error>,
}

impl Migration {
    pub const fn new(
        target: Version,
        migrate: fn(Value) -> Result<Value, serde_json::Error>,
    ) -> Self {
        Self { target, migrate }
    }

    /// Version this step advances a document to.
    pub fn target(&self) -> Version {
        self.target
    }

    /// Run the step against a document.
    pub fn apply(&self, doc: Value) -> Result<Value, serde_json::Error> {
        (self.migrate)(doc)
    }
}

/// All shipped migrations, oldest target first.
pub fn default_registry() -> Vec<Migration> {
    vec![
        Migration::new(Version::new(1, 3, 0), migrate_to_1_3_0),
        Migration::new(Version::new(1, 4, 0), migrate_to_1_4_0),
    ]
}

/// 1.3.0: introduce the `version` field and concrete notification, AI and
/// schedule sections.
fn migrate_to_1_3_0(doc: Value) -> Result<Value, serde_json::Error> {
    let old: SettingsV1_2 = serde_json::from_value(doc)?;
    serde_json::to_value(SettingsV1_3::from(old))
}

/// 1.4.0: add `notifications.defaultReminderTime`.
fn migrate_to_1_4_0(doc: Value) -> Result<Value, serde_json::Error> {
    let old: SettingsV1_3 = serde_json::from_value(doc)?;
    serde_json::to_value(Settings::from(old))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shipped_registry_is_strictly_ascending() {
        let registry = default_registry();
        for pair in registry.windows(2) {
            assert!(pair[0].target() < pair[1].target());
        }
    }

    #[test]
    fn step_1_3_fills_every_section() {
        let doc = default_registry()[0].apply(json!({})).unwrap();
        assert_eq!(doc["version"], json!("1.3.0"));
        assert_eq!(doc["notifications"], json!({ "push": false, "email": false }));
        assert_eq!(doc["ai"], json!({ "autoCreate": false }));
        assert_eq!(doc["schedule"], json!({ "showWeekends": true }));
    }

    #[test]
    fn step_1_4_adds_reminder_time_and_keeps_values() {
        let mid = default_registry()[0]
            .apply(json!({ "notifications": { "push": true } }))
            .unwrap();
        let doc = default_registry()[1].apply(mid).unwrap();
        assert_eq!(doc["version"], json!("1.4.0"));
        assert_eq!(doc["notifications"]["push"], json!(true));
        assert_eq!(doc["notifications"]["defaultReminderTime"], json!(30));
    }

    #[test]
    fn steps_reject_non_object_documents() {
        assert!(default_registry()[0].apply(json!("not an object")).is_err());
    }
}
