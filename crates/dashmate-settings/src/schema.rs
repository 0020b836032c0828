//! Versioned settings document shapes.
//!
//! One struct per schema version, oldest to newest. The transform between
//! adjacent versions is a `From` impl, so adding a version without wiring
//! its transform fails to compile. Every transform is total: any field the
//! input lacks gets a concrete default on the way through.
//!
//! # Schema history
//!
//! - 1.2.0: last unversioned shape — optional notification, AI and schedule
//!   sections, no `version` field.
//! - 1.3.0: introduced the `version` field; all sections concrete.
//! - 1.4.0: `notifications` gained `defaultReminderTime`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::version::Version;

/// Baseline version stamped on documents that predate versioning.
pub const INITIAL_VERSION: Version = Version::new(1, 2, 0);

/// Version the running application expects after all migrations apply.
pub const CURRENT_SETTINGS_VERSION: Version = Version::new(1, 4, 0);

/// Settings as written before 1.3.0 introduced versioning.
///
/// Everything is optional: legacy files were written piecemeal and may be
/// missing any section or leaf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsV1_2 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<NotificationsV1_2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<AiV1_2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduleV1_2>,
    /// Top-level keys this shape does not model, carried forward verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationsV1_2 {
    #[serde(default)]
    pub push: Option<bool>,
    #[serde(default)]
    pub email: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiV1_2 {
    #[serde(default)]
    pub auto_create: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleV1_2 {
    #[serde(default)]
    pub show_weekends: Option<bool>,
}

/// First versioned shape (1.3.0): `version` field plus concrete
/// notification, AI and schedule sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsV1_3 {
    #[serde(default)]
    pub version: Version,
    #[serde(default)]
    pub notifications: NotificationsV1_3,
    #[serde(default)]
    pub ai: AiSettings,
    #[serde(default)]
    pub schedule: ScheduleSettings,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsV1_3 {
    pub push: bool,
    pub email: bool,
}

/// The current settings document (1.4.0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub version: Version,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub ai: AiSettings,
    #[serde(default)]
    pub schedule: ScheduleSettings,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_SETTINGS_VERSION,
            notifications: NotificationSettings::default(),
            ai: AiSettings::default(),
            schedule: ScheduleSettings::default(),
            extra: Map::new(),
        }
    }
}

/// Notification preferences (1.4.0 shape).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub push: bool,
    pub email: bool,
    /// Minutes before a scheduled task to fire its reminder.
    pub default_reminder_time: u32,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            push: false,
            email: false,
            default_reminder_time: 30,
        }
    }
}

/// AI assistance preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiSettings {
    pub auto_create: bool,
}

/// Schedule view preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleSettings {
    pub show_weekends: bool,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            show_weekends: true,
        }
    }
}

impl From<SettingsV1_2> for SettingsV1_3 {
    fn from(old: SettingsV1_2) -> Self {
        let notifications = old.notifications.unwrap_or_default();
        let ai = old.ai.unwrap_or_default();
        let schedule = old.schedule.unwrap_or_default();
        Self {
            version: Version::new(1, 3, 0),
            notifications: NotificationsV1_3 {
                push: notifications.push.unwrap_or(false),
                email: notifications.email.unwrap_or(false),
            },
            ai: AiSettings {
                auto_create: ai.auto_create.unwrap_or(false),
            },
            schedule: ScheduleSettings {
                show_weekends: schedule.show_weekends.unwrap_or(true),
            },
            extra: old.extra,
        }
    }
}

impl From<SettingsV1_3> for Settings {
    fn from(old: SettingsV1_3) -> Self {
        Self {
            version: Version::new(1, 4, 0),
            notifications: NotificationSettings {
                push: old.notifications.push,
                email: old.notifications.email,
                default_reminder_time: 30,
            },
            ai: old.ai,
            schedule: old.schedule,
            extra: old.extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_settings_are_current_and_fully_populated() {
        let settings = Settings::default();
        assert_eq!(settings.version, CURRENT_SETTINGS_VERSION);
        assert!(!settings.notifications.push);
        assert!(!settings.notifications.email);
        assert_eq!(settings.notifications.default_reminder_time, 30);
        assert!(!settings.ai.auto_create);
        assert!(settings.schedule.show_weekends);
    }

    #[test]
    fn legacy_shape_reads_an_empty_document() {
        let old: SettingsV1_2 = serde_json::from_value(json!({})).unwrap();
        assert!(old.version.is_none());
        assert!(old.notifications.is_none());
        assert!(old.ai.is_none());
        assert!(old.schedule.is_none());
        assert!(old.extra.is_empty());
    }

    #[test]
    fn upgrade_to_1_3_fills_defaults() {
        let new = SettingsV1_3::from(SettingsV1_2::default());
        assert_eq!(new.version, Version::new(1, 3, 0));
        assert!(!new.notifications.push);
        assert!(!new.notifications.email);
        assert!(!new.ai.auto_create);
        assert!(new.schedule.show_weekends);
    }

    #[test]
    fn upgrade_to_1_3_preserves_present_values() {
        let old: SettingsV1_2 = serde_json::from_value(json!({
            "notifications": { "push": true },
            "schedule": { "showWeekends": false }
        }))
        .unwrap();
        let new = SettingsV1_3::from(old);
        assert!(new.notifications.push);
        assert!(!new.notifications.email);
        assert!(!new.schedule.show_weekends);
    }

    #[test]
    fn upgrade_to_1_4_adds_reminder_time() {
        let mid = SettingsV1_3::from(SettingsV1_2::default());
        let new = Settings::from(mid);
        assert_eq!(new.version, Version::new(1, 4, 0));
        assert_eq!(new.notifications.default_reminder_time, 30);
    }

    #[test]
    fn unknown_top_level_keys_survive_both_upgrades() {
        let old: SettingsV1_2 = serde_json::from_value(json!({
            "theme": { "mode": "dark" }
        }))
        .unwrap();
        let new = Settings::from(SettingsV1_3::from(old));
        assert_eq!(new.extra.get("theme"), Some(&json!({ "mode": "dark" })));
    }

    #[test]
    fn current_shape_serializes_camel_case() {
        let doc = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(doc["version"], json!("1.4.0"));
        assert_eq!(doc["notifications"]["defaultReminderTime"], json!(30));
        assert_eq!(doc["ai"]["autoCreate"], json!(false));
        assert_eq!(doc["schedule"]["showWeekends"], json!(true));
    }
}
