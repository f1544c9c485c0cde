//! Cache document model and on-disk schema.
//!
//! The cache file is a TOML document with a `version` tag and two sections,
//! `running.entries` and `paused.entries`. The whole document is replaced
//! atomically on every commit; there are no field-level writes.
//!
//! Older documents (schema v1) carried no version tag, used the remote
//! store's column names, encoded absent values as the string `"null"` and
//! stored timezone-naive timestamps. The migration table below upgrades
//! them in place; anything it cannot read is treated as corruption and the
//! cache is reset to defaults (the remote store is authoritative).

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Current on-disk schema version.
pub const SCHEMA_VERSION: u32 = 2;

/// Project name used when an entry is started without one.
pub const NO_PROJECT: &str = "no-project";

/// A single cached time entry.
///
/// The all-`None` value with zero `paused_hrs` is the sentinel meaning
/// "no active timer"; it always occupies position 0 of the running stack
/// when nothing is being tracked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_billable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_paused: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_paused: Option<DateTime<FixedOffset>>,
    #[serde(with = "rust_decimal::serde::str", default)]
    pub paused_hrs: Decimal,
}

impl TimeEntry {
    /// The "no active timer" placeholder.
    pub fn sentinel() -> Self {
        Self {
            project: None,
            id: None,
            start: None,
            note: None,
            is_billable: None,
            is_paused: None,
            time_paused: None,
            paused_hrs: Decimal::ZERO,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.id.is_none()
    }
}

impl Default for TimeEntry {
    fn default() -> Self {
        Self::sentinel()
    }
}

/// Serialized shape of the cache document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CacheFile {
    pub version: u32,
    pub running: Section,
    pub paused: Section,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Section {
    pub entries: Vec<TimeEntry>,
}

impl CacheFile {
    pub fn from_document(running: Vec<TimeEntry>, paused: Vec<TimeEntry>) -> Self {
        Self {
            version: SCHEMA_VERSION,
            running: Section { entries: running },
            paused: Section { entries: paused },
        }
    }
}

// ── Schema migrations ────────────────────────────────────────────────

type Migration = fn(&mut toml::Value, FixedOffset) -> Result<(), CacheError>;

/// One step per entry: upgrades a document *from* the listed version to the
/// next one.
const MIGRATIONS: &[(u32, Migration)] = &[(1, migrate_v1_to_v2)];

/// Upgrade a raw document to [`SCHEMA_VERSION`] in place.
///
/// Returns `true` if anything changed, so the caller can write the
/// corrected document back. Documents without a version tag are treated
/// as v1. An unknown (future) version is corruption: this build cannot
/// know how to read it, and the cache is disposable.
pub(crate) fn upgrade(doc: &mut toml::Value, tz: FixedOffset) -> Result<bool, CacheError> {
    let mut changed = false;
    loop {
        let version = doc
            .get("version")
            .and_then(|v| v.as_integer())
            .map(|v| v as u32)
            .unwrap_or(1);
        if version == SCHEMA_VERSION {
            return Ok(changed);
        }
        let Some((_, migration)) = MIGRATIONS.iter().find(|(from, _)| *from == version) else {
            return Err(CacheError::Corruption(format!(
                "unknown cache schema version {version}"
            )));
        };
        migration(doc, tz)?;
        let table = doc
            .as_table_mut()
            .ok_or_else(|| CacheError::Corruption("document root is not a table".into()))?;
        table.insert("version".into(), toml::Value::Integer((version + 1) as i64));
        changed = true;
    }
}

/// v1 -> v2: rename remote column names to cache field names, drop `"null"`
/// placeholders, localize naive timestamps to the configured offset and
/// string-encode bare numeric hour values.
fn migrate_v1_to_v2(doc: &mut toml::Value, tz: FixedOffset) -> Result<(), CacheError> {
    const RENAMES: [(&str, &str); 4] = [
        ("billable", "is_billable"),
        ("paused", "is_paused"),
        ("timestamp_paused", "time_paused"),
        ("paused_hours", "paused_hrs"),
    ];

    for section in ["running", "paused"] {
        let entries = doc
            .get_mut(section)
            .and_then(|s| s.get_mut("entries"))
            .and_then(|e| e.as_array_mut());
        let Some(entries) = entries else { continue };

        for entry in entries {
            let table = entry.as_table_mut().ok_or_else(|| {
                CacheError::Corruption(format!("{section} entry is not a table"))
            })?;

            for (old, new) in RENAMES {
                if let Some(value) = table.remove(old) {
                    table.insert(new.into(), value);
                }
            }

            table.retain(|_, value| value.as_str() != Some("null"));

            for key in ["start", "time_paused"] {
                if let Some(value) = table.get(key) {
                    if let Some(fixed) = localize_value(value, tz)? {
                        table.insert(key.into(), toml::Value::String(fixed));
                    }
                }
            }

            if let Some(value) = table.get("paused_hrs") {
                if value.as_str().is_none() {
                    let rendered = match value {
                        toml::Value::Integer(n) => n.to_string(),
                        toml::Value::Float(f) => f.to_string(),
                        other => {
                            return Err(CacheError::Corruption(format!(
                                "unreadable paused_hrs value '{other}'"
                            )))
                        }
                    };
                    table.insert("paused_hrs".into(), toml::Value::String(rendered));
                }
            }
        }
    }
    Ok(())
}

/// Rewrite a timestamp value as an RFC 3339 string, attaching `tz` when the
/// stored value carries no timezone. Returns `None` when the value is
/// already in canonical form.
fn localize_value(
    value: &toml::Value,
    tz: FixedOffset,
) -> Result<Option<String>, CacheError> {
    let raw = match value {
        toml::Value::Datetime(dt) => dt.to_string(),
        toml::Value::String(s) => s.clone(),
        other => {
            return Err(CacheError::Corruption(format!(
                "unreadable timestamp value '{other}'"
            )))
        }
    };
    let fixed = localize_str(&raw, tz)
        .ok_or_else(|| CacheError::Corruption(format!("unreadable timestamp '{raw}'")))?;
    if matches!(value, toml::Value::String(s) if *s == fixed) {
        Ok(None)
    } else {
        Ok(Some(fixed))
    }
}

fn localize_str(raw: &str, tz: FixedOffset) -> Option<String> {
    if let Ok(aware) = DateTime::parse_from_rfc3339(raw) {
        return Some(aware.to_rfc3339());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return tz
                .from_local_datetime(&naive)
                .single()
                .map(|aware| aware.to_rfc3339());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use rust_decimal_macros::dec;

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    #[test]
    fn sentinel_roundtrip() {
        let file = CacheFile::from_document(vec![TimeEntry::sentinel()], vec![]);
        let text = toml::to_string_pretty(&file).unwrap();
        let parsed: CacheFile = toml::from_str(&text).unwrap();
        assert_eq!(parsed.version, SCHEMA_VERSION);
        assert_eq!(parsed.running.entries.len(), 1);
        assert!(parsed.running.entries[0].is_sentinel());
        assert!(parsed.paused.entries.is_empty());
    }

    #[test]
    fn entry_roundtrip_preserves_fields() {
        let entry = TimeEntry {
            project: Some("demo".into()),
            id: Some("abc1234xyz".into()),
            start: Some("2024-03-01T09:00:00+02:00".parse().unwrap()),
            note: Some("writing docs".into()),
            is_billable: Some(true),
            is_paused: Some(false),
            time_paused: None,
            paused_hrs: dec!(0.2500),
        };
        let file = CacheFile::from_document(vec![entry.clone()], vec![]);
        let text = toml::to_string_pretty(&file).unwrap();
        let parsed: CacheFile = toml::from_str(&text).unwrap();
        assert_eq!(parsed.running.entries[0], entry);
    }

    #[test]
    fn paused_hrs_serializes_as_string() {
        let file = CacheFile::from_document(vec![TimeEntry::sentinel()], vec![]);
        let text = toml::to_string_pretty(&file).unwrap();
        assert!(text.contains("paused_hrs = \"0\""));
    }

    #[test]
    fn upgrade_is_noop_for_current_version() {
        let file = CacheFile::from_document(vec![TimeEntry::sentinel()], vec![]);
        let text = toml::to_string_pretty(&file).unwrap();
        let mut value: toml::Value = toml::from_str(&text).unwrap();
        assert!(!upgrade(&mut value, tz()).unwrap());
    }

    #[test]
    fn upgrade_rejects_future_versions() {
        let mut value: toml::Value = toml::from_str("version = 99").unwrap();
        assert!(matches!(
            upgrade(&mut value, tz()),
            Err(CacheError::Corruption(_))
        ));
    }

    #[test]
    fn v1_document_migrates_to_current_schema() {
        let legacy = indoc! {r#"
            [[running.entries]]
            id = "abc1234xyz"
            project = "demo"
            start = 2024-03-01T09:00:00
            note = "null"
            billable = true
            paused = false
            timestamp_paused = "null"
            paused_hours = "0.5"

            [paused]
            entries = []
        "#};
        let mut value: toml::Value = toml::from_str(legacy).unwrap();
        assert!(upgrade(&mut value, tz()).unwrap());

        let file: CacheFile = value.try_into().unwrap();
        assert_eq!(file.version, SCHEMA_VERSION);
        let entry = &file.running.entries[0];
        assert_eq!(entry.id.as_deref(), Some("abc1234xyz"));
        // naive timestamp picked up the configured offset
        assert_eq!(
            entry.start.unwrap().to_rfc3339(),
            "2024-03-01T09:00:00+02:00"
        );
        assert_eq!(entry.note, None);
        assert_eq!(entry.is_billable, Some(true));
        assert_eq!(entry.time_paused, None);
        assert_eq!(entry.paused_hrs, dec!(0.5));
    }

    #[test]
    fn v1_numeric_hours_become_strings() {
        let legacy = indoc! {r#"
            [[running.entries]]
            id = "abc1234xyz"
            paused_hours = 0.25

            [paused]
            entries = []
        "#};
        let mut value: toml::Value = toml::from_str(legacy).unwrap();
        upgrade(&mut value, tz()).unwrap();
        let file: CacheFile = value.try_into().unwrap();
        assert_eq!(file.running.entries[0].paused_hrs, dec!(0.25));
    }

    #[test]
    fn aware_timestamps_survive_migration_unchanged() {
        let legacy = indoc! {r#"
            [[running.entries]]
            id = "abc1234xyz"
            start = "2024-03-01T09:00:00-05:00"

            [paused]
            entries = []
        "#};
        let mut value: toml::Value = toml::from_str(legacy).unwrap();
        upgrade(&mut value, tz()).unwrap();
        let file: CacheFile = value.try_into().unwrap();
        assert_eq!(
            file.running.entries[0].start.unwrap().to_rfc3339(),
            "2024-03-01T09:00:00-05:00"
        );
    }
}
