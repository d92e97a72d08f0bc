//! Migration of permit records written by earlier storage versions.
//!
//! # Responsibility
//! - Read persisted records that may carry ISO datetime strings, missing
//!   kinds or non-UUID ids, and migrate them to the current model.
//!
//! # Invariants
//! - A record without a readable start date is dropped, never an error.
//! - An absent or unknown `type` maps to Regular here and nowhere else.
//! - End dates are rederived from `(start, kind)`; stored ones are ignored.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::model::permit::{Permit, PermitType};
use crate::model::plan::Plan;

/// Permit record as written by earlier storage versions.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LegacyPermitRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub start_date: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl LegacyPermitRecord {
    /// Migrates one stored record into the current model.
    pub fn migrate(&self, config: &EngineConfig) -> Option<Permit> {
        let start = parse_iso_date(&self.start_date)?;
        let kind = match self.kind.as_deref() {
            Some("temporary") => PermitType::Temporary,
            _ => PermitType::Regular,
        };
        let id = self
            .id
            .as_deref()
            .and_then(|value| Uuid::parse_str(value).ok())
            .unwrap_or_else(Uuid::new_v4);
        Some(Permit::with_id(id, start, kind, config.duration_days(kind)))
    }
}

/// Plan record as written by earlier storage versions.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LegacyPlanRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub permits: Vec<LegacyPermitRecord>,
}

impl LegacyPlanRecord {
    /// Migrates one stored plan, dropping unreadable member permits.
    pub fn migrate(self, config: &EngineConfig) -> Plan {
        let mut permits: Vec<Permit> = self
            .permits
            .iter()
            .filter_map(|record| record.migrate(config))
            .collect();
        permits.sort_by_key(|permit| permit.start_date);
        Plan {
            id: self
                .id
                .as_deref()
                .and_then(|value| Uuid::parse_str(value).ok())
                .unwrap_or_else(Uuid::new_v4),
            name: self.name,
            permits,
        }
    }
}

/// Parses `YYYY-MM-DD`, tolerating a trailing `T...` time component.
fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.trim().split('T').next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_date_parsing_tolerates_datetimes() {
        let expected = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(parse_iso_date("2026-01-01"), Some(expected));
        assert_eq!(parse_iso_date("2026-01-01T00:00:00.000Z"), Some(expected));
        assert_eq!(parse_iso_date(" 2026-01-01 "), Some(expected));
        assert_eq!(parse_iso_date("not a date"), None);
        assert_eq!(parse_iso_date(""), None);
    }

    #[test]
    fn missing_kind_migrates_to_regular() {
        let record = LegacyPermitRecord {
            id: None,
            start_date: "2026-01-01".to_string(),
            kind: None,
        };
        let permit = record.migrate(&EngineConfig::default()).unwrap();
        assert_eq!(permit.kind, PermitType::Regular);
        assert_eq!(permit.end_date, NaiveDate::from_ymd_opt(2026, 1, 7).unwrap());
    }

    #[test]
    fn non_uuid_id_is_replaced() {
        let record = LegacyPermitRecord {
            id: Some("1735689600000-2026-0".to_string()),
            start_date: "2026-01-01".to_string(),
            kind: Some("temporary".to_string()),
        };
        let permit = record.migrate(&EngineConfig::default()).unwrap();
        assert_eq!(permit.kind, PermitType::Temporary);
        assert_eq!(permit.end_date, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
    }
}
