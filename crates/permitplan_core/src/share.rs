//! Share-code codec for schedules.
//!
//! # Responsibility
//! - Encode a permit list into the compact year-block share string.
//! - Decode share strings across every grammar the app has ever written.
//!
//! # Invariants
//! - Decoding never fails: input that matches no grammar yields an empty
//!   list, and individually unparseable codes are skipped.
//! - Decoded end dates are rederived from `(start, kind)`, never read
//!   from the input.
//!
//! Primary grammar, one block per calendar year in ascending order:
//!
//! ```text
//! $2026R3fT5k$2027R11
//!  ^^^^ year   ^^ base-36 month + day, prefixed by the kind tag
//! ```
//!
//! # See also
//! - `crate::model::legacy` for the JSON-array fallback records.

use std::collections::BTreeMap;

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::EngineConfig;
use crate::model::legacy::LegacyPermitRecord;
use crate::model::permit::{Permit, PermitType};
use chrono::{Datelike, NaiveDate};

static PERMIT_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[RT][0-9a-z]{2}").expect("valid permit code regex"));
static YEAR_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}(?:[RT][0-9a-z]{2})*").expect("valid year block regex"));
static FLAT_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[RT](?:\d{6}|\d{2}[0-9a-z]{2})").expect("valid flat code regex"));

/// Encodes permits into the primary share grammar.
///
/// Permits are grouped into ascending year blocks by start year;
/// `filter_year` restricts the output to permits starting in that year.
/// An empty selection encodes to the empty string.
pub fn encode_permits(permits: &[Permit], filter_year: Option<i32>) -> String {
    let mut sorted: Vec<&Permit> = permits.iter().collect();
    sorted.sort_by_key(|permit| permit.start_date);

    let mut by_year: BTreeMap<i32, Vec<&Permit>> = BTreeMap::new();
    for permit in sorted {
        let year = permit.start_year();
        if filter_year.is_some_and(|wanted| wanted != year) {
            continue;
        }
        by_year.entry(year).or_default().push(permit);
    }

    let mut encoded = String::new();
    for (year, year_permits) in by_year {
        encoded.push('$');
        encoded.push_str(&format!("{year:04}"));
        for permit in year_permits {
            encoded.push(permit.kind.code_char());
            encoded.push(base36_digit(permit.start_date.month()));
            encoded.push(base36_digit(permit.start_date.day()));
        }
    }
    encoded
}

/// Decodes a share string, attempting each historical grammar in order.
///
/// The first grammar yielding at least one permit wins. Exhausting every
/// grammar degrades to an empty list; this function never errors.
pub fn decode_permits(input: &str, config: &EngineConfig) -> Vec<Permit> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let attempts: [(&str, fn(&str, &EngineConfig) -> Vec<Permit>); 4] = [
        ("primary", decode_primary),
        ("legacy_blocks", decode_legacy_blocks),
        ("legacy_flat", decode_legacy_flat),
        ("legacy_json", decode_legacy_json),
    ];

    for (grammar, attempt) in attempts {
        let permits = attempt(trimmed, config);
        if !permits.is_empty() {
            debug!(
                "event=share_decode module=share status=ok grammar={} permits={}",
                grammar,
                permits.len()
            );
            return permits;
        }
    }

    warn!(
        "event=share_decode module=share status=degraded reason=no_grammar_matched input_len={}",
        trimmed.len()
    );
    Vec::new()
}

/// Primary grammar: explicit `$` year-block delimiters.
fn decode_primary(input: &str, config: &EngineConfig) -> Vec<Permit> {
    if !input.starts_with('$') {
        return Vec::new();
    }
    let mut permits = Vec::new();
    for block in input.split('$').filter(|block| !block.is_empty()) {
        decode_year_block(block, config, &mut permits);
    }
    permits
}

/// Legacy grammar: year blocks without `$` delimiters, found by scanning.
fn decode_legacy_blocks(input: &str, config: &EngineConfig) -> Vec<Permit> {
    if input.starts_with('$') {
        return Vec::new();
    }
    let mut permits = Vec::new();
    for found in YEAR_BLOCK_RE.find_iter(input) {
        decode_year_block(found.as_str(), config, &mut permits);
    }
    permits
}

/// Oldest grammar: self-contained codes carrying their own year, either
/// `[RT]YYMMDD` or `[RT]YY` + base-36 month + day. Two-digit years live
/// in the 2000s.
fn decode_legacy_flat(input: &str, config: &EngineConfig) -> Vec<Permit> {
    if input.starts_with('$') {
        return Vec::new();
    }
    let mut permits = Vec::new();
    for found in FLAT_CODE_RE.find_iter(input) {
        let code = found.as_str();
        let Some(kind) = code.chars().next().and_then(PermitType::from_code_char) else {
            continue;
        };
        let body = &code[1..];
        let parsed = if body.len() == 6 {
            parse_flat_ymd(body)
        } else {
            parse_flat_base36(body)
        };
        if let Some((year, month, day)) = parsed {
            if let Some(permit) = permit_from_parts(year, month, day, kind, config) {
                permits.push(permit);
            }
        }
    }
    permits
}

/// Legacy storage fallback: a JSON array of permit objects.
fn decode_legacy_json(input: &str, config: &EngineConfig) -> Vec<Permit> {
    if !input.starts_with('[') {
        return Vec::new();
    }
    let Ok(records) = serde_json::from_str::<Vec<LegacyPermitRecord>>(input) else {
        return Vec::new();
    };
    records
        .iter()
        .filter_map(|record| record.migrate(config))
        .collect()
}

/// One year block: a 4-digit year followed by permit codes.
fn decode_year_block(block: &str, config: &EngineConfig, permits: &mut Vec<Permit>) {
    if block.len() < 4 || !block.is_char_boundary(4) {
        return;
    }
    let (year_text, codes) = block.split_at(4);
    let Ok(year) = year_text.parse::<i32>() else {
        return;
    };
    for code in PERMIT_CODE_RE.find_iter(codes) {
        if let Some(permit) = decode_permit_code(code.as_str(), year, config) {
            permits.push(permit);
        }
    }
}

/// One `[RT]` + base-36 month + base-36 day code inside a year block.
fn decode_permit_code(code: &str, year: i32, config: &EngineConfig) -> Option<Permit> {
    let mut chars = code.chars();
    let kind = PermitType::from_code_char(chars.next()?)?;
    let month = chars.next()?.to_digit(36)?;
    let day = chars.next()?.to_digit(36)?;
    permit_from_parts(year, month, day, kind, config)
}

/// `YYMMDD` decimal body of a flat code.
fn parse_flat_ymd(body: &str) -> Option<(i32, u32, u32)> {
    let year = body[..2].parse::<i32>().ok()? + 2000;
    let month = body[2..4].parse::<u32>().ok()?;
    let day = body[4..6].parse::<u32>().ok()?;
    Some((year, month, day))
}

/// `YY` + base-36 month + base-36 day body of a flat code.
fn parse_flat_base36(body: &str) -> Option<(i32, u32, u32)> {
    let year = body[..2].parse::<i32>().ok()? + 2000;
    let mut rest = body[2..].chars();
    let month = rest.next()?.to_digit(36)?;
    let day = rest.next()?.to_digit(36)?;
    Some((year, month, day))
}

/// Builds a permit from decoded parts, skipping impossible dates.
fn permit_from_parts(
    year: i32,
    month: u32,
    day: u32,
    kind: PermitType,
    config: &EngineConfig,
) -> Option<Permit> {
    let start = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(Permit::new(start, kind, config.duration_days(kind)))
}

fn base36_digit(value: u32) -> char {
    char::from_digit(value, 36).unwrap_or('0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base36_digits_cover_months_and_days() {
        assert_eq!(base36_digit(1), '1');
        assert_eq!(base36_digit(9), '9');
        assert_eq!(base36_digit(10), 'a');
        assert_eq!(base36_digit(12), 'c');
        assert_eq!(base36_digit(31), 'v');
    }

    #[test]
    fn flat_bodies_parse_both_shapes() {
        assert_eq!(parse_flat_ymd("260310"), Some((2026, 3, 10)));
        assert_eq!(parse_flat_base36("263a"), Some((2026, 3, 10)));
        assert_eq!(parse_flat_ymd("26031x"), None);
        assert_eq!(parse_flat_base36("2x3a"), None);
    }
}
