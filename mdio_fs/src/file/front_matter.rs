//! YAML front matter: locating the block and refreshing its timestamps on save.
//!
//! ```markdown
//! ---
//! title: Meeting notes
//! date: 2024-02-07 10:30:00
//! updated: 2024-02-08 09:12:44
//! tags: ''
//! categories: ''
//! ---
//! # Meeting notes
//! ```

use std::borrow::Cow;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde_yml::{Mapping, Value};
use tracing::debug;

use crate::error::{DocumentError, Result};

const DELIMITER: &str = "---";

/// Keys every rewritten block starts with, in this order.
pub const PROJECTED_KEYS: [&str; 5] = ["title", "date", "updated", "tags", "categories"];

/// Hours subtracted from `date` on every save. Timestamps without an
/// explicit offset are read as UTC and written in local time, so for a
/// UTC+8 editor this keeps `date` stable across saves.
pub const DATE_SHIFT_HOURS: i64 = 8;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses and serializes the YAML between the delimiter lines.
///
/// Keys not known to the caller must survive `serialize(parse(x))`.
pub trait FrontMatterCodec: Send + Sync {
    fn parse(&self, yaml: &str) -> Result<Mapping>;
    fn serialize(&self, mapping: &Mapping) -> Result<String>;
}

/// [`FrontMatterCodec`] backed by `serde_yml`. Mappings keep insertion order.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl FrontMatterCodec for YamlCodec {
    fn parse(&self, yaml: &str) -> Result<Mapping> {
        if yaml.trim().is_empty() {
            return Ok(Mapping::new());
        }
        let value: Value = serde_yml::from_str(yaml)
            .map_err(|e| DocumentError::MalformedFrontMatter(e.to_string()))?;
        match value {
            Value::Mapping(mapping) => Ok(mapping),
            Value::Null => Ok(Mapping::new()),
            _ => Err(DocumentError::MalformedFrontMatter(
                "front matter is not a key-value mapping".to_string(),
            )),
        }
    }

    fn serialize(&self, mapping: &Mapping) -> Result<String> {
        serde_yml::to_string(mapping).map_err(|e| DocumentError::MalformedFrontMatter(e.to_string()))
    }
}

/// Source of the `updated` timestamp. The clock's offset is also the zone
/// timestamps are written in.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// A document split at its front matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontMatterSplit<'a> {
    /// Text between the delimiter lines.
    pub yaml: &'a str,
    /// Everything after the closing delimiter line.
    pub body: &'a str,
}

/// Locate the front matter of LF-normalized text.
///
/// The text must start with a `---` line, and a later line must be exactly
/// `---`. Returns `None` when either is missing.
pub fn split_front_matter(text: &str) -> Option<FrontMatterSplit<'_>> {
    let rest = text.strip_prefix("---\n")?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.strip_suffix('\n').unwrap_or(line) == DELIMITER {
            return Some(FrontMatterSplit {
                yaml: &rest[..offset],
                body: &rest[offset + line.len()..],
            });
        }
        offset += line.len();
    }
    None
}

/// Refresh `date` and `updated` in the document's front matter.
///
/// The block is rebuilt with [`PROJECTED_KEYS`] first (absent ones as empty
/// strings) followed by the remaining keys in their original order. A
/// `date` that parses as a timestamp is shifted back [`DATE_SHIFT_HOURS`];
/// any other `date` value is kept as is. Text without front matter is
/// returned unchanged.
pub fn rewrite_front_matter<'a>(
    text: &'a str,
    codec: &dyn FrontMatterCodec,
    now: DateTime<FixedOffset>,
) -> Result<Cow<'a, str>> {
    let Some(split) = split_front_matter(text) else {
        return Ok(Cow::Borrowed(text));
    };

    let parsed = codec.parse(split.yaml)?;
    let mut merged = Mapping::new();
    for name in PROJECTED_KEYS {
        let value = parsed
            .get(name)
            .cloned()
            .unwrap_or_else(|| Value::String(String::new()));
        merged.insert(key(name), value);
    }
    for (k, v) in parsed.iter() {
        let projected = k.as_str().is_some_and(|k| PROJECTED_KEYS.contains(&k));
        if !projected {
            merged.insert(k.clone(), v.clone());
        }
    }

    let tz = now.timezone();
    let shifted = merged
        .get("date")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
        .and_then(|date| date.checked_sub_signed(TimeDelta::hours(DATE_SHIFT_HOURS)));
    match shifted {
        Some(date) => {
            let local = date.with_timezone(&tz);
            merged.insert(key("date"), Value::String(local.format(TIMESTAMP_FORMAT).to_string()));
        }
        None => debug!("front matter date is not a shiftable timestamp, leaving it as is"),
    }
    merged.insert(key("updated"), Value::String(now.format(TIMESTAMP_FORMAT).to_string()));

    let mut yaml = codec.serialize(&merged)?;
    if !yaml.ends_with('\n') {
        yaml.push('\n');
    }
    Ok(Cow::Owned(format!("{DELIMITER}\n{yaml}{DELIMITER}\n{}", split.body)))
}

/// Parse the timestamp forms front matter usually carries. Values without
/// an offset are taken as UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn key(name: &str) -> Value {
    Value::String(name.to_string())
}
