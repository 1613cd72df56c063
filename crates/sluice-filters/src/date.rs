//! Date filters: assemble `{year, month, day, ...}` selects into ISO strings.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::{Map, Value};
use sluice_core::{parse_options, Filter, FilterError, Options, Result};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SelectOptions {
    null_on_empty: bool,
    null_on_all_empty: bool,
}

/// Which fields a select carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectKind {
    /// `year`, `month` → `YYYY-MM`
    Month,
    /// `year`, `month`, `day` → `YYYY-MM-DD`
    Date,
    /// plus `hour`, `minute`, optional `second` → `YYYY-MM-DD HH:MM:SS`
    DateTime,
}

impl SelectKind {
    fn required(self) -> &'static [&'static str] {
        match self {
            Self::Month => &["year", "month"],
            Self::Date => &["year", "month", "day"],
            Self::DateTime => &["year", "month", "day", "hour", "minute"],
        }
    }

    fn filter_name(self) -> &'static str {
        match self {
            Self::Month => "MonthSelect",
            Self::Date => "DateSelect",
            Self::DateTime => "DateTimeSelect",
        }
    }
}

/// Text of a select element; `None` when missing, null or blank.
fn element(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Assemble a date (or month, or date-time) from an object of select values.
///
/// Non-object input passes through. Missing elements are an error unless one
/// of the null-on-empty options turns the result into `null`.
#[derive(Debug, Clone)]
pub struct DateSelect {
    kind: SelectKind,
    null_on_empty: bool,
    null_on_all_empty: bool,
}

impl DateSelect {
    pub fn new(kind: SelectKind) -> Self {
        Self { kind, null_on_empty: false, null_on_all_empty: false }
    }

    pub fn null_on_empty(mut self, on: bool) -> Self {
        self.null_on_empty = on;
        self
    }

    pub fn null_on_all_empty(mut self, on: bool) -> Self {
        self.null_on_all_empty = on;
        self
    }

    pub fn from_options(kind: SelectKind, options: &Options) -> Result<Self> {
        let opts: SelectOptions = parse_options(kind.filter_name(), options)?;
        Ok(Self::new(kind)
            .null_on_empty(opts.null_on_empty)
            .null_on_all_empty(opts.null_on_all_empty))
    }

    fn number<T: std::str::FromStr>(&self, key: &str, raw: &str) -> Result<T> {
        raw.parse().map_err(|_| {
            FilterError::invalid_argument(format!(
                "{}: {key} is not a number: {raw}",
                self.kind.filter_name()
            ))
        })
    }

    fn assemble(&self, map: &Map<String, Value>) -> Result<Value> {
        let name = self.kind.filter_name();
        let required = self.kind.required();
        let present: Vec<Option<String>> = required.iter().map(|k| element(map, k)).collect();

        if self.null_on_empty && present.iter().any(Option::is_none) {
            return Ok(Value::Null);
        }
        if self.null_on_all_empty && present.iter().all(Option::is_none) {
            return Ok(Value::Null);
        }

        let missing: Vec<&str> = required
            .iter()
            .zip(&present)
            .filter(|(_, v)| v.is_none())
            .map(|(k, _)| *k)
            .collect();
        if !missing.is_empty() {
            return Err(FilterError::invalid_argument(format!(
                "{name}: missing elements: {}",
                missing.join(", ")
            )));
        }
        let get = |key: &str| element(map, key).unwrap_or_default();

        let year: i32 = self.number("year", &get("year"))?;
        let month: u32 = self.number("month", &get("month"))?;
        let day: u32 = match self.kind {
            SelectKind::Month => 1,
            _ => self.number("day", &get("day"))?,
        };
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            FilterError::invalid_argument(format!("{name}: invalid date {year}-{month}-{day}"))
        })?;

        let formatted = match self.kind {
            SelectKind::Month => date.format("%Y-%m").to_string(),
            SelectKind::Date => date.format("%Y-%m-%d").to_string(),
            SelectKind::DateTime => {
                let hour: u32 = self.number("hour", &get("hour"))?;
                let minute: u32 = self.number("minute", &get("minute"))?;
                let second: u32 = match element(map, "second") {
                    Some(raw) => self.number("second", &raw)?,
                    None => 0,
                };
                let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
                    FilterError::invalid_argument(format!(
                        "{name}: invalid time {hour}:{minute}:{second}"
                    ))
                })?;
                date.and_time(time).format("%Y-%m-%d %H:%M:%S").to_string()
            }
        };
        Ok(Value::String(formatted))
    }
}

impl Filter for DateSelect {
    fn filter(&self, value: Value) -> Result<Value> {
        match &value {
            Value::Object(map) => self.assemble(map),
            _ => Ok(value),
        }
    }

    fn name(&self) -> &str {
        self.kind.filter_name()
    }
}
