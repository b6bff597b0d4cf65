//! Request parameters and their coercion helpers.

use std::collections::HashMap;

use chrono::{Local, NaiveDate};

/// Calendar date format accepted by [`to_local_date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parameter names read by the front controller and the actions.
pub mod name {
    pub const ACTION: &str = "action";
    pub const COMMAND: &str = "command";
    pub const TOKEN: &str = "token";
    pub const PAGE: &str = "page";
    pub const FILTER: &str = "filter";
    pub const EMP_ID: &str = "id";
    pub const EMP_CODE: &str = "code";
    pub const EMP_NAME: &str = "name";
    pub const EMP_PASS: &str = "password";
    pub const EMP_ADMIN_FLG: &str = "admin_flag";
}

/// Merged query-string and form-body parameters. A name present in both
/// resolves to the query-string value.
///
/// Only flat `name=value` pairs are kept. Bracketed names such as `x[y]`
/// are dropped, since no command reads structured parameters.
#[derive(Debug, Clone, Default)]
pub struct Params(HashMap<String, String>);

impl Params {
    pub fn parse(query: Option<&str>, body: Option<&str>) -> Result<Self, serde_qs::Error> {
        let mut merged: HashMap<String, String> = HashMap::new();
        for source in [body, query].into_iter().flatten() {
            if source.is_empty() {
                continue;
            }
            let flat = flat_pairs(source);
            if flat.is_empty() {
                continue;
            }
            let parsed: HashMap<String, String> = serde_qs::from_str(&flat)?;
            merged.extend(parsed);
        }
        Ok(Self(merged))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

/// `source` without the pairs whose name is bracketed, raw or percent-encoded.
fn flat_pairs(source: &str) -> String {
    source
        .split('&')
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or_default().to_ascii_lowercase();
            let flat = !(key.contains('[')
                || key.contains(']')
                || key.contains("%5b")
                || key.contains("%5d"));
            if !flat {
                tracing::debug!(%pair, "ignoring structured parameter");
            }
            flat
        })
        .collect::<Vec<_>>()
        .join("&")
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Parse an integer parameter. Absent or malformed input yields `None`.
pub fn to_number(value: Option<&str>) -> Option<i32> {
    value?.parse().ok()
}

/// Parse a `YYYY-MM-DD` date. Absent or empty input means today (local time).
pub fn to_local_date(value: Option<&str>) -> Result<NaiveDate, chrono::ParseError> {
    match value {
        None | Some("") => Ok(Local::now().date_naive()),
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT),
    }
}

/// Requested page number; 1 when absent, malformed or below 1.
pub fn page_number(value: Option<&str>) -> u64 {
    to_number(value)
        .and_then(|n| u64::try_from(n).ok())
        .filter(|n| *n >= 1)
        .unwrap_or(1)
}
