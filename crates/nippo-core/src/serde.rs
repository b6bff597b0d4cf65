// This module shadows the `serde` crate; refer to the external crate as `::serde`.
use ::serde::Serializer;
use chrono::{DateTime, Utc};

/// Display format used by list and detail screens.
pub const DISPLAY_MINUTES: &str = "%Y-%m-%d %H:%M";

/// Serialize `DateTime<Utc>` as `YYYY-MM-DD HH:MM` for templates.
pub fn to_display_minutes<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.collect_str(&dt.format(DISPLAY_MINUTES))
}
