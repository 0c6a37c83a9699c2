use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub const SECS_PER_DAY: i64 = 24 * 60 * 60;

/// Default look-back window when neither a day count nor an explicit floor is given.
pub const DEFAULT_MAX_DAYS: u32 = 7;

/// Current time as whole UTC epoch seconds.
pub fn now_epoch() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// Epoch seconds `days` before `now`.
pub fn age_floor_from_days(now: i64, days: u32) -> i64 {
    now - i64::from(days) * SECS_PER_DAY
}

/// RFC3339 rendering for log lines; falls back to the raw number.
pub fn epoch_to_rfc3339(ts: i64) -> String {
    OffsetDateTime::from_unix_timestamp(ts)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
        .unwrap_or_else(|| ts.to_string())
}
