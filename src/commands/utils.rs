use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// KST (UTC+9). Timestamps generated by the entity layer use Korean wall
/// clock time regardless of where the server runs.
pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("KST offset")
}

pub fn kst_now() -> NaiveDateTime {
    let now: DateTime<FixedOffset> = Utc::now().with_timezone(&kst());
    now.naive_local()
}

pub fn kst_today() -> NaiveDate {
    kst_now().date()
}

pub fn parse_date_safe(date_str: &str) -> Option<NaiveDate> {
    if date_str.trim().is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_str, "%Y%m%d"))
        .ok()
}

pub fn parse_datetime_safe(s: &str) -> Option<NaiveDateTime> {
    if s.trim().is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| parse_date_safe(s).and_then(|d| d.and_hms_opt(0, 0, 0)))
}
