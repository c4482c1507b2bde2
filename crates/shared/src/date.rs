use time::{OffsetDateTime, PrimitiveDateTime, macros::format_description};

pub fn now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// Parses the value of an `<input type="datetime-local">`, read as UTC.
/// Seconds are optional.
pub fn parse_datetime_local(value: &str) -> Option<i64> {
    let value = value.trim();
    let minutes = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    let seconds = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

    PrimitiveDateTime::parse(value, minutes)
        .or_else(|_| PrimitiveDateTime::parse(value, seconds))
        .ok()
        .map(|dt| dt.assume_utc().unix_timestamp())
}

/// Inverse of [`parse_datetime_local`], used to pre-fill edit forms.
pub fn format_datetime_local(timestamp: i64) -> String {
    let Ok(dt) = OffsetDateTime::from_unix_timestamp(timestamp) else {
        return String::new();
    };

    dt.format(format_description!("[year]-[month]-[day]T[hour]:[minute]"))
        .unwrap_or_default()
}

pub fn format_date(timestamp: i64) -> String {
    let Ok(dt) = OffsetDateTime::from_unix_timestamp(timestamp) else {
        return String::new();
    };

    dt.format(format_description!("[month repr:short] [day padding:none], [year]"))
        .unwrap_or_default()
}

pub fn format_datetime(timestamp: i64) -> String {
    let Ok(dt) = OffsetDateTime::from_unix_timestamp(timestamp) else {
        return String::new();
    };

    dt.format(format_description!(
        "[month repr:short] [day padding:none], [year] [hour]:[minute]"
    ))
    .unwrap_or_default()
}
