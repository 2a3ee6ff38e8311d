use chrono::{DateTime, Datelike, Local, NaiveDateTime, TimeZone, Timelike};

/// Elapsed time of a run as seconds with millisecond precision, e.g. `12.048s`.
/// An unfinished run reports `-`.
pub fn format_duration(started_at: DateTime<Local>, ended_at: Option<DateTime<Local>>) -> String {
    match ended_at {
        Some(ended) => format!(
            "{:.3}s",
            (ended - started_at).num_milliseconds() as f64 / 1000.0
        ),
        None => "-".to_string(),
    }
}

/// Timestamp that prefixes commit messages: `YYYYMMDD_HH:MM:SS.mmm`.
pub fn commit_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    let naive: NaiveDateTime = at.naive_local();
    format!(
        "{:04}{:02}{:02}_{:02}:{:02}:{:02}.{:03}",
        naive.year(),
        naive.month(),
        naive.day(),
        naive.hour(),
        naive.minute(),
        naive.second(),
        naive.nanosecond() / 1_000_000 % 1000
    )
}
