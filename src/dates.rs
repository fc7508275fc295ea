use chrono::{Datelike, Days, NaiveDate};

const MONTH_ABBREVS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Parse an ISO date string (YYYY-MM-DD). Stored dates are always local
/// calendar dates, never instants, so no timezone is involved.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

pub fn to_iso_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    if days >= 0 {
        date.checked_add_days(Days::new(days as u64)).unwrap_or(date)
    } else {
        date.checked_sub_days(Days::new((-days) as u64)).unwrap_or(date)
    }
}

/// Monday of the week containing `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    let dow = weekday_index(date);
    add_days(date, -(dow as i64))
}

/// 0 = Monday .. 6 = Sunday.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

fn format_month_day(date: NaiveDate, today: NaiveDate) -> String {
    let month = MONTH_ABBREVS[date.month0() as usize];
    if date.year() != today.year() {
        format!("{} {}, {}", month, date.day(), date.year())
    } else {
        format!("{} {}", month, date.day())
    }
}

/// Human-friendly relative date: "Today", "Yesterday", "Feb 6", or
/// "Dec 25, 2024" for dates outside the current year.
pub fn format_relative_date(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        return "Today".to_string();
    }
    if date == add_days(today, -1) {
        return "Yesterday".to_string();
    }
    format_month_day(date, today)
}

/// Format a Monday-anchored week as a range: "Feb 3 – 9" within a month,
/// "Dec 29 – Jan 4" across a month boundary.
pub fn format_week_range(monday: NaiveDate) -> String {
    let sunday = add_days(monday, 6);
    let start_month = MONTH_ABBREVS[monday.month0() as usize];
    if monday.month() == sunday.month() {
        format!("{} {} – {}", start_month, monday.day(), sunday.day())
    } else {
        let end_month = MONTH_ABBREVS[sunday.month0() as usize];
        format!("{} {} – {} {}", start_month, monday.day(), end_month, sunday.day())
    }
}
