// Display-side date logic: relative labels and locale date parsing

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Timelike};

/// German weekday names, indexed by days since Sunday.
const WEEKDAYS: [&str; 7] = [
    "Sonntag",
    "Montag",
    "Dienstag",
    "Mittwoch",
    "Donnerstag",
    "Freitag",
    "Samstag",
];

/// Human-friendly label for a stored timestamp, relative to `Local::now()`.
pub fn relative_label(iso: &str) -> String {
    relative_label_at(iso, Local::now())
}

/// Same as [`relative_label`], with the reference instant injected.
///
/// Labels, by calendar-day distance from `now`:
/// - same day: `Heute, HH:MM Uhr`
/// - one day back: `Gestern, HH:MM Uhr`
/// - two days back: `Vorgestern, HH:MM Uhr`
/// - within the last seven days: `<Wochentag>, DD.MM.YYYY, HH:MM Uhr`
/// - anything older: `DD.MM.YYYY, HH:MM Uhr`
///
/// Unparseable input is returned unchanged; this function never fails.
pub fn relative_label_at(iso: &str, now: DateTime<Local>) -> String {
    let instant = match DateTime::parse_from_rfc3339(iso) {
        Ok(dt) => dt.with_timezone(&Local),
        Err(_) => return iso.to_string(),
    };

    let today = now.date_naive();
    let yesterday = today - Duration::days(1);
    let day_before = today - Duration::days(2);
    let week_ago = today - Duration::days(7);

    // Compare on the calendar day only, time of day stripped.
    let day = instant.date_naive();
    let time = format!("{:02}:{:02} Uhr", instant.hour(), instant.minute());

    if day == today {
        format!("Heute, {}", time)
    } else if day == yesterday {
        format!("Gestern, {}", time)
    } else if day == day_before {
        format!("Vorgestern, {}", time)
    } else if day >= week_ago {
        let weekday = WEEKDAYS[day.weekday().num_days_from_sunday() as usize];
        format!("{}, {}, {}", weekday, format_day(day), time)
    } else {
        format!("{}, {}", format_day(day), time)
    }
}

fn format_day(day: NaiveDate) -> String {
    format!("{:02}.{:02}.{}", day.day(), day.month(), day.year())
}

/// Parse a `DD.MM.YY` or `DD.MM.YYYY` filter input into a calendar day.
///
/// Two-digit years below 50 land in the 2000s, 50 through 99 in the 1900s.
/// Empty, malformed, or out-of-range input yields `None`, never an error;
/// callers treat a `None` bound as absent.
pub fn parse_display_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let parts: Vec<&str> = input.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let day: u32 = parts[0].trim().parse().ok()?;
    let month: u32 = parts[1].trim().parse().ok()?;
    let mut year: i32 = parts[2].trim().parse().ok()?;

    if (0..100).contains(&year) {
        year += if year < 50 { 2000 } else { 1900 };
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    /// Reference instant for all label tests: Saturday, 2025-08-30 15:00.
    fn now() -> DateTime<Local> {
        local(2025, 8, 30, 15, 0)
    }

    fn label_for(instant: DateTime<Local>) -> String {
        relative_label_at(&instant.to_rfc3339(), now())
    }

    #[test]
    fn test_today_label() {
        assert_eq!(label_for(local(2025, 8, 30, 14, 32)), "Heute, 14:32 Uhr");
    }

    #[test]
    fn test_yesterday_and_day_before_labels() {
        assert_eq!(label_for(local(2025, 8, 29, 8, 15)), "Gestern, 08:15 Uhr");
        assert_eq!(label_for(local(2025, 8, 28, 19, 45)), "Vorgestern, 19:45 Uhr");
    }

    #[test]
    fn test_last_week_gets_weekday_form() {
        // 2025-08-25 is a Monday, five days before the reference day.
        assert_eq!(
            label_for(local(2025, 8, 25, 11, 0)),
            "Montag, 25.08.2025, 11:00 Uhr"
        );
        // Exactly seven days back is still inside the window.
        assert_eq!(
            label_for(local(2025, 8, 23, 9, 5)),
            "Samstag, 23.08.2025, 09:05 Uhr"
        );
    }

    #[test]
    fn test_older_than_a_week_is_plain_date() {
        // Eight days back: no weekday prefix.
        assert_eq!(label_for(local(2025, 8, 22, 9, 30)), "22.08.2025, 09:30 Uhr");
        assert_eq!(label_for(local(2024, 12, 1, 23, 59)), "01.12.2024, 23:59 Uhr");
    }

    #[test]
    fn test_minutes_and_hours_are_zero_padded() {
        assert_eq!(label_for(local(2025, 8, 30, 7, 5)), "Heute, 07:05 Uhr");
    }

    #[test]
    fn test_malformed_timestamp_echoes_input() {
        assert_eq!(relative_label_at("kein Datum", now()), "kein Datum");
        assert_eq!(relative_label_at("", now()), "");
    }

    #[test]
    fn test_parse_two_and_four_digit_years_agree() {
        assert_eq!(
            parse_display_date("24.08.25"),
            parse_display_date("24.08.2025")
        );
        assert_eq!(
            parse_display_date("24.08.25"),
            NaiveDate::from_ymd_opt(2025, 8, 24)
        );
    }

    #[test]
    fn test_parse_century_split_at_fifty() {
        assert_eq!(
            parse_display_date("01.01.49"),
            NaiveDate::from_ymd_opt(2049, 1, 1)
        );
        assert_eq!(
            parse_display_date("01.01.50"),
            NaiveDate::from_ymd_opt(1950, 1, 1)
        );
        assert_eq!(
            parse_display_date("01.01.99"),
            NaiveDate::from_ymd_opt(1999, 1, 1)
        );
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert_eq!(parse_display_date(""), None);
        assert_eq!(parse_display_date("   "), None);
        assert_eq!(parse_display_date("24.08"), None);
        assert_eq!(parse_display_date("24.08.20.25"), None);
        assert_eq!(parse_display_date("a.b.c"), None);
    }

    #[test]
    fn test_parse_rejects_out_of_range_day() {
        // Checked construction: no silent rollover into March.
        assert_eq!(parse_display_date("31.02.25"), None);
        assert_eq!(parse_display_date("01.13.25"), None);
    }
}
