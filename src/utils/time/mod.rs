// Time utilities
// Minute-of-day arithmetic and 12h/24h parsing/formatting

/// Minutes in a full day. Doubles as the reserved "end of day" value: an
/// event ending at 1440 runs to midnight, which is distinct from minute 0.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Fixed base step for layout and positioning (events stay minute-accurate).
pub const BASE_STEP_MIN: u16 = 15;

/// Click-to-create positions snap to this increment.
pub const SNAP_STEP_MIN: u16 = 5;

/// Parse time input accepting:
/// - 24h: "07:39", "7:39"
/// - 12h: "7:39 AM", "12:05 pm", also "12:00AM"
/// - end-only: "24:00" (only if `allow24`)
///
/// Minutes must be two digits, `00`-`59`. Anything else is invalid.
pub fn parse_time(text: &str, allow24: bool) -> Option<u16> {
    let s = text.trim().to_ascii_uppercase();
    if s.is_empty() {
        return None;
    }

    if allow24 && s == "24:00" {
        return Some(MINUTES_PER_DAY);
    }

    // Split an optional AM/PM marker off the end; the space before it is
    // optional too.
    let (clock, period) = if let Some(rest) = s.strip_suffix("AM") {
        (rest.trim_end(), Some(false))
    } else if let Some(rest) = s.strip_suffix("PM") {
        (rest.trim_end(), Some(true))
    } else {
        (s.as_str(), None)
    };

    let (hh_str, mm_str) = clock.split_once(':')?;
    if hh_str.is_empty()
        || hh_str.len() > 2
        || mm_str.len() != 2
        || !hh_str.bytes().all(|b| b.is_ascii_digit())
        || !mm_str.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let mut hh: u16 = hh_str.parse().ok()?;
    let mm: u16 = mm_str.parse().ok()?;
    if mm > 59 {
        return None;
    }

    match period {
        Some(pm) => {
            if !(1..=12).contains(&hh) {
                return None;
            }
            // 12 AM is midnight, 12 PM is noon.
            hh = match (hh, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, false) => h,
                (h, true) => h + 12,
            };
        }
        None => {
            if hh > 23 {
                return None;
            }
        }
    }

    Some(hh * 60 + mm)
}

/// Format minutes-of-day for display.
///
/// When `allow24_label` and `minutes == 1440`, renders the end-of-day
/// sentinel as "12:00 AM" (12h) or "24:00" (24h) instead of wrapping to
/// midnight. Otherwise minutes are normalized into `[0, 1440)` first.
pub fn format_time(minutes: u16, use12h: bool, allow24_label: bool) -> String {
    if allow24_label && minutes == MINUTES_PER_DAY {
        return if use12h { "12:00 AM" } else { "24:00" }.to_string();
    }

    let safe = minutes % MINUTES_PER_DAY;
    let hh = safe / 60;
    let mm = safe % 60;

    if !use12h {
        return format!("{hh:02}:{mm:02}");
    }

    let period = if hh >= 12 { "PM" } else { "AM" };
    let hour12 = if hh % 12 == 0 { 12 } else { hh % 12 };
    format!("{hour12}:{mm:02} {period}")
}

/// Canonical displayable form for time inputs and settings snapshots.
/// 24h mode never carries an AM/PM marker; 12h mode always does.
pub fn to_input_string(minutes: u16, use12h: bool, allow24: bool) -> String {
    if use12h {
        format_time(minutes, true, allow24)
    } else if allow24 && minutes == MINUTES_PER_DAY {
        "24:00".to_string()
    } else {
        format_time(minutes, false, false)
    }
}

/// Strict half-open interval overlap: touching endpoints do not overlap.
pub fn overlaps(a_start: u16, a_end: u16, b_start: u16, b_end: u16) -> bool {
    a_start < b_end && a_end > b_start
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("07:39", 459; "padded 24h")]
    #[test_case("7:39", 459; "unpadded 24h")]
    #[test_case("0:00", 0; "midnight 24h")]
    #[test_case("23:59", 1439; "last minute 24h")]
    #[test_case("7:39 AM", 459; "morning 12h")]
    #[test_case("7:39 PM", 1179; "evening 12h")]
    #[test_case("12:05 pm", 725; "lowercase pm")]
    #[test_case("12:00AM", 0; "no space before marker")]
    #[test_case("12:00 PM", 720; "noon")]
    #[test_case("  9:15 am  ", 555; "surrounding whitespace")]
    fn parse_valid(input: &str, expected: u16) {
        assert_eq!(parse_time(input, false), Some(expected));
    }

    #[test_case(""; "empty")]
    #[test_case("24:00"; "sentinel without allow24")]
    #[test_case("25:00"; "hour out of range")]
    #[test_case("7:60"; "minute out of range")]
    #[test_case("7:5"; "single digit minute")]
    #[test_case("007:39"; "three digit hour")]
    #[test_case("0:00 AM"; "12h hour zero")]
    #[test_case("13:00 PM"; "12h hour thirteen")]
    #[test_case("seven"; "not a time")]
    #[test_case("7-39"; "wrong separator")]
    fn parse_invalid(input: &str) {
        assert_eq!(parse_time(input, false), None);
    }

    #[test]
    fn parse_end_of_day_sentinel() {
        assert_eq!(parse_time("24:00", true), Some(1440));
        assert_eq!(parse_time("24:00", false), None);
        // The sentinel is the literal token only; 24:01 never parses.
        assert_eq!(parse_time("24:01", true), None);
    }

    #[test]
    fn format_24h_is_zero_padded() {
        assert_eq!(format_time(459, false, false), "07:39");
        assert_eq!(format_time(0, false, false), "00:00");
        assert_eq!(format_time(1439, false, false), "23:59");
    }

    #[test]
    fn format_12h() {
        assert_eq!(format_time(0, true, false), "12:00 AM");
        assert_eq!(format_time(720, true, false), "12:00 PM");
        assert_eq!(format_time(1179, true, false), "7:39 PM");
    }

    #[test]
    fn format_end_of_day_label() {
        assert_eq!(format_time(1440, false, true), "24:00");
        assert_eq!(format_time(1440, true, true), "12:00 AM");
        // Without the label flag 1440 wraps to midnight.
        assert_eq!(format_time(1440, false, false), "00:00");
    }

    #[test]
    fn every_minute_round_trips_through_12h() {
        for m in 0..MINUTES_PER_DAY {
            let text = format_time(m, true, false);
            assert_eq!(parse_time(&text, false), Some(m), "minute {m} via {text:?}");
        }
    }

    #[test]
    fn input_string_modes() {
        assert_eq!(to_input_string(1440, false, true), "24:00");
        assert_eq!(to_input_string(1440, true, true), "12:00 AM");
        assert_eq!(to_input_string(1440, false, false), "00:00");
        assert_eq!(to_input_string(540, false, false), "09:00");
        assert_eq!(to_input_string(540, true, false), "9:00 AM");
    }

    #[test]
    fn overlap_is_strict() {
        assert!(!overlaps(0, 60, 60, 120));
        assert!(!overlaps(60, 120, 0, 60));
        assert!(overlaps(0, 60, 30, 90));
        assert!(overlaps(30, 90, 0, 60));
        assert!(overlaps(0, 120, 30, 60));
    }
}
