// libs/availability-cell/src/services/timefmt.rs
//
// Time-of-day arithmetic over the backend's 24h "HH:MM[:SS]" strings.
// Seconds are ignored precision and truncated, never rounded.
use tracing::warn;

/// Parse a 24h time string into minutes since midnight.
///
/// Malformed or out-of-range hour and minute fields fall back to minute 0
/// rather than failing the whole expansion; the slot ends up at the very
/// start of the day.
pub fn minutes_since_midnight(time: &str) -> u32 {
    let mut parts = time.split(':');
    let hour = parts.next().and_then(|p| p.trim().parse::<u32>().ok());
    let minute = parts.next().and_then(|p| p.trim().parse::<u32>().ok());

    match (hour, minute) {
        (Some(h), Some(m)) if h < 24 && m < 60 => h * 60 + m,
        _ => {
            warn!("malformed time string {:?}, treating as midnight", time);
            0
        }
    }
}

/// Convert "HH:MM[:SS]" into a 12-hour clock label: "h:MM AM/PM".
pub fn format_12h(time: &str) -> String {
    let total = minutes_since_midnight(time);
    let hour = (total / 60) % 24;
    let minute = total % 60;

    let meridiem = if hour < 12 { "AM" } else { "PM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };

    format!("{}:{:02} {}", display_hour, minute, meridiem)
}

/// "start - end" label for a bookable window.
pub fn display_range(start: &str, end: &str) -> String {
    format!("{} - {}", format_12h(start), format_12h(end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_wire_precisions() {
        assert_eq!(minutes_since_midnight("09:00"), 540);
        assert_eq!(minutes_since_midnight("09:00:45"), 540);
        assert_eq!(minutes_since_midnight("23:59"), 1439);
    }

    #[test]
    fn malformed_times_fall_back_to_midnight() {
        assert_eq!(minutes_since_midnight("garbage"), 0);
        assert_eq!(minutes_since_midnight("ab:cd"), 0);
        assert_eq!(minutes_since_midnight(""), 0);
    }

    #[test]
    fn out_of_range_fields_fall_back_instead_of_overflowing() {
        assert_eq!(minutes_since_midnight("71582789:00"), 0);
        assert_eq!(minutes_since_midnight("24:00"), 0);
        assert_eq!(minutes_since_midnight("10:75"), 0);
        assert_eq!(minutes_since_midnight(&format!("{}:59", u32::MAX)), 0);
    }

    #[test]
    fn twelve_hour_labels_handle_midnight_and_noon() {
        assert_eq!(format_12h("00:05"), "12:05 AM");
        assert_eq!(format_12h("12:00"), "12:00 PM");
        assert_eq!(format_12h("23:59"), "11:59 PM");
        assert_eq!(format_12h("08:00"), "8:00 AM");
    }

    #[test]
    fn range_labels_join_both_ends() {
        assert_eq!(display_range("08:00", "12:00"), "8:00 AM - 12:00 PM");
        assert_eq!(display_range("09:00:00", "09:30:00"), "9:00 AM - 9:30 AM");
    }
}
