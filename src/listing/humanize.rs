//! Human-readable sizes and relative times
//!
//! Both formatters are pure; they never fail.

use std::time::SystemTime;

const SI_UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];
const IEC_UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// Format a byte count with decimal (SI) units, e.g. `1.5 kB`, `12 MB`
pub fn bytes(size: u64) -> String {
    humanate(size, 1000, &SI_UNITS)
}

/// Format a byte count with binary (IEC) units, e.g. `1.5 KiB`, `12 MiB`
pub fn iec_bytes(size: u64) -> String {
    humanate(size, 1024, &IEC_UNITS)
}

/// Values under ten units keep one decimal place, larger ones none.
#[allow(clippy::cast_precision_loss)]
fn humanate(size: u64, base: u64, units: &[&str]) -> String {
    if size < 10 {
        return format!("{size} B");
    }

    let mut exp = 0;
    let mut divisor = 1_u64;
    while exp + 1 < units.len() && size / divisor >= base {
        divisor *= base;
        exp += 1;
    }

    let value = (size as f64 / divisor as f64).mul_add(10.0, 0.5).floor() / 10.0;
    if value < 10.0 {
        format!("{value:.1} {}", units[exp])
    } else {
        format!("{value:.0} {}", units[exp])
    }
}

const SECOND: u64 = 1;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;
const MONTH: u64 = 30 * DAY;
const YEAR: u64 = 12 * MONTH;
const LONG_TIME: u64 = 37 * YEAR;

/// (upper bound, text, divisor); a zero divisor means the text is used as-is
const MAGNITUDES: [(u64, &str, u64); 15] = [
    (2 * SECOND, "1 second", 0),
    (MINUTE, "seconds", SECOND),
    (2 * MINUTE, "1 minute", 0),
    (HOUR, "minutes", MINUTE),
    (2 * HOUR, "1 hour", 0),
    (DAY, "hours", HOUR),
    (2 * DAY, "1 day", 0),
    (WEEK, "days", DAY),
    (2 * WEEK, "1 week", 0),
    (MONTH, "weeks", WEEK),
    (2 * MONTH, "1 month", 0),
    (YEAR, "months", MONTH),
    (18 * MONTH, "1 year", 0),
    (2 * YEAR, "2 years", 0),
    (LONG_TIME, "years", YEAR),
];

/// Describe `then` relative to `now`, e.g. `3 minutes ago` or `2 days from now`
pub fn relative_time(then: SystemTime, now: SystemTime) -> String {
    let (elapsed, direction) = match now.duration_since(then) {
        Ok(d) => (d, "ago"),
        Err(e) => (e.duration(), "from now"),
    };

    let secs = elapsed.as_secs();
    if secs < SECOND {
        return "now".to_string();
    }

    for (bound, text, divisor) in MAGNITUDES {
        if secs < bound {
            return if divisor == 0 {
                format!("{text} {direction}")
            } else {
                format!("{} {text} {direction}", secs / divisor)
            };
        }
    }

    format!("a long while {direction}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_small_sizes() {
        assert_eq!(bytes(0), "0 B");
        assert_eq!(bytes(9), "9 B");
        assert_eq!(bytes(10), "10 B");
        assert_eq!(bytes(999), "999 B");
    }

    #[test]
    fn test_decimal_units() {
        assert_eq!(bytes(1000), "1.0 kB");
        assert_eq!(bytes(1500), "1.5 kB");
        assert_eq!(bytes(82_854_982), "83 MB");
        assert_eq!(bytes(12_000_000), "12 MB");
        assert_eq!(bytes(u64::MAX), "18 EB");
    }

    #[test]
    fn test_binary_units() {
        assert_eq!(iec_bytes(1023), "1023 B");
        assert_eq!(iec_bytes(1024), "1.0 KiB");
        assert_eq!(iec_bytes(1536), "1.5 KiB");
        assert_eq!(iec_bytes(5 * 1024 * 1024), "5.0 MiB");
        assert_eq!(iec_bytes(700 * 1024 * 1024), "700 MiB");
    }

    fn ago(secs: u64) -> String {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(10 * LONG_TIME);
        relative_time(now - Duration::from_secs(secs), now)
    }

    #[test]
    fn test_relative_past() {
        assert_eq!(ago(0), "now");
        assert_eq!(ago(1), "1 second ago");
        assert_eq!(ago(30), "30 seconds ago");
        assert_eq!(ago(90), "1 minute ago");
        assert_eq!(ago(5 * MINUTE), "5 minutes ago");
        assert_eq!(ago(3 * HOUR + 5), "3 hours ago");
        assert_eq!(ago(DAY), "1 day ago");
        assert_eq!(ago(3 * DAY), "3 days ago");
        assert_eq!(ago(WEEK), "1 week ago");
        assert_eq!(ago(3 * WEEK), "3 weeks ago");
        assert_eq!(ago(MONTH), "1 month ago");
        assert_eq!(ago(5 * MONTH), "5 months ago");
        assert_eq!(ago(YEAR), "1 year ago");
        assert_eq!(ago(20 * MONTH), "2 years ago");
        assert_eq!(ago(5 * YEAR), "5 years ago");
        assert_eq!(ago(40 * YEAR), "a long while ago");
    }

    #[test]
    fn test_relative_future() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        let later = now + Duration::from_secs(2 * HOUR);
        assert_eq!(relative_time(later, now), "2 hours from now");
    }

    #[test]
    fn test_subsecond_is_now() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
        assert_eq!(relative_time(now - Duration::from_millis(400), now), "now");
        assert_eq!(relative_time(now + Duration::from_millis(400), now), "now");
    }
}
