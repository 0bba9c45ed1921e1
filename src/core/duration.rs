//! Track duration helpers.

/// Formats milliseconds as `m:ss`, or `h:mm:ss` from one hour up.
#[must_use]
pub fn format_duration(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Parses a user-supplied duration into milliseconds.
///
/// Accepts plain seconds (`"210"`), `m:ss` (`"3:30"`) and `h:mm:ss` (`"1:02:03"`).
/// Minutes and seconds after the first field must be below 60.
#[must_use]
pub fn parse_duration(input: &str) -> Option<u64> {
    let parts: Vec<&str> = input.trim().split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let mut seconds: u64 = 0;
    for (index, part) in parts.iter().enumerate() {
        let value: u64 = part.parse().ok()?;
        if index > 0 && value >= 60 {
            return None;
        }
        seconds = seconds.checked_mul(60)?.checked_add(value)?;
    }
    seconds.checked_mul(1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(5_000), "0:05");
        assert_eq!(format_duration(212_000), "3:32");
        assert_eq!(format_duration(3_723_000), "1:02:03");
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("210"), Some(210_000));
        assert_eq!(parse_duration("3:30"), Some(210_000));
        assert_eq!(parse_duration(" 1:02:03 "), Some(3_723_000));
        assert_eq!(parse_duration("1:60"), None);
        assert_eq!(parse_duration("abc"), None);
        assert_eq!(parse_duration("1:2:3:4"), None);
        assert_eq!(parse_duration(""), None);
    }
}
