/// Parse `[HH:]MM:SS<sep>mmm` into milliseconds.
///
/// `separator` is `,` for SRT and `.` for WebVTT. Hours are optional only
/// when `hours_optional` is set.
pub fn parse_timestamp(value: &str, separator: char, hours_optional: bool) -> Option<u64> {
    let (clock, millis) = value.trim().split_once(separator)?;
    if millis.len() != 3 {
        return None;
    }
    let millis = parse_digits(millis)?;

    let fields: Vec<&str> = clock.split(':').collect();
    let (hours, minutes, seconds) = match fields.as_slice() {
        [h, m, s] => (parse_digits(h)?, parse_digits(m)?, parse_digits(s)?),
        [m, s] if hours_optional => (0, parse_digits(m)?, parse_digits(s)?),
        _ => return None,
    };
    if minutes >= 60 || seconds >= 60 {
        return None;
    }

    hours
        .checked_mul(60)?
        .checked_add(minutes)?
        .checked_mul(60)?
        .checked_add(seconds)?
        .checked_mul(1000)?
        .checked_add(millis)
}

/// Split a `start --> end [settings]` line into its two timestamps.
pub fn split_timing_line(line: &str) -> Option<(&str, &str)> {
    let (start, rest) = line.split_once("-->")?;
    let end = rest.split_whitespace().next()?;
    Some((start.trim(), end))
}

fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
