use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Parse an instant given on the command line.
///
/// Accepts RFC 3339 (`2025-09-14T18:30:00Z`, `...+02:00`), a bare
/// `YYYY-MM-DDTHH:MM:SS[.fff]` taken as UTC, and `now`, `now+10m`, `now-1h`.
pub fn parse_instant(s: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
    let s = s.trim();

    if let Some(rest) = s
        .get(..3)
        .filter(|head| head.eq_ignore_ascii_case("now"))
        .map(|_| s[3..].trim())
    {
        if rest.is_empty() {
            return Ok(now);
        }
        let (neg, rest) = match rest.strip_prefix('-') {
            Some(r) => (true, r),
            None => (
                false,
                rest.strip_prefix('+')
                    .ok_or_else(|| format!("expected now+<duration> or now-<duration>, got {s:?}"))?,
            ),
        };
        let dur = parse_duration(rest)?;
        let shifted = if neg {
            now.checked_sub_signed(dur)
        } else {
            now.checked_add_signed(dur)
        };
        return shifted.ok_or_else(|| format!("{s:?} is out of range"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("{s:?}: {e}"))
}

pub fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim())
        .map_err(|e| e.to_string())
        .and_then(|d| Duration::from_std(d).map_err(|e| e.to_string()))
}
