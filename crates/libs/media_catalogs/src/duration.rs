/// Formats a whole number of seconds as `M:SS`. Hours fold into minutes,
/// matching how the catalogs' own players display track lengths.
#[must_use]
pub fn format_seconds(total: u64) -> String {
    format!("{}:{:02}", total / 60, total % 60)
}

/// Formats a track length in milliseconds as `M:SS`.
#[must_use]
pub fn format_millis(millis: u64) -> String {
    format_seconds(millis / 1000)
}

/// Parses an ISO-8601 duration (`PT4M13S`, `PT1H2M`, `P1DT30S`) and formats
/// it as `M:SS`. Returns `None` for anything that does not parse; callers
/// fall back to a placeholder rather than dropping the item.
#[must_use]
pub fn format_iso8601(raw: &str) -> Option<String> {
    let body = raw.strip_prefix('P')?;
    let mut total_seconds: u64 = 0;
    let mut components = 0u32;
    let mut in_time = false;
    let mut digits = String::new();

    for c in body.chars() {
        match c {
            'T' if !in_time && digits.is_empty() => in_time = true,
            '0'..='9' => digits.push(c),
            designator => {
                let value: u64 = digits.parse().ok()?;
                digits.clear();
                let unit = match (designator, in_time) {
                    ('D', false) => 86_400,
                    ('H', true) => 3_600,
                    ('M', true) => 60,
                    ('S', true) => 1,
                    _ => return None,
                };
                total_seconds += value * unit;
                components += 1;
            }
        }
    }

    if !digits.is_empty() || components == 0 {
        return None;
    }
    Some(format_seconds(total_seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("PT4M13S", "4:13")]
    #[case("PT58S", "0:58")]
    #[case("PT3M", "3:00")]
    #[case("PT1H2M3S", "62:03")]
    #[case("P1DT1S", "1440:01")]
    fn formats_durations(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(format_iso8601(raw).as_deref(), Some(expected));
    }

    #[rstest]
    #[case("4:13")]
    #[case("PT")]
    #[case("PT4X")]
    #[case("PT4M13")]
    #[case("P4M")] // month designator, not minutes
    fn rejects_malformed(#[case] raw: &str) {
        assert_eq!(format_iso8601(raw), None);
    }

    #[test]
    fn formats_millis_truncating() {
        assert_eq!(format_millis(185_500), "3:05");
        assert_eq!(format_millis(0), "0:00");
    }
}
