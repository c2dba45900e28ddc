/// Text processing utilities
pub mod text {
    use regex::{Captures, Regex};
    use std::sync::OnceLock;

    fn tag_pattern() -> &'static Regex {
        static TAG: OnceLock<Regex> = OnceLock::new();
        TAG.get_or_init(|| Regex::new(r"<.*?>").expect("tag pattern is valid"))
    }

    fn entity_pattern() -> &'static Regex {
        static ENTITY: OnceLock<Regex> = OnceLock::new();
        ENTITY.get_or_init(|| {
            Regex::new(r"&(nbsp|amp|lt|gt|quot|#39);").expect("entity pattern is valid")
        })
    }

    /// Strip markup from a feed field and return plain text.
    ///
    /// Tags are removed (anything from `<` to the nearest `>` on the same
    /// line), then the common named entities are decoded in a single pass,
    /// so `&amp;lt;` yields `&lt;` rather than `<`. Whitespace runs are
    /// collapsed to a single space and the result is trimmed. Never fails.
    pub fn clean_html(raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }

        let without_tags = tag_pattern().replace_all(raw, "");
        let decoded = entity_pattern().replace_all(&without_tags, |caps: &Captures| {
            match &caps[1] {
                "nbsp" => " ",
                "amp" => "&",
                "lt" => "<",
                "gt" => ">",
                "quot" => "\"",
                _ => "'",
            }
        });

        decoded.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Keep at most `max_chars` characters of `text`.
    pub fn truncate_chars(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((byte_index, _)) => text[..byte_index].to_string(),
            None => text.to_string(),
        }
    }
}

/// Time utilities
pub mod time {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
    use tracing::warn;

    /// Layouts carrying an explicit offset.
    const OFFSET_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S %z",
        "%d %b %Y %H:%M:%S %z",
        "%a, %d %b %Y %H:%M %z",
        "%a %b %d %H:%M:%S %z %Y",
    ];

    /// Layouts without an offset; these are read as UTC.
    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%a, %d %b %Y %H:%M:%S",
        "%d %b %Y %H:%M:%S",
        "%B %d, %Y %H:%M:%S",
    ];

    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d %b %Y", "%d %B %Y", "%B %d, %Y", "%b %d, %Y"];

    /// Canonical timestamp rendering: RFC 3339 with a `+00:00` offset.
    pub fn format_timestamp(dt: DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)
    }

    /// Normalize a free-form feed date, falling back to the current time.
    pub fn normalize_date(raw: &str) -> String {
        normalize_date_at(raw, Utc::now())
    }

    /// Same as [`normalize_date`] with an explicit fallback instant.
    pub fn normalize_date_at(raw: &str, now: DateTime<Utc>) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return format_timestamp(now);
        }

        match parse_date(trimmed) {
            Some(dt) => format_timestamp(dt),
            None => {
                warn!("Error parsing date '{}': unrecognized date format", raw);
                format_timestamp(now)
            }
        }
    }

    /// Parse a feed date: RFC 2822 and RFC 3339 first, then a list of
    /// common layouts. Values without a timezone are taken as UTC.
    pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();

        if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }

        for format in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(raw, format) {
                return Some(dt.with_timezone(&Utc));
            }
        }

        // Trailing zone names that RFC 2822 parsing rejected, e.g. "UTC".
        let naive_input = raw
            .strip_suffix(" UTC")
            .or_else(|| raw.strip_suffix(" GMT"))
            .or_else(|| raw.strip_suffix('Z'))
            .unwrap_or(raw);

        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(naive_input, format) {
                return Some(naive.and_utc());
            }
        }

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(naive_input, format) {
                return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
            }
        }

        None
    }

    /// Hours elapsed between `published` and `now`; `None` if unparseable.
    pub fn age_in_hours(published: &str, now: DateTime<Utc>) -> Option<f64> {
        let published = DateTime::parse_from_rfc3339(published.trim()).ok()?;
        let age = now.signed_duration_since(published.with_timezone(&Utc));
        Some(age.num_milliseconds() as f64 / 3_600_000.0)
    }
}

/// URL utilities
pub mod url {
    use url::Url;

    /// Host (and explicit port) of a url, e.g. `example.com:8080`.
    pub fn extract_netloc(url_str: &str) -> Option<String> {
        let url = Url::parse(url_str).ok()?;
        let host = url.host_str()?;
        match url.port() {
            Some(port) => Some(format!("{}:{}", host, port)),
            None => Some(host.to_string()),
        }
    }

    /// Whether `url_str` is an http(s) url.
    pub fn is_valid_feed_url(url_str: &str) -> bool {
        match Url::parse(url_str) {
            Ok(url) => matches!(url.scheme(), "http" | "https"),
            Err(_) => false,
        }
    }
}
