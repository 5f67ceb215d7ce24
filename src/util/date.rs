use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const ZONED_FORMATS: &[&str] = &[
  "%Y-%m-%dT%H:%M:%S%.f%z",
  "%Y-%m-%d %H:%M:%S%.f %z",
  "%Y-%m-%d %H:%M:%S%.f%z",
  "%a, %d %b %Y %H:%M %z",
];

const NAIVE_FORMATS: &[&str] = &[
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M",
  "%Y/%m/%d %H:%M:%S",
  "%a, %d %b %Y %H:%M:%S",
  "%d %b %Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d %b %Y"];

/// Parse the date formats commonly found in feeds. Values without an
/// offset are taken as UTC. The result is always in UTC.
pub fn parse_date(date_str: impl AsRef<str>) -> Option<DateTime<Utc>> {
  let date_str = date_str.as_ref().trim();
  if date_str.is_empty() {
    return None;
  }

  if let Ok(parsed) = DateTime::parse_from_rfc3339(date_str) {
    return Some(parsed.with_timezone(&Utc));
  }

  if let Ok(parsed) = DateTime::parse_from_rfc2822(date_str) {
    return Some(parsed.with_timezone(&Utc));
  }

  for fmt in ZONED_FORMATS {
    if let Ok(parsed) = DateTime::parse_from_str(date_str, fmt) {
      return Some(parsed.with_timezone(&Utc));
    }
  }

  for fmt in NAIVE_FORMATS {
    if let Ok(parsed) = NaiveDateTime::parse_from_str(date_str, fmt) {
      return Some(parsed.and_utc());
    }
  }

  for fmt in DATE_FORMATS {
    if let Ok(parsed) = NaiveDate::parse_from_str(date_str, fmt) {
      return parsed.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
  }

  None
}
