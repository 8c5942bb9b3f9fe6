//! Locale month names and date-header conversion.
//!
//! Date headers look like `12 Jan, 2024` or `3 März 2024`. English and German
//! month names are accepted, full or abbreviated, in any case.

use chrono::NaiveDate;

use crate::error::{Result, ShadowError};

/// Resolve an English or German month name (or abbreviation) to 1-12.
pub fn month_from_name(name: &str) -> Option<u32> {
    let month = match name.trim().trim_end_matches(['.', ',']).to_lowercase().as_str() {
        "january" | "jan" | "januar" | "jänner" | "jaenner" | "jän" => 1,
        "february" | "feb" | "februar" | "feber" => 2,
        "march" | "mar" | "märz" | "maerz" | "mär" | "mrz" => 3,
        "april" | "apr" => 4,
        "may" | "mai" => 5,
        "june" | "jun" | "juni" => 6,
        "july" | "jul" | "juli" => 7,
        "august" | "aug" => 8,
        "september" | "sep" | "sept" => 9,
        "october" | "oct" | "oktober" | "okt" => 10,
        "november" | "nov" => 11,
        "december" | "dec" | "dezember" | "dez" => 12,
        _ => return None,
    };
    Some(month)
}

/// Convert a date header captured by the calendar parser into a calendar date.
pub fn parse_date_header(header: &str) -> Result<NaiveDate> {
    let fail = |reason: String| ShadowError::DateParse {
        date: header.to_string(),
        reason,
    };

    // Example: "12 Jan, 2024" -> ["12", "Jan,", "2024"]
    let parts: Vec<_> = header.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(fail(format!("expected 'DD Month YYYY', got {} parts", parts.len())));
    }

    let day: u32 = parts[0]
        .parse()
        .map_err(|_| fail(format!("invalid day '{}'", parts[0])))?;
    let month = month_from_name(parts[1])
        .ok_or_else(|| fail(format!("unknown month '{}'", parts[1].trim_end_matches(','))))?;
    let year: i32 = parts[2]
        .parse()
        .map_err(|_| fail(format!("invalid year '{}'", parts[2])))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| fail(format!("no such day {year}-{month:02}-{day:02}")))
}
