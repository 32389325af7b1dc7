//! Date extraction, normalized to MM/DD/YYYY.

use chrono::NaiveDate;

use super::patterns::{DATE_DAY_FIRST, DATE_MONTH_FIRST, DATE_NUMERIC};

/// Output format for every extracted date.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// First `NN/NN/NNNN` in the text.
///
/// Read as month/day first; a value that is only valid as day/month is
/// swapped into month/day order.
pub fn numeric_date(text: &str) -> Option<String> {
    let caps = DATE_NUMERIC.captures(text)?;
    let first: u32 = caps[1].parse().ok()?;
    let second: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;

    NaiveDate::from_ymd_opt(year, first, second)
        .or_else(|| NaiveDate::from_ymd_opt(year, second, first))
        .map(format_date)
}

/// First "Mar 15 2024" / "March 15, 2024".
pub fn month_first_date(text: &str) -> Option<String> {
    let caps = DATE_MONTH_FIRST.captures(text)?;
    let month = month_number(&caps[1])?;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day).map(format_date)
}

/// First "15 March 2024" / "15 Mar 2024".
pub fn day_first_date(text: &str) -> Option<String> {
    let caps = DATE_DAY_FIRST.captures(text)?;
    let day: u32 = caps[1].parse().ok()?;
    let month = month_number(&caps[2])?;
    let year: i32 = caps[3].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day).map(format_date)
}

/// Parse a date in any supported form.
pub fn parse_date(text: &str) -> Option<String> {
    numeric_date(text)
        .or_else(|| month_first_date(text))
        .or_else(|| day_first_date(text))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Month number from an English month name or abbreviation.
fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_dates() {
        assert_eq!(numeric_date("Date of issue: 03/15/2024"), Some("03/15/2024".to_string()));
        assert_eq!(numeric_date("Date of issue: 15/03/2024"), Some("03/15/2024".to_string()));
        assert_eq!(numeric_date("Date: 45/45/2024"), None);
    }

    #[test]
    fn test_month_first() {
        assert_eq!(month_first_date("Date: Mar 05 2024"), Some("03/05/2024".to_string()));
        assert_eq!(month_first_date("March 15, 2024"), Some("03/15/2024".to_string()));
        assert_eq!(month_first_date("Feb 30 2024"), None);
    }

    #[test]
    fn test_day_first() {
        assert_eq!(day_first_date("15 March 2024"), Some("03/15/2024".to_string()));
        assert_eq!(day_first_date("Date: 1 Dec 2023"), Some("12/01/2023".to_string()));
    }

    #[test]
    fn test_parse_date_any_form() {
        assert_eq!(parse_date("Issued 15 March 2024"), Some("03/15/2024".to_string()));
        assert_eq!(parse_date("Issued Jan 2 2025"), Some("01/02/2025".to_string()));
        assert_eq!(parse_date("Issued sometime last spring"), None);
    }

    #[test]
    fn test_words_starting_like_months_are_not_dates() {
        assert_eq!(month_first_date("Market 12 2024"), None);
        assert_eq!(month_first_date("Decor 5 2023"), None);
        assert_eq!(day_first_date("3 Marble 2024"), None);
        assert_eq!(month_first_date("Sept. 9 2024"), Some("09/09/2024".to_string()));
        assert_eq!(day_first_date("4 July 2024"), Some("07/04/2024".to_string()));
    }
}
