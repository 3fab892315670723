use chrono::{Datelike, NaiveDate, Weekday};

/// Parse ett datum från en sträng (flexibelt format)
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Försök olika format
    let formats = [
        "%Y-%m-%d",    // 2026-01-15
        "%Y/%m/%d",    // 2026/01/15
        "%d-%m-%Y",    // 15-01-2026
        "%d/%m/%Y",    // 15/01/2026
        "%Y%m%d",      // 20260115
    ];

    for format in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    None
}

/// Veckodagsförkortning på svenska
pub fn weekday_abbrev(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "mån",
        Weekday::Tue => "tis",
        Weekday::Wed => "ons",
        Weekday::Thu => "tors",
        Weekday::Fri => "fre",
        Weekday::Sat => "lör",
        Weekday::Sun => "sön",
    }
}

/// Veckodag på svenska
pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "måndag",
        Weekday::Tue => "tisdag",
        Weekday::Wed => "onsdag",
        Weekday::Thu => "torsdag",
        Weekday::Fri => "fredag",
        Weekday::Sat => "lördag",
        Weekday::Sun => "söndag",
    }
}

/// Månadsnamn på svenska
pub fn month_name(date: NaiveDate) -> &'static str {
    match date.month() {
        1 => "januari",
        2 => "februari",
        3 => "mars",
        4 => "april",
        5 => "maj",
        6 => "juni",
        7 => "juli",
        8 => "augusti",
        9 => "september",
        10 => "oktober",
        11 => "november",
        _ => "december",
    }
}

/// Kort dag/månad, t.ex. "5/1"
pub fn day_month(date: NaiveDate) -> String {
    format!("{}/{}", date.day(), date.month())
}

/// Långt visningsformat, t.ex. "måndag 5 januari 2026"
pub fn format_long(date: NaiveDate) -> String {
    format!(
        "{} {} {} {}",
        weekday_name(date),
        date.day(),
        month_name(date),
        date.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-01-15"),
            Some(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap())
        );
        assert_eq!(
            parse_date("15/01/2026"),
            Some(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap())
        );
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("invalid"), None);
    }

    #[test]
    fn test_weekday_abbrev() {
        // 2026-01-05 är en måndag
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(weekday_abbrev(date), "mån");
        assert_eq!(weekday_abbrev(date.succ_opt().unwrap()), "tis");
    }

    #[test]
    fn test_day_month() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(day_month(date), "5/1");
    }

    #[test]
    fn test_format_long() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(format_long(date), "måndag 5 januari 2026");
    }
}
