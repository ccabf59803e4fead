//! Server timestamp parsing and pt-BR display formatting.
//!
//! The API emits ISO 8601 timestamps, usually with a UTC offset but
//! occasionally naive. Display formatting follows the pt-BR conventions the
//! rest of the product uses.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

/// Shown whenever a timestamp is missing or unparseable.
pub const UNAVAILABLE: &str = "Data não disponível";

const MONTHS_PT: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Parses an ISO 8601 timestamp as emitted by the server.
///
/// Accepts both offset-aware (`2024-01-15T10:30:00-03:00`, trailing `Z`) and
/// naive (`2024-01-15T10:30:00.123456`) forms; naive values are taken as UTC.
pub fn parse(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt);
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive).fixed_offset())
}

/// Formats a timestamp as `dd/mm/yyyy HH:MM:SS` for history lines.
pub fn format_short(value: &str) -> String {
    match parse(value) {
        Some(dt) => dt.format("%d/%m/%Y %H:%M:%S").to_string(),
        None => UNAVAILABLE.to_string(),
    }
}

/// Formats a timestamp as a pt-BR month/year string, e.g. `janeiro de 2024`.
pub fn month_year(value: &str) -> String {
    use chrono::Datelike;

    match parse(value) {
        Some(dt) => {
            let month = MONTHS_PT[dt.month0() as usize];
            format!("{} de {}", month, dt.year())
        }
        None => UNAVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_offset_aware() {
        let dt = parse("2024-01-15T10:30:00-03:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-15T10:30:00-03:00");
    }

    #[test]
    fn test_parse_naive() {
        assert!(parse("2024-01-15T10:30:00.123456").is_some());
    }

    #[test]
    fn test_format_short() {
        assert_eq!(format_short("2024-01-15T10:30:45Z"), "15/01/2024 10:30:45");
        assert_eq!(format_short("not-a-date"), UNAVAILABLE);
    }

    #[test]
    fn test_month_year() {
        assert_eq!(month_year("2024-03-15T10:30:00Z"), "março de 2024");
        assert_eq!(month_year(""), UNAVAILABLE);
    }
}
