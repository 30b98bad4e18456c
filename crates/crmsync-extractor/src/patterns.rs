//! Text shapes recognised in candidate content

use crate::error::ExtractorError;
use regex::Regex;

/// Email-shaped substring
pub const EMAIL: &str = r"[\w.-]+@[\w.-]+\.\w+";

/// Phone shapes in priority order: international spaced,
/// parenthesised area code, dashed groups, international compact, bare digits
pub const PHONE_BATTERY: [&str; 5] = [
    r"\+\d{1,3}\s?\d{4,5}\s?\d{4,5}",
    r"\(\d{3}\)\s?\d{3}-?\d{4}",
    r"\d{3}[-.\s]?\d{3}[-.\s]?\d{4}",
    r"\+\d{10,15}",
    r"\d{10,15}",
];

/// Currency amount with optional decimals
pub const CURRENCY: &str = r"\$[\d,]+\.?\d*";

/// Currency marker used when locating deal candidates
pub const CURRENCY_MARKER: &str = r"\$[\d,]+";

/// Due-date shapes in priority order: relative time, slash date, ISO date,
/// month name and day
pub const DUE_BATTERY: [&str; 4] = [
    r"(?i)\d+\s+(minute|hour|day|week|month)s?\s+ago",
    r"\d{1,2}/\d{1,2}/\d{2,4}",
    r"\d{4}-\d{2}-\d{2}",
    r"(?i)(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+\d{1,2}",
];

/// Task status keywords
pub const STATUS: &str = r"(?i)(incomplete|complete|pending)";

/// Purely numeric text
pub const NUMERIC: &str = r"^\d+$";

/// Compile one pattern
pub fn compile(pattern: &str) -> Result<Regex, ExtractorError> {
    Ok(Regex::new(pattern)?)
}

/// Compile a battery, keeping its order
pub fn compile_all(patterns: &[&str]) -> Result<Vec<Regex>, ExtractorError> {
    patterns.iter().map(|p| compile(p)).collect()
}

/// First match of the first pattern in `battery` that matches `text`
pub fn first_match<'t>(battery: &[Regex], text: &'t str) -> Option<&'t str> {
    battery.iter().find_map(|re| re.find(text).map(|m| m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_battery_prefers_international_spaced() {
        let battery = compile_all(&PHONE_BATTERY).unwrap();
        assert_eq!(
            first_match(&battery, "+91 70275 17327 contact"),
            Some("+91 70275 17327")
        );
    }

    #[test]
    fn test_phone_battery_shapes() {
        let battery = compile_all(&PHONE_BATTERY).unwrap();
        assert_eq!(first_match(&battery, "call (555) 123-4567"), Some("(555) 123-4567"));
        assert_eq!(first_match(&battery, "555-123-4567"), Some("555-123-4567"));
        assert_eq!(first_match(&battery, "no digits here"), None);
    }

    #[test]
    fn test_due_battery_order() {
        let battery = compile_all(&DUE_BATTERY).unwrap();
        assert_eq!(first_match(&battery, "3 days ago"), Some("3 days ago"));
        assert_eq!(first_match(&battery, "due 12/05/2024"), Some("12/05/2024"));
        assert_eq!(first_match(&battery, "2024-05-12"), Some("2024-05-12"));
        assert_eq!(first_match(&battery, "Mar 14"), Some("Mar 14"));
    }

    #[test]
    fn test_email_and_currency() {
        let email = compile(EMAIL).unwrap();
        let currency = compile(CURRENCY).unwrap();
        assert_eq!(
            email.find("reach ann.lee@example.co.uk today").map(|m| m.as_str()),
            Some("ann.lee@example.co.uk")
        );
        assert_eq!(currency.find("Value: $12,500.50").map(|m| m.as_str()), Some("$12,500.50"));
    }

    #[test]
    fn test_all_builtins_compile() {
        for p in [EMAIL, CURRENCY, CURRENCY_MARKER, STATUS, NUMERIC] {
            assert!(compile(p).is_ok(), "{p}");
        }
        assert!(compile_all(&PHONE_BATTERY).is_ok());
        assert!(compile_all(&DUE_BATTERY).is_ok());
    }
}
