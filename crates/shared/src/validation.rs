//! Common validation utilities.

use chrono::NaiveDate;
use validator::ValidationError;

/// Format of calendar date tokens (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` date token.
pub fn parse_date_token(token: &str) -> Result<NaiveDate, ValidationError> {
    // chrono accepts unpadded fields, which would break lexicographic ordering
    if token.len() != 10 {
        return Err(invalid_date_token());
    }
    NaiveDate::parse_from_str(token, DATE_FORMAT).map_err(|_| invalid_date_token())
}

/// Validates that a string is a well-formed `YYYY-MM-DD` date token.
pub fn validate_date_token(token: &str) -> Result<(), ValidationError> {
    parse_date_token(token).map(|_| ())
}

/// Validates that a date is not earlier than `today`.
pub fn validate_not_past(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if date >= today {
        Ok(())
    } else {
        let mut err = ValidationError::new("date_in_past");
        err.message = Some(format!("Date {} is in the past", date.format(DATE_FORMAT)).into());
        Err(err)
    }
}

fn invalid_date_token() -> ValidationError {
    let mut err = ValidationError::new("date_format");
    err.message = Some("Date must use the YYYY-MM-DD format".into());
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_token() {
        assert_eq!(parse_date_token("2025-07-04").unwrap(), date(2025, 7, 4));
        assert!(parse_date_token("2025-7-4").is_err());
        assert!(parse_date_token("2025-02-30").is_err());
        assert!(parse_date_token("next tuesday").is_err());
    }

    #[test]
    fn test_validate_date_token() {
        assert!(validate_date_token("2026-01-31").is_ok());
        assert!(validate_date_token("2026-1-31").is_err());
    }

    #[test]
    fn test_parse_date_token_error_message() {
        let err = parse_date_token("07/04/2025").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Date must use the YYYY-MM-DD format"
        );
    }

    #[test]
    fn test_validate_not_past() {
        let today = date(2025, 6, 1);
        assert!(validate_not_past(today, today).is_ok());
        assert!(validate_not_past(date(2025, 6, 2), today).is_ok());

        let err = validate_not_past(date(2025, 5, 31), today).unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Date 2025-05-31 is in the past"
        );
    }
}
