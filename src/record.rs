use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MUTUAL_FUND: &str = "mutual-fund";

/// One SIP entry as the form captured it.
///
/// Numeric fields stay as the text the user typed; they are parsed on read
/// by the aggregation code, which treats anything unparseable as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRecord {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    name: String,
    sip_amount: String,
    sip_duration: String,
    current_amount: String,
    #[serde(default)]
    start_date: String,
}

impl InvestmentRecord {
    pub fn new(
        name: &str,
        sip_amount: &str,
        sip_duration: &str,
        current_amount: &str,
        start_date: &str,
    ) -> Self {
        InvestmentRecord {
            kind: Some(MUTUAL_FUND.to_string()),
            name: name.to_string(),
            sip_amount: sip_amount.to_string(),
            sip_duration: sip_duration.to_string(),
            current_amount: current_amount.to_string(),
            start_date: start_date.to_string(),
        }
    }

    pub fn with_kind(mut self, kind: &str) -> Self {
        self.kind = Some(kind.to_string());
        self
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn get_sip_amount(&self) -> &str {
        &self.sip_amount
    }

    pub fn get_sip_duration(&self) -> &str {
        &self.sip_duration
    }

    pub fn get_current_amount(&self) -> &str {
        &self.current_amount
    }

    pub fn get_start_date(&self) -> &str {
        &self.start_date
    }

    /// Principal paid into this plan: contribution times number of months.
    pub fn invested(&self) -> f64 {
        numeric(&self.sip_amount) * numeric(&self.sip_duration)
    }

    pub fn current_value(&self) -> f64 {
        numeric(&self.current_amount)
    }
}

/// Parse a decimal the user typed. Rejects empty, malformed and non-finite input.
pub fn parse_decimal(text: &str) -> Result<f64, ValidationError> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ValidationError::InvalidNumber(trimmed.to_string())),
    }
}

pub fn parse_months(text: &str) -> Result<u32, ValidationError> {
    let trimmed = text.trim();
    let months = trimmed
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidDuration(trimmed.to_string()))?;
    if months == 0 {
        return Err(ValidationError::ZeroDuration);
    }
    Ok(months)
}

pub fn parse_start_date(text: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))
}

// stored values that fail to parse count as zero
pub fn numeric(text: &str) -> f64 {
    parse_decimal(text).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_string(data: &str) -> Vec<InvestmentRecord> {
        serde_json::from_str(data).unwrap()
    }

    #[test]
    fn test_stored_fields_are_camel_case() {
        let data = r#"[{"type":"mutual-fund","name":"Axis Bluechip Fund","sipAmount":"1000",
            "sipDuration":"6","currentAmount":"6500","startDate":"2024-01-05"}]"#;
        let records = from_string(data);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get_name(), "Axis Bluechip Fund");
        assert_eq!(records[0].get_kind(), Some(MUTUAL_FUND));
        assert_eq!(records[0].invested(), 6000.0);
        assert_eq!(records[0].current_value(), 6500.0);
    }

    #[test]
    fn test_records_without_type_or_date_still_load() {
        let data = r#"[{"name":"X","sipAmount":"500","sipDuration":"12","currentAmount":"7000"}]"#;
        let records = from_string(data);
        assert_eq!(records[0].get_kind(), None);
        assert_eq!(records[0].get_start_date(), "");
        assert_eq!(records[0].invested(), 6000.0);
    }

    #[test]
    fn test_unparseable_text_counts_as_zero() {
        let record = InvestmentRecord::new("X", "abc", "6", "", "2024-01-01");
        assert_eq!(record.invested(), 0.0);
        assert_eq!(record.current_value(), 0.0);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal(" 1000.50 "), Ok(1000.5));
        assert_eq!(
            parse_decimal("12abc"),
            Err(ValidationError::InvalidNumber("12abc".to_string()))
        );
        assert!(parse_decimal("inf").is_err());
        assert!(parse_decimal("").is_err());
    }

    #[test]
    fn test_parse_months() {
        assert_eq!(parse_months("6"), Ok(6));
        assert_eq!(parse_months("0"), Err(ValidationError::ZeroDuration));
        assert!(matches!(
            parse_months("6.5"),
            Err(ValidationError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_parse_start_date() {
        assert_eq!(
            parse_start_date("2024-03-01"),
            Ok(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
        assert!(parse_start_date("01/03/2024").is_err());
    }

    #[test]
    fn test_serialized_values_stay_strings() {
        let record = InvestmentRecord::new("X", "1000", "6", "6500", "2024-01-01");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["sipAmount"], "1000");
        assert_eq!(json["sipDuration"], "6");
        assert_eq!(json["type"], MUTUAL_FUND);
    }
}
