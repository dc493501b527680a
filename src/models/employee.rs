//! Employee models and related types.
//!
//! [`EmployeeRecord`] mirrors the loosely-populated upstream export, where
//! monetary columns may be blank, numeric, or numeric text. [`RatedEmployee`]
//! is the closed, validated shape the engine operates on.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;

/// An employee as supplied by the persistence layer or an API caller.
///
/// Monetary fields come in local and USD variants. Domestic employees only
/// populate the local column (already USD); international employees populate
/// both, and only the USD column is safe to aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Stable unique identifier (associate id).
    pub id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Supervisory organization the employee reports into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    /// Current job profile, used for rating analytics only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_profile: Option<String>,
    /// Local currency code (e.g., "USD", "GBP").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// Performance rating as a percentage of target. `None` means unrated.
    #[serde(
        default,
        deserialize_with = "deserialize_rating",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating_percent: Option<Decimal>,
    /// Bonus target in local currency.
    #[serde(
        default,
        deserialize_with = "deserialize_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub bonus_target_local: Option<Decimal>,
    /// Bonus target converted to USD (international employees only).
    #[serde(
        default,
        deserialize_with = "deserialize_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub bonus_target_usd: Option<Decimal>,
    /// Base pay in local currency.
    #[serde(
        default,
        deserialize_with = "deserialize_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub base_pay_local: Option<Decimal>,
    /// Base pay converted to USD (international employees only).
    #[serde(
        default,
        deserialize_with = "deserialize_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub base_pay_usd: Option<Decimal>,
}

impl EmployeeRecord {
    /// Creates a record with only an id set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            team: None,
            job_profile: None,
            currency: None,
            rating_percent: None,
            bonus_target_local: None,
            bonus_target_usd: None,
            base_pay_local: None,
            base_pay_usd: None,
        }
    }

    /// Returns true if the record carries a rating.
    pub fn is_rated(&self) -> bool {
        self.rating_percent.is_some()
    }
}

/// A rated employee, immutable for the duration of a calculation run.
///
/// # Examples
///
/// ```
/// use bonus_engine::models::RatedEmployee;
/// use rust_decimal::Decimal;
///
/// let employee = RatedEmployee::new("EMP101", "Platform", Decimal::from(110), Decimal::from(27000));
/// assert!(employee.has_bonus_target());
/// assert_eq!(employee.team_id, "Platform");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedEmployee {
    /// Unique identifier used to cross-reference results.
    pub id: String,
    /// Performance rating in the range [0, 200].
    pub rating_percent: Decimal,
    /// Bonus target in USD after currency fallback.
    pub bonus_target_usd: Decimal,
    /// Base pay in USD after currency fallback. Informational only.
    #[serde(default)]
    pub base_pay_usd: Decimal,
    /// Team grouping; the empty string is the unassigned team.
    #[serde(default)]
    pub team_id: String,
    /// Job profile; [`UNKNOWN_JOB_PROFILE`] when the record carried none.
    #[serde(default = "unknown_job_profile")]
    pub job_profile: String,
}

/// Job profile assigned to records that do not carry one.
pub const UNKNOWN_JOB_PROFILE: &str = "Unknown";

fn unknown_job_profile() -> String {
    UNKNOWN_JOB_PROFILE.to_string()
}

impl RatedEmployee {
    /// Creates a rated employee with no base pay recorded.
    pub fn new(
        id: impl Into<String>,
        team_id: impl Into<String>,
        rating_percent: Decimal,
        bonus_target_usd: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            rating_percent,
            bonus_target_usd,
            base_pay_usd: Decimal::ZERO,
            team_id: team_id.into(),
            job_profile: unknown_job_profile(),
        }
    }

    /// Sets the informational base pay.
    pub fn with_base_pay(mut self, base_pay_usd: Decimal) -> Self {
        self.base_pay_usd = base_pay_usd;
        self
    }

    /// Sets the job profile.
    pub fn with_job_profile(mut self, job_profile: impl Into<String>) -> Self {
        self.job_profile = job_profile.into();
        self
    }

    /// Returns true if the employee takes part in share computation.
    pub fn has_bonus_target(&self) -> bool {
        self.bonus_target_usd > Decimal::ZERO
    }
}

fn parse_decimal_text(text: &str) -> Option<Decimal> {
    let trimmed = text.trim().replace(',', "");
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(&trimmed)
        .or_else(|_| Decimal::from_scientific(&trimmed))
        .ok()
}

fn number_to_decimal(number: &serde_json::Number) -> Option<Decimal> {
    parse_decimal_text(&number.to_string())
        .or_else(|| number.as_f64().and_then(|f| Decimal::try_from(f).ok()))
}

/// Reads an amount column. Blank or unparsable cells read as absent.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => number_to_decimal(&n),
        Some(Value::String(s)) => parse_decimal_text(&s),
        _ => None,
    })
}

/// Reads a rating. Blank means unrated; anything else must be numeric.
fn deserialize_rating<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => number_to_decimal(&n)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid rating value '{}'", n))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => parse_decimal_text(&s)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid rating value '{}'", s))),
        Some(other) => Err(de::Error::custom(format!(
            "invalid rating value '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_deserialize_domestic_record() {
        let json = r#"{
            "id": "EMP101",
            "name": "Alice Anderson",
            "team": "Engineering - Platform",
            "currency": "USD",
            "rating_percent": 130,
            "bonus_target_local": 27000.0,
            "base_pay_local": 180000.0
        }"#;

        let record: EmployeeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "EMP101");
        assert_eq!(record.team.as_deref(), Some("Engineering - Platform"));
        assert_eq!(record.rating_percent, Some(dec("130")));
        assert_eq!(record.bonus_target_local, Some(dec("27000")));
        assert_eq!(record.bonus_target_usd, None);
        assert_eq!(record.base_pay_usd, None);
    }

    #[test]
    fn test_deserialize_international_record_with_text_amounts() {
        let json = r#"{
            "id": "EMP401",
            "currency": "GBP",
            "rating_percent": "115",
            "bonus_target_local": "12600",
            "bonus_target_usd": "15,949",
            "base_pay_local": 105000,
            "base_pay_usd": 132911
        }"#;

        let record: EmployeeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.rating_percent, Some(dec("115")));
        assert_eq!(record.bonus_target_usd, Some(dec("15949")));
        assert_eq!(record.base_pay_usd, Some(dec("132911")));
    }

    #[test]
    fn test_blank_and_unparsable_amounts_read_as_absent() {
        let json = r#"{
            "id": "EMP900",
            "bonus_target_local": "n/a",
            "bonus_target_usd": "",
            "base_pay_local": null
        }"#;

        let record: EmployeeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.bonus_target_local, None);
        assert_eq!(record.bonus_target_usd, None);
        assert_eq!(record.base_pay_local, None);
    }

    #[test]
    fn test_blank_rating_is_unrated() {
        let json = r#"{"id": "EMP001", "rating_percent": "  "}"#;
        let record: EmployeeRecord = serde_json::from_str(json).unwrap();
        assert!(!record.is_rated());
    }

    #[test]
    fn test_non_numeric_rating_is_rejected() {
        let json = r#"{"id": "EMP001", "rating_percent": "excellent"}"#;
        let err = serde_json::from_str::<EmployeeRecord>(json).unwrap_err();
        assert!(err.to_string().contains("invalid rating value"));
    }

    #[test]
    fn test_zero_rating_is_rated() {
        let json = r#"{"id": "EMP001", "rating_percent": 0}"#;
        let record: EmployeeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.rating_percent, Some(Decimal::ZERO));
    }

    #[test]
    fn test_serialized_record_reads_back() {
        let mut record = EmployeeRecord::new("EMP102");
        record.rating_percent = Some(dec("110.5"));
        record.bonus_target_local = Some(dec("18000"));

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("bonus_target_usd"));
        let parsed: EmployeeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_rated_employee_without_target_is_not_included() {
        let employee = RatedEmployee::new("EMP001", "", dec("100"), Decimal::ZERO);
        assert!(!employee.has_bonus_target());

        let negative = RatedEmployee::new("EMP002", "", dec("100"), dec("-5"));
        assert!(!negative.has_bonus_target());
    }

    #[test]
    fn test_rated_employee_defaults_team_and_base_pay() {
        let json = r#"{"id": "EMP001", "rating_percent": "100", "bonus_target_usd": "5000"}"#;
        let employee: RatedEmployee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.team_id, "");
        assert_eq!(employee.base_pay_usd, Decimal::ZERO);
        assert_eq!(employee.job_profile, UNKNOWN_JOB_PROFILE);
    }
}
