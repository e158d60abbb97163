//! Data models for the Pension Engine.
//!
//! The `models` module defines the serialisable structs and enums
//! describing a contributor's career (contribution periods and birth
//! date) and the computed pension breakdown.  The JSON shape uses
//! camelCase keys so that presentation layers can hand their form
//! state to the engine without translation.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Working condition of a contributive period.
///
/// The value is carried through for display but is not weighted into
/// any point calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkingCondition {
    #[default]
    Normal,
    Special,
    Difficult,
    VeryDifficult,
}

/// Kind of time credited without a salary-based contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NonContributiveType {
    Military,
    University,
    ChildCare,
    Medical,
}

impl NonContributiveType {
    /// Stable identifier, identical to the serialised form.
    pub fn as_str(&self) -> &'static str {
        match self {
            NonContributiveType::Military => "military",
            NonContributiveType::University => "university",
            NonContributiveType::ChildCare => "childCare",
            NonContributiveType::Medical => "medical",
        }
    }
}

/// What a period counts as.  Salary and working condition only exist
/// on contributive periods, so a non-contributive period carrying a
/// salary cannot be expressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PeriodKind {
    /// Employment with a monthly gross salary (Lei).
    #[serde(rename_all = "camelCase")]
    Contributive {
        /// Employer name, display only.
        #[serde(default)]
        company: String,
        /// Monthly gross salary.  Missing or non-positive salaries earn
        /// no points; the period still counts as contributive time.
        #[serde(default)]
        monthly_gross_salary: Option<f64>,
        #[serde(default)]
        working_condition: WorkingCondition,
    },
    /// Military service, university, child care or medical leave.
    #[serde(rename_all = "camelCase")]
    NonContributive {
        non_contributive_type: NonContributiveType,
    },
}

/// A half-open interval `[from_date, to_date)` of a career.
///
/// Either date may be missing while the user is still filling in a
/// form; such periods are kept but contribute zero points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionPeriod {
    #[serde(default, deserialize_with = "optional_date")]
    pub from_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional_date")]
    pub to_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub kind: PeriodKind,
}

impl ContributionPeriod {
    /// Builds a contributive period with a normal working condition.
    pub fn contributive(
        company: impl Into<String>,
        from_date: NaiveDate,
        to_date: NaiveDate,
        monthly_gross_salary: f64,
    ) -> Self {
        Self {
            from_date: Some(from_date),
            to_date: Some(to_date),
            kind: PeriodKind::Contributive {
                company: company.into(),
                monthly_gross_salary: Some(monthly_gross_salary),
                working_condition: WorkingCondition::Normal,
            },
        }
    }

    /// Builds a non-contributive period of the given type.
    pub fn non_contributive(
        non_contributive_type: NonContributiveType,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Self {
        Self {
            from_date: Some(from_date),
            to_date: Some(to_date),
            kind: PeriodKind::NonContributive {
                non_contributive_type,
            },
        }
    }

    pub fn is_contributive(&self) -> bool {
        matches!(self.kind, PeriodKind::Contributive { .. })
    }

    /// Label used when grouping periods for display: the company for
    /// employment, the type identifier otherwise.
    pub fn label(&self) -> &str {
        match &self.kind {
            PeriodKind::Contributive { company, .. } => company.trim(),
            PeriodKind::NonContributive {
                non_contributive_type,
            } => non_contributive_type.as_str(),
        }
    }
}

/// Everything the engine needs to estimate a pension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PensionInputs {
    pub birth_date: NaiveDate,
    /// Target retirement year.  Informational; the engine derives the
    /// retirement horizon from the birth date and the formula instead.
    #[serde(default)]
    pub retirement_year: Option<i32>,
    /// Periods in any order.
    #[serde(default)]
    pub contribution_periods: Vec<ContributionPeriod>,
}

/// Computed pension breakdown.
///
/// Fully determined by a [`PensionInputs`], a formula revision and the
/// current date.  When the contributor has not reached the minimum
/// contributive years every point field and both pension amounts are
/// zero and `error` explains how many years are missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PensionDetails {
    pub contribution_points: f64,
    pub stability_points: f64,
    pub non_contributive_points: f64,
    /// Sum of the three point fields.
    pub total_points: f64,
    pub total_contributive_years: f64,
    /// Whole calendar days spent in dated contributive periods.
    pub total_contributive_days: i64,
    /// Rounded to two decimals.
    pub monthly_pension: f64,
    /// Twelve monthly payments, rounded to two decimals.
    pub yearly_pension: f64,
    pub current_age: i32,
    /// Negative or zero once the retirement age has been reached.
    pub years_until_retirement: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of one engine invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PensionResult {
    pub monthly_pension: f64,
    pub details: PensionDetails,
}

/// Accepts ISO-8601 dates and treats `null`, a missing key or an empty
/// string as "no date yet".  An unparsable date is logged and treated
/// the same way, so the period scores zero instead of rejecting the
/// whole document.
fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            Ok(date) => Ok(Some(date)),
            Err(err) => {
                tracing::warn!(date = text, error = %err, "ignoring unparsable period date");
                Ok(None)
            }
        },
    }
}
