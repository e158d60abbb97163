//! Display-oriented derivations of a computed pension.
//!
//! Presentation layers render a status banner, a career progress bar,
//! a per-period table and a chart of years grouped by employer or by
//! non-contributive type.  None of this feeds back into the pension
//! amount.

use crate::formula::FormulaConfig;
use crate::models::{ContributionPeriod, PensionDetails};
use crate::points::{duration_years, period_points};
use serde::Serialize;
use std::collections::BTreeMap;

/// Label for employment periods without a company name.
pub const UNSPECIFIED_COMPANY: &str = "unspecified";

/// Points and duration of one input period, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodPoints {
    pub label: String,
    pub contributive: bool,
    pub years: f64,
    pub points: f64,
}

pub fn period_breakdown(
    periods: &[ContributionPeriod],
    formula: &FormulaConfig,
) -> Vec<PeriodPoints> {
    periods
        .iter()
        .map(|period| PeriodPoints {
            label: display_label(period).to_string(),
            contributive: period.is_contributive(),
            years: duration_years(period.from_date, period.to_date).unwrap_or(0.0),
            points: period_points(period, formula),
        })
        .collect()
}

/// Total years per company or non-contributive type.  Periods without
/// a usable date range are left out.
pub fn years_by_category(periods: &[ContributionPeriod]) -> BTreeMap<String, f64> {
    let mut groups = BTreeMap::new();
    for period in periods {
        if let Some(years) = duration_years(period.from_date, period.to_date) {
            *groups.entry(display_label(period).to_string()).or_insert(0.0) += years;
        }
    }
    groups
}

fn display_label(period: &ContributionPeriod) -> &str {
    match period.label() {
        "" => UNSPECIFIED_COMPANY,
        label => label,
    }
}

/// Where the contributor stands against the contributive thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ContributionStatus {
    NoPeriods,
    #[serde(rename_all = "camelCase")]
    BelowMinimum { years_needed: u32 },
    #[serde(rename_all = "camelCase")]
    BelowComplete { years_needed: u32 },
    Complete,
}

impl ContributionStatus {
    /// A computation error takes precedence, so an empty career reports
    /// the missing minimum years; `NoPeriods` only shows up under a
    /// formula without a minimum.
    pub fn assess(
        periods: &[ContributionPeriod],
        details: &PensionDetails,
        formula: &FormulaConfig,
    ) -> Self {
        let years = details.total_contributive_years;
        if details.error.is_some() || years < formula.minimum_contribution_years {
            ContributionStatus::BelowMinimum {
                years_needed: whole_years_needed(formula.minimum_contribution_years, years),
            }
        } else if periods.is_empty() {
            ContributionStatus::NoPeriods
        } else if years < formula.complete_contribution_years {
            ContributionStatus::BelowComplete {
                years_needed: whole_years_needed(formula.complete_contribution_years, years),
            }
        } else {
            ContributionStatus::Complete
        }
    }

    pub fn message(&self, formula: &FormulaConfig) -> String {
        match self {
            ContributionStatus::NoPeriods => {
                "Add your contribution periods to calculate your pension".to_string()
            }
            ContributionStatus::BelowMinimum { years_needed } => format!(
                "You need {} more years to reach the minimum contribution period of {} years",
                years_needed, formula.minimum_contribution_years
            ),
            ContributionStatus::BelowComplete { years_needed } => format!(
                "You need {} more years to reach the complete contribution period of {} years",
                years_needed, formula.complete_contribution_years
            ),
            ContributionStatus::Complete => "All pension conditions are met".to_string(),
        }
    }
}

fn whole_years_needed(threshold: f64, years: f64) -> u32 {
    (threshold - years).ceil().max(0.0) as u32
}

/// Share of a complete career already contributed, in `[0, 1]`.
pub fn career_progress(details: &PensionDetails, formula: &FormulaConfig) -> f64 {
    if formula.complete_contribution_years <= 0.0 {
        return 1.0;
    }
    (details.total_contributive_years / formula.complete_contribution_years).clamp(0.0, 1.0)
}

pub fn retirement_age_reached(details: &PensionDetails) -> bool {
    details.years_until_retirement <= 0
}

/// Everything a stats view needs in one serialisable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PensionSummary {
    pub details: PensionDetails,
    pub status: ContributionStatus,
    pub status_message: String,
    pub career_progress: f64,
    pub retirement_age_reached: bool,
    pub periods: Vec<PeriodPoints>,
    pub years_by_category: BTreeMap<String, f64>,
}

impl PensionSummary {
    pub fn build(
        periods: &[ContributionPeriod],
        details: PensionDetails,
        formula: &FormulaConfig,
    ) -> Self {
        let status = ContributionStatus::assess(periods, &details, formula);
        Self {
            status_message: status.message(formula),
            career_progress: career_progress(&details, formula),
            retirement_age_reached: retirement_age_reached(&details),
            periods: period_breakdown(periods, formula),
            years_by_category: years_by_category(periods),
            status,
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute_pension;
    use crate::models::NonContributiveType;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn details_with(periods: &[ContributionPeriod], formula: &FormulaConfig) -> PensionDetails {
        compute_pension(periods, date(1990, 1, 1), formula, date(2026, 10, 16)).details
    }

    fn details_for(periods: &[ContributionPeriod]) -> PensionDetails {
        details_with(periods, &FormulaConfig::default())
    }

    fn acme(from_year: i32, to_year: i32) -> ContributionPeriod {
        ContributionPeriod::contributive(
            "Acme",
            date(from_year, 1, 1),
            date(to_year, 1, 1),
            6789.0,
        )
    }

    #[test]
    fn test_status_progression() {
        let formula = FormulaConfig::default();

        let short = vec![acme(2015, 2025)];
        let status = ContributionStatus::assess(&short, &details_for(&short), &formula);
        assert_eq!(status, ContributionStatus::BelowMinimum { years_needed: 5 });
        assert!(status.message(&formula).contains("minimum contribution period of 15 years"));

        let medium = vec![acme(2010, 2030)];
        let status = ContributionStatus::assess(&medium, &details_for(&medium), &formula);
        assert_eq!(status, ContributionStatus::BelowComplete { years_needed: 15 });
        assert_eq!(
            status.message(&formula),
            "You need 15 more years to reach the complete contribution period of 35 years"
        );

        let full = vec![acme(2010, 2046)];
        assert_eq!(
            ContributionStatus::assess(&full, &details_for(&full), &formula),
            ContributionStatus::Complete
        );
    }

    #[test]
    fn test_empty_career_reports_minimum_first() {
        let formula = FormulaConfig::default();
        let none: Vec<ContributionPeriod> = vec![];
        let details = details_for(&none);
        let status = ContributionStatus::assess(&none, &details, &formula);
        assert_eq!(status, ContributionStatus::BelowMinimum { years_needed: 15 });
        assert_eq!(Some(status.message(&formula)), details.error);

        let no_minimum = FormulaConfig {
            minimum_contribution_years: 0.0,
            ..FormulaConfig::default()
        };
        let details = details_with(&none, &no_minimum);
        assert_eq!(
            ContributionStatus::assess(&none, &details, &no_minimum),
            ContributionStatus::NoPeriods
        );
    }

    #[test]
    fn test_career_progress_is_clamped() {
        let formula = FormulaConfig::default();
        let mut details = PensionDetails {
            total_contributive_years: 17.5,
            ..PensionDetails::default()
        };
        assert_eq!(career_progress(&details, &formula), 0.5);
        details.total_contributive_years = 50.0;
        assert_eq!(career_progress(&details, &formula), 1.0);
    }

    #[test]
    fn test_years_by_category_groups_labels() {
        let unnamed =
            ContributionPeriod::contributive("  ", date(2014, 1, 1), date(2016, 1, 1), 1.0);
        let undated = ContributionPeriod {
            from_date: None,
            ..acme(2000, 2001)
        };
        let periods = vec![
            acme(2010, 2014),
            acme(2016, 2020),
            unnamed,
            ContributionPeriod::non_contributive(
                NonContributiveType::Military,
                date(2008, 1, 1),
                date(2009, 1, 1),
            ),
            undated,
        ];
        let groups = years_by_category(&periods);
        let labels: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(labels, vec!["Acme", "military", UNSPECIFIED_COMPANY]);
        assert!((groups["Acme"] - 2922.0 / 365.25).abs() < 1e-9);
    }

    #[test]
    fn test_summary_collects_breakdown() {
        let formula = FormulaConfig::default();
        let periods = vec![
            acme(2010, 2030),
            ContributionPeriod::non_contributive(
                NonContributiveType::University,
                date(2006, 1, 1),
                date(2010, 1, 1),
            ),
        ];
        let details = details_for(&periods);
        let summary = PensionSummary::build(&periods, details.clone(), &formula);
        assert_eq!(summary.details, details);
        assert_eq!(summary.periods.len(), 2);
        assert_eq!(summary.periods[0].label, "Acme");
        assert!(summary.periods[0].contributive);
        assert!((summary.periods[0].points - 20.0).abs() < 1e-9);
        assert!(!summary.periods[1].contributive);
        assert!(!summary.retirement_age_reached);

        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["status"]["status"], "belowComplete");
        assert_eq!(value["status"]["yearsNeeded"], 15);
    }
}
