//! Base point accumulation.
//!
//! Each period is scored on its own: contributive periods earn the
//! ratio of their salary to the national average for every year
//! worked, non-contributive periods earn a flat rate per year.  The
//! totals are plain sums, so the order of the periods is irrelevant.

use crate::formula::FormulaConfig;
use crate::models::{ContributionPeriod, PeriodKind};
use chrono::NaiveDate;

/// Length of the averaged calendar year used to turn days into years.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Totals produced by [`accumulate_points`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointTotals {
    pub contribution_points: f64,
    pub non_contributive_points: f64,
    pub total_contributive_years: f64,
    pub total_contributive_days: i64,
}

/// Points earned per year by a salary, relative to the average gross
/// salary.  A salary equal to the average earns exactly one point.
pub fn point_ratio(monthly_gross_salary: f64, average_gross_salary: f64) -> f64 {
    monthly_gross_salary / average_gross_salary
}

/// Number of days in `[from, to)`, or `None` when either end is missing
/// or the interval is empty or reversed.
pub fn duration_days(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Option<i64> {
    let days = (to? - from?).num_days();
    (days > 0).then_some(days)
}

/// Fractional years in `[from, to)` on a 365.25-day year.
pub fn duration_years(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Option<f64> {
    duration_days(from, to).map(|days| days as f64 / DAYS_PER_YEAR)
}

/// Salary of a contributive period if it can score, i.e. it is present,
/// finite and positive.
pub(crate) fn scoring_salary(period: &ContributionPeriod) -> Option<f64> {
    match &period.kind {
        PeriodKind::Contributive {
            monthly_gross_salary: Some(salary),
            ..
        } if salary.is_finite() && *salary > 0.0 => Some(*salary),
        _ => None,
    }
}

/// Dated contributive periods: both dates set and a positive duration.
/// These count towards the contributive years and the stability bonus
/// whatever their salary; a missing salary only zeroes their points.
pub fn is_dated_contributive(period: &ContributionPeriod) -> bool {
    period.is_contributive() && duration_days(period.from_date, period.to_date).is_some()
}

/// Base points of a single period.  Periods that cannot be scored
/// yield zero rather than an error.
pub fn period_points(period: &ContributionPeriod, formula: &FormulaConfig) -> f64 {
    let Some(years) = duration_years(period.from_date, period.to_date) else {
        return 0.0;
    };
    match &period.kind {
        PeriodKind::NonContributive {
            non_contributive_type,
        } => years * formula.non_contributive_rates.rate(*non_contributive_type),
        PeriodKind::Contributive { .. } => scoring_salary(period)
            .map(|salary| point_ratio(salary, formula.average_gross_salary) * years)
            .unwrap_or(0.0),
    }
}

/// Sum base points over all periods, split into contributive and
/// non-contributive totals.
pub fn accumulate_points(
    periods: &[ContributionPeriod],
    formula: &FormulaConfig,
) -> PointTotals {
    let mut totals = PointTotals::default();
    for period in periods {
        let points = period_points(period, formula);
        match period.kind {
            PeriodKind::NonContributive { .. } => totals.non_contributive_points += points,
            PeriodKind::Contributive { .. } => {
                if !is_dated_contributive(period) {
                    continue;
                }
                totals.contribution_points += points;
                if let Some(days) = duration_days(period.from_date, period.to_date) {
                    totals.total_contributive_days += days;
                    totals.total_contributive_years += days as f64 / DAYS_PER_YEAR;
                }
            }
        }
    }
    totals
}
